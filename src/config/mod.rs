//! Configuration management
//!
//! This module handles loading and parsing configuration for the GCADR content backend.
//! Configuration can be loaded from:
//! - config.yml file
//! - Environment variables (override file settings)
//!
//! Missing optional values are filled with sensible defaults.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Database configuration
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Authoring sources for the import pipeline
    #[serde(default)]
    pub content: ContentConfig,
    /// Static export destination
    #[serde(default)]
    pub export: ExportConfig,
    /// Admin build trigger settings
    #[serde(default)]
    pub admin: AdminConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind to
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,
    /// CORS allowed origin
    #[serde(default = "default_cors_origin")]
    pub cors_origin: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origin: default_cors_origin(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_cors_origin() -> String {
    "http://localhost:3000".to_string()
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// SQLite database path or URL
    #[serde(default = "default_database_url")]
    pub url: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_database_url(),
        }
    }
}

fn default_database_url() -> String {
    "data/gcadr.db".to_string()
}

/// Where the importers read authoring files from
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentConfig {
    /// Directory of Markdown blog posts
    #[serde(default = "default_blog_dir")]
    pub blog_dir: PathBuf,
    /// Directory holding team-members.yaml and leadership.yaml
    #[serde(default = "default_team_dir")]
    pub team_dir: PathBuf,
    /// Directory holding carousel.yaml and announcements.yaml
    #[serde(default = "default_config_dir")]
    pub config_dir: PathBuf,
    /// Uploaded media files, mirrored on export
    #[serde(default = "default_media_root")]
    pub media_root: PathBuf,
    /// Public URL prefix for media; stripped from imported paths
    #[serde(default = "default_media_url_prefix")]
    pub media_url_prefix: String,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            blog_dir: default_blog_dir(),
            team_dir: default_team_dir(),
            config_dir: default_config_dir(),
            media_root: default_media_root(),
            media_url_prefix: default_media_url_prefix(),
        }
    }
}

fn default_blog_dir() -> PathBuf {
    PathBuf::from("content/blogs")
}

fn default_team_dir() -> PathBuf {
    PathBuf::from("content/team")
}

fn default_config_dir() -> PathBuf {
    PathBuf::from("content/config")
}

fn default_media_root() -> PathBuf {
    PathBuf::from("media")
}

fn default_media_url_prefix() -> String {
    "/media/".to_string()
}

/// Static export configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Directory receiving the JSON files
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    /// Directory receiving the mirrored media tree
    #[serde(default = "default_export_media_dir")]
    pub media_dir: PathBuf,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            media_dir: default_export_media_dir(),
        }
    }
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("public/api")
}

fn default_export_media_dir() -> PathBuf {
    PathBuf::from("public/media")
}

/// Admin configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminConfig {
    /// Bearer token for the build endpoint; the endpoint is closed when unset
    #[serde(default)]
    pub token: Option<String>,
    /// Username of the default internal author
    #[serde(default = "default_admin_username")]
    pub username: String,
    /// Email used when the default author has to be created
    #[serde(default = "default_admin_email")]
    pub email: String,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            token: None,
            username: default_admin_username(),
            email: default_admin_email(),
        }
    }
}

fn default_admin_username() -> String {
    "admin".to_string()
}

fn default_admin_email() -> String {
    "admin@gcadr.gnlu.ac.in".to_string()
}

/// Error type for configuration parsing
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    FileRead {
        path: String,
        source: std::io::Error,
    },
    #[error("Failed to parse config file '{path}': {message}")]
    ParseError { path: String, message: String },
}

impl Config {
    /// Load configuration from file
    ///
    /// If the file doesn't exist or is empty, returns default configuration.
    /// If the file exists but is invalid YAML, returns an error with details.
    pub fn load(path: &std::path::Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.display().to_string(),
            source: e,
        })?;

        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let config: Config =
            serde_yaml::from_str(&content).map_err(|e| ConfigError::ParseError {
                path: path.display().to_string(),
                message: format_yaml_error(&e),
            })?;

        Ok(config)
    }

    /// Load configuration from file with environment variable overrides
    ///
    /// Environment variables follow the pattern:
    /// - GCADR_SERVER_HOST
    /// - GCADR_SERVER_PORT
    /// - GCADR_SERVER_CORS_ORIGIN
    /// - GCADR_DATABASE_URL
    /// - GCADR_CONTENT_BLOG_DIR
    /// - GCADR_CONTENT_TEAM_DIR
    /// - GCADR_CONTENT_CONFIG_DIR
    /// - GCADR_CONTENT_MEDIA_ROOT
    /// - GCADR_EXPORT_OUTPUT_DIR
    /// - GCADR_EXPORT_MEDIA_DIR
    /// - GCADR_ADMIN_TOKEN
    pub fn load_with_env(path: &std::path::Path) -> anyhow::Result<Self> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(host) = std::env::var("GCADR_SERVER_HOST") {
            self.server.host = host;
        }
        if let Ok(port) = std::env::var("GCADR_SERVER_PORT") {
            if let Ok(port) = port.parse::<u16>() {
                self.server.port = port;
            }
        }
        if let Ok(cors_origin) = std::env::var("GCADR_SERVER_CORS_ORIGIN") {
            self.server.cors_origin = cors_origin;
        }

        if let Ok(url) = std::env::var("GCADR_DATABASE_URL") {
            self.database.url = url;
        }

        if let Ok(dir) = std::env::var("GCADR_CONTENT_BLOG_DIR") {
            self.content.blog_dir = PathBuf::from(dir);
        }
        if let Ok(dir) = std::env::var("GCADR_CONTENT_TEAM_DIR") {
            self.content.team_dir = PathBuf::from(dir);
        }
        if let Ok(dir) = std::env::var("GCADR_CONTENT_CONFIG_DIR") {
            self.content.config_dir = PathBuf::from(dir);
        }
        if let Ok(dir) = std::env::var("GCADR_CONTENT_MEDIA_ROOT") {
            self.content.media_root = PathBuf::from(dir);
        }

        if let Ok(dir) = std::env::var("GCADR_EXPORT_OUTPUT_DIR") {
            self.export.output_dir = PathBuf::from(dir);
        }
        if let Ok(dir) = std::env::var("GCADR_EXPORT_MEDIA_DIR") {
            self.export.media_dir = PathBuf::from(dir);
        }

        // Blank tokens leave the endpoint closed
        if let Ok(token) = std::env::var("GCADR_ADMIN_TOKEN") {
            if !token.trim().is_empty() {
                self.admin.token = Some(token);
            }
        }
    }
}

/// Format YAML parsing error with location and context
fn format_yaml_error(e: &serde_yaml::Error) -> String {
    if let Some(location) = e.location() {
        format!(
            "at line {}, column {}: {}",
            location.line(),
            location.column(),
            e
        )
    } else {
        e.to_string()
    }
}

// Shared mutex for all config tests that modify environment variables.
#[cfg(test)]
static CONFIG_ENV_MUTEX: std::sync::Mutex<()> = std::sync::Mutex::new(());

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn lock_env() -> std::sync::MutexGuard<'static, ()> {
        super::CONFIG_ENV_MUTEX
            .lock()
            .unwrap_or_else(|e| e.into_inner())
    }

    #[test]
    fn test_load_missing_file_returns_defaults() {
        let path = std::path::Path::new("nonexistent_config.yml");
        let config = Config::load(path).unwrap();

        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.database.url, "data/gcadr.db");
        assert_eq!(config.content.blog_dir, PathBuf::from("content/blogs"));
        assert_eq!(config.content.media_url_prefix, "/media/");
        assert_eq!(config.export.output_dir, PathBuf::from("public/api"));
        assert_eq!(config.export.media_dir, PathBuf::from("public/media"));
        assert_eq!(config.admin.username, "admin");
        assert!(config.admin.token.is_none());
    }

    #[test]
    fn test_load_empty_file_returns_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "").unwrap();

        let config = Config::load(file.path()).unwrap();

        assert_eq!(config.server.port, 8000);
        assert_eq!(config.content.team_dir, PathBuf::from("content/team"));
    }

    #[test]
    fn test_load_partial_config_fills_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "export:\n  output_dir: out/api\n").unwrap();

        let config = Config::load(file.path()).unwrap();

        assert_eq!(config.export.output_dir, PathBuf::from("out/api"));
        assert_eq!(config.export.media_dir, PathBuf::from("public/media"));
        assert_eq!(config.server.host, "0.0.0.0");
    }

    #[test]
    fn test_load_full_config() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
server:
  host: "127.0.0.1"
  port: 9000
database:
  url: "sqlite::memory:"
content:
  blog_dir: "../content/blogs"
  team_dir: "../content/team"
  config_dir: "../content/config"
  media_root: "backend/media"
  media_url_prefix: "/uploads/"
export:
  output_dir: "../public/api"
  media_dir: "../public/media"
admin:
  token: "s3cret"
  username: "editor"
  email: "editor@example.com"
"#
        )
        .unwrap();

        let config = Config::load(file.path()).unwrap();

        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.database.url, "sqlite::memory:");
        assert_eq!(config.content.config_dir, PathBuf::from("../content/config"));
        assert_eq!(config.content.media_root, PathBuf::from("backend/media"));
        assert_eq!(config.content.media_url_prefix, "/uploads/");
        assert_eq!(config.export.media_dir, PathBuf::from("../public/media"));
        assert_eq!(config.admin.token.as_deref(), Some("s3cret"));
        assert_eq!(config.admin.username, "editor");
    }

    #[test]
    fn test_load_invalid_yaml_returns_error() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "server:\n  port: not-a-number\n").unwrap();

        let err = Config::load(file.path()).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("Failed to parse config file"), "{}", message);
    }

    #[test]
    fn test_env_override() {
        let _guard = lock_env();
        std::env::set_var("GCADR_SERVER_PORT", "9100");
        std::env::set_var("GCADR_EXPORT_OUTPUT_DIR", "/tmp/gcadr-out");
        std::env::set_var("GCADR_ADMIN_TOKEN", "from-env");

        let config = Config::load_with_env(std::path::Path::new("nonexistent.yml")).unwrap();

        std::env::remove_var("GCADR_SERVER_PORT");
        std::env::remove_var("GCADR_EXPORT_OUTPUT_DIR");
        std::env::remove_var("GCADR_ADMIN_TOKEN");

        assert_eq!(config.server.port, 9100);
        assert_eq!(config.export.output_dir, PathBuf::from("/tmp/gcadr-out"));
        assert_eq!(config.admin.token.as_deref(), Some("from-env"));
    }

    #[test]
    fn test_env_override_invalid_port_ignored() {
        let _guard = lock_env();
        std::env::set_var("GCADR_SERVER_PORT", "not-a-port");

        let config = Config::load_with_env(std::path::Path::new("nonexistent.yml")).unwrap();

        std::env::remove_var("GCADR_SERVER_PORT");

        assert_eq!(config.server.port, 8000);
    }

    #[test]
    fn test_env_blank_token_ignored() {
        let _guard = lock_env();
        std::env::set_var("GCADR_ADMIN_TOKEN", "   ");

        let config = Config::load_with_env(std::path::Path::new("nonexistent.yml")).unwrap();

        std::env::remove_var("GCADR_ADMIN_TOKEN");

        assert!(config.admin.token.is_none());
    }
}
