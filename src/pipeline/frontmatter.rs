//! Front-matter parsing
//!
//! A document may open with a `---` fenced YAML block. Parsing never fails:
//! anything that is not a well-formed mapping leaves the document untouched
//! with empty metadata. Typed extraction is a separate, fallible step.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_yaml::{Mapping, Value};

const FENCE: &str = "---";

/// Metadata mapping and body of a document
#[derive(Debug, Clone, PartialEq)]
pub struct FrontMatter {
    pub meta: Mapping,
    pub body: String,
}

impl FrontMatter {
    /// Deserialize the metadata into a typed struct
    pub fn extract<T: DeserializeOwned>(&self) -> Result<T, serde_yaml::Error> {
        serde_yaml::from_value(Value::Mapping(self.meta.clone()))
    }

    /// Whether the metadata carries `key`
    pub fn has_key(&self, key: &str) -> bool {
        self.meta.contains_key(key)
    }
}

/// Split `text` into front matter and body
pub fn parse(text: &str) -> FrontMatter {
    let untouched = || FrontMatter {
        meta: Mapping::new(),
        body: text.to_string(),
    };

    if !text.starts_with(FENCE) {
        return untouched();
    }

    let parts: Vec<&str> = text.splitn(3, FENCE).collect();
    if parts.len() < 3 {
        return untouched();
    }

    let body = parts[2].trim().to_string();
    match serde_yaml::from_str::<Value>(parts[1].trim()) {
        Ok(Value::Mapping(meta)) => FrontMatter { meta, body },
        Ok(Value::Null) => FrontMatter {
            meta: Mapping::new(),
            body,
        },
        Ok(_) => untouched(),
        Err(err) => {
            tracing::debug!("Ignoring malformed front matter: {}", err);
            untouched()
        }
    }
}

/// A field that may be written as a single value or a list
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

impl<T> OneOrMany<T> {
    pub fn into_vec(self) -> Vec<T> {
        match self {
            OneOrMany::Many(values) => values,
            OneOrMany::One(value) => vec![value],
        }
    }
}

/// Text form of a YAML scalar. Null and non-scalars yield `None`.
pub fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Deserialize an optional scalar (string, number or bool) as text.
///
/// Authors write `id: 7` as readily as `id: "7"`, and `title: 2024` should
/// not reject the whole row.
pub fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(value) => scalar_to_string(&value).map(Some).ok_or_else(|| {
            serde::de::Error::custom(format!("expected a scalar, found {:?}", value))
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize)]
    struct Meta {
        title: Option<String>,
        #[serde(default, deserialize_with = "lenient_string")]
        id: Option<String>,
        tags: Option<OneOrMany<String>>,
    }

    #[test]
    fn test_parse_with_front_matter() {
        let doc = "---\ntitle: Hello\ntags: [a, b]\n---\n\n# Body\n";
        let fm = parse(doc);
        assert_eq!(fm.body, "# Body");
        assert!(fm.has_key("title"));

        let meta: Meta = fm.extract().unwrap();
        assert_eq!(meta.title.as_deref(), Some("Hello"));
        assert_eq!(meta.tags.unwrap().into_vec(), vec!["a", "b"]);
    }

    #[test]
    fn test_parse_without_front_matter() {
        let doc = "Just text\n---\nmore";
        let fm = parse(doc);
        assert!(fm.meta.is_empty());
        assert_eq!(fm.body, doc);
    }

    #[test]
    fn test_parse_unclosed_fence() {
        let doc = "---\ntitle: Hello\n";
        let fm = parse(doc);
        assert!(fm.meta.is_empty());
        assert_eq!(fm.body, doc);
    }

    #[test]
    fn test_parse_invalid_yaml_is_fail_open() {
        let doc = "---\ntitle: [unclosed\n---\nBody";
        let fm = parse(doc);
        assert!(fm.meta.is_empty());
        assert_eq!(fm.body, doc);
    }

    #[test]
    fn test_parse_non_mapping_yaml() {
        let doc = "---\n- a\n- b\n---\nBody";
        let fm = parse(doc);
        assert!(fm.meta.is_empty());
        assert_eq!(fm.body, doc);
    }

    #[test]
    fn test_parse_empty_front_matter() {
        let fm = parse("---\n---\nBody text");
        assert!(fm.meta.is_empty());
        assert_eq!(fm.body, "Body text");
    }

    #[test]
    fn test_lenient_scalars_and_single_tag() {
        let fm = parse("---\nid: 42\ntags: solo\n---\n");
        let meta: Meta = fm.extract().unwrap();
        assert_eq!(meta.id.as_deref(), Some("42"));
        assert_eq!(meta.tags.unwrap().into_vec(), vec!["solo"]);
    }
}
