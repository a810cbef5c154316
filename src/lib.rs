//! GCADR CMS
//!
//! Content store, public API and the Markdown/YAML to static JSON pipeline
//! behind the GCADR website.

pub mod api;
pub mod config;
pub mod db;
pub mod models;
pub mod pipeline;
pub mod services;
