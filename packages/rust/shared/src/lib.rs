//! Shared types, error model, and configuration for llmsgen.
//!
//! This crate is the foundation depended on by all other llmsgen crates.
//! It provides:
//! - [`LlmsGenError`], the unified error type
//! - Domain types ([`ContentDescriptor`], [`Metadata`], [`SectionList`], [`Section`])
//! - Configuration ([`AppConfig`], [`TransformSpec`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, CONFIG_FILE_NAME, ContentConfig, FrontmatterConfig, OutputConfig, TransformSpec,
    init_config, load_config, load_config_from, to_toml,
};
pub use error::{LlmsGenError, Result};
pub use types::{
    ContentDescriptor, HeaderSection, LLMS_TXT_FILENAME, Link, LinkSection, Metadata, Section,
    SectionList,
};
