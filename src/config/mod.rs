//! Plugin configuration: settings, validation, loading and pattern matching.
/// Config file loader
mod loader;
/// File set pattern matcher
mod matcher;
/// Configuration types and settings
mod types;

pub use loader::{
    CONFIG_FILE_NAME,
    load_from_dir,
    load_from_file,
};
pub use matcher::{
    MatcherError,
    PatternMatcher,
};
pub use types::{
    ConfigError,
    I18nSettings,
    ValidationError,
};
