//! site-i18n
//!
//! Static site build plugin that forks content files into one localized copy
//! per locale, rewrites their output paths from a `:placeholder` template and
//! attaches `t` / `tt` / `tpath` helpers bound to each copy's locale.

pub mod bootstrap;
pub mod config;
pub mod file;
pub mod fork;
pub mod path;
pub mod pipeline;
pub mod translate;

pub use config::I18nSettings;
pub use file::{
    FileRecord,
    FileSet,
};
pub use fork::{
    ForkError,
    LocaleForker,
};
pub use pipeline::{
    Pipeline,
    Plugin,
};
