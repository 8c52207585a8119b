//! Path parsing, template expansion and locale path resolution.
mod components;
mod resolver;
mod template;

pub use components::PathComponents;
pub use resolver::{
    resolve_absolute,
    resolve_path,
};
pub use template::expand;
