//! Layered settings for playdeck.
//!
//! `schema` holds the `[audio]`, `[playback]`, `[controls]`, `[ui]`,
//! `[library]` and `[logging]` sections with their defaults; `load` merges
//! a TOML file and `PLAYDECK__` environment overrides on top and checks the
//! result.

mod load;
mod schema;

pub use load::{default_config_path, resolve_config_path};
pub use schema::*;

#[cfg(test)]
mod tests;
