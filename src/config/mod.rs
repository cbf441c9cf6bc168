//! Configuration module.
//!
//! Handles locating, parsing, and writing the TOML configuration file.

mod loader;
mod path;
mod schema;

pub use loader::{
    ConfigSource, EXTERNAL_DIR_ENV, LoadedConfig, load_config, locate_config, write_default_config,
};
pub use path::{CONFIG_ENV, default_config_path, home_dir, resolve_path};
pub use schema::{CameraConfig, GalleryConfig, NivasaConfig, StorageConfig};
