//! Configuration for entlink.
//!
//! Loads TOML configuration with layered resolution:
//! 1. User config dir (`~/.config/entlink/config.toml`, or `ENTLINK_CONFIG_DIR`)
//! 2. Project-local (`./entlink.toml`)
//! 3. CLI flags (applied by the binary)
//!
//! and converts it into the validated value objects the linker consumes:
//! [`TextProcessingConfig`](entlink_nlp::TextProcessingConfig),
//! [`EntityLinkerConfig`](entlink_linker::EntityLinkerConfig) and
//! [`FieldMapping`](entlink_search::FieldMapping).

pub mod discovery;
pub mod error;
pub mod types;

pub use discovery::{
    ConfigLayer, LayerStatus, LoadedConfig, discover, load_config, load_config_file,
    user_config_dir,
};
pub use error::{ConfigError, Result};
pub use types::{EntlinkConfig, LinkerSection, SearchSection, TextProcessingSection};
