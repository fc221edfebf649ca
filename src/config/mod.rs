//! Configuration Management
//!
//! Unified configuration system with hierarchical resolution:
//! 1. Built-in defaults
//! 2. Configuration file (.docweave.yml and friends, or --config)
//! 3. Preset (--ollama, --openai, --gemini, --deepseek)
//! 4. CLI arguments (highest priority)

mod loader;
mod parser;
mod presets;
mod types;

pub use loader::{ConfigOverrides, ConfigurationManager};
pub use parser::{ConfigParser, TomlConfigParser, YamlConfigParser};
pub use presets::PresetRegistry;
pub use types::*;
