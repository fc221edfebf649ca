//! Provider Presets
//!
//! Ready-made endpoint/model combinations selectable by name. A preset
//! fills in whatever the command line leaves unspecified; validation takes
//! over after merging, so presets without a bundled key (everything except
//! ollama) still require one from the flag, the environment, or a config
//! file.

use std::collections::BTreeMap;

use crate::config::types::{ApiConfig, DocweaveConfig, GenerationConfig};
use crate::types::{DocweaveError, Result};

fn preset(
    base_url: &str,
    api_key: Option<&str>,
    model: &str,
    max_context: usize,
) -> DocweaveConfig {
    DocweaveConfig {
        api: ApiConfig {
            base_url: base_url.to_string(),
            api_key: api_key.map(str::to_string),
        },
        generation: GenerationConfig {
            model: model.to_string(),
            max_context,
            ..GenerationConfig::default()
        },
    }
}

pub fn ollama_preset() -> DocweaveConfig {
    preset("http://localhost:11434/v1", Some("ollama"), "phi4", 16_384)
}

pub fn openai_preset() -> DocweaveConfig {
    preset("https://api.openai.com/v1", None, "gpt-4o-mini", 16_384)
}

pub fn gemini_preset() -> DocweaveConfig {
    preset(
        "https://generativelanguage.googleapis.com/v1beta/openai/",
        None,
        "gemini-2.0-flash-exp",
        131_072,
    )
}

pub fn deepseek_preset() -> DocweaveConfig {
    preset("https://api.deepseek.com/v1", None, "deepseek-chat", 65_536)
}

/// Registry of named presets.
///
/// Ships the four built-ins; callers may register more. Names are unique.
pub struct PresetRegistry {
    presets: BTreeMap<String, DocweaveConfig>,
}

impl Default for PresetRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl PresetRegistry {
    pub fn new() -> Self {
        let mut presets = BTreeMap::new();
        presets.insert("ollama".to_string(), ollama_preset());
        presets.insert("openai".to_string(), openai_preset());
        presets.insert("gemini".to_string(), gemini_preset());
        presets.insert("deepseek".to_string(), deepseek_preset());
        Self { presets }
    }

    pub fn get(&self, name: &str) -> Result<&DocweaveConfig> {
        self.presets
            .get(name)
            .ok_or_else(|| DocweaveError::Config(format!("Unknown preset: {}", name)))
    }

    pub fn register(&mut self, name: &str, config: DocweaveConfig) -> Result<()> {
        if self.presets.contains_key(name) {
            return Err(DocweaveError::Config(format!(
                "Preset {} already exists",
                name
            )));
        }
        self.presets.insert(name.to_string(), config);
        Ok(())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.presets.keys().map(String::as_str)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_presets_present() {
        let registry = PresetRegistry::new();
        for name in ["ollama", "openai", "gemini", "deepseek"] {
            assert!(registry.get(name).is_ok(), "missing preset {}", name);
        }
    }

    #[test]
    fn test_ollama_preset_values() {
        let config = ollama_preset();
        assert_eq!(config.api.base_url, "http://localhost:11434/v1");
        assert_eq!(config.api.api_key.as_deref(), Some("ollama"));
        assert_eq!(config.generation.model, "phi4");
        assert_eq!(config.generation.max_context, 16_384);
        // The only preset that validates standalone: it bundles a key.
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_remote_presets_need_key() {
        for config in [openai_preset(), gemini_preset(), deepseek_preset()] {
            assert!(config.api.api_key.is_none());
            assert!(config.validate().is_err());
        }
    }

    #[test]
    fn test_gemini_context_size() {
        assert_eq!(gemini_preset().generation.max_context, 131_072);
        assert_eq!(deepseek_preset().generation.max_context, 65_536);
    }

    #[test]
    fn test_unknown_preset_rejected() {
        let registry = PresetRegistry::new();
        assert!(matches!(
            registry.get("mistral"),
            Err(DocweaveError::Config(msg)) if msg.contains("Unknown preset")
        ));
    }

    #[test]
    fn test_register_new_preset() {
        let mut registry = PresetRegistry::new();
        registry
            .register("local-vllm", preset("http://localhost:8000/v1", Some("x"), "llama3", 8192))
            .unwrap();
        assert_eq!(
            registry.get("local-vllm").unwrap().generation.model,
            "llama3"
        );
    }

    #[test]
    fn test_duplicate_registration_rejected() {
        let mut registry = PresetRegistry::new();
        let result = registry.register("ollama", ollama_preset());
        assert!(matches!(
            result,
            Err(DocweaveError::Config(msg)) if msg.contains("already exists")
        ));
    }
}
