//! Configuration Types
//!
//! API and generation settings with startup validation. Invalid
//! configuration aborts before any file is touched.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::constants::generation;
use crate::types::{DocweaveError, Result};

/// Constraints applied when the caller supplies none.
pub fn default_constraints() -> Vec<String> {
    vec![
        "Don't respond with anything other than valid code".to_string(),
        r#"Strictly respond in Sphinx documentation format.
Here's an example that uses sphinx:

"""Summary line.

:param [ParamName]: [ParamDescription], defaults to [DefaultParamVal]
:type [ParamName]: [ParamType](, optional)
...
:raises [ErrorType]: [ErrorDescription]
...
:return: [ReturnDescription]
:rtype: [ReturnType]
"""

A pair of :param: and :type: directive options must be used for each parameter we wish to document. The :raises: option is used to describe any errors that are raised by the code, while the :return: and :rtype: options are used to describe any values returned by our code.

Note that the ... notation has been used above to indicate repetition and should not be used when generating actual docstrings.

If there're no params, ignore the params section.
If there're no returned objects, ignore the :return."#
            .to_string(),
        "Single line docstrings should not end with any spacing".to_string(),
    ]
}

/// Declaration names skipped by default. Dunder methods get documented at
/// the class level, not individually.
pub fn default_ignore_patterns() -> Vec<String> {
    vec!["__*__".to_string()]
}

// =============================================================================
// API Configuration
// =============================================================================

/// Endpoint settings for the generation provider.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// OpenAI-compatible API endpoint
    pub base_url: String,

    /// API key for authentication (never logged)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            api_key: None,
        }
    }
}

// Redact the API key in debug output
impl std::fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiConfig")
            .field("base_url", &self.base_url)
            .field(
                "api_key",
                &self.api_key.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}

// =============================================================================
// Generation Configuration
// =============================================================================

/// Settings for docstring generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Model identifier sent with every request
    #[serde(alias = "ai_model")]
    pub model: String,

    /// Context window size in tokens
    pub max_context: usize,

    /// Ordered instruction strings rendered into the system prompt
    pub constraints: Vec<String>,

    /// Glob patterns for declaration names that are never documented
    pub ignore_patterns: Vec<String>,

    /// Character cap for the user half of a prompt
    pub prompt_char_limit: usize,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            model: String::new(),
            max_context: generation::DEFAULT_MAX_CONTEXT,
            constraints: default_constraints(),
            ignore_patterns: default_ignore_patterns(),
            prompt_char_limit: generation::DEFAULT_PROMPT_CHAR_LIMIT,
        }
    }
}

// =============================================================================
// Root Configuration
// =============================================================================

/// Complete configuration combining API and generation settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DocweaveConfig {
    pub api: ApiConfig,
    pub generation: GenerationConfig,
}

impl DocweaveConfig {
    /// Validate configuration values.
    /// Returns `DocweaveError::Config` on the first violation.
    pub fn validate(&self) -> Result<()> {
        if self.api.base_url.is_empty() {
            return Err(DocweaveError::Config("Base URL is required".to_string()));
        }

        let parsed = Url::parse(&self.api.base_url).map_err(|_| {
            DocweaveError::Config(format!("Invalid base URL format: {}", self.api.base_url))
        })?;
        if !parsed.has_host() || parsed.scheme().is_empty() {
            return Err(DocweaveError::Config(format!(
                "Invalid base URL format: {}",
                self.api.base_url
            )));
        }

        if self.api.api_key.as_deref().is_none_or(str::is_empty) {
            return Err(DocweaveError::Config("API key required".to_string()));
        }

        if self.generation.model.is_empty() {
            return Err(DocweaveError::Config("AI model is required".to_string()));
        }

        if self.generation.constraints.is_empty() {
            return Err(DocweaveError::Config(
                "At least one constraint is required".to_string(),
            ));
        }

        if self.generation.max_context < 1 {
            return Err(DocweaveError::Config(
                "max_context must be positive".to_string(),
            ));
        }

        for pattern in &self.generation.ignore_patterns {
            glob::Pattern::new(pattern).map_err(|e| {
                DocweaveError::Config(format!("Invalid ignore pattern '{}': {}", pattern, e))
            })?;
        }

        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> DocweaveConfig {
        DocweaveConfig {
            api: ApiConfig {
                base_url: "http://localhost:11434/v1".to_string(),
                api_key: Some("ollama".to_string()),
            },
            generation: GenerationConfig {
                model: "phi4".to_string(),
                ..GenerationConfig::default()
            },
        }
    }

    #[test]
    fn test_valid_config_passes() {
        assert!(valid_config().validate().is_ok());
    }

    #[test]
    fn test_missing_base_url_rejected() {
        let mut config = valid_config();
        config.api.base_url = String::new();
        assert!(matches!(
            config.validate(),
            Err(DocweaveError::Config(msg)) if msg.contains("Base URL")
        ));
    }

    #[test]
    fn test_malformed_base_url_rejected() {
        let mut config = valid_config();
        config.api.base_url = "not a url".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_api_key_rejected() {
        let mut config = valid_config();
        config.api.api_key = None;
        assert!(matches!(
            config.validate(),
            Err(DocweaveError::Config(msg)) if msg.contains("API key")
        ));

        config.api.api_key = Some(String::new());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_model_rejected() {
        let mut config = valid_config();
        config.generation.model = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_empty_constraints_rejected() {
        let mut config = valid_config();
        config.generation.constraints.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_context_rejected() {
        let mut config = valid_config();
        config.generation.max_context = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_bad_ignore_pattern_rejected() {
        let mut config = valid_config();
        config.generation.ignore_patterns = vec!["[".to_string()];
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_api_key_redacted_in_debug() {
        let config = valid_config();
        let rendered = format!("{:?}", config.api);
        assert!(rendered.contains("[REDACTED]"));
        assert!(!rendered.contains("ollama"));
    }

    #[test]
    fn test_defaults() {
        let generation = GenerationConfig::default();
        assert_eq!(generation.max_context, 16_384);
        assert_eq!(generation.prompt_char_limit, 10_000);
        assert_eq!(generation.constraints.len(), 3);
        assert_eq!(generation.ignore_patterns, vec!["__*__".to_string()]);
    }

    #[test]
    fn test_ai_model_alias_accepted() {
        let yaml = "generation:\n  ai_model: phi4\n";
        let config: DocweaveConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.generation.model, "phi4");
    }
}
