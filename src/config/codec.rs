//! Encoder policy configuration.

use super::{parse_env_bool, parse_env_var, Config};
use crate::error::{HuffpackError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration for [`HuffmanEncoder`](crate::entropy::HuffmanEncoder).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodecConfig {
    /// Largest input, in bytes, the encoder accepts
    pub max_input_len: usize,
    /// Log the per-symbol code table at trace level after each build
    pub trace_code_table: bool,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            max_input_len: usize::MAX,
            trace_code_table: false,
        }
    }
}

impl CodecConfig {
    /// Configuration that rejects inputs longer than `limit` bytes.
    pub fn bounded(limit: usize) -> Self {
        Self {
            max_input_len: limit,
            ..Default::default()
        }
    }

    /// Enable or disable code table tracing.
    pub fn with_trace_code_table(mut self, enabled: bool) -> Self {
        self.trace_code_table = enabled;
        self
    }
}

impl Config for CodecConfig {
    fn validate(&self) -> Result<()> {
        if self.max_input_len == 0 {
            return Err(HuffpackError::configuration(
                "max_input_len must be at least 1",
            ));
        }
        Ok(())
    }

    fn from_env_with_prefix(prefix: &str) -> Result<Self> {
        let mut config = Self::default();
        config.max_input_len =
            parse_env_var(&format!("{}MAX_INPUT_LEN", prefix), config.max_input_len);
        config.trace_code_table =
            parse_env_bool(&format!("{}TRACE_CODE_TABLE", prefix), config.trace_code_table);
        config.validate()?;
        Ok(config)
    }

    fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let serialized = serde_json::to_string_pretty(self).map_err(|e| {
            HuffpackError::configuration(format!("Failed to serialize codec config: {}", e))
        })?;
        std::fs::write(path, serialized)?;
        Ok(())
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content).map_err(|e| {
            HuffpackError::configuration(format!("Failed to parse codec config file: {}", e))
        })?;
        config.validate()?;
        Ok(config)
    }
}
