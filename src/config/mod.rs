//! Configuration APIs for huffpack
//!
//! The codec itself has almost nothing to tune: the Huffman construction is
//! fixed. What remains is operational policy for the encoder, captured in
//! [`CodecConfig`].
//!
//! # Environment Initialization
//!
//! ```rust
//! use huffpack::config::{CodecConfig, Config};
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // Reads HUFFPACK_MAX_INPUT_LEN and HUFFPACK_TRACE_CODE_TABLE
//! let config = CodecConfig::from_env()?;
//!
//! // Same fields under a custom prefix
//! let config = CodecConfig::from_env_with_prefix("MYAPP_")?;
//! # Ok(())
//! # }
//! ```

use crate::error::Result;
use std::env;
use std::fmt;
use std::path::Path;

pub mod codec;

pub use codec::CodecConfig;

/// Common configuration trait providing validation, environment
/// initialization and file persistence.
pub trait Config: Clone + fmt::Debug {
    /// Validate the configuration for correctness and consistency.
    fn validate(&self) -> Result<()>;

    /// Initialize configuration from environment variables with the
    /// `HUFFPACK_` prefix.
    fn from_env() -> Result<Self>
    where
        Self: Default,
    {
        Self::from_env_with_prefix("HUFFPACK_")
    }

    /// Initialize configuration from environment variables with a custom prefix.
    ///
    /// Unset or unparsable variables fall back to the default value.
    fn from_env_with_prefix(prefix: &str) -> Result<Self>
    where
        Self: Default;

    /// Save configuration to a JSON file.
    fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()>;

    /// Load and validate configuration from a JSON file.
    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self>;
}

/// Parse an environment variable, falling back to `default` when it is unset
/// or does not parse.
pub fn parse_env_var<T>(var_name: &str, default: T) -> T
where
    T: std::str::FromStr + Clone,
{
    env::var(var_name)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

/// Parse a boolean environment variable.
///
/// Accepts "true", "1", "yes", "on" (case-insensitive) as true, everything
/// else as false.
pub fn parse_env_bool(var_name: &str, default: bool) -> bool {
    env::var(var_name)
        .ok()
        .map(|s| {
            let s = s.to_lowercase();
            matches!(s.as_str(), "true" | "1" | "yes" | "on")
        })
        .unwrap_or(default)
}
