//! Validation configuration.
//!
//! Descriptor construction validates by default. Hot dispatch paths that have
//! already filtered symbolic tensors can switch validation off process-wide
//! with an environment variable, keeping only debug assertions.

use std::sync::OnceLock;

use crate::TensorMeta;
use crate::error::Result;

/// Environment variable controlling [`Validation::from_env`].
pub const VALIDATION_ENV: &str = "TENSORKEY_VALIDATION";

/// How descriptor constructors check their inputs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Validation {
    /// Reject symbolic or malformed descriptors with an error (default).
    #[default]
    Checked,

    /// Skip runtime checks. Debug builds still assert; release builds accept
    /// anything and equality/hashing of invalid descriptors is unspecified.
    Unchecked,
}

impl Validation {
    /// Parse a setting value.
    ///
    /// * `on`, `checked`, `1`, `true` - [`Validation::Checked`]
    /// * `off`, `unchecked`, `0`, `false` - [`Validation::Unchecked`]
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "on" | "checked" | "1" | "true" => Some(Self::Checked),
            "off" | "unchecked" | "0" | "false" => Some(Self::Unchecked),
            _ => None,
        }
    }

    /// Read the setting from environment variables.
    ///
    /// # Environment Variables
    ///
    /// * `TENSORKEY_VALIDATION` - `off` to disable validation (default: checked)
    pub fn from_env() -> Self {
        match std::env::var(VALIDATION_ENV) {
            Ok(value) => Self::parse(&value).unwrap_or_else(|| {
                tracing::warn!(env = VALIDATION_ENV, value = %value, "unrecognized validation setting, using checked");
                Self::Checked
            }),
            Err(_) => Self::Checked,
        }
    }

    /// Process-wide setting, read from the environment once.
    pub fn global() -> Self {
        static GLOBAL: OnceLock<Validation> = OnceLock::new();

        *GLOBAL.get_or_init(|| {
            let validation = Self::from_env();
            if validation == Self::Unchecked {
                tracing::warn!("tensor metadata validation disabled, symbolic shapes will not be rejected");
            }
            validation
        })
    }

    pub fn is_checked(&self) -> bool {
        matches!(self, Self::Checked)
    }

    /// Apply this setting to a freshly built descriptor.
    pub fn check(&self, meta: &TensorMeta) -> Result<()> {
        match self {
            Self::Checked => meta.validate(),
            Self::Unchecked => {
                meta.debug_assert_supported();
                Ok(())
            }
        }
    }
}
