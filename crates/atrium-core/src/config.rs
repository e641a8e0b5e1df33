//! # Customer Defaults
//!
//! Values given to profile attributes a create payload leaves unset.
//!
//! Every default lives here instead of inline in construction code, so a
//! deployment can change them from its config file:
//!
//! ```toml
//! [defaults]
//! status = "active"
//! country = "BR"
//! language = "pt-BR"
//! currency = "BRL"
//! visibility = "private"
//! ```

use serde::{Deserialize, Serialize};

/// Status given to new customers.
pub const ACTIVE_STATUS: &str = "active";

/// Defaults for optional customer attributes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerDefaults {
    /// Default: "active"
    #[serde(default = "default_status")]
    pub status: String,

    /// ISO 3166 code. Default: "BR"
    #[serde(default = "default_country")]
    pub country: String,

    /// Locale tag. Default: "pt-BR"
    #[serde(default = "default_language")]
    pub language: String,

    /// ISO 4217 code. Default: "BRL"
    #[serde(default = "default_currency")]
    pub currency: String,

    /// Default: "private"
    #[serde(default = "default_visibility")]
    pub visibility: String,
}

fn default_status() -> String {
    ACTIVE_STATUS.to_string()
}

fn default_country() -> String {
    "BR".to_string()
}

fn default_language() -> String {
    "pt-BR".to_string()
}

fn default_currency() -> String {
    "BRL".to_string()
}

fn default_visibility() -> String {
    "private".to_string()
}

impl Default for CustomerDefaults {
    fn default() -> Self {
        CustomerDefaults {
            status: default_status(),
            country: default_country(),
            language: default_language(),
            currency: default_currency(),
            visibility: default_visibility(),
        }
    }
}

impl CustomerDefaults {
    /// Names of defaults that are blank (a blank default would produce
    /// records with empty attributes).
    pub fn blank_fields(&self) -> Vec<&'static str> {
        [
            ("status", &self.status),
            ("country", &self.country),
            ("language", &self.language),
            ("currency", &self.currency),
            ("visibility", &self.visibility),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect()
    }
}
