//! # Domain Types
//!
//! The customer record and the payload used to create or update it.
//!
//! ## Type Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌──────────────────────┐            ┌──────────────────────┐          │
//! │  │   CustomerPayload    │  create →  │       Customer       │          │
//! │  │  ──────────────────  │  merge  →  │  ──────────────────  │          │
//! │  │  every field Option  │            │  id (CLT...)         │          │
//! │  │  None = not supplied │            │  name, email         │          │
//! │  └──────────────────────┘            │  taxId?, phone?      │          │
//! │                                      │  profile attributes  │          │
//! │                                      │  createdAt/updatedAt │          │
//! │                                      └──────────────────────┘          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Normalization
//! Values are normalized when they enter a `Customer` (trimmed name,
//! lowercase email, digit-only tax id). Validation then runs on the
//! normalized record, see [`crate::validation::validate_customer`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::config::CustomerDefaults;
use crate::taxid::digits_only;

// =============================================================================
// Customer
// =============================================================================

/// A persisted customer record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    /// External identifier, immutable once assigned.
    pub id: String,

    /// Display name (trimmed, at least 2 characters).
    pub name: String,

    /// Lowercased email, unique across the collection.
    pub email: String,

    /// CPF (11 digits) or CNPJ (14 digits), digits only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tax_id: Option<String>,

    /// Phone as entered; 10 or 11 digits once punctuation is removed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,

    /// Role at the company.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,

    /// ISO 3166 country code.
    pub country: String,

    /// Locale tag, e.g. "pt-BR".
    pub language: String,

    /// ISO 4217 currency code.
    pub currency: String,

    #[serde(default)]
    pub groups: Vec<String>,

    #[serde(default)]
    pub tags: Vec<String>,

    /// Lifecycle status, "active" unless set otherwise.
    pub status: String,

    /// Who may see the record ("private", "team", ...).
    pub visibility: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    /// When the customer was created.
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    /// When the customer was last written.
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Customer {
    /// Builds a new record from a create payload.
    ///
    /// ## Rules
    /// - Unset profile attributes take their value from `defaults`
    /// - `createdAt` is the client value if supplied, else `now`
    /// - `updatedAt` is never earlier than `createdAt`
    ///
    /// No validation happens here; the caller validates the result.
    pub fn from_payload(
        id: impl Into<String>,
        payload: CustomerPayload,
        defaults: &CustomerDefaults,
        now: DateTime<Utc>,
    ) -> Self {
        let created_at = payload.created_at.unwrap_or(now);

        Customer {
            id: id.into(),
            name: payload.name.as_deref().map(normalize_name).unwrap_or_default(),
            email: payload
                .email
                .as_deref()
                .map(normalize_email)
                .unwrap_or_default(),
            tax_id: payload.tax_id.as_deref().and_then(normalize_tax_id),
            phone: payload.phone.as_deref().and_then(normalize_optional),
            company: payload.company.as_deref().and_then(normalize_optional),
            position: payload.position.as_deref().and_then(normalize_optional),
            address: payload.address.as_deref().and_then(normalize_optional),
            city: payload.city.as_deref().and_then(normalize_optional),
            state: payload.state.as_deref().and_then(normalize_optional),
            postal_code: payload.postal_code.as_deref().and_then(normalize_optional),
            country: or_default(payload.country, &defaults.country),
            language: or_default(payload.language, &defaults.language),
            currency: or_default(payload.currency, &defaults.currency),
            groups: payload.groups.unwrap_or_default(),
            tags: payload.tags.unwrap_or_default(),
            status: or_default(payload.status, &defaults.status),
            visibility: or_default(payload.visibility, &defaults.visibility),
            notes: payload.notes.as_deref().and_then(normalize_optional),
            created_at,
            updated_at: now.max(created_at),
        }
    }

    /// Shallow-merges the supplied fields of `payload` over this record.
    ///
    /// Fields the payload leaves as `None` are untouched. `id` and
    /// `createdAt` are immutable and ignored if present. An empty string for
    /// an optional attribute clears it. `updatedAt` moves forward to `now`
    /// and never backwards.
    pub fn merge(&mut self, payload: CustomerPayload, now: DateTime<Utc>) {
        if let Some(name) = payload.name {
            self.name = normalize_name(&name);
        }
        if let Some(email) = payload.email {
            self.email = normalize_email(&email);
        }
        if let Some(tax_id) = payload.tax_id {
            self.tax_id = normalize_tax_id(&tax_id);
        }

        merge_optional(&mut self.phone, payload.phone);
        merge_optional(&mut self.company, payload.company);
        merge_optional(&mut self.position, payload.position);
        merge_optional(&mut self.address, payload.address);
        merge_optional(&mut self.city, payload.city);
        merge_optional(&mut self.state, payload.state);
        merge_optional(&mut self.postal_code, payload.postal_code);
        merge_optional(&mut self.notes, payload.notes);

        merge_required(&mut self.country, payload.country);
        merge_required(&mut self.language, payload.language);
        merge_required(&mut self.currency, payload.currency);
        merge_required(&mut self.status, payload.status);
        merge_required(&mut self.visibility, payload.visibility);

        if let Some(groups) = payload.groups {
            self.groups = groups;
        }
        if let Some(tags) = payload.tags {
            self.tags = tags;
        }

        self.updated_at = now.max(self.updated_at).max(self.created_at);
    }
}

// =============================================================================
// Customer Payload
// =============================================================================

/// Input for create and update.
///
/// `None` means "not supplied". On create, missing required fields are
/// reported by validation; on update, missing fields keep their value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase", default)]
pub struct CustomerPayload {
    /// Client-chosen id (create only).
    pub id: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub tax_id: Option<String>,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub position: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub postal_code: Option<String>,
    pub country: Option<String>,
    pub language: Option<String>,
    pub currency: Option<String>,
    pub groups: Option<Vec<String>>,
    pub tags: Option<Vec<String>>,
    pub status: Option<String>,
    pub visibility: Option<String>,
    pub notes: Option<String>,
    /// Client-supplied creation time (create only).
    #[ts(as = "Option<String>")]
    pub created_at: Option<DateTime<Utc>>,
}

impl CustomerPayload {
    /// Payload with just the two required fields, handy for builders.
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        CustomerPayload {
            name: Some(name.into()),
            email: Some(email.into()),
            ..Default::default()
        }
    }

    /// Returns true if the payload changes `email` relative to `current`.
    pub fn changes_email(&self, current: &str) -> bool {
        self.email
            .as_deref()
            .is_some_and(|email| normalize_email(email) != current)
    }
}

// =============================================================================
// Normalization Helpers
// =============================================================================

/// Trims a name.
pub fn normalize_name(name: &str) -> String {
    name.trim().to_string()
}

/// Trims and lowercases an email.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Strips a tax id to digits; blank input means "no tax id".
///
/// Non-blank input without digits becomes `Some("")` so validation still
/// reports it.
pub fn normalize_tax_id(tax_id: &str) -> Option<String> {
    let trimmed = tax_id.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(digits_only(trimmed))
    }
}

fn normalize_optional(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn or_default(value: Option<String>, default: &str) -> String {
    value
        .as_deref()
        .and_then(normalize_optional)
        .unwrap_or_else(|| default.to_string())
}

fn merge_optional(slot: &mut Option<String>, value: Option<String>) {
    if let Some(value) = value {
        *slot = normalize_optional(&value);
    }
}

/// Blank values are ignored for attributes that always carry a value.
fn merge_required(slot: &mut String, value: Option<String>) {
    if let Some(value) = value.as_deref().and_then(normalize_optional) {
        *slot = value;
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
