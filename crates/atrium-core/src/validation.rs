//! # Validation Module
//!
//! Field rules for customer records.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Flow                                    │
//! │                                                                         │
//! │  CustomerPayload                                                        │
//! │       │  Customer::from_payload / Customer::merge (normalize)          │
//! │       ▼                                                                 │
//! │  candidate Customer                                                     │
//! │       │  validate_customer ← THIS MODULE                               │
//! │       │  ├── name    : required, ≥ 2 chars                             │
//! │       │  ├── email   : required, syntax                                │
//! │       │  ├── taxId   : 11 ⇒ CPF, 14 ⇒ CNPJ, checksum                   │
//! │       │  └── phone   : 10 or 11 digits                                 │
//! │       ▼                                                                 │
//! │  Ok(()) or ValidationErrors (every violation, not just the first)      │
//! │                                                                         │
//! │  Uniqueness (email, id) is NOT checked here: it needs the collection   │
//! │  and runs inside the store's critical section.                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::{ValidationError, ValidationErrors, ValidationResult};
use crate::taxid::{classify, digits_only};
use crate::types::Customer;

/// Minimum customer name length (characters, after trimming).
pub const MIN_NAME_LEN: usize = 2;

/// Maximum customer name length.
pub const MAX_NAME_LEN: usize = 200;

/// Maximum email length (RFC 5321 path limit).
pub const MAX_EMAIL_LEN: usize = 254;

/// Maximum length of a client-supplied id.
pub const MAX_ID_LEN: usize = 64;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a customer name.
///
/// ## Rules
/// - Must not be empty after trimming
/// - Between 2 and 200 characters
///
/// ## Example
/// ```rust
/// use atrium_core::validation::validate_name;
///
/// assert!(validate_name("Maria Silva").is_ok());
/// assert!(validate_name(" A ").is_err());
/// assert!(validate_name("").is_err());
/// ```
pub fn validate_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::required("name"));
    }

    let len = name.chars().count();
    if len < MIN_NAME_LEN {
        return Err(ValidationError::TooShort {
            field: "name".to_string(),
            min: MIN_NAME_LEN,
        });
    }

    if len > MAX_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: MAX_NAME_LEN,
        });
    }

    Ok(())
}

/// Validates email syntax.
///
/// ## Rules
/// - Exactly one `@`, non-empty local part
/// - Domain has at least one dot, no empty labels
/// - No whitespace, at most 254 characters
///
/// ## Example
/// ```rust
/// use atrium_core::validation::validate_email;
///
/// assert!(validate_email("maria@example.com").is_ok());
/// assert!(validate_email("maria@example").is_err());
/// assert!(validate_email("").is_err());
/// ```
pub fn validate_email(email: &str) -> ValidationResult<()> {
    let email = email.trim();

    if email.is_empty() {
        return Err(ValidationError::required("email"));
    }

    if email.len() > MAX_EMAIL_LEN {
        return Err(ValidationError::TooLong {
            field: "email".to_string(),
            max: MAX_EMAIL_LEN,
        });
    }

    if email.chars().any(char::is_whitespace) {
        return Err(ValidationError::invalid_format(
            "email",
            "must not contain spaces",
        ));
    }

    let Some((local, domain)) = email.split_once('@') else {
        return Err(ValidationError::invalid_format("email", "missing @"));
    };

    if local.is_empty() || domain.contains('@') {
        return Err(ValidationError::invalid_format(
            "email",
            "must have the form name@domain",
        ));
    }

    if !domain.contains('.') || domain.split('.').any(str::is_empty) {
        return Err(ValidationError::invalid_format(
            "email",
            "domain must look like example.com",
        ));
    }

    Ok(())
}

/// Validates a phone number by digit count.
///
/// ## Rules
/// - 10 digits (landline with area code) or 11 digits (mobile with area code)
/// - Punctuation and spaces are ignored
///
/// ## Example
/// ```rust
/// use atrium_core::validation::validate_phone;
///
/// assert!(validate_phone("(11) 98765-4321").is_ok());
/// assert!(validate_phone("1134567890").is_ok());
/// assert!(validate_phone("98765-4321").is_err());
/// ```
pub fn validate_phone(phone: &str) -> ValidationResult<()> {
    let digits = digits_only(phone).len();

    if digits != 10 && digits != 11 {
        return Err(ValidationError::InvalidLength {
            field: "phone".to_string(),
            expected: "10 or 11".to_string(),
            actual: digits,
        });
    }

    Ok(())
}

/// Validates a CPF or CNPJ.
///
/// ## Rules
/// - Non-digits are stripped first
/// - 11 digits ⇒ CPF checksum, 14 digits ⇒ CNPJ checksum
/// - Any other digit count is an error
///
/// ## Example
/// ```rust
/// use atrium_core::validation::validate_tax_id;
///
/// assert!(validate_tax_id("111.444.777-35").is_ok());
/// assert!(validate_tax_id("11.222.333/0001-81").is_ok());
/// assert!(validate_tax_id("111.444.777-36").is_err());
/// assert!(validate_tax_id("12345").is_err());
/// ```
pub fn validate_tax_id(tax_id: &str) -> ValidationResult<()> {
    let digits = digits_only(tax_id);

    let Some(kind) = classify(&digits) else {
        return Err(ValidationError::InvalidLength {
            field: "taxId".to_string(),
            expected: "11 (CPF) or 14 (CNPJ)".to_string(),
            actual: digits.len(),
        });
    };

    if !kind.validate(&digits) {
        return Err(ValidationError::InvalidChecksum {
            field: "taxId".to_string(),
            kind: kind.to_string(),
        });
    }

    Ok(())
}

/// Validates a client-supplied customer id.
///
/// ## Rules
/// - Must not be empty
/// - At most 64 characters
/// - Letters, digits, hyphens and underscores only
pub fn validate_customer_id(id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::required("id"));
    }

    if id.len() > MAX_ID_LEN {
        return Err(ValidationError::TooLong {
            field: "id".to_string(),
            max: MAX_ID_LEN,
        });
    }

    if !id
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ValidationError::invalid_format(
            "id",
            "must contain only letters, numbers, hyphens, and underscores",
        ));
    }

    Ok(())
}

// =============================================================================
// Record Validator
// =============================================================================

/// Validates a normalized customer record, collecting every violation.
pub fn validate_customer(customer: &Customer) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();

    errors.check(validate_customer_id(&customer.id));
    errors.check(validate_name(&customer.name));
    errors.check(validate_email(&customer.email));

    if let Some(tax_id) = &customer.tax_id {
        errors.check(validate_tax_id(tax_id));
    }

    if let Some(phone) = &customer.phone {
        errors.check(validate_phone(phone));
    }

    errors.into_result()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CustomerDefaults;
    use crate::types::CustomerPayload;
    use chrono::Utc;

    fn build(payload: CustomerPayload) -> Customer {
        Customer::from_payload("CLTTEST", payload, &CustomerDefaults::default(), Utc::now())
    }

    #[test]
    fn test_validate_name() {
        assert!(validate_name("Jo").is_ok());
        assert!(validate_name("José").is_ok());
        assert!(validate_name("   ").is_err());
        assert!(validate_name("J").is_err());
        assert!(validate_name(&"A".repeat(201)).is_err());
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("a@b.co").is_ok());
        assert!(validate_email("first.last+tag@sub.example.com.br").is_ok());

        assert!(validate_email("no-at-sign").is_err());
        assert!(validate_email("@example.com").is_err());
        assert!(validate_email("a@@example.com").is_err());
        assert!(validate_email("a@example..com").is_err());
        assert!(validate_email("a@.example.com").is_err());
        assert!(validate_email("a b@example.com").is_err());
    }

    #[test]
    fn test_validate_phone() {
        assert!(validate_phone("11987654321").is_ok());
        assert!(validate_phone("+55 (11) 3456-7890").is_err());
        assert!(validate_phone("(11) 3456-7890").is_ok());
        assert!(validate_phone("123456789").is_err());
        assert!(validate_phone("123456789012").is_err());
    }

    #[test]
    fn test_validate_tax_id() {
        assert!(validate_tax_id("11144477735").is_ok());
        assert!(validate_tax_id("11222333000181").is_ok());

        let err = validate_tax_id("11111111111").unwrap_err();
        assert!(matches!(err, ValidationError::InvalidChecksum { .. }));

        let err = validate_tax_id("123456789012").unwrap_err();
        assert!(matches!(
            err,
            ValidationError::InvalidLength { actual: 12, .. }
        ));
    }

    #[test]
    fn test_validate_customer_id() {
        assert!(validate_customer_id("CLTLZ3K9Q2AB12C").is_ok());
        assert!(validate_customer_id("legacy_42-a").is_ok());
        assert!(validate_customer_id("").is_err());
        assert!(validate_customer_id("has space").is_err());
        assert!(validate_customer_id(&"X".repeat(65)).is_err());
    }

    #[test]
    fn test_validate_customer_ok() {
        let customer = build(CustomerPayload {
            tax_id: Some("111.444.777-35".to_string()),
            phone: Some("11987654321".to_string()),
            ..CustomerPayload::new("Maria Silva", "maria@example.com")
        });

        assert!(validate_customer(&customer).is_ok());
    }

    #[test]
    fn test_validate_customer_collects_all_errors() {
        let customer = build(CustomerPayload {
            tax_id: Some("123".to_string()),
            phone: Some("99".to_string()),
            ..Default::default()
        });

        let errors = validate_customer(&customer).unwrap_err();
        let fields: Vec<&str> = errors.errors().iter().map(|e| e.field()).collect();
        assert_eq!(fields, vec!["name", "email", "taxId", "phone"]);
    }

    #[test]
    fn test_non_digit_tax_id_is_reported() {
        let customer = build(CustomerPayload {
            tax_id: Some("abc".to_string()),
            ..CustomerPayload::new("Maria", "maria@example.com")
        });

        let errors = validate_customer(&customer).unwrap_err();
        assert_eq!(errors.errors()[0].field(), "taxId");
    }
}
