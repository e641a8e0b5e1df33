//! # Tax Identifier Checksums
//!
//! CPF (individuals, 11 digits) and CNPJ (companies, 14 digits) validation.
//!
//! ## Layout
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Brazilian Tax Identifiers                            │
//! │                                                                         │
//! │  CPF   1 1 1 . 4 4 4 . 7 7 7 - 3 5                                      │
//! │        └─────── base (9) ─────┘  └┴── check digits (2)                  │
//! │                                                                         │
//! │  CNPJ  1 1 . 2 2 2 . 3 3 3 / 0 0 0 1 - 8 1                              │
//! │        └───── base (8) ─────┘ └branch┘  └┴── check digits (2)          │
//! │                                                                         │
//! │  Both check digits are weighted sums mod 11 over the preceding digits. │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every function here is pure and total. The validators take digit-only
//! strings; callers strip punctuation with [`digits_only`] and pick the
//! algorithm with [`classify`] before calling.

use serde::{Deserialize, Serialize};

/// CPF length in digits.
pub const CPF_LEN: usize = 11;

/// CNPJ length in digits.
pub const CNPJ_LEN: usize = 14;

/// CNPJ weights for the first check digit.
const CNPJ_W1: [u32; 12] = [5, 4, 3, 2, 9, 8, 7, 6, 5, 4, 3, 2];

/// CNPJ weights for the second check digit.
const CNPJ_W2: [u32; 13] = [6, 5, 4, 3, 2, 9, 8, 7, 6, 5, 4, 3, 2];

// =============================================================================
// Kind
// =============================================================================

/// Which identifier a digit string is, judged by its length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaxIdKind {
    /// Individual taxpayer (11 digits).
    Cpf,
    /// Business taxpayer (14 digits).
    Cnpj,
}

impl TaxIdKind {
    /// Validates `digits` with this kind's algorithm.
    pub fn validate(&self, digits: &str) -> bool {
        match self {
            TaxIdKind::Cpf => validate_cpf(digits),
            TaxIdKind::Cnpj => validate_cnpj(digits),
        }
    }
}

impl std::fmt::Display for TaxIdKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TaxIdKind::Cpf => write!(f, "CPF"),
            TaxIdKind::Cnpj => write!(f, "CNPJ"),
        }
    }
}

/// Picks CPF or CNPJ from the digit count; `None` for any other length.
///
/// ## Example
/// ```rust
/// use atrium_core::taxid::{classify, TaxIdKind};
///
/// assert_eq!(classify("11144477735"), Some(TaxIdKind::Cpf));
/// assert_eq!(classify("11222333000181"), Some(TaxIdKind::Cnpj));
/// assert_eq!(classify("123"), None);
/// ```
pub fn classify(digits: &str) -> Option<TaxIdKind> {
    match digits.len() {
        CPF_LEN => Some(TaxIdKind::Cpf),
        CNPJ_LEN => Some(TaxIdKind::Cnpj),
        _ => None,
    }
}

/// Removes every non-digit character.
///
/// ## Example
/// ```rust
/// use atrium_core::taxid::digits_only;
///
/// assert_eq!(digits_only("111.444.777-35"), "11144477735");
/// assert_eq!(digits_only("(11) 98765-4321"), "11987654321");
/// ```
pub fn digits_only(input: &str) -> String {
    input.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Converts an all-digit string into digit values, or `None` if the length
/// is wrong or a non-digit is present.
fn to_digits(input: &str, len: usize) -> Option<Vec<u32>> {
    if input.len() != len {
        return None;
    }
    input.chars().map(|c| c.to_digit(10)).collect()
}

// =============================================================================
// CPF
// =============================================================================

/// Computes one CPF check digit over `base` (weights `len+1` down to 2).
fn cpf_digit(base: &[u32]) -> u32 {
    let t = base.len() as u32;
    let sum: u32 = base
        .iter()
        .enumerate()
        .map(|(c, d)| d * (t + 1 - c as u32))
        .sum();
    ((10 * sum) % 11) % 10
}

/// Returns the two CPF check digits for a 9-digit base.
///
/// ## Example
/// ```rust
/// use atrium_core::taxid::cpf_check_digits;
///
/// assert_eq!(cpf_check_digits([1, 1, 1, 4, 4, 4, 7, 7, 7]), [3, 5]);
/// ```
pub fn cpf_check_digits(base: [u8; 9]) -> [u8; 2] {
    let mut digits: Vec<u32> = base.iter().map(|&d| u32::from(d)).collect();
    let first = cpf_digit(&digits);
    digits.push(first);
    let second = cpf_digit(&digits);
    [first as u8, second as u8]
}

/// Validates an 11-digit CPF.
///
/// ## Rules
/// - All eleven digits identical ⇒ invalid ("00000000000", "11111111111", ...)
/// - For t in {9, 10}: weighted sum of the first t digits with weights
///   t+1 down to 2; `((10 * sum) % 11) % 10` must equal digit t
///
/// ## Example
/// ```rust
/// use atrium_core::taxid::validate_cpf;
///
/// assert!(validate_cpf("11144477735"));
/// assert!(!validate_cpf("11111111111"));
/// assert!(!validate_cpf("11144477736"));
/// ```
pub fn validate_cpf(digits: &str) -> bool {
    let Some(d) = to_digits(digits, CPF_LEN) else {
        return false;
    };

    if d.iter().all(|&x| x == d[0]) {
        return false;
    }

    (9..=10).all(|t| cpf_digit(&d[..t]) == d[t])
}

// =============================================================================
// CNPJ
// =============================================================================

/// Computes one CNPJ check digit: `0` if the remainder is below 2, else
/// `11 - remainder`.
fn cnpj_digit(digits: &[u32], weights: &[u32]) -> u32 {
    let sum: u32 = digits.iter().zip(weights).map(|(d, w)| d * w).sum();
    let remainder = sum % 11;
    if remainder < 2 {
        0
    } else {
        11 - remainder
    }
}

/// Returns the two CNPJ check digits for a 12-digit base.
///
/// ## Example
/// ```rust
/// use atrium_core::taxid::cnpj_check_digits;
///
/// assert_eq!(cnpj_check_digits([1, 1, 2, 2, 2, 3, 3, 3, 0, 0, 0, 1]), [8, 1]);
/// ```
pub fn cnpj_check_digits(base: [u8; 12]) -> [u8; 2] {
    let mut digits: Vec<u32> = base.iter().map(|&d| u32::from(d)).collect();
    let first = cnpj_digit(&digits, &CNPJ_W1);
    digits.push(first);
    let second = cnpj_digit(&digits, &CNPJ_W2);
    [first as u8, second as u8]
}

/// Validates a 14-digit CNPJ.
///
/// ## Rules
/// - First check digit: digits[0..12) against `W1`, must equal digits[12]
/// - Second check digit: digits[0..13) against `W2`, must equal digits[13]
///
/// ## Example
/// ```rust
/// use atrium_core::taxid::validate_cnpj;
///
/// assert!(validate_cnpj("11222333000181"));
/// assert!(!validate_cnpj("11222333000182"));
/// ```
pub fn validate_cnpj(digits: &str) -> bool {
    let Some(d) = to_digits(digits, CNPJ_LEN) else {
        return false;
    };

    cnpj_digit(&d[..12], &CNPJ_W1) == d[12] && cnpj_digit(&d[..13], &CNPJ_W2) == d[13]
}

// =============================================================================
// Display
// =============================================================================

/// Applies the conventional display mask to a digit-only identifier.
///
/// ## Example
/// ```rust
/// use atrium_core::taxid::format_tax_id;
///
/// assert_eq!(format_tax_id("11144477735").as_deref(), Some("111.444.777-35"));
/// assert_eq!(format_tax_id("11222333000181").as_deref(), Some("11.222.333/0001-81"));
/// assert_eq!(format_tax_id("12345"), None);
/// ```
pub fn format_tax_id(digits: &str) -> Option<String> {
    if !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    match classify(digits)? {
        TaxIdKind::Cpf => Some(format!(
            "{}.{}.{}-{}",
            &digits[0..3],
            &digits[3..6],
            &digits[6..9],
            &digits[9..11]
        )),
        TaxIdKind::Cnpj => Some(format!(
            "{}.{}.{}/{}-{}",
            &digits[0..2],
            &digits[2..5],
            &digits[5..8],
            &digits[8..12],
            &digits[12..14]
        )),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
