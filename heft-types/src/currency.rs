//! ISO 4217 currency codes as carried in finance requests

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Mnemonics the terminal accepts by name, with their numeric codes
pub const ISO4217_CODES: &[(&str, &str)] = &[
    ("USD", "0840"),
    ("EUR", "0978"),
    ("GBP", "0826"),
    ("ISK", "0352"),
];

/// Numeric currency code, always four ASCII digits
///
/// Built either from a known mnemonic (`"USD"`) or from a literal
/// four-digit code (`"0840"`). The terminal receives it BCD-packed in
/// two bytes.
///
/// # Examples
///
/// ```
/// use heft_types::CurrencyCode;
///
/// let usd: CurrencyCode = "USD".parse().unwrap();
/// assert_eq!(usd.numeric(), "0840");
///
/// let literal = CurrencyCode::parse("0978").unwrap();
/// assert_eq!(literal.mnemonic(), Some("EUR"));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CurrencyCode([u8; 4]);

impl CurrencyCode {
    /// Number of digits in a numeric code
    pub const DIGITS: usize = 4;

    /// Resolve a mnemonic or a literal numeric code
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] when `code` is neither a known mnemonic
    /// nor exactly four decimal digits.
    pub fn parse(code: &str) -> Result<Self> {
        let numeric = ISO4217_CODES
            .iter()
            .find(|(name, _)| *name == code)
            .map(|(_, numeric)| *numeric)
            .unwrap_or(code);

        let bytes: [u8; 4] = numeric
            .as_bytes()
            .try_into()
            .map_err(|_| Error::Validation(format!("invalid currency code: {code:?}")))?;

        if !bytes.iter().all(u8::is_ascii_digit) {
            return Err(Error::Validation(format!(
                "currency code must be numeric: {code:?}"
            )));
        }

        Ok(Self(bytes))
    }

    /// The four-digit numeric code
    pub fn numeric(&self) -> &str {
        // Only ASCII digits are ever stored
        std::str::from_utf8(&self.0).unwrap_or_default()
    }

    /// The mnemonic for this code, if it is one of the named currencies
    pub fn mnemonic(&self) -> Option<&'static str> {
        ISO4217_CODES
            .iter()
            .find(|(_, numeric)| numeric.as_bytes() == &self.0[..])
            .map(|(name, _)| *name)
    }
}

impl FromStr for CurrencyCode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.mnemonic() {
            Some(name) => write!(f, "{}({})", name, self.numeric()),
            None => f.write_str(self.numeric()),
        }
    }
}
