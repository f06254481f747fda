//! Phone number type.
//!
//! Customers can be looked up by phone, and associates type numbers in
//! whatever format the customer reads out. The number keeps its display form
//! but compares on digits only.

use core::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Deserializer, Serialize};

/// Errors that can occur when parsing a [`Phone`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PhoneError {
    /// The input has no digits.
    #[error("phone number must contain digits")]
    NoDigits,
    /// The input has characters other than digits and separators.
    #[error("phone number contains invalid character {0:?}")]
    InvalidCharacter(char),
    /// Too few digits to be a phone number.
    #[error("phone number must have at least {min} digits")]
    TooShort {
        /// Minimum digit count.
        min: usize,
    },
}

/// A phone number, compared by its digits.
///
/// ```
/// use style_mingle_core::Phone;
///
/// let a = Phone::parse("555-123-4567").unwrap();
/// let b = Phone::parse("(555) 123 4567").unwrap();
/// assert_eq!(a, b);
/// assert_eq!(a.as_str(), "555-123-4567");
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(transparent)]
pub struct Phone {
    display: String,
    #[serde(skip)]
    digits: String,
}

impl Phone {
    /// Minimum number of digits accepted.
    pub const MIN_DIGITS: usize = 7;

    /// Parse a phone number.
    ///
    /// Accepts digits, spaces, `-`, `.`, `(`, `)` and a leading `+`.
    ///
    /// # Errors
    ///
    /// Returns an error if the input contains other characters or has fewer
    /// than [`Phone::MIN_DIGITS`] digits.
    pub fn parse(s: &str) -> Result<Self, PhoneError> {
        let display = s.trim();
        let mut digits = String::with_capacity(display.len());

        for (i, c) in display.char_indices() {
            match c {
                '0'..='9' => digits.push(c),
                ' ' | '-' | '.' | '(' | ')' => {}
                '+' if i == 0 => {}
                other => return Err(PhoneError::InvalidCharacter(other)),
            }
        }

        if digits.is_empty() {
            return Err(PhoneError::NoDigits);
        }
        if digits.len() < Self::MIN_DIGITS {
            return Err(PhoneError::TooShort {
                min: Self::MIN_DIGITS,
            });
        }

        Ok(Self {
            display: display.to_owned(),
            digits,
        })
    }

    /// The number as written in the catalog.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.display
    }

    /// Digits only, used for comparison.
    #[must_use]
    pub fn digits(&self) -> &str {
        &self.digits
    }
}

impl PartialEq for Phone {
    fn eq(&self, other: &Self) -> bool {
        self.digits == other.digits
    }
}

impl Eq for Phone {}

impl Hash for Phone {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.digits.hash(state);
    }
}

impl fmt::Display for Phone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display)
    }
}

impl std::str::FromStr for Phone {
    type Err = PhoneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl<'de> Deserialize<'de> for Phone {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}
