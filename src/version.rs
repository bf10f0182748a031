//! Three-part `major.minor.patch` version numbers.
//!
//! Only the numeric core of semantic versioning is supported: no
//! pre-release or build metadata.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::types::OrderedValue;

/// Errors produced when parsing a [`Version`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VersionError {
    #[error("failed to parse version: empty input")]
    EmptyInput,

    #[error("failed to parse version '{input}': expected 3 sections in 'major.minor.patch' format but found {found}")]
    WrongSectionCount { input: String, found: usize },

    #[error("failed to parse version '{input}': section '{section}' contains a non-digit character")]
    NonDigitCharacter { input: String, section: String },

    #[error("failed to parse version '{input}': section '{section}' has a leading zero")]
    LeadingZero { input: String, section: String },

    #[error("failed to parse version '{input}': section '{section}' is too large")]
    Overflow { input: String, section: String },
}

/// A `major.minor.patch` version. Ordered lexicographically, major first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Version {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
}

impl Version {
    /// `0.0.0`, the zero value. Records must not carry it.
    pub const EMPTY: Version = Version::new(0, 0, 0);

    #[must_use]
    pub const fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// Parse `major.minor.patch`. Each section must be digits only, without a
    /// leading zero unless the section is exactly `0`.
    ///
    /// # Errors
    ///
    /// Returns a [`VersionError`] naming the offending section.
    pub fn parse(input: &str) -> Result<Self, VersionError> {
        if input.is_empty() {
            return Err(VersionError::EmptyInput);
        }

        let sections: Vec<&str> = input.split('.').collect();
        let [major, minor, patch] = sections.as_slice() else {
            return Err(VersionError::WrongSectionCount {
                input: input.to_owned(),
                found: sections.len(),
            });
        };

        Ok(Version {
            major: parse_section(input, major)?,
            minor: parse_section(input, minor)?,
            patch: parse_section(input, patch)?,
        })
    }
}

fn parse_section(input: &str, section: &str) -> Result<u64, VersionError> {
    if section.is_empty() || !section.bytes().all(|b| b.is_ascii_digit()) {
        return Err(VersionError::NonDigitCharacter {
            input: input.to_owned(),
            section: section.to_owned(),
        });
    }
    if section.len() > 1 && section.starts_with('0') {
        return Err(VersionError::LeadingZero {
            input: input.to_owned(),
            section: section.to_owned(),
        });
    }
    section.parse().map_err(|_| VersionError::Overflow {
        input: input.to_owned(),
        section: section.to_owned(),
    })
}

impl FromStr for Version {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Version::parse(s)
    }
}

impl OrderedValue for Version {
    fn less_than(&self, other: &Self) -> bool {
        self < other
    }

    fn greater_than(&self, other: &Self) -> bool {
        self > other
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Version {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Version {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = <String as serde::Deserialize>::deserialize(deserializer)?;
        Version::parse(&text).map_err(serde::de::Error::custom)
    }
}
