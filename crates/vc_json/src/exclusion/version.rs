use alloc::string::String;
use alloc::vec::Vec;
use core::cmp::Ordering;
use core::fmt;

use crate::{Error, Result};

/// A dotted numeric version, e.g. `1.10.2`.
///
/// Missing trailing components compare as zero, so `1.0` equals `1`.
#[derive(Debug, Clone, Eq)]
pub struct Version {
    parts: Vec<u64>,
    text: String,
}

impl Version {
    /// Parses a version string.
    ///
    /// # Examples
    ///
    /// ```
    /// use vc_json::exclusion::Version;
    ///
    /// let a = Version::parse("1.2").unwrap();
    /// let b = Version::parse("1.10").unwrap();
    /// assert!(a < b);
    /// assert_eq!(Version::parse("2").unwrap(), Version::parse("2.0.0").unwrap());
    /// assert!(Version::parse("1.x").is_err());
    /// ```
    pub fn parse(text: &str) -> Result<Self> {
        let trimmed = text.trim();
        let parts = trimmed
            .split('.')
            .map(|part| part.parse::<u64>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| Error::config(alloc::format!("invalid version `{text}`")))?;

        Ok(Self {
            parts,
            text: String::from(trimmed),
        })
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.text
    }

    fn part(&self, index: usize) -> u64 {
        self.parts.get(index).copied().unwrap_or(0)
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl PartialOrd for Version {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        let len = self.parts.len().max(other.parts.len());
        (0..len)
            .map(|index| self.part(index).cmp(&other.part(index)))
            .find(|ordering| ordering.is_ne())
            .unwrap_or(Ordering::Equal)
    }
}

impl fmt::Display for Version {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}
