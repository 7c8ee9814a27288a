use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Opaque palette identifier backed by a 24-bit RGB value.
///
/// Two colors are the same entry iff their RGB values match; there is no
/// notion of "close" colors here.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color(u32);

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ColorParseError {
    #[error("empty color string")]
    Empty,
    #[error("invalid hex length {0} (expected RGB or RRGGBB)")]
    InvalidLength(usize),
    #[error("invalid hex digits in '{0}'")]
    InvalidHex(String),
}

impl Color {
    pub const fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Self(((r as u32) << 16) | ((g as u32) << 8) | b as u32)
    }

    /// `0xRRGGBB`; bits above 24 are dropped.
    pub const fn from_hex(hex: u32) -> Self {
        Self(hex & 0x00FF_FFFF)
    }

    pub const fn hex(self) -> u32 {
        self.0
    }

    pub const fn rgb(self) -> [u8; 3] {
        [(self.0 >> 16) as u8, (self.0 >> 8) as u8, self.0 as u8]
    }

    /// Parse `#RRGGBB`, `RRGGBB` or `#RGB`.
    pub fn parse(s: &str) -> Result<Self, ColorParseError> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(ColorParseError::Empty);
        }
        let digits = trimmed.strip_prefix('#').unwrap_or(trimmed);
        let nibble = |c: u8| -> Option<u32> {
            match c {
                b'0'..=b'9' => Some((c - b'0') as u32),
                b'a'..=b'f' => Some((c - b'a' + 10) as u32),
                b'A'..=b'F' => Some((c - b'A' + 10) as u32),
                _ => None,
            }
        };
        let bytes = digits.as_bytes();
        let invalid = || ColorParseError::InvalidHex(trimmed.to_string());
        match bytes.len() {
            3 => {
                let mut acc = 0u32;
                for &c in bytes {
                    let n = nibble(c).ok_or_else(invalid)?;
                    acc = (acc << 8) | (n * 17);
                }
                Ok(Self(acc))
            }
            6 => {
                let mut acc = 0u32;
                for &c in bytes {
                    acc = (acc << 4) | nibble(c).ok_or_else(invalid)?;
                }
                Ok(Self(acc))
            }
            0 => Err(ColorParseError::Empty),
            n => Err(ColorParseError::InvalidLength(n)),
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:06X}", self.0)
    }
}

impl FromStr for Color {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Color {
    type Error = ColorParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Color> for String {
    fn from(c: Color) -> Self {
        c.to_string()
    }
}
