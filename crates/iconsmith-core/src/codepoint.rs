//! Unicode codepoints and sequential allocation.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// A Unicode scalar value assigned to one glyph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Codepoint(u32);

impl Codepoint {
    /// Create a codepoint, rejecting surrogates and values past U+10FFFF.
    pub fn new(value: u32) -> Result<Self> {
        if value > char::MAX as u32 {
            return Err(CoreError::codepoint(
                format!("U+{value:X}"),
                "beyond the last Unicode scalar value U+10FFFF",
            ));
        }
        if char::from_u32(value).is_none() {
            return Err(CoreError::codepoint(
                format!("U+{value:X}"),
                "surrogate code points cannot be assigned to glyphs",
            ));
        }
        Ok(Self(value))
    }

    /// Numeric value.
    #[must_use]
    pub fn value(self) -> u32 {
        self.0
    }

    /// Lowercase hexadecimal digits without prefix, e.g. `f000`.
    #[must_use]
    pub fn hex(self) -> String {
        format!("{:x}", self.0)
    }

    /// Output file name for the glyph, e.g. `f000.svg`.
    #[must_use]
    pub fn file_name(self) -> String {
        format!("{:x}.svg", self.0)
    }

    /// CSS string escape for `content:`, e.g. `\f000`.
    #[must_use]
    pub fn css_escape(self) -> String {
        format!("\\{:x}", self.0)
    }
}

impl fmt::Display for Codepoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "U+{:04X}", self.0)
    }
}

impl FromStr for Codepoint {
    type Err = CoreError;

    /// Parse a `U+XXXX` string. The prefix is case-insensitive.
    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        let digits = trimmed
            .strip_prefix("U+")
            .or_else(|| trimmed.strip_prefix("u+"))
            .ok_or_else(|| CoreError::codepoint(s, "expected a U+ prefix"))?;

        if digits.is_empty() {
            return Err(CoreError::codepoint(s, "no hexadecimal digits after U+"));
        }

        let value = u32::from_str_radix(digits, 16)
            .map_err(|e| CoreError::codepoint(s, format!("not a hexadecimal number: {e}")))?;

        Self::new(value).map_err(|_| CoreError::codepoint(s, "not an assignable Unicode scalar value"))
    }
}

impl TryFrom<String> for Codepoint {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<Codepoint> for String {
    fn from(cp: Codepoint) -> Self {
        cp.to_string()
    }
}

/// Hands out consecutive codepoints starting at a base value.
///
/// Only icons that made it through style resolution call [`next`](Self::next),
/// so a skipped file leaves its would-be value to the next icon.
#[derive(Debug, Clone)]
pub struct CodepointAllocator {
    base: Codepoint,
    next: u32,
}

impl CodepointAllocator {
    /// Create an allocator whose first value is `base`.
    #[must_use]
    pub fn new(base: Codepoint) -> Self {
        Self {
            base,
            next: base.value(),
        }
    }

    /// The configured first codepoint.
    #[must_use]
    pub fn base(&self) -> Codepoint {
        self.base
    }

    /// The value the next call to [`next`](Self::next) would return, without consuming it.
    pub fn peek(&self) -> Result<Codepoint> {
        self.checked_current()
    }

    /// Number of codepoints handed out so far.
    #[must_use]
    pub fn allocated(&self) -> u32 {
        self.next - self.base.value()
    }

    /// Allocate the next codepoint.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Result<Codepoint> {
        let cp = self.checked_current()?;
        self.next += 1;
        Ok(cp)
    }

    fn checked_current(&self) -> Result<Codepoint> {
        if self.next > char::MAX as u32 {
            return Err(CoreError::CodepointExhausted {
                last: self.next - 1,
            });
        }
        Codepoint::new(self.next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_codepoint() {
        let cp: Codepoint = "U+f000".parse().unwrap();
        assert_eq!(cp.value(), 0xF000);
        assert_eq!(cp.hex(), "f000");
        assert_eq!(cp.file_name(), "f000.svg");
        assert_eq!(cp.css_escape(), "\\f000");
        assert_eq!(cp.to_string(), "U+F000");
    }

    #[test]
    fn test_parse_codepoint_variants() {
        assert_eq!("u+EA60".parse::<Codepoint>().unwrap().value(), 0xEA60);
        assert_eq!(" U+41 ".parse::<Codepoint>().unwrap().value(), 0x41);
        assert_eq!("U+10FFFF".parse::<Codepoint>().unwrap().value(), 0x10FFFF);
    }

    #[test]
    fn test_parse_codepoint_rejects_bad_input() {
        assert!("f000".parse::<Codepoint>().is_err());
        assert!("U+".parse::<Codepoint>().is_err());
        assert!("U+xyz".parse::<Codepoint>().is_err());
        assert!("U+110000".parse::<Codepoint>().is_err());
        assert!("U+D800".parse::<Codepoint>().is_err());
    }

    #[test]
    fn test_allocator_is_contiguous() {
        let mut alloc = CodepointAllocator::new("U+f000".parse().unwrap());
        let values: Vec<u32> = (0..4).map(|_| alloc.next().unwrap().value()).collect();
        assert_eq!(values, vec![0xF000, 0xF001, 0xF002, 0xF003]);
        assert_eq!(alloc.allocated(), 4);
        assert_eq!(alloc.base().value(), 0xF000);
    }

    #[test]
    fn test_allocator_peek_does_not_consume() {
        let mut alloc = CodepointAllocator::new("U+e000".parse().unwrap());
        assert_eq!(alloc.peek().unwrap().value(), 0xE000);
        assert_eq!(alloc.peek().unwrap().value(), 0xE000);
        assert_eq!(alloc.next().unwrap().value(), 0xE000);
        assert_eq!(alloc.peek().unwrap().value(), 0xE001);
    }

    #[test]
    fn test_allocator_exhaustion() {
        let mut alloc = CodepointAllocator::new("U+10FFFF".parse().unwrap());
        assert_eq!(alloc.next().unwrap().value(), 0x10FFFF);
        let err = alloc.next().unwrap_err();
        assert!(matches!(err, CoreError::CodepointExhausted { last: 0x10FFFF }));
    }

    #[test]
    fn test_allocator_refuses_surrogates() {
        let mut alloc = CodepointAllocator::new("U+D7FF".parse().unwrap());
        assert!(alloc.next().is_ok());
        assert!(alloc.next().is_err());
    }

    #[test]
    fn test_serde_roundtrip_through_string() {
        let cp: Codepoint = serde_json::from_str("\"U+f000\"").unwrap();
        assert_eq!(cp.value(), 0xF000);
        assert_eq!(serde_json::to_string(&cp).unwrap(), "\"U+F000\"");
    }
}
