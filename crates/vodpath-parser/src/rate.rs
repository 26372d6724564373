//! Playback-rate filter clips.

use std::fmt;

use vodpath_common::{ClipId, Error, Rejection, Result};

use crate::model::Clip;

/// A playback rate as an exact fraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Rate {
    pub num: u32,
    pub denom: u32,
}

impl Rate {
    /// Slowest supported rate, as `num / denom`.
    pub const MIN: Rate = Rate { num: 1, denom: 2 };
    /// Fastest supported rate.
    pub const MAX: Rate = Rate { num: 2, denom: 1 };

    /// Parse a `digits[.digits]` rate and check it is within 0.5 to 2.
    pub fn parse(text: &[u8]) -> Result<Rate> {
        let (num, denom) = parse_fixed(text).ok_or(Rejection::InvalidRate)?;

        let rate = Rate { num, denom };
        if !rate.is_supported() {
            tracing::debug!(num, denom, "rate outside the supported range");
            return Err(Error::from(Rejection::InvalidRate));
        }

        Ok(rate)
    }

    /// Whether the rate lies within [`Rate::MIN`]..=[`Rate::MAX`].
    pub fn is_supported(&self) -> bool {
        let num = u64::from(self.num);
        let denom = u64::from(self.denom);
        denom != 0 && num * 2 >= denom && num <= denom * 2
    }

    /// The rate as a float, for display.
    pub fn as_f64(&self) -> f64 {
        f64::from(self.num) / f64::from(self.denom)
    }
}

impl fmt::Display for Rate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_f64())
    }
}

// At most 9 fractional digits keep the denominator within u32.
fn parse_fixed(text: &[u8]) -> Option<(u32, u32)> {
    let (int_part, frac_part) = match memchr::memchr(b'.', text) {
        Some(dot) => (&text[..dot], &text[dot + 1..]),
        None => (text, &[][..]),
    };

    if int_part.is_empty() && frac_part.is_empty() {
        return None;
    }
    if frac_part.len() > 9 {
        return None;
    }

    let mut num: u64 = 0;
    let mut denom: u64 = 1;
    for &byte in int_part {
        if !byte.is_ascii_digit() {
            return None;
        }
        num = num * 10 + u64::from(byte - b'0');
        if num > u64::from(u32::MAX) {
            return None;
        }
    }
    for &byte in frac_part {
        if !byte.is_ascii_digit() {
            return None;
        }
        num = num * 10 + u64::from(byte - b'0');
        denom *= 10;
        if num > u64::from(u32::MAX) {
            return None;
        }
    }

    Some((u32::try_from(num).ok()?, u32::try_from(denom).ok()?))
}

/// A clip played back at a different rate than its input.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct RateFilterClip {
    pub id: ClipId,
    pub rate: Rate,
    /// The wrapped clip, owned by the filter.
    pub input: Box<Clip>,
}

impl RateFilterClip {
    /// Wrap `input` in a rate filter parsed from `text`.
    pub fn from_text(text: &[u8], input: Clip, id: ClipId) -> Result<Self> {
        let rate = Rate::parse(text)?;
        Ok(Self {
            id,
            rate,
            input: Box::new(input),
        })
    }
}
