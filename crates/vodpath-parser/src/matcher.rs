//! Data-driven token matcher.
//!
//! A grammar is an ordered slice of [`MatchRule`]s applied to one cursor.
//! It is a strict sequence, not a set of alternatives: the first rule that
//! fails aborts the whole match. Rules that capture something hand it to a
//! typed setter, so each grammar table knows how to fill its own output
//! record without offset arithmetic.

use std::borrow::Cow;
use std::fmt;
use std::ops::Range;

/// Byte span in the matched input.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Span {
    /// Start byte offset (inclusive).
    pub start: usize,
    /// End byte offset (exclusive).
    pub end: usize,
}

impl Span {
    /// Create a new span.
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Length of the span in bytes.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Check if span is empty.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// The bytes this span covers in `input`.
    pub fn slice<'a>(&self, input: &'a [u8]) -> &'a [u8] {
        &input[self.start..self.end]
    }
}

impl From<Range<usize>> for Span {
    fn from(range: Range<usize>) -> Self {
        Self {
            start: range.start,
            end: range.end,
        }
    }
}

/// Writes a decoded number into the output record.
pub type NumberSetter<T> = fn(&mut T, u64);

/// Writes a captured span into the output record.
pub type SpanSetter<T> = fn(&mut T, Span);

/// One step of a grammar.
pub enum MatchRule<T> {
    /// Succeeds iff the cursor is exactly at the end of input.
    End,
    /// Literal bytes that must follow the cursor.
    FixedString(Cow<'static, [u8]>),
    /// A run of decimal digits, possibly empty (value 0). No overflow check.
    Number(NumberSetter<T>),
    /// Everything up to the first occurrence of the delimiter byte.
    DelimitedString(u8, SpanSetter<T>),
}

impl<T> MatchRule<T> {
    /// A fixed-string rule over a static literal.
    pub const fn fixed(literal: &'static [u8]) -> Self {
        Self::FixedString(Cow::Borrowed(literal))
    }

    /// A fixed-string rule over bytes known only at runtime.
    pub fn fixed_owned(literal: impl Into<Vec<u8>>) -> Self {
        Self::FixedString(Cow::Owned(literal.into()))
    }
}

impl<T> Clone for MatchRule<T> {
    fn clone(&self) -> Self {
        match self {
            Self::End => Self::End,
            Self::FixedString(literal) => Self::FixedString(literal.clone()),
            Self::Number(set) => Self::Number(*set),
            Self::DelimitedString(delim, set) => Self::DelimitedString(*delim, *set),
        }
    }
}

impl<T> fmt::Debug for MatchRule<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::End => write!(f, "End"),
            Self::FixedString(literal) => {
                write!(f, "FixedString({:?})", String::from_utf8_lossy(literal))
            }
            Self::Number(_) => write!(f, "Number"),
            Self::DelimitedString(delim, _) => {
                write!(f, "DelimitedString({:?})", char::from(*delim))
            }
        }
    }
}

/// Match `input` against `grammar`, filling `output` through the rule setters.
///
/// Returns `true` only when the grammar reaches [`MatchRule::End`] with the
/// whole input consumed. A grammar that runs out of rules without an `End`
/// never matches. On `false`, whatever the setters already wrote into
/// `output` must be treated as garbage.
pub fn parse_string<T>(grammar: &[MatchRule<T>], input: &[u8], output: &mut T) -> bool {
    let mut pos = 0;

    for rule in grammar {
        match rule {
            MatchRule::End => return pos == input.len(),

            MatchRule::FixedString(literal) => {
                if !input[pos..].starts_with(literal) {
                    return false;
                }
                pos += literal.len();
            }

            MatchRule::Number(set) => {
                let mut value: u64 = 0;
                while let Some(&byte) = input.get(pos).filter(|b| b.is_ascii_digit()) {
                    value = value.wrapping_mul(10).wrapping_add(u64::from(byte - b'0'));
                    pos += 1;
                }
                set(output, value);
            }

            MatchRule::DelimitedString(delim, set) => {
                let Some(offset) = memchr::memchr(*delim, &input[pos..]) else {
                    return false;
                };
                set(output, Span::new(pos, pos + offset));
                pos += offset + 1;
            }
        }
    }

    false
}
