//! Typed clip identifiers.
//!
//! Every clip node built while decoding a request (plain sources and the
//! filters wrapping them) gets an id that is unique within that request.
//! Ids start at 1 and are handed out in creation order.

use serde::{Deserialize, Serialize};

/// Identifier of a clip node within one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClipId(u32);

impl ClipId {
    /// The raw id value.
    #[must_use]
    pub fn get(self) -> u32 {
        self.0
    }
}

impl From<u32> for ClipId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for ClipId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Per-request source of fresh clip ids.
#[derive(Debug, Clone)]
pub struct ClipIdGenerator {
    next: u32,
}

impl ClipIdGenerator {
    /// Start a new id sequence at 1.
    #[must_use]
    pub fn new() -> Self {
        Self { next: 1 }
    }

    /// Hand out the next id.
    pub fn next_id(&mut self) -> ClipId {
        let id = ClipId(self.next);
        self.next = self.next.wrapping_add(1);
        id
    }
}

impl Default for ClipIdGenerator {
    fn default() -> Self {
        Self::new()
    }
}
