//! Core type definitions for track and sequence selection.
//!
//! Selections are bitsets: bit `i` set means "item `i + 1` requested". An
//! all-ones mask is the wildcard. The sentinels below are named so the
//! grammar code never spells the magic value out.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Index, IndexMut};

/// Sequence mask value selecting every sequence.
pub const ALL_SEQUENCES: u32 = u32::MAX;

/// Track mask value selecting every track of one media kind.
pub const ALL_TRACKS: u32 = u32::MAX;

/// Kind of media track a track mask refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    /// Video tracks, selected with `v<n>` tokens.
    Video,
    /// Audio tracks, selected with `a<n>` tokens.
    Audio,
}

impl MediaType {
    /// All media kinds, in mask order.
    pub const ALL: [MediaType; 2] = [MediaType::Video, MediaType::Audio];

    /// Map a track-token letter to its media kind.
    pub fn from_token(byte: u8) -> Option<Self> {
        match byte {
            b'v' => Some(Self::Video),
            b'a' => Some(Self::Audio),
            _ => None,
        }
    }

    /// The track-token letter for this media kind.
    pub fn token(self) -> char {
        match self {
            Self::Video => 'v',
            Self::Audio => 'a',
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Video => write!(f, "video"),
            Self::Audio => write!(f, "audio"),
        }
    }
}

/// One track bitset per media kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TracksMask {
    pub video: u32,
    pub audio: u32,
}

impl TracksMask {
    /// Every track of every kind.
    #[must_use]
    pub fn all() -> Self {
        Self {
            video: ALL_TRACKS,
            audio: ALL_TRACKS,
        }
    }

    /// No track of any kind.
    #[must_use]
    pub fn none() -> Self {
        Self { video: 0, audio: 0 }
    }

    /// Per-kind intersection with another mask.
    #[must_use]
    pub fn intersect(self, other: TracksMask) -> Self {
        Self {
            video: self.video & other.video,
            audio: self.audio & other.audio,
        }
    }

    /// Whether at least one kind still selects a track.
    pub fn has_any(self) -> bool {
        self.video != 0 || self.audio != 0
    }
}

impl Default for TracksMask {
    fn default() -> Self {
        Self::all()
    }
}

impl Index<MediaType> for TracksMask {
    type Output = u32;

    fn index(&self, media_type: MediaType) -> &u32 {
        match media_type {
            MediaType::Video => &self.video,
            MediaType::Audio => &self.audio,
        }
    }
}

impl IndexMut<MediaType> for TracksMask {
    fn index_mut(&mut self, media_type: MediaType) -> &mut u32 {
        match media_type {
            MediaType::Video => &mut self.video,
            MediaType::Audio => &mut self.audio,
        }
    }
}
