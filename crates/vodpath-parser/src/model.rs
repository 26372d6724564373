//! Request model produced by the uri path decoder.
//!
//! A [`MediaSet`] holds one [`Sequence`] per selected sub-uri. Each sequence
//! owns its [`ClipSource`] and the top [`Clip`] played for it, which is the
//! plain source or a filter chain ending in it.

use std::borrow::Cow;

use vodpath_common::{ClipId, TracksMask};

use crate::rate::RateFilterClip;

/// One source file reference with its edit parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ClipSource {
    pub id: ClipId,
    /// The concrete uri the parameters were extracted from.
    #[cfg_attr(feature = "serde", serde(serialize_with = "serialize_lossy"))]
    pub uri: Vec<u8>,
    /// `uri` with every recognized `/key/value` pair removed.
    #[cfg_attr(feature = "serde", serde(serialize_with = "serialize_lossy"))]
    pub stripped_uri: Vec<u8>,
    #[cfg_attr(feature = "serde", serde(skip))]
    mapped_uri: Option<Vec<u8>>,
    /// Trim start in milliseconds.
    pub clip_from: u32,
    /// Trim end in milliseconds; `u32::MAX` when untrimmed.
    pub clip_to: u32,
    pub tracks_mask: TracksMask,
    /// Position of the owning sequence in [`MediaSet::sequences`].
    pub sequence: usize,
}

impl ClipSource {
    /// A source with default edit parameters: untrimmed, all tracks.
    pub fn new(id: ClipId, sequence: usize) -> Self {
        Self {
            id,
            uri: Vec::new(),
            stripped_uri: Vec::new(),
            mapped_uri: None,
            clip_from: 0,
            clip_to: u32::MAX,
            tracks_mask: TracksMask::all(),
            sequence,
        }
    }

    /// The uri used to look the source up; the stripped uri until remapped.
    pub fn mapped_uri(&self) -> &[u8] {
        self.mapped_uri.as_deref().unwrap_or(&self.stripped_uri)
    }

    /// Point the source at a different file than its stripped uri.
    pub fn set_mapped_uri(&mut self, uri: Vec<u8>) {
        self.mapped_uri = Some(uri);
    }

    /// The stripped uri as text, for logging and display.
    pub fn stripped_uri_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.stripped_uri)
    }
}

/// A node of the clip graph.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(tag = "type", rename_all = "snake_case"))]
pub enum Clip {
    /// The source of the owning sequence, by id.
    Source { id: ClipId },
    /// A rate change applied to the wrapped clip.
    RateFilter(RateFilterClip),
}

impl Clip {
    /// Id of this node.
    pub fn id(&self) -> ClipId {
        match self {
            Self::Source { id } => *id,
            Self::RateFilter(filter) => filter.id,
        }
    }

    /// Id of the source at the bottom of the chain.
    pub fn source_id(&self) -> ClipId {
        let mut clip = self;
        loop {
            match clip {
                Self::Source { id } => return *id,
                Self::RateFilter(filter) => clip = &filter.input,
            }
        }
    }
}

/// One selected sub-uri of the request.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Sequence {
    /// Position of the sub-uri among the multi-uri parts.
    pub index: u32,
    pub source: ClipSource,
    /// The top clip played for this sequence.
    pub clip: Clip,
}

impl Sequence {
    /// The clips of this sequence, in play order.
    pub fn clips(&self) -> &[Clip] {
        std::slice::from_ref(&self.clip)
    }

    pub fn stripped_uri(&self) -> &[u8] {
        &self.source.stripped_uri
    }

    pub fn mapped_uri(&self) -> &[u8] {
        self.source.mapped_uri()
    }
}

/// Everything a request selects, ready for media lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct MediaSet {
    pub sequences: Vec<Sequence>,
    /// Set when the request was a multi-uri with more than one part.
    pub has_multi_sequences: bool,
    pub total_clip_count: u32,
    pub clip_count: u32,
}

impl MediaSet {
    pub fn sequence_count(&self) -> usize {
        self.sequences.len()
    }

    /// The sources, parallel to [`MediaSet::sequences`].
    pub fn sources(&self) -> impl Iterator<Item = &ClipSource> + '_ {
        self.sequences.iter().map(|sequence| &sequence.source)
    }
}

#[cfg(feature = "serde")]
fn serialize_lossy<S: serde::Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&String::from_utf8_lossy(bytes))
}
