//! Uri parameter keywords.
//!
//! Parameters ride inside the uri path as `/<name>/<value>` pairs. The names
//! are configurable, so the set of recognized names is compiled once into a
//! [`KeywordTable`] and shared read-only by every request.
//!
//! The table is keyed by [`hash_key_lc`], a case-folding multiplicative hash.
//! The request scanner folds the same hash byte by byte while it walks a
//! path segment ([`hash_step`]), so a segment can be looked up the moment
//! its closing slash is seen. Both sides must agree bit for bit or lookups
//! silently miss.

mod extract;

pub use extract::{extract_uri_params, ExtractedUri};

use std::fmt;

use vodpath_common::{Error, Result, TracksMask};

use crate::model::ClipSource;

/// Longest parameter name the scanner can recognize.
pub const MAX_PARAM_NAME_LEN: usize = 32;

/// Identity of a uri parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamKind {
    ClipTo,
    ClipFrom,
    Tracks,
    Speed,
}

impl ParamKind {
    /// Human readable name, used in diagnostics.
    pub fn label(self) -> &'static str {
        match self {
            Self::ClipTo => "clip to",
            Self::ClipFrom => "clip from",
            Self::Tracks => "tracks",
            Self::Speed => "speed",
        }
    }

    pub(crate) fn bit(self) -> u32 {
        match self {
            Self::ClipTo => 1 << 0,
            Self::ClipFrom => 1 << 1,
            Self::Tracks => 1 << 2,
            Self::Speed => 1 << 3,
        }
    }
}

/// Where a parameter's parsed value goes.
#[derive(Clone, Copy)]
pub enum ParamTarget {
    /// A plain integer field of the source.
    U32(fn(&mut ClipSource) -> &mut u32),
    /// A track mask field of the source.
    Tracks(fn(&mut ClipSource) -> &mut TracksMask),
    /// Wraps the current top clip in a rate filter instead of writing a field.
    RateFilter,
}

impl fmt::Debug for ParamTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::U32(_) => write!(f, "U32"),
            Self::Tracks(_) => write!(f, "Tracks"),
            Self::RateFilter => write!(f, "RateFilter"),
        }
    }
}

/// A recognized parameter: its identity and its typed setter.
#[derive(Debug, Clone, Copy)]
pub struct ParamDef {
    pub kind: ParamKind,
    pub target: ParamTarget,
}

fn clip_to_field(source: &mut ClipSource) -> &mut u32 {
    &mut source.clip_to
}

fn clip_from_field(source: &mut ClipSource) -> &mut u32 {
    &mut source.clip_from
}

fn tracks_field(source: &mut ClipSource) -> &mut TracksMask {
    &mut source.tracks_mask
}

/// Parameters recognized on segmented (HLS/DASH style) requests.
pub static URI_PARAM_DEFS: [ParamDef; 4] = [
    ParamDef {
        kind: ParamKind::ClipTo,
        target: ParamTarget::U32(clip_to_field),
    },
    ParamDef {
        kind: ParamKind::ClipFrom,
        target: ParamTarget::U32(clip_from_field),
    },
    ParamDef {
        kind: ParamKind::Tracks,
        target: ParamTarget::Tracks(tracks_field),
    },
    ParamDef {
        kind: ParamKind::Speed,
        target: ParamTarget::RateFilter,
    },
];

/// Parameters recognized on progressive download requests.
pub static PD_URI_PARAM_DEFS: [ParamDef; 2] = [
    ParamDef {
        kind: ParamKind::ClipTo,
        target: ParamTarget::U32(clip_to_field),
    },
    ParamDef {
        kind: ParamKind::ClipFrom,
        target: ParamTarget::U32(clip_from_field),
    },
];

/// Configured names of the uri parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ParamNames {
    pub clip_to: String,
    pub clip_from: String,
    pub tracks: String,
    pub speed: String,
}

impl ParamNames {
    /// The configured name for `kind`.
    pub fn name(&self, kind: ParamKind) -> &str {
        match kind {
            ParamKind::ClipTo => &self.clip_to,
            ParamKind::ClipFrom => &self.clip_from,
            ParamKind::Tracks => &self.tracks,
            ParamKind::Speed => &self.speed,
        }
    }
}

impl Default for ParamNames {
    fn default() -> Self {
        Self {
            clip_to: "clipTo".to_string(),
            clip_from: "clipFrom".to_string(),
            tracks: "tracks".to_string(),
            speed: "speed".to_string(),
        }
    }
}

/// Fold one byte into a running key hash.
#[inline]
pub fn hash_step(hash: u64, byte: u8) -> u64 {
    hash.wrapping_mul(31).wrapping_add(u64::from(byte))
}

/// Hash `key` case-insensitively: [`hash_step`] over its lower-cased bytes.
pub fn hash_key_lc(key: &[u8]) -> u64 {
    key.iter()
        .fold(0, |hash, &byte| hash_step(hash, byte.to_ascii_lowercase()))
}

struct Entry {
    hash: u64,
    name: Box<[u8]>,
    def: &'static ParamDef,
}

/// Immutable case-insensitive map from parameter name to definition.
pub struct KeywordTable {
    buckets: Vec<Vec<Entry>>,
    len: usize,
}

impl KeywordTable {
    /// Build a table from configured names, registering `defs` in order.
    ///
    /// Registration stops at the first definition whose configured name is
    /// empty; later definitions are not registered either.
    pub fn new(names: &ParamNames, defs: &'static [ParamDef]) -> Result<Self> {
        let mut entries: Vec<Entry> = Vec::with_capacity(defs.len());

        for def in defs {
            let name = names.name(def.kind);
            if name.is_empty() {
                break;
            }

            if name.len() > MAX_PARAM_NAME_LEN {
                return Err(Error::invalid_config(format!(
                    "{} param name '{}' is longer than {} bytes",
                    def.kind.label(),
                    name,
                    MAX_PARAM_NAME_LEN
                )));
            }

            let lowered: Box<[u8]> = name.as_bytes().to_ascii_lowercase().into_boxed_slice();
            if entries.iter().any(|entry| entry.name == lowered) {
                return Err(Error::invalid_config(format!(
                    "param name '{}' is used twice",
                    name
                )));
            }

            entries.push(Entry {
                hash: hash_key_lc(&lowered),
                name: lowered,
                def,
            });
        }

        let bucket_count = (entries.len() * 2).max(1).next_power_of_two();
        let mut buckets: Vec<Vec<Entry>> = (0..bucket_count).map(|_| Vec::new()).collect();
        let len = entries.len();
        for entry in entries {
            let slot = (entry.hash % bucket_count as u64) as usize;
            buckets[slot].push(entry);
        }

        tracing::debug!(keywords = len, buckets = bucket_count, "built uri params table");

        Ok(Self { buckets, len })
    }

    /// Table for segmented requests: clip range, tracks and speed.
    pub fn full(names: &ParamNames) -> Result<Self> {
        Self::new(names, &URI_PARAM_DEFS)
    }

    /// Table for progressive download requests: clip range only.
    pub fn progressive(names: &ParamNames) -> Result<Self> {
        Self::new(names, &PD_URI_PARAM_DEFS)
    }

    /// Find an already lower-cased `name` whose [`hash_key_lc`] is `hash`.
    pub fn find(&self, hash: u64, name: &[u8]) -> Option<&'static ParamDef> {
        let slot = (hash % self.buckets.len() as u64) as usize;
        self.buckets[slot]
            .iter()
            .find(|entry| entry.hash == hash && *entry.name == *name)
            .map(|entry| entry.def)
    }

    /// Case-insensitive lookup of an arbitrary key.
    pub fn lookup(&self, key: &[u8]) -> Option<&'static ParamDef> {
        self.find(hash_key_lc(key), &key.to_ascii_lowercase())
    }

    /// Number of registered keywords.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Registered names with their kinds, in no particular order.
    pub fn keywords(&self) -> impl Iterator<Item = (&[u8], ParamKind)> + '_ {
        self.buckets
            .iter()
            .flatten()
            .map(|entry| (&*entry.name, entry.def.kind))
    }
}

impl fmt::Debug for KeywordTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(
                self.keywords()
                    .map(|(name, kind)| (String::from_utf8_lossy(name), kind)),
            )
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_is_case_insensitive() {
        assert_eq!(hash_key_lc(b"clipTo"), hash_key_lc(b"CLIPTO"));
        assert_eq!(hash_key_lc(b"clipto"), hash_key_lc(b"ClIpTo"));
        assert_ne!(hash_key_lc(b"clipto"), hash_key_lc(b"clipfrom"));
    }

    #[test]
    fn test_hash_values_are_stable() {
        assert_eq!(hash_key_lc(b""), 0);
        assert_eq!(hash_key_lc(b"a"), 97);
        assert_eq!(hash_key_lc(b"ab"), 97 * 31 + 98);
        assert_eq!(hash_key_lc(b"AB"), 97 * 31 + 98);
    }

    #[test]
    fn test_full_table_lookup() {
        let table = KeywordTable::full(&ParamNames::default()).unwrap();
        assert_eq!(table.len(), 4);
        assert_eq!(table.lookup(b"clipTo").unwrap().kind, ParamKind::ClipTo);
        assert_eq!(table.lookup(b"CLIPFROM").unwrap().kind, ParamKind::ClipFrom);
        assert_eq!(table.lookup(b"tracks").unwrap().kind, ParamKind::Tracks);
        assert_eq!(table.lookup(b"Speed").unwrap().kind, ParamKind::Speed);
        assert!(table.lookup(b"clip").is_none());
        assert!(table.lookup(b"").is_none());
    }

    #[test]
    fn test_progressive_table_has_clip_range_only() {
        let table = KeywordTable::progressive(&ParamNames::default()).unwrap();
        assert_eq!(table.len(), 2);
        assert!(table.lookup(b"clipTo").is_some());
        assert!(table.lookup(b"clipFrom").is_some());
        assert!(table.lookup(b"tracks").is_none());
        assert!(table.lookup(b"speed").is_none());
    }

    #[test]
    fn test_empty_name_stops_registration() {
        let names = ParamNames {
            clip_from: String::new(),
            ..ParamNames::default()
        };
        let table = KeywordTable::full(&names).unwrap();
        assert_eq!(table.len(), 1);
        assert!(table.lookup(b"clipTo").is_some());
        assert!(table.lookup(b"tracks").is_none());
    }

    #[test]
    fn test_rejects_long_and_duplicate_names() {
        let names = ParamNames {
            speed: "s".repeat(MAX_PARAM_NAME_LEN + 1),
            ..ParamNames::default()
        };
        assert!(matches!(
            KeywordTable::full(&names),
            Err(Error::InvalidConfig(_))
        ));

        let names = ParamNames {
            tracks: "CLIPTO".to_string(),
            ..ParamNames::default()
        };
        assert!(matches!(
            KeywordTable::full(&names),
            Err(Error::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_custom_names() {
        let names = ParamNames {
            clip_to: "to".to_string(),
            clip_from: "from".to_string(),
            tracks: "t".to_string(),
            speed: "rate".to_string(),
        };
        let table = KeywordTable::full(&names).unwrap();
        assert_eq!(table.lookup(b"TO").unwrap().kind, ParamKind::ClipTo);
        assert_eq!(table.lookup(b"rate").unwrap().kind, ParamKind::Speed);
        assert!(table.lookup(b"clipTo").is_none());
    }

    #[test]
    fn test_table_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<KeywordTable>();
    }
}
