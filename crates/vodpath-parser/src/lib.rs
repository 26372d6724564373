//! # vodpath-parser
//!
//! A single-pass decoder for the encoded request paths of a media-segment
//! delivery service.
//!
//! A request path names one or more source files, optional edit parameters
//! for each (trim range, track selection, playback rate) and, in its file
//! name, which segment, clip, sequences and tracks the client wants. This
//! crate turns such a path into a [`MediaSet`] before any media is read.
//!
//! ## Quick Start
//!
//! ```
//! use vodpath_parser::{parse_file_name, parse_uri_path, KeywordTable, ParamNames};
//!
//! let table = KeywordTable::full(&ParamNames::default()).unwrap();
//!
//! let mut request = parse_file_name(b"3-f2-v1", true).unwrap();
//! assert_eq!(request.segment_index, 2);
//!
//! let media_set = parse_uri_path(
//!     b"/content/movie_,360,720,.mp4/clipTo/60000.urlset",
//!     b".urlset",
//!     &table,
//!     &mut request,
//! )
//! .unwrap();
//!
//! assert_eq!(media_set.sequence_count(), 1);
//! let sequence = &media_set.sequences[0];
//! assert_eq!(sequence.index, 1);
//! assert_eq!(sequence.source.clip_to, 60000);
//! assert_eq!(sequence.stripped_uri(), b"/content/movie_720.mp4");
//! ```
//!
//! ## Grammars
//!
//! Request formats are described as [`matcher::MatchRule`] tables and run
//! with [`matcher::parse_string`]; the selector run that follows is decoded
//! by [`parse_file_name`].

pub mod file_name;
pub mod matcher;
pub mod model;
pub mod multi_uri;
pub mod params;
pub mod rate;
pub mod tokens;
mod uri_path;

pub use file_name::{parse_file_name, DecodedFilename};
pub use model::{Clip, ClipSource, MediaSet, Sequence};
pub use multi_uri::{split_multi_uri, MultiUri, MAX_SUB_URIS};
pub use params::{
    extract_uri_params, hash_key_lc, ExtractedUri, KeywordTable, ParamKind, ParamNames,
    MAX_PARAM_NAME_LEN,
};
pub use rate::{Rate, RateFilterClip};
pub use uri_path::parse_uri_path;

pub use vodpath_common::{Error, Rejection, Result, TracksMask, ALL_SEQUENCES, ALL_TRACKS};
