//! Vodpath-Common: Shared types, constants, and error handling.
//!
//! This crate provides common functionality used across vodpath:
//!
//! - **Clip IDs**: A typed clip identifier and the per-request generator
//!   that hands out unique, monotonically increasing ids
//! - **Core Types**: Media kinds, per-kind track bitsets, and the selection
//!   sentinels shared by the filename grammar and the parameter extractor
//! - **Error Handling**: The bad-request/internal error split and the
//!   diagnostic tags naming each rejected check
//!
//! # Examples
//!
//! ```
//! use vodpath_common::{ClipIdGenerator, Error, MediaType, Rejection, Result, TracksMask};
//!
//! let mut ids = ClipIdGenerator::new();
//! assert_eq!(ids.next_id().get(), 1);
//!
//! let mask = TracksMask::all();
//! assert!(mask.has_any());
//! assert_eq!(mask[MediaType::Audio], u32::MAX);
//!
//! fn example() -> Result<()> {
//!     Err(Error::from(Rejection::NoUris))
//! }
//! assert!(example().unwrap_err().is_bad_request());
//! ```

pub mod error;
pub mod ids;
pub mod types;

pub use error::{Error, Rejection, Result};
pub use ids::*;
pub use types::*;
