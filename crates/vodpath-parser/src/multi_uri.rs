//! Multi-uri splitting.
//!
//! A request can address several sources that share a literal prefix and
//! suffix by listing only the varying middles:
//!
//! ```text
//! /content/movie_,360,720,1080,.mp4.urlset
//! ```
//!
//! With the `.urlset` marker this yields prefix `/content/movie_`, middles
//! `360`, `720`, `1080` and postfix `.mp4`, i.e. three sub-uris.

use vodpath_common::{Error, Rejection, Result};

/// Maximum number of middle parts in one multi-uri.
pub const MAX_SUB_URIS: usize = 32;

/// A uri split into its shared prefix, varying middles and shared postfix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultiUri<'a> {
    pub prefix: &'a [u8],
    pub middle_parts: Vec<&'a [u8]>,
    pub postfix: &'a [u8],
    /// Number of addressable sub-uris; 1 means not actually multi.
    pub parts_count: u32,
}

impl<'a> MultiUri<'a> {
    /// A plain uri: one part, the whole uri as prefix.
    pub fn single(uri: &'a [u8]) -> Self {
        Self {
            prefix: uri,
            middle_parts: Vec::new(),
            postfix: &[],
            parts_count: 1,
        }
    }

    /// Whether more than one sub-uri is addressed.
    pub fn is_multi(&self) -> bool {
        self.parts_count > 1
    }

    /// The middle bytes of part `index`; empty when the uri has no middles.
    pub fn middle(&self, index: usize) -> &'a [u8] {
        self.middle_parts.get(index).copied().unwrap_or_default()
    }

    /// Reassemble sub-uri `index` as prefix + middle + postfix.
    pub fn part_uri(&self, index: usize) -> Vec<u8> {
        let middle = self.middle(index);
        let mut uri = Vec::with_capacity(self.prefix.len() + middle.len() + self.postfix.len());
        uri.extend_from_slice(self.prefix);
        uri.extend_from_slice(middle);
        uri.extend_from_slice(self.postfix);
        uri
    }
}

/// Split `uri` on commas when it ends with `marker`.
///
/// Without the marker, or with the marker but no comma, the uri is a single
/// part. One comma gives a prefix and a postfix but still a single part.
/// Each further comma closes one middle part.
pub fn split_multi_uri<'a>(uri: &'a [u8], marker: &[u8]) -> Result<MultiUri<'a>> {
    let Some(uri) = uri.strip_suffix(marker) else {
        return Ok(MultiUri::single(uri));
    };

    let mut result = MultiUri::single(uri);
    let mut last_comma_end: Option<usize> = None;

    for pos in memchr::memchr_iter(b',', uri) {
        match last_comma_end {
            None => result.prefix = &uri[..pos],
            Some(start) => {
                if result.middle_parts.len() >= MAX_SUB_URIS {
                    tracing::debug!(
                        limit = MAX_SUB_URIS,
                        "number of url parts exceeds the limit"
                    );
                    return Err(Error::from(Rejection::TooManyUriParts));
                }
                result.middle_parts.push(&uri[start..pos]);
            }
        }
        last_comma_end = Some(pos + 1);
    }

    if let Some(start) = last_comma_end {
        result.postfix = &uri[start..];
    }

    if !result.middle_parts.is_empty() {
        result.parts_count = result.middle_parts.len() as u32;
    }

    Ok(result)
}
