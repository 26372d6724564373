//! Single-pass `/key/value` extraction.

use vodpath_common::{ClipIdGenerator, Error, Rejection, Result, TracksMask};

use super::{hash_step, KeywordTable, ParamDef, ParamTarget, MAX_PARAM_NAME_LEN};
use crate::model::{Clip, ClipSource};
use crate::rate::{Rate, RateFilterClip};
use crate::tokens::extract_track_tokens;

/// A source record and the top clip built for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedUri {
    pub source: ClipSource,
    /// The plain source, or a filter wrapping it.
    pub clip: Clip,
}

/// Scan `uri` for recognized parameters and build its source record.
///
/// Every `/<key>/<value>` pair whose key is in `table` is applied to the
/// source and removed from the stripped uri. Keys match case-insensitively.
/// The first occurrence of a key wins; later ones are still validated.
/// `sequence` is the slot the owning sequence will take in the media set.
pub fn extract_uri_params(
    table: &KeywordTable,
    uri: Vec<u8>,
    sequence: usize,
    clip_ids: &mut ClipIdGenerator,
) -> Result<ExtractedUri> {
    let mut source = ClipSource::new(clip_ids.next_id(), sequence);
    let mut clip = Clip::Source { id: source.id };

    let mut stripped = Vec::with_capacity(uri.len());
    let mut name = [0u8; MAX_PARAM_NAME_LEN + 1];
    let mut name_len = 0usize;
    let mut hash = 0u64;
    let mut copy_start = 0usize;
    let mut last_slash: Option<usize> = None;
    let mut pending: Option<&'static ParamDef> = None;
    let mut parsed_mask = 0u32;

    for pos in 0..=uri.len() {
        if let Some(&byte) = uri.get(pos).filter(|&&b| b != b'/') {
            if name_len < name.len() {
                let lowered = byte.to_ascii_lowercase();
                name[name_len] = lowered;
                hash = hash_step(hash, lowered);
                name_len += 1;
            }
            continue;
        }

        let Some(open) = last_slash else {
            last_slash = Some(pos);
            hash = 0;
            name_len = 0;
            continue;
        };

        match pending.take() {
            None => {
                pending = table.find(hash, &name[..name_len]);
                if let Some(def) = pending {
                    tracing::trace!(param = def.kind.label(), offset = open, "matched uri param");
                    stripped.extend_from_slice(&uri[copy_start..open]);
                    copy_start = open;
                }
            }
            Some(def) => {
                let value = &uri[open + 1..pos];
                let first = parsed_mask & def.kind.bit() == 0;
                parsed_mask |= def.kind.bit();

                match def.target {
                    ParamTarget::U32(field) => {
                        let parsed = parse_u32_value(def, value)?;
                        if first {
                            *field(&mut source) = parsed;
                        }
                    }
                    ParamTarget::Tracks(field) => {
                        let parsed = parse_tracks_value(def, value)?;
                        if first {
                            *field(&mut source) = parsed;
                        }
                    }
                    ParamTarget::RateFilter if first => {
                        clip = Clip::RateFilter(RateFilterClip::from_text(
                            value,
                            clip,
                            clip_ids.next_id(),
                        )?);
                    }
                    ParamTarget::RateFilter => {
                        Rate::parse(value)?;
                    }
                }

                copy_start = pos;
            }
        }

        last_slash = Some(pos);
        hash = 0;
        name_len = 0;
    }

    if source.clip_from >= source.clip_to {
        tracing::debug!(
            clip_from = source.clip_from,
            clip_to = source.clip_to,
            "clip from is larger than clip to"
        );
        return Err(Error::from(Rejection::InvalidClipRange {
            from: source.clip_from,
            to: source.clip_to,
        }));
    }

    stripped.extend_from_slice(&uri[copy_start..]);
    source.stripped_uri = stripped;
    source.uri = uri;

    Ok(ExtractedUri { source, clip })
}

/// A non-empty run of decimal digits. Overflow wraps.
fn parse_u32_value(def: &ParamDef, value: &[u8]) -> Result<u32> {
    if value.is_empty() || !value.iter().all(u8::is_ascii_digit) {
        return Err(invalid_value(def, value));
    }

    Ok(value.iter().fold(0u32, |acc, &byte| {
        acc.wrapping_mul(10).wrapping_add(u32::from(byte - b'0'))
    }))
}

/// A track selector run that covers the whole value.
fn parse_tracks_value(def: &ParamDef, value: &[u8]) -> Result<TracksMask> {
    let mut mask = TracksMask::none();
    let end = extract_track_tokens(value, 0, &mut mask);
    if end != value.len() {
        return Err(invalid_value(def, value));
    }
    Ok(mask)
}

fn invalid_value(def: &ParamDef, value: &[u8]) -> Error {
    tracing::debug!(
        param = def.kind.label(),
        value = %String::from_utf8_lossy(value),
        "param parser failed"
    );
    Error::from(Rejection::InvalidParamValue {
        param: def.kind.label(),
    })
}
