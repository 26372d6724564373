//! Uri path decoding: splits a (possibly multi-) uri into the sequences a
//! request selects, extracting the parameters of each.

use vodpath_common::{ClipIdGenerator, Error, Rejection, Result, ALL_SEQUENCES};

use crate::file_name::DecodedFilename;
use crate::model::{MediaSet, Sequence};
use crate::multi_uri::split_multi_uri;
use crate::params::{extract_uri_params, KeywordTable};

/// Mask with the low `parts` bits set.
fn parts_mask(parts: u32) -> u32 {
    match parts {
        0 => 0,
        1..=31 => (1u32 << parts) - 1,
        _ => u32::MAX,
    }
}

/// Decode the uri path of a request into its media set.
///
/// `request` carries the selectors decoded from the file name. For a
/// multi-uri its sequence mask picks parts and is reset to
/// [`ALL_SEQUENCES`] once consumed, since the resulting sequences are
/// renumbered densely. Its track mask drops parts with no requested track.
pub fn parse_uri_path(
    uri: &[u8],
    multi_uri_suffix: &[u8],
    table: &KeywordTable,
    request: &mut DecodedFilename,
) -> Result<MediaSet> {
    let multi_uri = split_multi_uri(uri, multi_uri_suffix)?;

    let uris_mask = if multi_uri.is_multi() {
        let mask = request.sequences_mask & parts_mask(multi_uri.parts_count);
        request.sequences_mask = ALL_SEQUENCES;
        mask
    } else {
        1
    };

    let selected = uris_mask.count_ones() as usize;
    if selected == 0 {
        tracing::debug!(parts = multi_uri.parts_count, "request has no uris");
        return Err(Error::from(Rejection::NoUris));
    }

    let mut sequences: Vec<Sequence> = Vec::new();
    sequences.try_reserve_exact(selected)?;

    let mut clip_ids = ClipIdGenerator::new();

    for index in 0..multi_uri.parts_count {
        if uris_mask & (1 << index) == 0 {
            continue;
        }

        let part_uri = multi_uri.part_uri(index as usize);
        let extracted = extract_uri_params(table, part_uri, sequences.len(), &mut clip_ids)?;

        let tracks = extracted.source.tracks_mask.intersect(request.tracks_mask);
        if !tracks.has_any() {
            tracing::debug!(
                index,
                uri = %extracted.source.stripped_uri_lossy(),
                "dropping part with no requested tracks"
            );
            continue;
        }

        sequences.push(Sequence {
            index,
            source: extracted.source,
            clip: extracted.clip,
        });
    }

    if sequences.is_empty() {
        tracing::debug!("request has no uris after track filtering");
        return Err(Error::from(Rejection::NoUrisAfterTrackFiltering));
    }

    tracing::debug!(
        sequences = sequences.len(),
        parts = multi_uri.parts_count,
        "decoded uri path"
    );

    Ok(MediaSet {
        sequences,
        has_multi_sequences: multi_uri.is_multi(),
        total_clip_count: 1,
        clip_count: 1,
    })
}
