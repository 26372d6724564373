//! Filename grammar.
//!
//! Decodes the selector run of a segment file name:
//!
//! ```text
//! [-]<segment>[-][c<clip>][-](f<sequence>[-])*<track tokens>
//! ```
//!
//! Numbers in the text are 1-based. Sequence and clip tokens use 0 as the
//! "everything" value; the segment index has no such meaning and rejects 0.

use vodpath_common::{Error, MediaType, Rejection, Result, TracksMask, ALL_SEQUENCES, ALL_TRACKS};

use crate::tokens::{extract_track_tokens, extract_u32_token};

/// Selectors decoded from a request file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct DecodedFilename {
    /// 0-based segment index. Only meaningful for segment requests.
    pub segment_index: u32,
    /// 0-based clip index, `None` when the name carries no clip restriction.
    pub clip_index: Option<u32>,
    /// Bit `i` selects sequence `i + 1`; [`ALL_SEQUENCES`] selects all.
    pub sequences_mask: u32,
    /// Requested tracks per media kind.
    pub tracks_mask: TracksMask,
}

impl Default for DecodedFilename {
    fn default() -> Self {
        Self {
            segment_index: 0,
            clip_index: None,
            sequences_mask: ALL_SEQUENCES,
            tracks_mask: TracksMask::all(),
        }
    }
}

impl DecodedFilename {
    /// Write the canonical token form of these selectors.
    ///
    /// Decoding the result with the same `expect_segment_index` yields the
    /// same fields for every value the decoder can produce.
    pub fn encode(&self, expect_segment_index: bool) -> String {
        let mut tokens: Vec<String> = Vec::new();

        if expect_segment_index {
            tokens.push((u64::from(self.segment_index) + 1).to_string());
        }

        if let Some(clip_index) = self.clip_index {
            tokens.push(format!("c{}", u64::from(clip_index) + 1));
        }

        if self.sequences_mask != ALL_SEQUENCES {
            push_bits(&mut tokens, 'f', self.sequences_mask);
        }

        for media_type in MediaType::ALL {
            match self.tracks_mask[media_type] {
                0 => {}
                ALL_TRACKS => tokens.push(format!("{}0", media_type.token())),
                mask => push_bits(&mut tokens, media_type.token(), mask),
            }
        }

        tokens.join("-")
    }
}

fn push_bits(tokens: &mut Vec<String>, letter: char, mask: u32) {
    for bit in 0..u32::BITS {
        if mask & (1 << bit) != 0 {
            tokens.push(format!("{}{}", letter, bit + 1));
        }
    }
}

/// Decode a file-name selector run.
///
/// `expect_segment_index` is set for segment requests, where the run starts
/// with the 1-based segment number.
pub fn parse_file_name(input: &[u8], expect_segment_index: bool) -> Result<DecodedFilename> {
    let mut result = DecodedFilename::default();
    let mut pos = skip_dash(input, 0);

    if expect_segment_index {
        let (segment_index, next) = extract_u32_token(input, pos);
        if segment_index == 0 {
            tracing::debug!(
                name = %String::from_utf8_lossy(input),
                "file name has no segment index"
            );
            return Err(Error::from(Rejection::MissingSegmentIndex));
        }
        result.segment_index = segment_index - 1;
        pos = skip_dash(input, next);
    }

    let (clip_index, next) = extract_clip_token(input, pos);
    result.clip_index = clip_index;
    pos = next;

    let (sequences_mask, next) = extract_sequence_tokens(input, pos);
    result.sequences_mask = sequences_mask;
    pos = next;

    pos = extract_track_tokens(input, pos, &mut result.tracks_mask);

    if pos != input.len() {
        tracing::debug!(
            name = %String::from_utf8_lossy(input),
            consumed = pos,
            "did not consume the whole name"
        );
        return Err(Error::from(Rejection::TrailingGarbage));
    }

    Ok(result)
}

fn skip_dash(input: &[u8], pos: usize) -> usize {
    if input.get(pos) == Some(&b'-') {
        pos + 1
    } else {
        pos
    }
}

fn extract_clip_token(input: &[u8], pos: usize) -> (Option<u32>, usize) {
    if input.get(pos) != Some(&b'c') {
        return (None, pos);
    }

    let (clip_index, next) = extract_u32_token(input, pos + 1);
    let clip_index = clip_index.checked_sub(1);

    (clip_index, skip_dash(input, next))
}

fn extract_sequence_tokens(input: &[u8], mut pos: usize) -> (u32, usize) {
    if input.get(pos) != Some(&b'f') {
        return (ALL_SEQUENCES, pos);
    }

    let mut mask = 0u32;
    while input.get(pos) == Some(&b'f') {
        let (sequence_index, next) = extract_u32_token(input, pos + 1);

        // a zero index selects everything, discarding bits set so far
        if sequence_index == 0 {
            mask = ALL_SEQUENCES;
        } else {
            mask |= 1u32.wrapping_shl(sequence_index - 1);
        }

        pos = skip_dash(input, next);
    }

    (mask, pos)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn rejection(result: Result<DecodedFilename>) -> Rejection {
        result.unwrap_err().rejection().expect("bad request")
    }

    #[test]
    fn test_segment_only() {
        let decoded = parse_file_name(b"3", true).unwrap();
        assert_eq!(decoded.segment_index, 2);
        assert_eq!(decoded.clip_index, None);
        assert_eq!(decoded.sequences_mask, ALL_SEQUENCES);
        assert_eq!(decoded.tracks_mask, TracksMask { video: 1, audio: 1 });
    }

    #[test]
    fn test_leading_dash_is_skipped() {
        let decoded = parse_file_name(b"-3-v1", true).unwrap();
        assert_eq!(decoded.segment_index, 2);
        assert_eq!(decoded.tracks_mask, TracksMask { video: 1, audio: 0 });
    }

    #[test]
    fn test_full_selector_run() {
        let decoded = parse_file_name(b"12-c2-f1-f3-v1-a2", true).unwrap();
        assert_eq!(decoded.segment_index, 11);
        assert_eq!(decoded.clip_index, Some(1));
        assert_eq!(decoded.sequences_mask, 0b101);
        assert_eq!(decoded.tracks_mask.video, 0b1);
        assert_eq!(decoded.tracks_mask.audio, 0b10);
    }

    #[test]
    fn test_segment_index_zero_is_rejected() {
        assert_eq!(
            rejection(parse_file_name(b"0-v1", true)),
            Rejection::MissingSegmentIndex
        );
        assert_eq!(
            rejection(parse_file_name(b"v1", true)),
            Rejection::MissingSegmentIndex
        );
    }

    #[test]
    fn test_no_segment_expected() {
        let decoded = parse_file_name(b"f2-a1", false).unwrap();
        assert_eq!(decoded.segment_index, 0);
        assert_eq!(decoded.sequences_mask, 0b10);
        assert_eq!(decoded.tracks_mask, TracksMask { video: 0, audio: 1 });
    }

    #[test]
    fn test_clip_zero_means_absent() {
        let decoded = parse_file_name(b"1-c0-v1", true).unwrap();
        assert_eq!(decoded.clip_index, None);
        let decoded = parse_file_name(b"1-c-v1", true).unwrap();
        assert_eq!(decoded.clip_index, None);
    }

    #[test]
    fn test_zero_sequence_overrides_earlier_bits() {
        let decoded = parse_file_name(b"1-f2-f0", true).unwrap();
        assert_eq!(decoded.sequences_mask, ALL_SEQUENCES);

        // bits after the wildcard are OR-ed into the all-ones mask
        let decoded = parse_file_name(b"1-f0-f2", true).unwrap();
        assert_eq!(decoded.sequences_mask, ALL_SEQUENCES);
    }

    #[test]
    fn test_trailing_garbage_is_rejected() {
        assert_eq!(
            rejection(parse_file_name(b"1-v1.ts", true)),
            Rejection::TrailingGarbage
        );
        assert_eq!(
            rejection(parse_file_name(b"1-x", true)),
            Rejection::TrailingGarbage
        );
    }

    #[test]
    fn test_error_is_bad_request() {
        assert_matches!(
            parse_file_name(b"1--", true),
            Err(Error::BadRequest(Rejection::TrailingGarbage))
        );
    }

    #[test]
    fn test_encode_round_trip() {
        for name in [
            &b"1"[..],
            b"12-c2-f1-f3-v1-a2",
            b"7-c1-v0-a0",
            b"2-f4-a1",
            b"5-v3",
        ] {
            let decoded = parse_file_name(name, true).unwrap();
            let encoded = decoded.encode(true);
            let again = parse_file_name(encoded.as_bytes(), true).unwrap();
            assert_eq!(again, decoded, "round trip of {:?}", encoded);
        }

        let decoded = parse_file_name(b"f2-a1", false).unwrap();
        let again = parse_file_name(decoded.encode(false).as_bytes(), false).unwrap();
        assert_eq!(again, decoded);
    }

    #[test]
    fn test_encode_canonical_form() {
        let decoded = parse_file_name(b"-12-c2-f3-f1-a2-v1", true).unwrap();
        assert_eq!(decoded.encode(true), "12-c2-f1-f3-v1-a2");
        assert_eq!(DecodedFilename::default().encode(false), "v0-a0");
    }
}
