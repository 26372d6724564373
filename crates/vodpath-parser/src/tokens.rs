//! Primitive extractors shared by the grammars.
//!
//! All extractors work on a byte slice plus a cursor and return the new
//! cursor. None of them fail: an empty digit run yields 0, and integer
//! overflow wraps silently.

use vodpath_common::{MediaType, TracksMask, ALL_TRACKS};

/// Read the decimal run starting at `pos`.
///
/// Returns the value (0 when there are no digits) and the cursor just past
/// the run.
pub fn extract_u32_token(input: &[u8], mut pos: usize) -> (u32, usize) {
    let mut value: u32 = 0;
    while let Some(&byte) = input.get(pos).filter(|b| b.is_ascii_digit()) {
        value = value.wrapping_mul(10).wrapping_add(u32::from(byte - b'0'));
        pos += 1;
    }
    (value, pos)
}

/// Decode `v<n>` / `a<n>` track selectors starting at `pos`.
///
/// With no selector at all, the first track of each kind is selected.
/// Otherwise both masks start empty and each token adds track `n` of its
/// kind, or every track of that kind when `n` is 0. Tokens may be
/// separated by `-`. Stops at the first byte that is not a selector.
pub fn extract_track_tokens(input: &[u8], mut pos: usize, result: &mut TracksMask) -> usize {
    if input.get(pos).and_then(|&b| MediaType::from_token(b)).is_none() {
        *result = TracksMask { video: 1, audio: 1 };
        return pos;
    }

    *result = TracksMask::none();

    while let Some(media_type) = input.get(pos).and_then(|&b| MediaType::from_token(b)) {
        let (track_index, next) = extract_u32_token(input, pos + 1);
        pos = next;

        if track_index == 0 {
            result[media_type] = ALL_TRACKS;
        } else {
            result[media_type] |= 1u32.wrapping_shl(track_index - 1);
        }

        if input.get(pos) == Some(&b'-') {
            pos += 1;
        }
    }

    pos
}

/// Split `uri` before its last `components` path components.
///
/// Returns `(path, file_name)` where `path` excludes the separating slash,
/// or `None` when the uri has fewer slashes than requested components.
///
/// ```
/// use vodpath_parser::tokens::split_uri_file_name;
///
/// let (path, file_name) = split_uri_file_name(b"/a/b/c.mp4", 1).unwrap();
/// assert_eq!(path, b"/a/b");
/// assert_eq!(file_name, b"c.mp4");
/// ```
pub fn split_uri_file_name(uri: &[u8], components: usize) -> Option<(&[u8], &[u8])> {
    let mut remaining = components;

    for pos in (0..uri.len()).rev() {
        if uri[pos] != b'/' {
            continue;
        }

        remaining = remaining.saturating_sub(1);
        if remaining > 0 {
            continue;
        }

        return Some((&uri[..pos], &uri[pos + 1..]));
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_u32_token() {
        assert_eq!(extract_u32_token(b"123-f1", 0), (123, 3));
        assert_eq!(extract_u32_token(b"c12", 1), (12, 3));
        assert_eq!(extract_u32_token(b"abc", 0), (0, 0));
        assert_eq!(extract_u32_token(b"", 0), (0, 0));
    }

    #[test]
    fn test_extract_u32_token_wraps() {
        // 2^32 + 5
        assert_eq!(extract_u32_token(b"4294967301", 0), (5, 10));
    }

    #[test]
    fn test_track_tokens_default_first_tracks() {
        let mut mask = TracksMask::all();
        assert_eq!(extract_track_tokens(b"f1", 0, &mut mask), 0);
        assert_eq!(mask, TracksMask { video: 1, audio: 1 });

        let mut mask = TracksMask::all();
        assert_eq!(extract_track_tokens(b"", 0, &mut mask), 0);
        assert_eq!(mask, TracksMask { video: 1, audio: 1 });
    }

    #[test]
    fn test_track_tokens_selection() {
        let mut mask = TracksMask::all();
        assert_eq!(extract_track_tokens(b"v1-a2-a3", 0, &mut mask), 8);
        assert_eq!(mask.video, 0b1);
        assert_eq!(mask.audio, 0b110);
    }

    #[test]
    fn test_track_tokens_zero_selects_all_of_kind() {
        let mut mask = TracksMask::all();
        assert_eq!(extract_track_tokens(b"a0", 0, &mut mask), 2);
        assert_eq!(mask.audio, ALL_TRACKS);
        assert_eq!(mask.video, 0);
    }

    #[test]
    fn test_track_tokens_stop_at_foreign_byte() {
        let mut mask = TracksMask::all();
        assert_eq!(extract_track_tokens(b"v2x", 0, &mut mask), 2);
        assert_eq!(mask.video, 0b10);
    }

    #[test]
    fn test_split_uri_file_name() {
        let (path, file_name) = split_uri_file_name(b"/a/b/c.mp4", 1).unwrap();
        assert_eq!(path, b"/a/b");
        assert_eq!(file_name, b"c.mp4");

        let (path, file_name) = split_uri_file_name(b"/a/b/c.mp4", 2).unwrap();
        assert_eq!(path, b"/a");
        assert_eq!(file_name, b"b/c.mp4");

        let (path, file_name) = split_uri_file_name(b"/a/b/c.mp4", 3).unwrap();
        assert_eq!(path, b"");
        assert_eq!(file_name, b"a/b/c.mp4");
    }

    #[test]
    fn test_split_uri_file_name_too_many_components() {
        assert!(split_uri_file_name(b"/a/b/c.mp4", 4).is_none());
        assert!(split_uri_file_name(b"c.mp4", 1).is_none());
    }
}
