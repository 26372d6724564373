//! Integration tests for request routing.

use assert_matches::assert_matches;
use vodpath::config::Config;
use vodpath::request::{RequestKind, RequestParser};
use vodpath_common::{Error, Rejection};
use vodpath_parser::{Clip, Rate, TracksMask, ALL_SEQUENCES};

fn parser() -> RequestParser {
    RequestParser::new(&Config::default()).unwrap()
}

#[test]
fn test_segment_request() {
    let parsed = parser()
        .parse(b"/content/clipFrom/1000/movie.mp4/seg-5-c1-v1-a1.ts")
        .unwrap();

    assert_eq!(parsed.kind, RequestKind::Segment);
    assert_eq!(parsed.file_name.segment_index, 4);
    assert_eq!(parsed.file_name.clip_index, Some(0));
    assert_eq!(parsed.file_name.tracks_mask, TracksMask { video: 1, audio: 1 });

    let sequence = &parsed.media_set.sequences[0];
    assert_eq!(sequence.stripped_uri(), b"/content/movie.mp4");
    assert_eq!(sequence.source.uri, b"/content/clipFrom/1000/movie.mp4");
    assert_eq!(sequence.source.clip_from, 1000);
}

#[test]
fn test_thumbnail_request() {
    let parsed = parser().parse(b"/content/movie.mp4/thumb-90000.jpg").unwrap();
    assert_eq!(parsed.kind, RequestKind::Thumbnail { offset_ms: 90000 });
    assert_eq!(parsed.file_name.segment_index, 0);
    assert_eq!(parsed.media_set.sequence_count(), 1);
}

#[test]
fn test_multi_uri_request_consumes_sequence_mask() {
    let parsed = parser()
        .parse(b"/content/movie_,360,480,720,.mp4.urlset/seg-1-f1-f3.ts")
        .unwrap();

    assert_eq!(parsed.file_name.sequences_mask, ALL_SEQUENCES);
    assert!(parsed.media_set.has_multi_sequences);

    let indexes: Vec<u32> = parsed.media_set.sequences.iter().map(|s| s.index).collect();
    assert_eq!(indexes, vec![0, 2]);
    assert_eq!(
        parsed.media_set.sequences[1].stripped_uri(),
        b"/content/movie_720.mp4"
    );
}

#[test]
fn test_segment_index_is_required() {
    assert_matches!(
        parser().parse(b"/content/movie.mp4/seg-v1.ts"),
        Err(Error::BadRequest(Rejection::MissingSegmentIndex))
    );
}

#[test]
fn test_file_name_must_match_a_format() {
    assert_matches!(
        parser().parse(b"/content/movie.mp4/manifest.mpd"),
        Err(Error::BadRequest(Rejection::FileNameMismatch))
    );
}

#[test]
fn test_uri_without_slash_is_unsupported() {
    assert_matches!(
        parser().parse(b"seg-1.ts"),
        Err(Error::BadRequest(Rejection::UnsupportedRequest))
    );
}

#[test]
fn test_trailing_selector_garbage_is_rejected() {
    assert_matches!(
        parser().parse(b"/content/movie.mp4/seg-1-x.ts"),
        Err(Error::BadRequest(Rejection::TrailingGarbage))
    );
}

#[test]
fn test_progressive_request_ignores_segment_params() {
    let parsed = parser()
        .parse_progressive(b"/content/speed/1.5/clipTo/30000/movie.mp4")
        .unwrap();

    assert_eq!(parsed.kind, RequestKind::Progressive);
    let sequence = &parsed.media_set.sequences[0];
    assert_eq!(sequence.source.clip_to, 30000);
    assert_eq!(sequence.stripped_uri(), b"/content/speed/1.5/movie.mp4");
    assert_eq!(sequence.clip, Clip::Source { id: sequence.source.id });
}

#[test]
fn test_speed_param_builds_rate_filter() {
    let parsed = parser()
        .parse(b"/content/SPEED/0.5/movie.mp4/seg-1.ts")
        .unwrap();
    assert_matches!(&parsed.media_set.sequences[0].clip, Clip::RateFilter(filter) => {
        assert_eq!(filter.rate, Rate { num: 5, denom: 10 });
    });
}

#[test]
fn test_custom_formats_and_names() {
    let mut config = Config::default();
    config.formats.segment_prefix = "frag".to_string();
    config.formats.segment_extension = "m4s".to_string();
    config.params.clip_to = "end".to_string();
    config.uri.multi_uri_suffix = ".set".to_string();

    let parser = RequestParser::new(&config).unwrap();
    let parsed = parser
        .parse(b"/v_,a,b,.mp4/end/500.set/frag-2-f2.m4s")
        .unwrap();

    assert_eq!(parsed.file_name.segment_index, 1);
    let sequence = &parsed.media_set.sequences[0];
    assert_eq!(sequence.index, 1);
    assert_eq!(sequence.source.clip_to, 500);
    assert_eq!(sequence.stripped_uri(), b"/v_b.mp4");

    assert_matches!(
        parser.parse(b"/content/movie.mp4/seg-1.ts"),
        Err(Error::BadRequest(Rejection::FileNameMismatch))
    );
}

#[test]
fn test_invalid_config_is_rejected() {
    let mut config = Config::default();
    config.params.speed = "clipto".to_string();
    assert_matches!(RequestParser::new(&config), Err(Error::InvalidConfig(_)));

    let mut config = Config::default();
    config.uri.multi_uri_suffix.clear();
    assert_matches!(RequestParser::new(&config), Err(Error::InvalidConfig(_)));
}

#[test]
fn test_repeated_parses_are_identical() {
    let parser = parser();
    let uri = b"/content/movie_,a.mp4/tracks/v1,b.mp4,.urlset/seg-7-v1.ts";
    assert_eq!(parser.parse(uri).unwrap(), parser.parse(uri).unwrap());
}

#[test]
fn test_media_root_maps_sources() {
    let mut config = Config::default();
    config.uri.media_root = Some("/srv/media/".to_string());
    let parser = RequestParser::new(&config).unwrap();

    let parsed = parser
        .parse(b"/v_,a.mp4/clipTo/9000,b.mp4,.urlset/seg-1.ts")
        .unwrap();
    let mapped: Vec<&[u8]> = parsed.media_set.sequences.iter().map(|s| s.mapped_uri()).collect();
    assert_eq!(mapped, vec![&b"/srv/media/v_a.mp4"[..], &b"/srv/media/v_b.mp4"[..]]);
    assert_eq!(parsed.media_set.sequences[0].stripped_uri(), b"/v_a.mp4");

    let parsed = parser.parse_progressive(b"/content/movie.mp4").unwrap();
    assert_eq!(
        parsed.media_set.sequences[0].mapped_uri(),
        b"/srv/media/content/movie.mp4"
    );
}

#[test]
fn test_sources_are_unmapped_without_media_root() {
    let parsed = parser().parse(b"/content/movie.mp4/seg-1.ts").unwrap();
    let sequence = &parsed.media_set.sequences[0];
    assert_eq!(sequence.mapped_uri(), sequence.stripped_uri());
}

#[test]
fn test_empty_media_root_is_rejected() {
    let mut config = Config::default();
    config.uri.media_root = Some(String::new());
    assert_matches!(RequestParser::new(&config), Err(Error::InvalidConfig(_)));
}
