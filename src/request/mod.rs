//! Request routing.
//!
//! A [`RequestParser`] is built once from the [`Config`] and shared by all
//! requests. It splits a request uri into the media path and the file name,
//! recognizes the request kind from the file name and decodes both halves.

use serde::Serialize;
use vodpath_common::{Error, Rejection, Result};
use vodpath_parser::matcher::{parse_string, MatchRule, Span};
use vodpath_parser::tokens::split_uri_file_name;
use vodpath_parser::{parse_file_name, parse_uri_path, DecodedFilename, KeywordTable, MediaSet};

use crate::config::Config;

/// What a request asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RequestKind {
    /// One media segment.
    Segment,
    /// A still frame at a playback offset.
    Thumbnail { offset_ms: u64 },
    /// The whole (possibly clipped) file.
    Progressive,
}

/// A fully decoded request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParsedRequest {
    pub kind: RequestKind,
    /// Selectors from the file name, after the media set consumed them.
    pub file_name: DecodedFilename,
    pub media_set: MediaSet,
}

#[derive(Debug, Default)]
struct FileNameMatch {
    selectors: Span,
    offset: u64,
}

fn set_selectors(output: &mut FileNameMatch, span: Span) {
    output.selectors = span;
}

fn set_offset(output: &mut FileNameMatch, value: u64) {
    output.offset = value;
}

/// Request decoder configured for one deployment.
#[derive(Debug)]
pub struct RequestParser {
    multi_uri_suffix: Vec<u8>,
    media_root: Option<Vec<u8>>,
    uri_params: KeywordTable,
    pd_uri_params: KeywordTable,
    segment_grammar: Vec<MatchRule<FileNameMatch>>,
    thumb_grammar: Vec<MatchRule<FileNameMatch>>,
}

impl RequestParser {
    /// Compile the keyword tables and file name grammars of `config`.
    pub fn new(config: &Config) -> Result<Self> {
        if config.uri.multi_uri_suffix.is_empty() {
            return Err(Error::invalid_config("multi-uri suffix cannot be empty"));
        }

        let media_root = match config.uri.media_root.as_deref() {
            Some("") => return Err(Error::invalid_config("media root cannot be empty")),
            Some(root) => {
                let root = shellexpand::tilde(root);
                Some(root.trim_end_matches('/').as_bytes().to_vec())
            }
            None => None,
        };

        let formats = &config.formats;

        let segment_grammar = vec![
            MatchRule::fixed_owned(formats.segment_prefix.as_bytes()),
            MatchRule::DelimitedString(b'.', set_selectors),
            MatchRule::fixed_owned(formats.segment_extension.as_bytes()),
            MatchRule::End,
        ];

        let thumb_grammar = vec![
            MatchRule::fixed_owned(format!("{}-", formats.thumb_prefix)),
            MatchRule::Number(set_offset),
            MatchRule::DelimitedString(b'.', set_selectors),
            MatchRule::fixed_owned(formats.thumb_extension.as_bytes()),
            MatchRule::End,
        ];

        Ok(Self {
            multi_uri_suffix: config.uri.multi_uri_suffix.as_bytes().to_vec(),
            media_root,
            uri_params: KeywordTable::full(&config.params)?,
            pd_uri_params: KeywordTable::progressive(&config.params)?,
            segment_grammar,
            thumb_grammar,
        })
    }

    /// Decode a segment or thumbnail request uri.
    pub fn parse(&self, uri: &[u8]) -> Result<ParsedRequest> {
        let Some((path, file_name)) = split_uri_file_name(uri, 1) else {
            tracing::debug!(uri = %String::from_utf8_lossy(uri), "uri has no file name");
            return Err(Error::from(Rejection::UnsupportedRequest));
        };

        let (kind, selectors) = self.match_file_name(file_name)?;

        let expect_segment_index = kind == RequestKind::Segment;
        let mut request = parse_file_name(selectors.slice(file_name), expect_segment_index)?;

        let mut media_set =
            parse_uri_path(path, &self.multi_uri_suffix, &self.uri_params, &mut request)?;
        self.map_sources(&mut media_set);

        tracing::debug!(
            ?kind,
            sequences = media_set.sequence_count(),
            "parsed request"
        );

        Ok(ParsedRequest {
            kind,
            file_name: request,
            media_set,
        })
    }

    /// Decode a progressive download uri: the whole uri is the media path and
    /// every sequence and track is selected.
    pub fn parse_progressive(&self, uri: &[u8]) -> Result<ParsedRequest> {
        let mut request = DecodedFilename::default();
        let mut media_set =
            parse_uri_path(uri, &self.multi_uri_suffix, &self.pd_uri_params, &mut request)?;
        self.map_sources(&mut media_set);

        Ok(ParsedRequest {
            kind: RequestKind::Progressive,
            file_name: request,
            media_set,
        })
    }

    /// Point every source at its file under the media root, if one is set.
    fn map_sources(&self, media_set: &mut MediaSet) {
        let Some(root) = &self.media_root else {
            return;
        };

        for sequence in &mut media_set.sequences {
            let stripped = &sequence.source.stripped_uri;
            let mut mapped = Vec::with_capacity(root.len() + stripped.len() + 1);
            mapped.extend_from_slice(root);
            if stripped.first() != Some(&b'/') {
                mapped.push(b'/');
            }
            mapped.extend_from_slice(stripped);
            sequence.source.set_mapped_uri(mapped);
        }
    }

    fn match_file_name(&self, file_name: &[u8]) -> Result<(RequestKind, Span)> {
        let mut output = FileNameMatch::default();
        if parse_string(&self.segment_grammar, file_name, &mut output) {
            return Ok((RequestKind::Segment, output.selectors));
        }

        let mut output = FileNameMatch::default();
        if parse_string(&self.thumb_grammar, file_name, &mut output) {
            let kind = RequestKind::Thumbnail {
                offset_ms: output.offset,
            };
            return Ok((kind, output.selectors));
        }

        tracing::debug!(
            file_name = %String::from_utf8_lossy(file_name),
            "file name matches no request format"
        );
        Err(Error::from(Rejection::FileNameMismatch))
    }
}
