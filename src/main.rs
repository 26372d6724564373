mod cli;

use vodpath::config;
use vodpath::request::{ParsedRequest, RequestKind, RequestParser};

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use vodpath_parser::{Clip, Sequence, TracksMask, ALL_TRACKS};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "vodpath=trace,vodpath_parser=trace,vodpath_common=debug".to_string()
        } else {
            "vodpath=info,vodpath_parser=warn".to_string()
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Parse {
            uri,
            progressive,
            json,
        } => parse_uri(&uri, cli.config.as_deref(), progressive, json),
        Commands::Validate {
            config: config_path,
        } => {
            let path = config_path.or(cli.config);
            validate_config(path.as_deref())
        }
        Commands::Version => {
            println!("vodpath {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

fn parse_uri(
    uri: &str,
    config_path: Option<&std::path::Path>,
    progressive: bool,
    json: bool,
) -> Result<()> {
    let config = config::load_config_or_default(config_path)?;
    let parser = RequestParser::new(&config).context("Failed to build request parser")?;

    let parsed = if progressive {
        parser.parse_progressive(uri.as_bytes())
    } else {
        parser.parse(uri.as_bytes())
    }
    .with_context(|| format!("Failed to parse {}", uri))?;

    tracing::info!(
        sequences = parsed.media_set.sequence_count(),
        "Decoded {}",
        uri
    );

    if json {
        let json_str = serde_json::to_string_pretty(&parsed)?;
        println!("{}", json_str);
    } else {
        print_request(&parsed);
    }

    Ok(())
}

fn print_request(parsed: &ParsedRequest) {
    match parsed.kind {
        RequestKind::Segment => {
            println!("Request: segment {}", u64::from(parsed.file_name.segment_index) + 1)
        }
        RequestKind::Thumbnail { offset_ms } => println!("Request: thumbnail at {} ms", offset_ms),
        RequestKind::Progressive => println!("Request: progressive download"),
    }

    if let Some(clip_index) = parsed.file_name.clip_index {
        println!("Clip: {}", u64::from(clip_index) + 1);
    }
    println!("Tracks: {}", format_tracks(&parsed.file_name.tracks_mask));

    let media_set = &parsed.media_set;
    println!("\nSequences: {}", media_set.sequence_count());
    for sequence in &media_set.sequences {
        print_sequence(sequence);
    }
}

fn print_sequence(sequence: &Sequence) {
    let source = &sequence.source;
    println!("  [{}] {}", sequence.index, source.stripped_uri_lossy());

    if sequence.mapped_uri() != sequence.stripped_uri() {
        println!(
            "      File: {}",
            String::from_utf8_lossy(sequence.mapped_uri())
        );
    }

    if source.clip_from != 0 || source.clip_to != u32::MAX {
        if source.clip_to == u32::MAX {
            println!("      Clip: from {} ms", source.clip_from);
        } else {
            println!("      Clip: {} - {} ms", source.clip_from, source.clip_to);
        }
    }

    if source.tracks_mask != TracksMask::all() {
        println!("      Tracks: {}", format_tracks(&source.tracks_mask));
    }

    if let Clip::RateFilter(filter) = &sequence.clip {
        println!(
            "      Speed: {}x (clip {} over source {})",
            filter.rate,
            filter.id,
            sequence.clip.source_id()
        );
    }
}

fn format_tracks(mask: &TracksMask) -> String {
    let mut parts = Vec::new();
    for (label, bits) in [("video", mask.video), ("audio", mask.audio)] {
        match bits {
            0 => {}
            ALL_TRACKS => parts.push(format!("{} all", label)),
            bits => {
                let tracks: Vec<String> = (0..u32::BITS)
                    .filter(|&bit| bits & (1 << bit) != 0)
                    .map(|bit| (bit + 1).to_string())
                    .collect();
                parts.push(format!("{} {}", label, tracks.join(",")));
            }
        }
    }

    if parts.is_empty() {
        "none".to_string()
    } else {
        parts.join(", ")
    }
}

fn validate_config(path: Option<&std::path::Path>) -> Result<()> {
    match path {
        Some(p) => {
            println!("Validating config: {:?}", p);
            let config = config::load_config(p)?;
            RequestParser::new(&config).context("Failed to build request parser")?;
            println!("✓ Configuration is valid");
            print_config(&config);
        }
        None => {
            println!("No config file specified, using defaults");
            print_config(&config::Config::default());
        }
    }

    Ok(())
}

fn print_config(config: &config::Config) {
    let params = &config.params;
    let formats = &config.formats;
    println!("  Multi-uri suffix: {}", config.uri.multi_uri_suffix);
    if let Some(ref root) = config.uri.media_root {
        println!("  Media root: {}", root);
    }
    println!(
        "  Params: clip_to={:?} clip_from={:?} tracks={:?} speed={:?}",
        params.clip_to, params.clip_from, params.tracks, params.speed
    );
    println!(
        "  Segments: {}-<index>.{}",
        formats.segment_prefix, formats.segment_extension
    );
    println!(
        "  Thumbnails: {}-<offset>.{}",
        formats.thumb_prefix, formats.thumb_extension
    );
}
