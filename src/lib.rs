//! Vodpath - request path decoder for media-segment delivery
//!
//! This library crate exposes configuration and request routing for the
//! `vodpath` binary and for integration testing. The decoding itself lives
//! in `vodpath-parser`.

pub mod config;
pub mod request;
