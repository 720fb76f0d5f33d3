//! Utility functions for reading and printing byte values.
//!

use anyhow::Result;
use bytes::Bytes;

/// Read an entire [`Bytes`] slice into a [`String`].
///
/// Returns an error if the slice contains invalid UTF-8.
pub fn string_from_bytes(buf: Bytes) -> Result<String> {
    Ok(String::from_utf8(buf.as_ref().into())?)
}

/// Installs the `tracing` subscriber used by the binaries. `RUST_LOG`
/// takes precedence over `default_level`.
pub fn init_logging(default_level: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn utf8_round_trip() {
        let bytes = Bytes::from("some-data".to_string());
        assert_eq!(string_from_bytes(bytes).unwrap(), "some-data");
    }

    #[test]
    fn invalid_utf8_is_an_error() {
        assert!(string_from_bytes(Bytes::from_static(&[0xff, 0xfe])).is_err());
    }
}
