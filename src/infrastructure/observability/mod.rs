//! Diagnostics for the collector.
//!
//! Events are the only thing written to stdout. Everything else goes through
//! `tracing` to stderr, which Splunk files under `splunkd.log`.

pub mod logging;

pub use logging::init_logging;
