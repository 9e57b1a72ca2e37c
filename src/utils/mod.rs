//! Utility helpers: filesystem providers and sinks.
pub mod files;

pub use files::{FsConfigProvider, FsSink, FsStateProvider, Sink, SourceProvider, SourceUnit};
