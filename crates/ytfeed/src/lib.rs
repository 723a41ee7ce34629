pub mod extractor;
pub mod video;

/// Crate version, reported by `ytfeed --version` and the `channel` command.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
