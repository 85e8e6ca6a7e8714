//! Version information.

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Version with the codec format revision, shown by `--version`.
pub const LONG_VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), " (codec format 1)");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_not_empty() {
        assert!(!VERSION.is_empty());
        assert!(LONG_VERSION.starts_with(VERSION));
    }
}
