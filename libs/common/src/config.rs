//! Pagination configuration
//!
//! Page-size bounds are read from environment variables once at process
//! start and passed explicitly into every service; the composition layer
//! never reads ambient global state at query time.

use std::env;

/// Pagination configuration struct
#[derive(Debug, Clone)]
pub struct PaginationConfig {
    /// Page size applied when the caller does not send `limit`
    pub default_page_size: u32,
    /// Upper bound a caller-supplied `limit` is clamped to
    pub max_page_size: u32,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_page_size: 10,
            max_page_size: 100,
        }
    }
}

impl PaginationConfig {
    /// Create a new PaginationConfig from environment variables.
    ///
    /// Unset or unparsable values fall back to the defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let default_page_size = read_positive("CLIPHUB_DEFAULT_PAGE_SIZE")
            .unwrap_or(defaults.default_page_size);
        let max_page_size =
            read_positive("CLIPHUB_MAX_PAGE_SIZE").unwrap_or(defaults.max_page_size);

        Self {
            default_page_size: default_page_size.min(max_page_size),
            max_page_size,
        }
    }
}

fn read_positive(name: &str) -> Option<u32> {
    let raw = env::var(name).ok()?;
    match raw.parse::<u32>() {
        Ok(value) if value > 0 => Some(value),
        _ => {
            tracing::warn!("ignoring invalid {}: {:?}", name, raw);
            None
        }
    }
}
