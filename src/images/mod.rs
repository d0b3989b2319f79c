//! Image search capability.
//!
//! Provides the [`ImageSearch`] trait and a Bing implementation. A search
//! returns candidate image URLs best-first; memory building keeps the first.

pub mod bing;

use std::sync::Arc;

use crate::config::ImageConfig;
use crate::error::{PensieveError, Result};

/// Trait for keyword image search.
///
/// Methods block on network I/O; callers in async contexts should use
/// `tokio::task::spawn_blocking`.
pub trait ImageSearch: Send + Sync {
    /// Candidate image URLs for `query`, best match first.
    fn search(&self, query: &str) -> Result<Vec<String>>;

    /// The best match, if any.
    fn first(&self, query: &str) -> Result<Option<String>> {
        Ok(self.search(query)?.into_iter().next())
    }
}

/// Create an image search client from config.
///
/// Currently only `"bing"` is supported and it requires an API key.
pub fn create_image_search(config: &ImageConfig) -> Result<Arc<dyn ImageSearch>> {
    match config.provider.as_str() {
        "bing" => {
            if config.api_key.is_empty() {
                return Err(PensieveError::Configuration(
                    "image search requested but images.api_key is empty (set PENSIEVE_BING_KEY)"
                        .into(),
                ));
            }
            let client = bing::BingImageSearch::new(&config.endpoint, &config.api_key)?;
            tracing::info!(endpoint = %config.endpoint, "image search ready");
            Ok(Arc::new(client))
        }
        other => Err(PensieveError::Configuration(format!(
            "unknown image provider: {other}. Supported: bing"
        ))),
    }
}
