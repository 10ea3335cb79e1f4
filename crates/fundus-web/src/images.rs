use std::time::Duration;

use tracing::warn;
use ureq::Agent;

use fundus_core::report::EyeImages;
use fundus_export::pdf::ReportImages;

/// Upper bound on a single fundus image download.
const MAX_IMAGE_BYTES: u64 = 20 * 1024 * 1024;

/// Downloads eye images for embedding in the PDF.
///
/// Failures are logged and reported as `None`; the report is still produced
/// with a placeholder caption.
#[derive(Clone)]
pub struct ImageFetcher {
    agent: Agent,
}

impl ImageFetcher {
    pub fn new(timeout: Duration) -> Self {
        let config = Agent::config_builder()
            .timeout_global(Some(timeout))
            .build();
        Self {
            agent: Agent::new_with_config(config),
        }
    }

    pub async fn fetch(&self, url: &str) -> Option<Vec<u8>> {
        if !(url.starts_with("https://") || url.starts_with("http://")) {
            warn!(url, "skipping image with unsupported scheme");
            return None;
        }

        let agent = self.agent.clone();
        let target = url.to_string();
        let result = tokio::task::spawn_blocking(move || -> Result<Vec<u8>, ureq::Error> {
            let mut response = agent.get(&target).call()?;
            response
                .body_mut()
                .with_config()
                .limit(MAX_IMAGE_BYTES)
                .read_to_vec()
        })
        .await;

        match result {
            Ok(Ok(bytes)) => Some(bytes),
            Ok(Err(e)) => {
                warn!(url, error = %e, "image download failed");
                None
            }
            Err(e) => {
                warn!(url, error = %e, "image download task failed");
                None
            }
        }
    }

    /// Right eye first, then left. Fetches run one after the other.
    pub async fn fetch_pair(&self, images: &EyeImages) -> ReportImages {
        let right = match &images.right {
            Some(url) => self.fetch(url).await,
            None => None,
        };
        let left = match &images.left {
            Some(url) => self.fetch(url).await,
            None => None,
        };
        ReportImages { right, left }
    }
}
