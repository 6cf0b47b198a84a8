//! Render pipeline for a single generate request
//!
//! Writes the input document, registers both artifacts before the renderer
//! runs, and reads the output back. Successful artifacts are left for the
//! eviction loop; failed ones are removed together with their registry
//! entries before the error is returned.

use crate::error::GenerateError;
use crate::options::RenderOptions;
use crate::renderer::Runner;
use chrono::{DateTime, Utc};
use render_cache::{ArtifactKey, ArtifactPair, ArtifactStore, CacheRegistry};
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info, warn};

/// A rendered document
#[derive(Debug, Clone)]
pub struct RenderedPdf {
    pub key: String,
    pub data: Vec<u8>,
    pub generated_at: DateTime<Utc>,
}

pub struct RenderService {
    store: ArtifactStore,
    registry: Arc<CacheRegistry>,
    runner: Arc<dyn Runner>,
}

impl RenderService {
    pub fn new(store: ArtifactStore, registry: Arc<CacheRegistry>, runner: Arc<dyn Runner>) -> Self {
        Self {
            store,
            registry,
            runner,
        }
    }

    pub fn registry(&self) -> &Arc<CacheRegistry> {
        &self.registry
    }

    pub fn runner(&self) -> &Arc<dyn Runner> {
        &self.runner
    }

    pub async fn render(
        &self,
        html: &[u8],
        options: &RenderOptions,
    ) -> Result<RenderedPdf, GenerateError> {
        if html.is_empty() {
            return Err(GenerateError::EmptyBody);
        }

        let started_at = Instant::now();
        let key = ArtifactKey::derive(html, Utc::now());
        let pair = self.store.pair(&key);

        if let Err(e) = self.store.write(&pair.input, html).await {
            error!(key = %pair.key, error = %e, "Failed to write HTML file");
            // Not registered yet, so no entry to pair this removal with
            if let Err(cleanup) = self.store.remove(&pair.input).await {
                warn!(key = %pair.key, error = %cleanup, "Failed to remove partial HTML file");
            }
            return Err(GenerateError::Write(e));
        }

        // Output is registered before it exists so a stuck or crashed render
        // still leaves an entry for the eviction loop.
        self.registry.put_pair(&pair, Utc::now()).await;

        let args = options.command_args(&pair.input, &pair.output);
        if let Err(e) = self.runner.run(&args).await {
            error!(key = %pair.key, error = %e, "Failed to generate PDF");
            self.discard(&pair).await;
            return Err(GenerateError::Render(e));
        }

        let data = match self.store.read(&pair.output).await {
            Ok(data) => data,
            Err(e) => {
                error!(key = %pair.key, error = %e, "Failed to read PDF file");
                self.discard(&pair).await;
                return Err(GenerateError::ReadBack(e));
            }
        };

        info!(
            key = %pair.key,
            size = data.len(),
            elapsed_ms = started_at.elapsed().as_millis() as u64,
            "PDF generated successfully"
        );

        Ok(RenderedPdf {
            key: pair.key,
            data,
            generated_at: Utc::now(),
        })
    }

    /// Delete both artifacts and their entries in one registry critical
    /// section. A renderer that fails may still leave a partial output file.
    async fn discard(&self, pair: &ArtifactPair) {
        let mut registry = self.registry.lock().await;
        for path in [&pair.input, &pair.output] {
            self.remove_quietly(path).await;
        }
        registry.delete_pair(pair);
    }

    async fn remove_quietly(&self, path: &Path) {
        if let Err(e) = self.store.remove(path).await {
            warn!(path = ?path, error = %e, "Failed to remove artifact");
        }
    }
}
