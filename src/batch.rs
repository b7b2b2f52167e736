//! Batch orchestration: one title at a time, failures stay with their item.

use std::fmt;
use std::path::PathBuf;

use rand::rngs::StdRng;
use rand::{RngExt, SeedableRng};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::config::GeneratorConfig;
use crate::download::{HttpDownloader, ImageDownloader};
use crate::error::ThumbnailError;
use crate::filename::output_path;
use crate::hook::hook_text;
use crate::ideogram::{GenerationRequest, IdeogramClient, ImageGenerator};
use crate::prompt::{PromptTemplate, build_prompt, negative_prompt};

/// Outcome for one topic of a batch.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum GenerationResult {
    /// The thumbnail was written
    Success {
        /// Topic as given
        topic: String,
        /// Where the image landed
        file_path: PathBuf,
    },
    /// Something went wrong for this topic
    Failure {
        /// Topic as given
        topic: String,
        /// Human readable reason
        error: String,
    },
}

impl GenerationResult {
    /// The topic this result belongs to.
    pub fn topic(&self) -> &str {
        match self {
            Self::Success { topic, .. } | Self::Failure { topic, .. } => topic,
        }
    }

    /// True for [`GenerationResult::Success`].
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    fn from_outcome(topic: &str, outcome: Result<PathBuf, ThumbnailError>) -> Self {
        match outcome {
            Ok(file_path) => Self::Success {
                topic: topic.to_string(),
                file_path,
            },
            Err(err) => Self::Failure {
                topic: topic.to_string(),
                error: err.to_string(),
            },
        }
    }
}

/// Success/failure counts for a finished batch.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct BatchSummary {
    /// Thumbnails written
    pub succeeded: usize,
    /// Topics that failed
    pub failed: usize,
}

impl BatchSummary {
    /// Tallies a result list.
    pub fn from_results(results: &[GenerationResult]) -> Self {
        let succeeded = results.iter().filter(|result| result.is_success()).count();
        Self {
            succeeded,
            failed: results.len() - succeeded,
        }
    }
}

impl fmt::Display for BatchSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} successful, {} failed", self.succeeded, self.failed)
    }
}

/// Fires cancellation for a running batch.
#[derive(Debug)]
pub struct CancelHandle(watch::Sender<bool>);

impl CancelHandle {
    /// Stops the batch before its next item.
    pub fn cancel(&self) {
        self.0.send_replace(true);
    }
}

/// Observed by the batch loop between items.
#[derive(Clone, Debug)]
pub struct CancelSignal(watch::Receiver<bool>);

impl CancelSignal {
    /// A signal that never fires.
    pub fn never() -> Self {
        let (_tx, rx) = watch::channel(false);
        Self(rx)
    }

    /// Has cancellation been requested?
    pub fn is_cancelled(&self) -> bool {
        *self.0.borrow()
    }

    /// Resolves once cancellation is requested. If the handle is dropped
    /// without cancelling, this never resolves.
    pub async fn cancelled(&self) {
        let mut rx = self.0.clone();
        if rx.wait_for(|cancelled| *cancelled).await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}

/// Creates a linked cancel handle and signal.
pub fn cancellation() -> (CancelHandle, CancelSignal) {
    let (tx, rx) = watch::channel(false);
    (CancelHandle(tx), CancelSignal(rx))
}

/// Drives hook → prompt → generate → download for a list of topics.
pub struct ThumbnailGenerator<G, D> {
    config: GeneratorConfig,
    generator: G,
    downloader: D,
    rng: StdRng,
}

impl ThumbnailGenerator<IdeogramClient, HttpDownloader> {
    /// Wires up the real Ideogram client and HTTP downloader.
    pub fn new(config: GeneratorConfig) -> Result<Self, ThumbnailError> {
        config.validate()?;
        let generator = IdeogramClient::new(
            config.endpoint.clone(),
            &config.api_key,
            config.generation_timeout,
        )?;
        let downloader = HttpDownloader::new(config.download_timeout)?;
        Self::with_clients(config, generator, downloader)
    }
}

impl<G: ImageGenerator, D: ImageDownloader> ThumbnailGenerator<G, D> {
    /// Builds a generator around arbitrary clients. Validates the config and
    /// creates the output directory; nothing touches the network here.
    pub fn with_clients(
        config: GeneratorConfig,
        generator: G,
        downloader: D,
    ) -> Result<Self, ThumbnailError> {
        config.validate()?;
        config.ensure_output_dir()?;
        let seed = config.seed.unwrap_or_else(|| rand::rng().random());
        info!("Using random seed {seed}");
        Ok(Self {
            config,
            generator,
            downloader,
            rng: StdRng::seed_from_u64(seed),
        })
    }

    /// Builds the API request for a topic, picking a prompt template.
    pub fn build_request(&mut self, topic: &str) -> GenerationRequest {
        let hook = hook_text(topic);
        let template = PromptTemplate::choose(&mut self.rng);
        debug!("Hook for {topic:?} is {hook:?}, template {template:?}");
        let options = &self.config.options;
        GenerationRequest {
            prompt: build_prompt(topic, &hook, template),
            negative_prompt: options.negative_prompt.then(negative_prompt),
            rendering_speed: options.rendering_speed,
            aspect_ratio: options.aspect_ratio.clone(),
            quality: options.quality.clone(),
        }
    }

    /// Generates and saves a single thumbnail, returning where it was saved.
    pub async fn generate_thumbnail(&mut self, topic: &str) -> Result<PathBuf, ThumbnailError> {
        let topic = topic.trim();
        if topic.is_empty() {
            return Err(ThumbnailError::Input("topic is empty".to_string()));
        }
        info!("Generating thumbnail for: {topic}");

        let request = self.build_request(topic);
        let image_url = self.generator.generate(&request).await?;

        let file_path = output_path(&self.config.output_dir, topic);
        self.downloader.download(&image_url, &file_path).await?;
        info!("Thumbnail saved to: {}", file_path.display());
        Ok(file_path)
    }

    /// Runs every topic in order and returns one result per topic.
    ///
    /// A failing topic never stops the batch. Once `cancel` fires, the
    /// remaining topics are recorded as cancelled without being attempted.
    pub async fn generate_all(
        &mut self,
        topics: &[String],
        cancel: &CancelSignal,
    ) -> Vec<GenerationResult> {
        let mut results = Vec::with_capacity(topics.len());

        for (index, topic) in topics.iter().enumerate() {
            if index > 0 && !cancel.is_cancelled() {
                self.pause(cancel).await;
            }
            if cancel.is_cancelled() {
                debug!("Skipping {topic:?}, batch cancelled");
                results.push(GenerationResult::from_outcome(
                    topic,
                    Err(ThumbnailError::Cancelled),
                ));
                continue;
            }

            let outcome = self.generate_thumbnail(topic).await;
            if let Err(err) = &outcome {
                warn!("Failed to generate thumbnail for \"{topic}\": {err}");
            }
            results.push(GenerationResult::from_outcome(topic, outcome));
        }

        results
    }

    async fn pause(&mut self, cancel: &CancelSignal) {
        let delay = self.config.pacing.next_delay(&mut self.rng);
        if delay.is_zero() {
            return;
        }
        debug!("Waiting {}ms before the next request", delay.as_millis());
        tokio::select! {
            _ = tokio::time::sleep(delay) => {}
            _ = cancel.cancelled() => {
                info!("Cancellation requested, stopping batch");
            }
        }
    }
}
