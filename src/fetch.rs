//! Background image resolution.
//!
//! Each background change bumps a generation token. Resolution runs on the
//! [`BackgroundExecutor`]; when its completion is drained on the UI
//! sequence the token is compared with the current generation and a
//! mismatch is dropped, so a slow fetch for an old source can never
//! overwrite a newer one. Superseded fetches are not aborted, only ignored.

use crate::background::{BackgroundExecutor, TaskOutcome, run_caught};
use crate::error::{CanvasError, CanvasResult};
use crate::model::BackgroundSource;
use anyhow::{Context as _, bail};
use image::{DynamicImage, GenericImageView};
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Progress of the current background resolution.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FetchStatus {
    #[default]
    Idle,
    Fetching,
    Fetched,
    /// `url` is `None` when raw image data failed to decode
    Failed { url: Option<String> },
}

impl FetchStatus {
    pub fn is_fetching(&self) -> bool {
        matches!(self, Self::Fetching)
    }
}

/// A decoded background image.
#[derive(Clone)]
pub struct DecodedImage {
    pub width: u32,
    pub height: u32,
    pub image: Arc<DynamicImage>,
}

impl DecodedImage {
    pub fn from_image(image: DynamicImage) -> Self {
        let (width, height) = image.dimensions();
        Self {
            width,
            height,
            image: Arc::new(image),
        }
    }

    pub fn from_bytes(bytes: &[u8]) -> CanvasResult<Self> {
        Ok(Self::from_image(image::load_from_memory(bytes)?))
    }
}

impl fmt::Debug for DecodedImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DecodedImage")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish()
    }
}

/// Turns a background source into pixels. Implementations run on worker
/// threads and may block.
pub trait ImageResolver: Send + Sync {
    fn resolve(&self, source: &BackgroundSource) -> anyhow::Result<DecodedImage>;
}

/// Resolves raw image data and local files. Network URLs are left to a
/// collaborator-provided resolver.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalImageResolver;

impl ImageResolver for LocalImageResolver {
    fn resolve(&self, source: &BackgroundSource) -> anyhow::Result<DecodedImage> {
        match source {
            BackgroundSource::None => bail!("no background source"),
            BackgroundSource::ImageData { data } => Ok(DecodedImage::from_bytes(data)?),
            BackgroundSource::Url { url } => {
                let url = image_url(url);
                let Some(path) = local_path(&url) else {
                    bail!("unsupported url scheme: {url}");
                };
                let bytes = std::fs::read(&path).with_context(|| format!("reading {}", path.display()))?;
                Ok(DecodedImage::from_bytes(&bytes)?)
            }
        }
    }
}

/// Unwrap search-engine links that carry the real image address in an
/// `imgurl` query parameter.
pub fn image_url(url: &str) -> String {
    let Some((_, query)) = url.split_once('?') else {
        return url.to_string();
    };
    query
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| *key == "imgurl")
        .and_then(|(_, value)| urlencoding::decode(value).ok())
        .map(|value| value.into_owned())
        .unwrap_or_else(|| url.to_string())
}

/// Local filesystem path for `file://` URLs and bare paths.
pub fn local_path(url: &str) -> Option<PathBuf> {
    if let Some(rest) = url.strip_prefix("file://") {
        let rest = rest.strip_prefix("localhost").unwrap_or(rest);
        let decoded = urlencoding::decode(rest).ok()?;
        return Some(PathBuf::from(decoded.into_owned()));
    }
    if url.contains("://") {
        return None;
    }
    Some(PathBuf::from(url))
}

/// Identifies one resolution request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    pub generation: u64,
    pub autofit: bool,
}

/// What a worker sends back.
#[derive(Debug)]
pub struct FetchCompletion {
    pub ticket: FetchTicket,
    pub url: Option<String>,
    pub result: Result<DecodedImage, String>,
}

/// What applying a completion did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Completion for a superseded request, dropped
    Stale { generation: u64 },
    Fetched { autofit: bool, width: u32, height: u32 },
    Failed { url: Option<String> },
}

pub struct FetchCoordinator {
    generation: u64,
    status: FetchStatus,
    image: Option<DecodedImage>,
    resolver: Arc<dyn ImageResolver>,
    executor: BackgroundExecutor<FetchCompletion>,
}

impl FetchCoordinator {
    pub fn new(resolver: Arc<dyn ImageResolver>, workers: usize) -> Self {
        Self {
            generation: 0,
            status: FetchStatus::Idle,
            image: None,
            resolver,
            executor: BackgroundExecutor::new(workers),
        }
    }

    pub fn status(&self) -> &FetchStatus {
        &self.status
    }

    /// The image of the last successful current fetch.
    pub fn image(&self) -> Option<&DecodedImage> {
        self.image.as_ref()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn pending_count(&self) -> usize {
        self.executor.pending_count()
    }

    pub fn set_resolver(&mut self, resolver: Arc<dyn ImageResolver>) {
        self.resolver = resolver;
    }

    /// Start a new generation for `source` without spawning any work.
    /// Returns `None` for an empty source, which settles to `Idle`.
    pub fn begin(&mut self, source: &BackgroundSource, autofit: bool) -> Option<FetchTicket> {
        self.generation += 1;
        self.image = None;
        if source.is_none() {
            self.status = FetchStatus::Idle;
            return None;
        }
        self.status = FetchStatus::Fetching;
        Some(FetchTicket {
            generation: self.generation,
            autofit,
        })
    }

    /// Start resolving `source` on the executor.
    pub fn request(&mut self, source: &BackgroundSource, autofit: bool) -> &FetchStatus {
        let Some(ticket) = self.begin(source, autofit) else {
            return &self.status;
        };
        info!(generation = ticket.generation, source = %source.describe(), "Resolving background");
        let resolver = Arc::clone(&self.resolver);
        let source = source.clone();
        self.executor.spawn("resolve_background", move || FetchCompletion {
            ticket,
            url: source.url_str().map(str::to_string),
            // A panicking resolver still settles this generation as failed.
            result: run_caught(|| resolver.resolve(&source))
                .and_then(|resolved| resolved.map_err(|e| format!("{e:#}"))),
        });
        &self.status
    }

    /// Apply a completion on the UI sequence.
    pub fn complete(&mut self, completion: FetchCompletion) -> FetchOutcome {
        let FetchCompletion { ticket, url, result } = completion;
        if ticket.generation != self.generation {
            debug!(
                stale = ticket.generation,
                current = self.generation,
                "Discarding stale background completion"
            );
            return FetchOutcome::Stale {
                generation: ticket.generation,
            };
        }
        match result {
            Ok(image) => {
                let outcome = FetchOutcome::Fetched {
                    autofit: ticket.autofit,
                    width: image.width,
                    height: image.height,
                };
                self.image = Some(image);
                self.status = FetchStatus::Fetched;
                outcome
            }
            Err(reason) => {
                let error = CanvasError::FetchFailed {
                    url: url.clone().unwrap_or_else(|| "image data".to_string()),
                };
                warn!(%reason, "{}", error);
                self.status = FetchStatus::Failed { url: url.clone() };
                FetchOutcome::Failed { url }
            }
        }
    }

    /// Apply every completion that has arrived so far.
    pub fn poll(&mut self) -> Vec<FetchOutcome> {
        let outcomes = self.executor.drain();
        self.apply_outcomes(outcomes)
    }

    /// Wait up to `timeout` for a completion, then apply all that arrived.
    pub fn wait(&mut self, timeout: Duration) -> Vec<FetchOutcome> {
        let outcomes = self.executor.drain_timeout(timeout);
        self.apply_outcomes(outcomes)
    }

    fn apply_outcomes(&mut self, outcomes: Vec<TaskOutcome<FetchCompletion>>) -> Vec<FetchOutcome> {
        outcomes
            .into_iter()
            .filter_map(|outcome| match outcome.result {
                Ok(completion) => Some(self.complete(completion)),
                Err(panic) => {
                    warn!(%panic, "Background resolver panicked");
                    None
                }
            })
            .collect()
    }
}
