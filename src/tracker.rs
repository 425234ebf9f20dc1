use std::time::Duration;

use async_trait::async_trait;
use tracing::{error, info, warn};

use crate::config::AppConfig;
use crate::extractor::{Extraction, ProductExtractor};
use crate::fetcher::PageFetcher;
use crate::models::AlertMessage;
use crate::notifier::Notifier;
use crate::store::ResultStore;
use crate::utils::error::AppError;

/// Timer seam so tests can drive the loop without real waits.
#[async_trait]
pub trait Clock: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

pub struct SystemClock;

#[async_trait]
impl Clock for SystemClock {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Fetching,
    Idle,
}

/// What one cycle amounted to. Every per-cycle fault is absorbed into one of
/// these; none of them stops the loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    AlertSent,
    AlertFailed,
    /// Price extracted but not below the threshold.
    PriceHeld,
    /// Title found, price unparseable; no comparison this cycle.
    Degraded,
    /// Expected elements missing from the page.
    PageMismatch,
    FetchFailed,
}

pub struct TrackingLoop {
    config: AppConfig,
    fetcher: PageFetcher,
    extractor: ProductExtractor,
    store: ResultStore,
    notifier: Box<dyn Notifier>,
    clock: Box<dyn Clock>,
}

impl TrackingLoop {
    pub fn new(
        config: AppConfig,
        notifier: Box<dyn Notifier>,
        clock: Box<dyn Clock>,
    ) -> crate::Result<Self> {
        let fetcher = PageFetcher::new(&config.user_agent)?;
        let store = ResultStore::new(&config.output_file);
        Ok(Self {
            config,
            fetcher,
            extractor: ProductExtractor::new(),
            store,
            notifier,
            clock,
        })
    }

    /// Alternates between one check and one fixed-interval wait, forever.
    /// There is no terminal state; the loop ends only with the process.
    pub async fn run(&self) {
        let interval = Duration::from_secs(self.config.check_interval_secs);
        let mut state = LoopState::Fetching;

        loop {
            state = match state {
                LoopState::Fetching => {
                    let outcome = self.run_cycle().await;
                    info!(?outcome, "cycle finished");
                    LoopState::Idle
                }
                LoopState::Idle => {
                    info!(secs = interval.as_secs(), "next check after the wait");
                    self.clock.sleep(interval).await;
                    LoopState::Fetching
                }
            };
        }
    }

    /// One fetch -> extract -> persist -> decide -> alert pass.
    pub async fn run_cycle(&self) -> CycleOutcome {
        info!(url = %self.config.product_url, "checking product");

        let html = match self.fetcher.fetch(&self.config.product_url).await {
            Ok(html) => html,
            Err(e) => {
                error!(%e, "fetch failed; skipping this cycle");
                return CycleOutcome::FetchFailed;
            }
        };

        let snapshot = match self.extractor.extract(&html, &self.config.product_url) {
            Extraction::Complete(snapshot) => snapshot,
            Extraction::PriceUnparsed { title, .. } => {
                info!(title = %title, "no usable price this cycle");
                return CycleOutcome::Degraded;
            }
            Extraction::ElementsMissing => return CycleOutcome::PageMismatch,
        };

        info!(title = %snapshot.title, price = snapshot.price, "current price");

        // A failed write is logged and the in-memory snapshot still drives
        // the alert decision.
        if let Err(e) = self.store.save(&snapshot) {
            warn!(%e, path = %self.store.path().display(), "failed to persist snapshot");
        }

        if snapshot.price < self.config.price_threshold {
            info!(
                price = snapshot.price,
                threshold = self.config.price_threshold,
                "price is below the threshold"
            );
            let message = AlertMessage::price_drop(&snapshot);
            match self.notifier.notify(&message).await {
                Ok(()) => CycleOutcome::AlertSent,
                Err(e @ AppError::SmtpAuth(_)) => {
                    error!(%e, "check the sender address and password");
                    CycleOutcome::AlertFailed
                }
                Err(e) => {
                    error!(%e, "failed to send the alert");
                    CycleOutcome::AlertFailed
                }
            }
        } else {
            info!(
                price = snapshot.price,
                threshold = self.config.price_threshold,
                "price is not below the threshold; no alert"
            );
            CycleOutcome::PriceHeld
        }
    }
}
