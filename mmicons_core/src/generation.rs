use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use log::{debug, info, warn};
use crate::app_name::AppName;
use crate::icon_service::IconService;
use crate::icon_set::IconSet;
use crate::remote_error::RemoteError;
use crate::request_clock::{Clock, RequestClock};
use crate::theme::Theme;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationError {
    EmptyTheme,
    Remote { name: AppName, index: usize, source: RemoteError },
    RetriesExhausted { name: AppName, index: usize, attempts: u32 },
    Cancelled { completed: usize },
}

impl Error for GenerationError {}

impl Display for GenerationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            GenerationError::EmptyTheme => write!(f, "theme must not be empty"),
            GenerationError::Remote { name, index, source } => write!(f, "icon #{} '{}' failed: {}", index + 1, name, source),
            GenerationError::RetriesExhausted { name, index, attempts } => {
                write!(f, "icon #{} '{}' still rate limited after {} attempts", index + 1, name, attempts)
            },
            GenerationError::Cancelled { completed } => write!(f, "generation cancelled after {} icon(s)", completed),
        }
    }
}

/// How many consecutive rate-limit retries one name may use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RetryPolicy {
    #[default]
    Unbounded,
    Limited(u32),
}

impl RetryPolicy {
    fn allows(&self, retries: u32) -> bool {
        match self {
            RetryPolicy::Unbounded => true,
            RetryPolicy::Limited(max) => retries <= *max,
        }
    }
}

/// Shared flag a caller sets to stop a running batch between two requests.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> CancelToken {
        CancelToken::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationEvent {
    Requesting { index: usize, name: AppName },
    IconReady { index: usize, name: AppName, bytes: Vec<u8> },
    RateLimited { index: usize, name: AppName, attempt: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BatchSummary {
    pub generated: usize,
    pub rate_limited: u32,
}

/// Generates icons one request at a time and keeps the request clock between batches.
pub struct IconGenerator<S: IconService, C: Clock> {
    service: S,
    clock: C,
    request_clock: RequestClock,
    retry_policy: RetryPolicy,
}

impl<S: IconService, C: Clock> IconGenerator<S, C> {
    pub fn new(service: S, clock: C, request_clock: RequestClock, retry_policy: RetryPolicy) -> IconGenerator<S, C> {
        IconGenerator {
            service,
            clock,
            request_clock,
            retry_policy,
        }
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    pub fn request_clock(&self) -> &RequestClock {
        &self.request_clock
    }

    pub fn generate<F>(&mut self, names: &[AppName], theme: &Theme, icons: &mut IconSet, cancel: &CancelToken, mut observer: F) -> Result<BatchSummary, GenerationError>
    where
        F: FnMut(GenerationEvent),
    {
        let mut summary = BatchSummary::default();

        if names.is_empty() {
            debug!("nothing to generate");
            return Ok(summary);
        }

        info!("generating {} icon(s) with theme '{}'", names.len(), theme);

        for (index, name) in names.iter().enumerate() {
            let mut retries: u32 = 0;

            loop {
                if cancel.is_cancelled() {
                    warn!("generation cancelled before '{}'", name);
                    return Err(GenerationError::Cancelled { completed: summary.generated });
                }

                self.request_clock.wait_for_slot(&self.clock);

                if cancel.is_cancelled() {
                    warn!("generation cancelled before '{}'", name);
                    return Err(GenerationError::Cancelled { completed: summary.generated });
                }

                observer(GenerationEvent::Requesting { index, name: name.clone() });

                let result = self.service.generate_icon(name, theme);
                self.request_clock.mark(self.clock.now());

                match result {
                    Ok(bytes) => {
                        debug!("icon '{}' received ({} bytes)", name, bytes.len());
                        icons.insert(name.clone(), bytes.clone());
                        summary.generated += 1;
                        observer(GenerationEvent::IconReady { index, name: name.clone(), bytes });
                        break;
                    },

                    Err(RemoteError::RateLimitExceeded) => {
                        retries += 1;
                        summary.rate_limited += 1;

                        if !self.retry_policy.allows(retries) {
                            warn!("giving up on '{}' after {} rate limited attempts", name, retries);
                            return Err(GenerationError::RetriesExhausted { name: name.clone(), index, attempts: retries });
                        }

                        warn!("rate limited on '{}' (attempt {}), retrying", name, retries);
                        observer(GenerationEvent::RateLimited { index, name: name.clone(), attempt: retries });
                        self.request_clock.backoff(&self.clock);
                    },

                    Err(source) => {
                        warn!("icon '{}' failed: {}", name, source);
                        return Err(GenerationError::Remote { name: name.clone(), index, source });
                    },
                }
            }
        }

        info!("generated {} icon(s)", summary.generated);
        Ok(summary)
    }
}
