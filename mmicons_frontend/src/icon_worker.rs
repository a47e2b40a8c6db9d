use std::fmt::{Display, Formatter};
use std::sync::mpsc::{channel, Receiver, Sender};
use std::thread;
use std::thread::JoinHandle;
use log::{debug, info};
use mmicons_core::app_name::AppName;
use mmicons_core::generation::{BatchSummary, CancelToken, GenerationError, GenerationEvent, IconGenerator, RetryPolicy};
use mmicons_core::icon_service::IconService;
use mmicons_core::icon_set::IconSet;
use mmicons_core::request_clock::{Clock, RequestClock};
use mmicons_core::screenshot::Screenshot;
use mmicons_core::theme::Theme;

#[derive(Debug)]
pub enum IconWorkerError {
    InternalError(String),
    CommunicationError(String),
}

impl Display for IconWorkerError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            IconWorkerError::InternalError(s) => { write!(f, "internal error: {}", s) },
            IconWorkerError::CommunicationError(s) => { write!(f, "communication error: {}", s) },
        }
    }
}

#[derive(Debug)]
pub enum IconWorkMessage {
    NamesExtracted(Vec<AppName>),
    ExtractionFailed(String),
    Requesting { index: usize, name: AppName },
    IconReady { index: usize, name: AppName, bytes: Vec<u8> },
    RateLimited { index: usize, name: AppName, attempt: u32 },
    BatchFinished(BatchSummary),
    BatchFailed(GenerationError),
}

enum IconRequest {
    Extract(Vec<u8>),
    Generate { names: Vec<AppName>, theme: Theme },
}

/// Runs remote calls on a dedicated thread. The generator, and with it the request clock,
/// lives on that thread only, so every batch of the session shares one rate limit.
pub struct IconWorker {
    request_tx: Sender<IconRequest>,
    message_rx: Receiver<IconWorkMessage>,
    cancel: CancelToken,
    handle: Option<JoinHandle<()>>,
}

impl IconWorker {

    pub fn spawn<S, C>(service: S, clock: C, request_clock: RequestClock, retry_policy: RetryPolicy) -> Result<IconWorker, IconWorkerError>
    where
        S: IconService + Send + 'static,
        C: Clock + Send + 'static,
    {
        let (request_tx, request_rx) = channel::<IconRequest>();
        let (message_tx, message_rx) = channel::<IconWorkMessage>();
        let cancel = CancelToken::new();
        let worker_cancel = cancel.clone();

        let handle = thread::Builder::new()
            .name("icon_worker".to_string())
            .spawn(move || {
                let mut generator = IconGenerator::new(service, clock, request_clock, retry_policy);

                while let Ok(request) = request_rx.recv() {
                    match request {
                        IconRequest::Extract(bytes) => {
                            let _ = message_tx.send(IconWorker::extract_names(&generator, &bytes));
                        },

                        IconRequest::Generate { names, theme } => {
                            let mut scratch = IconSet::new();
                            let events_tx = message_tx.clone();

                            let result = generator.generate(&names, &theme, &mut scratch, &worker_cancel, |event| {
                                let _ = events_tx.send(IconWorker::event_message(event));
                            });

                            let message = match result {
                                Ok(summary) => IconWorkMessage::BatchFinished(summary),
                                Err(e) => IconWorkMessage::BatchFailed(e),
                            };

                            let _ = message_tx.send(message);
                        },
                    }
                }

                debug!("icon worker stopped");
            })
            .map_err(|e| IconWorkerError::InternalError(e.to_string()))?;

        info!("icon worker started...");

        Ok(IconWorker { request_tx, message_rx, cancel, handle: Some(handle) })
    }

    fn extract_names<S: IconService, C: Clock>(generator: &IconGenerator<S, C>, bytes: &[u8]) -> IconWorkMessage {
        let screenshot = match Screenshot::from_bytes(bytes) {
            Ok(screenshot) => screenshot,
            Err(e) => return IconWorkMessage::ExtractionFailed(e.to_string()),
        };

        match generator.service().extract_names(&screenshot) {
            Ok(names) => IconWorkMessage::NamesExtracted(names),
            Err(e) => IconWorkMessage::ExtractionFailed(e.to_string()),
        }
    }

    fn event_message(event: GenerationEvent) -> IconWorkMessage {
        match event {
            GenerationEvent::Requesting { index, name } => IconWorkMessage::Requesting { index, name },
            GenerationEvent::IconReady { index, name, bytes } => IconWorkMessage::IconReady { index, name, bytes },
            GenerationEvent::RateLimited { index, name, attempt } => IconWorkMessage::RateLimited { index, name, attempt },
        }
    }

    pub fn extract(&self, screenshot: Vec<u8>) -> Result<(), IconWorkerError> {
        self.request_tx.send(IconRequest::Extract(screenshot))
            .map_err(|e| IconWorkerError::CommunicationError(e.to_string()))
    }

    pub fn generate(&self, names: Vec<AppName>, theme: Theme) -> Result<(), IconWorkerError> {
        self.request_tx.send(IconRequest::Generate { names, theme })
            .map_err(|e| IconWorkerError::CommunicationError(e.to_string()))
    }

    /// Token shared with the worker thread. Once cancelled it stays cancelled: the running
    /// batch stops and later batches end before their first request.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    pub fn recv(&self) -> Result<IconWorkMessage, IconWorkerError> {
        self.message_rx.recv()
            .map_err(|e| IconWorkerError::CommunicationError(e.to_string()))
    }

    #[cfg(test)]
    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|handle| !handle.is_finished())
    }
}
