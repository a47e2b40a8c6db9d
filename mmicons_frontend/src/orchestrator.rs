use std::error::Error;
use std::fmt::{Display, Formatter};
use std::fs;
use std::path::{Path, PathBuf};
use log::{debug, error, info, warn};
use mmicons_core::app_name::AppName;
use mmicons_core::generation::{CancelToken, GenerationError};
use mmicons_core::icon_store::{IconStore, StoreError};
use mmicons_core::theme::Theme;
use crate::icon_worker::{IconWorkMessage, IconWorker, IconWorkerError};
use crate::session::{Session, SessionError};

#[derive(Debug)]
pub enum OrchestratorError {
    Configuration(String),
    Io(String),
    Session(SessionError),
    Worker(IconWorkerError),
    Extraction(String),
    Generation(GenerationError),
    Store(StoreError),
}

impl Error for OrchestratorError {}

impl Display for OrchestratorError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            OrchestratorError::Configuration(s) => write!(f, "configuration error: {}", s),
            OrchestratorError::Io(s) => write!(f, "io error: {}", s),
            OrchestratorError::Session(e) => write!(f, "{}", e),
            OrchestratorError::Worker(e) => write!(f, "worker error: {}", e),
            OrchestratorError::Extraction(s) => write!(f, "name extraction failed: {}", s),
            OrchestratorError::Generation(e) => write!(f, "icon generation failed: {}", e),
            OrchestratorError::Store(e) => write!(f, "could not save icons: {}", e),
        }
    }
}

impl From<SessionError> for OrchestratorError {
    fn from(error: SessionError) -> Self {
        OrchestratorError::Session(error)
    }
}

impl From<IconWorkerError> for OrchestratorError {
    fn from(error: IconWorkerError) -> Self {
        OrchestratorError::Worker(error)
    }
}

/// Drives one session: screenshot upload, name extraction, icon generation and saving.
pub struct Orchestrator {
    session: Session,
    worker: IconWorker,
    store: IconStore,
}

impl Orchestrator {
    pub fn new(worker: IconWorker, store: IconStore) -> Orchestrator {
        Orchestrator {
            session: Session::new(),
            worker,
            store,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn cancel_token(&self) -> CancelToken {
        self.worker.cancel_token()
    }

    pub fn upload_file(&mut self, path: &Path) -> Result<(), OrchestratorError> {
        let bytes = fs::read(path)
            .map_err(|e| OrchestratorError::Io(format!("could not read {}: {}", path.display(), e)))?;

        info!("screenshot loaded from {}", path.display());
        self.upload(bytes)
    }

    pub fn upload(&mut self, bytes: Vec<u8>) -> Result<(), OrchestratorError> {
        self.session.upload(bytes)?;
        Ok(())
    }

    pub fn use_names(&mut self, names: Vec<AppName>) -> Result<(), OrchestratorError> {
        self.session.set_names(names)?;
        Ok(())
    }

    pub fn extract_names(&mut self) -> Result<&[AppName], OrchestratorError> {
        let bytes = self.session.begin_extraction()?;

        if let Err(e) = self.worker.extract(bytes) {
            self.session.finish_extraction(Err(e.to_string()))?;
            return Err(e.into());
        }

        info!("reading app names from screenshot ...");

        let result = loop {
            match self.worker.recv() {
                Ok(IconWorkMessage::NamesExtracted(names)) => break Ok(names),
                Ok(IconWorkMessage::ExtractionFailed(e)) => break Err(e),
                Ok(other) => debug!("ignoring worker message during extraction: {:?}", other),
                Err(e) => break Err(e.to_string()),
            }
        };

        self.session.finish_extraction(result.clone())?;

        match result {
            Ok(_) => Ok(self.session.names()),
            Err(e) => Err(OrchestratorError::Extraction(e)),
        }
    }

    pub fn generate_icons(&mut self, theme: &str) -> Result<usize, OrchestratorError> {
        let theme = Theme::new(theme).map_err(OrchestratorError::Generation)?;
        self.session.set_theme(theme)?;

        if self.worker.cancel_token().is_cancelled() {
            warn!("cancelled, no icon requested");
            self.session.set_notice("generation cancelled");
            return Err(OrchestratorError::Generation(GenerationError::Cancelled { completed: 0 }));
        }

        let (names, theme) = self.session.begin_generation()?;
        let total = names.len();

        if let Err(e) = self.worker.generate(names, theme) {
            self.session.finish_generation(Err(e.to_string()))?;
            return Err(e.into());
        }

        loop {
            let message = match self.worker.recv() {
                Ok(message) => message,
                Err(e) => {
                    self.session.finish_generation(Err(e.to_string()))?;
                    return Err(e.into());
                },
            };

            match message {
                IconWorkMessage::Requesting { index, name } => {
                    info!("[{}/{}] generating icon for '{}' ...", index + 1, total, name);
                },

                IconWorkMessage::IconReady { name, bytes, .. } => {
                    self.session.record_icon(name, bytes);
                },

                IconWorkMessage::RateLimited { name, attempt, .. } => {
                    let notice = format!("rate limited on '{}', retrying (attempt {})", name, attempt);
                    warn!("{}", notice);
                    self.session.set_notice(notice);
                },

                IconWorkMessage::BatchFinished(summary) => {
                    info!("{} icon(s) generated, {} rate limited attempt(s)", summary.generated, summary.rate_limited);
                    self.session.finish_generation(Ok(()))?;
                    return Ok(summary.generated);
                },

                IconWorkMessage::BatchFailed(e) => {
                    error!("{}", e);
                    self.session.finish_generation(Err(e.to_string()))?;
                    return Err(OrchestratorError::Generation(e));
                },

                other => debug!("ignoring worker message during generation: {:?}", other),
            }
        }
    }

    pub fn save(&mut self) -> Result<Vec<PathBuf>, OrchestratorError> {
        match self.store.save(self.session.icons()) {
            Ok(paths) => {
                self.session.set_notice(format!("{} icon(s) saved to {}", paths.len(), self.store.dir().display()));
                Ok(paths)
            },

            Err(e) => {
                error!("could not save icons: {}", e);
                self.session.set_notice(format!("could not save icons: {}", e));
                Err(OrchestratorError::Store(e))
            },
        }
    }
}
