use std::error::Error;
use std::fmt::{Display, Formatter};
use log::{debug, info, warn};
use mmicons_core::app_name::AppName;
use mmicons_core::icon_set::IconSet;
use mmicons_core::theme::Theme;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionPhase {
    #[default]
    Idle,
    Extracting,
    Ready,
    Generating,
    Failed(String),
}

impl SessionPhase {
    pub fn is_busy(&self) -> bool {
        matches!(self, SessionPhase::Extracting | SessionPhase::Generating)
    }
}

impl Display for SessionPhase {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionPhase::Idle => write!(f, "idle"),
            SessionPhase::Extracting => write!(f, "extracting"),
            SessionPhase::Ready => write!(f, "ready"),
            SessionPhase::Generating => write!(f, "generating"),
            SessionPhase::Failed(s) => write!(f, "failed ({})", s),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    NoScreenshot,
    NoTheme,
    Busy(SessionPhase),
    UnexpectedPhase(SessionPhase),
}

impl Error for SessionError {}

impl Display for SessionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionError::NoScreenshot => write!(f, "no screenshot uploaded"),
            SessionError::NoTheme => write!(f, "no theme set"),
            SessionError::Busy(phase) => write!(f, "session is busy: {}", phase),
            SessionError::UnexpectedPhase(phase) => write!(f, "unexpected session phase: {}", phase),
        }
    }
}

/// Everything the user sees: uploaded screenshot, extracted names, theme and icons.
///
/// Phases move idle -> extracting -> ready/failed, then ready -> generating -> ready/failed.
#[derive(Debug, Default)]
pub struct Session {
    screenshot: Option<Vec<u8>>,
    names: Vec<AppName>,
    theme: Option<Theme>,
    icons: IconSet,
    phase: SessionPhase,
    notice: Option<String>,
}

impl Session {
    pub fn new() -> Session {
        Session::default()
    }

    pub fn phase(&self) -> &SessionPhase {
        &self.phase
    }

    pub fn names(&self) -> &[AppName] {
        &self.names
    }

    #[cfg(test)]
    pub fn theme(&self) -> Option<&Theme> {
        self.theme.as_ref()
    }

    pub fn icons(&self) -> &IconSet {
        &self.icons
    }

    #[cfg(test)]
    pub fn screenshot(&self) -> Option<&[u8]> {
        self.screenshot.as_deref()
    }

    /// Last user-facing message (errors, rate limit notices, save results).
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn set_notice(&mut self, notice: impl Into<String>) {
        self.notice = Some(notice.into());
    }

    fn ensure_idle(&self) -> Result<(), SessionError> {
        if self.phase.is_busy() {
            Err(SessionError::Busy(self.phase.clone()))
        } else {
            Ok(())
        }
    }

    pub fn upload(&mut self, bytes: Vec<u8>) -> Result<(), SessionError> {
        self.ensure_idle()?;

        debug!("screenshot uploaded ({} bytes)", bytes.len());
        self.screenshot = Some(bytes);
        self.names.clear();
        self.phase = SessionPhase::Idle;
        self.notice = None;

        Ok(())
    }

    /// Names typed in by the user instead of being read from a screenshot.
    pub fn set_names(&mut self, names: Vec<AppName>) -> Result<(), SessionError> {
        self.ensure_idle()?;

        self.names = names;
        self.phase = SessionPhase::Ready;

        Ok(())
    }

    pub fn set_theme(&mut self, theme: Theme) -> Result<(), SessionError> {
        self.ensure_idle()?;
        self.theme = Some(theme);

        Ok(())
    }

    /// Returns the screenshot to send for extraction.
    pub fn begin_extraction(&mut self) -> Result<Vec<u8>, SessionError> {
        self.ensure_idle()?;

        let bytes = self.screenshot.clone().ok_or(SessionError::NoScreenshot)?;
        self.phase = SessionPhase::Extracting;

        Ok(bytes)
    }

    pub fn finish_extraction(&mut self, result: Result<Vec<AppName>, String>) -> Result<(), SessionError> {
        if self.phase != SessionPhase::Extracting {
            return Err(SessionError::UnexpectedPhase(self.phase.clone()));
        }

        match result {
            Ok(names) => {
                info!("{} app name(s) extracted", names.len());
                self.names = names;
                self.phase = SessionPhase::Ready;
            },

            Err(e) => {
                warn!("name extraction failed: {}", e);
                self.notice = Some(format!("could not read app names: {}", e));
                self.phase = SessionPhase::Failed(e);
            },
        }

        Ok(())
    }

    /// Returns the names and theme of the batch to run. An empty name list is a valid,
    /// empty batch.
    pub fn begin_generation(&mut self) -> Result<(Vec<AppName>, Theme), SessionError> {
        self.ensure_idle()?;

        let theme = self.theme.clone().ok_or(SessionError::NoTheme)?;
        self.phase = SessionPhase::Generating;

        Ok((self.names.clone(), theme))
    }

    pub fn record_icon(&mut self, name: AppName, bytes: Vec<u8>) {
        if self.icons.insert(name.clone(), bytes).is_some() {
            debug!("icon '{}' replaced", name);
        }
    }

    pub fn finish_generation(&mut self, result: Result<(), String>) -> Result<(), SessionError> {
        if self.phase != SessionPhase::Generating {
            return Err(SessionError::UnexpectedPhase(self.phase.clone()));
        }

        match result {
            Ok(()) => {
                self.phase = SessionPhase::Ready;
            },

            Err(e) => {
                self.notice = Some(e.clone());
                self.phase = SessionPhase::Failed(e);
            },
        }

        Ok(())
    }
}
