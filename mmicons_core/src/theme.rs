use std::fmt::{Display, Formatter};
use crate::generation::GenerationError;

/// Free-text style applied to every icon prompt of a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme(String);

impl Theme {
    pub fn new(text: impl Into<String>) -> Result<Theme, GenerationError> {
        let text = text.into();

        if text.trim().is_empty() {
            return Err(GenerationError::EmptyTheme);
        }

        Ok(Theme(text))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for Theme {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
