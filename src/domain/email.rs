use crate::error::SweepError;

/// Opaque id assigned by the mail provider.
pub type EmailId = String;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Email {
    pub id: EmailId,
    pub subject: String,
    pub sender: String,
    pub body: String,
}

/// Free-text rule the model judges each email against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Criterion(String);

impl Criterion {
    pub fn new(text: impl Into<String>) -> Result<Self, SweepError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(SweepError::InvalidCriterion);
        }
        Ok(Self(text))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteMode {
    /// Reversible move to the provider's trash folder.
    Trash,
    PermanentDelete,
}

impl DeleteMode {
    pub fn label(self) -> &'static str {
        match self {
            DeleteMode::Trash => "Move to Trash",
            DeleteMode::PermanentDelete => "Permanent Delete",
        }
    }
}
