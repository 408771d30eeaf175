use std::fmt;

use super::config::LabelRules;
use super::error::CaptureError;

/// A validated gesture label.
///
/// Names the class of sign being recorded and becomes the top-level
/// directory of the exported archive. Construction goes through
/// [`Label::parse`]; a `Label` in hand is always well-formed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Label(String);

impl Label {
    /// Validate a raw user-supplied label against `rules`.
    ///
    /// The input is trimmed first. Rejects empty input, input longer than
    /// `rules.max_length`, and characters outside ASCII alphanumerics plus
    /// `rules.allowed_punctuation`.
    pub fn parse(raw: &str, rules: &LabelRules) -> Result<Self, CaptureError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(CaptureError::InvalidLabel("label is empty".into()));
        }
        if trimmed.len() > rules.max_length {
            return Err(CaptureError::InvalidLabel(format!(
                "label exceeds {} characters",
                rules.max_length
            )));
        }
        if let Some(bad) = trimmed
            .chars()
            .find(|c| !c.is_ascii_alphanumeric() && !rules.allowed_punctuation.contains(c))
        {
            return Err(CaptureError::InvalidLabel(format!(
                "character {:?} is not allowed",
                bad
            )));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Label {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
