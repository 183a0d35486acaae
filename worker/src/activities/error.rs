use thiserror::Error;

#[derive(Debug, Error)]
pub enum ActivityFailure {
    #[error("{0} is required")]
    MissingRequiredField(&'static str),

    /// Raised by the reporting service or client; passed on untouched.
    #[error(transparent)]
    Delegated(#[from] anyhow::Error),
}

/// Treats `None` and `""` alike, as a missing required string.
pub fn require(value: Option<String>, field: &'static str) -> Result<String, ActivityFailure> {
    match value {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(ActivityFailure::MissingRequiredField(field)),
    }
}
