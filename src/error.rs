use thiserror::Error;

/// Failures that degrade a single lookup rather than the whole run.
///
/// Persistence failures are deliberately not represented here: checkpoint
/// and final writes go through `anyhow` and abort the run.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("retry budget exhausted for {url}: {detail}")]
    FetchExhausted { url: String, detail: String },

    #[error("expected element missing: {0}")]
    ParseMismatch(String),

    #[error("no bout against {opponent} found in history listing")]
    AnchorNotFound { opponent: String },
}
