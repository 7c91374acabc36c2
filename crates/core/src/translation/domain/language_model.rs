use crate::shared::error::ServiceError;

/// Domain interface for a text-in/text-out language model.
///
/// Implementations are blocking and must bound their own latency (a timed
/// out call is a `ServiceError::Timeout`). `Sync` lets the pipeline run the
/// call on a worker thread while audio is being segmented.
pub trait LanguageModel: Send + Sync {
    /// Short name used in logs and errors.
    fn name(&self) -> &str;

    fn complete(&self, prompt: &str) -> Result<String, ServiceError>;
}
