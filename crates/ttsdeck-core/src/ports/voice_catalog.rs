//! Voice catalog port - enumeration of the voices the platform offers.

use async_trait::async_trait;

use crate::domain::Voice;

/// Port trait for voice enumeration.
///
/// The catalog may be populated asynchronously by the host: an empty
/// result is expected early in the session, not an error, and the
/// adapter may signal "catalog changed" any number of times. Adapters
/// degrade enumeration failures to an empty list (logging them) so
/// the controller only ever sees the current best-known catalog.
#[async_trait]
pub trait VoiceCatalogPort: Send + Sync {
    /// Enumerate the currently available voices.
    async fn list_voices(&self) -> Vec<Voice>;
}

/// A catalog that is always empty, for tests and hosts without voice
/// enumeration.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyCatalog;

#[async_trait]
impl VoiceCatalogPort for EmptyCatalog {
    async fn list_voices(&self) -> Vec<Voice> {
        Vec::new()
    }
}
