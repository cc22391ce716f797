use crate::identity::IdentityClient;
use crate::provider::GeminiClient;
use crate::store::PgSparkStore;

/// Shared handler state: one concrete client per external collaborator.
/// No mutable cross-request state lives here; everything durable is in the
/// store.
#[derive(Clone)]
pub struct AppState {
    pub identity: IdentityClient,
    pub store: PgSparkStore,
    pub provider: GeminiClient,
}
