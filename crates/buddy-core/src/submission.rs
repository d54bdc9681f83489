//! Companion submission port.
//!
//! Translates a validated draft into a create-or-update call against the
//! backend. Implementations live in buddy-infra (e.g., `HttpSubmissionClient`).

use buddy_types::companion::{CompanionDraft, CompanionId};
use buddy_types::error::SubmissionError;

/// Which backend call a submission resolves to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionTarget<'a> {
    Create,
    Update(&'a CompanionId),
}

impl<'a> SubmissionTarget<'a> {
    pub fn for_existing(existing: Option<&'a CompanionId>) -> Self {
        match existing {
            Some(id) => SubmissionTarget::Update(id),
            None => SubmissionTarget::Create,
        }
    }
}

/// Sends a companion draft to the backend.
///
/// Uses native async fn in traits (RPITIT), consistent with every async
/// port in this workspace.
pub trait SubmissionClient: Send + Sync {
    /// Create (no `existing`) or update (`existing` id) a companion.
    ///
    /// Exactly one network call per invocation. Any 2xx is success.
    fn send(
        &self,
        draft: &CompanionDraft,
        existing: Option<&CompanionId>,
    ) -> impl std::future::Future<Output = Result<(), SubmissionError>> + Send;
}

impl<C: SubmissionClient> SubmissionClient for std::sync::Arc<C> {
    fn send(
        &self,
        draft: &CompanionDraft,
        existing: Option<&CompanionId>,
    ) -> impl std::future::Future<Output = Result<(), SubmissionError>> + Send {
        (**self).send(draft, existing)
    }
}
