//! Companion form state controller.
//!
//! Holds the in-progress draft, per-field errors, and the `submitting` flag
//! for one form instance. All collaborators (submission client, notifier,
//! navigator) are injected at construction so the controller runs without
//! any UI environment.
//!
//! Phase machine:
//!
//! ```text
//! Idle -> Validating -> Idle                  (invalid, no network call)
//! Idle -> Validating -> Submitting -> Idle    (valid, backend failed)
//! Idle -> Validating -> Submitting -> Closed  (valid, saved)
//! ```
//!
//! A `Closed` form has discarded its draft; `submit` ignores it until
//! `initialize` opens it again.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};

use buddy_types::companion::{Category, Companion, CompanionDraft, CompanionField, CompanionId};
use buddy_types::error::ValidationErrors;

use crate::navigate::{HOME_ROUTE, Navigator};
use crate::notify::{FAILURE_MESSAGE, NotificationKind, Notifier, SUCCESS_MESSAGE};
use crate::submission::SubmissionClient;
use crate::validation;

/// Whether the form creates a new companion or edits an existing one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit(CompanionId),
}

impl FormMode {
    pub fn existing_id(&self) -> Option<&CompanionId> {
        match self {
            FormMode::Create => None,
            FormMode::Edit(id) => Some(id),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormPhase {
    Idle,
    Validating,
    Submitting,
    Closed,
}

impl FormPhase {
    fn in_flight(self) -> bool {
        matches!(self, FormPhase::Validating | FormPhase::Submitting)
    }
}

/// Result of a single `submit()` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Backend accepted the draft; user was notified and navigated home.
    Saved,
    /// Draft failed validation; no network call was made.
    Invalid(ValidationErrors),
    /// Backend call failed; draft is preserved for a manual retry.
    Failed,
    /// A submission was already in flight, or the form was already saved;
    /// this call did nothing.
    Ignored,
}

#[derive(Debug)]
struct FormState {
    draft: CompanionDraft,
    errors: ValidationErrors,
    mode: FormMode,
    phase: FormPhase,
}

impl FormState {
    fn from_initial(initial: Option<&Companion>) -> Self {
        match initial {
            Some(companion) => Self {
                draft: CompanionDraft::from(companion),
                errors: ValidationErrors::new(),
                mode: FormMode::Edit(companion.id.clone()),
                phase: FormPhase::Idle,
            },
            None => Self {
                draft: CompanionDraft::empty(),
                errors: ValidationErrors::new(),
                mode: FormMode::Create,
                phase: FormPhase::Idle,
            },
        }
    }
}

/// Single source of truth for one companion form.
///
/// `submit` takes `&self`, so two submissions can be polled concurrently on
/// the same task; the second one observes the in-flight flag and is ignored.
pub struct FormController<C: SubmissionClient, N: Notifier, V: Navigator> {
    client: C,
    notifier: N,
    navigator: V,
    categories: Vec<Category>,
    state: Mutex<FormState>,
    submitting: AtomicBool,
}

/// Clears the in-flight flag and leaves the in-flight phases however the
/// submission ends.
struct SubmittingGuard<'a> {
    flag: &'a AtomicBool,
    state: &'a Mutex<FormState>,
}

impl Drop for SubmittingGuard<'_> {
    fn drop(&mut self) {
        let mut state = lock(self.state);
        if state.phase.in_flight() {
            state.phase = FormPhase::Idle;
        }
        drop(state);
        self.flag.store(false, Ordering::Release);
    }
}

fn lock(state: &Mutex<FormState>) -> MutexGuard<'_, FormState> {
    state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl<C: SubmissionClient, N: Notifier, V: Navigator> FormController<C, N, V> {
    /// Create a controller and initialize it from `initial` (edit) or empty
    /// defaults (create).
    ///
    /// - `client`: performs the create / update call
    /// - `notifier`: shows success / failure
    /// - `navigator`: refreshes and returns home after success
    /// - `categories`: read-only option list, in display order
    pub fn new(
        client: C,
        notifier: N,
        navigator: V,
        categories: Vec<Category>,
        initial: Option<&Companion>,
    ) -> Self {
        Self {
            client,
            notifier,
            navigator,
            categories,
            state: Mutex::new(FormState::from_initial(initial)),
            submitting: AtomicBool::new(false),
        }
    }

    /// Reset the form, seeding it from `initial` or from empty defaults.
    /// Reopens a form closed by a successful save.
    pub fn initialize(&self, initial: Option<&Companion>) {
        let mut state = lock(&self.state);
        let phase = state.phase;
        *state = FormState::from_initial(initial);
        // An in-flight submission still owns the phase until its guard drops.
        if phase.in_flight() {
            state.phase = phase;
        }
        tracing::debug!(mode = ?state.mode, "Companion form initialized");
    }

    /// Apply one field change and re-validate that field.
    ///
    /// Returns the field's current violation, if any. Never rejects the edit.
    pub fn update(&self, field: CompanionField, value: impl Into<String>) -> Option<&'static str> {
        let mut state = lock(&self.state);
        state.draft.set(field, value.into());

        let violation = validation::validate_field(&state.draft, field);
        match violation {
            Some(message) => state.errors.insert(field, message),
            None => state.errors.remove(field),
        }
        tracing::trace!(%field, valid = violation.is_none(), "Companion field updated");
        violation
    }

    /// Validate and, if valid, send the draft.
    ///
    /// - Ignored while another submission is in flight.
    /// - Invalid drafts surface every field error and never touch the network.
    /// - Valid drafts produce exactly one `SubmissionClient::send` call;
    ///   `submitting` is true only for that call's duration.
    /// - On success: the draft is discarded and the form closes, then success
    ///   notification, `refresh()`, then `push("/")`.
    /// - On failure: generic failure notification; draft left unchanged.
    pub async fn submit(&self) -> SubmitOutcome {
        if self
            .submitting
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            tracing::debug!("Submission already in flight, ignoring");
            return SubmitOutcome::Ignored;
        }
        let guard = SubmittingGuard {
            flag: &self.submitting,
            state: &self.state,
        };

        let prepared = {
            let mut state = lock(&self.state);
            if state.phase == FormPhase::Closed {
                drop(state);
                tracing::debug!("Companion form already saved, ignoring");
                return SubmitOutcome::Ignored;
            }
            state.phase = FormPhase::Validating;
            match validation::validate(&state.draft) {
                Ok(()) => {
                    state.phase = FormPhase::Submitting;
                    Ok((state.draft.clone(), state.mode.existing_id().cloned()))
                }
                Err(errors) => {
                    state.errors = errors.clone();
                    Err(errors)
                }
            }
        };

        let (draft, existing) = match prepared {
            Ok(prepared) => prepared,
            Err(errors) => {
                tracing::debug!(violations = errors.len(), "Companion draft rejected");
                return SubmitOutcome::Invalid(errors);
            }
        };

        let action = if existing.is_some() { "update" } else { "create" };
        tracing::info!(
            action,
            name = %draft.name,
            "Submitting companion"
        );
        let result = self.client.send(&draft, existing.as_ref()).await;
        if result.is_ok() {
            let mut state = lock(&self.state);
            state.draft = CompanionDraft::empty();
            state.errors.clear();
            state.phase = FormPhase::Closed;
        }
        drop(guard);

        match result {
            Ok(()) => {
                self.notifier.notify(NotificationKind::Success, SUCCESS_MESSAGE);
                self.navigator.refresh();
                self.navigator.push(HOME_ROUTE);
                SubmitOutcome::Saved
            }
            Err(e) => {
                tracing::warn!(error = %e, "Companion submission failed");
                self.notifier.notify(NotificationKind::Failure, FAILURE_MESSAGE);
                SubmitOutcome::Failed
            }
        }
    }

    /// Snapshot of the current draft.
    pub fn draft(&self) -> CompanionDraft {
        lock(&self.state).draft.clone()
    }

    /// Snapshot of the current field errors.
    pub fn errors(&self) -> ValidationErrors {
        lock(&self.state).errors.clone()
    }

    pub fn error_for(&self, field: CompanionField) -> Option<&'static str> {
        lock(&self.state).errors.get(field)
    }

    /// True only while a backend call is in flight. Drives the disabled state
    /// of every input and the submit button.
    pub fn is_submitting(&self) -> bool {
        self.submitting.load(Ordering::Acquire)
    }

    pub fn mode(&self) -> FormMode {
        lock(&self.state).mode.clone()
    }

    pub fn phase(&self) -> FormPhase {
        lock(&self.state).phase
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use buddy_types::companion::CategoryId;
    use buddy_types::error::SubmissionError;
    use tokio::sync::Notify;

    use super::*;
    use crate::notify::LatestNotification;

    #[derive(Debug, Clone, PartialEq, Eq)]
    struct RecordedCall {
        draft: CompanionDraft,
        existing: Option<CompanionId>,
    }

    #[derive(Default)]
    struct MockClient {
        calls: Mutex<Vec<RecordedCall>>,
        fail: bool,
        gate: Option<Arc<Notify>>,
    }

    impl MockClient {
        fn ok() -> Self {
            Self::default()
        }

        fn failing() -> Self {
            Self {
                fail: true,
                ..Self::default()
            }
        }

        fn gated(gate: Arc<Notify>) -> Self {
            Self {
                gate: Some(gate),
                ..Self::default()
            }
        }

        fn calls(&self) -> Vec<RecordedCall> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl SubmissionClient for MockClient {
        async fn send(
            &self,
            draft: &CompanionDraft,
            existing: Option<&CompanionId>,
        ) -> Result<(), SubmissionError> {
            self.calls.lock().unwrap().push(RecordedCall {
                draft: draft.clone(),
                existing: existing.cloned(),
            });
            if let Some(gate) = &self.gate {
                gate.notified().await;
            }
            if self.fail {
                Err(SubmissionError::Status(500))
            } else {
                Ok(())
            }
        }
    }

    #[derive(Default)]
    struct MockNavigator {
        events: Mutex<Vec<String>>,
    }

    impl MockNavigator {
        fn events(&self) -> Vec<String> {
            self.events.lock().unwrap().clone()
        }
    }

    impl Navigator for MockNavigator {
        fn refresh(&self) {
            self.events.lock().unwrap().push("refresh".to_string());
        }

        fn push(&self, path: &str) {
            self.events.lock().unwrap().push(format!("push:{path}"));
        }
    }

    type TestController =
        FormController<Arc<MockClient>, Arc<LatestNotification>, Arc<MockNavigator>>;

    struct Harness {
        controller: TestController,
        client: Arc<MockClient>,
        notifier: Arc<LatestNotification>,
        navigator: Arc<MockNavigator>,
    }

    fn harness(client: MockClient, initial: Option<&Companion>) -> Harness {
        let client = Arc::new(client);
        let notifier = Arc::new(LatestNotification::new());
        let navigator = Arc::new(MockNavigator::default());
        let categories = vec![
            Category {
                id: CategoryId::new("cat_philosophy"),
                name: "Philosophy".to_string(),
            },
            Category {
                id: CategoryId::new("cat_science"),
                name: "Science".to_string(),
            },
        ];
        let controller = FormController::new(
            Arc::clone(&client),
            Arc::clone(&notifier),
            Arc::clone(&navigator),
            categories,
            initial,
        );
        Harness {
            controller,
            client,
            notifier,
            navigator,
        }
    }

    fn fill_valid(controller: &TestController) {
        controller.update(CompanionField::Src, "https://img.example/ada.png");
        controller.update(CompanionField::Name, "Ada Lovelace");
        controller.update(CompanionField::Description, "Mathematician");
        controller.update(CompanionField::CategoryId, "cat_science");
        controller.update(CompanionField::Instructions, "i".repeat(200));
        controller.update(CompanionField::Seed, "s".repeat(200));
    }

    fn existing_companion() -> Companion {
        Companion {
            id: CompanionId::new("cmp_42"),
            name: "Swami Vivekananda".to_string(),
            description: "Philosopher and Author".to_string(),
            instructions: "p".repeat(250),
            seed: "q".repeat(250),
            src: "https://img.example/swami.png".to_string(),
            category_id: CategoryId::new("cat_philosophy"),
        }
    }

    #[test]
    fn test_new_create_mode_starts_empty() {
        let h = harness(MockClient::ok(), None);
        assert_eq!(h.controller.mode(), FormMode::Create);
        assert_eq!(h.controller.draft(), CompanionDraft::empty());
        assert!(h.controller.errors().is_empty());
        assert!(!h.controller.is_submitting());
        assert_eq!(h.controller.phase(), FormPhase::Idle);
        assert_eq!(h.controller.categories().len(), 2);
    }

    #[test]
    fn test_new_edit_mode_prepopulates() {
        let companion = existing_companion();
        let h = harness(MockClient::ok(), Some(&companion));
        assert_eq!(h.controller.mode(), FormMode::Edit(CompanionId::new("cmp_42")));
        assert_eq!(h.controller.draft(), CompanionDraft::from(&companion));
    }

    #[test]
    fn test_update_stores_and_clears_field_error() {
        let h = harness(MockClient::ok(), None);

        let violation = h.controller.update(CompanionField::Seed, "too short");
        assert_eq!(violation, Some("Seed requires at least 200 characters."));
        assert_eq!(
            h.controller.error_for(CompanionField::Seed),
            Some("Seed requires at least 200 characters.")
        );

        let violation = h.controller.update(CompanionField::Seed, "s".repeat(200));
        assert_eq!(violation, None);
        assert_eq!(h.controller.error_for(CompanionField::Seed), None);
        assert_eq!(h.controller.draft().seed.len(), 200);
    }

    #[test]
    fn test_update_only_validates_touched_field() {
        let h = harness(MockClient::ok(), None);
        h.controller.update(CompanionField::Name, "Ada");
        // Untouched empty fields are not flagged until submit
        assert!(h.controller.errors().is_empty());
    }

    #[test]
    fn test_initialize_resets_state() {
        let h = harness(MockClient::ok(), None);
        h.controller.update(CompanionField::Name, "");
        assert!(!h.controller.errors().is_empty());

        let companion = existing_companion();
        h.controller.initialize(Some(&companion));
        assert!(h.controller.errors().is_empty());
        assert_eq!(h.controller.mode(), FormMode::Edit(companion.id.clone()));

        h.controller.initialize(None);
        assert_eq!(h.controller.mode(), FormMode::Create);
        assert_eq!(h.controller.draft(), CompanionDraft::empty());
    }

    #[tokio::test]
    async fn test_submit_invalid_makes_no_call() {
        let h = harness(MockClient::ok(), None);
        h.controller.update(CompanionField::Name, "Ada");

        let outcome = h.controller.submit().await;

        let errors = match outcome {
            SubmitOutcome::Invalid(errors) => errors,
            other => panic!("expected Invalid, got {other:?}"),
        };
        assert_eq!(errors.len(), 5);
        assert!(errors.get(CompanionField::Name).is_none());
        assert_eq!(h.controller.errors(), errors);
        assert!(h.client.calls().is_empty());
        assert!(h.notifier.current().is_none());
        assert!(h.navigator.events().is_empty());
        assert!(!h.controller.is_submitting());
        assert_eq!(h.controller.phase(), FormPhase::Idle);
    }

    #[tokio::test]
    async fn test_submit_valid_creates_and_navigates_home() {
        let h = harness(MockClient::ok(), None);
        fill_valid(&h.controller);

        let outcome = h.controller.submit().await;

        assert_eq!(outcome, SubmitOutcome::Saved);
        let calls = h.client.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].existing, None);
        assert_eq!(calls[0].draft.name, "Ada Lovelace");

        let shown = h.notifier.current().unwrap();
        assert_eq!(shown.kind, NotificationKind::Success);
        assert_eq!(shown.message, SUCCESS_MESSAGE);
        assert_eq!(h.navigator.events(), vec!["refresh", "push:/"]);
        assert!(h.controller.errors().is_empty());
        assert!(!h.controller.is_submitting());
    }

    #[tokio::test]
    async fn test_saved_form_discards_draft_and_ignores_resubmit() {
        let h = harness(MockClient::ok(), None);
        fill_valid(&h.controller);

        assert_eq!(h.controller.submit().await, SubmitOutcome::Saved);
        assert_eq!(h.controller.draft(), CompanionDraft::empty());
        assert_eq!(h.controller.phase(), FormPhase::Closed);

        assert_eq!(h.controller.submit().await, SubmitOutcome::Ignored);
        assert_eq!(h.client.calls().len(), 1);
        assert_eq!(h.navigator.events(), vec!["refresh", "push:/"]);
        assert!(!h.controller.is_submitting());
    }

    #[tokio::test]
    async fn test_initialize_reopens_saved_form() {
        let companion = existing_companion();
        let h = harness(MockClient::ok(), Some(&companion));
        assert_eq!(h.controller.submit().await, SubmitOutcome::Saved);

        h.controller.initialize(Some(&companion));

        assert_eq!(h.controller.phase(), FormPhase::Idle);
        assert_eq!(h.controller.submit().await, SubmitOutcome::Saved);
        assert_eq!(h.client.calls().len(), 2);
    }

    #[tokio::test]
    async fn test_edit_without_changes_resolves_to_update() {
        let companion = existing_companion();
        let h = harness(MockClient::ok(), Some(&companion));

        let outcome = h.controller.submit().await;

        assert_eq!(outcome, SubmitOutcome::Saved);
        let calls = h.client.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].existing, Some(CompanionId::new("cmp_42")));
        assert_eq!(calls[0].draft, CompanionDraft::from(&companion));
    }

    #[tokio::test]
    async fn test_submit_failure_preserves_draft_and_skips_navigation() {
        let h = harness(MockClient::failing(), None);
        fill_valid(&h.controller);
        let before = h.controller.draft();

        let outcome = h.controller.submit().await;

        assert_eq!(outcome, SubmitOutcome::Failed);
        assert_eq!(h.controller.draft(), before);
        let shown = h.notifier.current().unwrap();
        assert_eq!(shown.kind, NotificationKind::Failure);
        assert_eq!(shown.message, "Something went wrong");
        assert!(h.navigator.events().is_empty());
        assert!(!h.controller.is_submitting());
        assert_eq!(h.controller.phase(), FormPhase::Idle);
    }

    #[tokio::test]
    async fn test_manual_retry_after_failure_sends_again() {
        let h = harness(MockClient::failing(), None);
        fill_valid(&h.controller);

        assert_eq!(h.controller.submit().await, SubmitOutcome::Failed);
        assert_eq!(h.controller.submit().await, SubmitOutcome::Failed);
        assert_eq!(h.client.calls().len(), 2);
    }

    #[tokio::test]
    async fn test_second_submit_while_pending_is_ignored() {
        let gate = Arc::new(Notify::new());
        let h = harness(MockClient::gated(Arc::clone(&gate)), None);
        fill_valid(&h.controller);

        let first = h.controller.submit();
        let second = async {
            // Let the first submission reach the pending network call.
            tokio::task::yield_now().await;
            let in_flight = h.controller.is_submitting();
            let phase = h.controller.phase();
            let outcome = h.controller.submit().await;
            gate.notify_one();
            (in_flight, phase, outcome)
        };

        let (first, (in_flight, phase, second)) = tokio::join!(first, second);

        assert!(in_flight);
        assert_eq!(phase, FormPhase::Submitting);
        assert_eq!(first, SubmitOutcome::Saved);
        assert_eq!(second, SubmitOutcome::Ignored);
        assert_eq!(h.client.calls().len(), 1);
        assert!(!h.controller.is_submitting());
    }

    #[tokio::test]
    async fn test_dropped_submission_clears_flag() {
        let gate = Arc::new(Notify::new());
        let h = harness(MockClient::gated(gate), None);
        fill_valid(&h.controller);

        {
            let pending = h.controller.submit();
            tokio::pin!(pending);
            let polled = futures_util::poll!(pending.as_mut());
            assert!(polled.is_pending());
            assert!(h.controller.is_submitting());
        }

        assert!(!h.controller.is_submitting());
        assert_eq!(h.controller.phase(), FormPhase::Idle);
    }

    #[tokio::test]
    async fn test_failure_then_success_replaces_notification() {
        let h = harness(MockClient::ok(), None);
        h.notifier.notify(NotificationKind::Failure, FAILURE_MESSAGE);
        fill_valid(&h.controller);

        h.controller.submit().await;

        assert_eq!(h.notifier.current().unwrap().kind, NotificationKind::Success);
    }
}
