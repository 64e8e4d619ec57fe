//! Action dispatcher
//!
//! Runs one backend mutation per call and turns the outcome into an
//! [`ActionResult`]; errors never escape. Nothing local changes until the
//! backend confirms: [`TicketBoard::apply`] swaps in the returned record
//! only for a successful result.

use crate::api::IhomsApi;
use crate::client::HttpClient;
use crate::error::{ClientError, ClientResult, ErrorKind, MSG_FORBIDDEN};
use crate::forms::{AddUserForm, NewTicketForm, ProfileUpdateForm};
use crate::view::normalize::{TicketView, normalize_ticket, normalize_user};
use crate::view::{TicketAction, TicketStats, UserView};
use shared::models::{RecordId, TicketUpdate, TicketUpdateCreate, UnassignRequest, same_id};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::future::Future;
use std::sync::Mutex;

/// Mutations the dispatcher knows how to run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ActionKind {
    Assign,
    Unassign,
    Resolve,
    CreateTicket,
    LoadUpdates,
    PostUpdate,
    UpdateProfile,
    AddUser,
}

impl ActionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Assign => "assign",
            Self::Unassign => "unassign",
            Self::Resolve => "resolve",
            Self::CreateTicket => "create_ticket",
            Self::LoadUpdates => "load_updates",
            Self::PostUpdate => "post_update",
            Self::UpdateProfile => "update_profile",
            Self::AddUser => "add_user",
        }
    }

    /// Shown when the backend gives no usable message
    pub fn failure_message(&self) -> &'static str {
        match self {
            Self::Assign => "Assign failed.",
            Self::Unassign => "Unassign failed.",
            Self::Resolve => "Resolve failed.",
            Self::CreateTicket => "An error occurred while creating the ticket.",
            Self::LoadUpdates => "Failed to load ticket updates.",
            Self::PostUpdate => "Failed to post update.",
            Self::UpdateProfile => "An error occurred while updating your profile.",
            Self::AddUser => "An error occurred while creating the user.",
        }
    }

    pub fn conflict_message(&self) -> Option<&'static str> {
        match self {
            Self::Assign => Some("Someone already took this ticket. Please refresh."),
            Self::Unassign => Some("Assignment changed while you were viewing it. Please refresh."),
            Self::Resolve => Some("Ticket state changed or already resolved/closed. Please refresh."),
            _ => None,
        }
    }

    pub fn forbidden_message(&self) -> &'static str {
        match self {
            Self::Resolve => "Only the current assignee can resolve this ticket.",
            _ => MSG_FORBIDDEN,
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-action in-flight flags
#[derive(Debug, Default)]
pub struct InFlight {
    active: Mutex<BTreeSet<ActionKind>>,
}

impl InFlight {
    /// Mark `action` busy. `None` when it already is.
    pub fn begin(&self, action: ActionKind) -> Option<InFlightGuard<'_>> {
        let mut active = self.active.lock().unwrap_or_else(|e| e.into_inner());
        active
            .insert(action)
            .then(|| InFlightGuard { owner: self, action })
    }

    pub fn is_busy(&self, action: ActionKind) -> bool {
        self.active
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .contains(&action)
    }
}

/// Clears its flag on drop
#[derive(Debug)]
pub struct InFlightGuard<'a> {
    owner: &'a InFlight,
    action: ActionKind,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.owner
            .active
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .remove(&self.action);
    }
}

/// Transient notification for a finished action
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Success(String),
    /// Recoverable by refreshing
    Warning(String),
    Error(String),
}

/// Outcome of one dispatched action
#[derive(Debug, Clone, PartialEq)]
pub struct ActionResult<T> {
    pub action: ActionKind,
    pub success: bool,
    pub data: Option<T>,
    /// Success text
    pub message: Option<String>,
    /// Failure text
    pub error: Option<String>,
    pub error_kind: Option<ErrorKind>,
    /// Field -> messages, from the backend's 422 or from client-side checks
    pub validation_errors: BTreeMap<String, Vec<String>>,
    /// Refused because the same action was already running; no request was sent
    pub busy: bool,
}

impl<T> ActionResult<T> {
    fn ok(action: ActionKind, data: T, message: Option<String>) -> Self {
        Self {
            action,
            success: true,
            data: Some(data),
            message,
            error: None,
            error_kind: None,
            validation_errors: BTreeMap::new(),
            busy: false,
        }
    }

    fn failed(action: ActionKind, kind: ErrorKind, error: String) -> Self {
        Self {
            action,
            success: false,
            data: None,
            message: None,
            error: Some(error),
            error_kind: Some(kind),
            validation_errors: BTreeMap::new(),
            busy: false,
        }
    }

    fn busy(action: ActionKind) -> Self {
        Self {
            action,
            success: false,
            data: None,
            message: None,
            error: None,
            error_kind: None,
            validation_errors: BTreeMap::new(),
            busy: true,
        }
    }

    fn invalid(action: ActionKind, errors: BTreeMap<String, Vec<String>>) -> Self {
        Self {
            validation_errors: errors,
            ..Self::failed(action, ErrorKind::Validation, crate::error::MSG_VALIDATION.to_string())
        }
    }

    fn from_error(action: ActionKind, ticket_id: Option<&str>, err: ClientError) -> Self {
        let kind = err.kind();
        let ticket_id = ticket_id.unwrap_or_default();
        let text = match kind {
            ErrorKind::Conflict => action
                .conflict_message()
                .map(str::to_string)
                .unwrap_or_else(|| err.user_message(action.failure_message())),
            ErrorKind::Forbidden if action == ActionKind::Resolve => {
                action.forbidden_message().to_string()
            }
            ErrorKind::Forbidden => err
                .server_message()
                .unwrap_or(action.forbidden_message())
                .to_string(),
            _ => err.user_message(action.failure_message()),
        };

        match kind {
            ErrorKind::Conflict => {
                tracing::warn!(action = %action, ticket_id, "Action rejected: record changed concurrently")
            }
            ErrorKind::Forbidden | ErrorKind::Unauthorized => {
                tracing::warn!(action = %action, ticket_id, error = %err, "Action not permitted")
            }
            ErrorKind::Network => {
                tracing::error!(action = %action, ticket_id, error = %err, "Action failed: transport error")
            }
            _ => tracing::warn!(action = %action, ticket_id, error = %err, "Action failed"),
        }

        let errors = err.field_errors().cloned().unwrap_or_default();
        Self {
            validation_errors: errors,
            ..Self::failed(action, kind, text)
        }
    }

    /// Notification to show, if any. Busy refusals show nothing and
    /// field-scoped validation failures are shown inline instead.
    pub fn notice(&self) -> Option<Notice> {
        if self.busy {
            return None;
        }
        if self.success {
            return self.message.clone().map(Notice::Success);
        }
        if !self.validation_errors.is_empty() {
            return None;
        }
        let error = self.error.clone()?;
        Some(match self.error_kind {
            Some(ErrorKind::Conflict) => Notice::Warning(error),
            _ => Notice::Error(error),
        })
    }

    /// First message for a form field
    pub fn field_error(&self, field: &str) -> Option<&str> {
        self.validation_errors
            .get(field)
            .and_then(|m| m.first())
            .map(String::as_str)
    }
}

/// Runs mutations against the backend
#[derive(Debug)]
pub struct ActionDispatcher<'a, C> {
    api: &'a IhomsApi<C>,
    in_flight: InFlight,
}

impl<'a, C: HttpClient> ActionDispatcher<'a, C> {
    pub fn new(api: &'a IhomsApi<C>) -> Self {
        Self {
            api,
            in_flight: InFlight::default(),
        }
    }

    pub fn is_busy(&self, action: ActionKind) -> bool {
        self.in_flight.is_busy(action)
    }

    async fn run<T, Fut>(
        &self,
        action: ActionKind,
        ticket_id: Option<&str>,
        call: impl FnOnce() -> Fut,
        message: impl FnOnce(&T) -> Option<String>,
    ) -> ActionResult<T>
    where
        Fut: Future<Output = ClientResult<T>>,
    {
        let Some(_guard) = self.in_flight.begin(action) else {
            tracing::debug!(action = %action, "Action already in flight, request not sent");
            return ActionResult::busy(action);
        };
        tracing::debug!(action = %action, ticket_id = ticket_id.unwrap_or_default(), "Dispatching action");

        match call().await {
            Ok(data) => {
                let message = message(&data);
                tracing::info!(action = %action, ticket_id = ticket_id.unwrap_or_default(), "Action confirmed");
                ActionResult::ok(action, data, message)
            }
            Err(err) => ActionResult::from_error(action, ticket_id, err),
        }
    }

    // ========== Ticket mutations ==========

    pub async fn assign_to_me(&self, ticket_id: &str) -> ActionResult<TicketView> {
        self.run(
            ActionKind::Assign,
            Some(ticket_id),
            || async { self.api.assign_ticket(ticket_id).await.map(normalize_ticket) },
            |_| None,
        )
        .await
    }

    /// Release a ticket. `expected_assignee` is who the viewer believes owns
    /// it; the backend answers 409 when that is stale.
    pub async fn unassign(
        &self,
        ticket_id: &str,
        expected_assignee: Option<&str>,
    ) -> ActionResult<TicketView> {
        let request = UnassignRequest {
            expected_assignee_id: expected_assignee.map(RecordId::from),
        };
        self.run(
            ActionKind::Unassign,
            Some(ticket_id),
            || async {
                self.api
                    .unassign_ticket(ticket_id, &request)
                    .await
                    .map(normalize_ticket)
            },
            |_| None,
        )
        .await
    }

    pub async fn resolve(&self, ticket_id: &str) -> ActionResult<TicketView> {
        self.run(
            ActionKind::Resolve,
            Some(ticket_id),
            || async { self.api.resolve_ticket(ticket_id).await.map(normalize_ticket) },
            |_| None,
        )
        .await
    }

    /// Run a gated ticket action as exactly one backend call.
    ///
    /// Reassign is the assign endpoint issued by someone allowed to take a
    /// ticket over; the backend moves ownership in one step.
    pub async fn perform(&self, action: TicketAction, ticket: &TicketView) -> ActionResult<TicketView> {
        match action {
            TicketAction::AssignToMe | TicketAction::Reassign => self.assign_to_me(&ticket.id).await,
            TicketAction::Unassign => self.unassign(&ticket.id, ticket.assignee_id.as_deref()).await,
            TicketAction::Resolve => self.resolve(&ticket.id).await,
        }
    }

    /// Create a ticket. Nothing is added locally; reload to see it.
    pub async fn create_ticket(&self, form: &NewTicketForm) -> ActionResult<TicketView> {
        let payload = match form.clone().into_payload() {
            Ok(payload) => payload,
            Err(errors) => return ActionResult::invalid(ActionKind::CreateTicket, errors.into_map()),
        };
        self.run(
            ActionKind::CreateTicket,
            None,
            || async { self.api.create_ticket(&payload).await.map(normalize_ticket) },
            |_| Some("Ticket created successfully".to_string()),
        )
        .await
    }

    // ========== Comment thread ==========

    pub async fn load_updates(&self, ticket_id: &str) -> ActionResult<Vec<TicketUpdate>> {
        self.run(
            ActionKind::LoadUpdates,
            Some(ticket_id),
            || self.api.ticket_updates(ticket_id),
            |_| None,
        )
        .await
    }

    pub async fn post_update(&self, ticket_id: &str, message: &str) -> ActionResult<TicketUpdate> {
        let message = message.trim();
        if message.is_empty() {
            let errors = BTreeMap::from([("message".to_string(), vec!["Message is required".to_string()])]);
            return ActionResult::invalid(ActionKind::PostUpdate, errors);
        }
        let update = TicketUpdateCreate {
            message: message.to_string(),
        };
        self.run(
            ActionKind::PostUpdate,
            Some(ticket_id),
            || self.api.post_ticket_update(ticket_id, &update),
            |_| None,
        )
        .await
    }

    // ========== Accounts ==========

    /// Update the viewer's email and, optionally, password
    pub async fn update_profile(&self, form: &ProfileUpdateForm) -> ActionResult<Option<UserView>> {
        let request = match form.clone().into_request() {
            Ok(request) => request,
            Err(errors) => return ActionResult::invalid(ActionKind::UpdateProfile, errors.into_map()),
        };
        let result = self
            .run(
                ActionKind::UpdateProfile,
                None,
                || self.api.update_profile(&request),
                |response| {
                    Some(
                        response
                            .message
                            .clone()
                            .unwrap_or_else(|| "Profile updated successfully".to_string()),
                    )
                },
            )
            .await;
        map_data(result, |response| response.user.map(normalize_user))
    }

    /// Create an account (admin user management)
    pub async fn add_user(&self, form: &AddUserForm) -> ActionResult<Option<UserView>> {
        let request = match form.clone().into_request() {
            Ok(request) => request,
            Err(errors) => return ActionResult::invalid(ActionKind::AddUser, errors.into_map()),
        };
        let result = self
            .run(
                ActionKind::AddUser,
                None,
                || self.api.register(&request),
                |_| Some("User created successfully".to_string()),
            )
            .await;
        map_data(result, |response| response.user.map(normalize_user))
    }
}

fn map_data<T, U>(result: ActionResult<T>, f: impl FnOnce(T) -> U) -> ActionResult<U> {
    ActionResult {
        action: result.action,
        success: result.success,
        data: result.data.map(f),
        message: result.message,
        error: result.error,
        error_kind: result.error_kind,
        validation_errors: result.validation_errors,
        busy: result.busy,
    }
}

// =============================================================================
// Ticket board
// =============================================================================

/// Loaded tickets plus the current selection.
///
/// Changes only through a bulk load ([`TicketBoard::replace_records`]) or a
/// confirmed action ([`TicketBoard::apply`]).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TicketBoard {
    tickets: Vec<TicketView>,
    selected: Option<String>,
}

impl TicketBoard {
    /// Board over `tickets`, first one selected
    pub fn new(tickets: Vec<TicketView>) -> Self {
        let selected = tickets.first().map(|t| t.id.clone());
        Self { tickets, selected }
    }

    pub fn tickets(&self) -> &[TicketView] {
        &self.tickets
    }

    pub fn get(&self, id: &str) -> Option<&TicketView> {
        self.tickets.iter().find(|t| same_id(&t.id, id))
    }

    pub fn selected(&self) -> Option<&TicketView> {
        self.selected.as_deref().and_then(|id| self.get(id))
    }

    /// Select a ticket by id. Returns `false` (selection unchanged) if absent.
    pub fn select(&mut self, id: &str) -> bool {
        match self.get(id).map(|t| t.id.clone()) {
            Some(id) => {
                self.selected = Some(id);
                true
            }
            None => false,
        }
    }

    /// Swap in a fresh bulk load. The selection survives if its id is
    /// still present, otherwise the first ticket is selected.
    pub fn replace_records(&mut self, tickets: Vec<TicketView>) {
        let keep = self
            .selected
            .as_deref()
            .and_then(|id| tickets.iter().find(|t| same_id(&t.id, id)))
            .map(|t| t.id.clone());
        self.selected = keep.or_else(|| tickets.first().map(|t| t.id.clone()));
        self.tickets = tickets;
    }

    /// Replace the ticket with `updated`'s id. Returns whether one was found.
    pub fn replace(&mut self, updated: TicketView) -> bool {
        let Some(slot) = self.tickets.iter_mut().find(|t| same_id(&t.id, &updated.id)) else {
            tracing::debug!(ticket_id = %updated.id, "Confirmed ticket not on board");
            return false;
        };
        if slot.status != updated.status && !slot.status.can_transition_to(updated.status) {
            tracing::warn!(
                ticket_id = %updated.id,
                from = %slot.status,
                to = %updated.status,
                "Backend reported an unexpected status transition"
            );
        }
        *slot = updated;
        true
    }

    /// Reconcile a dispatcher result. Failed or refused results leave the
    /// board untouched.
    pub fn apply(&mut self, result: &ActionResult<TicketView>) -> bool {
        match (&result.data, result.success) {
            (Some(ticket), true) => self.replace(ticket.clone()),
            _ => false,
        }
    }

    pub fn stats(&self) -> TicketStats {
        TicketStats::from_tickets(&self.tickets)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::TicketStatus;

    fn view(json: &str) -> TicketView {
        normalize_ticket(serde_json::from_str(json).unwrap())
    }

    fn board() -> TicketBoard {
        TicketBoard::new(vec![
            view(r#"{"id": 5, "title": "A", "status": "open"}"#),
            view(r#"{"id": 7, "title": "B", "status": "open"}"#),
            view(r#"{"id": 9, "title": "C", "status": "in_progress", "assignee_id": 3}"#),
        ])
    }

    fn confirmed(ticket: TicketView) -> ActionResult<TicketView> {
        ActionResult::ok(ActionKind::Assign, ticket, None)
    }

    #[test]
    fn test_apply_replaces_only_matching_record() {
        let mut board = board();
        assert!(board.select("7"));
        let before_other = board.get("5").cloned();

        let updated = view(r#"{"id": "7", "title": "B", "status": "in_progress", "assignee_id": 42}"#);
        assert!(board.apply(&confirmed(updated)));

        let seven = board.get("7").unwrap();
        assert_eq!(seven.assignee_id.as_deref(), Some("42"));
        assert_eq!(seven.status, TicketStatus::InProgress);
        assert_eq!(board.selected().unwrap().assignee_id.as_deref(), Some("42"));
        assert_eq!(board.get("5").cloned(), before_other);
        assert_eq!(board.tickets().len(), 3);
    }

    #[test]
    fn test_failed_result_leaves_board_unchanged() {
        let mut board = board();
        let snapshot = board.clone();
        let err = ClientError::Conflict("taken".into());
        let result = ActionResult::<TicketView>::from_error(ActionKind::Assign, Some("7"), err);
        assert!(!board.apply(&result));
        assert_eq!(board, snapshot);
        assert_eq!(
            result.notice(),
            Some(Notice::Warning("Someone already took this ticket. Please refresh.".into()))
        );
    }

    #[test]
    fn test_unexpected_transition_still_applies() {
        let mut board = board();
        let reopened = view(r#"{"id": 9, "title": "C", "status": "open"}"#);
        assert!(board.replace(reopened));
        assert_eq!(board.get("9").unwrap().status, TicketStatus::Open);
    }

    #[test]
    fn test_replace_records_keeps_selection_when_present() {
        let mut board = board();
        board.select("9");
        board.replace_records(vec![
            view(r#"{"id": 9, "title": "C2"}"#),
            view(r#"{"id": 11}"#),
        ]);
        assert_eq!(board.selected().unwrap().title, "C2");

        board.replace_records(vec![view(r#"{"id": 12}"#), view(r#"{"id": 13}"#)]);
        assert_eq!(board.selected().unwrap().id, "12");

        board.replace_records(Vec::new());
        assert!(board.selected().is_none());
    }

    #[test]
    fn test_error_messages_per_action() {
        let forbidden = || ClientError::Forbidden(String::new());
        let resolve = ActionResult::<()>::from_error(ActionKind::Resolve, Some("1"), forbidden());
        assert_eq!(resolve.error.as_deref(), Some("Only the current assignee can resolve this ticket."));

        let assign = ActionResult::<()>::from_error(ActionKind::Assign, Some("1"), forbidden());
        assert_eq!(assign.error.as_deref(), Some(MSG_FORBIDDEN));

        let unassign = ActionResult::<()>::from_error(
            ActionKind::Unassign,
            Some("1"),
            ClientError::Api { status: 400, message: String::new() },
        );
        assert_eq!(unassign.error.as_deref(), Some("Unassign failed."));
        assert_eq!(unassign.error_kind, Some(ErrorKind::Unknown));
    }

    #[test]
    fn test_validation_result_has_no_notice() {
        let err = ClientError::Validation {
            message: "invalid".into(),
            errors: BTreeMap::from([("title".to_string(), vec!["Required".to_string()])]),
        };
        let result = ActionResult::<()>::from_error(ActionKind::CreateTicket, None, err);
        assert_eq!(result.field_error("title"), Some("Required"));
        assert!(result.notice().is_none());
    }

    #[test]
    fn test_in_flight_flags_are_per_action() {
        let flags = InFlight::default();
        let guard = flags.begin(ActionKind::Assign).unwrap();
        assert!(flags.begin(ActionKind::Assign).is_none());
        assert!(flags.begin(ActionKind::Resolve).is_some());
        drop(guard);
        assert!(!flags.is_busy(ActionKind::Assign));
        assert!(flags.begin(ActionKind::Assign).is_some());
    }
}
