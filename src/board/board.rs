use std::sync::Arc;

use crate::board::filter::{filter_requests, RequestFilter};
use crate::client::RequestRepository;
use crate::config::ReconcileStrategy;
use crate::constants::DELETE_CONFIRM_PROMPT;
use crate::error::{TeammateError, TeammateResult};
use crate::logging::{log_debug, log_error, log_info};
use crate::models::{RequestField, TeamRequest};
use crate::notice::Notice;
use crate::session::Session;

/// The request form, closed or holding what it was opened for.
#[derive(Debug, Clone, PartialEq)]
pub enum Modal {
    Closed,
    Create,
    /// Editing; holds the request as it was when the form opened.
    Edit(TeamRequest),
}

impl Modal {
    pub fn is_open(&self) -> bool {
        !matches!(self, Modal::Closed)
    }
}

/// Local view of the backend's team requests for one logged-in user.
///
/// Holds the full collection as last seen, the search and "my requests" flags,
/// the request form and a pending delete confirmation. Only this board's own
/// mutations update its collection.
pub struct RequestBoard {
    repository: Arc<dyn RequestRepository>,
    session: Session,
    reconcile: ReconcileStrategy,
    requests: Vec<TeamRequest>,
    filter: RequestFilter,
    modal: Modal,
    draft: TeamRequest,
    pending_delete: Option<String>,
    notices: Vec<Notice>,
}

impl RequestBoard {
    pub fn new(repository: Arc<dyn RequestRepository>, session: Session) -> Self {
        let draft = TeamRequest::draft(&session.user_id, &session.user_name);
        Self {
            repository,
            session,
            reconcile: ReconcileStrategy::default(),
            requests: Vec::new(),
            filter: RequestFilter::default(),
            modal: Modal::Closed,
            draft,
            pending_delete: None,
            notices: Vec::new(),
        }
    }

    pub fn with_reconcile(mut self, reconcile: ReconcileStrategy) -> Self {
        self.reconcile = reconcile;
        self
    }

    /// A board with the collection fetched once. A failed fetch leaves it empty.
    pub async fn mount(
        repository: Arc<dyn RequestRepository>,
        session: Session,
        reconcile: ReconcileStrategy,
    ) -> Self {
        let mut board = Self::new(repository, session).with_reconcile(reconcile);
        let _ = board.load().await;
        board
    }

    /// Replace the local collection with the server's.
    pub async fn load(&mut self) -> TeammateResult<usize> {
        match self.repository.list_requests().await {
            Ok(requests) => {
                log_info(&format!("Loaded {} team requests", requests.len()));
                self.requests = requests;
                Ok(self.requests.len())
            }
            Err(e) => {
                log_error(&format!("Error fetching requests: {}", e));
                self.notices.push(Notice::error(format!("Failed to load requests: {}", e)));
                Err(e)
            }
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn reconcile(&self) -> ReconcileStrategy {
        self.reconcile
    }

    /// The full collection, unfiltered.
    pub fn requests(&self) -> &[TeamRequest] {
        &self.requests
    }

    /// The requests passing the current search query and "my requests" flag.
    pub fn visible(&self) -> Vec<&TeamRequest> {
        filter_requests(&self.requests, &self.filter, &self.session.user_id)
    }

    pub fn filter(&self) -> &RequestFilter {
        &self.filter
    }

    pub fn search_query(&self) -> &str {
        &self.filter.query
    }

    pub fn set_search_query(&mut self, query: impl Into<String>) {
        self.filter.query = query.into();
    }

    pub fn view_my_requests(&self) -> bool {
        self.filter.mine_only
    }

    pub fn toggle_my_requests(&mut self) {
        self.filter.mine_only = !self.filter.mine_only;
    }

    pub fn set_view_my_requests(&mut self, mine_only: bool) {
        self.filter.mine_only = mine_only;
    }

    pub fn find(&self, id: &str) -> Option<&TeamRequest> {
        self.requests.iter().find(|request| request.has_id(id))
    }

    /// Whether the session user may edit or delete this request.
    pub fn can_modify(&self, request: &TeamRequest) -> bool {
        request.is_owned_by(&self.session.user_id)
    }

    pub fn modal(&self) -> &Modal {
        &self.modal
    }

    pub fn draft(&self) -> &TeamRequest {
        &self.draft
    }

    pub fn open_create(&mut self) {
        self.draft = TeamRequest::draft(&self.session.user_id, &self.session.user_name);
        self.modal = Modal::Create;
    }

    pub fn open_edit(&mut self, id: &str) -> TeammateResult<()> {
        let request = self.owned(id)?.clone();
        self.draft = request.clone();
        self.modal = Modal::Edit(request);
        Ok(())
    }

    pub fn close_modal(&mut self) {
        self.modal = Modal::Closed;
    }

    /// Merge one field into the draft by its wire name, e.g. `projectName`.
    pub fn set_field(&mut self, name: &str, value: impl Into<String>) -> TeammateResult<()> {
        let field: RequestField = name.parse()?;
        self.set_draft_field(field, value);
        Ok(())
    }

    pub fn set_draft_field(&mut self, field: RequestField, value: impl Into<String>) {
        self.draft.set_field(field, value);
    }

    /// Send the draft: create in create mode, update in edit mode.
    /// On failure the form stays open with the draft untouched.
    pub async fn submit(&mut self) -> TeammateResult<TeamRequest> {
        let result = match self.modal.clone() {
            Modal::Closed => {
                return Err(TeammateError::StateError("No request form is open".to_string()))
            }
            Modal::Create => self.submit_create().await,
            Modal::Edit(original) => self.submit_update(&original).await,
        };

        match result {
            Ok(saved) => {
                self.modal = Modal::Closed;
                self.reconcile_after_mutation().await;
                Ok(saved)
            }
            Err(e) => {
                log_error(&format!("Error submitting request: {}", e));
                self.notices.push(Notice::error(format!("Failed to save request: {}", e)));
                Err(e)
            }
        }
    }

    async fn submit_create(&mut self) -> TeammateResult<TeamRequest> {
        let created = self.repository.create_request(&self.draft).await?;
        log_info(&format!("Created request {:?}", created.id));
        self.requests.push(created.clone());
        self.notices.push(Notice::success(format!("Request '{}' created", created.project_name)));
        Ok(created)
    }

    async fn submit_update(&mut self, original: &TeamRequest) -> TeammateResult<TeamRequest> {
        let id = original
            .id
            .clone()
            .ok_or_else(|| TeammateError::StateError("The request being edited has no id".to_string()))?;

        // identity and owner always come from the record that was opened
        let mut payload = self.draft.clone();
        payload.id = original.id.clone();
        payload.user_id = original.user_id.clone();
        payload.user_name = original.user_name.clone();

        let updated = self.repository.update_request(&id, &payload).await?;
        log_info(&format!("Updated request {}", id));
        for request in self.requests.iter_mut().filter(|r| r.has_id(&id)) {
            *request = updated.clone();
        }
        self.notices.push(Notice::success(format!("Request '{}' updated", updated.project_name)));
        Ok(updated)
    }

    /// Ask for confirmation before deleting `id`. Nothing is sent yet.
    pub fn request_delete(&mut self, id: &str) -> TeammateResult<&'static str> {
        self.owned(id)?;
        self.pending_delete = Some(id.to_string());
        Ok(DELETE_CONFIRM_PROMPT)
    }

    pub fn pending_delete(&self) -> Option<&str> {
        self.pending_delete.as_deref()
    }

    /// Answer the pending confirmation. Returns whether a delete went through.
    pub async fn confirm_delete(&mut self, confirmed: bool) -> TeammateResult<bool> {
        let Some(id) = self.pending_delete.take() else {
            return Err(TeammateError::StateError("No delete is awaiting confirmation".to_string()));
        };
        if !confirmed {
            log_debug(&format!("Delete of {} cancelled", id));
            return Ok(false);
        }

        match self.repository.delete_request(&id).await {
            Ok(()) => {
                log_info(&format!("Deleted request {}", id));
                self.requests.retain(|request| !request.has_id(&id));
                self.notices.push(Notice::success("Request deleted"));
                self.reconcile_after_mutation().await;
                Ok(true)
            }
            Err(e) => {
                log_error(&format!("Error deleting request: {}", e));
                self.notices.push(Notice::error(format!("Failed to delete request: {}", e)));
                Err(e)
            }
        }
    }

    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    fn owned(&self, id: &str) -> TeammateResult<&TeamRequest> {
        let request = self
            .find(id)
            .ok_or_else(|| TeammateError::NotFound(format!("Request {}", id)))?;
        if !self.can_modify(request) {
            return Err(TeammateError::Forbidden(format!(
                "Request {} belongs to {}",
                id, request.user_name
            )));
        }
        Ok(request)
    }

    async fn reconcile_after_mutation(&mut self) {
        if self.reconcile == ReconcileStrategy::Refetch {
            log_debug("Re-fetching requests after mutation");
            let _ = self.load().await;
        }
    }
}
