use std::sync::Arc;
use std::time::Instant;

use crate::auth::{AuthField, AuthGateway, AuthMode};
use crate::board::{Modal, RequestBoard};
use crate::client::{AuthApi, RequestRepository, UniversityDirectory};
use crate::config::ReconcileStrategy;
use crate::constants::NOTIFICATION_TTL_SECS;
use crate::error::{TeammateError, TeammateResult};
use crate::interactive::keys::Action;
use crate::logging::{log_debug, log_error, log_info};
use crate::models::{RequestField, TeamRequest, UserType};
use crate::notice::{Notice, NoticeKind};
use crate::session::{Session, SessionStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Auth,
    Board,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickerKind {
    UserType,
    University,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Popup {
    Search,
    RequestForm,
    ConfirmDelete,
    Picker(PickerKind),
    Help,
}

/// One row of the login/registration form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthInput {
    Name,
    Email,
    Password,
    ConfirmPassword,
    UserType,
    University,
}

impl AuthInput {
    pub fn label(&self) -> &'static str {
        match self {
            AuthInput::Name => "Name",
            AuthInput::Email => "Email",
            AuthInput::Password => "Password",
            AuthInput::ConfirmPassword => "Confirm",
            AuthInput::UserType => "User type",
            AuthInput::University => "University",
        }
    }

    fn text_field(&self) -> Option<AuthField> {
        match self {
            AuthInput::Name => Some(AuthField::Name),
            AuthInput::Email => Some(AuthField::Email),
            AuthInput::Password => Some(AuthField::Password),
            AuthInput::ConfirmPassword => Some(AuthField::ConfirmPassword),
            AuthInput::UserType | AuthInput::University => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NotificationKind {
    Success,
    Error,
    Info,
}

#[derive(Debug, Clone)]
pub struct Notification {
    pub message: String,
    pub kind: NotificationKind,
    pub created_at: Instant,
    pub dismissed: bool,
}

impl From<Notice> for Notification {
    fn from(notice: Notice) -> Self {
        let kind = match notice.kind {
            NoticeKind::Success => NotificationKind::Success,
            NoticeKind::Error => NotificationKind::Error,
            NoticeKind::Info => NotificationKind::Info,
        };
        Self {
            message: notice.message,
            kind,
            created_at: Instant::now(),
            dismissed: false,
        }
    }
}

impl Notification {
    /// Seconds on screen before the notification fades. Errors linger longer.
    pub fn ttl_secs(&self) -> u64 {
        match self.kind {
            NotificationKind::Error => NOTIFICATION_TTL_SECS * 3,
            _ => NOTIFICATION_TTL_SECS,
        }
    }

    pub fn remaining_secs(&self) -> u64 {
        self.ttl_secs().saturating_sub(self.created_at.elapsed().as_secs())
    }

    pub fn is_expired(&self) -> bool {
        self.remaining_secs() == 0
    }
}

pub type RepositoryFactory =
    Box<dyn Fn(&Session) -> TeammateResult<Arc<dyn RequestRepository>> + Send + Sync>;

/// Everything the UI talks to outside itself.
pub struct Services {
    pub auth: Arc<dyn AuthApi>,
    pub directory: Arc<dyn UniversityDirectory>,
    pub repositories: RepositoryFactory,
    pub store: SessionStore,
    pub reconcile: ReconcileStrategy,
}

pub struct InteractiveApp {
    pub screen: Screen,
    pub gateway: AuthGateway,
    pub board: Option<RequestBoard>,
    pub popup: Option<Popup>,
    pub notifications: Vec<Notification>,
    pub auth_focus: usize,
    pub form_field: usize,
    pub picker_index: usize,
    pub selected_index: usize,
    pub pending_editor: bool,
    pub should_quit: bool,
    services: Services,
}

impl InteractiveApp {
    /// Open on the board when a session exists, otherwise on the login form.
    pub async fn start(services: Services, session: Option<Session>) -> Self {
        let mut app = Self {
            screen: Screen::Auth,
            gateway: AuthGateway::new(),
            board: None,
            popup: None,
            notifications: Vec::new(),
            auth_focus: 0,
            form_field: 0,
            picker_index: 0,
            selected_index: 0,
            pending_editor: false,
            should_quit: false,
            services,
        };

        match session {
            Some(session) => {
                if let Err(e) = app.enter_board(session).await {
                    app.notify_error(&e);
                    app.enter_auth().await;
                }
            }
            None => app.enter_auth().await,
        }
        app.collect_notices();
        app
    }

    async fn enter_auth(&mut self) {
        self.gateway = AuthGateway::mount(self.services.directory.as_ref()).await;
        self.board = None;
        self.popup = None;
        self.auth_focus = 0;
        self.screen = Screen::Auth;
    }

    async fn enter_board(&mut self, session: Session) -> TeammateResult<()> {
        let repository = (self.services.repositories)(&session)?;
        log_info(&format!("Opening request board for {}", session.user_id));
        let board = RequestBoard::mount(repository, session, self.services.reconcile).await;
        self.board = Some(board);
        self.selected_index = 0;
        self.popup = None;
        self.screen = Screen::Board;
        Ok(())
    }

    /// Rows of the auth form for the active mode.
    pub fn auth_inputs(&self) -> Vec<AuthInput> {
        match self.gateway.mode() {
            AuthMode::Login => vec![AuthInput::Email, AuthInput::Password],
            AuthMode::Register => {
                let mut inputs = vec![
                    AuthInput::Name,
                    AuthInput::Email,
                    AuthInput::Password,
                    AuthInput::ConfirmPassword,
                    AuthInput::UserType,
                ];
                if self.gateway.shows_university() {
                    inputs.push(AuthInput::University);
                }
                inputs
            }
        }
    }

    pub fn focused_input(&self) -> Option<AuthInput> {
        self.auth_inputs().get(self.auth_focus).copied()
    }

    pub fn picker_options(&self, kind: PickerKind) -> Vec<String> {
        match kind {
            PickerKind::UserType => UserType::ALL.iter().map(|t| t.to_string()).collect(),
            PickerKind::University => self
                .gateway
                .universities()
                .iter()
                .map(|u| u.name.clone())
                .collect(),
        }
    }

    pub fn active_form_field(&self) -> RequestField {
        RequestField::ALL[self.form_field % RequestField::ALL.len()]
    }

    pub fn selected_request(&self) -> Option<&TeamRequest> {
        self.board
            .as_ref()
            .and_then(|board| board.visible().get(self.selected_index).copied())
    }

    pub fn visible_notifications(&self) -> impl DoubleEndedIterator<Item = &Notification> {
        self.notifications.iter().filter(|n| !n.dismissed)
    }

    pub fn on_tick(&mut self) {
        self.notifications.retain(|n| !n.dismissed && !n.is_expired());
    }

    pub async fn handle_action(&mut self, action: Action) {
        log_debug(&format!("Action {:?} on {:?} / {:?}", action, self.screen, self.popup));
        match self.popup {
            Some(popup) => self.handle_popup_action(popup, action).await,
            None => match self.screen {
                Screen::Auth => self.handle_auth_action(action).await,
                Screen::Board => self.handle_board_action(action).await,
            },
        }
        self.collect_notices();
        self.clamp_selection();
    }

    async fn handle_auth_action(&mut self, action: Action) {
        let count = self.auth_inputs().len();
        match action {
            Action::Quit => self.should_quit = true,
            Action::Help => self.popup = Some(Popup::Help),
            Action::NextField | Action::MoveDown => self.auth_focus = (self.auth_focus + 1) % count,
            Action::PrevField | Action::MoveUp => {
                self.auth_focus = (self.auth_focus + count - 1) % count;
            }
            Action::ToggleAuthMode => {
                self.gateway.toggle_form();
                self.auth_focus = 0;
            }
            Action::ForgotPassword => self.gateway.forgot_password(),
            Action::TypeChar(c) => self.edit_auth_input(|value| value.push(c)),
            Action::Backspace => self.edit_auth_input(|value| {
                value.pop();
            }),
            Action::Confirm => match self.focused_input() {
                Some(AuthInput::UserType) => self.open_picker(PickerKind::UserType),
                Some(AuthInput::University) if !self.gateway.universities().is_empty() => {
                    self.open_picker(PickerKind::University)
                }
                _ => self.submit_auth().await,
            },
            _ => {}
        }
    }

    fn edit_auth_input(&mut self, edit: impl FnOnce(&mut String)) {
        match self.focused_input() {
            Some(input) => {
                if let Some(field) = input.text_field() {
                    let mut value = self.gateway.field(field).to_string();
                    edit(&mut value);
                    self.gateway.set_field(field, value);
                } else if input == AuthInput::University && self.gateway.universities().is_empty() {
                    // no options loaded: the university is typed in
                    let mut value = self.gateway.fields().university.clone();
                    edit(&mut value);
                    if let Err(e) = self.gateway.select_university(&value) {
                        self.notify_error(&e);
                    }
                }
            }
            None => {}
        }
    }

    fn open_picker(&mut self, kind: PickerKind) {
        let current = match kind {
            PickerKind::UserType => self.gateway.fields().user_type.map(|t| t.to_string()),
            PickerKind::University => Some(self.gateway.fields().university.clone()),
        };
        self.picker_index = current
            .and_then(|value| self.picker_options(kind).iter().position(|o| *o == value))
            .unwrap_or(0);
        self.popup = Some(Popup::Picker(kind));
    }

    async fn submit_auth(&mut self) {
        match self.gateway.mode() {
            AuthMode::Login => {
                let result = self
                    .gateway
                    .login(self.services.auth.as_ref(), &self.services.store)
                    .await;
                if let Ok(session) = result {
                    if let Err(e) = self.enter_board(session).await {
                        self.notify_error(&e);
                    }
                }
            }
            AuthMode::Register => {
                if self.gateway.register(self.services.auth.as_ref()).await.is_ok() {
                    self.auth_focus = 0;
                }
            }
        }
    }

    async fn handle_board_action(&mut self, action: Action) {
        let Some(board) = self.board.as_mut() else {
            return;
        };
        match action {
            Action::Quit => self.should_quit = true,
            Action::Help => self.popup = Some(Popup::Help),
            Action::MoveDown => {
                let len = board.visible().len();
                if len > 0 {
                    self.selected_index = (self.selected_index + 1) % len;
                }
            }
            Action::MoveUp => {
                let len = board.visible().len();
                if len > 0 {
                    self.selected_index = (self.selected_index + len - 1) % len;
                }
            }
            Action::Search => self.popup = Some(Popup::Search),
            Action::ToggleMine => {
                board.toggle_my_requests();
                self.selected_index = 0;
            }
            Action::Refresh => {
                let _ = board.load().await;
            }
            Action::NewRequest => {
                board.open_create();
                self.form_field = 0;
                self.popup = Some(Popup::RequestForm);
            }
            Action::EditRequest => {
                let Some(id) = self.selected_id() else { return };
                let result = self.board_mut().map(|board| board.open_edit(&id));
                match result {
                    Some(Ok(())) => {
                        self.form_field = 0;
                        self.popup = Some(Popup::RequestForm);
                    }
                    Some(Err(e)) => self.notify_error(&e),
                    None => {}
                }
            }
            Action::DeleteRequest => {
                let Some(id) = self.selected_id() else { return };
                let result = self.board_mut().map(|board| board.request_delete(&id).map(|_| ()));
                match result {
                    Some(Ok(())) => self.popup = Some(Popup::ConfirmDelete),
                    Some(Err(e)) => self.notify_error(&e),
                    None => {}
                }
            }
            Action::DismissNotification => {
                for notification in &mut self.notifications {
                    notification.dismissed = true;
                }
            }
            Action::Logout => self.logout().await,
            _ => {}
        }
    }

    async fn handle_popup_action(&mut self, popup: Popup, action: Action) {
        match popup {
            Popup::Help => {
                if matches!(action, Action::Cancel | Action::Confirm | Action::Help) {
                    self.popup = None;
                }
            }
            Popup::Picker(kind) => self.handle_picker_action(kind, action),
            Popup::Search => {
                let Some(board) = self.board.as_mut() else {
                    self.popup = None;
                    return;
                };
                match action {
                    Action::TypeChar(c) => {
                        let query = format!("{}{}", board.search_query(), c);
                        board.set_search_query(query);
                        self.selected_index = 0;
                    }
                    Action::Backspace => {
                        let mut query = board.search_query().to_string();
                        query.pop();
                        board.set_search_query(query);
                        self.selected_index = 0;
                    }
                    Action::Confirm => self.popup = None,
                    Action::Cancel => {
                        board.set_search_query("");
                        self.popup = None;
                    }
                    _ => {}
                }
            }
            Popup::RequestForm => self.handle_form_action(action).await,
            Popup::ConfirmDelete => {
                let confirmed = match action {
                    Action::Confirm => true,
                    Action::Cancel => false,
                    _ => return,
                };
                self.popup = None;
                if let Some(board) = self.board.as_mut() {
                    let _ = board.confirm_delete(confirmed).await;
                }
            }
        }
    }

    fn handle_picker_action(&mut self, kind: PickerKind, action: Action) {
        let options = self.picker_options(kind);
        match action {
            Action::MoveDown | Action::NextField if !options.is_empty() => {
                self.picker_index = (self.picker_index + 1) % options.len();
            }
            Action::MoveUp | Action::PrevField if !options.is_empty() => {
                self.picker_index = (self.picker_index + options.len() - 1) % options.len();
            }
            Action::Confirm => {
                self.popup = None;
                let Some(choice) = options.get(self.picker_index) else { return };
                let result = match kind {
                    PickerKind::UserType => choice.parse::<UserType>().map(|t| self.gateway.set_user_type(t)),
                    PickerKind::University => self.gateway.select_university(choice),
                };
                if let Err(e) = result {
                    self.notify_error(&e);
                }
            }
            Action::Cancel => self.popup = None,
            _ => {}
        }
    }

    async fn handle_form_action(&mut self, action: Action) {
        let field = self.active_form_field();
        let Some(board) = self.board.as_mut() else {
            self.popup = None;
            return;
        };
        match action {
            Action::NextField | Action::MoveDown => {
                self.form_field = (self.form_field + 1) % RequestField::ALL.len();
            }
            Action::PrevField | Action::MoveUp => {
                self.form_field = (self.form_field + RequestField::ALL.len() - 1) % RequestField::ALL.len();
            }
            Action::TypeChar(c) => {
                let value = format!("{}{}", board.draft().field(field), c);
                board.set_draft_field(field, value);
            }
            Action::Backspace => {
                let mut value = board.draft().field(field).to_string();
                value.pop();
                board.set_draft_field(field, value);
            }
            Action::ExternalEditor if field == RequestField::Description => {
                self.pending_editor = true;
            }
            Action::Confirm => {
                if board.submit().await.is_ok() {
                    self.popup = None;
                }
            }
            Action::Cancel => {
                board.close_modal();
                self.popup = None;
            }
            _ => {}
        }
    }

    /// Take the description back from the external editor. `None` means it was abandoned.
    pub fn apply_editor_result(&mut self, content: Option<String>) {
        self.pending_editor = false;
        if let (Some(content), Some(board)) = (content, self.board.as_mut()) {
            if board.modal().is_open() {
                board.set_draft_field(RequestField::Description, content);
            }
        }
    }

    pub fn editor_seed(&self) -> String {
        self.board
            .as_ref()
            .map(|board| board.draft().description.clone())
            .unwrap_or_default()
    }

    async fn logout(&mut self) {
        match self.services.store.clear() {
            Ok(_) => {
                log_info("Logged out");
                self.notifications.push(Notice::info("Logged out").into());
            }
            Err(e) => {
                log_error(&format!("Failed to clear session: {}", e));
                self.notify_error(&e);
            }
        }
        self.enter_auth().await;
    }

    fn board_mut(&mut self) -> Option<&mut RequestBoard> {
        self.board.as_mut()
    }

    fn selected_id(&self) -> Option<String> {
        self.selected_request().and_then(|request| request.id.clone())
    }

    pub fn is_editing(&self) -> bool {
        self.board
            .as_ref()
            .map(|board| matches!(board.modal(), Modal::Edit(_)))
            .unwrap_or(false)
    }

    fn notify_error(&mut self, error: &TeammateError) {
        self.notifications.push(Notice::error(error.to_string()).into());
    }

    fn collect_notices(&mut self) {
        let mut notices = self.gateway.take_notices();
        if let Some(board) = self.board.as_mut() {
            notices.extend(board.take_notices());
        }
        self.notifications.extend(notices.into_iter().map(Notification::from));
    }

    fn clamp_selection(&mut self) {
        let len = self.board.as_ref().map(|board| board.visible().len()).unwrap_or(0);
        if self.selected_index >= len {
            self.selected_index = len.saturating_sub(1);
        }
        let count = self.auth_inputs().len();
        if self.auth_focus >= count {
            self.auth_focus = count.saturating_sub(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{LoginRequest, LoginResponse, RegisterRequest, RegisterResponse, University};
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct FakeBackend {
        requests: Mutex<Vec<TeamRequest>>,
    }

    #[async_trait]
    impl AuthApi for FakeBackend {
        async fn login(&self, body: &LoginRequest) -> TeammateResult<LoginResponse> {
            Ok(LoginResponse {
                success: body.password == "secret",
                token: Some("tok".into()),
                message: Some("Wrong password".into()),
                user_id: Some("u1".into()),
                user_name: Some("Ada".into()),
            })
        }

        async fn register(&self, _body: &RegisterRequest) -> TeammateResult<RegisterResponse> {
            Ok(RegisterResponse { success: true, message: None })
        }
    }

    #[async_trait]
    impl UniversityDirectory for FakeBackend {
        async fn list_universities(&self) -> TeammateResult<Vec<University>> {
            Ok(vec![University { name: "MIT".into() }, University { name: "ETH".into() }])
        }
    }

    #[async_trait]
    impl RequestRepository for FakeBackend {
        async fn list_requests(&self) -> TeammateResult<Vec<TeamRequest>> {
            Ok(self.requests.lock().unwrap().clone())
        }

        async fn create_request(&self, draft: &TeamRequest) -> TeammateResult<TeamRequest> {
            let mut created = draft.clone();
            created.id = Some("new".into());
            Ok(created)
        }

        async fn update_request(&self, _id: &str, request: &TeamRequest) -> TeammateResult<TeamRequest> {
            Ok(request.clone())
        }

        async fn delete_request(&self, _id: &str) -> TeammateResult<()> {
            Ok(())
        }
    }

    fn owned(id: &str, user_id: &str) -> TeamRequest {
        TeamRequest {
            id: Some(id.into()),
            user_id: user_id.into(),
            user_name: user_id.into(),
            project_name: format!("Project {}", id),
            ..Default::default()
        }
    }

    fn services(dir: &tempfile::TempDir) -> Services {
        let backend = Arc::new(FakeBackend {
            requests: Mutex::new(vec![owned("1", "u1"), owned("2", "u2")]),
        });
        let repo = backend.clone();
        Services {
            auth: backend.clone(),
            directory: backend,
            repositories: Box::new(move |_: &Session| Ok(repo.clone() as Arc<dyn RequestRepository>)),
            store: SessionStore::new(dir.path().join("session.json")),
            reconcile: ReconcileStrategy::TrustResponse,
        }
    }

    async fn type_text(app: &mut InteractiveApp, text: &str) {
        for c in text.chars() {
            app.handle_action(Action::TypeChar(c)).await;
        }
    }

    #[tokio::test]
    async fn test_login_opens_board() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = InteractiveApp::start(services(&dir), None).await;
        assert_eq!(app.screen, Screen::Auth);
        assert_eq!(app.gateway.universities().len(), 2);

        type_text(&mut app, "ada@example.com").await;
        app.handle_action(Action::NextField).await;
        type_text(&mut app, "secret").await;
        app.handle_action(Action::Confirm).await;

        assert_eq!(app.screen, Screen::Board);
        assert_eq!(app.board.as_ref().unwrap().requests().len(), 2);
        assert!(dir.path().join("session.json").exists());
    }

    #[tokio::test]
    async fn test_failed_login_stays_on_form() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = InteractiveApp::start(services(&dir), None).await;
        type_text(&mut app, "ada@example.com").await;
        app.handle_action(Action::NextField).await;
        type_text(&mut app, "nope").await;
        app.handle_action(Action::Confirm).await;

        assert_eq!(app.screen, Screen::Auth);
        assert_eq!(app.gateway.fields().email, "ada@example.com");
        assert!(app
            .notifications
            .iter()
            .any(|n| n.kind == NotificationKind::Error && n.message == "Login failed: Wrong password"));
    }

    #[tokio::test]
    async fn test_register_form_picks_university() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = InteractiveApp::start(services(&dir), None).await;
        app.handle_action(Action::ToggleAuthMode).await;
        assert_eq!(app.auth_inputs().len(), 5);

        app.auth_focus = 4;
        app.handle_action(Action::Confirm).await;
        assert_eq!(app.popup, Some(Popup::Picker(PickerKind::UserType)));
        app.handle_action(Action::Confirm).await;
        assert_eq!(app.gateway.fields().user_type, Some(UserType::Student));
        assert_eq!(app.auth_inputs().last(), Some(&AuthInput::University));

        app.auth_focus = 5;
        app.handle_action(Action::Confirm).await;
        app.handle_action(Action::MoveDown).await;
        app.handle_action(Action::Confirm).await;
        assert_eq!(app.gateway.fields().university, "ETH");
    }

    #[tokio::test]
    async fn test_board_flow_with_session() {
        let dir = tempfile::tempdir().unwrap();
        let session = Session::new("u1", "Ada");
        let mut app = InteractiveApp::start(services(&dir), Some(session)).await;
        assert_eq!(app.screen, Screen::Board);

        app.handle_action(Action::MoveDown).await;
        assert_eq!(app.selected_request().unwrap().id.as_deref(), Some("2"));
        app.handle_action(Action::EditRequest).await;
        assert_eq!(app.popup, None);
        assert!(app.notifications.iter().any(|n| n.kind == NotificationKind::Error));

        app.handle_action(Action::ToggleMine).await;
        assert_eq!(app.board.as_ref().unwrap().visible().len(), 1);

        app.handle_action(Action::DeleteRequest).await;
        assert_eq!(app.popup, Some(Popup::ConfirmDelete));
        app.handle_action(Action::Cancel).await;
        assert_eq!(app.board.as_ref().unwrap().requests().len(), 2);

        app.handle_action(Action::NewRequest).await;
        type_text(&mut app, "Gamma").await;
        app.handle_action(Action::Confirm).await;
        assert_eq!(app.popup, None);
        assert_eq!(app.board.as_ref().unwrap().requests().len(), 3);
    }

    #[tokio::test]
    async fn test_search_popup_filters_live() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = InteractiveApp::start(services(&dir), Some(Session::new("u1", "Ada"))).await;
        app.handle_action(Action::Search).await;
        type_text(&mut app, "project 2").await;
        assert_eq!(app.board.as_ref().unwrap().visible().len(), 1);
        app.handle_action(Action::Cancel).await;
        assert_eq!(app.board.as_ref().unwrap().visible().len(), 2);
    }

    #[tokio::test]
    async fn test_logout_returns_to_auth() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = InteractiveApp::start(services(&dir), Some(Session::new("u1", "Ada"))).await;
        app.handle_action(Action::Logout).await;
        assert_eq!(app.screen, Screen::Auth);
        assert!(app.board.is_none());
    }
}
