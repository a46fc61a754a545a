use crate::client::{AuthApi, UniversityDirectory};
use crate::constants::*;
use crate::error::{TeammateError, TeammateResult};
use crate::logging::{log_error, log_info};
use crate::models::{LoginRequest, RegisterRequest, University, UserType};
use crate::notice::Notice;
use crate::session::{Session, SessionStore};

/// Which of the two forms is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    Login,
    Register,
}

/// The free-text inputs shared by both forms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthField {
    Name,
    Email,
    Password,
    ConfirmPassword,
}

/// Transient credentials. Never written anywhere.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuthFields {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub user_type: Option<UserType>,
    pub university: String,
}

/// Login / registration state machine.
///
/// Both forms share one set of fields; only the form matching `mode` may be
/// submitted. Every outcome the user should see is queued as a [`Notice`].
#[derive(Debug)]
pub struct AuthGateway {
    mode: AuthMode,
    fields: AuthFields,
    universities: Vec<University>,
    notices: Vec<Notice>,
}

impl Default for AuthGateway {
    fn default() -> Self {
        Self::new()
    }
}

impl AuthGateway {
    pub fn new() -> Self {
        Self {
            mode: AuthMode::Login,
            fields: AuthFields::default(),
            universities: Vec::new(),
            notices: Vec::new(),
        }
    }

    /// A fresh gateway with its university options fetched.
    pub async fn mount(directory: &dyn UniversityDirectory) -> Self {
        let mut gateway = Self::new();
        gateway.load_universities(directory).await;
        gateway
    }

    /// Fetch the university options. A failure leaves the list empty and the form usable.
    pub async fn load_universities(&mut self, directory: &dyn UniversityDirectory) -> bool {
        match directory.list_universities().await {
            Ok(universities) => {
                log_info(&format!("Loaded {} universities", universities.len()));
                self.universities = universities;
                true
            }
            Err(e) => {
                log_error(&format!("Error fetching universities: {}", e));
                self.universities.clear();
                self.notices.push(Notice::error(MSG_UNIVERSITIES_FAILED));
                false
            }
        }
    }

    pub fn mode(&self) -> AuthMode {
        self.mode
    }

    pub fn fields(&self) -> &AuthFields {
        &self.fields
    }

    pub fn universities(&self) -> &[University] {
        &self.universities
    }

    /// Whether the university picker applies to the chosen user type.
    pub fn shows_university(&self) -> bool {
        self.fields.user_type.map(|t| t.requires_university()).unwrap_or(false)
    }

    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    pub fn set_field(&mut self, field: AuthField, value: impl Into<String>) {
        let value = value.into();
        match field {
            AuthField::Name => self.fields.name = value,
            AuthField::Email => self.fields.email = value,
            AuthField::Password => self.fields.password = value,
            AuthField::ConfirmPassword => self.fields.confirm_password = value,
        }
    }

    pub fn field(&self, field: AuthField) -> &str {
        match field {
            AuthField::Name => &self.fields.name,
            AuthField::Email => &self.fields.email,
            AuthField::Password => &self.fields.password,
            AuthField::ConfirmPassword => &self.fields.confirm_password,
        }
    }

    /// Flip between login and register. Every flip wipes the form.
    pub fn toggle_form(&mut self) {
        self.mode = match self.mode {
            AuthMode::Login => AuthMode::Register,
            AuthMode::Register => AuthMode::Login,
        };
        self.fields = AuthFields::default();
    }

    /// Changing the user type always drops the chosen university.
    pub fn set_user_type(&mut self, user_type: UserType) {
        self.fields.user_type = Some(user_type);
        self.fields.university.clear();
    }

    pub fn select_university(&mut self, name: &str) -> TeammateResult<()> {
        if !self.shows_university() {
            return Err(TeammateError::InvalidInput(
                "A university can only be chosen for Student or Alumni accounts".to_string(),
            ));
        }
        if !self.universities.is_empty() && !self.universities.iter().any(|u| u.name == name) {
            return Err(TeammateError::InvalidInput(format!("Unknown university '{}'", name)));
        }
        self.fields.university = name.to_string();
        Ok(())
    }

    pub fn forgot_password(&mut self) {
        self.notices.push(Notice::info(MSG_FORGOT_PASSWORD));
    }

    /// Submit the login form. On success the session is persisted and returned.
    pub async fn login(&mut self, api: &dyn AuthApi, store: &SessionStore) -> TeammateResult<Session> {
        self.expect_mode(AuthMode::Login)?;
        let missing = missing_fields(&[
            ("email", self.fields.email.as_str()),
            ("password", self.fields.password.as_str()),
        ]);
        if !missing.is_empty() {
            return Err(self.invalid(format!("Please fill in: {}", missing.join(", "))));
        }

        let body = LoginRequest {
            email: self.fields.email.clone(),
            password: self.fields.password.clone(),
        };

        let response = match api.login(&body).await {
            Ok(response) => response,
            Err(e) => {
                log_error(&format!("Error during login: {}", e));
                self.notices.push(Notice::error(MSG_LOGIN_NETWORK));
                return Err(e);
            }
        };

        if !response.success {
            let message = response.message.unwrap_or_else(|| "unknown error".to_string());
            log_error(&format!("Login failed: {}", message));
            self.notices.push(Notice::error(format!("Login failed: {}", message)));
            return Err(TeammateError::Rejected(message));
        }

        let user_id = response
            .user_id
            .filter(|id| !id.is_empty())
            .unwrap_or_else(|| {
                log_error(&format!("Login response carried no user id, using {} instead", body.email));
                body.email.clone()
            });
        let user_name = response
            .user_name
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| {
                log_info(&format!("Login response carried no user name, using {} instead", body.email));
                body.email.clone()
            });
        let mut session = Session::new(user_id, user_name);
        session.token = response.token;

        store.save(&session)?;
        log_info(&format!("Logged in as {}", session.user_name));
        self.notices.push(Notice::success(format!("Logged in as {}", session.user_name)));
        Ok(session)
    }

    /// Submit the registration form. On success the gateway switches to the login form.
    pub async fn register(&mut self, api: &dyn AuthApi) -> TeammateResult<()> {
        self.expect_mode(AuthMode::Register)?;
        if self.fields.password != self.fields.confirm_password {
            return Err(self.invalid(MSG_PASSWORD_MISMATCH.to_string()));
        }

        let fields = &self.fields;
        let mut required = vec![
            ("name", fields.name.as_str()),
            ("email", fields.email.as_str()),
            ("password", fields.password.as_str()),
            ("confirm password", fields.confirm_password.as_str()),
        ];
        if self.shows_university() {
            required.push(("university", fields.university.as_str()));
        }
        let mut missing = missing_fields(&required);
        if fields.user_type.is_none() {
            missing.push("user type");
        }
        if !missing.is_empty() {
            return Err(self.invalid(format!("Please fill in: {}", missing.join(", "))));
        }

        let body = RegisterRequest {
            name: fields.name.clone(),
            email: fields.email.clone(),
            password: fields.password.clone(),
            confirm_password: fields.confirm_password.clone(),
            user_type: fields.user_type.map(|t| t.to_string()).unwrap_or_default(),
            university: fields.university.clone(),
        };

        match api.register(&body).await {
            Ok(response) if response.success => {
                log_info(&format!("Registered {}", body.email));
                self.notices.push(Notice::success(MSG_REGISTER_OK));
                self.mode = AuthMode::Login;
                self.fields = AuthFields::default();
                Ok(())
            }
            Ok(response) => {
                let message = response.message.unwrap_or_else(|| "unknown error".to_string());
                log_error(&format!("Registration failed: {}", message));
                self.notices.push(Notice::error(format!("Registration failed: {}", message)));
                Err(TeammateError::Rejected(message))
            }
            Err(e) => {
                log_error(&format!("Error during registration: {}", e));
                self.notices.push(Notice::error(MSG_REGISTER_NETWORK));
                Err(e)
            }
        }
    }

    fn expect_mode(&self, mode: AuthMode) -> TeammateResult<()> {
        if self.mode != mode {
            return Err(TeammateError::StateError(format!(
                "The {:?} form is not active",
                mode
            )));
        }
        Ok(())
    }

    fn invalid(&mut self, message: String) -> TeammateError {
        self.notices.push(Notice::error(message.clone()));
        TeammateError::InvalidInput(message)
    }
}

fn missing_fields<'a>(fields: &[(&'a str, &str)]) -> Vec<&'a str> {
    fields
        .iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| *name)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{LoginResponse, RegisterResponse};
    use crate::notice::NoticeKind;
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Default)]
    struct FakeAuth {
        login_response: Option<LoginResponse>,
        register_response: Option<RegisterResponse>,
        logins: Mutex<Vec<LoginRequest>>,
        registrations: Mutex<Vec<RegisterRequest>>,
    }

    #[async_trait]
    impl AuthApi for FakeAuth {
        async fn login(&self, body: &LoginRequest) -> TeammateResult<LoginResponse> {
            self.logins.lock().unwrap().push(body.clone());
            self.login_response
                .clone()
                .ok_or_else(|| TeammateError::Unknown("connection refused".into()))
        }

        async fn register(&self, body: &RegisterRequest) -> TeammateResult<RegisterResponse> {
            self.registrations.lock().unwrap().push(body.clone());
            self.register_response
                .clone()
                .ok_or_else(|| TeammateError::Unknown("connection refused".into()))
        }
    }

    struct FailingDirectory;

    #[async_trait]
    impl UniversityDirectory for FailingDirectory {
        async fn list_universities(&self) -> TeammateResult<Vec<University>> {
            Err(TeammateError::ApiError { status: 500, message: "down".into() })
        }
    }

    struct StaticDirectory;

    #[async_trait]
    impl UniversityDirectory for StaticDirectory {
        async fn list_universities(&self) -> TeammateResult<Vec<University>> {
            Ok(vec![University { name: "MIT".into() }, University { name: "ETH".into() }])
        }
    }

    fn filled_registration() -> AuthGateway {
        let mut gateway = AuthGateway::new();
        gateway.toggle_form();
        gateway.set_field(AuthField::Name, "Ada");
        gateway.set_field(AuthField::Email, "ada@uni.edu");
        gateway.set_field(AuthField::Password, "secret");
        gateway.set_field(AuthField::ConfirmPassword, "secret");
        gateway.set_user_type(UserType::Industry);
        gateway
    }

    #[tokio::test]
    async fn test_mount_failure_degrades_to_empty_options() {
        let mut gateway = AuthGateway::mount(&FailingDirectory).await;
        assert!(gateway.universities().is_empty());
        let notices = gateway.take_notices();
        assert_eq!(notices, vec![Notice::error(MSG_UNIVERSITIES_FAILED)]);
        assert!(gateway.notices().is_empty());
    }

    #[tokio::test]
    async fn test_mount_loads_options() {
        let gateway = AuthGateway::mount(&StaticDirectory).await;
        assert_eq!(gateway.universities().len(), 2);
        assert!(gateway.notices().is_empty());
    }

    #[test]
    fn test_toggle_round_trip_clears_login_fields() {
        let mut gateway = AuthGateway::new();
        gateway.set_field(AuthField::Email, "ada@uni.edu");
        gateway.set_field(AuthField::Password, "secret");
        gateway.toggle_form();
        assert_eq!(gateway.mode(), AuthMode::Register);
        gateway.toggle_form();
        assert_eq!(gateway.mode(), AuthMode::Login);
        assert_eq!(gateway.fields(), &AuthFields::default());
    }

    #[tokio::test]
    async fn test_toggle_out_of_register_clears_everything() {
        let mut gateway = AuthGateway::mount(&StaticDirectory).await;
        gateway.toggle_form();
        gateway.set_field(AuthField::Name, "Ada");
        gateway.set_user_type(UserType::Student);
        gateway.select_university("MIT").unwrap();
        gateway.toggle_form();
        assert_eq!(gateway.fields().user_type, None);
        assert_eq!(gateway.fields().university, "");
        assert_eq!(gateway.fields().name, "");
    }

    #[tokio::test]
    async fn test_user_type_change_resets_university() {
        let mut gateway = AuthGateway::mount(&StaticDirectory).await;
        gateway.toggle_form();
        gateway.set_user_type(UserType::Student);
        gateway.select_university("ETH").unwrap();
        gateway.set_user_type(UserType::Alumni);
        assert_eq!(gateway.fields().university, "");
        gateway.select_university("ETH").unwrap();
        gateway.set_user_type(UserType::Alumni);
        assert_eq!(gateway.fields().university, "");
    }

    #[tokio::test]
    async fn test_university_rules() {
        let mut gateway = AuthGateway::mount(&StaticDirectory).await;
        gateway.toggle_form();
        gateway.set_user_type(UserType::Industry);
        assert!(!gateway.shows_university());
        assert!(gateway.select_university("MIT").is_err());
        gateway.set_user_type(UserType::Student);
        assert!(gateway.select_university("Hogwarts").is_err());
        assert!(gateway.select_university("MIT").is_ok());
    }

    #[tokio::test]
    async fn test_password_mismatch_never_calls_network() {
        let api = FakeAuth::default();
        let mut gateway = filled_registration();
        gateway.set_field(AuthField::ConfirmPassword, "other");

        let result = gateway.register(&api).await;
        assert!(matches!(result, Err(TeammateError::InvalidInput(_))));
        assert!(api.registrations.lock().unwrap().is_empty());
        assert_eq!(gateway.take_notices(), vec![Notice::error(MSG_PASSWORD_MISMATCH)]);
        assert_eq!(gateway.mode(), AuthMode::Register);
    }

    #[tokio::test]
    async fn test_register_success_switches_to_login() {
        let api = FakeAuth {
            register_response: Some(RegisterResponse { success: true, message: None }),
            ..Default::default()
        };
        let mut gateway = filled_registration();
        gateway.register(&api).await.unwrap();

        let sent = api.registrations.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].user_type, "Industry");
        assert_eq!(sent[0].university, "");
        assert_eq!(gateway.mode(), AuthMode::Login);
        assert_eq!(gateway.fields(), &AuthFields::default());
        assert_eq!(gateway.notices(), &[Notice::success(MSG_REGISTER_OK)]);
    }

    #[tokio::test]
    async fn test_register_business_failure_keeps_fields() {
        let api = FakeAuth {
            register_response: Some(RegisterResponse {
                success: false,
                message: Some("Email already registered".into()),
            }),
            ..Default::default()
        };
        let mut gateway = filled_registration();
        let err = gateway.register(&api).await.unwrap_err();
        assert!(matches!(err, TeammateError::Rejected(ref m) if m == "Email already registered"));
        assert_eq!(gateway.fields().email, "ada@uni.edu");
        assert_eq!(
            gateway.notices(),
            &[Notice::error("Registration failed: Email already registered")]
        );
    }

    #[tokio::test]
    async fn test_register_network_failure_notifies() {
        let api = FakeAuth::default();
        let mut gateway = filled_registration();
        assert!(gateway.register(&api).await.is_err());
        assert_eq!(gateway.notices(), &[Notice::error(MSG_REGISTER_NETWORK)]);
    }

    #[tokio::test]
    async fn test_student_needs_university() {
        let api = FakeAuth::default();
        let mut gateway = filled_registration();
        gateway.set_user_type(UserType::Student);
        let err = gateway.register(&api).await.unwrap_err();
        assert!(matches!(err, TeammateError::InvalidInput(ref m) if m.contains("university")));
        assert!(api.registrations.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_login_persists_session() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path().join("session.json"));
        let api = FakeAuth {
            login_response: Some(LoginResponse {
                success: true,
                token: Some("tok".into()),
                message: None,
                user_id: Some("u1".into()),
                user_name: Some("Ada".into()),
            }),
            ..Default::default()
        };
        let mut gateway = AuthGateway::new();
        gateway.set_field(AuthField::Email, "ada@uni.edu");
        gateway.set_field(AuthField::Password, "secret");

        let session = gateway.login(&api, &store).await.unwrap();
        assert_eq!(session, Session::new("u1", "Ada").with_token("tok"));
        assert_eq!(store.require().unwrap(), session);
    }

    #[tokio::test]
    async fn test_login_without_identity_falls_back_to_email() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path().join("session.json"));
        let api = FakeAuth {
            login_response: Some(LoginResponse {
                success: true,
                token: Some("tok".into()),
                ..Default::default()
            }),
            ..Default::default()
        };
        let mut gateway = AuthGateway::new();
        gateway.set_field(AuthField::Email, "ada@uni.edu");
        gateway.set_field(AuthField::Password, "secret");
        let session = gateway.login(&api, &store).await.unwrap();
        assert_eq!(session.user_id, "ada@uni.edu");
        assert_eq!(session.user_name, "ada@uni.edu");
    }

    #[tokio::test]
    async fn test_login_rejected_keeps_form_and_store_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path().join("session.json"));
        let api = FakeAuth {
            login_response: Some(LoginResponse {
                success: false,
                message: Some("Invalid credentials".into()),
                ..Default::default()
            }),
            ..Default::default()
        };
        let mut gateway = AuthGateway::new();
        gateway.set_field(AuthField::Email, "ada@uni.edu");
        gateway.set_field(AuthField::Password, "wrong");

        assert!(matches!(gateway.login(&api, &store).await, Err(TeammateError::Rejected(_))));
        assert_eq!(gateway.fields().password, "wrong");
        assert_eq!(store.load().unwrap(), None);
        let notices = gateway.take_notices();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].kind, NoticeKind::Error);
        assert_eq!(notices[0].message, "Login failed: Invalid credentials");
    }

    #[tokio::test]
    async fn test_login_network_failure_is_surfaced() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path().join("session.json"));
        let api = FakeAuth::default();
        let mut gateway = AuthGateway::new();
        gateway.set_field(AuthField::Email, "ada@uni.edu");
        gateway.set_field(AuthField::Password, "secret");
        assert!(gateway.login(&api, &store).await.is_err());
        assert_eq!(gateway.notices(), &[Notice::error(MSG_LOGIN_NETWORK)]);
    }

    #[tokio::test]
    async fn test_forms_only_submit_in_their_mode() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path().join("session.json"));
        let api = FakeAuth::default();
        let mut gateway = AuthGateway::new();
        assert!(matches!(gateway.register(&api).await, Err(TeammateError::StateError(_))));
        gateway.toggle_form();
        assert!(matches!(gateway.login(&api, &store).await, Err(TeammateError::StateError(_))));
        assert!(api.logins.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_login_requires_fields() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path().join("session.json"));
        let api = FakeAuth::default();
        let mut gateway = AuthGateway::new();
        gateway.set_field(AuthField::Email, "ada@uni.edu");
        let err = gateway.login(&api, &store).await.unwrap_err();
        assert!(matches!(err, TeammateError::InvalidInput(ref m) if m.contains("password")));
        assert!(api.logins.lock().unwrap().is_empty());
    }
}
