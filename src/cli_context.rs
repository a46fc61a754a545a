use crate::client::ApiClient;
use crate::config::{get_api_url, load_config, Config, ReconcileStrategy};
use crate::error::{TeammateError, TeammateResult};
use crate::session::{Session, SessionStore};
use std::sync::Arc;

/// Central context for CLI operations: configuration, the session store and API clients
pub struct CliContext {
    config: Config,
    api_url: String,
    store: SessionStore,
    session: Option<Session>,
    client: Option<Arc<ApiClient>>,
}

impl CliContext {
    /// Create a context over an explicit config and session store
    pub fn new(config: Config, store: SessionStore) -> Self {
        let api_url = get_api_url(&config);
        Self {
            config,
            api_url,
            store,
            session: None,
            client: None,
        }
    }

    /// Load context from the saved configuration and session file
    pub fn load() -> TeammateResult<Self> {
        let mut context = Self::new(load_config(), SessionStore::default_location()?);
        context.session = context.store.load()?;
        Ok(context)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    pub fn reconcile(&self) -> ReconcileStrategy {
        self.config.reconcile
    }

    pub fn session_store(&self) -> &SessionStore {
        &self.store
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// The logged-in session, or `NotLoggedIn`
    pub fn require_session(&self) -> TeammateResult<Session> {
        self.session.clone().ok_or(TeammateError::NotLoggedIn)
    }

    /// Remember a freshly created session; drops any client built for the previous one
    pub fn set_session(&mut self, session: Session) {
        self.session = Some(session);
        self.client = None;
    }

    pub fn clear_session(&mut self) -> TeammateResult<bool> {
        self.session = None;
        self.client = None;
        self.store.clear()
    }

    /// A client without credentials, for login, registration and the university list
    pub fn anonymous_client(&self) -> TeammateResult<ApiClient> {
        ApiClient::new(self.api_url.clone(), None)
    }

    /// Get or create a client carrying the session token (requires a session)
    pub fn verified_client(&mut self) -> TeammateResult<Arc<ApiClient>> {
        if let Some(client) = &self.client {
            return Ok(client.clone());
        }

        let session = self.require_session()?;
        let client = Arc::new(ApiClient::new(self.api_url.clone(), session.token.as_deref())?);
        self.client = Some(client.clone());
        Ok(client)
    }

    pub fn has_session(&self) -> bool {
        self.session.is_some()
    }
}

/// Builder for contexts that should not touch the user's home directory
pub struct CliContextBuilder {
    config: Option<Config>,
    api_url: Option<String>,
    store: Option<SessionStore>,
    session: Option<Session>,
}

impl CliContextBuilder {
    pub fn new() -> Self {
        Self {
            config: None,
            api_url: None,
            store: None,
            session: None,
        }
    }

    pub fn with_config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = Some(api_url.into());
        self
    }

    pub fn with_session_store(mut self, store: SessionStore) -> Self {
        self.store = Some(store);
        self
    }

    pub fn with_session(mut self, session: Session) -> Self {
        self.session = Some(session);
        self
    }

    pub fn build(self) -> TeammateResult<CliContext> {
        let config = self.config.unwrap_or_else(load_config);
        let store = match self.store {
            Some(store) => store,
            None => SessionStore::default_location()?,
        };

        let mut context = CliContext::new(config, store);
        if let Some(api_url) = self.api_url {
            context.api_url = api_url.trim_end_matches('/').to_string();
        }
        context.session = match self.session {
            Some(session) => Some(session),
            None => context.store.load()?,
        };
        Ok(context)
    }
}

impl Default for CliContextBuilder {
    fn default() -> Self {
        Self::new()
    }
}
