//! Genius API client.
//!
//! The client owns the credentials and, once a project exists, the session.
//! Resource services are borrowed views that read the session per call.

use serde_json::Value;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use crate::config::{GeniusConfig, GeniusConfigBuilder};
use crate::errors::{GeniusError, GeniusResult};
use crate::services::{
    DataService, InstructionsService, ItemsService, ModelsService, PoliciesService,
    ProjectService, ServiceContext,
};
use crate::session::{FileSessionStore, SessionStore};
use crate::transport::{HttpTransport, HttpTransportImpl};
use crate::types::credentials::{BasicCredentials, ProjectDescriptor, Session};
use crate::types::records::RecordSource;
use crate::validation::{require_non_empty, validate_items, validate_policies};

enum ClientState {
    /// Password credentials waiting to be exchanged for a session.
    Bootstrap {
        credentials: BasicCredentials,
        descriptor: ProjectDescriptor,
    },
    Active(Session),
}

/// Responses collected by [`GeniusClient::provision`].
#[derive(Debug, Clone, PartialEq)]
pub struct ProvisionReport {
    /// Response to the item upload.
    pub items: Value,
    /// Whether the service's generated instruction was deleted.
    pub removed_ai_generated: bool,
    /// Response to the policy upload.
    pub policies: Value,
    /// Response to the training request.
    pub training: Value,
}

/// Optional steps for [`GeniusClient::provision_with`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProvisionOptions {
    /// Delete the instruction the service generates for a new project,
    /// after items are uploaded and before policies are.
    pub remove_ai_generated: bool,
}

impl ProvisionOptions {
    /// Creates options with every optional step disabled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets whether the generated instruction is removed.
    pub fn remove_ai_generated(mut self, remove: bool) -> Self {
        self.remove_ai_generated = remove;
        self
    }
}

/// The main Genius client.
///
/// # Example
///
/// ```rust,no_run
/// use genius_client::{BasicCredentials, GeniusClient, ProjectDescriptor};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let mut client = GeniusClient::from_bootstrap(
///         BasicCredentials::load("auth.json")?,
///         ProjectDescriptor::load("project.json")?,
///     )?;
///
///     client.create_project().await?;
///     client.items().add(std::path::Path::new("items.json")).await?;
///     Ok(())
/// }
/// ```
pub struct GeniusClient {
    config: GeniusConfig,
    transport: Arc<dyn HttpTransport>,
    store: Arc<dyn SessionStore>,
    state: ClientState,
}

impl GeniusClient {
    /// Creates a new client builder.
    pub fn builder() -> GeniusClientBuilder {
        GeniusClientBuilder::new()
    }

    /// Creates a client for an existing project.
    pub fn from_session(session: Session) -> GeniusResult<Self> {
        GeniusClientBuilder::new().session(session).build()
    }

    /// Creates a client that will create a new project.
    pub fn from_bootstrap(
        credentials: BasicCredentials,
        descriptor: ProjectDescriptor,
    ) -> GeniusResult<Self> {
        GeniusClientBuilder::new()
            .credentials(credentials)
            .project(descriptor)
            .build()
    }

    /// Creates a client from the session saved in `config.project_dir`.
    pub fn from_saved_session(config: GeniusConfig) -> GeniusResult<Self> {
        let session = FileSessionStore::new(&config.project_dir).load()?;
        GeniusClientBuilder::from_config(config)
            .session(session)
            .build()
    }

    /// Returns the current session, if the project exists.
    pub fn session(&self) -> Option<&Session> {
        match &self.state {
            ClientState::Active(session) => Some(session),
            ClientState::Bootstrap { .. } => None,
        }
    }

    /// Returns true once a session is available.
    pub fn is_active(&self) -> bool {
        self.session().is_some()
    }

    /// Returns the configuration.
    pub fn config(&self) -> &GeniusConfig {
        &self.config
    }

    fn context(&self) -> ServiceContext<'_> {
        ServiceContext::new(
            self.transport.as_ref(),
            self.session(),
            &self.config.custom_headers,
        )
    }

    /// Returns the project service.
    pub fn project(&self) -> ProjectService<'_> {
        ProjectService::new(self.context())
    }

    /// Returns the items service.
    pub fn items(&self) -> ItemsService<'_> {
        ItemsService::new(self.context())
    }

    /// Returns the policies service.
    pub fn policies(&self) -> PoliciesService<'_> {
        PoliciesService::new(self.context())
    }

    /// Returns the legacy instructions service.
    pub fn instructions(&self) -> InstructionsService<'_> {
        InstructionsService::new(self.context())
    }

    /// Returns the models service.
    pub fn models(&self) -> ModelsService<'_> {
        ModelsService::new(self.context())
    }

    /// Returns the feed and batch service.
    pub fn data(&self) -> DataService<'_> {
        DataService::new(self.context())
    }

    /// Creates the project and switches the client to its session.
    ///
    /// The session is persisted through the session store. If persisting
    /// fails the client still holds the session and the storage error is
    /// returned. Fails with `Precondition` when a session already exists.
    pub async fn create_project(&mut self) -> GeniusResult<()> {
        let ClientState::Bootstrap {
            credentials,
            descriptor,
        } = &self.state
        else {
            return Err(GeniusError::precondition(
                "project already created; this client holds an active session",
            ));
        };

        let session = ProjectService::create(
            self.transport.as_ref(),
            credentials,
            descriptor,
            &self.config.custom_headers,
        )
        .await?;

        tracing::info!(
            project = session.project_name(),
            token_hint = %session.token_hint(),
            "Created project"
        );

        let saved = self.store.save(&session);
        self.state = ClientState::Active(session);
        saved
    }

    /// Persists the current session through the session store.
    pub fn save_session(&self) -> GeniusResult<()> {
        let session = self.session().ok_or_else(|| {
            GeniusError::precondition("no session to save; create the project first")
        })?;
        self.store.save(session)
    }

    /// Creates the project, uploads items and policies, then starts training.
    ///
    /// Both collections are validated before the project is created. Steps
    /// run in order and the first failure stops the sequence.
    pub async fn provision(
        &mut self,
        items: impl Into<RecordSource>,
        policies: impl Into<RecordSource>,
    ) -> GeniusResult<ProvisionReport> {
        self.provision_with(items, policies, ProvisionOptions::default())
            .await
    }

    /// Same as [`provision`](Self::provision), with optional steps.
    pub async fn provision_with(
        &mut self,
        items: impl Into<RecordSource>,
        policies: impl Into<RecordSource>,
        options: ProvisionOptions,
    ) -> GeniusResult<ProvisionReport> {
        let items = items.into().load()?;
        require_non_empty("item", &items)?;
        validate_items(&items)?;

        let policies = policies.into().load()?;
        require_non_empty("policy", &policies)?;
        validate_policies(&policies)?;

        tracing::info!("Making project");
        self.create_project().await?;

        let items = self.items().add(items).await?;
        let removed_ai_generated = if options.remove_ai_generated {
            self.instructions().remove_ai_generated().await?
        } else {
            false
        };
        let policies = self.policies().add(policies).await?;
        let training = self.models().train(None).await?;

        Ok(ProvisionReport {
            items,
            removed_ai_generated,
            policies,
            training,
        })
    }
}

impl std::fmt::Debug for GeniusClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = match &self.state {
            ClientState::Bootstrap { .. } => "bootstrap",
            ClientState::Active(_) => "active",
        };
        f.debug_struct("GeniusClient")
            .field("config", &self.config)
            .field("state", &state)
            .field("session", &self.session())
            .finish()
    }
}

/// Builder for the Genius client.
///
/// Exactly one identity must be supplied: a session, or bootstrap
/// credentials together with a project descriptor.
pub struct GeniusClientBuilder {
    config_builder: GeniusConfigBuilder,
    credentials: Option<BasicCredentials>,
    descriptor: Option<ProjectDescriptor>,
    session: Option<Session>,
    transport: Option<Arc<dyn HttpTransport>>,
    store: Option<Arc<dyn SessionStore>>,
}

impl GeniusClientBuilder {
    /// Creates a new client builder.
    pub fn new() -> Self {
        Self::from_config_builder(GeniusConfigBuilder::new())
    }

    /// Creates a builder from an existing configuration.
    pub fn from_config(config: GeniusConfig) -> Self {
        Self::from_config_builder(GeniusConfigBuilder::from_config(config))
    }

    fn from_config_builder(config_builder: GeniusConfigBuilder) -> Self {
        Self {
            config_builder,
            credentials: None,
            descriptor: None,
            session: None,
            transport: None,
            store: None,
        }
    }

    /// Sets the bootstrap credentials.
    pub fn credentials(mut self, credentials: BasicCredentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Sets the descriptor of the project to create.
    pub fn project(mut self, descriptor: ProjectDescriptor) -> Self {
        self.descriptor = Some(descriptor);
        self
    }

    /// Sets an existing session.
    pub fn session(mut self, session: Session) -> Self {
        self.session = Some(session);
        self
    }

    /// Loads the session from a JSON file.
    pub fn session_file(self, path: impl AsRef<Path>) -> GeniusResult<Self> {
        Ok(self.session(Session::load(path)?))
    }

    /// Sets the base URL.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.config_builder = self.config_builder.base_url(base_url);
        self
    }

    /// Sets the directory the session file is written to.
    pub fn project_dir(mut self, project_dir: impl AsRef<Path>) -> Self {
        self.config_builder = self.config_builder.project_dir(project_dir);
        self
    }

    /// Sets the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config_builder = self.config_builder.timeout(timeout);
        self
    }

    /// Adds a header sent with every request.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.config_builder = self.config_builder.header(name, value);
        self
    }

    /// Sets a custom transport.
    pub fn transport(mut self, transport: Arc<dyn HttpTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Sets a custom session store.
    pub fn session_store(mut self, store: Arc<dyn SessionStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Builds the client.
    pub fn build(self) -> GeniusResult<GeniusClient> {
        let state = match (self.credentials, self.descriptor, self.session) {
            (Some(credentials), Some(descriptor), None) => ClientState::Bootstrap {
                credentials,
                descriptor,
            },
            (None, None, Some(session)) => ClientState::Active(session),
            (None, None, None) => {
                return Err(GeniusError::invalid_configuration(
                    "pass either a session, or bootstrap credentials and a project descriptor",
                ))
            }
            (_, _, Some(_)) => {
                return Err(GeniusError::invalid_configuration(
                    "a session cannot be combined with bootstrap credentials or a project descriptor",
                ))
            }
            (_, _, None) => {
                return Err(GeniusError::invalid_configuration(
                    "bootstrap credentials and a project descriptor must be passed together",
                ))
            }
        };

        let config = self.config_builder.build()?;

        let transport: Arc<dyn HttpTransport> = match self.transport {
            Some(t) => t,
            None => Arc::new(
                HttpTransportImpl::new(&config.base_url, config.timeout)
                    .map_err(|e| GeniusError::invalid_configuration(e.to_string()))?,
            ),
        };

        let store: Arc<dyn SessionStore> = match self.store {
            Some(s) => s,
            None => Arc::new(FileSessionStore::new(&config.project_dir)),
        };

        Ok(GeniusClient {
            config,
            transport,
            store,
            state,
        })
    }
}

impl Default for GeniusClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
