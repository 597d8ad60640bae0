//! Project service.

use serde::Deserialize;
use serde_json::Value;
use tracing::instrument;

use super::{dispatch, ServiceContext, LEGACY_PREFIX, PLATFORM_PREFIX};
use crate::auth::{AuthProvider, BasicAuth};
use crate::errors::{GeniusError, GeniusResult};
use crate::transport::{HttpRequest, HttpTransport};
use crate::types::credentials::{BasicCredentials, ProjectDescriptor, Session};

/// Route of the bootstrap exchange.
pub(crate) const CREATE_PROJECT_PATH: &str = "project/create";

#[derive(Deserialize)]
struct CreateProjectResponse {
    access_token: String,
}

/// Project-level settings.
pub struct ProjectService<'a> {
    ctx: ServiceContext<'a>,
}

impl<'a> ProjectService<'a> {
    pub(crate) fn new(ctx: ServiceContext<'a>) -> Self {
        Self { ctx }
    }

    /// Updates project settings with the given fields.
    #[instrument(skip(self, update))]
    pub async fn update(&self, update: Value) -> GeniusResult<Value> {
        let project = self.ctx.project_segment()?;
        let request =
            HttpRequest::put(format!("{PLATFORM_PREFIX}/project/{project}")).with_json(&update)?;
        self.ctx.send(request).await
    }

    /// Exchanges bootstrap credentials for a session.
    #[instrument(skip_all, fields(project = descriptor.project_name()))]
    pub(crate) async fn create(
        transport: &dyn HttpTransport,
        credentials: &BasicCredentials,
        descriptor: &ProjectDescriptor,
        custom_headers: &[(String, String)],
    ) -> GeniusResult<Session> {
        let auth = BasicAuth::new(credentials);
        auth.validate()?;

        let request = HttpRequest::post(format!("{LEGACY_PREFIX}/{CREATE_PROJECT_PATH}"))
            .with_json(&descriptor.to_json())?;
        let body = dispatch(transport, request, &auth, custom_headers).await?;

        let response: CreateProjectResponse = serde_json::from_value(body).map_err(|e| {
            GeniusError::serialization(format!(
                "project creation response has no `access_token`: {e}"
            ))
        })?;

        Ok(Session::new(
            descriptor.project_name(),
            response.access_token,
        ))
    }
}

impl std::fmt::Debug for ProjectService<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProjectService").finish()
    }
}
