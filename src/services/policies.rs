//! Policies service.

use serde_json::{json, Value};
use tracing::instrument;

use super::{segment, ServiceContext, PLATFORM_PREFIX};
use crate::errors::GeniusResult;
use crate::transport::HttpRequest;
use crate::types::records::RecordSource;
use crate::validation::{require_non_empty, validate_policies};

/// Manage the policies that steer a project's model.
pub struct PoliciesService<'a> {
    ctx: ServiceContext<'a>,
}

impl<'a> PoliciesService<'a> {
    pub(crate) fn new(ctx: ServiceContext<'a>) -> Self {
        Self { ctx }
    }

    fn endpoint(&self) -> GeniusResult<String> {
        let project = self.ctx.project_segment()?;
        Ok(format!("{PLATFORM_PREFIX}/{project}/models/policies"))
    }

    /// Uploads policies after checking each has a `policy` key.
    #[instrument(skip(self, source))]
    pub async fn add(&self, source: impl Into<RecordSource>) -> GeniusResult<Value> {
        let endpoint = self.endpoint()?;
        let policies = source.into().load()?;
        require_non_empty("policy", &policies)?;
        validate_policies(&policies)?;

        tracing::info!(count = policies.len(), "Uploading policies");
        let request = HttpRequest::post(endpoint).with_json(&Value::Array(policies))?;
        self.ctx.send(request).await
    }

    /// Lists all policies.
    #[instrument(skip(self))]
    pub async fn list(&self) -> GeniusResult<Value> {
        let endpoint = self.endpoint()?;
        self.ctx.send(HttpRequest::get(endpoint)).await
    }

    /// Fetches a single policy.
    #[instrument(skip(self))]
    pub async fn get(&self, policy_id: &str) -> GeniusResult<Value> {
        let endpoint = self.endpoint()?;
        self.ctx
            .send(HttpRequest::get(format!("{endpoint}/{}", segment(policy_id))))
            .await
    }

    /// Replaces a policy.
    #[instrument(skip(self, policy))]
    pub async fn update(&self, policy_id: &str, policy: Value) -> GeniusResult<Value> {
        let endpoint = self.endpoint()?;
        validate_policies(std::slice::from_ref(&policy))?;

        let request = HttpRequest::put(format!("{endpoint}/{}", segment(policy_id))).with_json(&policy)?;
        self.ctx.send(request).await
    }

    /// Deletes a policy.
    #[instrument(skip(self))]
    pub async fn delete(&self, policy_id: &str) -> GeniusResult<Value> {
        let endpoint = self.endpoint()?;
        self.ctx
            .send(HttpRequest::delete(format!("{endpoint}/{}", segment(policy_id))))
            .await
    }

    /// Turns a policy on or off.
    #[instrument(skip(self))]
    pub async fn enable(&self, policy_id: &str, enabled: bool) -> GeniusResult<Value> {
        let endpoint = self.endpoint()?;
        let request = HttpRequest::put(format!("{endpoint}/{}/enable", segment(policy_id)))
            .with_json(&json!({ "enabled": enabled }))?;
        self.ctx.send(request).await
    }
}

impl std::fmt::Debug for PoliciesService<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PoliciesService").finish()
    }
}
