//! Models service.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_json::{json, Value};
use tracing::instrument;

use super::{expect_array, record_id, segment, ServiceContext, LEGACY_PREFIX, PLATFORM_PREFIX};
use crate::errors::{GeniusError, GeniusResult};
use crate::transport::HttpRequest;

/// Outcome of [`ModelsService::promote_most_recent`].
#[derive(Debug, Clone, PartialEq)]
pub struct PromotedModel {
    /// The activated model.
    pub model_id: String,
    /// Decoded activation response.
    pub response: Value,
}

/// Train and activate a project's models.
pub struct ModelsService<'a> {
    ctx: ServiceContext<'a>,
}

impl<'a> ModelsService<'a> {
    pub(crate) fn new(ctx: ServiceContext<'a>) -> Self {
        Self { ctx }
    }

    fn endpoint(&self) -> GeniusResult<String> {
        let project = self.ctx.project_segment()?;
        Ok(format!("{PLATFORM_PREFIX}/{project}/models"))
    }

    fn legacy_endpoint(&self) -> GeniusResult<String> {
        let project = self.ctx.project_segment()?;
        Ok(format!("{LEGACY_PREFIX}/{project}/model"))
    }

    /// Fetches a single model.
    #[instrument(skip(self))]
    pub async fn get(&self, model_id: &str) -> GeniusResult<Value> {
        let endpoint = self.endpoint()?;
        self.ctx
            .send(HttpRequest::get(format!("{endpoint}/{}", segment(model_id))))
            .await
    }

    /// Lists the project's models.
    ///
    /// Listing is only offered by the legacy API.
    #[instrument(skip(self))]
    pub async fn list(&self) -> GeniusResult<Value> {
        let endpoint = self.legacy_endpoint()?;
        self.ctx
            .send(HttpRequest::get(format!("{endpoint}/list")))
            .await
    }

    /// Creates a model through the legacy API.
    #[instrument(skip(self))]
    pub async fn create(&self) -> GeniusResult<Value> {
        let endpoint = self.legacy_endpoint()?;
        tracing::info!("Creating model");
        self.ctx
            .send(HttpRequest::post(format!("{endpoint}/create")))
            .await
    }

    /// Starts training. Without an id the service picks the target model.
    #[instrument(skip(self))]
    pub async fn train(&self, model_id: Option<&str>) -> GeniusResult<Value> {
        let endpoint = self.endpoint()?;
        let body = match model_id {
            Some(id) => json!({ "model_id": id }),
            None => json!({}),
        };

        tracing::info!("Training model");
        let request = HttpRequest::post(format!("{endpoint}/train")).with_json(&body)?;
        self.ctx.send(request).await
    }

    /// Makes a model the one serving feeds.
    #[instrument(skip(self))]
    pub async fn activate(&self, model_id: &str) -> GeniusResult<Value> {
        let endpoint = self.endpoint()?;
        self.ctx
            .send(HttpRequest::post(format!(
                "{endpoint}/{}/activate",
                segment(model_id)
            )))
            .await
    }

    /// Promotes a model through the legacy API.
    #[instrument(skip(self))]
    pub async fn promote(&self, model_id: &str) -> GeniusResult<Value> {
        let endpoint = self.legacy_endpoint()?;
        self.ctx
            .send(HttpRequest::post(format!(
                "{endpoint}/{}/promote",
                segment(model_id)
            )))
            .await
    }

    /// Activates the most recently created model.
    ///
    /// Returns `None` when the project has no models.
    #[instrument(skip(self))]
    pub async fn promote_most_recent(&self) -> GeniusResult<Option<PromotedModel>> {
        let models = expect_array(self.list().await?, "model list")?;

        let Some(model_id) = most_recent_model(&models)? else {
            return Ok(None);
        };

        tracing::info!(model_id = %model_id, "Activating most recent model");
        let response = self.activate(&model_id).await?;
        Ok(Some(PromotedModel { model_id, response }))
    }
}

impl std::fmt::Debug for ModelsService<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelsService").finish()
    }
}

/// Picks the id of the model with the latest `created_at`.
///
/// On equal timestamps the first model listed wins.
pub fn most_recent_model(models: &[Value]) -> GeniusResult<Option<String>> {
    let mut latest: Option<(NaiveDateTime, String)> = None;

    for model in models {
        let id = model.get("id").and_then(record_id).ok_or_else(|| {
            GeniusError::serialization(format!("model has no usable `id`: {model}"))
        })?;
        let raw = model
            .get("created_at")
            .and_then(Value::as_str)
            .ok_or_else(|| {
                GeniusError::serialization(format!("model '{id}' has no `created_at`"))
            })?;
        let created_at = parse_timestamp(raw).ok_or_else(|| {
            GeniusError::serialization(format!(
                "model '{id}' has an unparseable `created_at`: {raw}"
            ))
        })?;

        if latest.as_ref().map_or(true, |(best, _)| created_at > *best) {
            latest = Some((created_at, id));
        }
    }

    Ok(latest.map(|(_, id)| id))
}

/// Parses ISO 8601 timestamps; offsets are normalised to UTC.
fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    if let Ok(with_offset) = DateTime::parse_from_rfc3339(raw) {
        return Some(with_offset.naive_utc());
    }

    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
}
