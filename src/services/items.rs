//! Items service.

use serde_json::Value;
use tracing::instrument;

use super::{segment, ServiceContext, PLATFORM_PREFIX};
use crate::errors::GeniusResult;
use crate::transport::HttpRequest;
use crate::types::feed::Pagination;
use crate::types::records::{strip_computed_metadata, RecordSource};
use crate::validation::{require_non_empty, validate_items};

/// Create, read, update and delete catalogue items.
pub struct ItemsService<'a> {
    ctx: ServiceContext<'a>,
}

impl<'a> ItemsService<'a> {
    pub(crate) fn new(ctx: ServiceContext<'a>) -> Self {
        Self { ctx }
    }

    fn endpoint(&self) -> GeniusResult<String> {
        let project = self.ctx.project_segment()?;
        Ok(format!("{PLATFORM_PREFIX}/project/{project}/items"))
    }

    /// Uploads items after checking each has the required keys.
    #[instrument(skip(self, source))]
    pub async fn add(&self, source: impl Into<RecordSource>) -> GeniusResult<Value> {
        let endpoint = self.endpoint()?;
        let items = source.into().load()?;
        require_non_empty("item", &items)?;
        validate_items(&items)?;

        tracing::info!(count = items.len(), "Uploading items");
        let request = HttpRequest::post(format!("{endpoint}/create"))
            .with_json(&Value::Array(items))?;
        self.ctx.send(request).await
    }

    /// Fetches a single item.
    #[instrument(skip(self))]
    pub async fn get(&self, item_id: &str) -> GeniusResult<Value> {
        let endpoint = self.endpoint()?;
        self.ctx
            .send(HttpRequest::get(format!("{endpoint}/{}", segment(item_id))))
            .await
    }

    /// Lists one page of items.
    #[instrument(skip(self))]
    pub async fn list(&self, pagination: Pagination) -> GeniusResult<Value> {
        let endpoint = self.endpoint()?;
        let request =
            HttpRequest::get(format!("{endpoint}/list")).with_query(pagination.to_query());
        self.ctx.send(request).await
    }

    /// Replaces an item.
    ///
    /// Metadata entries named `available` are dropped first; the service
    /// computes that field and rejects it when echoed back.
    #[instrument(skip(self, item))]
    pub async fn update(&self, item_id: &str, mut item: Value) -> GeniusResult<Value> {
        let endpoint = self.endpoint()?;
        strip_computed_metadata(&mut item);
        validate_items(std::slice::from_ref(&item))?;

        let request =
            HttpRequest::put(format!("{endpoint}/{}/update", segment(item_id))).with_json(&item)?;
        self.ctx.send(request).await
    }

    /// Deletes an item.
    #[instrument(skip(self))]
    pub async fn delete(&self, item_id: &str) -> GeniusResult<Value> {
        let endpoint = self.endpoint()?;
        self.ctx
            .send(HttpRequest::delete(format!(
                "{endpoint}/{}/delete",
                segment(item_id)
            )))
            .await
    }
}

impl std::fmt::Debug for ItemsService<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ItemsService").finish()
    }
}
