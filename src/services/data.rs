//! Feed and batch retrieval.

use serde_json::Value;
use tracing::instrument;
use uuid::Uuid;

use super::{expect_array, record_id, segment, ItemsService, ServiceContext, LEGACY_PREFIX};
use crate::errors::{GeniusError, GeniusResult};
use crate::transport::HttpRequest;
use crate::types::feed::FeedQuery;

/// Fetch recommendations for a visitor session.
pub struct DataService<'a> {
    ctx: ServiceContext<'a>,
}

impl<'a> DataService<'a> {
    pub(crate) fn new(ctx: ServiceContext<'a>) -> Self {
        Self { ctx }
    }

    fn endpoint(&self) -> GeniusResult<String> {
        let project = self.ctx.project_segment()?;
        Ok(format!("{LEGACY_PREFIX}/{project}"))
    }

    /// Requests a feed page.
    ///
    /// Without a `session_id` a fresh random one is used for this call.
    #[instrument(skip(self, query))]
    pub async fn feed(&self, query: &FeedQuery, session_id: Option<&str>) -> GeniusResult<Value> {
        self.post_query("feed", query, session_id).await
    }

    /// Requests a batch of item identifiers.
    ///
    /// Without a `session_id` a fresh random one is used for this call.
    #[instrument(skip(self, query))]
    pub async fn batch(&self, query: &FeedQuery, session_id: Option<&str>) -> GeniusResult<Value> {
        self.post_query("batch", query, session_id).await
    }

    /// Requests a batch and fetches every returned item, one after another.
    ///
    /// The first failed lookup stops the resolution; the error carries the
    /// items fetched so far.
    #[instrument(skip(self, query))]
    pub async fn batch_to_items(
        &self,
        query: &FeedQuery,
        session_id: Option<&str>,
    ) -> GeniusResult<Vec<Value>> {
        let ids = expect_array(self.batch(query, session_id).await?, "batch response")?
            .iter()
            .map(|value| {
                record_id(value).ok_or_else(|| {
                    GeniusError::serialization(format!("batch entry is not an item id: {value}"))
                })
            })
            .collect::<GeniusResult<Vec<String>>>()?;

        let items = ItemsService::new(self.ctx);
        let mut resolved = Vec::with_capacity(ids.len());
        for id in ids {
            match items.get(&id).await {
                Ok(item) => resolved.push(item),
                Err(source) => {
                    return Err(GeniusError::BatchResolution {
                        resolved,
                        failed_id: id,
                        source: Box::new(source),
                    })
                }
            }
        }
        Ok(resolved)
    }

    async fn post_query(
        &self,
        route: &str,
        query: &FeedQuery,
        session_id: Option<&str>,
    ) -> GeniusResult<Value> {
        let endpoint = self.endpoint()?;
        let session_id = session_id.map_or_else(|| Uuid::new_v4().to_string(), segment);

        let request = HttpRequest::post(format!("{endpoint}/{route}/{session_id}"))
            .with_json(&query.to_json())?;
        self.ctx.send(request).await
    }
}

impl std::fmt::Debug for DataService<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DataService").finish()
    }
}
