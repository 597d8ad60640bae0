//! Legacy instructions service.
//!
//! Instructions (`promptlet` records) are the predecessor of policies and
//! live under the legacy route prefix.

use serde_json::Value;
use tracing::instrument;

use super::{expect_array, record_id, segment, ServiceContext, LEGACY_PREFIX};
use crate::errors::{GeniusError, GeniusResult};
use crate::transport::HttpRequest;
use crate::types::records::RecordSource;
use crate::validation::{require_non_empty, validate_instructions};

/// Manage instructions on the legacy API.
pub struct InstructionsService<'a> {
    ctx: ServiceContext<'a>,
}

impl<'a> InstructionsService<'a> {
    pub(crate) fn new(ctx: ServiceContext<'a>) -> Self {
        Self { ctx }
    }

    fn endpoint(&self) -> GeniusResult<String> {
        let project = self.ctx.project_segment()?;
        Ok(format!("{LEGACY_PREFIX}/{project}/model/instruction"))
    }

    /// Uploads instructions after checking each has a `promptlet` key.
    #[instrument(skip(self, source))]
    pub async fn add(&self, source: impl Into<RecordSource>) -> GeniusResult<Value> {
        let endpoint = self.endpoint()?;
        let instructions = source.into().load()?;
        require_non_empty("instruction", &instructions)?;
        validate_instructions(&instructions)?;

        let request = HttpRequest::post(format!("{endpoint}/create"))
            .with_json(&Value::Array(instructions))?;
        self.ctx.send(request).await
    }

    /// Lists all instructions.
    #[instrument(skip(self))]
    pub async fn list(&self) -> GeniusResult<Value> {
        let endpoint = self.endpoint()?;
        self.ctx
            .send(HttpRequest::get(format!("{endpoint}/list")))
            .await
    }

    /// Replaces an instruction.
    #[instrument(skip(self, instruction))]
    pub async fn update(&self, instruction_id: &str, instruction: Value) -> GeniusResult<Value> {
        let endpoint = self.endpoint()?;
        validate_instructions(std::slice::from_ref(&instruction))?;

        let request = HttpRequest::put(format!(
            "{endpoint}/{}/update",
            segment(instruction_id)
        ))
            .with_json(&instruction)?;
        self.ctx.send(request).await
    }

    /// Deletes an instruction.
    #[instrument(skip(self))]
    pub async fn delete(&self, instruction_id: &str) -> GeniusResult<Value> {
        let endpoint = self.endpoint()?;
        self.ctx
            .send(HttpRequest::delete(format!(
                "{endpoint}/{}/delete",
                segment(instruction_id)
            )))
            .await
    }

    /// Deletes the instruction the service generates for a new project.
    ///
    /// The generated instruction is the first one listed, so call this
    /// before uploading your own. Returns false when there was nothing to
    /// delete.
    #[instrument(skip(self))]
    pub async fn remove_ai_generated(&self) -> GeniusResult<bool> {
        let instructions = expect_array(self.list().await?, "instruction list")?;

        let Some(first) = instructions.first() else {
            return Ok(false);
        };
        let id = first.get("id").and_then(record_id).ok_or_else(|| {
            GeniusError::serialization(format!("instruction has no usable `id`: {first}"))
        })?;

        self.delete(&id).await?;
        tracing::info!(instruction_id = %id, "Removed generated instruction");
        Ok(true)
    }
}

impl std::fmt::Debug for InstructionsService<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InstructionsService").finish()
    }
}
