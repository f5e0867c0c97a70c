use crate::{
    rpc::{
        Connection,
        StringResult,
    },
    JujuError,
    ModelSummary,
};
use serde_json::{
    json,
    Value,
};

/// An API connection scoped to a single model.
pub struct Model {
    summary: ModelSummary,
    connection: Connection,
}

impl Model {
    pub(crate) fn new(summary: ModelSummary, connection: Connection) -> Self {
        Self { summary, connection }
    }

    pub fn name(&self) -> &str {
        &self.summary.name
    }

    pub fn summary(&self) -> &ModelSummary {
        &self.summary
    }

    /// The model's full status as the controller serialises it.
    pub async fn full_status(&mut self) -> Result<Value, JujuError> {
        self.connection
            .call("Client", "FullStatus", json!({ "patterns": [] }))
            .await
    }

    /// The model's bundle, a YAML stream that may hold more than one document.
    ///
    /// Models without applications fail with [`crate::NOTHING_TO_EXPORT`].
    pub async fn export_bundle(&mut self) -> Result<String, JujuError> {
        let result: StringResult = self
            .connection
            .call("Bundle", "ExportBundle", json!({ "include-charm-defaults": false }))
            .await?;
        result.into_result()
    }

    pub async fn disconnect(self) -> Result<(), JujuError> {
        self.connection.close().await
    }
}
