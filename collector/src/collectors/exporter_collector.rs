use crate::{
    collectors::Collector,
    document::{
        Document,
        DocumentSender,
    },
    naming::{
        ArchiveKey,
        EntryName,
        ExporterEndpoint,
        RunTimestamp,
    },
    CollectionError,
};
use inventory_collector_config::Target;
use reqwest::Client as HttpClient;
use std::{
    future::Future,
    pin::Pin,
    time::Duration,
};
use strum::IntoEnumIterator;

/// How long a single exporter request may take.
pub const EXPORTER_TIMEOUT: Duration = Duration::from_secs(60);

/// Pulls the dpkg, snap and kernel inventory of every configured exporter target.
///
/// The first failed request aborts the whole collection, including targets not yet visited.
/// Documents already handed over stay archived.
pub struct ExporterCollector {
    targets: Vec<Target>,
    http_client: HttpClient,
    timeout: Duration,
}

impl ExporterCollector {
    pub fn new(targets: Vec<Target>, http_client: HttpClient) -> Self {
        Self {
            targets,
            http_client,
            timeout: EXPORTER_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    async fn fetch(&self, target: &Target, endpoint: ExporterEndpoint) -> Result<String, CollectionError> {
        let url = endpoint.url(&target.endpoint);
        let exporter_error = |source: reqwest::Error| CollectionError::Exporter {
            target: target.endpoint.clone(),
            source,
        };

        debug!(%url, "Querying exporter");
        let response = self
            .http_client
            .get(&url)
            .timeout(self.timeout)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(exporter_error)?;

        response.text().await.map_err(exporter_error)
    }
}

impl Collector for ExporterCollector {
    fn collect<'a>(
        &'a mut self,
        timestamp: &'a RunTimestamp,
        documents: &'a DocumentSender,
    ) -> Pin<Box<dyn Future<Output = Result<(), CollectionError>> + Send + 'a>> {
        Box::pin(async move {
            for target in &self.targets {
                let archive = ArchiveKey::for_target(target, timestamp);
                for endpoint in ExporterEndpoint::iter() {
                    let content = self.fetch(target, endpoint).await?;
                    let entry = EntryName::new(endpoint.entry_kind(), &target.hostname, timestamp);
                    documents.send(Document::new(archive.clone(), entry, content)).await?;
                }
                info!(target = %target.endpoint, hostname = %target.hostname, "Collected exporter inventory");
            }
            Ok(())
        })
    }

    fn name(&self) -> &'static str {
        "ExporterCollector"
    }
}
