use crate::{
    archive::{
        ArchiveWriter,
        RunSummary,
    },
    collectors::{
        Collector,
        ExporterCollector,
        JujuCollector,
    },
    controller::ControllerApi,
    document::{
        document_channel,
        DocumentSender,
    },
    naming::RunTimestamp,
    CollectionError,
};
use inventory_collector_config::Config;
use reqwest::Client as HttpClient;
use std::path::PathBuf;

/// Runs one collection: exporters first, then the Juju controller, all stamped with one timestamp.
///
/// The orchestrator owns the controller connection and releases it when the run ends, whatever
/// the outcome.
pub struct Orchestrator<C: ControllerApi> {
    collection_path: PathBuf,
    exporter_collector: ExporterCollector,
    juju_collector: JujuCollector<C>,
}

impl<C: ControllerApi> Orchestrator<C> {
    /// Create a new orchestrator for `config`, collecting from an already connected `controller`
    pub fn new(config: &Config, controller: C) -> Self {
        // One HTTP client shared by every exporter request
        let http_client = HttpClient::new();

        Self::with_collectors(
            config.settings.collection_path.clone(),
            ExporterCollector::new(config.targets.clone(), http_client),
            JujuCollector::new(controller, config.settings.clone()),
        )
    }

    pub fn with_collectors(
        collection_path: impl Into<PathBuf>,
        exporter_collector: ExporterCollector,
        juju_collector: JujuCollector<C>,
    ) -> Self {
        Self {
            collection_path: collection_path.into(),
            exporter_collector,
            juju_collector,
        }
    }

    pub async fn run(self) -> Result<RunSummary, CollectionError> {
        self.run_at(RunTimestamp::now()).await
    }

    #[instrument(skip(self), fields(collection_path = %self.collection_path.display()))]
    pub async fn run_at(mut self, timestamp: RunTimestamp) -> Result<RunSummary, CollectionError> {
        info!("Starting collection run");
        let outcome = self.collect_and_write(&timestamp).await;

        let controller = self.juju_collector.into_controller();
        if let Err(err) = controller.disconnect().await {
            warn!(error = %err, "Failed to disconnect from Juju controller");
        }

        if let Ok(summary) = &outcome {
            info!(
                archives = summary.archive_count(),
                entries = summary.entry_count(),
                "Collection run finished"
            );
        }
        outcome
    }

    async fn collect_and_write(&mut self, timestamp: &RunTimestamp) -> Result<RunSummary, CollectionError> {
        let (documents, receiver) = document_channel();
        let writer = ArchiveWriter::new(self.collection_path.clone());
        let writing = tokio::task::spawn_blocking(move || writer.consume(receiver));

        let collected = self.collect(timestamp, documents).await;
        let written = writing.await?;

        match (collected, written) {
            // The writer gave up first; its error is the one worth reporting
            (Err(CollectionError::WriterClosed), Err(err)) => Err(err),
            (Err(err), _) => Err(err),
            (Ok(()), written) => written,
        }
    }

    /// Consumes `documents` so the writer sees the end of the stream once collection stops.
    async fn collect(&mut self, timestamp: &RunTimestamp, documents: DocumentSender) -> Result<(), CollectionError> {
        // Collect exporter inventory
        debug!(collector = self.exporter_collector.name(), "Running collector");
        self.exporter_collector.collect(timestamp, &documents).await?;

        // Collect Juju models
        debug!(collector = self.juju_collector.name(), "Running collector");
        self.juju_collector.collect(timestamp, &documents).await?;

        Ok(())
    }
}
