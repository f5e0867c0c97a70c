use inventory_collector_juju::JujuError;
use std::path::PathBuf;

#[derive(thiserror::Error, Debug)]
pub enum CollectionError {
    #[error("Failed to collect data from target '{target}': {source}")]
    Exporter {
        target: String,
        #[source]
        source: reqwest::Error,
    },
    #[error(transparent)]
    Juju(#[from] JujuError),
    #[error("Failed to parse bundle of model '{model}': {source}")]
    BundleParse {
        model: String,
        #[source]
        source: serde_yml::Error,
    },
    #[error("Failed to serialize document: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Failed to write archive '{}': {source}", path.display())]
    Archive {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Archive writer stopped before collection finished")]
    WriterClosed,
    #[error("Archive writer task failed: {0}")]
    WriterTask(#[from] tokio::task::JoinError),
}
