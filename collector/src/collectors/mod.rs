//! # Collectors Module
//!
//! The data collection side of a run.
//!
//! - **`Collector` trait**: Interface shared by every source of documents
//! - **`ExporterCollector`**: Pulls `dpkg`, `snap` and `kernel` inventory from HTTP exporters
//! - **`JujuCollector`**: Pulls the status and bundle of every model on a Juju controller
//! - **`Orchestrator`**: Runs the collectors in order and feeds their documents to the archive writer

pub mod collector;
pub mod exporter_collector;
pub mod juju_collector;
pub mod orchestrator;

pub use collector::Collector;
pub use exporter_collector::{
    ExporterCollector,
    EXPORTER_TIMEOUT,
};
pub use juju_collector::JujuCollector;
pub use orchestrator::Orchestrator;
