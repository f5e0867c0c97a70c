use crate::{
    document::DocumentSender,
    naming::RunTimestamp,
    CollectionError,
};
use std::{
    future::Future,
    pin::Pin,
};

/// Trait for collecting documents from one kind of source
pub trait Collector {
    /// Collect everything for the run stamped `timestamp`, handing each document to `documents`
    fn collect<'a>(
        &'a mut self,
        timestamp: &'a RunTimestamp,
        documents: &'a DocumentSender,
    ) -> Pin<Box<dyn Future<Output = Result<(), CollectionError>> + Send + 'a>>;

    /// Get the name of this collector
    fn name(&self) -> &'static str;
}
