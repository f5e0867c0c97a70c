use crate::{
    naming::{
        ArchiveKey,
        EntryName,
    },
    CollectionError,
};
use tokio::sync::mpsc;

/// How many documents may wait for the archive writer before collectors are held back.
const DOCUMENT_BUFFER: usize = 32;

/// One collected file, addressed to an entry in an archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub archive: ArchiveKey,
    pub entry: EntryName,
    pub content: String,
}

impl Document {
    pub fn new(archive: ArchiveKey, entry: EntryName, content: impl Into<String>) -> Self {
        Self {
            archive,
            entry,
            content: content.into(),
        }
    }
}

/// The producing side of the document stream; collectors hold one of these.
#[derive(Debug, Clone)]
pub struct DocumentSender(mpsc::Sender<Document>);

impl DocumentSender {
    /// Waits for room in the buffer. Fails once the receiving writer has gone away.
    pub async fn send(&self, document: Document) -> Result<(), CollectionError> {
        self.0.send(document).await.map_err(|_| CollectionError::WriterClosed)
    }
}

/// A bounded, in-order document stream from the collectors to a single archive writer.
pub fn document_channel() -> (DocumentSender, mpsc::Receiver<Document>) {
    let (sender, receiver) = mpsc::channel(DOCUMENT_BUFFER);
    (DocumentSender(sender), receiver)
}
