/// Message the controller answers `ExportBundle` with for a model without applications.
pub const NOTHING_TO_EXPORT: &str = "nothing to export as there are no applications";

#[derive(thiserror::Error, Debug)]
pub enum JujuError {
    /// An error reported by the controller itself. Displays as the bare controller message.
    #[error("{message}")]
    Api { code: String, message: String },
    #[error("Controller does not offer a supported version of the {0} facade")]
    UnsupportedFacade(&'static str),
    #[error("Invalid controller CA certificate: {0}")]
    Certificate(String),
    #[error("TLS configuration failed: {0}")]
    Tls(#[from] tokio_rustls::rustls::Error),
    #[error("Controller connection failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("Websocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),
    #[error("Malformed controller message: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Controller closed the connection")]
    ConnectionClosed,
}

impl JujuError {
    pub fn api(code: impl Into<String>, message: impl Into<String>) -> Self {
        JujuError::Api {
            code: code.into(),
            message: message.into(),
        }
    }

    /// True for the expected failure of exporting the bundle of an empty model.
    pub fn is_nothing_to_export(&self) -> bool {
        matches!(self, JujuError::Api { message, .. } if message == NOTHING_TO_EXPORT)
    }
}
