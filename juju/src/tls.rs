use crate::JujuError;
use std::sync::Arc;
use tokio_rustls::{
    rustls::{
        self,
        pki_types::ServerName,
        ClientConfig,
        RootCertStore,
    },
    TlsConnector,
};

/// Juju controllers issue their API certificate for this name regardless of the address they are
/// reached on.
pub(crate) const CONTROLLER_SERVER_NAME: &str = "juju-apiserver";

/// Builds a connector that trusts nothing but the controller's CA.
pub(crate) fn connector(ca_cert: &str) -> Result<TlsConnector, JujuError> {
    let mut roots = RootCertStore::empty();
    for cert in rustls_pemfile::certs(&mut ca_cert.as_bytes()) {
        let cert = cert.map_err(|err| JujuError::Certificate(err.to_string()))?;
        roots.add(cert)?;
    }
    if roots.is_empty() {
        return Err(JujuError::Certificate("no PEM certificate found".to_string()));
    }

    let provider = Arc::new(rustls::crypto::ring::default_provider());
    let config = ClientConfig::builder_with_provider(provider)
        .with_safe_default_protocol_versions()?
        .with_root_certificates(roots)
        .with_no_client_auth();

    Ok(TlsConnector::from(Arc::new(config)))
}

pub(crate) fn server_name() -> Result<ServerName<'static>, JujuError> {
    ServerName::try_from(CONTROLLER_SERVER_NAME).map_err(|err| JujuError::Certificate(err.to_string()))
}
