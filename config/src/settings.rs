use crate::{
    section::Section,
    ConfigError,
};
use std::{
    fmt,
    path::PathBuf,
};
use url::Url;

/// The `settings` section: where archives go and whom they belong to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub collection_path: PathBuf,
    pub customer: String,
    pub site: String,
}

impl Settings {
    pub(crate) const KEY: &'static str = "settings";
    pub(crate) const REQUIRED: &'static [&'static str] = &["collection_path", "customer", "site"];

    pub(crate) fn from_section(mut section: Section) -> Result<Self, ConfigError> {
        Ok(Self {
            collection_path: section.string("collection_path")?.into(),
            customer: section.string("customer")?,
            site: section.string("site")?,
        })
    }
}

/// One exporter endpoint to pull inventory from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    /// `host:port` of the exporter.
    pub endpoint: String,
    pub hostname: String,
    pub customer: String,
    pub site: String,
    pub model: String,
}

impl Target {
    pub(crate) const KEY: &'static str = "targets";
    pub(crate) const REQUIRED: &'static [&'static str] = &["endpoint", "hostname", "customer", "site", "model"];

    pub(crate) fn from_section(mut section: Section) -> Result<Self, ConfigError> {
        let endpoint_key = section.key("endpoint");
        let endpoint = section.string("endpoint")?;
        validate_endpoint(endpoint_key, &endpoint)?;

        Ok(Self {
            endpoint,
            hostname: section.string("hostname")?,
            customer: section.string("customer")?,
            site: section.string("site")?,
            model: section.string("model")?,
        })
    }
}

/// The exporter endpoint is spliced into `http://<endpoint>/<kind>`, so it must be a bare authority.
fn validate_endpoint(key: String, endpoint: &str) -> Result<(), ConfigError> {
    let url = Url::parse(&format!("http://{endpoint}/")).map_err(|err| ConfigError::InvalidValue {
        key: key.clone(),
        reason: format!("'{endpoint}' is not a valid host:port ({err})"),
    })?;

    let bare_authority =
        url.host_str().is_some() && url.path() == "/" && url.query().is_none() && url.username().is_empty();
    if !bare_authority {
        return Err(ConfigError::InvalidValue {
            key,
            reason: format!("'{endpoint}' is not a valid host:port"),
        });
    }
    Ok(())
}

/// Credentials for the Juju controller. Only the controller connection uses these.
#[derive(Clone, PartialEq, Eq)]
pub struct JujuController {
    /// `host:port` of the controller API.
    pub endpoint: String,
    /// PEM encoded CA certificate the controller's certificate is signed with.
    pub ca_cert: String,
    pub username: String,
    pub password: String,
}

impl JujuController {
    pub(crate) const KEY: &'static str = "juju_controller";
    pub(crate) const REQUIRED: &'static [&'static str] = &["endpoint", "ca_cert", "username", "password"];

    pub(crate) fn from_section(mut section: Section) -> Result<Self, ConfigError> {
        Ok(Self {
            endpoint: section.string("endpoint")?,
            ca_cert: section.string("ca_cert")?,
            username: section.string("username")?,
            password: section.string("password")?,
        })
    }
}

impl fmt::Debug for JujuController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JujuController")
            .field("endpoint", &self.endpoint)
            .field("ca_cert", &format_args!("<{} bytes>", self.ca_cert.len()))
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}
