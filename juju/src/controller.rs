use crate::{
    rpc::Connection,
    tls,
    JujuError,
    Model,
};
use serde::Deserialize;
use serde_json::json;
use std::fmt;
use tokio::net::TcpStream;
use tokio_rustls::TlsConnector;

/// How to reach and authenticate against a controller.
#[derive(Clone)]
pub struct ConnectOptions {
    /// `host:port` of the controller API.
    pub endpoint: String,
    pub username: String,
    pub password: String,
    /// PEM encoded CA certificate of the controller.
    pub ca_cert: String,
}

impl fmt::Debug for ConnectOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectOptions")
            .field("endpoint", &self.endpoint)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish_non_exhaustive()
    }
}

/// A model as listed by the controller.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ModelSummary {
    pub name: String,
    pub uuid: String,
    #[serde(default)]
    pub owner_tag: String,
    #[serde(default, rename = "type")]
    pub model_type: String,
}

impl ModelSummary {
    pub fn new(name: impl Into<String>, uuid: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            uuid: uuid.into(),
            owner_tag: String::new(),
            model_type: String::new(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct UserModelList {
    #[serde(default)]
    user_models: Option<Vec<UserModel>>,
}

#[derive(Debug, Deserialize)]
struct UserModel {
    model: ModelSummary,
}

/// An authenticated session with a Juju controller.
pub struct Controller {
    connection: Connection,
    options: ConnectOptions,
    tls: TlsConnector,
}

impl Controller {
    #[instrument(level = "debug", skip_all, fields(endpoint = %options.endpoint))]
    pub async fn connect(options: ConnectOptions) -> Result<Self, JujuError> {
        let tls = tls::connector(&options.ca_cert)?;
        let connection = open(&options, &tls, "/api").await?;
        info!(endpoint = %options.endpoint, user = %options.username, "Connected to Juju controller");

        Ok(Self {
            connection,
            options,
            tls,
        })
    }

    /// Lists every model the user can see, in the order the controller reports them.
    pub async fn list_models(&mut self) -> Result<Vec<ModelSummary>, JujuError> {
        let params = json!({ "tag": format!("user-{}", self.options.username) });
        let list: UserModelList = self.connection.call("ModelManager", "ListModels", params).await?;
        let models: Vec<_> = list
            .user_models
            .unwrap_or_default()
            .into_iter()
            .map(|user_model| user_model.model)
            .collect();
        debug!(count = models.len(), "Listed models");
        Ok(models)
    }

    /// Opens a separate API connection scoped to `model`.
    pub async fn model(&self, model: &ModelSummary) -> Result<Model, JujuError> {
        let connection = open(&self.options, &self.tls, &format!("/model/{}/api", model.uuid)).await?;
        debug!(model = %model.name, uuid = %model.uuid, "Connected to model");
        Ok(Model::new(model.clone(), connection))
    }

    pub async fn disconnect(self) -> Result<(), JujuError> {
        self.connection.close().await?;
        debug!(endpoint = %self.options.endpoint, "Disconnected from Juju controller");
        Ok(())
    }
}

async fn open(options: &ConnectOptions, tls: &TlsConnector, path: &str) -> Result<Connection, JujuError> {
    let tcp = TcpStream::connect(&options.endpoint).await?;
    let stream = tls.connect(tls::server_name()?, tcp).await?;
    let url = format!("wss://{}{}", options.endpoint, path);
    let mut connection = Connection::handshake(&url, stream).await?;
    let login = connection.login(&options.username, &options.password).await?;
    trace!(%url, server_version = ?login.server_version, "Logged in");
    Ok(connection)
}
