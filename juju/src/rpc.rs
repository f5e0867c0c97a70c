//! Juju API framing: JSON request/response frames over a websocket, one outstanding request at a
//! time.

use crate::JujuError;
use futures::{
    SinkExt,
    StreamExt,
};
use serde::{
    de::DeserializeOwned,
    Deserialize,
    Serialize,
};
use serde_json::Value;
use std::collections::HashMap;
use tokio::{
    io::{
        AsyncRead,
        AsyncWrite,
    },
    net::TcpStream,
};
use tokio_rustls::client::TlsStream;
use tokio_tungstenite::{
    tungstenite::{
        self,
        Message,
    },
    WebSocketStream,
};

pub(crate) type Transport = TlsStream<TcpStream>;

const ADMIN_FACADE: &str = "Admin";
const ADMIN_VERSION: u32 = 3;

/// Reported to the controller on login.
const CLIENT_VERSION: &str = "3.1.0";

/// Facade versions this client speaks, newest first.
const SUPPORTED_FACADES: &[(&str, &[u32])] = &[
    ("Bundle", &[8, 7, 6, 5, 4, 3, 2, 1]),
    ("Client", &[8, 7, 6, 5, 4, 3, 2, 1]),
    ("ModelManager", &[10, 9, 8, 7, 6, 5, 4]),
];

#[derive(Debug, Serialize)]
#[serde(rename_all = "kebab-case")]
struct Request<'a, P> {
    request_id: u64,
    #[serde(rename = "type")]
    facade: &'a str,
    version: u32,
    request: &'a str,
    params: P,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct Response {
    request_id: u64,
    #[serde(default)]
    response: Option<Value>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    error_code: Option<String>,
}

impl Response {
    fn into_result<R: DeserializeOwned>(self) -> Result<R, JujuError> {
        match self.error {
            Some(message) if !message.is_empty() => Err(JujuError::api(self.error_code.unwrap_or_default(), message)),
            _ => Ok(serde_json::from_value(self.response.unwrap_or(Value::Null))?),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "kebab-case")]
struct LoginRequest<'a> {
    auth_tag: String,
    credentials: &'a str,
    nonce: &'a str,
    client_version: &'a str,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub(crate) struct LoginResult {
    #[serde(default)]
    facades: Option<Vec<FacadeVersions>>,
    #[serde(default)]
    pub(crate) server_version: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FacadeVersions {
    name: String,
    versions: Vec<u32>,
}

/// A `params.StringResult`: a value or an error embedded in a successful reply.
#[derive(Debug, Deserialize)]
pub(crate) struct StringResult {
    #[serde(default)]
    result: String,
    #[serde(default)]
    error: Option<ErrorResult>,
}

#[derive(Debug, Deserialize)]
struct ErrorResult {
    message: String,
    #[serde(default)]
    code: String,
}

impl StringResult {
    pub(crate) fn into_result(self) -> Result<String, JujuError> {
        match self.error {
            Some(error) => Err(JujuError::api(error.code, error.message)),
            None => Ok(self.result),
        }
    }
}

/// Facade versions the controller advertised at login.
#[derive(Debug, Default)]
struct Facades(HashMap<String, Vec<u32>>);

impl Facades {
    fn negotiate(&self, facade: &'static str) -> Result<u32, JujuError> {
        let ours = SUPPORTED_FACADES
            .iter()
            .find(|(name, _)| *name == facade)
            .map(|(_, versions)| *versions)
            .unwrap_or_default();
        let theirs = self.0.get(facade).ok_or(JujuError::UnsupportedFacade(facade))?;

        ours.iter()
            .copied()
            .find(|version| theirs.contains(version))
            .ok_or(JujuError::UnsupportedFacade(facade))
    }
}

pub(crate) struct Connection<S = Transport> {
    socket: WebSocketStream<S>,
    next_request_id: u64,
    facades: Facades,
}

impl<S> Connection<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub(crate) async fn handshake(url: &str, stream: S) -> Result<Self, JujuError> {
        let (socket, _response) = tokio_tungstenite::client_async(url, stream).await?;
        Ok(Self {
            socket,
            next_request_id: 1,
            facades: Facades::default(),
        })
    }

    pub(crate) async fn login(&mut self, username: &str, password: &str) -> Result<LoginResult, JujuError> {
        let params = LoginRequest {
            auth_tag: format!("user-{username}"),
            credentials: password,
            nonce: "",
            client_version: CLIENT_VERSION,
        };
        let mut result: LoginResult = self.request(ADMIN_FACADE, ADMIN_VERSION, "Login", params).await?;

        self.facades = Facades(
            result
                .facades
                .take()
                .unwrap_or_default()
                .into_iter()
                .map(|facade| (facade.name, facade.versions))
                .collect(),
        );
        Ok(result)
    }

    /// Calls `request` on the newest mutually supported version of `facade`.
    pub(crate) async fn call<P, R>(&mut self, facade: &'static str, request: &str, params: P) -> Result<R, JujuError>
    where
        P: Serialize,
        R: DeserializeOwned,
    {
        let version = self.facades.negotiate(facade)?;
        self.request(facade, version, request, params).await
    }

    async fn request<P, R>(&mut self, facade: &str, version: u32, request: &str, params: P) -> Result<R, JujuError>
    where
        P: Serialize,
        R: DeserializeOwned,
    {
        let request_id = self.next_request_id;
        self.next_request_id += 1;

        let frame = serde_json::to_string(&Request {
            request_id,
            facade,
            version,
            request,
            params,
        })?;
        trace!(request_id, facade, version, request, "Sending controller request");
        self.socket.send(Message::text(frame)).await?;

        loop {
            let message = self.socket.next().await.ok_or(JujuError::ConnectionClosed)??;
            let text = match message {
                Message::Text(text) => text,
                Message::Close(_) => return Err(JujuError::ConnectionClosed),
                _ => continue,
            };

            let response: Response = serde_json::from_str(text.as_str())?;
            if response.request_id != request_id {
                warn!(
                    expected = request_id,
                    received = response.request_id,
                    "Ignoring reply to another request"
                );
                continue;
            }
            return response.into_result();
        }
    }

    pub(crate) async fn close(mut self) -> Result<(), JujuError> {
        match self.socket.close(None).await {
            Ok(()) | Err(tungstenite::Error::ConnectionClosed) | Err(tungstenite::Error::AlreadyClosed) => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}
