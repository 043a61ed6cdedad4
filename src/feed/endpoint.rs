use serde::{Deserialize, Serialize};
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::handshake::client::Request;

use super::error::FeedError;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct FeedEndpoint {
    #[serde(default = "default_scheme")]
    pub scheme: String,
    pub host: String,
    pub port: u16,
    #[serde(default = "default_path")]
    pub path: String,
}

fn default_scheme() -> String {
    "ws".to_string()
}

fn default_path() -> String {
    "/".to_string()
}

impl FeedEndpoint {
    pub fn new(host: &str, port: u16, path: &str) -> Self {
        FeedEndpoint {
            scheme: default_scheme(),
            host: host.to_string(),
            port,
            path: path.to_string(),
        }
    }

    pub fn url(&self) -> String {
        let path = self.path.trim();
        let sep = if path.starts_with('/') { "" } else { "/" };
        format!("{}://{}:{}{}{}", self.scheme, self.host, self.port, sep, path)
    }

    pub fn request(&self) -> Result<Request, FeedError> {
        let url = self.url();
        if self.scheme != "ws" && self.scheme != "wss" {
            return Err(FeedError::InvalidEndpoint {
                message: format!("unsupported scheme {:?}", self.scheme),
                url,
            });
        }
        url.as_str()
            .into_client_request()
            .map_err(|e| FeedError::InvalidEndpoint {
                url: url.clone(),
                message: e.to_string(),
            })
    }
}
