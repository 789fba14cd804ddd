use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use serde::{Deserialize, Serialize};

/// Configuration for the HTTP API.
#[derive(Serialize, Deserialize, PartialEq, Eq, Debug, Clone)]
pub struct HttpApi {
    /// The address the API will bind to.
    /// The format is `ip:port`, for example `0.0.0.0:1010`. If you want the
    /// operating system to choose a random port, use port `0`.
    #[serde(default = "HttpApi::default_bind_address")]
    pub bind_address: SocketAddr,

    #[serde(default = "Auth::default")]
    pub auth: Auth,
}

impl Default for HttpApi {
    fn default() -> Self {
        Self {
            bind_address: Self::default_bind_address(),
            auth: Auth::default(),
        }
    }
}

impl HttpApi {
    fn default_bind_address() -> SocketAddr {
        SocketAddr::new(IpAddr::V4(Ipv4Addr::new(0, 0, 0, 0)), 1010)
    }

    pub fn override_key(&mut self, key: &str) {
        key.clone_into(&mut self.auth.key);
    }
}

/// Shared secret authentication.
///
/// When enabled every request must carry the key, either in the `key` query
/// parameter or in the `/api/key/{key}/` path prefix.
#[derive(Serialize, Deserialize, PartialEq, Eq, Debug, Clone, Default)]
pub struct Auth {
    #[serde(default)]
    pub enabled: bool,

    #[serde(default)]
    pub key: String,
}
