//! Dev server options.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use serde::{Deserialize, Serialize};

use crate::cli::DevArgs;
use crate::error::{CliError, Result};

pub const DEFAULT_PORT: u16 = 3000;

/// Forward requests under any of `context` to `target`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiProxy {
    pub target: String,
    pub context: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DevOptions {
    pub host: IpAddr,
    pub port: u16,
    pub https: bool,
    pub api_proxy: Option<ApiProxy>,
}

impl Default for DevOptions {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: DEFAULT_PORT,
            https: false,
            api_proxy: None,
        }
    }
}

impl DevOptions {
    pub fn from_args(args: &DevArgs) -> Result<Self> {
        let api_proxy = match &args.proxy_target {
            Some(target) => {
                if args.proxy_context.is_empty() {
                    return Err(CliError::InvalidArgument(
                        "--proxy-target needs at least one --proxy-context".to_string(),
                    ));
                }
                Some(ApiProxy {
                    target: target.clone(),
                    context: args.proxy_context.clone(),
                })
            }
            None => None,
        };

        Ok(Self {
            host: args.host,
            port: args.port,
            https: args.https,
            api_proxy,
        })
    }

    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// URL to show the operator. Unspecified hosts display as `localhost`.
    pub fn server_url(&self) -> String {
        let host = if self.host.is_unspecified() {
            "localhost".to_string()
        } else {
            self.host.to_string()
        };
        let protocol = if self.https { "https" } else { "http" };
        format!("{protocol}://{host}:{}", self.port)
    }
}
