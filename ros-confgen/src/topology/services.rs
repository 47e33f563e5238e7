use std::collections::BTreeMap;
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Transport a service listens on. Fixed per service, never user-chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Transport {
    Tcp,
    Udp,
    Both,
}

impl Transport {
    pub fn carries_tcp(self) -> bool {
        matches!(self, Transport::Tcp | Transport::Both)
    }

    pub fn carries_udp(self) -> bool {
        matches!(self, Transport::Udp | Transport::Both)
    }
}

/// Router management services that can be exposed on a WAN link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ServiceKey {
    Api,
    ApiSsl,
    Ftp,
    Ssh,
    Telnet,
    Winbox,
    Web,
    WebSsl,
}

impl ServiceKey {
    pub const ALL: [ServiceKey; 8] = [
        ServiceKey::Api,
        ServiceKey::ApiSsl,
        ServiceKey::Ftp,
        ServiceKey::Ssh,
        ServiceKey::Telnet,
        ServiceKey::Winbox,
        ServiceKey::Web,
        ServiceKey::WebSsl,
    ];

    /// Key used in topology files.
    pub fn key(self) -> &'static str {
        match self {
            ServiceKey::Api => "api",
            ServiceKey::ApiSsl => "api-ssl",
            ServiceKey::Ftp => "ftp",
            ServiceKey::Ssh => "ssh",
            ServiceKey::Telnet => "telnet",
            ServiceKey::Winbox => "winbox",
            ServiceKey::Web => "web",
            ServiceKey::WebSsl => "webssl",
        }
    }

    /// Name of the entry under `/ip service`.
    pub fn routeros_name(self) -> &'static str {
        match self {
            ServiceKey::Web => "www",
            ServiceKey::WebSsl => "www-ssl",
            other => other.key(),
        }
    }

    pub fn transport(self) -> Transport {
        match self {
            ServiceKey::Api
            | ServiceKey::ApiSsl
            | ServiceKey::Ftp
            | ServiceKey::Ssh
            | ServiceKey::Telnet
            | ServiceKey::Winbox
            | ServiceKey::Web
            | ServiceKey::WebSsl => Transport::Tcp,
        }
    }
}

impl Display for ServiceKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for ServiceKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_ascii_lowercase();
        ServiceKey::ALL
            .into_iter()
            .find(|k| k.key() == lowered || k.routeros_name() == lowered)
            .ok_or_else(|| format!("unknown service '{s}'"))
    }
}

impl TryFrom<String> for ServiceKey {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ServiceKey> for String {
    fn from(value: ServiceKey) -> Self {
        value.key().to_string()
    }
}

/// Enablement and optional custom port of one service.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServiceSetting {
    pub enabled: bool,
    pub port: Option<u16>,
}

impl ServiceSetting {
    /// Port to pin, when the service is enabled on a custom port.
    pub fn pinned_port(&self) -> Option<u16> {
        if self.enabled {
            self.port.filter(|p| *p != 0)
        } else {
            None
        }
    }
}

pub type ServiceMap = BTreeMap<ServiceKey, ServiceSetting>;
