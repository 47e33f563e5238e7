//! VPN client configurations, one struct per protocol.
//!
//! Text fields the builders require are deserialized with defaults so that a
//! missing value surfaces as a [`BuildError`] naming the client and field,
//! not as an opaque parse failure of the whole topology.

use std::fmt::{self, Display, Formatter};
use std::net::Ipv4Addr;

use serde::{Deserialize, Serialize};

use super::{Networks, WanLinks};
use crate::error::{require, BuildError, EntityKind, EntityRef, NameClaims};
use crate::naming::interface_name;

/// Protocol discriminant of a [`VpnClient`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VpnProtocol {
    Wireguard,
    OpenVpn,
    Pptp,
    L2tp,
    Sstp,
    Ikev2,
}

impl VpnProtocol {
    /// Tag used when deriving interface names.
    pub fn tag(self) -> &'static str {
        match self {
            VpnProtocol::Wireguard => "Wireguard",
            VpnProtocol::OpenVpn => "OpenVPN",
            VpnProtocol::Pptp => "PPTP",
            VpnProtocol::L2tp => "L2TP",
            VpnProtocol::Sstp => "SSTP",
            VpnProtocol::Ikev2 => "IKEv2",
        }
    }
}

impl Display for VpnProtocol {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WireguardClient {
    pub name: String,
    pub wan: String,
    /// Peer endpoint host or address.
    pub server: String,
    pub port: Option<u16>,
    pub private_key: String,
    /// Public key of the remote peer.
    pub public_key: String,
    pub preshared_key: Option<String>,
    /// Tunnel address of this client in CIDR notation.
    pub address: String,
    pub mtu: Option<u16>,
    /// Persistent keepalive in seconds.
    pub keepalive: Option<u32>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OvpnTransport {
    #[default]
    Tcp,
    Udp,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OpenVpnClient {
    pub name: String,
    pub wan: String,
    pub server: String,
    pub port: Option<u16>,
    pub user: String,
    pub password: String,
    pub transport: OvpnTransport,
    pub cipher: Option<String>,
    pub auth: Option<String>,
    /// Name of a client certificate already imported on the router.
    pub certificate: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PptpClient {
    pub name: String,
    pub wan: String,
    pub server: String,
    pub user: String,
    pub password: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct L2tpClient {
    pub name: String,
    pub wan: String,
    pub server: String,
    pub user: String,
    pub password: String,
    /// Enables L2TP/IPsec when set.
    pub ipsec_secret: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SstpClient {
    pub name: String,
    pub wan: String,
    pub server: String,
    pub port: Option<u16>,
    pub user: String,
    pub password: String,
    pub verify_server_certificate: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Ikev2Client {
    pub name: String,
    pub wan: String,
    pub server: String,
    pub user: String,
    pub password: String,
    pub certificate: Option<String>,
}

/// A configured VPN client, tagged by `protocol` in the input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "protocol", rename_all = "lowercase")]
pub enum VpnClient {
    Wireguard(WireguardClient),
    OpenVpn(OpenVpnClient),
    Pptp(PptpClient),
    L2tp(L2tpClient),
    Sstp(SstpClient),
    Ikev2(Ikev2Client),
}

impl VpnClient {
    pub fn protocol(&self) -> VpnProtocol {
        match self {
            VpnClient::Wireguard(_) => VpnProtocol::Wireguard,
            VpnClient::OpenVpn(_) => VpnProtocol::OpenVpn,
            VpnClient::Pptp(_) => VpnProtocol::Pptp,
            VpnClient::L2tp(_) => VpnProtocol::L2tp,
            VpnClient::Sstp(_) => VpnProtocol::Sstp,
            VpnClient::Ikev2(_) => VpnProtocol::Ikev2,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            VpnClient::Wireguard(c) => &c.name,
            VpnClient::OpenVpn(c) => &c.name,
            VpnClient::Pptp(c) => &c.name,
            VpnClient::L2tp(c) => &c.name,
            VpnClient::Sstp(c) => &c.name,
            VpnClient::Ikev2(c) => &c.name,
        }
    }

    /// Name of the WAN link the tunnel egresses through.
    pub fn wan(&self) -> &str {
        match self {
            VpnClient::Wireguard(c) => &c.wan,
            VpnClient::OpenVpn(c) => &c.wan,
            VpnClient::Pptp(c) => &c.wan,
            VpnClient::L2tp(c) => &c.wan,
            VpnClient::Sstp(c) => &c.wan,
            VpnClient::Ikev2(c) => &c.wan,
        }
    }

    pub fn server(&self) -> &str {
        match self {
            VpnClient::Wireguard(c) => &c.server,
            VpnClient::OpenVpn(c) => &c.server,
            VpnClient::Pptp(c) => &c.server,
            VpnClient::L2tp(c) => &c.server,
            VpnClient::Sstp(c) => &c.server,
            VpnClient::Ikev2(c) => &c.server,
        }
    }

    /// Entity reference used in errors about the client at `index`.
    pub fn entity(&self, index: usize) -> EntityRef {
        EntityRef::new(EntityKind::VpnClient, self.name(), index).with_detail(self.protocol().tag())
    }

    /// Tunnel interface name derived from the client's name and protocol.
    pub fn interface_name(&self) -> String {
        interface_name(self.name(), self.protocol().tag())
    }

    /// Claim the client's tunnel interface in `interfaces`.
    pub fn claim_interface(
        &self,
        interfaces: &mut NameClaims,
        index: usize,
    ) -> Result<(), BuildError> {
        let interface = self.interface_name();
        interfaces.claim(
            format!("interface {interface}"),
            interface,
            &self.entity(index),
        )
    }

    /// The endpoint rule routes by the egress link's table, which exists only
    /// while the link's network is present.
    pub fn check_egress(
        &self,
        index: usize,
        wan: &WanLinks,
        networks: &Networks,
    ) -> Result<(), BuildError> {
        let Some(category) = wan.category_of(self.wan()) else {
            return Ok(());
        };
        let network = category.network();
        if networks.is_present(network) {
            return Ok(());
        }
        Err(BuildError::WanNetworkAbsent {
            entity: self.entity(index),
            wan: self.wan().trim().to_string(),
            network: network.to_string(),
        })
    }

    /// Check every field the builders need.
    ///
    /// `wan_names` are the names of the WAN links present in the topology;
    /// the client's `wan` must be one of them.
    pub fn validate(&self, index: usize, wan_names: &[&str]) -> Result<(), BuildError> {
        let entity = self.entity(index);
        require(&entity, "name", self.name())?;
        require(&entity, "server", self.server())?;
        let wan = require(&entity, "wan", self.wan())?;
        if !wan_names.contains(&wan) {
            return Err(BuildError::UnknownWan {
                entity,
                wan: wan.to_string(),
            });
        }
        validate_server(&entity, self.server())?;

        match self {
            VpnClient::Wireguard(c) => {
                require(&entity, "private_key", &c.private_key)?;
                require(&entity, "public_key", &c.public_key)?;
                let address = require(&entity, "address", &c.address)?;
                validate_cidr(&entity, "address", address)?;
                validate_port(&entity, c.port)
            }
            VpnClient::OpenVpn(c) => {
                if c.user.trim().is_empty() && c.certificate.is_none() {
                    return Err(BuildError::MissingField {
                        entity,
                        field: "user",
                    });
                }
                validate_port(&entity, c.port)
            }
            VpnClient::Pptp(c) => {
                require(&entity, "user", &c.user)?;
                require(&entity, "password", &c.password).map(|_| ())
            }
            VpnClient::L2tp(c) => {
                require(&entity, "user", &c.user)?;
                require(&entity, "password", &c.password)?;
                if let Some(secret) = &c.ipsec_secret {
                    require(&entity, "ipsec_secret", secret)?;
                }
                Ok(())
            }
            VpnClient::Sstp(c) => {
                require(&entity, "user", &c.user)?;
                require(&entity, "password", &c.password)?;
                validate_port(&entity, c.port)
            }
            VpnClient::Ikev2(c) => {
                require(&entity, "user", &c.user)?;
                require(&entity, "password", &c.password).map(|_| ())
            }
        }
    }
}

fn validate_server(entity: &EntityRef, server: &str) -> Result<(), BuildError> {
    let server = server.trim();
    let valid = server
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_' | ':'));
    if valid {
        return Ok(());
    }
    Err(BuildError::InvalidValue {
        entity: entity.clone(),
        field: "server",
        value: server.to_string(),
        reason: "expected a host name or IP address",
    })
}

pub(crate) fn validate_port(entity: &EntityRef, port: Option<u16>) -> Result<(), BuildError> {
    match port {
        Some(0) => Err(BuildError::InvalidValue {
            entity: entity.clone(),
            field: "port",
            value: "0".to_string(),
            reason: "port must be between 1 and 65535",
        }),
        _ => Ok(()),
    }
}

/// Validate an IPv4 `a.b.c.d/len` value.
pub(crate) fn validate_cidr(
    entity: &EntityRef,
    field: &'static str,
    value: &str,
) -> Result<(Ipv4Addr, u8), BuildError> {
    let invalid = |reason| BuildError::InvalidValue {
        entity: entity.clone(),
        field,
        value: value.to_string(),
        reason,
    };
    let (addr, prefix) = value
        .trim()
        .split_once('/')
        .ok_or_else(|| invalid("expected CIDR notation such as 10.0.0.2/24"))?;
    let addr: Ipv4Addr = addr
        .parse()
        .map_err(|_| invalid("address part is not IPv4"))?;
    let prefix: u8 = prefix
        .parse()
        .ok()
        .filter(|p| *p <= 32)
        .ok_or_else(|| invalid("prefix length must be 0-32"))?;
    Ok((addr, prefix))
}
