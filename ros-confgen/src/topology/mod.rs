//! Declarative network topology consumed by the generator.
//!
//! A topology says which virtual networks exist (Domestic, Foreign, VPN),
//! which WAN uplinks serve the two physical classes, which VPN clients exist,
//! which LAN subnets are steered to which network and which router services
//! are exposed on custom ports. It is read once from TOML or JSON and never
//! mutated by generation.

use std::fmt::{self, Display, Formatter};
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::{require, BuildError, EntityKind, EntityRef, NameClaims};

pub mod services;
pub mod vpn;

pub use services::{ServiceKey, ServiceMap, ServiceSetting, Transport};
pub use vpn::{
    Ikev2Client, L2tpClient, OpenVpnClient, OvpnTransport, PptpClient, SstpClient, VpnClient,
    VpnProtocol, WireguardClient,
};

/// One of the three virtual networks traffic can be steered into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NetworkKind {
    Vpn,
    Domestic,
    Foreign,
}

impl NetworkKind {
    /// Order in which every per-network module emits its output.
    pub const EMISSION_ORDER: [NetworkKind; 3] =
        [NetworkKind::Vpn, NetworkKind::Domestic, NetworkKind::Foreign];

    /// Name used for forwarder groups, routing tables and address lists.
    pub fn label(self) -> &'static str {
        match self {
            NetworkKind::Vpn => "VPN",
            NetworkKind::Domestic => "Domestic",
            NetworkKind::Foreign => "Foreign",
        }
    }
}

impl Display for NetworkKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Physical uplink classes. VPN clients ride on top of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WanCategory {
    Domestic,
    Foreign,
}

impl WanCategory {
    pub fn network(self) -> NetworkKind {
        match self {
            WanCategory::Domestic => NetworkKind::Domestic,
            WanCategory::Foreign => NetworkKind::Foreign,
        }
    }
}

impl Display for WanCategory {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.network().label())
    }
}

/// Which virtual networks exist at all, independent of configured links.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Networks {
    pub domestic: bool,
    pub foreign: bool,
    pub vpn: bool,
}

impl Networks {
    pub fn is_present(&self, kind: NetworkKind) -> bool {
        match kind {
            NetworkKind::Vpn => self.vpn,
            NetworkKind::Domestic => self.domestic,
            NetworkKind::Foreign => self.foreign,
        }
    }
}

/// A single WAN uplink.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WanLink {
    /// Logical name, unique across all WAN links.
    pub name: String,
    /// RouterOS interface the uplink is attached to (`ether1`, `pppoe-out1`).
    pub interface: String,
    /// Next hop for the CheckIP host route; the interface is used when unset.
    pub gateway: Option<String>,
}

impl WanLink {
    pub fn entity(&self, category: WanCategory, index: usize) -> EntityRef {
        EntityRef::new(EntityKind::WanLink, &self.name, index).with_detail(category.to_string())
    }

    /// Claim the link's name in `names`; blank names are left to [`validate`](Self::validate).
    pub fn claim_name(
        &self,
        names: &mut NameClaims,
        category: WanCategory,
        index: usize,
    ) -> Result<(), BuildError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Ok(());
        }
        names.claim(
            format!("name '{name}'"),
            name.to_string(),
            &self.entity(category, index),
        )
    }

    /// Check the fields the WAN builder needs.
    pub fn validate(&self, category: WanCategory, index: usize) -> Result<(), BuildError> {
        let entity = self.entity(category, index);
        let name = require(&entity, "name", &self.name)?;
        if NetworkKind::EMISSION_ORDER
            .iter()
            .any(|kind| kind.label() == name)
        {
            return Err(BuildError::ReservedName { entity });
        }
        require(&entity, "interface", &self.interface)?;
        if let Some(gateway) = &self.gateway {
            require(&entity, "gateway", gateway)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WanLinks {
    pub domestic: Vec<WanLink>,
    pub foreign: Vec<WanLink>,
}

impl WanLinks {
    pub fn links(&self, category: WanCategory) -> &[WanLink] {
        match category {
            WanCategory::Domestic => &self.domestic,
            WanCategory::Foreign => &self.foreign,
        }
    }

    /// Category of the first link named `name`.
    pub fn category_of(&self, name: &str) -> Option<WanCategory> {
        let name = name.trim();
        [WanCategory::Domestic, WanCategory::Foreign]
            .into_iter()
            .find(|category| self.links(*category).iter().any(|l| l.name.trim() == name))
    }

    /// Names of every WAN link, Domestic first, trimmed.
    pub fn names(&self) -> Vec<&str> {
        self.domestic
            .iter()
            .chain(&self.foreign)
            .map(|link| link.name.trim())
            .filter(|name| !name.is_empty())
            .collect()
    }
}

/// A LAN subnet steered into one virtual network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Subnet {
    #[serde(default)]
    pub name: String,
    /// IPv4 network in CIDR notation.
    #[serde(default)]
    pub address: String,
    pub network: NetworkKind,
}

impl Subnet {
    pub fn entity(&self, index: usize) -> EntityRef {
        EntityRef::new(EntityKind::Subnet, &self.name, index).with_detail(self.network.label())
    }

    /// Check that `address` is an IPv4 network in CIDR notation.
    pub fn validate(&self, index: usize) -> Result<(), BuildError> {
        let entity = self.entity(index);
        let address = require(&entity, "address", &self.address)?;
        vpn::validate_cidr(&entity, "address", address).map(|_| ())
    }
}

/// What to do with entities that fail validation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvalidPolicy {
    /// Fail the whole generation on the first invalid entity.
    #[default]
    Abort,
    /// Drop invalid entities before any offsets are computed.
    Skip,
}

/// Generator settings carried in the topology's `[options]` table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneratorOptions {
    pub shorten: bool,
    pub on_invalid: InvalidPolicy,
    pub comments: bool,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            shorten: true,
            on_invalid: InvalidPolicy::Abort,
            comments: true,
        }
    }
}

/// Complete generator input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Topology {
    pub networks: Networks,
    pub wan: WanLinks,
    pub vpn: Vec<VpnClient>,
    pub subnets: Vec<Subnet>,
    pub services: ServiceMap,
    pub options: GeneratorOptions,
}

impl Topology {
    /// Checks that span more than one entity: name uniqueness and the
    /// network behind each VPN client's egress link.
    ///
    /// Stops at the first failure, in input order.
    pub fn check_cross_references(&self) -> Result<(), BuildError> {
        let mut names = NameClaims::default();
        for category in [WanCategory::Domestic, WanCategory::Foreign] {
            for (index, link) in self.wan.links(category).iter().enumerate() {
                link.claim_name(&mut names, category, index)?;
            }
        }
        let mut interfaces = NameClaims::default();
        for (index, client) in self.vpn.iter().enumerate() {
            client.check_egress(index, &self.wan, &self.networks)?;
            client.claim_interface(&mut interfaces, index)?;
        }
        Ok(())
    }
}
