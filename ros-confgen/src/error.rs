//! Entity-scoped build failures.
//!
//! Every builder that turns one topology entity (a WAN link, a VPN client, a
//! subnet) into script lines validates that entity first and reports the
//! failure with enough context for a user-facing message: which kind of
//! entity, which one, and which field.

use std::collections::HashMap;
use std::fmt::{self, Display, Formatter};

use serde::Serialize;
use thiserror::Error;

/// Kind of topology entity a [`BuildError`] refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    WanLink,
    VpnClient,
    Subnet,
    Service,
}

impl Display for EntityKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let label = match self {
            EntityKind::WanLink => "WAN link",
            EntityKind::VpnClient => "VPN client",
            EntityKind::Subnet => "subnet",
            EntityKind::Service => "service",
        };
        f.write_str(label)
    }
}

/// Identifies one entity of the input topology.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntityRef {
    pub kind: EntityKind,
    /// User-facing name; empty when the input left it out.
    pub name: String,
    /// Position in its input list.
    pub index: usize,
    /// Extra qualifier such as the VPN protocol or the WAN category.
    pub detail: Option<String>,
}

impl EntityRef {
    pub fn new(kind: EntityKind, name: &str, index: usize) -> Self {
        Self {
            kind,
            name: name.trim().to_string(),
            index,
            detail: None,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

impl Display for EntityRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if self.name.is_empty() {
            write!(f, "{} #{}", self.kind, self.index + 1)?;
        } else {
            write!(f, "{} '{}'", self.kind, self.name)?;
        }
        if let Some(detail) = &self.detail {
            write!(f, " ({detail})")?;
        }
        Ok(())
    }
}

/// A single entity could not be turned into script lines.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    #[error("{entity}: missing required field `{field}`")]
    MissingField {
        entity: EntityRef,
        field: &'static str,
    },
    #[error("{entity}: invalid `{field}` value {value:?} ({reason})")]
    InvalidValue {
        entity: EntityRef,
        field: &'static str,
        value: String,
        reason: &'static str,
    },
    #[error("{entity}: references unknown WAN link '{wan}'")]
    UnknownWan { entity: EntityRef, wan: String },
    #[error("{entity}: name collides with the routing table of a network")]
    ReservedName { entity: EntityRef },
    #[error("{entity}: {what} already used by {first}")]
    Duplicate {
        entity: EntityRef,
        what: String,
        first: EntityRef,
    },
    /// The egress link exists but its network emits no routing table.
    #[error("{entity}: WAN link '{wan}' belongs to network {network}, which is not present")]
    WanNetworkAbsent {
        entity: EntityRef,
        wan: String,
        network: String,
    },
    /// The CheckIP plan was computed from different counts than the builder sees.
    #[error("{entity}: no CheckIP address allocated at index {index}")]
    Unallocated { entity: EntityRef, index: usize },
}

impl BuildError {
    /// The entity this error is about.
    pub fn entity(&self) -> &EntityRef {
        match self {
            BuildError::MissingField { entity, .. }
            | BuildError::InvalidValue { entity, .. }
            | BuildError::UnknownWan { entity, .. }
            | BuildError::ReservedName { entity }
            | BuildError::Duplicate { entity, .. }
            | BuildError::WanNetworkAbsent { entity, .. }
            | BuildError::Unallocated { entity, .. } => entity,
        }
    }

    /// Short machine-readable code used in validation reports.
    pub fn code(&self) -> &'static str {
        match self {
            BuildError::MissingField { .. } => "missing_field",
            BuildError::InvalidValue { .. } => "invalid_value",
            BuildError::UnknownWan { .. } => "unknown_wan_reference",
            BuildError::ReservedName { .. } => "reserved_name",
            BuildError::Duplicate { .. } => "duplicate_name",
            BuildError::WanNetworkAbsent { .. } => "wan_network_absent",
            BuildError::Unallocated { .. } => "unallocated_checkip",
        }
    }
}

/// Fail with [`BuildError::MissingField`] when `value` is blank.
pub fn require<'a>(
    entity: &EntityRef,
    field: &'static str,
    value: &'a str,
) -> Result<&'a str, BuildError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(BuildError::MissingField {
            entity: entity.clone(),
            field,
        });
    }
    Ok(trimmed)
}

/// Names already taken by earlier entities of the same kind.
#[derive(Debug, Default)]
pub struct NameClaims {
    seen: HashMap<String, EntityRef>,
}

impl NameClaims {
    /// Claim `key` for `entity`; fails when an earlier entity holds it.
    pub fn claim(
        &mut self,
        what: impl Into<String>,
        key: String,
        entity: &EntityRef,
    ) -> Result<(), BuildError> {
        if let Some(first) = self.seen.get(&key) {
            return Err(BuildError::Duplicate {
                entity: entity.clone(),
                what: what.into(),
                first: first.clone(),
            });
        }
        self.seen.insert(key, entity.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{require, BuildError, EntityKind, EntityRef, NameClaims};

    #[test]
    fn message_names_entity_and_field() {
        let entity = EntityRef::new(EntityKind::VpnClient, "home", 0).with_detail("L2TP");
        let err = require(&entity, "server", "  ").expect_err("blank should fail");
        assert_eq!(
            err.to_string(),
            "VPN client 'home' (L2TP): missing required field `server`"
        );
        assert!(matches!(err, BuildError::MissingField { .. }));
    }

    #[test]
    fn unnamed_entity_falls_back_to_position() {
        let entity = EntityRef::new(EntityKind::WanLink, "", 2);
        assert_eq!(entity.to_string(), "WAN link #3");
    }

    #[test]
    fn second_claim_names_the_first_holder() {
        let mut claims = NameClaims::default();
        let first = EntityRef::new(EntityKind::WanLink, "ISP-A", 0);
        let second = EntityRef::new(EntityKind::WanLink, "ISP-A ", 1);
        claims
            .claim("name 'ISP-A'", "ISP-A".to_string(), &first)
            .expect("first claim");
        let err = claims
            .claim("name 'ISP-A'", "ISP-A".to_string(), &second)
            .expect_err("taken");
        assert_eq!(
            err.to_string(),
            "WAN link 'ISP-A': name 'ISP-A' already used by WAN link 'ISP-A'"
        );
        assert_eq!(err.code(), "duplicate_name");
    }
}
