//! Whole-topology validation.
//!
//! Builders stop at the first invalid entity. The report collects every
//! problem at once, plus warnings about topologies that generate fine but
//! probably do not do what their author meant.

use serde::Serialize;

use crate::checkip::{allocate, Counts};
use crate::error::{BuildError, EntityRef, NameClaims};
use crate::topology::{NetworkKind, Topology, WanCategory};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationIssue {
    pub severity: Severity,
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity: Option<EntityRef>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub errors: usize,
    pub warnings: usize,
    pub issues: Vec<ValidationIssue>,
}

impl ValidationReport {
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn has_errors(&self) -> bool {
        self.errors > 0
    }
}

/// Report code for a builder failure.
pub fn issue_code(err: &BuildError) -> &'static str {
    match err {
        BuildError::InvalidValue { field: "port", .. } => "invalid_port",
        BuildError::InvalidValue { .. } => "invalid_address",
        other => other.code(),
    }
}

pub fn validate_topology(topology: &Topology) -> ValidationReport {
    let mut issues = Vec::new();
    issues.extend(wan_issues(topology));
    issues.extend(vpn_issues(topology));
    issues.extend(subnet_issues(topology));
    issues.extend(service_issues(topology));
    issues.extend(presence_issues(topology));
    if let Err(err) = allocate(Counts::of(topology)) {
        issues.push(err_issue("pool_exhausted", err.to_string(), None));
    }

    let errors = issues
        .iter()
        .filter(|i| i.severity == Severity::Error)
        .count();
    let warnings = issues.len() - errors;
    ValidationReport {
        errors,
        warnings,
        issues,
    }
}

fn wan_issues(topology: &Topology) -> Vec<ValidationIssue> {
    let mut out = Vec::new();
    let mut names = NameClaims::default();
    for category in [WanCategory::Domestic, WanCategory::Foreign] {
        for (index, link) in topology.wan.links(category).iter().enumerate() {
            if let Err(err) = link.validate(category, index) {
                out.push(from_build_error(&err));
            }
            if let Err(err) = link.claim_name(&mut names, category, index) {
                out.push(from_build_error(&err));
            }
        }
    }
    out
}

fn vpn_issues(topology: &Topology) -> Vec<ValidationIssue> {
    let wan_names = topology.wan.names();
    let mut out = Vec::new();
    let mut interfaces = NameClaims::default();
    for (index, client) in topology.vpn.iter().enumerate() {
        let checked = client
            .validate(index, &wan_names)
            .and_then(|()| client.check_egress(index, &topology.wan, &topology.networks))
            .and_then(|()| client.claim_interface(&mut interfaces, index));
        if let Err(err) = checked {
            out.push(from_build_error(&err));
        }
    }
    out
}

fn subnet_issues(topology: &Topology) -> Vec<ValidationIssue> {
    let mut out = Vec::new();
    for (index, subnet) in topology.subnets.iter().enumerate() {
        if let Err(err) = subnet.validate(index) {
            out.push(from_build_error(&err));
            continue;
        }
        if !topology.networks.is_present(subnet.network) {
            let entity = subnet.entity(index);
            out.push(warn_issue(
                "subnet_network_absent",
                format!(
                    "{entity}: network {} is not present, subnet will not be steered",
                    subnet.network
                ),
                Some(entity),
            ));
        }
    }
    out
}

fn service_issues(topology: &Topology) -> Vec<ValidationIssue> {
    let mut out = Vec::new();
    for (key, setting) in &topology.services {
        if setting.port == Some(0) {
            out.push(err_issue(
                "invalid_port",
                format!("service '{key}': port must be between 1 and 65535"),
                None,
            ));
        } else if setting.enabled && setting.port.is_none() {
            out.push(warn_issue(
                "service_without_port",
                format!("service '{key}' is enabled without a custom port and will not be pinned to its WAN link"),
                None,
            ));
        }
    }
    out
}

fn presence_issues(topology: &Topology) -> Vec<ValidationIssue> {
    let networks = &topology.networks;
    let member_counts = [
        (NetworkKind::Vpn, topology.vpn.len()),
        (NetworkKind::Domestic, topology.wan.domestic.len()),
        (NetworkKind::Foreign, topology.wan.foreign.len()),
    ];
    let mut out = Vec::new();
    for (kind, members) in member_counts {
        let present = networks.is_present(kind);
        if present && members == 0 {
            out.push(warn_issue(
                "network_without_links",
                format!("network {kind} is present but has no links; its DNS group uses the fallback resolver"),
                None,
            ));
        }
        if !present && members > 0 {
            out.push(warn_issue(
                "links_without_network",
                format!("{members} link(s) configured for network {kind}, which is not present"),
                None,
            ));
        }
    }
    out
}

fn from_build_error(err: &BuildError) -> ValidationIssue {
    err_issue(issue_code(err), err.to_string(), Some(err.entity().clone()))
}

fn err_issue(code: &str, message: String, entity: Option<EntityRef>) -> ValidationIssue {
    ValidationIssue {
        severity: Severity::Error,
        code: code.to_string(),
        message,
        entity,
    }
}

fn warn_issue(code: &str, message: String, entity: Option<EntityRef>) -> ValidationIssue {
    ValidationIssue {
        severity: Severity::Warning,
        code: code.to_string(),
        message,
        entity,
    }
}
