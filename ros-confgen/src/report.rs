use colored::Colorize;
use ros_script::{format_summary, format_text, SectionDiff};
use serde::Serialize;

use crate::checkip::{CheckIpPlan, Counts};
use crate::dns::forwarder_servers;
use crate::generate::Generation;
use crate::naming::interface_name;
use crate::topology::{NetworkKind, Topology, WanCategory};
use crate::validate::{Severity, ValidationReport};

/// One CheckIP assignment, for tables and JSON output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckIpRow {
    pub network: NetworkKind,
    /// WAN link name, or tunnel interface name for VPN clients.
    pub member: String,
    pub address: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ForwarderRow {
    pub network: NetworkKind,
    pub servers: String,
    pub fallback: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckIpReport {
    pub counts: Counts,
    pub assignments: Vec<CheckIpRow>,
    pub forwarders: Vec<ForwarderRow>,
}

/// Pair every member of `topology` with its address from `plan`.
///
/// `plan` must have been computed from `topology`.
pub fn checkip_report(plan: &CheckIpPlan, topology: &Topology) -> CheckIpReport {
    let mut assignments = Vec::new();
    for (index, client) in topology.vpn.iter().enumerate() {
        if let Some(ip) = plan.for_vpn(index) {
            assignments.push(CheckIpRow {
                network: NetworkKind::Vpn,
                member: interface_name(client.name(), client.protocol().tag()),
                address: ip.to_string(),
            });
        }
    }
    for category in [WanCategory::Domestic, WanCategory::Foreign] {
        for (index, link) in topology.wan.links(category).iter().enumerate() {
            if let Some(ip) = plan.for_wan(category, index) {
                assignments.push(CheckIpRow {
                    network: category.network(),
                    member: link.name.trim().to_string(),
                    address: ip.to_string(),
                });
            }
        }
    }

    let forwarders = NetworkKind::EMISSION_ORDER
        .into_iter()
        .filter(|kind| topology.networks.is_present(*kind))
        .map(|kind| ForwarderRow {
            network: kind,
            servers: forwarder_servers(plan, kind),
            fallback: plan.assigned(kind).is_empty(),
        })
        .collect();

    CheckIpReport {
        counts: plan.counts(),
        assignments,
        forwarders,
    }
}

/// Render the CheckIP allocation as an aligned table.
pub fn render_checkip_table(report: &CheckIpReport) -> String {
    let mut out = Vec::new();
    out.push(
        format!(
            "checkip domestic={} foreign={} vpn={}",
            report.counts.domestic, report.counts.foreign, report.counts.vpn
        )
        .cyan()
        .to_string(),
    );
    let width = report
        .assignments
        .iter()
        .map(|row| row.member.len())
        .max()
        .unwrap_or(0);
    out.push("assignments".to_string());
    if report.assignments.is_empty() {
        out.push("- none".to_string());
    }
    for row in &report.assignments {
        out.push(format!(
            "- {:<8} {:<width$} {}",
            row.network.label(),
            row.member,
            row.address.green()
        ));
    }
    out.push("forwarders".to_string());
    if report.forwarders.is_empty() {
        out.push("- none".to_string());
    }
    for row in &report.forwarders {
        let note = if row.fallback {
            " (fallback)".yellow().to_string()
        } else {
            String::new()
        };
        out.push(format!("- {:<8} {}{note}", row.network.label(), row.servers));
    }
    out.join("\n")
}

/// One-screen summary of a generation run.
pub fn render_generation_summary(generation: &Generation) -> String {
    let counts = generation.plan.counts();
    let mut out = vec![format!(
        "generated sections={} lines={} domestic={} foreign={} vpn={} skipped={}",
        generation.document.section_count(),
        generation.document.line_count(),
        counts.domestic,
        counts.foreign,
        counts.vpn,
        generation.skipped.len()
    )
    .cyan()
    .to_string()];
    for (section, lines) in generation.document.sections() {
        out.push(format!("- {section} ({} lines)", lines.len()));
    }
    for skipped in &generation.skipped {
        out.push(
            format!("! skipped {}: {}", skipped.code, skipped.reason)
                .yellow()
                .to_string(),
        );
    }
    out.join("\n")
}

/// Render a validation report, one issue per line.
pub fn render_validation(report: &ValidationReport) -> String {
    let mut out = Vec::new();
    let result = format!(
        "result errors={} warnings={}",
        report.errors, report.warnings
    );
    out.push(if report.has_errors() {
        result.red().to_string()
    } else {
        result.green().to_string()
    });
    out.push("issues".to_string());
    if report.is_clean() {
        out.push("- none".to_string());
        return out.join("\n");
    }
    for issue in &report.issues {
        let line = match issue.severity {
            Severity::Error => format!("- [error] {}: {}", issue.code, issue.message).red(),
            Severity::Warning => format!("- [warning] {}: {}", issue.code, issue.message).yellow(),
        };
        out.push(line.to_string());
    }
    out.join("\n")
}

/// Render section diffs for terminal output.
pub fn render_diff(entries: &[SectionDiff]) -> String {
    let raw = format_text(entries);
    let mut out = Vec::new();

    for line in raw.lines() {
        let colored = if line.starts_with('+') {
            line.green().to_string()
        } else if line.starts_with('-') {
            line.red().to_string()
        } else if line.starts_with('~') {
            line.yellow().to_string()
        } else {
            line.to_string()
        };
        out.push(colored);
    }

    out.join("\n")
}

/// Render diff summary counts for terminal output.
pub fn render_diff_summary(entries: &[SectionDiff]) -> String {
    format_summary(entries).cyan().to_string()
}

#[cfg(test)]
mod tests {
    use super::{checkip_report, render_checkip_table, render_validation};
    use crate::checkip::{plan_for, FOREIGN_POOL};
    use crate::topology::{parse_topology, NetworkKind, TopologyFormat};
    use crate::validate::ValidationReport;

    #[test]
    fn report_lists_vpn_members_by_interface_name() {
        colored::control::set_override(false);
        let raw = r#"
[networks]
vpn = true
foreign = true

[[wan.foreign]]
name = "Uplink"
interface = "ether1"

[[vpn]]
protocol = "pptp"
name = "work"
wan = "Uplink"
"#;
        let topology =
            parse_topology(raw, TopologyFormat::Toml, "inline".to_string()).expect("parse");
        let plan = plan_for(&topology).expect("plan");
        let report = checkip_report(&plan, &topology);
        assert_eq!(report.assignments[0].network, NetworkKind::Vpn);
        assert_eq!(report.assignments[0].member, "PPTP-work");
        assert_eq!(report.assignments[0].address, FOREIGN_POOL[1].to_string());
        assert!(!report.forwarders[0].fallback);

        let table = render_checkip_table(&report);
        assert!(table.starts_with("checkip domestic=0 foreign=1 vpn=1"));
        assert!(table.contains("- VPN      PPTP-work 8.8.8.8"));
    }

    #[test]
    fn clean_report_says_none() {
        colored::control::set_override(false);
        let text = render_validation(&ValidationReport::default());
        assert_eq!(text, "result errors=0 warnings=0\nissues\n- none");
    }
}
