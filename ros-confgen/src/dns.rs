//! DNS forwarder groups.
//!
//! One named forwarder group per present network, queried through the same
//! CheckIP addresses that network's links probe. Groups are emitted in
//! [`NetworkKind::EMISSION_ORDER`]; other rules refer to them by name.

use ros_script::CommandDocument;
use tracing::debug;

use crate::checkip::CheckIpPlan;
use crate::command::CommandLine;
use crate::section::{IP_DNS, IP_DNS_FORWARDERS};
use crate::topology::{GeneratorOptions, NetworkKind, Networks};

/// Comma-joined `dns-servers` value of one network's group.
pub fn forwarder_servers(plan: &CheckIpPlan, kind: NetworkKind) -> String {
    plan.probes(kind)
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

/// Build the forwarder groups for every present network.
///
/// Nothing is emitted when no network is present. Otherwise the resolver is
/// also opened to LAN clients so the groups are reachable.
pub fn forwarders(networks: &Networks, plan: &CheckIpPlan, opts: &GeneratorOptions) -> CommandDocument {
    let mut doc = CommandDocument::new();
    for kind in NetworkKind::EMISSION_ORDER {
        if !networks.is_present(kind) {
            continue;
        }
        let servers = forwarder_servers(plan, kind);
        debug!(network = %kind, %servers, "DNS forwarder group");
        doc.push(
            IP_DNS_FORWARDERS,
            CommandLine::add()
                .comment(opts.comments, format!("{kind} resolvers"))
                .opt("name", kind.label())
                .opt("dns-servers", servers),
        );
    }
    if !doc.is_empty() {
        doc.push(
            IP_DNS,
            CommandLine::set(None).opt("allow-remote-requests", "yes"),
        );
    }
    doc
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::forwarders;
    use crate::checkip::{allocate, Counts, DOMESTIC_POOL, FOREIGN_POOL};
    use crate::section::{IP_DNS, IP_DNS_FORWARDERS};
    use crate::topology::{GeneratorOptions, Networks};

    fn quiet() -> GeneratorOptions {
        GeneratorOptions {
            comments: false,
            ..GeneratorOptions::default()
        }
    }

    #[test]
    fn vpn_without_clients_uses_the_fallback_probe() {
        let plan = allocate(Counts::default()).expect("allocate");
        let networks = Networks {
            vpn: true,
            ..Networks::default()
        };
        let doc = forwarders(&networks, &plan, &quiet());
        assert_eq!(
            doc.section(IP_DNS_FORWARDERS),
            Some(&[format!("add name=VPN dns-servers={}", FOREIGN_POOL[0])][..])
        );
        assert!(doc.section(IP_DNS).is_some());
    }

    #[test]
    fn groups_follow_vpn_domestic_foreign_order() {
        let plan = allocate(Counts {
            domestic: 2,
            foreign: 1,
            vpn: 1,
        })
        .expect("allocate");
        let networks = Networks {
            domestic: true,
            foreign: true,
            vpn: true,
        };
        let doc = forwarders(&networks, &plan, &quiet());
        assert_eq!(
            doc.section(IP_DNS_FORWARDERS),
            Some(
                &[
                    format!("add name=VPN dns-servers={}", FOREIGN_POOL[1]),
                    format!(
                        "add name=Domestic dns-servers={},{}",
                        DOMESTIC_POOL[0], DOMESTIC_POOL[1]
                    ),
                    format!("add name=Foreign dns-servers={}", FOREIGN_POOL[0]),
                ][..]
            )
        );
    }

    #[test]
    fn no_networks_means_no_dns_section() {
        let plan = allocate(Counts::default()).expect("allocate");
        assert!(forwarders(&Networks::default(), &plan, &quiet()).is_empty());
    }
}
