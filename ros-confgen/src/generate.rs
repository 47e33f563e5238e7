//! Top-level assembly of a RouterOS script from a topology.
//!
//! Fragments are folded in one fixed order: preamble, then each present
//! network in [`NetworkKind::EMISSION_ORDER`] (VPN, Domestic, Foreign), then
//! DNS forwarders, service settings and service mangle rules. Every builder
//! reads its CheckIP addresses from the single [`CheckIpPlan`] computed
//! here, after pruning, so all of them agree on the counts.

use std::borrow::Cow;

use ros_script::{merge_many, shorten, CommandDocument};
use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::checkip::{plan_for, AllocationError, CheckIpPlan};
use crate::command::CommandLine;
use crate::error::{BuildError, EntityRef, NameClaims};
use crate::naming::network_routing_table;
use crate::section::{self, INTERFACE_LIST, NAT, ROUTING_TABLE};
use crate::topology::{
    GeneratorOptions, InvalidPolicy, NetworkKind, Topology, WanCategory, WanLinks,
};
use crate::validate::issue_code;
use crate::wan::WAN_LIST;
use crate::{dns, services, subnets, vpn, wan};

#[derive(Debug, Error)]
pub enum GenerateError {
    #[error(transparent)]
    Build(#[from] BuildError),
    #[error(transparent)]
    Allocation(#[from] AllocationError),
}

/// An entity left out of the script in skip mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedEntity {
    pub entity: EntityRef,
    pub code: &'static str,
    pub reason: String,
}

impl From<BuildError> for SkippedEntity {
    fn from(err: BuildError) -> Self {
        Self {
            entity: err.entity().clone(),
            code: issue_code(&err),
            reason: err.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Generation {
    pub document: CommandDocument,
    pub skipped: Vec<SkippedEntity>,
    /// CheckIP assignment every builder used.
    pub plan: CheckIpPlan,
}

/// Generate with the options carried in the topology itself.
pub fn generate(topology: &Topology) -> Result<Generation, GenerateError> {
    generate_with(topology, &topology.options)
}

/// Generate with explicit options, ignoring `topology.options`.
pub fn generate_with(
    topology: &Topology,
    opts: &GeneratorOptions,
) -> Result<Generation, GenerateError> {
    let (working, skipped) = match opts.on_invalid {
        InvalidPolicy::Abort => {
            topology.check_cross_references()?;
            (Cow::Borrowed(topology), Vec::new())
        }
        InvalidPolicy::Skip => {
            let (pruned, skipped) = prune_invalid(topology);
            (Cow::Owned(pruned), skipped)
        }
    };
    let working = working.as_ref();
    let plan = plan_for(working)?;
    let wan_names = working.wan.names();

    let mut fragments = vec![preamble(opts)];
    for kind in NetworkKind::EMISSION_ORDER {
        if !working.networks.is_present(kind) {
            continue;
        }
        let members = match kind {
            NetworkKind::Vpn => vpn::clients_wrapper(&working.vpn, &plan, &wan_names, opts)?,
            NetworkKind::Domestic => {
                wan::links_wrapper(&working.wan.domestic, WanCategory::Domestic, &plan, opts)?
            }
            NetworkKind::Foreign => {
                wan::links_wrapper(&working.wan.foreign, WanCategory::Foreign, &plan, opts)?
            }
        };
        fragments.push(network_table(kind, opts));
        fragments.push(members);
        fragments.push(subnets::network_subnets(&working.subnets, kind, opts)?);
    }
    fragments.push(dns::forwarders(&working.networks, &plan, opts));
    fragments.push(services::service_settings(&working.services));
    if working.networks.domestic {
        fragments.push(services::mangle_rules(
            &working.wan.domestic,
            &working.services,
            opts,
        ));
    }

    let mut document = merge_many(fragments);
    document.remove_empty_sections();
    if opts.shorten {
        document = shorten(&document);
    }

    let counts = plan.counts();
    info!(
        sections = document.section_count(),
        lines = document.line_count(),
        domestic = counts.domestic,
        foreign = counts.foreign,
        vpn = counts.vpn,
        skipped = skipped.len(),
        "generated script"
    );
    Ok(Generation {
        document,
        skipped,
        plan,
    })
}

/// Drop invalid WAN links, then VPN clients (against the surviving links),
/// then subnets. Of two entities claiming the same name the later one goes.
/// Counts are taken from the result.
pub fn prune_invalid(topology: &Topology) -> (Topology, Vec<SkippedEntity>) {
    let mut skipped = Vec::new();
    let mut names = NameClaims::default();
    let mut keep_links = |category: WanCategory| {
        topology
            .wan
            .links(category)
            .iter()
            .enumerate()
            .filter_map(|(index, link)| {
                match link
                    .validate(category, index)
                    .and_then(|()| link.claim_name(&mut names, category, index))
                {
                    Ok(()) => Some(link.clone()),
                    Err(err) => {
                        skipped.push(SkippedEntity::from(err));
                        None
                    }
                }
            })
            .collect::<Vec<_>>()
    };
    let wan = WanLinks {
        domestic: keep_links(WanCategory::Domestic),
        foreign: keep_links(WanCategory::Foreign),
    };

    let wan_names = wan.names();
    let mut interfaces = NameClaims::default();
    let vpn = topology
        .vpn
        .iter()
        .enumerate()
        .filter_map(|(index, client)| {
            let checked = client
                .validate(index, &wan_names)
                .and_then(|()| client.check_egress(index, &wan, &topology.networks))
                .and_then(|()| client.claim_interface(&mut interfaces, index));
            match checked {
                Ok(()) => Some(client.clone()),
                Err(err) => {
                    skipped.push(SkippedEntity::from(err));
                    None
                }
            }
        })
        .collect();
    let subnets = topology
        .subnets
        .iter()
        .enumerate()
        .filter_map(|(index, subnet)| match subnet.validate(index) {
            Ok(()) => Some(subnet.clone()),
            Err(err) => {
                skipped.push(SkippedEntity::from(err));
                None
            }
        })
        .collect();

    for entry in &skipped {
        warn!(entity = %entry.entity, code = entry.code, "skipping invalid entity: {}", entry.reason);
    }
    let pruned = Topology {
        wan,
        vpn,
        subnets,
        ..topology.clone()
    };
    (pruned, skipped)
}

fn preamble(opts: &GeneratorOptions) -> CommandDocument {
    let mut doc = CommandDocument::new();
    for key in section::EMISSION_ORDER {
        doc.declare(*key);
    }
    doc.push(INTERFACE_LIST, CommandLine::add().opt("name", WAN_LIST));
    doc.push(
        NAT,
        CommandLine::add()
            .comment(opts.comments, "Masquerade out of every WAN")
            .opt("chain", "srcnat")
            .opt("out-interface-list", WAN_LIST)
            .opt("action", "masquerade"),
    );
    doc
}

fn network_table(kind: NetworkKind, opts: &GeneratorOptions) -> CommandDocument {
    let mut doc = CommandDocument::new();
    doc.push(
        ROUTING_TABLE,
        CommandLine::add()
            .comment(opts.comments, format!("{kind} network"))
            .opt("name", network_routing_table(kind))
            .flag("fib"),
    );
    doc
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::{generate, generate_with, GenerateError};
    use crate::checkip::{DOMESTIC_POOL, FOREIGN_POOL};
    use crate::section::{
        INTERFACE_L2TP_CLIENT, INTERFACE_LIST_MEMBER, IP_DNS_FORWARDERS, IP_ROUTE, MANGLE,
        ROUTING_TABLE,
    };
    use crate::topology::{parse_topology, GeneratorOptions, InvalidPolicy, TopologyFormat};

    const TOPOLOGY: &str = r#"
[networks]
domestic = true
foreign = true
vpn = true

[[wan.domestic]]
name = "ISP-A"
interface = "ether1"
gateway = "192.0.2.1"

[[wan.domestic]]
name = "ISP-B"
interface = "ether2"

[[wan.foreign]]
name = "Uplink"
interface = "ether3"

[[vpn]]
protocol = "l2tp"
name = "home"
wan = "Uplink"
server = "vpn.example.net"
user = "alice"
password = "pw"

[[vpn]]
protocol = "sstp"
name = "work"
wan = "ISP-A"
server = "sstp.example.net"
user = "bob"
password = "pw"

[services]
ssh = { enabled = true, port = 2222 }

[options]
comments = false
"#;

    fn topology(raw: &str) -> crate::topology::Topology {
        parse_topology(raw, TopologyFormat::Toml, "inline".to_string()).expect("parse")
    }

    #[test]
    fn network_blocks_are_folded_vpn_domestic_foreign() {
        let generation = generate(&topology(TOPOLOGY)).expect("generate");
        let tables = generation.document.section(ROUTING_TABLE).expect("tables");
        let names: Vec<_> = tables
            .iter()
            .map(|l| l.split_whitespace().nth(1).unwrap_or_default())
            .collect();
        assert_eq!(
            names,
            vec![
                "name=to-VPN",
                "name=to-Domestic",
                "name=to-ISP-A",
                "name=to-ISP-B",
                "name=to-Foreign",
                "name=to-Uplink",
            ]
        );
        let routes = generation.document.section(IP_ROUTE).expect("routes");
        assert!(routes[0].contains(&format!("dst-address={}/32", FOREIGN_POOL[1])));
        assert!(routes[0].contains("gateway=L2TP-home"));
    }

    #[test]
    fn dns_and_mangle_agree_on_the_domestic_slice() {
        let generation = generate(&topology(TOPOLOGY)).expect("generate");
        let doc = &generation.document;
        let expected = format!(
            "add name=Domestic dns-servers={},{}",
            DOMESTIC_POOL[0], DOMESTIC_POOL[1]
        );
        assert!(doc.contains_line(IP_DNS_FORWARDERS, &expected));
        assert_eq!(generation.plan.domestic(), &DOMESTIC_POOL[..2]);
        for (ip, hop) in generation.plan.domestic().iter().zip(["192.0.2.1", "ether2"]) {
            let line = format!("add dst-address={ip}/32 gateway={hop} scope=10");
            assert!(doc.contains_line(IP_ROUTE, &line), "missing {line}");
        }
        let mangle = doc.section(MANGLE).expect("mangle");
        assert!(mangle.iter().any(|r| r.contains("new-connection-mark=conn-ISP-A")));
        assert!(mangle.iter().any(|r| r.contains("new-connection-mark=conn-ISP-B")));
    }

    #[test]
    fn abort_mode_fails_on_first_invalid_client() {
        let raw = TOPOLOGY.replace("server = \"vpn.example.net\"", "server = \"\"");
        let err = generate(&topology(&raw)).expect_err("empty server");
        match err {
            GenerateError::Build(build) => assert_eq!(build.entity().name, "home"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn skip_mode_prunes_before_counting() {
        let raw = TOPOLOGY.replace("server = \"vpn.example.net\"", "server = \"\"");
        let topo = topology(&raw);
        let opts = GeneratorOptions {
            on_invalid: InvalidPolicy::Skip,
            ..topo.options
        };
        let generation = generate_with(&topo, &opts).expect("skip invalid");
        assert_eq!(generation.skipped.len(), 1);
        assert_eq!(generation.plan.counts().vpn, 1);
        // the surviving client takes the first VPN address
        assert_eq!(generation.plan.for_vpn(0), Some(FOREIGN_POOL[1]));
        let routes = generation.document.section(IP_ROUTE).expect("routes");
        assert!(routes[0].contains("gateway=SSTP-work"));
    }

    #[test]
    fn absent_networks_emit_nothing() {
        let generation = generate(&topology("[options]\ncomments = false\n")).expect("generate");
        let keys: Vec<_> = generation.document.keys().collect();
        assert_eq!(keys, vec!["/interface list", "/ip firewall nat"]);
    }

    const CLASHING: &str = r#"
[networks]
domestic = true
vpn = true

[[wan.domestic]]
name = "VPN"
interface = "ether1"

[[wan.domestic]]
name = "ISP-A"
interface = "ether2"

[[wan.domestic]]
name = "ISP-A"
interface = "ether3"

[[vpn]]
protocol = "l2tp"
name = "home"
wan = "ISP-A"
server = "vpn.example.net"
user = "alice"
password = "pw"

[[vpn]]
protocol = "l2tp"
name = "home "
wan = "ISP-A"
server = "vpn2.example.net"
user = "alice"
password = "pw"

[options]
comments = false
"#;

    fn build_code(err: GenerateError) -> &'static str {
        match err {
            GenerateError::Build(build) => build.code(),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn duplicate_tunnel_interfaces_abort() {
        let raw = CLASHING
            .replace("name = \"VPN\"", "name = \"ISP-0\"")
            .replace("name = \"ISP-A\"\ninterface = \"ether3\"", "name = \"ISP-C\"\ninterface = \"ether3\"");
        let err = generate(&topology(&raw)).expect_err("home and 'home ' share L2TP-home");
        assert_eq!(build_code(err), "duplicate_name");
    }

    #[test]
    fn duplicate_link_names_abort() {
        let raw = CLASHING.replace("name = \"VPN\"", "name = \"ISP-0\"");
        let err = generate(&topology(&raw)).expect_err("ISP-A twice");
        match err {
            GenerateError::Build(build) => {
                assert_eq!(build.code(), "duplicate_name");
                assert_eq!(build.entity().index, 2);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn reserved_link_name_aborts() {
        let raw = CLASHING
            .replace("name = \"ISP-A\"\ninterface = \"ether3\"", "name = \"ISP-C\"\ninterface = \"ether3\"")
            .replace("name = \"home \"", "name = \"work\"");
        let err = generate(&topology(&raw)).expect_err("link named VPN");
        assert_eq!(build_code(err), "reserved_name");
    }

    #[test]
    fn skip_mode_keeps_the_first_of_each_name() {
        let topo = topology(CLASHING);
        let opts = GeneratorOptions {
            on_invalid: InvalidPolicy::Skip,
            ..topo.options
        };
        let generation = generate_with(&topo, &opts).expect("skip invalid");
        let codes: Vec<_> = generation.skipped.iter().map(|s| s.code).collect();
        assert_eq!(codes, vec!["reserved_name", "duplicate_name", "duplicate_name"]);

        let doc = &generation.document;
        assert_eq!(
            doc.section(ROUTING_TABLE).expect("tables"),
            &["add name=to-VPN fib", "add name=to-Domestic fib", "add name=to-ISP-A fib"]
        );
        let tunnels = doc.section(INTERFACE_L2TP_CLIENT).expect("l2tp");
        assert_eq!(tunnels.len(), 1);
        assert!(tunnels[0].contains("connect-to=vpn.example.net"));
        assert!(doc.contains_line(
            INTERFACE_LIST_MEMBER,
            "add interface=ether2 list=WAN"
        ));
        assert!(!doc
            .section(INTERFACE_LIST_MEMBER)
            .expect("members")
            .iter()
            .any(|l| l.contains("ether3") || l.contains("ether1")));
    }

    const ABSENT_EGRESS: &str = r#"
[networks]
vpn = true

[[wan.foreign]]
name = "T"
interface = "ether3"

[[vpn]]
protocol = "pptp"
name = "w"
wan = "T"
server = "pptp.example.net"
user = "bob"
password = "pw"

[options]
comments = false
"#;

    #[test]
    fn vpn_egress_through_absent_network_aborts() {
        let err = generate(&topology(ABSENT_EGRESS)).expect_err("to-T is never emitted");
        assert_eq!(build_code(err), "wan_network_absent");
    }

    #[test]
    fn vpn_egress_through_absent_network_is_skipped() {
        let topo = topology(ABSENT_EGRESS);
        let opts = GeneratorOptions {
            on_invalid: InvalidPolicy::Skip,
            ..topo.options
        };
        let generation = generate_with(&topo, &opts).expect("skip invalid");
        assert_eq!(generation.skipped[0].code, "wan_network_absent");
        assert_eq!(generation.plan.counts().vpn, 0);
        let doc = &generation.document;
        assert!(doc.section(MANGLE).is_none());
        assert_eq!(
            doc.section(ROUTING_TABLE).expect("tables"),
            &["add name=to-VPN fib"]
        );
    }
}

