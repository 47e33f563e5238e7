//! WAN uplink fragments.
//!
//! Each link gets its own routing table and a CheckIP host route pinned to
//! the link's next hop. Recursive default routes through that CheckIP land
//! in both the network table (`to-Domestic` / `to-Foreign`) and the link's
//! own table, so `check-gateway=ping` fails a link over as soon as its probe
//! stops answering.

use ros_script::{merge_many, CommandDocument};
use tracing::debug;

use crate::checkip::CheckIpPlan;
use crate::command::CommandLine;
use crate::error::BuildError;
use crate::naming::{link_routing_table, network_routing_table};
use crate::section::{INTERFACE_LIST_MEMBER, IP_ROUTE, ROUTING_TABLE};
use crate::topology::{GeneratorOptions, WanCategory, WanLink};

/// Interface list every uplink and tunnel joins; NAT masquerades out of it.
pub const WAN_LIST: &str = "WAN";

/// Build the fragment for the link at `index` of its category.
pub fn build_link(
    link: &WanLink,
    category: WanCategory,
    index: usize,
    plan: &CheckIpPlan,
    opts: &GeneratorOptions,
) -> Result<CommandDocument, BuildError> {
    link.validate(category, index)?;
    let checkip = plan
        .for_wan(category, index)
        .ok_or_else(|| BuildError::Unallocated {
            entity: link.entity(category, index),
            index,
        })?;

    let name = link.name.trim();
    let interface = link.interface.trim();
    let next_hop = link
        .gateway
        .as_deref()
        .map(str::trim)
        .unwrap_or(interface);
    let link_table = link_routing_table(name);
    let network_table = network_routing_table(category.network());

    let mut doc = CommandDocument::new();
    doc.push(
        ROUTING_TABLE,
        CommandLine::add()
            .comment(opts.comments, format!("WAN {name}"))
            .opt("name", &link_table)
            .flag("fib"),
    );
    doc.push(
        INTERFACE_LIST_MEMBER,
        CommandLine::add()
            .comment(opts.comments, format!("{category} WAN {name}"))
            .opt("interface", interface)
            .opt("list", WAN_LIST),
    );
    doc.push(
        IP_ROUTE,
        CommandLine::add()
            .comment(opts.comments, format!("CheckIP {name}"))
            .opt("dst-address", format!("{checkip}/32"))
            .opt("gateway", next_hop)
            .opt("scope", 10),
    );
    doc.push(
        IP_ROUTE,
        CommandLine::add()
            .comment(opts.comments, format!("{category} via {name}"))
            .opt("dst-address", "0.0.0.0/0")
            .opt("gateway", checkip)
            .opt("routing-table", &network_table)
            .opt("target-scope", 11)
            .opt("check-gateway", "ping")
            .opt("distance", index + 1),
    );
    doc.push(
        IP_ROUTE,
        CommandLine::add()
            .comment(opts.comments, format!("{name} only"))
            .opt("dst-address", "0.0.0.0/0")
            .opt("gateway", checkip)
            .opt("routing-table", &link_table)
            .opt("target-scope", 11)
            .opt("check-gateway", "ping"),
    );

    debug!(link = name, %category, %checkip, "built WAN link fragment");
    Ok(doc)
}

/// Build every link of `category` in input order and fold the fragments.
pub fn links_wrapper(
    links: &[WanLink],
    category: WanCategory,
    plan: &CheckIpPlan,
    opts: &GeneratorOptions,
) -> Result<CommandDocument, BuildError> {
    let fragments = links
        .iter()
        .enumerate()
        .map(|(index, link)| build_link(link, category, index, plan, opts))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(merge_many(fragments))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::{build_link, links_wrapper};
    use crate::checkip::{allocate, Counts, DOMESTIC_POOL};
    use crate::error::BuildError;
    use crate::section::{IP_ROUTE, ROUTING_TABLE};
    use crate::topology::{GeneratorOptions, WanCategory, WanLink};

    fn link(name: &str, interface: &str, gateway: Option<&str>) -> WanLink {
        WanLink {
            name: name.to_string(),
            interface: interface.to_string(),
            gateway: gateway.map(str::to_string),
        }
    }

    fn quiet() -> GeneratorOptions {
        GeneratorOptions {
            comments: false,
            ..GeneratorOptions::default()
        }
    }

    #[test]
    fn second_domestic_link_gets_second_probe_and_distance() {
        let plan = allocate(Counts {
            domestic: 2,
            ..Counts::default()
        })
        .expect("allocate");
        let links = [
            link("ISP-A", "ether1", Some("192.0.2.1")),
            link("ISP-B", "pppoe-out1", None),
        ];
        let doc = links_wrapper(&links, WanCategory::Domestic, &plan, &quiet()).expect("build");

        let routes = doc.section(IP_ROUTE).expect("routes");
        assert_eq!(routes.len(), 6);
        assert_eq!(
            routes[3],
            format!(
                "add dst-address={}/32 gateway=pppoe-out1 scope=10",
                DOMESTIC_POOL[1]
            )
        );
        assert_eq!(
            routes[4],
            format!(
                "add dst-address=0.0.0.0/0 gateway={} routing-table=to-Domestic target-scope=11 check-gateway=ping distance=2",
                DOMESTIC_POOL[1]
            )
        );
        assert_eq!(
            doc.section(ROUTING_TABLE),
            Some(&["add name=to-ISP-A fib".to_string(), "add name=to-ISP-B fib".to_string()][..])
        );
    }

    #[test]
    fn link_beyond_plan_is_reported() {
        let plan = allocate(Counts::default()).expect("allocate");
        let err = build_link(
            &link("ISP-A", "ether1", None),
            WanCategory::Foreign,
            0,
            &plan,
            &quiet(),
        )
        .expect_err("no address allocated");
        assert!(matches!(err, BuildError::Unallocated { index: 0, .. }));
    }
}
