//! LAN subnet steering.
//!
//! Subnets assigned to a network are collected in its `{Kind}-LAN` address
//! list. One prerouting rule per network sends their non-local traffic into
//! the network's routing table.

use ros_script::CommandDocument;
use tracing::debug;

use crate::command::CommandLine;
use crate::error::BuildError;
use crate::naming::{network_routing_table, subnet_list};
use crate::section::{ADDRESS_LIST, MANGLE};
use crate::topology::{GeneratorOptions, NetworkKind, Subnet};

/// Build the steering fragment for the subnets of `kind`.
///
/// Subnets are validated with their position in the full input list.
pub fn network_subnets(
    subnets: &[Subnet],
    kind: NetworkKind,
    opts: &GeneratorOptions,
) -> Result<CommandDocument, BuildError> {
    let list = subnet_list(kind);
    let mut doc = CommandDocument::new();
    for (index, subnet) in subnets.iter().enumerate() {
        if subnet.network != kind {
            continue;
        }
        subnet.validate(index)?;
        let label = match subnet.name.trim() {
            "" => subnet.address.trim().to_string(),
            name => name.to_string(),
        };
        doc.push(
            ADDRESS_LIST,
            CommandLine::add()
                .comment(opts.comments, format!("{kind} subnet {label}"))
                .opt("list", &list)
                .opt("address", subnet.address.trim()),
        );
    }
    if doc.is_empty() {
        return Ok(doc);
    }

    doc.push(
        MANGLE,
        CommandLine::add()
            .comment(opts.comments, format!("Steer {list}"))
            .opt("chain", "prerouting")
            .opt("src-address-list", &list)
            .opt("dst-address-type", "!local")
            .opt("action", "mark-routing")
            .opt("new-routing-mark", network_routing_table(kind))
            .opt("passthrough", "no"),
    );
    debug!(network = %kind, list = %list, "built subnet steering");
    Ok(doc)
}
