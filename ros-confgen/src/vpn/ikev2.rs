//! IKEv2 road-warrior client.
//!
//! IPsec in RouterOS is policy based, so there is no tunnel interface to
//! route into. An empty bridge stands in as the anchor: the base fragment
//! routes the CheckIP and the `to-VPN` default through it, and the template
//! policy installed by the identity catches that traffic in postrouting.

use ros_script::CommandDocument;

use super::ClientContext;
use crate::command::CommandLine;
use crate::error::BuildError;
use crate::naming::subnet_list;
use crate::section::{
    INTERFACE_BRIDGE, IPSEC_IDENTITY, IPSEC_MODE_CONFIG, IPSEC_PEER, IPSEC_POLICY,
    IPSEC_POLICY_GROUP, IPSEC_PROFILE, IPSEC_PROPOSAL,
};
use crate::topology::{Ikev2Client, NetworkKind};

pub fn build(config: &Ikev2Client, ctx: &ClientContext<'_>) -> Result<CommandDocument, BuildError> {
    let comments = ctx.opts.comments;
    let name = ctx.interface.as_str();

    let mut doc = CommandDocument::new();
    doc.push(
        INTERFACE_BRIDGE,
        CommandLine::add()
            .comment(comments, ctx.label("IKEv2 anchor"))
            .opt("name", name)
            .opt("protocol-mode", "none"),
    );
    doc.push(
        IPSEC_PROFILE,
        CommandLine::add()
            .opt("name", name)
            .opt("hash-algorithm", "sha256")
            .opt("enc-algorithm", "aes-256")
            .opt("dh-group", "modp2048"),
    );
    doc.push(
        IPSEC_PROPOSAL,
        CommandLine::add()
            .opt("name", name)
            .opt("auth-algorithms", "sha256")
            .opt("enc-algorithms", "aes-256-cbc")
            .opt("pfs-group", "none"),
    );
    doc.push(
        IPSEC_MODE_CONFIG,
        CommandLine::add()
            .opt("name", name)
            .opt("responder", "no")
            .opt("src-address-list", subnet_list(NetworkKind::Vpn)),
    );
    doc.push(IPSEC_POLICY_GROUP, CommandLine::add().opt("name", name));
    doc.push(
        IPSEC_PEER,
        CommandLine::add()
            .comment(comments, ctx.label("IKEv2"))
            .opt("name", name)
            .opt("address", config.server.trim())
            .opt("exchange-mode", "ike2")
            .opt("profile", name),
    );
    doc.push(
        IPSEC_POLICY,
        CommandLine::add()
            .opt("group", name)
            .opt("proposal", name)
            .opt("src-address", "0.0.0.0/0")
            .opt("dst-address", "0.0.0.0/0")
            .opt("template", "yes"),
    );
    doc.push(
        IPSEC_IDENTITY,
        CommandLine::add()
            .opt("peer", name)
            .opt("auth-method", "eap")
            .opt("eap-methods", "eap-mschapv2")
            .opt("username", config.user.trim())
            .opt("password", &config.password)
            .opt_some("certificate", config.certificate.as_deref().map(str::trim))
            .opt("mode-config", name)
            .opt("policy-template-group", name)
            .opt("generate-policy", "port-strict"),
    );
    Ok(doc)
}
