use ros_script::CommandDocument;

use super::ClientContext;
use crate::command::CommandLine;
use crate::error::BuildError;
use crate::section::INTERFACE_OVPN_CLIENT;
use crate::topology::{OpenVpnClient, OvpnTransport};

const DEFAULT_PORT: u16 = 1194;

pub fn build(config: &OpenVpnClient, ctx: &ClientContext<'_>) -> Result<CommandDocument, BuildError> {
    let protocol = match config.transport {
        OvpnTransport::Tcp => "tcp",
        OvpnTransport::Udp => "udp",
    };
    let user = Some(config.user.trim()).filter(|u| !u.is_empty());
    let password = Some(config.password.as_str()).filter(|p| !p.is_empty());

    let mut doc = CommandDocument::new();
    doc.push(
        INTERFACE_OVPN_CLIENT,
        CommandLine::add()
            .comment(ctx.opts.comments, ctx.label("OpenVPN"))
            .opt("name", &ctx.interface)
            .opt("connect-to", config.server.trim())
            .opt("port", config.port.unwrap_or(DEFAULT_PORT))
            .opt("protocol", protocol)
            .opt("mode", "ip")
            .opt_some("user", user)
            .opt_some("password", password)
            .opt_some("certificate", config.certificate.as_deref().map(str::trim))
            .opt_some("cipher", config.cipher.as_deref().map(str::trim))
            .opt_some("auth", config.auth.as_deref().map(str::trim))
            .opt("add-default-route", "no")
            .opt("disabled", "no"),
    );
    Ok(doc)
}
