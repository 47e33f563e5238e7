use ros_script::CommandDocument;

use super::common::yes_no;
use super::ClientContext;
use crate::command::CommandLine;
use crate::error::BuildError;
use crate::section::INTERFACE_SSTP_CLIENT;
use crate::topology::SstpClient;

const DEFAULT_PORT: u16 = 443;

pub fn build(config: &SstpClient, ctx: &ClientContext<'_>) -> Result<CommandDocument, BuildError> {
    let mut doc = CommandDocument::new();
    doc.push(
        INTERFACE_SSTP_CLIENT,
        CommandLine::add()
            .comment(ctx.opts.comments, ctx.label("SSTP"))
            .opt("name", &ctx.interface)
            .opt("connect-to", config.server.trim())
            .opt("port", config.port.unwrap_or(DEFAULT_PORT))
            .opt("user", config.user.trim())
            .opt("password", &config.password)
            .opt(
                "verify-server-certificate",
                yes_no(config.verify_server_certificate),
            )
            .opt("add-default-route", "no")
            .opt("disabled", "no"),
    );
    Ok(doc)
}
