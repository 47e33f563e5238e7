use ros_script::CommandDocument;

use super::ClientContext;
use crate::command::CommandLine;
use crate::error::BuildError;
use crate::section::INTERFACE_PPTP_CLIENT;
use crate::topology::PptpClient;

pub fn build(config: &PptpClient, ctx: &ClientContext<'_>) -> Result<CommandDocument, BuildError> {
    let mut doc = CommandDocument::new();
    doc.push(
        INTERFACE_PPTP_CLIENT,
        CommandLine::add()
            .comment(ctx.opts.comments, ctx.label("PPTP"))
            .opt("name", &ctx.interface)
            .opt("connect-to", config.server.trim())
            .opt("user", config.user.trim())
            .opt("password", &config.password)
            .opt("add-default-route", "no")
            .opt("disabled", "no"),
    );
    Ok(doc)
}
