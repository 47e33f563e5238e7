use ros_script::CommandDocument;

use super::ClientContext;
use crate::command::CommandLine;
use crate::error::BuildError;
use crate::section::INTERFACE_L2TP_CLIENT;
use crate::topology::L2tpClient;

pub fn build(config: &L2tpClient, ctx: &ClientContext<'_>) -> Result<CommandDocument, BuildError> {
    let mut line = CommandLine::add()
        .comment(ctx.opts.comments, ctx.label("L2TP"))
        .opt("name", &ctx.interface)
        .opt("connect-to", config.server.trim())
        .opt("user", config.user.trim())
        .opt("password", &config.password);
    if let Some(secret) = &config.ipsec_secret {
        line = line.opt("use-ipsec", "yes").opt("ipsec-secret", secret);
    }
    let line = line.opt("add-default-route", "no").opt("disabled", "no");

    let mut doc = CommandDocument::new();
    doc.push(INTERFACE_L2TP_CLIENT, line);
    Ok(doc)
}
