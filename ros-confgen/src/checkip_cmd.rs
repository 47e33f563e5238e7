use anyhow::{Context, Result};
use ros_confgen::checkip::plan_for;
use ros_confgen::report::{checkip_report, render_checkip_table};
use ros_confgen::topology::load_topology;

use crate::cli::{CheckipArgs, OutputFormat};

pub fn run_checkip(args: CheckipArgs) -> Result<()> {
    let topology = load_topology(&args.topology)?;
    let plan = plan_for(&topology)
        .with_context(|| format!("cannot allocate CheckIPs for {}", args.topology.display()))?;
    let report = checkip_report(&plan, &topology);

    match args.format {
        OutputFormat::Text => println!("{}", render_checkip_table(&report)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }
    Ok(())
}
