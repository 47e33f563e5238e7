use anyhow::{bail, Result};
use ros_confgen::report::render_validation;
use ros_confgen::topology::load_topology;
use ros_confgen::validate::validate_topology;

use crate::cli::{OutputFormat, ValidateArgs};

pub fn run_validate(args: ValidateArgs) -> Result<()> {
    let topology = load_topology(&args.topology)?;
    let report = validate_topology(&topology);

    match args.format {
        OutputFormat::Text => println!("{}", render_validation(&report)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }

    if report.errors > 0 {
        bail!("validate failed: {} errors", report.errors);
    }
    if args.strict && report.warnings > 0 {
        bail!("validate failed in strict mode: {} warnings", report.warnings);
    }
    Ok(())
}
