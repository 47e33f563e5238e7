use anyhow::{Context, Result};
use clap::Parser;
use ros_confgen::report::{render_diff, render_diff_summary};
use ros_script::{diff_with_options, format_json, parse_file, DiffOptions};
use tracing_subscriber::EnvFilter;

mod checkip_cmd;
mod cli;
mod generate_cmd;
mod path_guard;
mod validate_cmd;

use cli::{Cli, Command, DiffArgs, InspectArgs, OutputFormat};

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Generate(args) => generate_cmd::run_generate(args),
        Command::Validate(args) => validate_cmd::run_validate(args),
        Command::Checkip(args) => checkip_cmd::run_checkip(args),
        Command::Inspect(args) => run_inspect(args),
        Command::Diff(args) => run_diff(args),
    }
}

fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn run_inspect(args: InspectArgs) -> Result<()> {
    let doc = parse_file(&args.file)
        .with_context(|| format!("failed to parse {}", args.file.display()))?;

    if let Some(section) = &args.section {
        let lines = doc
            .section(section)
            .with_context(|| format!("section '{section}' not found"))?;
        println!("{section}");
        for line in lines {
            println!("{line}");
        }
        return Ok(());
    }

    println!(
        "sections={} lines={}",
        doc.section_count(),
        doc.line_count()
    );
    for (section, lines) in doc.sections() {
        println!("- {section} ({} lines)", lines.len());
    }
    Ok(())
}

fn run_diff(args: DiffArgs) -> Result<()> {
    let left = parse_file(&args.file1)
        .with_context(|| format!("failed to parse {}", args.file1.display()))?;
    let right = parse_file(&args.file2)
        .with_context(|| format!("failed to parse {}", args.file2.display()))?;

    let opts = DiffOptions {
        include_identical: args.all,
        ignore_sections: args.ignore,
    };
    let entries = diff_with_options(&left, &right, &opts);

    if args.summary {
        println!("{}", render_diff_summary(&entries));
        return Ok(());
    }
    match args.format {
        OutputFormat::Text => println!("{}", render_diff(&entries)),
        OutputFormat::Json => println!("{}", format_json(&entries)),
    }
    Ok(())
}
