use std::path::PathBuf;

use clap::{Parser, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "ros-confgen")]
#[command(about = "Generate and inspect RouterOS multi-WAN policy-routing scripts")]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace). RUST_LOG wins when set.
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(clap::Subcommand, Debug)]
pub enum Command {
    /// Generate a RouterOS script from a topology file.
    Generate(GenerateArgs),
    /// Check a topology file and report every problem found.
    Validate(ValidateArgs),
    /// Show the CheckIP allocation of a topology.
    Checkip(CheckipArgs),
    /// List the sections of a RouterOS script.
    Inspect(InspectArgs),
    /// Compare two RouterOS scripts section by section.
    Diff(DiffArgs),
}

#[derive(Parser, Debug)]
pub struct GenerateArgs {
    /// Topology file (TOML or JSON).
    pub topology: PathBuf,
    /// Write the script here instead of stdout.
    #[arg(short, long)]
    pub output: Option<PathBuf>,
    #[arg(long, value_enum, default_value_t = ScriptFormat::Script)]
    pub format: ScriptFormat,
    /// Keep every `add` line as generated.
    #[arg(long)]
    pub no_shorten: bool,
    /// Leave invalid entities out instead of failing.
    #[arg(long)]
    pub skip_invalid: bool,
    /// Do not attach `comment=` to generated lines.
    #[arg(long)]
    pub no_comments: bool,
    /// Print a generation summary to stderr.
    #[arg(long)]
    pub summary: bool,
}

#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Topology file (TOML or JSON).
    pub topology: PathBuf,
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
    /// Treat warnings as failures.
    #[arg(long)]
    pub strict: bool,
}

#[derive(Parser, Debug)]
pub struct CheckipArgs {
    /// Topology file (TOML or JSON).
    pub topology: PathBuf,
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(Parser, Debug)]
pub struct InspectArgs {
    /// RouterOS script (.rsc).
    pub file: PathBuf,
    /// Print the lines of this section only.
    #[arg(long)]
    pub section: Option<String>,
}

#[derive(Parser, Debug)]
pub struct DiffArgs {
    pub file1: PathBuf,
    pub file2: PathBuf,
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
    /// Print only the summary counts.
    #[arg(long)]
    pub summary: bool,
    /// Also list identical sections.
    #[arg(long)]
    pub all: bool,
    /// Section to leave out of the comparison; repeatable.
    #[arg(long)]
    pub ignore: Vec<String>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Clone, Copy, Debug, ValueEnum, PartialEq, Eq)]
pub enum ScriptFormat {
    /// RouterOS script text.
    Script,
    /// The section-keyed document as JSON.
    Json,
}
