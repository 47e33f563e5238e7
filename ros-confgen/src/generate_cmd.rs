use std::fs;

use anyhow::{Context, Result};
use ros_confgen::generate::generate_with;
use ros_confgen::report::render_generation_summary;
use ros_confgen::topology::{load_topology, GeneratorOptions, InvalidPolicy};
use ros_script::write;

use crate::cli::{GenerateArgs, ScriptFormat};
use crate::path_guard;

pub fn run_generate(args: GenerateArgs) -> Result<()> {
    let topology = load_topology(&args.topology)?;
    let opts = effective_options(topology.options, &args);

    let generation = generate_with(&topology, &opts)
        .with_context(|| format!("failed to generate from {}", args.topology.display()))?;

    let rendered = match args.format {
        ScriptFormat::Script => write(&generation.document),
        ScriptFormat::Json => serde_json::to_string_pretty(&generation.document)? + "\n",
    };

    match &args.output {
        Some(out_path) => {
            path_guard::guard_output(out_path, &args.topology)?;
            fs::write(out_path, rendered)
                .with_context(|| format!("failed to write script {}", out_path.display()))?;
        }
        None => print!("{rendered}"),
    }

    if args.summary {
        eprintln!("{}", render_generation_summary(&generation));
    }
    Ok(())
}

/// File options with command-line overrides applied.
fn effective_options(file: GeneratorOptions, args: &GenerateArgs) -> GeneratorOptions {
    GeneratorOptions {
        shorten: file.shorten && !args.no_shorten,
        on_invalid: if args.skip_invalid {
            InvalidPolicy::Skip
        } else {
            file.on_invalid
        },
        comments: file.comments && !args.no_comments,
    }
}
