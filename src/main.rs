mod args;
mod cli;
mod extension_traits;
mod naming;
mod pipeline;
mod proc;

use args::Args;
use cli::Cli;

use anyhow::{Context, Result};
use clap::Parser;

/// Probe every external tool the enabled stages will call.
///
/// A tool that cannot be spawned is reported up front rather than half-way
/// through a run; exit status is ignored since only presence matters here.
fn check_external_tools(args: &Args) -> Result<()> {
    let mut tools = vec!["convert_msa", "generate_hmms"];
    if !args.file_mode() {
        tools.push("hhfilter");
    }
    if args.enrichment_enabled() {
        tools.push("hhblits");
    }
    if !args.file_mode() || args.enrichment_enabled() {
        tools.extend(["reformat.pl", "esl-alimask", "seqkit"]);
    }
    if args.clustering_enabled() {
        tools.push("cluster_msa");
    }

    for tool in tools {
        std::process::Command::new(tool)
            .arg("-h")
            .output()
            .map(|_| ())
            .context(format!("{tool} does not appear to be in the system path"))?;
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let args = match cli.args() {
        Ok(args) => args,
        Err(error) => {
            eprintln!("{error:#}");
            std::process::exit(1);
        }
    };

    check_external_tools(&args)?;
    pipeline::run(&args)
}
