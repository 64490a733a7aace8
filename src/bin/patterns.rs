use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use log::info;

use design_patterns::patterns::{self, Demo, DEMOS};
use design_patterns::RunnerConfig;

#[derive(Parser)]
#[command(name = "patterns", about = "Design-pattern demos built on a shared-ownership handle")]
struct Cli {
    /// TOML or JSON runner configuration
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List the available demos
    List,
    /// Run demos by name, or the configured set when none are given
    Run { names: Vec<String> },
}

fn load_config(path: Option<&PathBuf>) -> Result<RunnerConfig> {
    match path {
        Some(path) => RunnerConfig::load(path)
            .with_context(|| format!("loading config from {}", path.display())),
        None => Ok(RunnerConfig::default()),
    }
}

fn resolve(names: &[String]) -> Result<Vec<&'static Demo>> {
    let mut demos = Vec::with_capacity(names.len());
    for name in names {
        match patterns::find(name) {
            Some(demo) => demos.push(demo),
            None => bail!(
                "unknown demo '{name}' (available: {})",
                patterns::names().collect::<Vec<_>>().join(", ")
            ),
        }
    }
    Ok(demos)
}

fn run_demos(demos: &[&Demo], config: &RunnerConfig) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();

    for demo in demos {
        info!("running {}", demo.name);
        writeln!(out, "{}", format!("=== {} ===", demo.name).bold().cyan())?;
        (demo.run)(&mut out, config).with_context(|| format!("demo '{}' failed", demo.name))?;
        writeln!(out)?;
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_ref())?;

    env_logger::Builder::new()
        .filter_level(config.level_filter())
        .parse_default_env()
        .init();
    colored::control::set_override(config.color);

    match cli.command {
        Command::List => {
            for demo in DEMOS {
                println!("{:<18} {}", demo.name.bold(), demo.summary);
            }
            Ok(())
        }
        Command::Run { names } => {
            let selected = if names.is_empty() { &config.demos } else { &names };
            let demos = resolve(selected)?;
            run_demos(&demos, &config)
        }
    }
}
