//! Probe service modules through the registry
//!
//! Loads each named module the way the scheduler would and reports which
//! entry points it exports. Exits non-zero if any module fails to load.
//!
//! Usage:
//!   module-probe [--config <file>] [--search-path <template>] <name>...

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::info;

use actor_modules::utils::init_logging_from_config;
use actor_modules::{LoggingConfig, ModuleRegistry, RegistryConfig};

#[derive(Parser, Debug)]
#[command(name = "module-probe", about = "Load service modules and report their entry points")]
struct Args {
    /// Registry configuration file (TOML)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Search path template, overrides the config file and ACTOR_MODULES_PATH
    #[arg(long)]
    search_path: Option<String>,

    /// Log filter, e.g. "actor_modules=debug"
    #[arg(long)]
    log_filter: Option<String>,

    /// Module names to load (config `preload` entries are loaded too)
    names: Vec<String>,
}

fn load_config(args: &Args) -> Result<RegistryConfig> {
    let mut config = match &args.config {
        Some(path) => RegistryConfig::from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => RegistryConfig::default(),
    };

    config.apply_env_overrides();
    if let Some(search_path) = &args.search_path {
        config.search_path = search_path.clone();
    }
    if let Some(filter) = &args.log_filter {
        config.logging.get_or_insert_with(LoggingConfig::default).filter = Some(filter.clone());
    }

    config.validate().context("invalid registry configuration")?;
    Ok(config)
}

fn main() -> Result<ExitCode> {
    let args = Args::parse();
    let config = load_config(&args)?;
    init_logging_from_config(config.logging.as_ref());

    let registry = ModuleRegistry::from_config(&config).context("building module registry")?;
    info!("Probing modules with search path {}", registry.search_path());

    let names: Vec<&String> = config.preload.iter().chain(args.names.iter()).collect();
    if names.is_empty() {
        eprintln!("No module names given");
        return Ok(ExitCode::from(2));
    }

    let mut failed = 0;
    for name in names {
        match registry.get_or_load(name) {
            Ok(record) => println!("ok      {:<24} {}", record.name(), record.exports()),
            Err(e) => {
                failed += 1;
                println!("failed  {:<24} {}", name, e);
            }
        }
    }

    println!();
    println!("{} loaded, {} failed", registry.len(), failed);

    Ok(if failed == 0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
