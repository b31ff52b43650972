//! lumenc CLI - incremental compilation core for the Lumen compiler
//!
//! Usage: lumenc watch [options] <file.source> [-- <run-args...>]

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;

use lumenc::application::{CoordinatorOptions, WatchCoordinator};
use lumenc::cli::{output, Cli, Commands};
use lumenc::config::WatchConfig;
use lumenc::domain::ports::{CompileSettings, TargetDescriptor};
use lumenc::infrastructure::{self, ToyCompiler, ToyParser, ToyPathResolver};

fn main() {
    let cli = Cli::parse();
    if let Err(err) = run(cli) {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let Commands::Watch {
        entry,
        run,
        clear,
        debounce,
        poll,
        poll_interval,
        link_flags,
        target,
        run_args,
    } = cli.command;

    let entry = entry
        .canonicalize()
        .with_context(|| format!("entry file {} does not exist", entry.display()))?;
    let source_root = entry
        .parent()
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| std::env::current_dir().unwrap_or_default());

    let config = WatchConfig::resolve();
    let output_path = config
        .cache_dir
        .join("bin")
        .join(entry.file_stem().unwrap_or_else(|| std::ffi::OsStr::new("out")));

    let watcher = infrastructure::create_watcher(poll, Duration::from_millis(poll_interval))
        .context("failed to construct a file watcher")?;

    let options = CoordinatorOptions {
        entry: entry.clone(),
        prelude: None,
        output_path,
        cache_dir: config.cache_dir,
        compiler_version: env!("CARGO_PKG_VERSION").to_string(),
        prelude_identity: "none".to_string(),
        settings: CompileSettings {
            incremental: true,
            target: TargetDescriptor { architecture: target },
            flags: link_flags,
        },
        active_flags: HashSet::new(),
        debounce: Duration::from_millis(debounce),
        max_wait: Duration::from_millis(500),
        parallel: lumenc::application::ParallelParserConfig::new(
            config.build.effective_worker_count(),
        ),
        run_argv: if run { Some(run_args) } else { None },
        clear_terminal: clear,
    };

    let mut coordinator = WatchCoordinator::new(
        ToyCompiler,
        Arc::new(ToyParser),
        ToyPathResolver::new(source_root),
        watcher,
        options,
    );

    let running = Arc::new(AtomicBool::new(true));
    let running_handler = Arc::clone(&running);
    ctrlc::set_handler(move || {
        running_handler.store(false, Ordering::SeqCst);
    })
    .context("failed to install Ctrl+C handler")?;

    coordinator.run(&running, |event| output::emit(event, cli.json))?;
    Ok(())
}
