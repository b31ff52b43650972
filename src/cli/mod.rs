//! `lumenc` has exactly one subcommand: `watch`. This mirrors the teacher's
//! `Cli`/`Commands` shape without the surface area that belonged to a
//! different domain.

pub mod output;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// lumenc - incremental compilation core for the Lumen compiler
#[derive(Parser, Debug)]
#[command(name = "lumenc")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Emit one NDJSON record per lifecycle event on stdout instead of the
    /// human-readable line.
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Watch a source file and its require graph, recompiling on change.
    Watch {
        /// Entry source file.
        entry: PathBuf,

        /// After each successful build, run the produced binary.
        #[arg(long)]
        run: bool,

        /// Clear the terminal before each compilation.
        #[arg(long)]
        clear: bool,

        /// Debounce window, in milliseconds.
        #[arg(long, default_value_t = 300)]
        debounce: u64,

        /// Force the polling watcher backend.
        #[arg(long)]
        poll: bool,

        /// Polling tick interval, in milliseconds.
        #[arg(long = "poll-interval", default_value_t = 1000)]
        poll_interval: u64,

        /// Pass-through linker flags; may be repeated.
        #[arg(long = "link-flags")]
        link_flags: Vec<String>,

        /// Codegen target architecture (e.g. `x86_64-linux`, `wasm32-wasi`).
        #[arg(long, default_value = "native")]
        target: String,

        /// Arguments forwarded to the child process when `--run` is set.
        #[arg(last = true)]
        run_args: Vec<String>,
    },
}
