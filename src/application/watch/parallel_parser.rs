//! Parallel Parser (C5).
//!
//! Dispatches a batch of discovered files to a bounded pool of OS threads.
//! Each worker owns its own `SymbolInterner` (never shared across threads)
//! and sends results back over an `mpsc` channel into a mutex-guarded result
//! map, matching the concurrency model in §5: a single bounded SPMC channel
//! feeding N workers, with the coordinator thread draining results.
//!
//! `PARALLEL_PARSE=0` (or `worker_count <= 1`) runs every file on the
//! calling thread instead, and must produce byte-for-byte the same ASTs as
//! the threaded path (universal invariant 8).

use crate::domain::entities::ParsedUnit;
use crate::domain::ports::{ParseError, SourceParser, SymbolInterner};
use crate::domain::value_objects::ContentHash;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread;

#[derive(Debug, Clone)]
pub struct ParallelParserConfig {
    pub worker_count: usize,
}

impl ParallelParserConfig {
    pub fn new(worker_count: usize) -> Self {
        Self {
            worker_count: worker_count.max(1),
        }
    }
}

#[derive(Debug, Default, Clone)]
pub struct ParallelParserStats {
    pub files_parsed: usize,
    pub files_failed: usize,
}

pub struct ParseJob {
    pub path: PathBuf,
    pub content: String,
    pub content_hash: ContentHash,
}

pub type ParseResults = HashMap<PathBuf, Result<ParsedUnit, ParseError>>;

/// Parse every job, sequentially on the calling thread. Used both as the
/// `PARALLEL_PARSE=0` fallback and as the single-worker case of
/// `parse_all`.
pub fn parse_sequential<P: SourceParser>(
    parser: &P,
    jobs: Vec<ParseJob>,
) -> (ParseResults, ParallelParserStats) {
    let mut results = HashMap::with_capacity(jobs.len());
    let mut stats = ParallelParserStats::default();
    let interner = SymbolInterner::new();
    for job in jobs {
        let filename = job.path.to_string_lossy().into_owned();
        let outcome = parser
            .parse(&job.content, &interner, &filename, false)
            .map(|ast| ParsedUnit::new(ast, job.content_hash));
        match &outcome {
            Ok(_) => stats.files_parsed += 1,
            Err(_) => stats.files_failed += 1,
        }
        results.insert(job.path, outcome);
    }
    (results, stats)
}

/// Parse every job across `config.worker_count` OS threads. Falls back to
/// `parse_sequential` when `worker_count <= 1`.
pub fn parse_all<P>(parser: Arc<P>, jobs: Vec<ParseJob>, config: &ParallelParserConfig) -> (ParseResults, ParallelParserStats)
where
    P: SourceParser + Send + Sync + 'static,
{
    if config.worker_count <= 1 || jobs.len() <= 1 {
        return parse_sequential(parser.as_ref(), jobs);
    }

    let worker_count = config.worker_count.min(jobs.len());
    let (job_tx, job_rx) = mpsc::sync_channel::<ParseJob>(worker_count * 2);
    let job_rx = Arc::new(Mutex::new(job_rx));
    let results: Arc<Mutex<ParseResults>> = Arc::new(Mutex::new(HashMap::with_capacity(jobs.len())));
    let stats: Arc<Mutex<ParallelParserStats>> = Arc::new(Mutex::new(ParallelParserStats::default()));

    thread::scope(|scope| {
        for _ in 0..worker_count {
            let job_rx = Arc::clone(&job_rx);
            let results = Arc::clone(&results);
            let stats = Arc::clone(&stats);
            let parser = Arc::clone(&parser);
            scope.spawn(move || {
                let interner = SymbolInterner::new();
                loop {
                    let job = {
                        let rx = job_rx.lock().expect("parse job channel poisoned");
                        rx.recv()
                    };
                    let Ok(job) = job else { break };
                    let filename = job.path.to_string_lossy().into_owned();
                    let outcome = parser
                        .parse(&job.content, &interner, &filename, false)
                        .map(|ast| ParsedUnit::new(ast, job.content_hash));
                    {
                        let mut stats = stats.lock().expect("parse stats mutex poisoned");
                        match &outcome {
                            Ok(_) => stats.files_parsed += 1,
                            Err(_) => stats.files_failed += 1,
                        }
                    }
                    results
                        .lock()
                        .expect("parse results mutex poisoned")
                        .insert(job.path, outcome);
                }
            });
        }

        for job in jobs {
            job_tx.send(job).expect("parse job channel receiver dropped early");
        }
        drop(job_tx);
    });

    let results = Arc::try_unwrap(results)
        .expect("all worker threads joined")
        .into_inner()
        .expect("parse results mutex poisoned");
    let stats = Arc::try_unwrap(stats)
        .expect("all worker threads joined")
        .into_inner()
        .expect("parse stats mutex poisoned");
    (results, stats)
}
