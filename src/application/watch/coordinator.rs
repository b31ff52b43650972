//! Watch Coordinator (C10): the long-lived loop that owns every other
//! component in this module plus the child process, and drives build
//! cycles in response to filesystem events.
//!
//! States: `Idle -> Compiling -> Running? -> Waiting -> {wake or interrupt}`.
//! The `interrupted` flag is read at cycle boundaries only (inside
//! `wait_for_changes`'s bounded first wait and between cycles); nothing
//! async-signal-unsafe runs from inside the signal handler itself, which is
//! expected to do nothing but flip the flag.
//!
//! A real backend collaborator writes per-module object artefacts and
//! reports their existence to this crate (§6.4); since this crate's own
//! toy `.lum` "compiler" has no codegen, the coordinator stands in for that
//! collaborator by touching a zero/non-zero-byte marker file per module
//! under `<cache_dir>/objects/`, purely so `ModuleSkipPlanner` has
//! something real to observe across cycles. Noted in DESIGN.md.

use super::cache;
use super::discover::discover;
use super::event::WatchEvent;
use super::parallel_parser::{parse_all, parse_sequential, ParallelParserConfig, ParseJob};
use super::parse_cache::ParseCache;
use crate::domain::entities::{
    AstNode, FileTopLevelSignature, IncrementalCacheRecord, ModuleFileMap,
};
use crate::domain::ports::{CompileSettings, Compiler, PathResolver, SourceParser, SymbolInterner};
use crate::domain::services::{classify, extract, plan_all_modules, ModuleDecision};
use crate::domain::value_objects::ContentHash;
use crate::error::LumenResult;
use crate::infrastructure::watcher::FileWatcher;
use crossterm::{cursor, terminal, QueueableCommand};
use is_terminal::IsTerminal;
use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};
use std::process::{Child, Command};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Everything about a run that doesn't change cycle to cycle.
pub struct CoordinatorOptions {
    pub entry: PathBuf,
    pub prelude: Option<PathBuf>,
    pub output_path: PathBuf,
    pub cache_dir: PathBuf,
    pub compiler_version: String,
    pub prelude_identity: String,
    pub settings: CompileSettings,
    pub active_flags: HashSet<String>,
    pub debounce: Duration,
    /// Bound on each poll of `wait_for_changes`, so the interrupt flag is
    /// re-checked periodically instead of blocking forever.
    pub max_wait: Duration,
    pub parallel: ParallelParserConfig,
    pub run_argv: Option<Vec<String>>,
    pub clear_terminal: bool,
}

#[derive(Debug, Clone, Default)]
pub struct CycleReport {
    pub requires_count: usize,
    pub modules_rebuilt: usize,
    pub modules_reused: usize,
    pub elapsed_ms: u128,
    /// Files in this cycle's changed set whose top-level signature didn't
    /// change (C7's body-only partition).
    pub body_only: std::collections::BTreeSet<PathBuf>,
    /// Files in this cycle's changed set that are new or whose top-level
    /// signature changed (C7's structural partition).
    pub structural: std::collections::BTreeSet<PathBuf>,
}

pub enum CycleOutcome {
    Compiled {
        report: CycleReport,
        watched: HashSet<PathBuf>,
    },
    CompileFailed(String),
}

pub struct WatchCoordinator<C, P, R> {
    compiler: C,
    parser: Arc<P>,
    resolver: R,
    watcher: Box<dyn FileWatcher>,
    options: CoordinatorOptions,
    parse_cache: ParseCache,
    previous_record: Option<IncrementalCacheRecord>,
    child: Option<Child>,
}

impl<C, P, R> WatchCoordinator<C, P, R>
where
    C: Compiler,
    P: SourceParser + Send + Sync + 'static,
    R: PathResolver,
{
    pub fn new(
        compiler: C,
        parser: Arc<P>,
        resolver: R,
        watcher: Box<dyn FileWatcher>,
        options: CoordinatorOptions,
    ) -> Self {
        let previous_record = cache::load(
            &options.cache_dir,
            &options.compiler_version,
            &options.settings.target.architecture,
            &options.settings.flags,
            &options.prelude_identity,
        );
        Self {
            compiler,
            parser,
            resolver,
            watcher,
            options,
            parse_cache: ParseCache::new(),
            previous_record,
            child: None,
        }
    }

    /// Run one full build cycle: re-read the initial sources, discover the
    /// reachable file set, invoke the compiler collaborator, and — on
    /// success — refresh every incremental data structure this crate owns.
    pub fn run_cycle(&mut self) -> CycleOutcome {
        let start = Instant::now();

        if let Err(err) = std::fs::read_to_string(&self.options.entry) {
            return CycleOutcome::CompileFailed(format!(
                "failed to read {}: {err}",
                self.options.entry.display()
            ));
        }

        let outcome = discover(
            self.parser.as_ref(),
            &self.resolver,
            self.options.prelude.as_deref(),
            &self.options.entry,
            &self.options.active_flags,
        );

        let compile_result = self.compiler.compile(
            &outcome.ordered_files,
            &self.options.output_path,
            &self.options.settings,
        );
        let compiled = match compile_result {
            Ok(compiled) => compiled,
            Err(err) => return CycleOutcome::CompileFailed(err.to_string()),
        };

        let mut participating = compiled.requires;
        if participating.is_empty() {
            participating = outcome.ordered_files;
        }

        let previous_fingerprints = self.previous_record.as_ref().map(|r| &r.file_fingerprints);
        let (fresh_fingerprints, changed_paths) =
            match cache::changed_files(&participating, previous_fingerprints) {
                Ok(result) => result,
                Err(err) => return CycleOutcome::CompileFailed(err.to_string()),
            };
        let changed: HashSet<PathBuf> = changed_paths.into_iter().collect();

        let mut jobs = Vec::new();
        for path in &changed {
            let Ok(content) = std::fs::read_to_string(path) else {
                continue;
            };
            let content_hash = fresh_fingerprints
                .get(path)
                .map(|fp| fp.hash.clone())
                .unwrap_or_else(|| ContentHash::from_content(&content));
            jobs.push(ParseJob {
                path: path.clone(),
                content,
                content_hash,
            });
        }

        let (results, _stats) = if self.options.parallel.worker_count <= 1 {
            parse_sequential(self.parser.as_ref(), jobs)
        } else {
            parse_all(Arc::clone(&self.parser), jobs, &self.options.parallel)
        };

        for (path, result) in results {
            if let Ok(unit) = result {
                self.parse_cache.store(path, unit);
            }
        }

        let mut asts: BTreeMap<PathBuf, Vec<AstNode>> = BTreeMap::new();
        for path in &participating {
            let Some(hash) = fresh_fingerprints.get(path).map(|fp| fp.hash.clone()) else {
                continue;
            };
            if let Some(ast) = self.parse_cache.get(path, &hash) {
                asts.insert(path.clone(), ast);
            }
        }

        let mut new_signatures: BTreeMap<PathBuf, FileTopLevelSignature> = BTreeMap::new();
        for (path, ast) in &asts {
            new_signatures.insert(path.clone(), extract(ast));
        }

        let old_signatures = self.previous_record.as_ref().and_then(|r| r.file_signatures.as_ref());
        let changed_vec: Vec<PathBuf> = changed.iter().cloned().collect();
        // Feeds `file_signatures` forward into the next cycle's cache record
        // and surfaces the body-only/structural partition on `CycleReport`;
        // whether a structural change also forces *other*, unmodified
        // downstream files to be reprocessed is left for the
        // semantic-analysis collaborator to decide (out of scope here, per
        // §1) via `structurally_affected`.
        let classification = classify(&changed_vec, old_signatures, &new_signatures);

        let mut module_map = ModuleFileMap::new();
        for path in &participating {
            let module = new_signatures
                .get(path)
                .map(|sig| module_name_for(path, sig))
                .unwrap_or_else(|| module_name_for(path, &FileTopLevelSignature::empty()));
            module_map.insert(module, path.clone());
        }

        let flags_match = self
            .previous_record
            .as_ref()
            .map(|r| r.matches_identity(
                &self.options.compiler_version,
                &self.options.settings.target.architecture,
                &self.options.settings.flags,
                &self.options.prelude_identity,
            ))
            .unwrap_or(false);

        // §4.8 step 2 keys off of "changed at all" (body-only changes still
        // invalidate that file's own module's cached IR/object), not just
        // the structural subset — that subset instead drives whether other,
        // unmodified *downstream* files need re-processing, a decision left
        // to the semantic-analysis collaborator.
        let changed_set: std::collections::BTreeSet<PathBuf> = changed.iter().cloned().collect();
        let decisions = plan_all_modules(
            &module_map,
            &changed_set,
            |module| self.artifact_exists_nonempty(module),
            flags_match,
        );

        let mut modules_rebuilt = 0;
        let mut modules_reused = 0;
        for (module, decision) in &decisions {
            match decision {
                ModuleDecision::Reuse => modules_reused += 1,
                ModuleDecision::Rebuild(_) => {
                    modules_rebuilt += 1;
                    self.write_artifact_stub(module);
                }
            }
        }

        let mut record = IncrementalCacheRecord::new(
            self.options.compiler_version.clone(),
            self.options.settings.target.architecture.clone(),
            self.options.settings.flags.clone(),
            self.options.prelude_identity.clone(),
        );
        record.file_fingerprints = fresh_fingerprints;
        record.module_file_map = Some(module_map);
        record.file_signatures = Some(new_signatures);

        if let Err(err) = cache::save(&self.options.cache_dir, &record) {
            eprintln!("warning: failed to save incremental cache: {err}");
        }

        self.previous_record = Some(record);

        let watched: HashSet<PathBuf> = participating.iter().cloned().collect();

        CycleOutcome::Compiled {
            report: CycleReport {
                requires_count: participating.len(),
                modules_rebuilt,
                modules_reused,
                elapsed_ms: start.elapsed().as_millis(),
                body_only: classification.body_only,
                structural: classification.structural,
            },
            watched,
        }
    }

    /// `--clear`, gated on stdout actually being a terminal (piping to a
    /// file or another process shouldn't fill the log with escape codes),
    /// the same `is_terminal` gate the teacher's own output layer uses
    /// before writing anything terminal-control-specific.
    fn clear_terminal_if_tty(&self) {
        let mut stdout = std::io::stdout();
        if !stdout.is_terminal() {
            return;
        }
        let _ = stdout.queue(terminal::Clear(terminal::ClearType::All));
        let _ = stdout.queue(cursor::MoveTo(0, 0));
        let _ = std::io::Write::flush(&mut stdout);
    }

    fn artifact_path(&self, module: &str) -> PathBuf {
        self.options.cache_dir.join("objects").join(format!("{module}.o"))
    }

    fn artifact_exists_nonempty(&self, module: &str) -> bool {
        std::fs::metadata(self.artifact_path(module))
            .map(|m| m.len() > 0)
            .unwrap_or(false)
    }

    fn write_artifact_stub(&self, module: &str) {
        let path = self.artifact_path(module);
        if let Some(parent) = path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        let _ = std::fs::write(path, b"stub");
    }

    /// Kill any running child, waiting briefly for it to exit on its own.
    /// `std` offers no portable graceful-terminate primitive (the teacher's
    /// dependency stack carries no signal-sending crate either), so the
    /// "up to 2s for self-exit" grace period collapses to an immediate
    /// `kill` here — see DESIGN.md.
    fn terminate_child(&mut self) -> Option<Option<i32>> {
        let mut child = self.child.take()?;
        let _ = child.kill();
        let code = child.wait().ok().and_then(|status| status.code());
        Some(code)
    }

    fn spawn_child(&mut self, argv_tail: &[String]) -> std::io::Result<Child> {
        if self.options.settings.target.architecture.contains("wasm") {
            Command::new("wasmtime")
                .arg("--enable-exceptions")
                .arg(&self.options.output_path)
                .args(argv_tail)
                .spawn()
        } else {
            Command::new(&self.options.output_path).args(argv_tail).spawn()
        }
    }

    fn poll_child_exit(&mut self, on_event: &mut impl FnMut(&WatchEvent)) {
        let exited = match &mut self.child {
            Some(child) => matches!(child.try_wait(), Ok(Some(_))),
            None => false,
        };
        if exited {
            if let Some(code) = self.terminate_child() {
                on_event(&WatchEvent::ChildExited { code });
            }
        }
    }

    /// The main loop: steps 1-8 of §4.2, repeated until `running` goes
    /// false. Cleanup (child kill, `Interrupted` event) happens once the
    /// flag is observed at a cycle boundary.
    pub fn run(&mut self, running: &AtomicBool, mut on_event: impl FnMut(&WatchEvent)) -> LumenResult<()> {
        while running.load(Ordering::SeqCst) {
            if self.options.clear_terminal {
                self.clear_terminal_if_tty();
            }
            on_event(&WatchEvent::Compiling);

            match self.run_cycle() {
                CycleOutcome::Compiled { report, watched } => {
                    on_event(&WatchEvent::Compiled {
                        requires_count: report.requires_count,
                        modules_rebuilt: report.modules_rebuilt,
                        modules_reused: report.modules_reused,
                        elapsed_ms: report.elapsed_ms,
                    });
                    if let Err(err) = self.watcher.watch(&watched) {
                        eprintln!("warning: {err}");
                    } else {
                        let watching: Vec<String> =
                            watched.iter().map(|p| p.display().to_string()).collect();
                        on_event(&WatchEvent::Watching { watching });
                    }

                    if let Some(argv_tail) = self.options.run_argv.clone() {
                        self.terminate_child();
                        match self.spawn_child(&argv_tail) {
                            Ok(child) => {
                                let pid = child.id();
                                self.child = Some(child);
                                on_event(&WatchEvent::Running { pid });
                            }
                            Err(err) => eprintln!("warning: failed to launch child process: {err}"),
                        }
                    }
                }
                CycleOutcome::CompileFailed(message) => {
                    on_event(&WatchEvent::CompileError { message });
                }
            }

            loop {
                if !running.load(Ordering::SeqCst) {
                    break;
                }
                self.poll_child_exit(&mut on_event);
                match self.watcher.wait_for_changes(self.options.debounce, self.options.max_wait) {
                    Ok(changed) if !changed.is_empty() => {
                        let paths: Vec<String> =
                            changed.iter().map(|p| p.display().to_string()).collect();
                        on_event(&WatchEvent::FileChanged { paths });
                        break;
                    }
                    Ok(_) => continue,
                    Err(err) => return Err(err),
                }
            }

            if !running.load(Ordering::SeqCst) {
                break;
            }
            if let Some(code) = self.terminate_child() {
                on_event(&WatchEvent::ChildExited { code });
            }
        }

        if let Some(code) = self.terminate_child() {
            on_event(&WatchEvent::ChildExited { code });
        }
        on_event(&WatchEvent::Interrupted);
        Ok(())
    }
}

/// A codegen-module is, absent any richer grouping mechanism the external
/// backend might use, named after its file's first top-level type
/// declaration, falling back to the file's title-cased stem (matching
/// §8 scenario S3: `a.src` containing `class Greeter` maps to module
/// `"Greeter"`, `main.src` with no type declaration maps to `"Main"`).
fn module_name_for(path: &Path, sig: &FileTopLevelSignature) -> String {
    sig.type_decls
        .iter()
        .find(|decl| !decl.qualified_name.contains("::"))
        .map(|decl| decl.qualified_name.clone())
        .unwrap_or_else(|| titlecase_stem(path))
}

fn titlecase_stem(path: &Path) -> String {
    let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or("module");
    let mut chars = stem.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => "Module".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{CompileError, CompileOutcome, ParseError, TargetDescriptor};
    use std::cell::RefCell;
    use std::collections::HashMap;
    use tempfile::tempdir;

    /// A minimal line-oriented parser: `require "x"` lines become
    /// `AstNode::Require`, `class Name` lines become a one-line `ClassDef`,
    /// everything else is ignored. Good enough to drive the coordinator's
    /// discovery/signature/classification pipeline end to end.
    struct LineParser;

    impl SourceParser for LineParser {
        fn parse(
            &self,
            content: &str,
            _interner: &SymbolInterner,
            _filename: &str,
            _wants_docs: bool,
        ) -> Result<Vec<AstNode>, ParseError> {
            let mut nodes = Vec::new();
            for line in content.lines() {
                let line = line.trim();
                if let Some(rest) = line.strip_prefix("require \"") {
                    if let Some(import) = rest.strip_suffix('"') {
                        nodes.push(AstNode::Require(import.to_string()));
                    }
                } else if let Some(name) = line.strip_prefix("class ") {
                    nodes.push(AstNode::ClassDef {
                        name: name.trim().to_string(),
                        parent: None,
                        generic_params: vec![],
                        body: vec![],
                    });
                }
            }
            Ok(nodes)
        }
    }

    struct MapResolver {
        map: RefCell<HashMap<String, PathBuf>>,
    }

    impl PathResolver for MapResolver {
        fn find(
            &self,
            import: &str,
            _relative_to: Option<&Path>,
        ) -> Result<Vec<PathBuf>, crate::domain::ports::ResolveError> {
            self.map
                .borrow()
                .get(import)
                .cloned()
                .map(|p| vec![p])
                .ok_or_else(|| crate::domain::ports::ResolveError::NotFound {
                    import: import.to_string(),
                    relative_to: None,
                })
        }
    }

    /// A compiler whose `requires` is just whatever sources it was handed,
    /// and which fails when a source contains the literal `FAIL` marker.
    struct EchoCompiler;

    impl Compiler for EchoCompiler {
        fn compile(
            &self,
            sources: &[PathBuf],
            _output_path: &Path,
            _settings: &CompileSettings,
        ) -> Result<CompileOutcome, CompileError> {
            for source in sources {
                let content = std::fs::read_to_string(source)?;
                if content.contains("FAIL") {
                    return Err(CompileError::Semantic {
                        file: source.clone(),
                        message: "FAIL marker present".to_string(),
                    });
                }
            }
            Ok(CompileOutcome {
                requires: sources.to_vec(),
            })
        }
    }

    fn settings() -> CompileSettings {
        CompileSettings {
            incremental: true,
            target: TargetDescriptor {
                architecture: "x86_64-linux".to_string(),
            },
            flags: vec!["-O0".to_string()],
        }
    }

    fn options(entry: PathBuf, cache_dir: PathBuf) -> CoordinatorOptions {
        CoordinatorOptions {
            entry: entry.clone(),
            prelude: None,
            output_path: cache_dir.join("out.bin"),
            cache_dir,
            compiler_version: "0.1.0".to_string(),
            prelude_identity: "none".to_string(),
            settings: settings(),
            active_flags: HashSet::new(),
            debounce: Duration::from_millis(5),
            max_wait: Duration::from_millis(20),
            parallel: ParallelParserConfig::new(1),
            run_argv: None,
            clear_terminal: false,
        }
    }

    struct NeverWatcher;
    impl FileWatcher for NeverWatcher {
        fn watch(&mut self, _paths: &HashSet<PathBuf>) -> LumenResult<()> {
            Ok(())
        }
        fn wait_for_changes(
            &mut self,
            _debounce: Duration,
            _max_wait: Duration,
        ) -> LumenResult<HashSet<PathBuf>> {
            Ok(HashSet::new())
        }
    }

    fn make_coordinator(
        dir: &std::path::Path,
    ) -> WatchCoordinator<EchoCompiler, LineParser, MapResolver> {
        let a = dir.join("a.src");
        let main = dir.join("main.src");
        std::fs::write(&a, "class Greeter\n").unwrap();
        std::fs::write(&main, "require \"./a\"\n").unwrap();

        let mut map = HashMap::new();
        map.insert("./a".to_string(), a.clone());
        let resolver = MapResolver { map: RefCell::new(map) };

        WatchCoordinator::new(
            EchoCompiler,
            Arc::new(LineParser),
            resolver,
            Box::new(NeverWatcher),
            options(main, dir.join("cache")),
        )
    }

    #[test]
    fn cold_cycle_writes_cache_and_reports_requires() {
        let dir = tempdir().unwrap();
        let mut coordinator = make_coordinator(dir.path());
        match coordinator.run_cycle() {
            CycleOutcome::Compiled { report, watched } => {
                assert_eq!(report.requires_count, 2);
                assert_eq!(watched.len(), 2);
            }
            CycleOutcome::CompileFailed(message) => panic!("unexpected failure: {message}"),
        }
        assert!(cache::cache_file_path(&dir.path().join("cache")).exists());
    }

    #[test]
    fn second_cycle_with_no_changes_reuses_every_module() {
        let dir = tempdir().unwrap();
        let mut coordinator = make_coordinator(dir.path());
        assert!(matches!(coordinator.run_cycle(), CycleOutcome::Compiled { .. }));

        match coordinator.run_cycle() {
            CycleOutcome::Compiled { report, .. } => {
                assert_eq!(report.modules_reused, 2);
                assert_eq!(report.modules_rebuilt, 0);
            }
            CycleOutcome::CompileFailed(message) => panic!("unexpected failure: {message}"),
        }
    }

    #[test]
    fn compile_failure_is_reported_not_fatal() {
        let dir = tempdir().unwrap();
        let mut coordinator = make_coordinator(dir.path());
        std::fs::write(dir.path().join("a.src"), "FAIL\n").unwrap();
        match coordinator.run_cycle() {
            CycleOutcome::CompileFailed(message) => assert!(message.contains("FAIL")),
            CycleOutcome::Compiled { .. } => panic!("expected compile failure"),
        }
    }

    #[test]
    fn deleted_entry_is_reported_not_fatal() {
        let dir = tempdir().unwrap();
        let mut coordinator = make_coordinator(dir.path());
        std::fs::remove_file(dir.path().join("main.src")).unwrap();
        assert!(matches!(coordinator.run_cycle(), CycleOutcome::CompileFailed(_)));
    }

    #[test]
    fn run_exits_cleanly_when_not_running() {
        let dir = tempdir().unwrap();
        let mut coordinator = make_coordinator(dir.path());
        let running = AtomicBool::new(false);
        let mut events = Vec::new();
        coordinator
            .run(&running, |event| events.push(format!("{event:?}")))
            .unwrap();
        assert!(events.iter().any(|e| e.contains("Interrupted")));
    }
}
