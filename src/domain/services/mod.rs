//! Domain Services
//!
//! Pure business logic that operates on domain entities, no I/O.

mod change_classifier;
mod module_skip;
mod signature_extractor;

pub use change_classifier::{classify, structurally_affected, ClassificationResult};
pub use module_skip::{plan_all_modules, plan_module, ModuleDecision, RebuildReason};
pub use signature_extractor::extract;
