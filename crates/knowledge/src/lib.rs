//! # Pepil Knowledge
//!
//! Compiles the clinic's structured datasets (ordering rules, doctor speed
//! profiles, base procedure durations, ancillary team procedures, release
//! notes) into one plain-text document that grounds the downstream model.
//!
//! ## Pipeline
//!
//! 1. A [`DatasetSource`] loads and validates a [`KnowledgeBase`]
//! 2. [`sections`] render each dataset slice, using [`adjust`] and
//!    [`duration`] for the per-doctor time matrices
//! 3. [`KnowledgeCompiler`] assembles the sections in canonical order and
//!    memoizes the result for its own lifetime
//! 4. [`build_prompt`] wraps the document in the assistant's instructions
//!
//! Everything here is synchronous and pure apart from the initial file reads.

pub mod adjust;
pub mod compiler;
pub mod duration;
pub mod error;
pub mod model;
pub mod prompt;
pub mod sections;
pub mod source;

pub use adjust::{Adjustment, OverrideTable, adjust};
pub use compiler::{KnowledgeCompiler, assemble};
pub use duration::format_duration;
pub use error::{DatasetError, DatasetKind, DatasetProblem, FormatterError, KnowledgeError};
pub use model::{
    AncillaryProcedureRecord, DoctorProfile, KnowledgeBase, OrderingRule, OverrideRule, PatchNote,
    ProcedureCategory, ProcedureTimeRecord, SkinCareCategory, Team,
};
pub use prompt::build_prompt;
pub use source::{DatasetSource, DirectorySource};
