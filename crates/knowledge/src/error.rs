//! Error types for knowledge base compilation.
//!
//! Dataset problems are collected rather than returned one at a time, so a
//! broken deployment reports everything wrong with its data in one message.

use thiserror::Error;

/// Top-level failure of [`crate::KnowledgeCompiler::compile`].
#[derive(Debug, Clone, Error)]
pub enum KnowledgeError {
    #[error("Dataset error: {0}")]
    Dataset(#[from] DatasetError),

    #[error("Formatter error: {0}")]
    Formatter(#[from] FormatterError),
}

/// A duration that cannot be rendered as whole seconds.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FormatterError {
    #[error("duration {value} is negative, not finite, or out of range")]
    InvalidDuration { value: f64 },
}

/// Which source dataset a problem was found in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DatasetKind {
    ProcedureRules,
    Genmac,
    OtherProcedures,
    PatchNotes,
}

impl DatasetKind {
    pub const ALL: [DatasetKind; 4] = [
        DatasetKind::ProcedureRules,
        DatasetKind::Genmac,
        DatasetKind::OtherProcedures,
        DatasetKind::PatchNotes,
    ];

    /// File name inside the data directory.
    pub fn file_name(&self) -> &'static str {
        match self {
            DatasetKind::ProcedureRules => "procedure-rules.json",
            DatasetKind::Genmac => "genmac.json",
            DatasetKind::OtherProcedures => "other-procedures.json",
            DatasetKind::PatchNotes => "patch-notes.json",
        }
    }
}

impl std::fmt::Display for DatasetKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.file_name())
    }
}

/// One thing wrong with one dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetProblem {
    pub dataset: DatasetKind,
    pub detail: String,
}

impl DatasetProblem {
    pub fn new(dataset: DatasetKind, detail: impl Into<String>) -> Self {
        Self {
            dataset,
            detail: detail.into(),
        }
    }
}

impl std::fmt::Display for DatasetProblem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.dataset, self.detail)
    }
}

/// Aggregate of every dataset problem found during one load.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{} problem(s) in knowledge base datasets: {}", .problems.len(), join_problems(.problems))]
pub struct DatasetError {
    pub problems: Vec<DatasetProblem>,
}

impl DatasetError {
    /// `Ok(())` when nothing was collected, otherwise the aggregate.
    pub fn check(problems: Vec<DatasetProblem>) -> Result<(), DatasetError> {
        if problems.is_empty() {
            Ok(())
        } else {
            Err(DatasetError { problems })
        }
    }

    pub fn single(dataset: DatasetKind, detail: impl Into<String>) -> Self {
        Self {
            problems: vec![DatasetProblem::new(dataset, detail)],
        }
    }
}

fn join_problems(problems: &[DatasetProblem]) -> String {
    problems
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aggregate_lists_every_problem() {
        let err = DatasetError {
            problems: vec![
                DatasetProblem::new(DatasetKind::Genmac, "no doctor profiles"),
                DatasetProblem::new(DatasetKind::PatchNotes, "file not found"),
            ],
        };
        let msg = err.to_string();
        assert!(msg.starts_with("2 problem(s)"));
        assert!(msg.contains("genmac.json: no doctor profiles"));
        assert!(msg.contains("patch-notes.json: file not found"));
    }

    #[test]
    fn check_passes_when_empty() {
        assert!(DatasetError::check(Vec::new()).is_ok());
        let err = DatasetError::check(vec![DatasetProblem::new(DatasetKind::ProcedureRules, "x")])
            .unwrap_err();
        assert_eq!(err.problems.len(), 1);
    }

    #[test]
    fn knowledge_error_labels_source() {
        let err: KnowledgeError = DatasetError::single(DatasetKind::OtherProcedures, "bad").into();
        assert!(err.to_string().starts_with("Dataset error:"));

        let err: KnowledgeError = FormatterError::InvalidDuration { value: -10.0 }.into();
        assert!(err.to_string().contains("-10"));
    }
}
