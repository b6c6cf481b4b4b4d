//! Dataset sources and validation.
//!
//! A [`DatasetSource`] yields a validated [`KnowledgeBase`] or a single
//! [`DatasetError`] listing every problem it found.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::error::{DatasetError, DatasetKind, DatasetProblem};
use crate::model::{
    AncillaryProcedureRecord, DoctorProfile, KnowledgeBase, OrderingRule, OverrideRule, PatchNote,
    ProcedureCategory, ProcedureTimeRecord, Team,
};

/// Where the compiler gets its datasets from.
pub trait DatasetSource: Send + Sync {
    /// Load and validate all datasets.
    fn load(&self) -> Result<KnowledgeBase, DatasetError>;

    /// Human-readable origin, for logs.
    fn describe(&self) -> String;
}

/// An in-memory knowledge base is its own source, validated on every load.
impl DatasetSource for KnowledgeBase {
    fn load(&self) -> Result<KnowledgeBase, DatasetError> {
        DatasetError::check(validate(self))?;
        Ok(self.clone())
    }

    fn describe(&self) -> String {
        "in-memory".into()
    }
}

impl<T: DatasetSource + ?Sized> DatasetSource for Arc<T> {
    fn load(&self) -> Result<KnowledgeBase, DatasetError> {
        (**self).load()
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}

/// Reads the four JSON dataset files from one directory.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    dir: PathBuf,
}

/// Shape of `genmac.json`: doctors plus the three per-category time tables.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenmacFile {
    doctors: Vec<DoctorProfile>,
    face: Vec<TimedProcedure>,
    body: Vec<TimedProcedure>,
    injection: Vec<TimedProcedure>,
    #[serde(default)]
    overrides: Vec<OverrideRule>,
}

#[derive(Debug, Deserialize)]
struct TimedProcedure {
    name: String,
    seconds: u32,
}

impl GenmacFile {
    fn procedures(
        face: Vec<TimedProcedure>,
        body: Vec<TimedProcedure>,
        injection: Vec<TimedProcedure>,
    ) -> Vec<ProcedureTimeRecord> {
        let tagged = [
            (ProcedureCategory::FaceLaser, face),
            (ProcedureCategory::BodyLaser, body),
            (ProcedureCategory::Injection, injection),
        ];
        tagged
            .into_iter()
            .flat_map(|(category, entries)| {
                entries.into_iter().map(move |e| ProcedureTimeRecord {
                    name: e.name,
                    category,
                    base_seconds: e.seconds,
                })
            })
            .collect()
    }
}

impl DirectorySource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Full path of one dataset file.
    pub fn path_of(&self, kind: DatasetKind) -> PathBuf {
        self.dir.join(kind.file_name())
    }

    fn read<T: DeserializeOwned>(
        &self,
        kind: DatasetKind,
        problems: &mut Vec<DatasetProblem>,
    ) -> Option<T> {
        let path = self.path_of(kind);
        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                problems.push(DatasetProblem::new(
                    kind,
                    format!("file not found at {}", path.display()),
                ));
                return None;
            }
            Err(e) => {
                problems.push(DatasetProblem::new(
                    kind,
                    format!("cannot read {}: {e}", path.display()),
                ));
                return None;
            }
        };

        match serde_json::from_str(&content) {
            Ok(value) => {
                debug!(file = %path.display(), bytes = content.len(), "Loaded dataset");
                Some(value)
            }
            Err(e) => {
                problems.push(DatasetProblem::new(kind, format!("malformed JSON: {e}")));
                None
            }
        }
    }
}

impl DatasetSource for DirectorySource {
    fn load(&self) -> Result<KnowledgeBase, DatasetError> {
        let mut problems = Vec::new();

        let rules: Option<Vec<OrderingRule>> = self.read(DatasetKind::ProcedureRules, &mut problems);
        let genmac: Option<GenmacFile> = self.read(DatasetKind::Genmac, &mut problems);
        let ancillary: Option<Vec<AncillaryProcedureRecord>> =
            self.read(DatasetKind::OtherProcedures, &mut problems);
        let patch_notes: Option<Vec<PatchNote>> = self.read(DatasetKind::PatchNotes, &mut problems);

        let (Some(rules), Some(genmac), Some(ancillary), Some(patch_notes)) =
            (rules, genmac, ancillary, patch_notes)
        else {
            warn!(problems = problems.len(), dir = %self.dir.display(), "Dataset files could not be loaded");
            return Err(DatasetError { problems });
        };

        let kb = KnowledgeBase {
            rules,
            doctors: genmac.doctors,
            procedures: GenmacFile::procedures(genmac.face, genmac.body, genmac.injection),
            overrides: genmac.overrides,
            ancillary,
            patch_notes,
        };

        problems.extend(validate(&kb));
        if !problems.is_empty() {
            warn!(problems = problems.len(), dir = %self.dir.display(), "Dataset validation failed");
        }
        DatasetError::check(problems)?;
        Ok(kb)
    }

    fn describe(&self) -> String {
        self.dir.display().to_string()
    }
}

/// Every semantic problem in an otherwise well-formed knowledge base.
pub fn validate(kb: &KnowledgeBase) -> Vec<DatasetProblem> {
    let mut problems = Vec::new();
    let genmac = |detail: String| DatasetProblem::new(DatasetKind::Genmac, detail);

    if kb.doctors.is_empty() {
        problems.push(genmac("no doctor profiles".into()));
    }

    let mut doctor_ids = HashSet::new();
    for doctor in &kb.doctors {
        if !doctor_ids.insert(doctor.id.as_str()) {
            problems.push(genmac(format!("duplicate doctor id '{}'", doctor.id)));
        }
        for category in ProcedureCategory::ALL {
            let c = doctor.coefficient(category);
            if !c.is_finite() || c <= 0.0 {
                problems.push(genmac(format!(
                    "doctor '{}' has invalid {} coefficient {c}",
                    doctor.id,
                    category.label()
                )));
            }
        }
    }

    let procedure_names: HashSet<&str> = kb.procedures.iter().map(|p| p.name.as_str()).collect();
    let mut override_pairs = HashSet::new();
    for rule in &kb.overrides {
        if !doctor_ids.contains(rule.doctor_id.as_str()) {
            problems.push(genmac(format!("override for unknown doctor id '{}'", rule.doctor_id)));
        }
        if !procedure_names.contains(rule.procedure.as_str()) {
            problems.push(genmac(format!("override for unknown procedure '{}'", rule.procedure)));
        }
        if !override_pairs.insert((rule.doctor_id.as_str(), rule.procedure.as_str())) {
            problems.push(genmac(format!(
                "duplicate override for ('{}', '{}')",
                rule.doctor_id, rule.procedure
            )));
        }
    }

    for record in &kb.ancillary {
        if record.team == Team::SkinCare && record.category.is_none() {
            problems.push(DatasetProblem::new(
                DatasetKind::OtherProcedures,
                format!("skin-care procedure '{}' has no category", record.name),
            ));
        }
    }

    problems
}
