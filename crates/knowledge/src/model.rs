//! Source data model.
//!
//! Every record is immutable once loaded. Collections keep the order they
//! had in the source files; the rendered document follows that order.

use serde::{Deserialize, Serialize};

/// Coefficient value meaning "baseline speed".
pub const BASELINE_COEFFICIENT: f64 = 10.0;

/// Which per-doctor coefficient applies to a procedure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ProcedureCategory {
    FaceLaser,
    BodyLaser,
    Injection,
}

impl ProcedureCategory {
    /// Canonical rendering order.
    pub const ALL: [ProcedureCategory; 3] = [
        ProcedureCategory::FaceLaser,
        ProcedureCategory::BodyLaser,
        ProcedureCategory::Injection,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ProcedureCategory::FaceLaser => "얼굴 레이저",
            ProcedureCategory::BodyLaser => "바디 레이저",
            ProcedureCategory::Injection => "주사",
        }
    }
}

/// A doctor's relative speed per category; 10 is baseline, higher is slower.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DoctorProfile {
    pub id: String,
    pub name: String,
    pub face: f64,
    pub body: f64,
    pub injection: f64,
}

impl DoctorProfile {
    pub fn coefficient(&self, category: ProcedureCategory) -> f64 {
        match category {
            ProcedureCategory::FaceLaser => self.face,
            ProcedureCategory::BodyLaser => self.body,
            ProcedureCategory::Injection => self.injection,
        }
    }
}

/// A procedure's duration measured at baseline speed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcedureTimeRecord {
    pub name: String,
    pub category: ProcedureCategory,
    #[serde(rename = "seconds")]
    pub base_seconds: u32,
}

/// A measured duration for one (doctor, procedure) pair that replaces the
/// coefficient model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverrideRule {
    pub doctor_id: String,
    pub procedure: String,
    pub seconds: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Team {
    Nursing,
    SkinCare,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SkinCareCategory {
    Lifting,
    Laser,
    Peel,
}

impl SkinCareCategory {
    /// Canonical rendering order.
    pub const ALL: [SkinCareCategory; 3] = [
        SkinCareCategory::Lifting,
        SkinCareCategory::Laser,
        SkinCareCategory::Peel,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            SkinCareCategory::Lifting => "리프팅",
            SkinCareCategory::Laser => "레이저",
            SkinCareCategory::Peel => "필링",
        }
    }
}

/// A nursing or skin-care team procedure. Durations are in minutes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AncillaryProcedureRecord {
    pub name: String,
    pub team: Team,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<SkinCareCategory>,
    pub minutes: u32,
    /// 0 means no anesthesia.
    #[serde(default)]
    pub anesthesia_minutes: u32,
}

/// Either a general principle or a recommended order for a set of procedures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OrderingRule {
    Principle {
        name: String,
        description: String,
    },
    Combination {
        name: String,
        procedures: Vec<String>,
        order: String,
        reason: String,
    },
}

impl OrderingRule {
    pub fn name(&self) -> &str {
        match self {
            OrderingRule::Principle { name, .. } | OrderingRule::Combination { name, .. } => name,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatchNote {
    pub version: String,
    pub date: String,
    pub notes: Vec<String>,
}

/// All loaded datasets.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeBase {
    pub rules: Vec<OrderingRule>,
    pub doctors: Vec<DoctorProfile>,
    pub procedures: Vec<ProcedureTimeRecord>,
    pub overrides: Vec<OverrideRule>,
    pub ancillary: Vec<AncillaryProcedureRecord>,
    pub patch_notes: Vec<PatchNote>,
}

impl KnowledgeBase {
    /// Procedures of one category, in source order.
    pub fn procedures_in(
        &self,
        category: ProcedureCategory,
    ) -> impl Iterator<Item = &ProcedureTimeRecord> {
        self.procedures.iter().filter(move |p| p.category == category)
    }

    /// Ancillary records owned by `team`, in source order.
    pub fn team_procedures(&self, team: Team) -> impl Iterator<Item = &AncillaryProcedureRecord> {
        self.ancillary.iter().filter(move |r| r.team == team)
    }
}
