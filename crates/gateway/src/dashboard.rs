//! Dashboard data view.
//!
//! The dashboard front end reads the raw datasets rather than the compiled
//! document, in the same shape as the files on disk.

use pepil_knowledge::{
    AncillaryProcedureRecord, DoctorProfile, KnowledgeBase, OrderingRule, OverrideRule, PatchNote,
    ProcedureCategory,
};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardData {
    pub doctors: Vec<DoctorProfile>,
    pub face: Vec<TimedProcedure>,
    pub body: Vec<TimedProcedure>,
    pub injection: Vec<TimedProcedure>,
    pub overrides: Vec<OverrideRule>,
    pub other_procedure_data: Vec<AncillaryProcedureRecord>,
    pub patch_notes: Vec<PatchNote>,
    pub rules: Vec<OrderingRule>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TimedProcedure {
    pub name: String,
    pub seconds: u32,
}

impl DashboardData {
    pub fn from_knowledge(kb: &KnowledgeBase) -> Self {
        let table = |category: ProcedureCategory| -> Vec<TimedProcedure> {
            kb.procedures_in(category)
                .map(|p| TimedProcedure {
                    name: p.name.clone(),
                    seconds: p.base_seconds,
                })
                .collect()
        };

        Self {
            doctors: kb.doctors.clone(),
            face: table(ProcedureCategory::FaceLaser),
            body: table(ProcedureCategory::BodyLaser),
            injection: table(ProcedureCategory::Injection),
            overrides: kb.overrides.clone(),
            other_procedure_data: kb.ancillary.clone(),
            patch_notes: kb.patch_notes.clone(),
            rules: kb.rules.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pepil_knowledge::ProcedureTimeRecord;

    #[test]
    fn procedures_are_split_back_into_tables() {
        let kb = KnowledgeBase {
            procedures: vec![
                ProcedureTimeRecord {
                    name: "레이저 토닝".into(),
                    category: ProcedureCategory::FaceLaser,
                    base_seconds: 600,
                },
                ProcedureTimeRecord {
                    name: "보톡스".into(),
                    category: ProcedureCategory::Injection,
                    base_seconds: 300,
                },
            ],
            ..KnowledgeBase::default()
        };

        let json = serde_json::to_value(DashboardData::from_knowledge(&kb)).unwrap();
        assert_eq!(json["face"], serde_json::json!([{"name": "레이저 토닝", "seconds": 600}]));
        assert_eq!(json["body"], serde_json::json!([]));
        assert_eq!(json["injection"][0]["name"], "보톡스");
        assert!(json.get("otherProcedureData").is_some());
        assert!(json.get("patchNotes").is_some());
    }
}
