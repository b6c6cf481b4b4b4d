//! Section builders.
//!
//! Each builder turns one dataset slice into one [`Section`]. Builders are
//! independent of each other; only [`crate::compiler::assemble`] fixes their
//! order in the document.

use crate::adjust::{OverrideTable, adjust};
use crate::duration::{format_duration, format_minutes};
use crate::error::FormatterError;
use crate::model::{
    AncillaryProcedureRecord, DoctorProfile, OrderingRule, PatchNote, ProcedureCategory,
    ProcedureTimeRecord, SkinCareCategory, Team,
};

/// Line rendered in place of an empty list.
pub const EMPTY_LINE: &str = "- 등록된 정보가 없습니다.";

/// A titled block of the compiled document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub title: String,
    pub lines: Vec<String>,
}

impl Section {
    pub fn new(title: impl Into<String>, lines: Vec<String>) -> Self {
        Self {
            title: title.into(),
            lines,
        }
    }

    /// `# title` followed by the lines, or [`EMPTY_LINE`] when there are none.
    pub fn render(&self) -> String {
        let mut out = format!("# {}", self.title);
        if self.lines.is_empty() {
            out.push('\n');
            out.push_str(EMPTY_LINE);
        }
        for line in &self.lines {
            out.push('\n');
            out.push_str(line);
        }
        out
    }
}

pub fn ordering_rules(rules: &[OrderingRule]) -> Section {
    let lines = rules
        .iter()
        .map(|rule| match rule {
            OrderingRule::Principle { name, description } => format!("- {name}: {description}"),
            OrderingRule::Combination {
                name,
                procedures,
                order,
                reason,
            } => format!(
                "- {name} (시술: {})의 추천 순서는 '{order}' 입니다. (이유: {reason})",
                procedures.join(", ")
            ),
        })
        .collect();

    Section::new("시술 원칙 및 조합 예시", lines)
}

pub fn doctor_profiles(doctors: &[DoctorProfile]) -> Section {
    let lines = doctors
        .iter()
        .map(|d| {
            let coefficients = ProcedureCategory::ALL
                .iter()
                .map(|c| format!("{} {}", c.label(), format_coefficient(d.coefficient(*c))))
                .collect::<Vec<_>>()
                .join(", ");
            format!("- {}: {coefficients}", d.name)
        })
        .collect();

    Section::new(
        "원장님별 시술 속도 계수 (기준 10, 숫자가 클수록 시술 시간이 깁니다)",
        lines,
    )
}

/// Procedures × doctors time matrix for one category.
///
/// One line per procedure (outer loop), one entry per doctor (inner loop),
/// both in source order. Procedures of other categories are skipped.
pub fn procedure_matrix<'a>(
    category: ProcedureCategory,
    procedures: impl IntoIterator<Item = &'a ProcedureTimeRecord>,
    doctors: &[DoctorProfile],
    overrides: &OverrideTable<'_>,
) -> Result<Section, FormatterError> {
    let mut lines = Vec::new();

    for procedure in procedures.into_iter().filter(|p| p.category == category) {
        let mut cells = Vec::with_capacity(doctors.len());
        for doctor in doctors {
            let seconds = adjust(doctor, procedure, overrides)?.seconds();
            cells.push(format!("{} {}", doctor.name, format_duration(seconds)));
        }
        lines.push(format!("- {}: {}", procedure.name, cells.join(", ")));
    }

    Ok(Section::new(format!("{} 시술 시간 (원장님별)", category.label()), lines))
}

pub fn nursing_team<'a>(
    records: impl IntoIterator<Item = &'a AncillaryProcedureRecord>,
) -> Section {
    let lines = records
        .into_iter()
        .filter(|r| r.team == Team::Nursing)
        .map(ancillary_line)
        .collect();

    Section::new("간호팀 시술 시간", lines)
}

/// Skin-care procedures grouped under `## 리프팅`, `## 레이저`, `## 필링`.
pub fn skin_care_team(records: &[AncillaryProcedureRecord]) -> Section {
    let mut lines = Vec::new();

    for (i, category) in SkinCareCategory::ALL.iter().enumerate() {
        if i > 0 {
            lines.push(String::new());
        }
        lines.push(format!("## {}", category.label()));

        let before = lines.len();
        lines.extend(
            records
                .iter()
                .filter(|r| r.team == Team::SkinCare && r.category == Some(*category))
                .map(ancillary_line),
        );
        if lines.len() == before {
            lines.push(EMPTY_LINE.to_string());
        }
    }

    Section::new("피부관리팀 시술 시간", lines)
}

/// Fixed guidance: height adjustment is reasoned about by the model at
/// answer time, not precomputed.
pub fn height_correction() -> Section {
    let lines = [
        "- 위의 바디 레이저 시술 시간은 평균 체형(키 160cm 내외)의 고객을 기준으로 측정한 값입니다.",
        "- 고객의 키가 언급되면 기준보다 큰 만큼 시술 부위가 넓어지므로 바디 레이저 시간을 비례해서 늘려 안내하고, 작으면 줄여서 안내하세요.",
        "- 얼굴 레이저, 주사, 간호팀, 피부관리팀 시술 시간은 키에 따라 보정하지 않습니다.",
        "- 보정한 시간은 반드시 '예상 시간'이라고 밝히고, 어떤 기준으로 보정했는지 함께 설명하세요.",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect();

    Section::new("키 보정 안내", lines)
}

pub fn patch_notes(notes: &[PatchNote]) -> Section {
    let mut lines = Vec::new();

    for (i, patch) in notes.iter().enumerate() {
        if i > 0 {
            lines.push(String::new());
        }
        lines.push(format!("- 버전 {} ({}):", patch.version, patch.date));
        lines.extend(patch.notes.iter().map(|note| format!("  - {note}")));
    }

    Section::new("최신 업데이트 내역 (패치노트)", lines)
}

fn ancillary_line(record: &AncillaryProcedureRecord) -> String {
    let mut line = format!("- {}: 시술 {}", record.name, format_minutes(record.minutes));
    if record.anesthesia_minutes > 0 {
        line.push_str(&format!(" (마취 {})", format_minutes(record.anesthesia_minutes)));
    }
    line
}

/// `12` rather than `12.0`; fractional coefficients keep their digits.
fn format_coefficient(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}
