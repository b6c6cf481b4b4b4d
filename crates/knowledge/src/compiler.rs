//! Document assembly and memoization.
//!
//! [`assemble`] is the pure function from datasets to document text.
//! [`KnowledgeCompiler`] owns a [`DatasetSource`] and remembers the first
//! successful result for as long as the compiler itself lives.

use std::sync::OnceLock;

use tracing::{debug, info};

use crate::adjust::OverrideTable;
use crate::error::{FormatterError, KnowledgeError};
use crate::model::{KnowledgeBase, ProcedureCategory, Team};
use crate::sections::{self, Section};
use crate::source::DatasetSource;

/// Render every section in canonical order and join them with blank lines.
///
/// Section order never depends on the input; only the lines inside a section
/// follow the record order of its dataset.
pub fn assemble(kb: &KnowledgeBase) -> Result<String, FormatterError> {
    let overrides = OverrideTable::new(&kb.overrides);

    let mut parts: Vec<Section> = Vec::with_capacity(9);
    parts.push(sections::ordering_rules(&kb.rules));
    parts.push(sections::doctor_profiles(&kb.doctors));
    for category in ProcedureCategory::ALL {
        parts.push(sections::procedure_matrix(
            category,
            kb.procedures_in(category),
            &kb.doctors,
            &overrides,
        )?);
    }
    parts.push(sections::nursing_team(kb.team_procedures(Team::Nursing)));
    parts.push(sections::skin_care_team(&kb.ancillary));
    parts.push(sections::height_correction());
    parts.push(sections::patch_notes(&kb.patch_notes));

    debug!(
        sections = parts.len(),
        overrides = overrides.len(),
        "Rendered knowledge base sections"
    );

    let document = parts
        .iter()
        .map(Section::render)
        .collect::<Vec<_>>()
        .join("\n\n");

    Ok(document.trim().to_string())
}

/// Lazily compiles the knowledge base once and serves the cached text after.
///
/// Concurrent first calls may each build the document; the first one stored
/// wins and every caller receives that same string. A failed build caches
/// nothing.
pub struct KnowledgeCompiler<S> {
    source: S,
    cache: OnceLock<String>,
}

impl<S: DatasetSource> KnowledgeCompiler<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            cache: OnceLock::new(),
        }
    }

    /// The compiled document.
    ///
    /// The first successful call loads the datasets and renders them; later
    /// calls return a reference to the same cached string.
    pub fn compile(&self) -> Result<&str, KnowledgeError> {
        if let Some(document) = self.cache.get() {
            return Ok(document.as_str());
        }

        let kb = self.source.load()?;
        let document = assemble(&kb)?;

        info!(
            source = %self.source.describe(),
            doctors = kb.doctors.len(),
            procedures = kb.procedures.len(),
            bytes = document.len(),
            "Knowledge base compiled"
        );

        Ok(self.cache.get_or_init(|| document).as_str())
    }

    /// Whether a document has been cached yet.
    pub fn is_compiled(&self) -> bool {
        self.cache.get().is_some()
    }

    pub fn source(&self) -> &S {
        &self.source
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{DatasetError, DatasetKind};
    use crate::model::{DoctorProfile, OrderingRule, PatchNote, ProcedureTimeRecord};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn small_kb() -> KnowledgeBase {
        KnowledgeBase {
            doctors: vec![DoctorProfile {
                id: "kim".into(),
                name: "김원장".into(),
                face: 10.0,
                body: 10.0,
                injection: 10.0,
            }],
            procedures: vec![ProcedureTimeRecord {
                name: "레이저 토닝".into(),
                category: ProcedureCategory::FaceLaser,
                base_seconds: 600,
            }],
            patch_notes: vec![PatchNote {
                version: "1.0.0".into(),
                date: "2024-05-01".into(),
                notes: vec!["첫 배포".into()],
            }],
            ..KnowledgeBase::default()
        }
    }

    /// Counts loads so tests can see memoization.
    struct CountingSource {
        kb: KnowledgeBase,
        loads: AtomicUsize,
    }

    impl DatasetSource for CountingSource {
        fn load(&self) -> Result<KnowledgeBase, DatasetError> {
            self.loads.fetch_add(1, Ordering::SeqCst);
            Ok(self.kb.clone())
        }

        fn describe(&self) -> String {
            "counting".into()
        }
    }

    struct BrokenSource;

    impl DatasetSource for BrokenSource {
        fn load(&self) -> Result<KnowledgeBase, DatasetError> {
            Err(DatasetError::single(DatasetKind::Genmac, "file not found"))
        }

        fn describe(&self) -> String {
            "broken".into()
        }
    }

    #[test]
    fn sections_appear_in_canonical_order() {
        let doc = assemble(&small_kb()).unwrap();
        let headers: Vec<&str> = doc.lines().filter(|l| l.starts_with("# ")).collect();
        assert_eq!(
            headers,
            [
                "# 시술 원칙 및 조합 예시",
                "# 원장님별 시술 속도 계수 (기준 10, 숫자가 클수록 시술 시간이 깁니다)",
                "# 얼굴 레이저 시술 시간 (원장님별)",
                "# 바디 레이저 시술 시간 (원장님별)",
                "# 주사 시술 시간 (원장님별)",
                "# 간호팀 시술 시간",
                "# 피부관리팀 시술 시간",
                "# 키 보정 안내",
                "# 최신 업데이트 내역 (패치노트)",
            ]
        );
        assert!(doc.contains("- 레이저 토닝: 김원장 10분"));
        assert!(doc.ends_with("  - 첫 배포"));
    }

    fn headers(doc: &str) -> Vec<&str> {
        doc.lines().filter(|l| l.starts_with("# ")).collect()
    }

    #[test]
    fn reordered_inputs_keep_section_order() {
        let principle = |name: &str| OrderingRule::Principle {
            name: name.into(),
            description: format!("{name} 설명"),
        };
        let release = |version: &str| PatchNote {
            version: version.into(),
            date: "2024-06-01".into(),
            notes: vec![format!("{version} 변경")],
        };

        let mut forward = small_kb();
        forward.rules = vec![principle("감염 방지"), principle("동선 최적화")];
        forward.patch_notes = vec![release("1.1.0"), release("1.0.0")];

        let mut reversed = forward.clone();
        reversed.rules.reverse();
        reversed.patch_notes.reverse();

        let forward_doc = assemble(&forward).unwrap();
        let reversed_doc = assemble(&reversed).unwrap();
        assert_eq!(headers(&forward_doc), headers(&reversed_doc));

        let position = |doc: &str, needle: &str| doc.find(needle).unwrap();
        assert!(position(&forward_doc, "- 감염 방지:") < position(&forward_doc, "- 동선 최적화:"));
        assert!(position(&reversed_doc, "- 동선 최적화:") < position(&reversed_doc, "- 감염 방지:"));
        assert!(position(&forward_doc, "- 버전 1.1.0") < position(&forward_doc, "- 버전 1.0.0"));
        assert!(position(&reversed_doc, "- 버전 1.0.0") < position(&reversed_doc, "- 버전 1.1.0"));
    }

    #[test]
    fn sections_are_separated_by_blank_lines() {
        let doc = assemble(&small_kb()).unwrap();
        assert!(doc.contains("- 등록된 정보가 없습니다.\n\n# 원장님별"));
        assert!(!doc.contains("\n\n\n"));
    }

    #[test]
    fn compile_twice_returns_same_string() {
        let compiler = KnowledgeCompiler::new(CountingSource {
            kb: small_kb(),
            loads: AtomicUsize::new(0),
        });
        assert!(!compiler.is_compiled());

        let first = compiler.compile().unwrap();
        let second = compiler.compile().unwrap();

        assert!(std::ptr::eq(first, second));
        assert_eq!(compiler.source().loads.load(Ordering::SeqCst), 1);
        assert!(compiler.is_compiled());
    }

    #[test]
    fn failed_compile_caches_nothing() {
        let compiler = KnowledgeCompiler::new(BrokenSource);
        let err = compiler.compile().unwrap_err();
        assert!(matches!(err, KnowledgeError::Dataset(_)));
        assert!(!compiler.is_compiled());
        assert!(compiler.compile().is_err());
    }

    #[test]
    fn concurrent_first_calls_agree() {
        let compiler = KnowledgeCompiler::new(CountingSource {
            kb: small_kb(),
            loads: AtomicUsize::new(0),
        });

        let docs: Vec<String> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|_| scope.spawn(|| compiler.compile().unwrap().to_string()))
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        assert!(docs.windows(2).all(|w| w[0] == w[1]));
        let loads = compiler.source().loads.load(Ordering::SeqCst);
        assert!((1..=8).contains(&loads));
    }
}
