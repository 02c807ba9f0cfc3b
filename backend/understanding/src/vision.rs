/// Vision understanding: simulated dental assessment of an uploaded photo.
///
/// Stands in for a vision-model call: the report is generated from a fixed
/// catalog with a generator seeded by the image identifier, so the same
/// identifier always yields the same report. Pixel data is never read.
use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use sha2::{Digest, Sha256};
use smilecheck_core::{AnalysisProvider, ImageRef, SmileError};
use tracing::debug;

pub const REPORT_TITLE: &str = "Relatório de avaliação odontológica automatizada:";

pub const GENERAL_ADVICE: &str = "Recomendações gerais: reforçar higiene bucal, fio dental diário e acompanhamento com dentista de confiança.";

/// Number of issues reported per image.
pub const FINDINGS_PER_REPORT: usize = 3;

/// Characters of the instructions echoed back in the report.
const INSTRUCTIONS_PREVIEW_CHARS: usize = 120;

pub const ISSUE_CATALOG: [&str; 4] = [
    "cárie incipiente no molar superior esquerdo",
    "placa bacteriana nas gengivas inferiores",
    "desalinhamento leve dos incisivos centrais",
    "desgaste no canino inferior direito",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Leve,
    Moderada,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Leve => "leve",
            Self::Moderada => "moderada",
        }
    }

    pub fn recommendation(self) -> &'static str {
        match self {
            Self::Leve => "Recomenda acompanhamento preventivo e profilaxia profissional.",
            Self::Moderada => {
                "Indica avaliação clínica presencial e possível intervenção restauradora."
            }
        }
    }
}

/// Produce the raw assessment report for `identifier`.
pub fn run_analysis(identifier: &str, instructions: &str) -> String {
    let mut rng = seeded_rng(identifier);

    let preview: String = instructions.trim().chars().take(INSTRUCTIONS_PREVIEW_CHARS).collect();
    let mut lines = vec![
        REPORT_TITLE.to_string(),
        format!("Instruções aplicadas: {preview}..."),
    ];

    let picked: Vec<&str> = ISSUE_CATALOG
        .choose_multiple(&mut rng, FINDINGS_PER_REPORT)
        .copied()
        .collect();
    for issue in picked {
        let severity = if rng.gen_bool(0.5) { Severity::Leve } else { Severity::Moderada };
        lines.push(format!(
            "- Problema: {issue} | Gravidade: {}. {}",
            severity.as_str(),
            severity.recommendation()
        ));
    }

    lines.push(GENERAL_ADVICE.to_string());
    lines.join("\n")
}

/// Generator seeded from the SHA-256 digest of the identifier.
fn seeded_rng(identifier: &str) -> StdRng {
    let seed: [u8; 32] = Sha256::digest(identifier.as_bytes()).into();
    StdRng::from_seed(seed)
}

/// [`AnalysisProvider`] backed by [`run_analysis`].
#[derive(Debug, Default, Clone)]
pub struct SeededVisionAnalyzer;

impl SeededVisionAnalyzer {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl AnalysisProvider for SeededVisionAnalyzer {
    fn name(&self) -> &str {
        "seeded-vision"
    }

    async fn analyze(&self, image: &ImageRef, instructions: &str) -> Result<String, SmileError> {
        debug!(
            "[Vision] Simulating analysis of {} (seed {})",
            image.path.display(),
            image.identifier
        );
        Ok(run_analysis(&image.identifier, instructions))
    }
}
