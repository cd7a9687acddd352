//! Static question and segment tables, keyed by quiz section.

use std::{fmt, str::FromStr, sync::LazyLock};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError, ValidationErrors};

/// Every metric column a segment exposes, in presenter order.
pub const METRIC_COLUMNS: [&str; 5] = [
    "clients",
    "activeClients",
    "assets",
    "principality",
    "earningPower",
];

/// Sentinel `revealColumn` value meaning "disclose every metric column".
const REVEAL_ALL: &str = "all";

static EMPTY_SECTION: LazyLock<SectionContent> = LazyLock::new(SectionContent::default);

/// Named phase of the quiz, each with its own questions and segment table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Section {
    /// Banking groups.
    #[default]
    Groups,
    /// Retail banking segments.
    Personas,
    /// Business banking segments.
    Empresas,
}

impl Section {
    /// Sections in play order.
    pub const ALL: [Section; 3] = [Section::Groups, Section::Personas, Section::Empresas];

    /// Wire name of the section.
    pub fn as_str(self) -> &'static str {
        match self {
            Section::Groups => "groups",
            Section::Personas => "personas",
            Section::Empresas => "empresas",
        }
    }

    /// Section played after this one, `None` for the last section.
    pub fn next(self) -> Option<Section> {
        match self {
            Section::Groups => Some(Section::Personas),
            Section::Personas => Some(Section::Empresas),
            Section::Empresas => None,
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown section name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown section `{0}`")]
pub struct UnknownSection(pub String);

impl FromStr for Section {
    type Err = UnknownSection;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Section::ALL
            .into_iter()
            .find(|section| section.as_str() == value)
            .ok_or_else(|| UnknownSection(value.to_string()))
    }
}

/// Business-metrics record displayed on the presenter matrix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Segment {
    pub id: u32,
    pub name: String,
    pub clients: u64,
    /// Total assets held by the segment.
    pub assets: f64,
    /// Share of assets for which the bank is the principal bank (0–1).
    pub principality: f64,
    pub earning_power: f64,
}

/// Column disclosed when a question's answer is revealed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RevealColumn {
    /// Disclose every entry of [`METRIC_COLUMNS`].
    All,
    /// Disclose a single named column.
    Column(String),
}

impl RevealColumn {
    /// Column identifiers this reveal discloses.
    pub fn columns(&self) -> Vec<&str> {
        match self {
            RevealColumn::All => METRIC_COLUMNS.to_vec(),
            RevealColumn::Column(column) => vec![column.as_str()],
        }
    }
}

impl From<String> for RevealColumn {
    fn from(value: String) -> Self {
        if value == REVEAL_ALL {
            RevealColumn::All
        } else {
            RevealColumn::Column(value)
        }
    }
}

impl From<RevealColumn> for String {
    fn from(value: RevealColumn) -> Self {
        match value {
            RevealColumn::All => REVEAL_ALL.to_string(),
            RevealColumn::Column(column) => column,
        }
    }
}

/// Intended effect of an option on a segment metric. Carried as content only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Impact {
    pub segment_id: u32,
    pub metric: String,
    pub change: f64,
}

/// Answer option of a question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct QuestionOption {
    pub text: String,
    #[serde(default)]
    pub impact: Vec<Impact>,
}

/// Multiple-choice question tied to a metric column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_correct_option"))]
pub struct Question {
    pub id: u32,
    pub text: String,
    /// Metric column name, or `"all"`.
    #[schema(value_type = String)]
    pub reveal_column: RevealColumn,
    pub correct_option_index: usize,
    #[validate(length(min = 1, message = "a question needs at least one option"))]
    pub options: Vec<QuestionOption>,
}

fn validate_correct_option(question: &Question) -> Result<(), ValidationError> {
    if question.correct_option_index < question.options.len() {
        return Ok(());
    }

    let mut err = ValidationError::new("correct_option_index_range");
    err.message = Some(
        format!(
            "question {} points at option {} but only has {}",
            question.id,
            question.correct_option_index,
            question.options.len()
        )
        .into(),
    );
    Err(err)
}

/// Questions and initial segments of one section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema, Validate)]
pub struct SectionContent {
    #[validate(nested)]
    #[serde(default)]
    pub questions: Vec<Question>,
    #[serde(default)]
    pub segments: Vec<Segment>,
}

/// Read-only lookup from section to its content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentCatalog {
    sections: IndexMap<Section, SectionContent>,
}

impl ContentCatalog {
    /// Build a catalog from explicit per-section content.
    pub fn new(sections: IndexMap<Section, SectionContent>) -> Self {
        Self { sections }
    }

    /// Content of `section`, or an empty section when the catalog has none.
    pub fn section(&self, section: Section) -> &SectionContent {
        self.sections.get(&section).unwrap_or(&EMPTY_SECTION)
    }

    /// Resolve a section by wire name; unknown names resolve to an empty section.
    pub fn resolve(&self, name: &str) -> &SectionContent {
        name.parse::<Section>()
            .map(|section| self.section(section))
            .unwrap_or(&EMPTY_SECTION)
    }

    /// Question at `index` of `section`, if the index is in range.
    pub fn question(&self, section: Section, index: i64) -> Option<&Question> {
        let index = usize::try_from(index).ok()?;
        self.section(section).questions.get(index)
    }

    /// Number of questions in `section`.
    pub fn question_count(&self, section: Section) -> usize {
        self.section(section).questions.len()
    }

    /// Initial segments displayed when `section` starts.
    pub fn initial_segments(&self, section: Section) -> Vec<Segment> {
        self.section(section).segments.clone()
    }

    /// Section a new game starts in.
    pub fn first_section(&self) -> Section {
        Section::ALL[0]
    }

    /// Section played after `section`, `None` once the quiz is over.
    pub fn next_section(&self, section: Section) -> Option<Section> {
        section.next()
    }

    /// Check every question of every section.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        for content in self.sections.values() {
            content.validate()?;
        }
        Ok(())
    }
}

impl Default for ContentCatalog {
    fn default() -> Self {
        Self::new(default_sections())
    }
}

fn segment(
    id: u32,
    name: &str,
    clients: u64,
    assets: f64,
    principality: f64,
    earning_power: f64,
) -> Segment {
    Segment {
        id,
        name: name.to_string(),
        clients,
        assets,
        principality,
        earning_power,
    }
}

fn question(id: u32, text: &str, reveal: &str, correct: usize, options: &[&str]) -> Question {
    Question {
        id,
        text: text.to_string(),
        reveal_column: RevealColumn::from(reveal.to_string()),
        correct_option_index: correct,
        options: options
            .iter()
            .map(|text| QuestionOption {
                text: text.to_string(),
                impact: Vec::new(),
            })
            .collect(),
    }
}

/// Built-in content shipped with the binary.
fn default_sections() -> IndexMap<Section, SectionContent> {
    let groups = SectionContent {
        questions: vec![
            question(
                1,
                "¿Cuántos clientes hay en el segmento Inclusión?",
                "clients",
                0,
                &["5,000", "2,500", "800", "250"],
            ),
            question(
                2,
                "¿Cuál es el porcentaje de clientes activos en el segmento Clásico?",
                "assets",
                0,
                &["15.0%", "10.0%", "25.0%", "5.0%"],
            ),
            question(
                3,
                "¿Cuál es el porcentaje de principalidad en el segmento Premium?",
                "principality",
                0,
                &["25.0%", "35.0%", "15.0%", "45.0%"],
            ),
            question(
                4,
                "¿Cuál es el Earning Power de un cliente Premium Plus?",
                "earningPower",
                0,
                &["$210M", "$320M", "$140M", "$90M"],
            ),
        ],
        segments: vec![
            segment(1, "Inclusión", 5_000, 1_200.0, 0.12, 40.0),
            segment(2, "Clásico", 3_200, 2_800.0, 0.18, 95.0),
            segment(3, "Premium", 1_100, 4_500.0, 0.25, 140.0),
            segment(4, "Premium Plus", 300, 6_100.0, 0.31, 210.0),
        ],
    };

    let personas = SectionContent {
        questions: vec![
            question(
                5,
                "¿Qué segmento de Banca Personas tiene más clientes?",
                "clients",
                1,
                &["Jóvenes", "Masivo", "Pensionados", "Alto Valor"],
            ),
            question(
                6,
                "¿Cuál segmento concentra la mayor principalidad?",
                "principality",
                2,
                &["Jóvenes", "Masivo", "Pensionados", "Alto Valor"],
            ),
            question(
                7,
                "¿Qué segmento aporta el mayor Earning Power?",
                "all",
                3,
                &["Jóvenes", "Masivo", "Pensionados", "Alto Valor"],
            ),
        ],
        segments: vec![
            segment(1, "Jóvenes", 2_400, 300.0, 0.08, 12.0),
            segment(2, "Masivo", 9_800, 3_900.0, 0.21, 88.0),
            segment(3, "Pensionados", 1_700, 2_100.0, 0.44, 61.0),
            segment(4, "Alto Valor", 650, 5_400.0, 0.37, 175.0),
        ],
    };

    let empresas = SectionContent {
        questions: vec![
            question(
                8,
                "¿Cuántos clientes tiene el segmento Pyme?",
                "clients",
                0,
                &["12,000", "4,500", "30,000", "1,200"],
            ),
            question(
                9,
                "¿Qué segmento de Banca Empresas tiene más activos?",
                "assets",
                2,
                &["Pyme", "Empresarial", "Corporativo", "Gobierno"],
            ),
            question(
                10,
                "¿Cuál es el Earning Power del segmento Corporativo?",
                "all",
                1,
                &["$150M", "$480M", "$75M", "$900M"],
            ),
        ],
        segments: vec![
            segment(1, "Pyme", 12_000, 2_600.0, 0.15, 70.0),
            segment(2, "Empresarial", 3_100, 5_200.0, 0.22, 160.0),
            segment(3, "Corporativo", 420, 11_800.0, 0.29, 480.0),
            segment(4, "Gobierno", 90, 7_300.0, 0.35, 220.0),
        ],
    };

    IndexMap::from([
        (Section::Groups, groups),
        (Section::Personas, personas),
        (Section::Empresas, empresas),
    ])
}
