//! Knowledge base compaction.
//!
//! Three tabular datasets (per-disease descriptions, per-disease precautions and per-record
//! symptom lists) are folded into one [`DiseaseRecord`] per disease and rendered into the flat
//! text artifact that grounds the advice resolver.
//!
//! ## Artifact grammar
//!
//! A fixed two-line header, a blank gap, then one block per disease in lexicographic order:
//!
//! ```text
//! DISEASE: <name>
//! DESCRIPTION: <description>
//! COMMON SYMPTOMS: <comma-joined sorted symptoms>
//! RECOMMENDED PRECAUTIONS/TREATMENTS: <comma-joined precautions>
//! ----------------------------------------
//! ```
//!
//! The rendering is a pure function of the input rows, so rebuilding from the same datasets
//! yields a byte-identical file.

pub mod sources;

use crate::constants::{
    DEFAULT_DESCRIPTION, DEFAULT_PRECAUTIONS, DESCRIPTION_CSV_FILENAME, DISEASE_BLOCK_SEPARATOR,
    KNOWLEDGE_BASE_PREAMBLE, KNOWLEDGE_BASE_TITLE, PRECAUTION_COLUMNS, PRECAUTION_CSV_FILENAME,
    SYMPTOM_CSV_FILENAME,
};
use crate::{AssistantError, AssistantResult};
use sources::{DescriptionRow, PrecautionRow, SymptomRow};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Canonical, merged view of one disease across the three datasets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiseaseRecord {
    pub name: String,
    pub description: String,
    /// Normalised symptoms; the set keeps them deduplicated and sorted.
    pub symptoms: BTreeSet<String>,
    /// Up to four precautions in source column order.
    pub precautions: Vec<String>,
}

/// Merge the three datasets into one record per disease, ordered by name.
///
/// The symptom dataset defines which diseases exist. Descriptions and precautions are looked
/// up by trimmed, case-insensitive disease name; the last row for a disease wins, as it does
/// in the spreadsheets these datasets are exported from. Rows without a disease are skipped.
pub fn compact(
    description_rows: &[DescriptionRow],
    precaution_rows: &[PrecautionRow],
    symptom_rows: &[SymptomRow],
) -> Vec<DiseaseRecord> {
    let descriptions: HashMap<String, &str> = description_rows
        .iter()
        .filter_map(|row| {
            let key = disease_key(row.disease.as_deref())?;
            let description = row.description.as_deref()?.trim();
            (!description.is_empty()).then_some((key, description))
        })
        .collect();

    let precautions: HashMap<String, Vec<String>> = precaution_rows
        .iter()
        .filter_map(|row| {
            let key = disease_key(row.disease.as_deref())?;
            let list = row
                .precautions
                .iter()
                .take(PRECAUTION_COLUMNS)
                .flatten()
                .map(|p| p.trim())
                .filter(|p| !p.is_empty())
                .map(capitalize)
                .collect();
            Some((key, list))
        })
        .collect();

    // Keyed by normalised name; the first spelling seen in the symptom dataset is displayed.
    let mut diseases: BTreeMap<String, (String, BTreeSet<String>)> = BTreeMap::new();
    for row in symptom_rows {
        let Some(key) = disease_key(row.disease.as_deref()) else {
            continue;
        };
        let (_, symptoms) = diseases.entry(key).or_insert_with(|| {
            let name = row.disease.as_deref().unwrap_or_default().trim().to_string();
            (name, BTreeSet::new())
        });
        symptoms.extend(
            row.symptoms
                .iter()
                .flatten()
                .filter_map(|s| normalize_symptom(s)),
        );
    }

    let mut records: Vec<DiseaseRecord> = diseases
        .into_iter()
        .map(|(key, (name, symptoms))| DiseaseRecord {
            description: descriptions
                .get(&key)
                .map(|d| d.to_string())
                .unwrap_or_else(|| DEFAULT_DESCRIPTION.to_string()),
            precautions: precautions.get(&key).cloned().unwrap_or_default(),
            name,
            symptoms,
        })
        .collect();

    records.sort_by(|a, b| a.name.cmp(&b.name));
    records
}

/// Render compacted records into the knowledge base text artifact.
pub fn render(records: &[DiseaseRecord]) -> String {
    let mut lines: Vec<String> = vec![
        KNOWLEDGE_BASE_TITLE.to_string(),
        KNOWLEDGE_BASE_PREAMBLE.to_string(),
        "\n".to_string(),
    ];

    for record in records {
        lines.push(format!("DISEASE: {}", record.name));
        lines.push(format!("DESCRIPTION: {}", record.description));

        let symptoms: Vec<&str> = record.symptoms.iter().map(String::as_str).collect();
        lines.push(format!("COMMON SYMPTOMS: {}", symptoms.join(", ")));

        let precautions = if record.precautions.is_empty() {
            DEFAULT_PRECAUTIONS.to_string()
        } else {
            record.precautions.join(", ")
        };
        lines.push(format!("RECOMMENDED PRECAUTIONS/TREATMENTS: {precautions}"));
        lines.push(DISEASE_BLOCK_SEPARATOR.to_string());
    }

    lines.join("\n")
}

/// Locations of the three source datasets.
#[derive(Debug, Clone)]
pub struct KnowledgeSources {
    pub descriptions: PathBuf,
    pub precautions: PathBuf,
    pub symptoms: PathBuf,
}

impl KnowledgeSources {
    /// Sources named the way the public symptom dataset export names them.
    pub fn in_dir(data_dir: &Path) -> Self {
        Self {
            descriptions: data_dir.join(DESCRIPTION_CSV_FILENAME),
            precautions: data_dir.join(PRECAUTION_CSV_FILENAME),
            symptoms: data_dir.join(SYMPTOM_CSV_FILENAME),
        }
    }
}

/// Load all three datasets and compact them.
///
/// Any missing file, missing column or unreadable row aborts the build; a partial knowledge
/// base is never produced.
pub fn compact_sources(sources: &KnowledgeSources) -> AssistantResult<Vec<DiseaseRecord>> {
    let descriptions = sources::load_description_rows(&sources.descriptions)?;
    let precautions = sources::load_precaution_rows(&sources.precautions)?;
    let symptoms = sources::load_symptom_rows(&sources.symptoms)?;

    tracing::info!(
        descriptions = descriptions.len(),
        precautions = precautions.len(),
        symptom_rows = symptoms.len(),
        "loaded knowledge sources"
    );

    Ok(compact(&descriptions, &precautions, &symptoms))
}

/// Write the rendered artifact, replacing any previous file in one rename.
pub fn write_knowledge_base(path: &Path, text: &str) -> AssistantResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(AssistantError::KnowledgeWrite)?;
    }

    let tmp_path = path.with_extension("txt.tmp");
    fs::write(&tmp_path, text).map_err(AssistantError::KnowledgeWrite)?;
    if let Err(e) = fs::rename(&tmp_path, path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(AssistantError::KnowledgeWrite(e));
    }

    Ok(())
}

/// Build the knowledge base from its sources and write it to `output`.
///
/// Returns the number of diseases written.
pub fn build_knowledge_base(sources: &KnowledgeSources, output: &Path) -> AssistantResult<usize> {
    let records = compact_sources(sources)?;
    write_knowledge_base(output, &render(&records))?;

    tracing::info!(
        diseases = records.len(),
        "knowledge base written to {}",
        output.display()
    );
    Ok(records.len())
}

/// The loaded knowledge base text, shared read-only by every request.
#[derive(Debug, Clone)]
pub struct KnowledgeBase {
    text: Arc<str>,
}

impl KnowledgeBase {
    pub fn from_text(text: impl Into<Arc<str>>) -> Self {
        Self { text: text.into() }
    }

    /// Read the artifact from disk.
    pub fn load(path: &Path) -> AssistantResult<Self> {
        let text =
            fs::read_to_string(path).map_err(|source| AssistantError::KnowledgeSourceMissing {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(Self::from_text(text))
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }
}

fn disease_key(disease: Option<&str>) -> Option<String> {
    let trimmed = disease?.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_lowercase())
}

/// `" continuous_sneezing"` becomes `"Continuous sneezing"`.
fn normalize_symptom(raw: &str) -> Option<String> {
    let cleaned = raw.trim().replace('_', " ");
    let cleaned = cleaned.trim();
    (!cleaned.is_empty()).then(|| capitalize(cleaned))
}

/// Upper-case the first character and lower-case the rest.
fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}
