//! Source dataset rows and their CSV loaders.
//!
//! Each dataset is read by header name rather than position so that column order in the
//! exported spreadsheets does not matter. Loading is all-or-nothing: a missing file, an
//! unreadable row or a dataset without its expected columns fails the whole load. Numbered
//! columns may be partly absent, but at least one of them must be present.

use crate::constants::{DESCRIPTION_COLUMN, DISEASE_COLUMN, PRECAUTION_COLUMNS, SYMPTOM_COLUMNS};
use crate::{AssistantError, AssistantResult};
use std::fs::File;
use std::path::Path;

/// One row of the description dataset (`Disease`, `Description`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DescriptionRow {
    pub disease: Option<String>,
    pub description: Option<String>,
}

/// One row of the precaution dataset (`Disease`, `Precaution_1` .. `Precaution_4`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrecautionRow {
    pub disease: Option<String>,
    /// Cells in column order; `None` for absent columns or empty cells.
    pub precautions: Vec<Option<String>>,
}

/// One row of the symptom dataset (`Disease`, `Symptom_1` .. `Symptom_17`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SymptomRow {
    pub disease: Option<String>,
    /// Cells in column order; `None` for absent columns or empty cells.
    pub symptoms: Vec<Option<String>>,
}

/// Load the description dataset.
pub fn load_description_rows(path: &Path) -> AssistantResult<Vec<DescriptionRow>> {
    let table = Table::open(path)?;
    let description = Some(table.require_column(path, DESCRIPTION_COLUMN)?);

    Ok(table
        .records
        .iter()
        .map(|record| DescriptionRow {
            disease: cell(record, Some(table.disease)),
            description: cell(record, description),
        })
        .collect())
}

/// Load the precaution dataset.
pub fn load_precaution_rows(path: &Path) -> AssistantResult<Vec<PrecautionRow>> {
    let table = Table::open(path)?;
    let columns = table.numbered_columns(path, "Precaution", PRECAUTION_COLUMNS)?;

    Ok(table
        .records
        .iter()
        .map(|record| PrecautionRow {
            disease: cell(record, Some(table.disease)),
            precautions: columns.iter().map(|c| cell(record, *c)).collect(),
        })
        .collect())
}

/// Load the symptom dataset.
pub fn load_symptom_rows(path: &Path) -> AssistantResult<Vec<SymptomRow>> {
    let table = Table::open(path)?;
    let columns = table.numbered_columns(path, "Symptom", SYMPTOM_COLUMNS)?;

    Ok(table
        .records
        .iter()
        .map(|record| SymptomRow {
            disease: cell(record, Some(table.disease)),
            symptoms: columns.iter().map(|c| cell(record, *c)).collect(),
        })
        .collect())
}

/// A fully read CSV source with its header resolved.
struct Table {
    headers: csv::StringRecord,
    records: Vec<csv::StringRecord>,
    disease: usize,
}

impl Table {
    fn open(path: &Path) -> AssistantResult<Self> {
        let file = File::open(path).map_err(|source| AssistantError::KnowledgeSourceMissing {
            path: path.to_path_buf(),
            source,
        })?;

        let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(file);
        let headers = reader
            .headers()
            .map_err(|e| malformed(path, e.to_string()))?
            .clone();

        let disease = headers
            .iter()
            .position(|h| h.trim() == DISEASE_COLUMN)
            .ok_or_else(|| missing_column(path, DISEASE_COLUMN))?;

        let records = reader
            .records()
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| malformed(path, e.to_string()))?;

        Ok(Self {
            headers,
            records,
            disease,
        })
    }

    fn column(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h.trim() == name)
    }

    fn require_column(&self, path: &Path, name: &str) -> AssistantResult<usize> {
        self.column(name).ok_or_else(|| missing_column(path, name))
    }

    /// Positions of `<prefix>_1` .. `<prefix>_<count>`, `None` for columns the file lacks.
    /// Columns past `count` are ignored.
    fn numbered_columns(
        &self,
        path: &Path,
        prefix: &str,
        count: usize,
    ) -> AssistantResult<Vec<Option<usize>>> {
        let columns: Vec<Option<usize>> = (1..=count)
            .map(|n| self.column(&format!("{prefix}_{n}")))
            .collect();

        if columns.iter().all(Option::is_none) {
            return Err(malformed(
                path,
                format!("no '{prefix}_1'..'{prefix}_{count}' columns"),
            ));
        }
        Ok(columns)
    }
}

fn cell(record: &csv::StringRecord, column: Option<usize>) -> Option<String> {
    column
        .and_then(|c| record.get(c))
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn missing_column(path: &Path, name: &str) -> AssistantError {
    malformed(path, format!("missing '{name}' column"))
}

fn malformed(path: &Path, reason: String) -> AssistantError {
    AssistantError::KnowledgeSourceMalformed {
        path: path.to_path_buf(),
        reason,
    }
}
