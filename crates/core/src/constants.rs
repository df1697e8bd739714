//! Constants used throughout the Med-AI core crate.
//!
//! This module contains the knowledge base grammar, default file locations and the fixed user
//! facing strings so that the offline builder and the request path agree on them.

/// First header line of the knowledge base artifact.
pub const KNOWLEDGE_BASE_TITLE: &str = "=== MED-AI CLINICAL KNOWLEDGE BASE ===";

/// Second header line of the knowledge base artifact.
pub const KNOWLEDGE_BASE_PREAMBLE: &str = "This is the trusted source of truth for disease diagnostics. Use ONLY this information when making medical assessments.";

/// Separator line written after every disease block.
pub const DISEASE_BLOCK_SEPARATOR: &str = "----------------------------------------";

/// Description used when a disease has no row in the description dataset.
pub const DEFAULT_DESCRIPTION: &str = "No description available.";

/// Precaution text used when a disease has no precautions.
pub const DEFAULT_PRECAUTIONS: &str = "Consult a healthcare professional.";

/// Number of `Symptom_N` columns scanned per dataset row.
pub const SYMPTOM_COLUMNS: usize = 17;

/// Number of `Precaution_N` columns scanned per precaution row.
pub const PRECAUTION_COLUMNS: usize = 4;

/// Column holding the disease key in every source dataset.
pub const DISEASE_COLUMN: &str = "Disease";

/// Column holding the description text in the description dataset.
pub const DESCRIPTION_COLUMN: &str = "Description";

/// Default filename of the description dataset inside the data directory.
pub const DESCRIPTION_CSV_FILENAME: &str = "symptom_Description.csv";

/// Default filename of the precaution dataset inside the data directory.
pub const PRECAUTION_CSV_FILENAME: &str = "symptom_precaution.csv";

/// Default filename of the symptom dataset inside the data directory.
pub const SYMPTOM_CSV_FILENAME: &str = "dataset.csv";

/// Default location of the compacted knowledge base artifact.
pub const DEFAULT_KNOWLEDGE_BASE_PATH: &str = "knowledge/medical_knowledge_base.txt";

/// Suffix appended to advice that could not be translated.
pub const UNTRANSLATED_NOTICE: &str = " (Translation unavailable)";

/// Reply returned when not even the fallback classifier can produce advice.
pub const DEGRADED_APOLOGY: &str = "I'm sorry, I couldn't process your symptoms right now. Please consult a healthcare professional in person for a proper evaluation.";

/// Placeholder API key shipped in example env files.
pub const PLACEHOLDER_API_KEY: &str = "PASTE_YOUR_NEW_API_KEY_HERE";

/// Default endpoint of the public translation service.
pub const DEFAULT_TRANSLATE_URL: &str = "https://translate.googleapis.com";
