use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

/// Syllabus verdict for a single question.
///
/// Unrecognised verdicts are kept verbatim so that an export writes back
/// exactly what the server sent.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(from = "String", into = "String")]
pub enum SyllabusStatus {
    InSyllabus,
    OutOfSyllabus,
    Error,
    Other(String),
}

impl SyllabusStatus {
    pub fn as_str(&self) -> &str {
        match self {
            Self::InSyllabus => "IN_SYLLABUS",
            Self::OutOfSyllabus => "OUT_OF_SYLLABUS",
            Self::Error => "ERROR",
            Self::Other(raw) => raw.as_str(),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Self::InSyllabus => "In Syllabus",
            Self::OutOfSyllabus => "Out of Syllabus",
            Self::Error => "Error",
            Self::Other(raw) => raw.as_str(),
        }
    }
}

impl From<String> for SyllabusStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "IN_SYLLABUS" => Self::InSyllabus,
            "OUT_OF_SYLLABUS" => Self::OutOfSyllabus,
            "ERROR" => Self::Error,
            _ => Self::Other(value),
        }
    }
}

impl From<SyllabusStatus> for String {
    fn from(value: SyllabusStatus) -> Self {
        match value {
            SyllabusStatus::Other(raw) => raw,
            other => other.as_str().to_string(),
        }
    }
}

impl fmt::Display for SyllabusStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Textbook coverage verdict. Only produced by the server for questions
/// that were found to be in the syllabus.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(from = "String", into = "String")]
pub enum TextbookStatus {
    InTextbook,
    NotInTextbook,
    NotApplicable,
    Error,
    Other(String),
}

impl TextbookStatus {
    pub fn as_str(&self) -> &str {
        match self {
            Self::InTextbook => "YES_IN_TEXTBOOK",
            Self::NotInTextbook => "NO_IN_PROVIDED_TEXTBOOK_EXCERPTS",
            Self::NotApplicable => "NOT_APPLICABLE",
            Self::Error => "ERROR",
            Self::Other(raw) => raw.as_str(),
        }
    }

    /// Badge text for the card, if this verdict gets a badge at all.
    pub fn badge(&self) -> Option<&'static str> {
        match self {
            Self::InTextbook => Some("In Textbook"),
            Self::NotInTextbook => Some("Not in Textbook"),
            _ => None,
        }
    }
}

impl From<String> for TextbookStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "YES_IN_TEXTBOOK" => Self::InTextbook,
            "NO_IN_PROVIDED_TEXTBOOK_EXCERPTS" => Self::NotInTextbook,
            "NOT_APPLICABLE" => Self::NotApplicable,
            "ERROR" => Self::Error,
            _ => Self::Other(value),
        }
    }
}

impl From<TextbookStatus> for String {
    fn from(value: TextbookStatus) -> Self {
        match value {
            TextbookStatus::Other(raw) => raw,
            other => other.as_str().to_string(),
        }
    }
}

impl fmt::Display for TextbookStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A record key that may be missing, `null`, or set.
///
/// Kept distinct so that an export writes back exactly the keys the server
/// sent: `Absent` is skipped on serialization and `Null` stays `null`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Field<T> {
    Absent,
    Null,
    Value(T),
}

impl<T> Field<T> {
    pub fn value(&self) -> Option<&T> {
        match self {
            Field::Value(v) => Some(v),
            _ => None,
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Field::Absent)
    }
}

impl<T> Default for Field<T> {
    fn default() -> Self {
        Field::Absent
    }
}

impl<T> From<T> for Field<T> {
    fn from(value: T) -> Self {
        Field::Value(value)
    }
}

// Absent never reaches here: callers pair it with `skip_serializing_if`.
impl<T: Serialize> Serialize for Field<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Field::Value(v) => v.serialize(serializer),
            _ => serializer.serialize_none(),
        }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Field<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Option::<T>::deserialize(deserializer)? {
            None => Field::Null,
            Some(v) => Field::Value(v),
        })
    }
}

/// One validated question as returned by `/validate`.
///
/// Every known key is optional and nullable, and unknown keys are kept in
/// `extra`, so a record survives a load and export unchanged.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct ValidationResult {
    #[serde(default, skip_serializing_if = "Field::is_absent")]
    pub question_id: Field<Value>,
    #[serde(default, skip_serializing_if = "Field::is_absent")]
    pub question_text: Field<String>,
    #[serde(default, skip_serializing_if = "Field::is_absent")]
    pub syllabus_status: Field<SyllabusStatus>,
    #[serde(default, skip_serializing_if = "Field::is_absent")]
    pub syllabus_reasoning: Field<String>,
    #[serde(default, skip_serializing_if = "Field::is_absent")]
    pub textbook_status: Field<TextbookStatus>,
    #[serde(default, skip_serializing_if = "Field::is_absent")]
    pub textbook_reasoning: Field<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ValidationResult {
    pub fn question_id_label(&self) -> String {
        match self.question_id.value() {
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
            None => String::new(),
        }
    }

    pub fn question_text(&self) -> &str {
        self.question_text.value().map_or("", String::as_str)
    }

    pub fn syllabus_status(&self) -> Option<&SyllabusStatus> {
        self.syllabus_status.value()
    }

    pub fn syllabus_reasoning(&self) -> &str {
        self.syllabus_reasoning.value().map_or("", String::as_str)
    }

    pub fn textbook_status(&self) -> Option<&TextbookStatus> {
        self.textbook_status.value()
    }

    pub fn is_in_textbook(&self) -> bool {
        matches!(self.textbook_status(), Some(TextbookStatus::InTextbook))
    }

    /// Textbook reasoning, whenever the server sent a non-empty string.
    pub fn textbook_analysis(&self) -> Option<&str> {
        self.textbook_reasoning
            .value()
            .map(String::as_str)
            .filter(|s| !s.is_empty())
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SummaryStats {
    pub total: usize,
    pub in_syllabus: usize,
    pub out_of_syllabus: usize,
    pub in_textbook: usize,
}

impl SummaryStats {
    pub fn from_results(results: &[ValidationResult]) -> Self {
        let mut stats = SummaryStats {
            total: results.len(),
            ..SummaryStats::default()
        };
        for r in results {
            match r.syllabus_status() {
                Some(SyllabusStatus::InSyllabus) => stats.in_syllabus += 1,
                Some(SyllabusStatus::OutOfSyllabus) => stats.out_of_syllabus += 1,
                _ => {}
            }
            if r.is_in_textbook() {
                stats.in_textbook += 1;
            }
        }
        stats
    }
}

/// Body of a successful `/upload` response.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct UploadSummary {
    #[serde(default)]
    pub syllabus_docs: u64,
    #[serde(default)]
    pub textbook_docs: u64,
    pub question_paper_path: String,
}
