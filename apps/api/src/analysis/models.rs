use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::resumes::ResumeFile;

/// Everything the analysis service needs for one call.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisRequest {
    pub resume: ResumeFile,
    pub target_role: String,
    pub target_company: String,
    /// Sent as text, exactly as the form carried it.
    pub years_of_experience: String,
}

/// Raw JSON object returned by the analysis service. No schema is enforced;
/// the accessors only interpret the conventional keys when they have the
/// expected type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnalysisResult(Map<String, Value>);

impl From<Map<String, Value>> for AnalysisResult {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl AnalysisResult {
    pub fn analysis(&self) -> Option<&str> {
        self.0.get("analysis").and_then(Value::as_str)
    }

    /// Text items of `suggestions`; non-text items are skipped.
    pub fn suggestions(&self) -> Option<Vec<&str>> {
        self.0
            .get("suggestions")
            .and_then(Value::as_array)
            .map(|items| items.iter().filter_map(Value::as_str).collect())
    }

    pub fn score(&self) -> Option<f64> {
        self.0.get("score").and_then(Value::as_f64)
    }

    pub fn summary(&self) -> AnalysisSummary {
        AnalysisSummary {
            analysis: self.analysis().map(str::to_string),
            suggestions: self
                .suggestions()
                .map(|items| items.into_iter().map(str::to_string).collect()),
            score: self.score(),
        }
    }
}

/// Interpreted view of the conventional keys. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AnalysisSummary {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analysis: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestions: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
}
