//! Wire types exchanged with the interview backend.

use crate::orchestrator::{FeedbackResult, InterviewConfiguration};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The authenticated user, as returned by `/api/user-info`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub username: String,
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub email: Option<String>,
}

/// Result of `/api/upload-resume`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ResumeAnalysis {
    pub filename: String,
    #[serde(default)]
    pub keywords: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InterviewMode {
    Resume,
    Role,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Beginner,
    #[default]
    Intermediate,
    Advanced,
}

impl Difficulty {
    pub fn label(&self) -> &'static str {
        match self {
            Difficulty::Beginner => "Beginner",
            Difficulty::Intermediate => "Intermediate",
            Difficulty::Advanced => "Advanced",
        }
    }

    /// Cycles to the next level, wrapping around.
    pub fn next(self) -> Self {
        match self {
            Difficulty::Beginner => Difficulty::Intermediate,
            Difficulty::Intermediate => Difficulty::Advanced,
            Difficulty::Advanced => Difficulty::Beginner,
        }
    }
}

/// Body of `/api/generate-questions`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuestionRequest {
    pub mode: InterviewMode,
    pub difficulty: Difficulty,
    pub role: String,
    pub keywords: Vec<String>,
}

impl QuestionRequest {
    /// Combines this request with the backend's answer into the configuration
    /// handed to the orchestrator.
    pub fn into_configuration(self, generated: Value) -> InterviewConfiguration {
        let mut config = Map::new();
        config.insert("mode".into(), serde_json::json!(self.mode));
        config.insert("difficulty".into(), serde_json::json!(self.difficulty));
        config.insert("role".into(), Value::String(self.role));
        config.insert("keywords".into(), serde_json::json!(self.keywords));
        if let Value::Object(fields) = generated {
            for (key, value) in fields {
                config.insert(key, value);
            }
        }
        InterviewConfiguration::new(Value::Object(config))
    }
}

/// Category order the backend uses when it flattens questions for scoring.
const CATEGORY_ORDER: [&str; 3] = ["hr_questions", "technical_questions", "cultural_questions"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedQuestion {
    pub category: String,
    pub text: String,
}

/// The readable view of an interview configuration used by the session runner.
#[derive(Debug, Clone, PartialEq)]
pub struct InterviewPlan {
    pub session_id: i64,
    pub role: String,
    pub difficulty: String,
    pub questions: Vec<PlannedQuestion>,
}

impl InterviewPlan {
    /// Reads a plan out of a configuration. Returns `None` when the
    /// configuration has no session id.
    pub fn from_configuration(configuration: &InterviewConfiguration) -> Option<Self> {
        let json = configuration.as_json();
        let session_id = json.get("session_id")?.as_i64()?;
        let role = json
            .get("role")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        let difficulty = json
            .get("difficulty")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        let questions = json
            .get("questions")
            .and_then(Value::as_object)
            .map(flatten_questions)
            .unwrap_or_default();

        Some(Self {
            session_id,
            role,
            difficulty,
            questions,
        })
    }
}

/// Flattens question categories in the backend's answer-index order: the
/// three known categories first, then anything else in key order.
///
/// The backend indexes answers in the order it generated the categories,
/// but its JSON responses sort object keys, so the order on the wire says
/// nothing about answer indices.
pub fn flatten_questions(categories: &Map<String, Value>) -> Vec<PlannedQuestion> {
    let mut keys: Vec<&str> = CATEGORY_ORDER
        .iter()
        .copied()
        .filter(|key| categories.contains_key(*key))
        .collect();
    let mut extra: Vec<&str> = categories
        .keys()
        .map(String::as_str)
        .filter(|key| !CATEGORY_ORDER.contains(key))
        .collect();
    extra.sort_unstable();
    keys.extend(extra);

    let mut questions = Vec::new();
    for key in keys {
        let label = category_label(key);
        if let Some(list) = categories.get(key).and_then(Value::as_array) {
            for text in list.iter().filter_map(Value::as_str) {
                questions.push(PlannedQuestion {
                    category: label.clone(),
                    text: text.to_string(),
                });
            }
        }
    }
    questions
}

/// `technical_questions` -> `Technical Questions`
fn category_label(key: &str) -> String {
    key.split('_')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// The readable view of a feedback result. Every field is optional on the
/// wire; missing fields render as empty.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct FeedbackReport {
    #[serde(default)]
    pub overall_score: Option<f64>,
    #[serde(default)]
    pub category_scores: Map<String, Value>,
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub improvements: Vec<String>,
    #[serde(default)]
    pub detailed_feedback: String,
}

impl FeedbackReport {
    pub fn from_result(result: &FeedbackResult) -> Self {
        serde_json::from_value(result.as_json().clone()).unwrap_or_default()
    }

    /// Category scores as `(label, score)` pairs in key order.
    pub fn scores(&self) -> Vec<(String, f64)> {
        self.category_scores
            .iter()
            .filter_map(|(key, value)| value.as_f64().map(|score| (category_label(key), score)))
            .collect()
    }
}

#[cfg(test)]
#[path = "tests/types_tests.rs"]
mod tests;
