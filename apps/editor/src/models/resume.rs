use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A stored résumé as listed by the backend collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResumeSummary {
    pub id: Option<String>,
    pub name: String,
    pub url: Option<String>,
    pub cloud_path: Option<String>,
    /// Public URL of the parsed JSON for this upload, when parsing finished.
    pub json_url: Option<String>,
    pub parsing_status: Option<ParsingStatus>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParsingStatus {
    Parsing,
    Completed,
    Failed,
}

/// Stored résumé JSON plus the template it was last saved with.
#[derive(Debug, Clone, Deserialize)]
pub struct StoredResume {
    pub parsed_json: Value,
    #[serde(default)]
    pub template: Option<String>,
}

/// Result of submitting an edited résumé.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SubmissionReceipt {
    #[serde(default)]
    pub public_url: Option<String>,
    #[serde(default)]
    pub cloud_file_path: Option<String>,
    #[serde(default)]
    pub file_name: Option<String>,
    #[serde(default)]
    pub template: Option<String>,
    #[serde(default)]
    pub user_resume_id: Option<String>,
}
