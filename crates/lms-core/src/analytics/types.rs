//! Analytics records as served by the backend.

use serde::{Deserialize, Deserializer, Serialize};

use crate::validity::ValidityGrant;

/// The backend emits ids as numbers on some endpoints and strings on others.
fn id_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Text(String),
        Number(i64),
    }
    Ok(match Id::deserialize(deserializer)? {
        Id::Text(s) => s,
        Id::Number(n) => n.to_string(),
    })
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchSummary {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub user_count: u32,
    #[serde(flatten)]
    pub grant: ValidityGrant,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseProgress {
    #[serde(deserialize_with = "id_string")]
    pub course_id: String,
    pub title: String,
    /// Completion percentage, 0–100.
    #[serde(default)]
    pub progress: f64,
    #[serde(flatten)]
    pub grant: ValidityGrant,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProgress {
    pub username: String,
    #[serde(default)]
    pub courses: Vec<CourseProgress>,
}
