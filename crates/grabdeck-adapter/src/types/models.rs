/*
[INPUT]:  Download service schema definitions and serde requirements
[OUTPUT]: Typed Rust structs with serialization support
[POS]:    Data layer - type definitions for API communication
[UPDATE]: When API schema changes or new types added
*/

use serde::{Deserialize, Deserializer, Serialize};

use super::enums::TaskStatus;

/// One download task as returned by `GET /api/tasks`.
///
/// `speed`, `eta` and `file_size` are display strings computed by the service
/// and are never parsed here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    #[serde(rename = "task_id")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    pub status: TaskStatus,
    #[serde(default, deserialize_with = "null_as_default")]
    pub progress: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub speed: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub eta: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub file_size: String,
    #[serde(default, deserialize_with = "blank_as_none", skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none", skip_serializing_if = "Option::is_none")]
    pub output_file: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none", skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none", skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none", skip_serializing_if = "Option::is_none")]
    pub downloaded_size: Option<String>,
}

impl Task {
    /// Minimal task with empty display fields
    pub fn new(id: impl Into<String>, status: TaskStatus) -> Self {
        Self {
            id: id.into(),
            title: String::new(),
            status,
            progress: 0.0,
            speed: String::new(),
            eta: String::new(),
            file_size: String::new(),
            thumbnail: None,
            output_file: None,
            error_message: None,
            url: None,
            downloaded_size: None,
        }
    }

    /// Progress limited to 0..=100; NaN reads as 0
    pub fn progress_percent(&self) -> f64 {
        if self.progress.is_nan() {
            0.0
        } else {
            self.progress.clamp(0.0, 100.0)
        }
    }
}

/// Display fields copied from extractor metadata may arrive as `null`.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// The service sends `""` for every unset optional field.
pub(crate) fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.trim().is_empty()))
}
