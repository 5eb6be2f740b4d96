/*
[INPUT]:  Download service schema definitions and serde requirements
[OUTPUT]: Typed Rust response structs with serialization support
[POS]:    Data layer - type definitions for API communication
[UPDATE]: When API schema changes or new types added
*/

use serde::{Deserialize, Serialize};

use super::models::{Task, blank_as_none, null_as_default};

/// Body of `GET /api/tasks`. A body without `tasks` is malformed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskListResponse {
    pub tasks: Vec<Task>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateDownloadResponse {
    pub task_id: String,
    #[serde(default)]
    pub status: Option<String>,
}

/// Acknowledgement for pause/resume/cancel/open-folder
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionAck {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub path: Option<String>,
}

/// Error body the service attaches to non-success replies
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

/// Body of `POST /api/detect`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub platform: String,
    #[serde(default)]
    pub info: VideoInfo,
}

/// Extractor metadata for a link. Zero means the extractor did not know.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VideoInfo {
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "blank_as_none", skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    /// Seconds; some extractors report fractions
    #[serde(default, deserialize_with = "null_as_default")]
    pub duration: f64,
    /// Bytes, exact or approximate
    #[serde(default, deserialize_with = "null_as_default")]
    pub filesize: f64,
}

impl VideoInfo {
    pub fn duration_secs(&self) -> u64 {
        whole(self.duration)
    }

    pub fn filesize_bytes(&self) -> u64 {
        whole(self.filesize)
    }
}

fn whole(value: f64) -> u64 {
    if value.is_finite() && value > 0.0 {
        value.round() as u64
    } else {
        0
    }
}
