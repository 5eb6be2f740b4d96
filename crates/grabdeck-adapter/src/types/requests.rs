/*
[INPUT]:  Download service schema definitions and serde requirements
[OUTPUT]: Typed Rust request structs with serialization support
[POS]:    Data layer - type definitions for API communication
[UPDATE]: When API schema changes or new types added
*/

use serde::{Deserialize, Serialize};

/// Options forwarded untouched to the service when starting a download
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DownloadOptions {
    pub quality: String,
    pub output_dir: String,
    pub use_proxy: bool,
}

impl Default for DownloadOptions {
    fn default() -> Self {
        Self {
            quality: "best".to_string(),
            output_dir: "./downloads".to_string(),
            use_proxy: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadRequest {
    pub url: String,
    pub options: DownloadOptions,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenFolderRequest {
    pub path: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectRequest {
    pub url: String,
}
