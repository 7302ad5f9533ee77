//! Worker-side processing shapes, including the manifest shipped with frame archives.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::messages::VideoProcessingMessage;

/// Everything a worker needs to process one job
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessingContext {
    pub job_id: Uuid,
    pub user_id: Uuid,
    pub video_url: String,
    pub filename: String,
    /// Scratch directory for extracted frames
    pub work_dir: String,
}

impl ProcessingContext {
    pub fn from_message(message: &VideoProcessingMessage, work_dir: impl Into<String>) -> Self {
        Self {
            job_id: message.job_id,
            user_id: message.user_id,
            video_url: message.video_url.clone(),
            filename: message.filename.clone(),
            work_dir: work_dir.into(),
        }
    }
}

/// Outcome of one processing run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessingResult {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frame_count: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zip_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zip_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl ProcessingResult {
    pub fn succeeded(frame_count: i32, zip_path: impl Into<String>, zip_url: impl Into<String>) -> Self {
        Self {
            success: true,
            frame_count: Some(frame_count),
            zip_path: Some(zip_path.into()),
            zip_url: Some(zip_url.into()),
            error_message: None,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            frame_count: None,
            zip_path: None,
            zip_url: None,
            error_message: Some(message.into()),
        }
    }
}

/// Frame dimensions in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

/// One extracted frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameInfo {
    pub filename: String,
    /// Position in the source video, seconds
    pub timestamp: f64,
    /// File size in bytes
    pub size: u64,
}

/// Manifest written next to the extracted frames
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameManifest {
    pub video_filename: String,
    pub total_frames: u64,
    pub fps: f64,
    pub resolution: Resolution,
    pub frames: Vec<FrameInfo>,
    pub processed_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_manifest_wire_format() {
        let manifest = FrameManifest {
            video_filename: "clip.mp4".to_string(),
            total_frames: 1,
            fps: 1.0,
            resolution: Resolution {
                width: 1920,
                height: 1080,
            },
            frames: vec![FrameInfo {
                filename: "frame_0001.png".to_string(),
                timestamp: 0.0,
                size: 2048,
            }],
            processed_at: Utc::now(),
        };

        let json = serde_json::to_value(&manifest).unwrap();
        assert_eq!(json["videoFilename"], "clip.mp4");
        assert_eq!(json["totalFrames"], 1);
        assert_eq!(json["resolution"], json!({ "width": 1920, "height": 1080 }));
        assert_eq!(json["frames"][0]["filename"], "frame_0001.png");
    }

    #[test]
    fn test_failed_result_carries_only_error() {
        let json = serde_json::to_value(ProcessingResult::failed("ffmpeg exited 1")).unwrap();
        assert_eq!(
            json,
            json!({ "success": false, "errorMessage": "ffmpeg exited 1" })
        );
    }
}
