//! Memory models for the API service

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Memory entity
///
/// `user_id` is the owner and never changes after creation. The
/// `likes_count`/`comments_count` columns are materialized counters kept in
/// step with the underlying rows by the like/comment repositories.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Memory {
    pub id: Uuid,
    pub user_id: Uuid,
    pub description: Option<String>,
    pub file_url: String,
    pub tags: Vec<String>,
    pub is_public: bool,
    pub generated_story: Option<String>,
    pub generated_image_url: Option<String>,
    pub generated_music_url: Option<String>,
    pub ai_context: Option<serde_json::Value>,
    pub is_ai_enhanced: bool,
    pub likes_count: i64,
    pub comments_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request to create a memory
#[derive(Debug, Clone, Deserialize)]
pub struct CreateMemoryRequest {
    pub description: Option<String>,
    pub file_url: String,
    pub tags: Option<Vec<String>>,
    pub is_public: Option<bool>,
}

/// Partial update for a memory
///
/// Absent fields keep their current value; the patch is applied by
/// [`MemoryPatch::apply`] over the loaded row, never by building SQL field
/// lists dynamically.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MemoryPatch {
    pub description: Option<String>,
    pub tags: Option<Vec<String>>,
    pub file_url: Option<String>,
}

impl MemoryPatch {
    /// True when no field is present
    pub fn is_empty(&self) -> bool {
        self.description.is_none() && self.tags.is_none() && self.file_url.is_none()
    }

    /// Check field-level rules before the patch is applied
    ///
    /// `file_url` is required on the entity, so a present-but-blank value
    /// is invalid rather than a clear.
    pub fn validate(&self) -> Result<(), String> {
        if let Some(file_url) = &self.file_url {
            if file_url.trim().is_empty() {
                return Err("file_url cannot be empty".to_string());
            }
        }
        Ok(())
    }

    /// Merge the patch over an existing memory, keeping absent fields
    pub fn apply(&self, memory: &mut Memory) {
        if let Some(description) = &self.description {
            memory.description = Some(description.clone());
        }
        if let Some(tags) = &self.tags {
            memory.tags = tags.clone();
        }
        if let Some(file_url) = &self.file_url {
            memory.file_url = file_url.clone();
        }
    }
}

/// Request to update a memory
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateMemoryRequest {
    pub memory_id: Uuid,
    #[serde(flatten)]
    pub patch: MemoryPatch,
}

/// Request to delete a memory
#[derive(Debug, Clone, Deserialize)]
pub struct DeleteMemoryRequest {
    pub memory_id: Uuid,
}

/// Request to toggle memory privacy
///
/// The boolean is required; there is no implicit flip.
#[derive(Debug, Clone, Deserialize)]
pub struct PrivacyRequest {
    pub memory_id: Uuid,
    pub is_public: bool,
}

/// Request to run AI enrichment on an owned memory
#[derive(Debug, Clone, Deserialize)]
pub struct EnrichMemoryRequest {
    pub memory_id: Uuid,
}

/// Memory annotated with whether the requester owns it
#[derive(Debug, Clone, Serialize)]
pub struct MemoryWithOwnership {
    #[serde(flatten)]
    pub memory: Memory,
    #[serde(rename = "isOwner")]
    pub is_owner: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_memory() -> Memory {
        Memory {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            description: Some("sunset at the pier".to_string()),
            file_url: "s3://bucket/pier.jpg".to_string(),
            tags: vec!["sunset".to_string()],
            is_public: false,
            generated_story: None,
            generated_image_url: None,
            generated_music_url: None,
            ai_context: None,
            is_ai_enhanced: false,
            likes_count: 0,
            comments_count: 0,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_empty_patch_is_detected() {
        assert!(MemoryPatch::default().is_empty());
        let patch = MemoryPatch {
            description: Some("x".to_string()),
            ..Default::default()
        };
        assert!(!patch.is_empty());
    }

    #[test]
    fn test_blank_file_url_patch_is_rejected() {
        // A patch of {"file_url": ""} is non-empty, so the emptiness check
        // alone would let it blank out a required field.
        let patch: MemoryPatch = serde_json::from_str(r#"{"file_url": ""}"#).unwrap();
        assert!(!patch.is_empty());
        assert!(patch.validate().is_err());

        let patch: MemoryPatch = serde_json::from_str(r#"{"file_url": "   "}"#).unwrap();
        assert!(patch.validate().is_err());

        let patch = MemoryPatch {
            file_url: Some("s3://bucket/new.jpg".to_string()),
            ..Default::default()
        };
        assert!(patch.validate().is_ok());

        // Fields other than file_url are free to change.
        let patch: MemoryPatch = serde_json::from_str(r#"{"description": ""}"#).unwrap();
        assert!(patch.validate().is_ok());
    }

    #[test]
    fn test_patch_keeps_absent_fields() {
        let mut memory = sample_memory();
        let original_tags = memory.tags.clone();
        let original_file_url = memory.file_url.clone();

        let patch = MemoryPatch {
            description: Some("new description".to_string()),
            ..Default::default()
        };
        patch.apply(&mut memory);

        assert_eq!(memory.description.as_deref(), Some("new description"));
        assert_eq!(memory.tags, original_tags);
        assert_eq!(memory.file_url, original_file_url);
    }

    #[test]
    fn test_patch_replaces_present_fields() {
        let mut memory = sample_memory();
        let patch = MemoryPatch {
            description: None,
            tags: Some(vec!["beach".to_string(), "summer".to_string()]),
            file_url: Some("s3://bucket/beach.jpg".to_string()),
        };
        patch.apply(&mut memory);

        assert_eq!(memory.description.as_deref(), Some("sunset at the pier"));
        assert_eq!(memory.tags, vec!["beach", "summer"]);
        assert_eq!(memory.file_url, "s3://bucket/beach.jpg");
    }
}
