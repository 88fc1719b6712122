//! Wire types for the post and upload endpoints.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Payload for the post create/update endpoint.
///
/// `aspect_ratio` is sent only the first time a ratio is chosen for a post
/// (i.e. the post previously had no images); the server ignores later
/// values.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    pub images: Vec<String>,
    #[serde(rename = "aspectRatio", skip_serializing_if = "Option::is_none")]
    pub aspect_ratio: Option<String>,
}

/// Post record as returned by the create/update endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostResponse {
    pub id: Uuid,
    pub title: Option<String>,
    pub content: Option<String>,
    pub images: Vec<String>,
    #[serde(rename = "aspectRatio")]
    pub aspect_ratio: Option<String>,
}

/// Response from the multipart batch upload endpoint: one permanent URL per
/// uploaded blob, in submission order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadBatchResponse {
    pub urls: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_post_update_omits_empty_fields() {
        let update = PostUpdate {
            title: None,
            content: None,
            images: vec!["https://cdn.example.com/a.jpg".to_string()],
            aspect_ratio: None,
        };
        let json = serde_json::to_value(&update).unwrap();
        assert!(json.get("title").is_none());
        assert!(json.get("aspectRatio").is_none());
        assert_eq!(json["images"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn test_post_update_aspect_ratio_field_name() {
        let update = PostUpdate {
            title: Some("Roommate wanted".to_string()),
            content: None,
            images: vec![],
            aspect_ratio: Some("1:1".to_string()),
        };
        let json = serde_json::to_value(&update).unwrap();
        assert_eq!(json["aspectRatio"], "1:1");
    }
}
