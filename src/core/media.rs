use serde::{Deserialize, Serialize};
use std::path::Path;

/// One entry of the immersive feed, as returned by the content API.
///
/// The engine only reads these records and reports id-scoped intents
/// upward; it never mutates them or refetches anything.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaItem {
    pub id: u64,
    /// Already localized by the caller.
    pub title: String,
    /// External-provider reference (watch page, share link, embed link or
    /// bare video id). Mutually exclusive with `file` in practice.
    #[serde(default)]
    pub youtube_url: Option<String>,
    /// Hosted-file path, possibly relative to the media origin.
    #[serde(default)]
    pub file: Option<String>,
    #[serde(default)]
    pub likes_count: Option<u64>,
    #[serde(default)]
    pub view_count: Option<u64>,
}

impl MediaItem {
    pub fn has_provider_reference(&self) -> bool {
        self.youtube_url
            .as_deref()
            .is_some_and(|url| !url.trim().is_empty())
    }

    pub fn has_file_reference(&self) -> bool {
        self.file
            .as_deref()
            .is_some_and(|path| !path.trim().is_empty())
    }
}

/// Loads a playlist dump (a JSON array of media records) from disk.
pub fn load_playlist(path: &Path) -> anyhow::Result<Vec<MediaItem>> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read playlist at {}: {}", path.display(), e))?;
    let items: Vec<MediaItem> = serde_json::from_str(&content)
        .map_err(|e| anyhow::anyhow!("Failed to parse playlist at {}: {}", path.display(), e))?;
    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_media_item_deserializes_with_missing_fields() {
        let json = r#"{"id": 7, "title": "Flood update"}"#;
        let item: MediaItem = serde_json::from_str(json).expect("Failed to parse item");

        assert_eq!(item.id, 7);
        assert_eq!(item.title, "Flood update");
        assert!(item.youtube_url.is_none());
        assert!(item.file.is_none());
        assert!(item.likes_count.is_none());
        assert!(item.view_count.is_none());
    }

    #[test]
    fn test_reference_predicates_ignore_whitespace() {
        let item = MediaItem {
            id: 1,
            title: "Test".to_string(),
            youtube_url: Some("   ".to_string()),
            file: Some("clips/a.mp4".to_string()),
            likes_count: None,
            view_count: None,
        };

        assert!(!item.has_provider_reference());
        assert!(item.has_file_reference());
    }
}
