use url::Url;

use crate::core::MediaItem;

/// Which reference fields a surface is willing to play.
///
/// The video feed accepts provider embeds and uploaded files; the reels feed
/// is uploaded clips only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourcePolicy {
    Any,
    FileOnly,
}

/// Playable classification of one media record. Recomputed on every index
/// change; provider URLs may be time-limited, so these are never cached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayableSource {
    /// Third-party embed; playback control goes through the provider player.
    Embedded { url: String },
    /// File served from our own storage, playable with full native control.
    Direct { url: String },
}

impl PlayableSource {
    pub fn url(&self) -> &str {
        match self {
            PlayableSource::Embedded { url } => url,
            PlayableSource::Direct { url } => url,
        }
    }

    pub fn is_embedded(&self) -> bool {
        matches!(self, PlayableSource::Embedded { .. })
    }

    pub fn is_direct(&self) -> bool {
        matches!(self, PlayableSource::Direct { .. })
    }
}

/// Classifies media records and resolves hosted paths against the configured
/// media origin.
#[derive(Debug, Clone)]
pub struct SourceResolver {
    media_base: Option<Url>,
}

impl SourceResolver {
    pub fn new(media_base_url: Option<&str>) -> Self {
        let media_base = media_base_url.and_then(|raw| match Url::parse(raw) {
            Ok(url) => Some(url),
            Err(e) => {
                log::warn!("Ignoring unparseable media base URL {:?}: {}", raw, e);
                None
            }
        });
        Self { media_base }
    }

    /// Provider references win unless the policy is file-only; a provider
    /// reference that fails to normalize falls through to the hosted file.
    pub fn resolve(&self, item: &MediaItem, policy: SourcePolicy) -> Option<PlayableSource> {
        if policy == SourcePolicy::Any {
            if let Some(raw) = item.youtube_url.as_deref() {
                if let Some(url) = normalize_youtube_url(raw) {
                    return Some(PlayableSource::Embedded { url });
                }
            }
        }

        let file = item.file.as_deref().map(str::trim).filter(|f| !f.is_empty())?;
        Some(PlayableSource::Direct {
            url: self.resolve_media_url(file),
        })
    }

    /// Absolute and protocol-relative URLs pass through untouched.
    /// Leading-slash paths resolve against the media base origin; any other
    /// relative path lands under the backend's /media/ mount.
    fn resolve_media_url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") || path.starts_with("//") {
            return path.to_string();
        }
        let site_relative = if path.starts_with('/') {
            path.to_string()
        } else {
            format!("/media/{}", path)
        };
        match &self.media_base {
            Some(base) => base
                .join(&site_relative)
                .map(|resolved| resolved.to_string())
                .unwrap_or(site_relative),
            None => site_relative,
        }
    }
}

const VIDEO_ID_LEN: usize = 11;

fn is_video_id(candidate: &str) -> bool {
    candidate.len() == VIDEO_ID_LEN
        && candidate
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// Recognizes the host shapes the backend accepts for provider references.
pub fn is_youtube_url(url: &str) -> bool {
    let trimmed = url.trim();
    trimmed.contains("youtube.com") || trimmed.contains("youtu.be")
}

/// Extracts the 11-character video id from any supported URL shape (watch
/// page, share link, embed link, shorts link, mobile host) or a bare id.
pub fn extract_youtube_id(url: &str) -> Option<String> {
    let trimmed = url.trim();
    if trimmed.is_empty() {
        return None;
    }
    if is_video_id(trimmed) {
        return Some(trimmed.to_string());
    }
    if !is_youtube_url(trimmed) {
        return None;
    }

    // Editors paste scheme-less links; tolerate them.
    let parsed = Url::parse(trimmed)
        .or_else(|_| Url::parse(&format!("https://{}", trimmed)))
        .ok()?;
    let host = parsed.host_str()?;

    if host == "youtu.be" {
        let id = parsed.path_segments()?.next()?;
        return is_video_id(id).then(|| id.to_string());
    }

    if host == "youtube.com" || host.ends_with(".youtube.com") {
        let mut segments = parsed.path_segments()?;
        return match segments.next() {
            Some("watch") => {
                let id = parsed
                    .query_pairs()
                    .find(|(key, _)| key == "v")
                    .map(|(_, value)| value.into_owned())?;
                is_video_id(&id).then_some(id)
            }
            Some("embed") | Some("shorts") => {
                let id = segments.next()?;
                is_video_id(id).then(|| id.to_string())
            }
            _ => None,
        };
    }

    None
}

/// Canonical watch-page form; every accepted shape normalizes to this.
pub fn normalize_youtube_url(url: &str) -> Option<String> {
    let id = extract_youtube_id(url)?;
    Some(format!("https://www.youtube.com/watch?v={}", id))
}
