use std::sync::Arc;

use crate::core::{Diagnostics, MediaItem};

/// Payload handed to the platform's native share sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareRequest {
    pub title: String,
    pub text: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShareOutcome {
    Shared,
    /// The user dismissed the sheet; not an error.
    Cancelled,
    Failed(String),
}

/// Platform sharing and clipboard capability supplied by the shell.
pub trait ShareTarget: Send {
    fn native_share_available(&self) -> bool;
    fn native_share(&mut self, request: &ShareRequest) -> ShareOutcome;
    fn copy_to_clipboard(&mut self, text: &str) -> anyhow::Result<()>;
}

/// Confirmation the shell renders (localized) after a fallback copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShareNotice {
    LinkCopied,
}

/// Shares the current item through the native sheet when one exists, else
/// copies the page URL. No failure here ever reaches the shell as an error.
pub struct ShareCoordinator {
    target: Box<dyn ShareTarget>,
    diag: Arc<dyn Diagnostics>,
    page_url: String,
}

impl ShareCoordinator {
    pub fn new(target: Box<dyn ShareTarget>, diag: Arc<dyn Diagnostics>, page_url: String) -> Self {
        Self {
            target,
            diag,
            page_url,
        }
    }

    pub fn share(&mut self, item: &MediaItem) -> Option<ShareNotice> {
        if self.target.native_share_available() {
            let request = ShareRequest {
                title: item.title.clone(),
                text: item.title.clone(),
                url: self.page_url.clone(),
            };
            match self.target.native_share(&request) {
                ShareOutcome::Shared => {}
                ShareOutcome::Cancelled => self.diag.debug("Share: cancelled by user"),
                ShareOutcome::Failed(message) => {
                    self.diag.warn(&format!("Share: native share failed: {}", message))
                }
            }
            None
        } else {
            match self.target.copy_to_clipboard(&self.page_url) {
                Ok(()) => Some(ShareNotice::LinkCopied),
                Err(e) => {
                    self.diag.warn(&format!("Share: clipboard copy failed: {}", e));
                    None
                }
            }
        }
    }
}
