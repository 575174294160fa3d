//! Spool-directory collaborators: a file-based mention source and an
//! outbox publisher.
//!
//! The inbox holds one JSON file per inbound message
//! (`{"id", "author", "text"}`). Files are left in place after reading -
//! delivery is at-least-once and the bot's idempotency ledger makes
//! re-reads harmless. The outbox receives one PNG plus a caption sidecar
//! per published image.

use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use artree_bot::{BotError, InboundMessage, MentionSource, Publisher};
use async_trait::async_trait;
use image::RgbaImage;
use tracing::{debug, info, warn};

/// Cap on messages returned by one poll.
const MAX_BATCH: usize = 200;

/// Mention source reading JSON message files from a directory.
///
/// Files sort newest-first by name (timestamp-prefixed names give the
/// timeline order the bot expects); malformed files are skipped with a
/// warning.
pub struct SpoolSource {
    dir: PathBuf,
}

impl SpoolSource {
    /// Create a source polling `dir`.
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }
}

#[async_trait]
impl MentionSource for SpoolSource {
    async fn poll(&mut self) -> Result<Vec<InboundMessage>, BotError> {
        if !self.dir.exists() {
            debug!(dir = %self.dir.display(), "inbox does not exist yet");
            return Ok(Vec::new());
        }

        let mut files: Vec<PathBuf> = std::fs::read_dir(&self.dir)?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.extension().map(|ext| ext == "json").unwrap_or(false))
            .collect();
        files.sort();
        files.reverse();

        let mut batch = Vec::new();
        for path in files.into_iter().take(MAX_BATCH) {
            let contents = match std::fs::read_to_string(&path) {
                Ok(contents) => contents,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "failed to read message file");
                    continue;
                }
            };
            match serde_json::from_str::<InboundMessage>(&contents) {
                Ok(message) => batch.push(message),
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "skipping malformed message file");
                }
            }
        }
        Ok(batch)
    }
}

/// Publisher writing PNG images plus caption sidecars into a directory.
pub struct OutboxPublisher {
    dir: PathBuf,
}

impl OutboxPublisher {
    /// Create a publisher writing into `dir`.
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }
}

#[async_trait]
impl Publisher for OutboxPublisher {
    async fn publish(
        &self,
        author: &str,
        caption: &str,
        image: &RgbaImage,
    ) -> Result<(), BotError> {
        std::fs::create_dir_all(&self.dir)?;

        let stamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        let base = format!("{}-{}", stamp, author);

        let image_path = self.dir.join(format!("{}.png", base));
        image.save(&image_path)?;
        std::fs::write(self.dir.join(format!("{}.txt", base)), caption)?;

        info!(author, path = %image_path.display(), "published art to outbox");
        Ok(())
    }
}
