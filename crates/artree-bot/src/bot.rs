//! The accumulation state machine and polling loop.

use std::sync::Arc;
use std::time::Duration;

use artree_engine::generate;
use artree_lang::is_code;
use tokio::time::{self, Instant};
use tracing::{debug, info, warn};

use crate::captions::pick_caption;
use crate::error::BotError;
use crate::message::{strip_bot_prefix, InboundMessage, MentionSource};
use crate::publish::Publisher;
use crate::store::{ArchiveEntry, SubmissionStore};

/// Bot behavior knobs.
#[derive(Debug, Clone)]
pub struct BotConfig {
    /// Address prefix stripped from message text before classification.
    pub prefix: String,
    /// Canvas width in pixels.
    pub width: u32,
    /// Canvas height in pixels.
    pub height: u32,
    /// Budget for one whole image generation.
    pub plot_timeout: Duration,
    /// Sleep between polls. The sleep happens even when images were
    /// generated during the poll.
    pub poll_interval: Duration,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            prefix: "@artree".to_string(),
            width: 1024,
            height: 1024,
            plot_timeout: Duration::from_secs(5 * 60),
            poll_interval: Duration::from_secs(2 * 60),
        }
    }
}

/// The bot: polls a mention source, accumulates snippets per author, and
/// publishes generated art.
pub struct Bot {
    config: BotConfig,
    store: Arc<dyn SubmissionStore>,
    source: Box<dyn MentionSource>,
    publisher: Arc<dyn Publisher>,
}

impl Bot {
    /// Wire up a bot from its collaborators.
    pub fn new(
        config: BotConfig,
        store: Arc<dyn SubmissionStore>,
        source: Box<dyn MentionSource>,
        publisher: Arc<dyn Publisher>,
    ) -> Self {
        Self {
            config,
            store,
            source,
            publisher,
        }
    }

    /// Poll forever. Poll failures are logged and retried at the next
    /// interval.
    pub async fn run(&mut self) -> Result<(), BotError> {
        info!(
            prefix = %self.config.prefix,
            interval_secs = self.config.poll_interval.as_secs(),
            "starting bot loop"
        );
        loop {
            self.poll_once().await;
            time::sleep(self.config.poll_interval).await;
        }
    }

    /// Fetch one batch and process it oldest-first.
    ///
    /// Batches arrive newest-first, so iterating in reverse preserves
    /// submission order when one author has several messages in a single
    /// poll.
    pub async fn poll_once(&mut self) {
        debug!("requesting mentions");
        let batch = match self.source.poll().await {
            Ok(batch) => batch,
            Err(e) => {
                warn!(error = %e, "failed to poll mentions");
                return;
            }
        };
        debug!(count = batch.len(), "received mention batch");
        for msg in batch.iter().rev() {
            self.process_message(msg).await;
        }
    }

    /// Run one message through the state machine.
    ///
    /// The id is claimed in the store before anything else; a claimed
    /// message is never reprocessed, even when a later step fails here.
    /// Store failures abort this message only.
    pub async fn process_message(&self, msg: &InboundMessage) {
        debug!(id = %msg.id, author = %msg.author, "checking message");

        match self.store.is_processed(&msg.id) {
            Ok(true) => {
                debug!(id = %msg.id, "message already processed, skipping");
                return;
            }
            Ok(false) => {}
            Err(e) => {
                warn!(id = %msg.id, error = %e, "failed to check processed ids");
                return;
            }
        }
        if let Err(e) = self.store.mark_processed(&msg.id) {
            warn!(id = %msg.id, error = %e, "failed to claim message id");
            return;
        }

        let code = strip_bot_prefix(&msg.text, &self.config.prefix);
        if !is_code(&code) {
            debug!(id = %msg.id, text = %msg.text, "message is not code");
            return;
        }

        let pending = match self.store.pending(&msg.author) {
            Ok(pending) => pending,
            Err(e) => {
                warn!(author = %msg.author, error = %e, "failed to read pending snippets");
                return;
            }
        };

        if pending.len() < 2 {
            debug!(author = %msg.author, slot = pending.len(), "storing snippet");
            if let Err(e) = self.store.push_pending(&msg.author, &code) {
                warn!(author = %msg.author, error = %e, "failed to store snippet");
            }
            return;
        }

        // Third snippet: the triple is consumed now, whatever the pipeline
        // outcome.
        if let Err(e) = self.store.clear_pending(&msg.author) {
            warn!(author = %msg.author, error = %e, "failed to clear pending snippets");
            return;
        }
        self.generate_and_publish(&msg.author, &pending[0], &pending[1], &code)
            .await;
    }

    async fn generate_and_publish(&self, author: &str, red: &str, green: &str, blue: &str) {
        info!(author, "generating art");
        info!(code = red, "R");
        info!(code = green, "G");
        info!(code = blue, "B");

        let deadline = Instant::now() + self.config.plot_timeout;
        let img = match generate(
            red,
            green,
            blue,
            self.config.width,
            self.config.height,
            deadline,
        )
        .await
        {
            Ok(img) => img,
            Err(e) => {
                warn!(author, error = %e, "image generation failed");
                return;
            }
        };

        let entry = ArchiveEntry {
            author: author.to_string(),
            red: red.to_string(),
            green: green.to_string(),
            blue: blue.to_string(),
        };
        if let Err(e) = self.store.record_archive(&entry) {
            warn!(author, error = %e, "failed to archive art");
        }

        let caption = pick_caption(author);
        if let Err(e) = self.publisher.publish(author, &caption, &img).await {
            warn!(author, error = %e, "failed to publish art");
        }
    }
}
