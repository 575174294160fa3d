//! Outbound delivery seam.

use async_trait::async_trait;
use image::RgbaImage;

use crate::error::BotError;

/// Delivers a finished image plus a caption back to the outside world.
///
/// Publish failures are logged by the bot and never retried.
#[async_trait]
pub trait Publisher: Send + Sync {
    /// Deliver one generated image for `author`.
    async fn publish(&self, author: &str, caption: &str, image: &RgbaImage)
        -> Result<(), BotError>;
}
