//! Submission accumulation for the artree art bot.
//!
//! Inbound messages arrive at-least-once from a polling source. This crate
//! turns that stream into exactly-once, ordered triples of code snippets
//! per author and hands each completed triple to the raster engine:
//!
//! ```text
//! Empty -> Collecting(1) -> Collecting(2) -> generate -> Empty
//! ```
//!
//! Every message id is claimed in the durable store before any other
//! effect, so duplicate deliveries are no-ops and a message is processed at
//! most once - even when a later step fails. The first two pending
//! snippets of an author become the R and G channels; the third triggers
//! generation and resets the author's record.

mod bot;
mod captions;
mod error;
mod message;
mod publish;
mod store;

pub use bot::{Bot, BotConfig};
pub use captions::pick_caption;
pub use error::{BotError, StoreError};
pub use message::{strip_bot_prefix, InboundMessage, MentionSource};
pub use publish::Publisher;
pub use store::{ArchiveEntry, JsonStore, MemoryStore, SubmissionStore};
