//! Caption options for published art.

use rand::Rng;

/// Reply captions. `{author}` is replaced by the author's handle.
const CAPTIONS: &[&str] = &[
    "Hey @{author} you are truly an artist.",
    "@{author} good artists copy, great artists steal!",
    "@{author} I can see some patterns!",
    "@{author} there are some nice colors there!",
    "@{author} our new Picasso!",
    "@{author} like Michelangelo you should order it to speak",
    "Look at the new paint made by @{author}",
    "The next item is this beautiful painting by @{author} - any bids?",
    "I am going to buy this one @{author}",
    "Should I buy this one @{author} ?",
    "@{author} awesome!",
    "@{author} this is my favorite contemporanean art",
];

/// Pick a caption for `author`, uniformly at random.
pub fn pick_caption(author: &str) -> String {
    let idx = rand::rng().random_range(0..CAPTIONS.len());
    CAPTIONS[idx].replace("{author}", author)
}
