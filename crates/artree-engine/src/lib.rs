//! Deadline-bounded snippet evaluation and full-image raster generation.
//!
//! The engine wraps one `(parse, evaluate)` pair in a cancellable unit of
//! work raced against a caller-supplied deadline, and drives that unit once
//! per pixel per color channel to assemble an image:
//!
//! ```text
//! generate(code_r, code_g, code_b, w, h, deadline)
//!   └── for every pixel (i, j):
//!         evaluate(code_r, ...) -> R    \
//!         evaluate(code_g, ...) -> G     shared deadline
//!         evaluate(code_b, ...) -> B    /
//! ```
//!
//! The first failing evaluation of any kind aborts the whole image; no
//! partial image is ever returned.

mod error;
mod eval;
mod raster;

pub use error::{EvalError, EvalResult};
pub use eval::{evaluate, PixelBindings};
pub use raster::{channel_intensity, generate};
