//! Prefix expression language for artree art snippets.
//!
//! Snippets are small parenthesized expressions in operator-first form,
//! evaluated once per pixel with the pixel coordinates bound in scope:
//!
//! ```text
//! (& (* i j) 255)
//! (sin (/ i w))
//! (% (+ i j) 256)
//! ```
//!
//! ## Core Concepts
//!
//! - **Expr**: the parsed tree - number literals, symbols, and calls
//! - **Value**: what an expression evaluates to - a tagged 64-bit integer
//!   or real, or a builtin function
//! - **Scope**: a flat, single-level binding of `i`, `j`, `w`, `h` and the
//!   builtin table, created fresh for every evaluation
//! - **Builtin**: the fixed function set (`sin`, `cos`, `sqrt`, `%`, `&`,
//!   `|`, `rnd`, and base arithmetic)
//!
//! Parsing and evaluation report distinct error kinds via [`LangError`];
//! there is no implicit coercion beyond the per-builtin rules documented
//! on [`Builtin`].

mod ast;
mod builtins;
mod error;
mod eval;
mod parse;
mod scope;
mod value;

pub use ast::Expr;
pub use builtins::Builtin;
pub use error::{LangError, LangResult};
pub use eval::eval;
pub use parse::{is_code, parse, MAX_DEPTH};
pub use scope::Scope;
pub use value::{Number, Value};
