//! Parsed expression tree.

/// A parsed snippet expression.
///
/// The integer-or-real tag of a number literal is fixed by its token and
/// preserved through evaluation. A call holds its operator expression and
/// the ordered argument list; arguments are evaluated left-to-right.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Integer literal, e.g. `42` or `-7`.
    Int(i64),

    /// Real literal, e.g. `0.5` or `1e3`.
    Real(f64),

    /// Symbol reference, e.g. `i` or `sqrt`.
    Symbol(String),

    /// Application in operator-first form, e.g. `(+ i 1)`.
    Call {
        /// The operator expression (almost always a symbol).
        target: Box<Expr>,
        /// Ordered arguments.
        args: Vec<Expr>,
    },
}
