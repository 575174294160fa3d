//! Tree-walking evaluation.

use crate::ast::Expr;
use crate::error::{LangError, LangResult};
use crate::scope::Scope;
use crate::value::Value;

/// Evaluate one expression against a scope.
///
/// A call node evaluates its operator first (which must resolve to a
/// builtin), then its arguments left-to-right, then applies. The scope's
/// cancellation flag is checked at every call node so a signalled
/// evaluation stops at the next application boundary.
pub fn eval(expr: &Expr, scope: &Scope) -> LangResult<Value> {
    match expr {
        Expr::Int(v) => Ok(Value::Int(*v)),
        Expr::Real(v) => Ok(Value::Real(*v)),
        Expr::Symbol(name) => scope
            .lookup(name)
            .ok_or_else(|| LangError::UnboundSymbol(name.clone())),
        Expr::Call { target, args } => {
            if scope.is_cancelled() {
                return Err(LangError::Interrupted);
            }
            let callee = eval(target, scope)?;
            let Value::Builtin(builtin) = callee else {
                return Err(LangError::TypeMismatch {
                    function: "call",
                    value: callee.to_string(),
                });
            };
            let mut argv = Vec::with_capacity(args.len());
            for arg in args {
                argv.push(eval(arg, scope)?);
            }
            builtin.apply(&argv, scope)
        }
    }
}
