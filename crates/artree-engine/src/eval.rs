//! One snippet evaluation as a cancellable, deadline-raced unit of work.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use artree_lang::{eval, parse, LangError, Number, Scope, Value};
use tokio::time::{self, Instant};
use tracing::debug;

use crate::error::{EvalError, EvalResult};

/// The variables bound into a snippet's scope for one evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelBindings {
    /// Pixel column.
    pub i: i64,
    /// Pixel row.
    pub j: i64,
    /// Canvas width.
    pub w: i64,
    /// Canvas height.
    pub h: i64,
}

/// Evaluate one snippet against pixel bindings, bounded by `deadline`.
///
/// The `(parse, evaluate)` pair runs on a blocking worker so the caller is
/// never blocked past the deadline: whichever of "unit finished" and
/// "deadline elapsed" happens first wins. On timeout the unit is signalled
/// to stop at its next call node and detached; whatever it still computes
/// is discarded. A panic inside the unit is recovered as
/// [`EvalError::Fault`].
///
/// The snippet is re-parsed on every call; the final value must be numeric
/// or the evaluation fails with [`EvalError::ReturnType`].
pub async fn evaluate(code: &str, bindings: PixelBindings, deadline: Instant) -> EvalResult<Number> {
    if Instant::now() >= deadline {
        return Err(EvalError::DeadlineExceeded);
    }

    let cancel = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&cancel);
    let code = code.to_owned();

    let mut unit = tokio::task::spawn_blocking(move || -> EvalResult<Number> {
        let expr = parse(&code)?;
        let scope = Scope::with_cancel(bindings.i, bindings.j, bindings.w, bindings.h, flag);
        match eval(&expr, &scope)? {
            Value::Int(v) => Ok(Number::Int(v)),
            Value::Real(v) => Ok(Number::Real(v)),
            other => Err(EvalError::ReturnType(other.to_string())),
        }
    });

    tokio::select! {
        biased;

        joined = &mut unit => match joined {
            Ok(Err(EvalError::Lang(LangError::Interrupted))) => Err(EvalError::DeadlineExceeded),
            Ok(result) => result,
            Err(join) if join.is_panic() => Err(EvalError::Fault(panic_message(join.into_panic()))),
            Err(_) => Err(EvalError::Fault("evaluation task cancelled".to_string())),
        },

        _ = time::sleep_until(deadline) => {
            cancel.store(true, Ordering::Relaxed);
            debug!(i = bindings.i, j = bindings.j, "evaluation hit deadline, unit detached");
            Err(EvalError::DeadlineExceeded)
        }
    }
}

fn panic_message(payload: Box<dyn std::any::Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    const BINDINGS: PixelBindings = PixelBindings {
        i: 2,
        j: 3,
        w: 16,
        h: 16,
    };

    fn far_deadline() -> Instant {
        Instant::now() + Duration::from_secs(30)
    }

    #[tokio::test]
    async fn test_evaluate_integer_snippet() {
        let n = evaluate("(+ i j)", BINDINGS, far_deadline()).await.unwrap();
        assert_eq!(n, Number::Int(5));
    }

    #[tokio::test]
    async fn test_evaluate_real_snippet() {
        let n = evaluate("(sin 0)", BINDINGS, far_deadline()).await.unwrap();
        assert_eq!(n, Number::Real(0.0));
    }

    #[tokio::test]
    async fn test_parse_error_is_distinct() {
        let err = evaluate("(+ 1", BINDINGS, far_deadline()).await.unwrap_err();
        assert!(err.is_parse());
    }

    #[tokio::test]
    async fn test_unbound_symbol_surfaces() {
        let err = evaluate("(+ i q)", BINDINGS, far_deadline()).await.unwrap_err();
        assert_eq!(
            err,
            EvalError::Lang(LangError::UnboundSymbol("q".to_string()))
        );
        assert!(!err.is_parse());
    }

    #[tokio::test]
    async fn test_non_numeric_result_is_return_type_error() {
        let err = evaluate("sqrt", BINDINGS, far_deadline()).await.unwrap_err();
        assert!(matches!(err, EvalError::ReturnType(_)));
    }

    #[tokio::test]
    async fn test_elapsed_deadline_returns_deadline_exceeded() {
        let past = Instant::now() - Duration::from_millis(1);
        let err = evaluate("(+ 1 2)", BINDINGS, past).await.unwrap_err();
        assert_eq!(err, EvalError::DeadlineExceeded);
    }

    #[tokio::test(start_paused = true)]
    async fn test_deadline_does_not_block_caller() {
        // With paused time the sleep fires as soon as the runtime is idle,
        // so a hung unit cannot hold the caller past the deadline.
        let deadline = Instant::now() + Duration::from_millis(50);
        let err = evaluate("(% 12 0)", BINDINGS, deadline).await.unwrap_err();
        assert!(matches!(
            err,
            EvalError::Lang(LangError::Arithmetic { .. }) | EvalError::DeadlineExceeded
        ));
    }
}
