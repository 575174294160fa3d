//! Evaluation scope: pixel bindings plus the builtin table.

use std::cell::RefCell;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::builtins::Builtin;
use crate::value::Value;

/// A flat, single-level scope for one evaluation.
///
/// Pre-populated with `i`, `j` (pixel coordinates), `w`, `h` (canvas
/// dimensions) and every builtin under its symbol. Immutable after
/// construction apart from the random generator state, which is the
/// explicit per-scope source behind `rnd`.
pub struct Scope {
    vars: HashMap<&'static str, Value>,
    rng: RefCell<SmallRng>,
    cancel: Arc<AtomicBool>,
}

impl Scope {
    /// Create a scope for one pixel evaluation.
    pub fn for_pixel(i: i64, j: i64, w: i64, h: i64) -> Self {
        Self::with_cancel(i, j, w, h, Arc::new(AtomicBool::new(false)))
    }

    /// Create a scope whose evaluation can be stopped through `cancel`.
    ///
    /// Setting the flag makes the next call-node check fail with
    /// [`crate::LangError::Interrupted`]; already-running leaf work is not
    /// preempted.
    pub fn with_cancel(i: i64, j: i64, w: i64, h: i64, cancel: Arc<AtomicBool>) -> Self {
        let mut vars = HashMap::with_capacity(Builtin::ALL.len() + 4);
        for builtin in Builtin::ALL {
            vars.insert(builtin.name(), Value::Builtin(builtin));
        }
        vars.insert("i", Value::Int(i));
        vars.insert("j", Value::Int(j));
        vars.insert("w", Value::Int(w));
        vars.insert("h", Value::Int(h));
        Self {
            vars,
            rng: RefCell::new(SmallRng::from_rng(&mut rand::rng())),
            cancel,
        }
    }

    /// Look up a symbol.
    pub fn lookup(&self, name: &str) -> Option<Value> {
        self.vars.get(name).copied()
    }

    /// Whether the evaluation driving this scope was told to stop.
    pub fn is_cancelled(&self) -> bool {
        self.cancel.load(Ordering::Relaxed)
    }

    /// Draw the next random real in `[0.0, 1.0)` from this scope's
    /// generator.
    pub(crate) fn next_random(&self) -> f64 {
        self.rng.borrow_mut().random()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pixel_bindings() {
        let scope = Scope::for_pixel(3, 4, 640, 480);
        assert_eq!(scope.lookup("i"), Some(Value::Int(3)));
        assert_eq!(scope.lookup("j"), Some(Value::Int(4)));
        assert_eq!(scope.lookup("w"), Some(Value::Int(640)));
        assert_eq!(scope.lookup("h"), Some(Value::Int(480)));
    }

    #[test]
    fn test_builtins_are_bound() {
        let scope = Scope::for_pixel(0, 0, 1, 1);
        for builtin in Builtin::ALL {
            assert_eq!(scope.lookup(builtin.name()), Some(Value::Builtin(builtin)));
        }
    }

    #[test]
    fn test_unknown_symbol_is_absent() {
        let scope = Scope::for_pixel(0, 0, 1, 1);
        assert_eq!(scope.lookup("x"), None);
    }

    #[test]
    fn test_cancel_flag() {
        let cancel = Arc::new(AtomicBool::new(false));
        let scope = Scope::with_cancel(0, 0, 1, 1, Arc::clone(&cancel));
        assert!(!scope.is_cancelled());
        cancel.store(true, Ordering::Relaxed);
        assert!(scope.is_cancelled());
    }
}
