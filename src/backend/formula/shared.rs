use std::sync::Arc;

use parking_lot::Mutex;

use super::GuardedFormula;

/// A guarded formula shared between resolution threads.
///
/// Every access goes through one lock, so concurrent inserts of the same
/// condition still resolve to a single node.
#[derive(Debug, Clone, Default)]
pub struct SharedFormula {
    inner: Arc<Mutex<GuardedFormula>>,
}

impl SharedFormula {
    pub fn new(formula: GuardedFormula) -> Self {
        SharedFormula {
            inner: Arc::new(Mutex::new(formula)),
        }
    }

    /// Run `f` with exclusive access to the formula
    pub fn with<R>(&self, f: impl FnOnce(&mut GuardedFormula) -> R) -> R {
        let mut formula = self.inner.lock();
        f(&mut formula)
    }

    /// Take the formula back once every other handle is dropped
    pub fn into_inner(self) -> Result<GuardedFormula, SharedFormula> {
        Arc::try_unwrap(self.inner)
            .map(Mutex::into_inner)
            .map_err(|inner| SharedFormula { inner })
    }
}
