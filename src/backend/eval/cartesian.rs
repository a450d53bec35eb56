//! Lazy Cartesian product over guarded operand values
//!
//! Generates combinations on demand using an index-based "multi-digit counter".
//! Memory usage is O(n) for indices regardless of product size.

use smallvec::SmallVec;
use tracing::trace;

use crate::backend::grounded::ExecError;
use crate::backend::models::GuardedValue;

/// One guarded value per operand.
/// Stack-allocated for arity <= 4, which covers every standard function.
pub type Combination<'a> = SmallVec<[&'a GuardedValue; 4]>;

/// Lazy Cartesian product of borrowed operand value lists.
///
/// With no operands it yields exactly one empty combination (a nullary
/// function is applied once); with any empty operand it yields nothing.
#[derive(Debug, Clone)]
pub struct GuardedProduct<'a> {
    operands: &'a [Vec<GuardedValue>],
    /// Current indices into each operand list (the "counter")
    indices: SmallVec<[usize; 4]>,
    exhausted: bool,
}

impl<'a> GuardedProduct<'a> {
    pub fn new(operands: &'a [Vec<GuardedValue>]) -> Self {
        GuardedProduct {
            operands,
            indices: smallvec::smallvec![0; operands.len()],
            exhausted: operands.iter().any(|values| values.is_empty()),
        }
    }

    /// Advance indices like a multi-digit counter (rightmost varies fastest).
    fn advance_indices(&mut self) {
        for i in (0..self.indices.len()).rev() {
            self.indices[i] += 1;
            if self.indices[i] < self.operands[i].len() {
                return;
            }
            self.indices[i] = 0;
        }
        // Counter overflowed - all combinations exhausted
        self.exhausted = true;
    }
}

impl<'a> Iterator for GuardedProduct<'a> {
    type Item = Combination<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.exhausted {
            return None;
        }

        let combo: Combination<'a> = self
            .indices
            .iter()
            .zip(self.operands.iter())
            .map(|(&idx, values)| &values[idx])
            .collect();

        self.advance_indices();
        Some(combo)
    }
}

/// Number of combinations `operands` produce
pub fn product_size(operands: &[Vec<GuardedValue>]) -> usize {
    operands
        .iter()
        .map(Vec::len)
        .fold(1usize, |acc, len| acc.saturating_mul(len))
}

/// Reject products larger than `limit` before any combination is built
pub fn check_product_size(operands: &[Vec<GuardedValue>], limit: usize) -> Result<usize, ExecError> {
    let size = product_size(operands);
    trace!(target: "dcground::backend::eval::check_product_size", size, limit);
    if size > limit {
        return Err(ExecError::CombinatorialExplosion { size, limit });
    }
    Ok(size)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::models::{Number, Value};

    fn values(ns: &[i64]) -> Vec<GuardedValue> {
        ns.iter()
            .map(|&n| GuardedValue::certain(Value::Number(Number::Int(n))))
            .collect()
    }

    #[test]
    fn test_product_enumerates_all_combinations_in_order() {
        let operands = vec![values(&[1, 2]), values(&[10, 20, 30])];
        let combos: Vec<Vec<Value>> = GuardedProduct::new(&operands)
            .map(|c| c.iter().map(|gv| gv.value.clone()).collect())
            .collect();

        assert_eq!(combos.len(), 6);
        assert_eq!(combos[0], vec![Value::Number(Number::Int(1)), Value::Number(Number::Int(10))]);
        assert_eq!(combos[1], vec![Value::Number(Number::Int(1)), Value::Number(Number::Int(20))]);
        assert_eq!(combos[5], vec![Value::Number(Number::Int(2)), Value::Number(Number::Int(30))]);
    }

    #[test]
    fn test_no_operands_gives_one_empty_combination() {
        let operands: Vec<Vec<GuardedValue>> = vec![];
        let combos: Vec<_> = GuardedProduct::new(&operands).collect();
        assert_eq!(combos.len(), 1);
        assert!(combos[0].is_empty());
    }

    #[test]
    fn test_empty_operand_gives_nothing() {
        let operands = vec![values(&[1, 2]), vec![]];
        assert_eq!(GuardedProduct::new(&operands).count(), 0);
        assert_eq!(product_size(&operands), 0);
    }

    #[test]
    fn test_size_limit() {
        let operands = vec![values(&[1, 2, 3]), values(&[1, 2, 3])];
        assert_eq!(check_product_size(&operands, 9), Ok(9));
        assert_eq!(
            check_product_size(&operands, 8),
            Err(ExecError::CombinatorialExplosion { size: 9, limit: 8 })
        );
    }
}
