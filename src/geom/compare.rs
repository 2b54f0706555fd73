//! Absolute-epsilon comparison of reals.
//!
//! The tolerance is absolute, so it only makes sense when both operands are
//! in the same units and of similar magnitude.

/// Default comparison tolerance.
pub const DEFAULT_EPSILON: f64 = 1e-8;

/// Comparator with an explicit absolute tolerance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerance {
    pub epsilon: f64,
}

impl Default for Tolerance {
    fn default() -> Self {
        Tolerance {
            epsilon: DEFAULT_EPSILON,
        }
    }
}

impl Tolerance {
    pub fn new(epsilon: f64) -> Self {
        Tolerance { epsilon }
    }

    pub fn eq(&self, x: f64, y: f64) -> bool {
        (x - y).abs() < self.epsilon
    }

    pub fn lt(&self, x: f64, y: f64) -> bool {
        x + self.epsilon < y
    }

    pub fn lteq(&self, x: f64, y: f64) -> bool {
        self.lt(x, y) || self.eq(x, y)
    }

    pub fn gt(&self, x: f64, y: f64) -> bool {
        x - self.epsilon > y
    }

    pub fn gteq(&self, x: f64, y: f64) -> bool {
        self.gt(x, y) || self.eq(x, y)
    }
}
