//! Pluggable randomness for `selectNode`, so tests can pin node selection
//! instead of depending on an unobservable global RNG.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub trait NodeRng: Send {
    /// Returns an index in `0..len`. Never called with `len == 0`.
    fn choose_index(&mut self, len: usize) -> usize;
}

pub struct StdNodeRng(StdRng);

impl StdNodeRng {
    pub fn from_os_entropy() -> Self {
        StdNodeRng(StdRng::from_os_rng())
    }

    pub fn from_seed(seed: u64) -> Self {
        StdNodeRng(StdRng::seed_from_u64(seed))
    }
}

impl NodeRng for StdNodeRng {
    fn choose_index(&mut self, len: usize) -> usize {
        self.0.random_range(0..len)
    }
}

/// Test helper: always picks a fixed index (clamped to the available range).
#[cfg(any(test, feature = "test-util"))]
pub struct FixedNodeRng(pub usize);

#[cfg(any(test, feature = "test-util"))]
impl NodeRng for FixedNodeRng {
    fn choose_index(&mut self, len: usize) -> usize {
        self.0.min(len - 1)
    }
}
