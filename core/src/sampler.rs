use alloc::vec::Vec;

use hashbrown::HashMap;
use rand::prelude::*;
use rand::rngs::SmallRng;

use crate::*;

/// Draws distinct integers from an inclusive range without replacement.
///
/// Uses a sparse partial Fisher–Yates shuffle: only the swapped slots are
/// remembered, so a draw costs `O(k)` time and memory no matter how wide the
/// range is.
#[derive(Clone, Debug)]
pub struct RandomSampler<R = SmallRng> {
    rng: R,
}

impl RandomSampler<SmallRng> {
    pub fn from_seed(seed: u64) -> Self {
        Self::new(SmallRng::seed_from_u64(seed))
    }

    pub fn from_os_rng() -> Self {
        Self::new(SmallRng::from_os_rng())
    }
}

impl<R: Rng> RandomSampler<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    /// Returns `k` distinct values from `lo..=hi`, in draw order.
    ///
    /// An empty range (`lo > hi`) holds no values, so only `k == 0` succeeds.
    pub fn sample(
        &mut self,
        k: CellCount,
        lo: CellCount,
        hi: CellCount,
    ) -> Result<Vec<CellCount>> {
        let available = if lo > hi {
            0
        } else {
            u64::from(hi - lo) + 1
        };

        if u64::from(k) > available {
            return Err(GameError::InvalidSampleRequest {
                requested: k,
                available: available.try_into().unwrap_or(CellCount::MAX),
            });
        }

        let k = u64::from(k);
        let mut swapped: HashMap<u64, u64> = HashMap::with_capacity(k as usize);
        let mut picked = Vec::with_capacity(k as usize);

        for i in 0..k {
            let j = self.rng.random_range(i..available);
            let at_j = swapped.get(&j).copied().unwrap_or(j);
            let at_i = swapped.get(&i).copied().unwrap_or(i);
            swapped.insert(j, at_i);
            // offsets never exceed `hi - lo`, so this stays in range
            picked.push(lo + at_j as CellCount);
        }

        Ok(picked)
    }
}
