use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::errors::WheelError;

// Draws the winner index uniformly from [0, pool_size). StdRng is a
// general-purpose PRNG: adequate for an entertainment draw, not a security
// control.
pub struct SelectionEngine {
	rng: StdRng,
}

impl SelectionEngine {
	pub fn new(seed: Option<u64>) -> Self {
		let rng = match seed {
			Some(s) => StdRng::seed_from_u64(s),
			None => StdRng::from_os_rng(),
		};
		Self { rng }
	}

	pub fn pick_index(&mut self, pool_size: usize) -> Result<usize, WheelError> {
		if pool_size == 0 {
			return Err(WheelError::EmptyPool);
		}
		Ok(self.rng.random_range(0..pool_size))
	}
}
