use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::errors::WheelError;
use crate::events::Entry;
use crate::logging;

// Segment i occupies [i*span, (i+1)*span) clockwise from the pointer, which
// sits at the wheel-local reference angle 0/360.
pub fn segment_span(pool_size: usize) -> f64 {
	360.0 / pool_size as f64
}

pub fn segment_center(pool_size: usize, index: usize) -> f64 {
	let span = segment_span(pool_size);
	index as f64 * span + span / 2.0
}

// Rotation that brings the winner segment's center to the reference angle.
// The residue is taken against the normalized current rotation, so chained
// spins land exactly regardless of where the previous one stopped.
pub fn compute_target_rotation(
	pool_size: usize,
	winner_index: usize,
	current_rotation_deg: f64,
	full_spins: u32,
) -> f64 {
	let center = segment_center(pool_size, winner_index);
	let residue = (360.0 - center - current_rotation_deg).rem_euclid(360.0);
	current_rotation_deg + full_spins as f64 * 360.0 + residue
}

// Inverse of compute_target_rotation: which segment sits under the pointer
// at a given rotation. Used to audit the geometry, never to pick the winner.
pub fn segment_at(rotation_deg: f64, pool_size: usize) -> usize {
	let local = (360.0 - rotation_deg.rem_euclid(360.0)).rem_euclid(360.0);
	let index = (local / segment_span(pool_size)) as usize;
	index.min(pool_size - 1)
}

pub fn ease_out_cubic(t: f64) -> f64 {
	1.0 - (1.0 - t).powi(3)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionState {
	Spinning,
	Resolved,
}

// One attempt to animate toward and resolve a winner. Holds its own pool
// snapshot so mid-spin pool edits cannot move the outcome.
#[derive(Debug, Clone)]
pub struct SpinSession {
	pub pool_snapshot: Vec<Entry>,
	pub winner_index: usize,
	pub start_rotation_deg: f64,
	pub target_rotation_deg: f64,
	pub started_at_ms: u64,
	pub duration_ms: u64,
	pub state: SessionState,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Tick {
	Progress { rotation_deg: f64 },
	Completed { winner_index: usize, final_rotation_deg: f64 },
}

pub struct SpinScheduler {
	rotation_deg: f64,
	session: Option<SpinSession>,
	min_full_spins: u32,
	extra_full_spins: u32,
	rng: StdRng,
}

impl SpinScheduler {
	pub fn new(min_full_spins: u32, extra_full_spins: u32, seed: Option<u64>) -> Self {
		let rng = match seed {
			Some(s) => StdRng::seed_from_u64(s),
			None => StdRng::from_os_rng(),
		};
		Self {
			rotation_deg: 0.0,
			session: None,
			min_full_spins,
			extra_full_spins,
			rng,
		}
	}

	pub fn is_spinning(&self) -> bool {
		matches!(
			self.session,
			Some(SpinSession { state: SessionState::Spinning, .. })
		)
	}

	pub fn rotation_deg(&self) -> f64 {
		self.rotation_deg
	}

	pub fn session(&self) -> Option<&SpinSession> {
		self.session.as_ref()
	}

	pub fn start(
		&mut self,
		pool_snapshot: Vec<Entry>,
		winner_index: usize,
		duration_ms: u64,
		now_ms: u64,
	) -> Result<(), WheelError> {
		if self.is_spinning() {
			return Err(WheelError::SpinInProgress);
		}
		if pool_snapshot.is_empty() {
			return Err(WheelError::EmptyPool);
		}

		// The extra spins are showmanship only; the winner is fixed before
		// any rotation math happens.
		let full_spins = self.min_full_spins
			+ if self.extra_full_spins > 0 {
				self.rng.random_range(0..=self.extra_full_spins)
			} else {
				0
			};

		let target_rotation_deg = compute_target_rotation(
			pool_snapshot.len(),
			winner_index,
			self.rotation_deg,
			full_spins,
		);

		logging::scheduler::started(winner_index, target_rotation_deg, duration_ms);

		self.session = Some(SpinSession {
			pool_snapshot,
			winner_index,
			start_rotation_deg: self.rotation_deg,
			target_rotation_deg,
			started_at_ms: now_ms,
			duration_ms,
			state: SessionState::Spinning,
		});
		Ok(())
	}

	pub fn tick(&mut self, now_ms: u64) -> Option<Tick> {
		let (t, start, target) = {
			let session = self.session.as_ref()?;
			if session.state != SessionState::Spinning {
				return None;
			}
			let elapsed = now_ms.saturating_sub(session.started_at_ms);
			let t = if session.duration_ms == 0 {
				1.0
			} else {
				(elapsed as f64 / session.duration_ms as f64).min(1.0)
			};
			(t, session.start_rotation_deg, session.target_rotation_deg)
		};

		if t >= 1.0 {
			return self.complete(false);
		}

		self.rotation_deg = start + (target - start) * ease_out_cubic(t);
		Some(Tick::Progress { rotation_deg: self.rotation_deg })
	}

	// Fallback path armed by the host for duration + grace. Safe to call at
	// any time: once the session is Resolved this is a no-op.
	pub fn force_complete(&mut self) -> Option<Tick> {
		match self.session {
			Some(SpinSession { state: SessionState::Spinning, .. }) => self.complete(true),
			_ => None,
		}
	}

	// Both completion paths land here; whichever fires second sees the
	// Resolved state upstream and never reaches it.
	fn complete(&mut self, forced: bool) -> Option<Tick> {
		let session = self.session.as_mut()?;
		session.state = SessionState::Resolved;
		self.rotation_deg = session.target_rotation_deg;
		logging::scheduler::completed(session.winner_index, session.target_rotation_deg, forced);
		Some(Tick::Completed {
			winner_index: session.winner_index,
			final_rotation_deg: session.target_rotation_deg,
		})
	}

	pub fn cancel(&mut self) {
		if self.session.take().is_some() {
			logging::scheduler::cancelled();
		}
	}
}
