use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Instant;

use tokio::time::{Duration, interval, sleep};

use crate::errors::WheelError;
use crate::events::SpinOutcome;
use crate::wheel::Wheel;

fn lock_mutex<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
	mutex.lock().unwrap_or_else(|e| e.into_inner())
}

// Real-time host for one spin: a periodic progress tick and a one-shot
// forced-completion timer race into the wheel's idempotent completion. The
// quit signal tears the spin down without publishing an outcome.
pub struct SpinDriver {
	wheel: Arc<Mutex<Wheel>>,
	quit_signal: Arc<AtomicBool>,
}

impl SpinDriver {
	pub fn new(wheel: Arc<Mutex<Wheel>>) -> Self {
		Self {
			wheel,
			quit_signal: Arc::new(AtomicBool::new(false)),
		}
	}

	pub fn quit_signal(&self) -> Arc<AtomicBool> {
		Arc::clone(&self.quit_signal)
	}

	pub async fn run_spin(&self) -> Result<Option<SpinOutcome>, WheelError> {
		let (duration_ms, grace_ms, tick_ms) = {
			let wheel = lock_mutex(&self.wheel);
			let config = wheel.config();
			(
				config.spin_duration_ms,
				config.grace_period_ms,
				config.tick_interval_ms,
			)
		};

		let started = Instant::now();
		lock_mutex(&self.wheel).spin(0)?;

		let mut ticker = interval(Duration::from_millis(tick_ms.max(1)));
		let forced = sleep(Duration::from_millis(duration_ms + grace_ms));
		tokio::pin!(forced);

		loop {
			if self.quit_signal.load(Ordering::SeqCst) {
				lock_mutex(&self.wheel).cancel();
				return Ok(None);
			}

			tokio::select! {
				_ = ticker.tick() => {
					let now_ms = started.elapsed().as_millis() as u64;
					if let Some(outcome) = lock_mutex(&self.wheel).tick(now_ms) {
						return Ok(Some(outcome));
					}
				}
				_ = &mut forced => {
					// Grace timer won the race: end the spin where it is.
					return Ok(lock_mutex(&self.wheel).force_complete());
				}
			}
		}
	}
}
