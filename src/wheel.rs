use std::sync::Arc;
use std::sync::mpsc;

use serde::{Deserialize, Serialize};

use crate::config::WheelConfig;
use crate::errors::WheelError;
use crate::events::{Entry, EntryId, SpinOutcome, WheelEvent};
use crate::logging;
use crate::pool::{EntryPool, ImportReport};
use crate::scheduler::{SpinScheduler, Tick};
use crate::selection::SelectionEngine;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WheelState {
	Idle,
	Spinning,
	Resolved,
}

// Observers of the wheel's event stream. They see each event by reference
// and cannot touch the session that produced it.
pub trait WheelListener: Send + Sync {
	fn notify(&self, event: &WheelEvent);
}

// Binds the selection draw to the spin animation and publishes the outcome
// exactly once per spin. One instance per giveaway context; there is no
// process-wide wheel.
pub struct Wheel {
	config: WheelConfig,
	pool: EntryPool,
	selection: SelectionEngine,
	scheduler: SpinScheduler,
	state: WheelState,
	listeners: Vec<Arc<dyn WheelListener>>,
	event_tx: mpsc::Sender<WheelEvent>,
	last_outcome: Option<SpinOutcome>,
	spin_count: u32,
}

pub struct WheelHandle {
	pub event_rx: mpsc::Receiver<WheelEvent>,
}

impl Wheel {
	pub fn new(config: WheelConfig) -> (Self, WheelHandle) {
		let (event_tx, event_rx) = mpsc::channel();

		logging::set_wheel_id(rand::random::<u64>());

		let wheel = Self {
			pool: EntryPool::new(config.capacity),
			selection: SelectionEngine::new(config.seed),
			scheduler: SpinScheduler::new(
				config.min_full_spins,
				config.extra_full_spins,
				config.seed,
			),
			config,
			state: WheelState::Idle,
			listeners: Vec::new(),
			event_tx,
			last_outcome: None,
			spin_count: 0,
		};

		(wheel, WheelHandle { event_rx })
	}

	pub fn subscribe(&mut self, listener: Arc<dyn WheelListener>) {
		self.listeners.push(listener);
	}

	pub fn state(&self) -> WheelState {
		self.state
	}

	pub fn config(&self) -> &WheelConfig {
		&self.config
	}

	pub fn entries(&self) -> &[Entry] {
		self.pool.entries()
	}

	pub fn rotation_deg(&self) -> f64 {
		self.scheduler.rotation_deg()
	}

	pub fn last_outcome(&self) -> Option<&SpinOutcome> {
		self.last_outcome.as_ref()
	}

	pub fn add_entry(&mut self, name: &str) -> Result<Entry, WheelError> {
		match self.pool.add(name) {
			Ok(entry) => {
				self.emit_pool_changed();
				Ok(entry)
			}
			Err(error) => self.reject(error),
		}
	}

	pub fn remove_entry(&mut self, id: EntryId) -> Result<Entry, WheelError> {
		match self.pool.remove(id) {
			Ok(entry) => {
				self.emit_pool_changed();
				Ok(entry)
			}
			Err(error) => self.reject(error),
		}
	}

	pub fn import_entries(&mut self, text: &str) -> ImportReport {
		let report = self.pool.import_bulk(text);
		if !report.added.is_empty() {
			self.emit_pool_changed();
		}
		report
	}

	pub fn clear_entries(&mut self) {
		self.pool.clear();
		self.emit_pool_changed();
	}

	// "Remove after draw": drops the last winner from the pool so the next
	// spin is drawn among the rest. None when there is no outcome yet or the
	// winner was already removed.
	pub fn remove_winner(&mut self) -> Option<Entry> {
		let id = self.last_outcome.as_ref()?.winner.id;
		let entry = self.pool.remove(id).ok()?;
		self.emit_pool_changed();
		Some(entry)
	}

	pub fn spin(&mut self, now_ms: u64) -> Result<(), WheelError> {
		if self.state != WheelState::Idle {
			return self.reject(WheelError::SpinInProgress);
		}
		if self.pool.is_empty() {
			return self.reject(WheelError::EmptyPool);
		}

		// Snapshot once; the winner is drawn against this snapshot and any
		// later pool edits are invisible to the session.
		let snapshot = self.pool.snapshot();
		let winner_index = self.selection.pick_index(snapshot.len())?;

		self.spin_count += 1;
		logging::set_spin_num(self.spin_count);
		logging::wheel::spin_started(snapshot.len());

		self.scheduler
			.start(snapshot, winner_index, self.config.spin_duration_ms, now_ms)?;
		self.state = WheelState::Spinning;
		Ok(())
	}

	// Progress driver. Returns the outcome on the tick that completes the
	// spin, None otherwise.
	pub fn tick(&mut self, now_ms: u64) -> Option<SpinOutcome> {
		match self.scheduler.tick(now_ms)? {
			Tick::Progress { rotation_deg } => {
				self.emit(WheelEvent::Progress { rotation_deg });
				None
			}
			Tick::Completed { winner_index, final_rotation_deg } => {
				self.resolve(winner_index, final_rotation_deg)
			}
		}
	}

	// The grace-timer path. Idempotent against tick(): whichever completes
	// first publishes the outcome, the other returns None.
	pub fn force_complete(&mut self) -> Option<SpinOutcome> {
		match self.scheduler.force_complete()? {
			Tick::Completed { winner_index, final_rotation_deg } => {
				self.resolve(winner_index, final_rotation_deg)
			}
			Tick::Progress { .. } => None,
		}
	}

	// Host teardown while spinning: stop without publishing anything.
	pub fn cancel(&mut self) {
		if self.state == WheelState::Spinning {
			logging::wheel::cancelled();
		}
		self.scheduler.cancel();
		self.state = WheelState::Idle;
	}

	fn resolve(&mut self, winner_index: usize, final_rotation_deg: f64) -> Option<SpinOutcome> {
		let winner = {
			let session = self.scheduler.session()?;
			session.pool_snapshot.get(winner_index)?.clone()
		};

		self.state = WheelState::Resolved;
		logging::wheel::resolved(&winner.display_name, winner_index);

		let outcome = SpinOutcome {
			winner_index,
			winner,
			final_rotation_deg,
		};
		self.last_outcome = Some(outcome.clone());
		self.emit(WheelEvent::Resolved {
			winner_index,
			winner: outcome.winner.clone(),
			final_rotation_deg,
		});

		self.state = WheelState::Idle;
		Some(outcome)
	}

	fn reject<T>(&mut self, error: WheelError) -> Result<T, WheelError> {
		logging::wheel::rejected(error.kind());
		self.emit(WheelEvent::Rejected { error: error.clone() });
		Err(error)
	}

	fn emit_pool_changed(&mut self) {
		self.emit(WheelEvent::PoolChanged {
			entries: self.pool.snapshot(),
		});
	}

	fn emit(&self, event: WheelEvent) {
		for listener in &self.listeners {
			listener.notify(&event);
		}
		let _ = self.event_tx.send(event);
	}
}

#[cfg(test)]
mod tests {
	use std::sync::Mutex;

	use super::*;
	use crate::scheduler::segment_at;

	fn test_config() -> WheelConfig {
		WheelConfig {
			capacity: Some(20),
			spin_duration_ms: 1000,
			grace_period_ms: 500,
			tick_interval_ms: 16,
			min_full_spins: 3,
			extra_full_spins: 0,
			seed: Some(42),
		}
	}

	fn wheel_with(names: &[&str]) -> (Wheel, WheelHandle) {
		let (mut wheel, handle) = Wheel::new(test_config());
		for name in names {
			wheel.add_entry(name).unwrap();
		}
		(wheel, handle)
	}

	fn drain(handle: &WheelHandle) -> Vec<WheelEvent> {
		let mut events = Vec::new();
		while let Ok(event) = handle.event_rx.try_recv() {
			events.push(event);
		}
		events
	}

	struct Recorder {
		events: Mutex<Vec<WheelEvent>>,
	}

	impl WheelListener for Recorder {
		fn notify(&self, event: &WheelEvent) {
			self.events.lock().unwrap().push(event.clone());
		}
	}

	#[test]
	fn test_spin_on_empty_pool_rejected_without_transition() {
		let (mut wheel, handle) = wheel_with(&[]);
		assert_eq!(wheel.spin(0), Err(WheelError::EmptyPool));
		assert_eq!(wheel.state(), WheelState::Idle);

		let events = drain(&handle);
		assert!(matches!(
			events.as_slice(),
			[WheelEvent::Rejected { error: WheelError::EmptyPool }]
		));
	}

	#[test]
	fn test_spin_while_spinning_rejected() {
		let (mut wheel, _handle) = wheel_with(&["A", "B", "C"]);
		wheel.spin(0).unwrap();
		assert_eq!(wheel.spin(10), Err(WheelError::SpinInProgress));
		assert_eq!(wheel.state(), WheelState::Spinning);
	}

	#[test]
	fn test_full_cycle_returns_to_idle() {
		let (mut wheel, handle) = wheel_with(&["A", "B", "C", "D"]);
		wheel.spin(0).unwrap();
		assert_eq!(wheel.state(), WheelState::Spinning);

		assert!(wheel.tick(500).is_none());
		let outcome = wheel.tick(1000).expect("spin should complete");
		assert_eq!(wheel.state(), WheelState::Idle);

		let events = drain(&handle);
		let resolved: Vec<_> = events
			.iter()
			.filter(|e| matches!(e, WheelEvent::Resolved { .. }))
			.collect();
		assert_eq!(resolved.len(), 1);

		// The published winner is the snapshot entry under the pointer.
		assert_eq!(segment_at(outcome.final_rotation_deg, 4), outcome.winner_index);
		assert!(wheel.spin(2000).is_ok());
	}

	#[test]
	fn test_completion_paths_publish_once_either_order() {
		// Normal tick first, forced second.
		let (mut wheel, handle) = wheel_with(&["A", "B", "C"]);
		wheel.spin(0).unwrap();
		let first = wheel.tick(1000).expect("tick completes");
		assert!(wheel.force_complete().is_none());
		let resolved = drain(&handle)
			.into_iter()
			.filter(|e| matches!(e, WheelEvent::Resolved { .. }))
			.count();
		assert_eq!(resolved, 1);

		// Forced first, late tick second.
		let (mut wheel, handle) = wheel_with(&["A", "B", "C"]);
		wheel.spin(0).unwrap();
		let second = wheel.force_complete().expect("forced completes");
		assert!(wheel.tick(1000).is_none());
		let resolved = drain(&handle)
			.into_iter()
			.filter(|e| matches!(e, WheelEvent::Resolved { .. }))
			.count();
		assert_eq!(resolved, 1);

		// Same seed, same pool: both paths must report the same payload.
		assert_eq!(first, second);
	}

	#[test]
	fn test_pool_edits_during_spin_do_not_move_outcome() {
		let (mut wheel, _handle) = wheel_with(&["A", "B", "C", "D"]);
		wheel.spin(0).unwrap();

		wheel.clear_entries();
		wheel.add_entry("Z").unwrap();

		let outcome = wheel.tick(1000).expect("spin should complete");
		assert!(["A", "B", "C", "D"].contains(&outcome.winner.display_name.as_str()));
	}

	#[test]
	fn test_cancel_mid_spin_publishes_nothing() {
		let (mut wheel, handle) = wheel_with(&["A", "B"]);
		wheel.spin(0).unwrap();
		drain(&handle);

		wheel.cancel();
		assert_eq!(wheel.state(), WheelState::Idle);
		assert!(wheel.tick(1000).is_none());
		assert!(wheel.force_complete().is_none());
		assert!(drain(&handle).is_empty());
		assert!(wheel.last_outcome().is_none());

		// Ready for a fresh spin.
		assert!(wheel.spin(2000).is_ok());
	}

	#[test]
	fn test_progress_events_reach_listeners() {
		let (mut wheel, _handle) = wheel_with(&["A", "B", "C"]);
		let recorder = Arc::new(Recorder { events: Mutex::new(Vec::new()) });
		wheel.subscribe(recorder.clone());

		wheel.spin(0).unwrap();
		wheel.tick(250);
		wheel.tick(500);
		wheel.tick(1000);

		let events = recorder.events.lock().unwrap();
		let progress = events
			.iter()
			.filter(|e| matches!(e, WheelEvent::Progress { .. }))
			.count();
		let resolved = events
			.iter()
			.filter(|e| matches!(e, WheelEvent::Resolved { .. }))
			.count();
		assert_eq!(progress, 2);
		assert_eq!(resolved, 1);
	}

	#[test]
	fn test_commands_emit_pool_changed() {
		let (mut wheel, handle) = wheel_with(&[]);
		wheel.add_entry("Alice").unwrap();
		let entry = wheel.add_entry("Bob").unwrap();
		wheel.remove_entry(entry.id).unwrap();
		wheel.import_entries("Carol\nDave\n");
		wheel.clear_entries();

		let changed = drain(&handle)
			.into_iter()
			.filter(|e| matches!(e, WheelEvent::PoolChanged { .. }))
			.count();
		assert_eq!(changed, 5);
	}

	#[test]
	fn test_remove_winner_after_draw() {
		let (mut wheel, _handle) = wheel_with(&["A", "B", "C"]);
		assert!(wheel.remove_winner().is_none());

		wheel.spin(0).unwrap();
		let outcome = wheel.tick(1000).unwrap();

		let removed = wheel.remove_winner().expect("winner still in pool");
		assert_eq!(removed.id, outcome.winner.id);
		assert_eq!(wheel.entries().len(), 2);

		// Second call finds nothing left to remove.
		assert!(wheel.remove_winner().is_none());
	}

	#[test]
	fn test_command_errors_surface_and_emit_rejected() {
		let (mut wheel, handle) = wheel_with(&["Alice"]);
		drain(&handle);

		assert!(wheel.add_entry("Alice").is_err());
		assert!(wheel.remove_entry(EntryId(999)).is_err());

		let rejected = drain(&handle)
			.into_iter()
			.filter(|e| matches!(e, WheelEvent::Rejected { .. }))
			.count();
		assert_eq!(rejected, 2);
	}

	#[test]
	fn test_seeded_wheels_agree_on_winner() {
		let (mut a, _) = wheel_with(&["A", "B", "C", "D", "E"]);
		let (mut b, _) = wheel_with(&["A", "B", "C", "D", "E"]);
		a.spin(0).unwrap();
		b.spin(0).unwrap();
		assert_eq!(
			a.force_complete().unwrap().winner,
			b.force_complete().unwrap().winner
		);
	}
}
