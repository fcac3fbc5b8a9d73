use std::sync::{Arc, Mutex};

use giveaway_wheel::config::WheelConfig;
use giveaway_wheel::driver::SpinDriver;
use giveaway_wheel::events::WheelEvent;
use giveaway_wheel::scheduler::segment_at;
use giveaway_wheel::wheel::Wheel;

#[tokio::main]
async fn main() {
	println!("=== Giveaway Wheel Headless Test ===\n");

	let config = WheelConfig {
		spin_duration_ms: 2000,
		tick_interval_ms: 50,
		..WheelConfig::default()
	};
	let (mut wheel, handle) = Wheel::new(config);

	for name in ["Alice", "Bob", "Carol", "Dave", "Erin"] {
		wheel.add_entry(name).expect("add entry");
	}
	let pool_size = wheel.entries().len();

	let wheel = Arc::new(Mutex::new(wheel));
	let driver = SpinDriver::new(Arc::clone(&wheel));

	let outcome = driver
		.run_spin()
		.await
		.expect("spin failed")
		.expect("spin was not cancelled");

	let mut progress_ticks = 0;
	while let Ok(event) = handle.event_rx.try_recv() {
		match event {
			WheelEvent::PoolChanged { entries } => {
				println!("[POOL] {} entries", entries.len());
			}
			WheelEvent::Progress { rotation_deg } => {
				progress_ticks += 1;
				if progress_ticks % 10 == 0 {
					println!("[SPIN] {:8.1} deg", rotation_deg);
				}
			}
			WheelEvent::Resolved { winner_index, winner, final_rotation_deg } => {
				println!(
					"\n[WINNER] {} (segment {} of {}, rest at {:.1} deg)",
					winner.display_name, winner_index, pool_size, final_rotation_deg
				);
				println!(
					"[CHECK] pointer sits over segment {}",
					segment_at(final_rotation_deg, pool_size)
				);
			}
			WheelEvent::Rejected { error } => {
				println!("[REJECTED] {}", error);
			}
		}
	}

	println!("\n{} progress ticks, winner: {}", progress_ticks, outcome.winner.display_name);
}
