use chrono::Local;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::sync::Mutex;

struct LogState {
	file: Option<std::fs::File>,
	current_date: String,
	wheel_id: String,
	spin_num: u32,
}

static LOG_STATE: Mutex<LogState> = Mutex::new(LogState {
	file: None,
	current_date: String::new(),
	wheel_id: String::new(),
	spin_num: 0,
});

fn today() -> String {
	Local::now().format("%Y-%m-%d").to_string()
}

fn timestamp() -> String {
	Local::now().format("%H:%M:%S%.3f").to_string()
}

fn ensure_log_file(state: &mut LogState) {
	let date = today();
	if state.current_date != date || state.file.is_none() {
		let _ = fs::create_dir_all("logs");
		let path = format!("logs/wheel-{}.log", date);
		if let Ok(file) = OpenOptions::new()
			.create(true)
			.append(true)
			.open(&path)
		{
			state.file = Some(file);
			state.current_date = date;
		}
	}
}

pub fn set_wheel_id(wheel_id: u64) {
	if let Ok(mut state) = LOG_STATE.lock() {
		state.wheel_id = format!("{:08x}", wheel_id & 0xFFFFFFFF);
	}
}

pub fn set_spin_num(spin_num: u32) {
	if let Ok(mut state) = LOG_STATE.lock() {
		state.spin_num = spin_num;
	}
}

pub fn log(module: &str, log_type: &str, message: &str) {
	if let Ok(mut state) = LOG_STATE.lock() {
		ensure_log_file(&mut state);

		let wheel_id = if state.wheel_id.is_empty() { "--------" } else { &state.wheel_id };
		let line = format!(
			"[{}][{}][S{}][{}:{}] {}\n",
			timestamp(),
			wheel_id,
			state.spin_num,
			module,
			log_type,
			message
		);

		if let Some(ref mut file) = state.file {
			let _ = file.write_all(line.as_bytes());
			let _ = file.flush();
		}
	}
}

pub mod pool {
	use super::log;

	pub fn added(name: &str, size: usize) {
		log("Pool", "ADD", &format!("{} (size: {})", name, size));
	}

	pub fn removed(name: &str, size: usize) {
		log("Pool", "REMOVE", &format!("{} (size: {})", name, size));
	}

	pub fn imported(added: usize, rejected_for_capacity: usize) {
		if rejected_for_capacity > 0 {
			log("Pool", "IMPORT", &format!("added {} ({} over capacity)", added, rejected_for_capacity));
		} else {
			log("Pool", "IMPORT", &format!("added {}", added));
		}
	}

	pub fn cleared() {
		log("Pool", "CLEAR", "pool emptied");
	}
}

pub mod scheduler {
	use super::log;

	pub fn started(winner_index: usize, target_rotation_deg: f64, duration_ms: u64) {
		log(
			"Scheduler",
			"START",
			&format!("winner_index={} target={:.1}deg duration={}ms", winner_index, target_rotation_deg, duration_ms),
		);
	}

	pub fn completed(winner_index: usize, rotation_deg: f64, forced: bool) {
		let path = if forced { "forced" } else { "tick" };
		log(
			"Scheduler",
			"COMPLETE",
			&format!("winner_index={} rest={:.1}deg via {}", winner_index, rotation_deg, path),
		);
	}

	pub fn cancelled() {
		log("Scheduler", "CANCEL", "session dropped");
	}
}

pub mod wheel {
	use super::log;

	pub fn spin_started(pool_size: usize) {
		log("Wheel", "SPIN", &format!("started with {} entries", pool_size));
	}

	pub fn resolved(winner: &str, winner_index: usize) {
		log("Wheel", "RESOLVED", &format!("{} (segment {})", winner, winner_index));
	}

	pub fn rejected(kind: &str) {
		log("Wheel", "REJECTED", kind);
	}

	pub fn cancelled() {
		log("Wheel", "CANCEL", "spin cancelled before resolution");
	}
}
