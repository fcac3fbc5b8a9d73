use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use clap::Parser;

use giveaway_wheel::config::load_config_auto;
use giveaway_wheel::defaults::ensure_config;
use giveaway_wheel::driver::SpinDriver;
use giveaway_wheel::events::WheelEvent;
use giveaway_wheel::wheel::{Wheel, WheelListener};

#[derive(Parser)]
#[command(name = "giveaway", about = "Spin the wheel and draw a winner from a pool of names")]
struct Args {
	/// File with one entry name per line
	#[arg(short, long)]
	names: Option<PathBuf>,

	/// Entry names given directly on the command line
	entries: Vec<String>,

	/// Override the configured spin duration
	#[arg(long)]
	duration_ms: Option<u64>,

	/// Deterministic draw sequence
	#[arg(long, env = "GIVEAWAY_SEED")]
	seed: Option<u64>,

	/// Print the outcome as JSON instead of text
	#[arg(long)]
	json: bool,
}

struct ProgressPrinter;

impl WheelListener for ProgressPrinter {
	fn notify(&self, event: &WheelEvent) {
		if let WheelEvent::Progress { rotation_deg } = event {
			print!("\r  spinning... {:8.1} deg", rotation_deg);
			let _ = io::stdout().flush();
		}
	}
}

#[tokio::main]
async fn main() {
	let args = Args::parse();

	ensure_config();
	let mut config = match load_config_auto() {
		Ok(config) => config,
		Err(e) => {
			eprintln!("{}", e);
			std::process::exit(1);
		}
	};
	if let Some(duration_ms) = args.duration_ms {
		config.spin_duration_ms = duration_ms;
	}
	if args.seed.is_some() {
		config.seed = args.seed;
	}
	let spin_duration_ms = config.spin_duration_ms;

	let (mut wheel, _handle) = Wheel::new(config);

	if let Some(path) = &args.names {
		let text = match fs::read_to_string(path) {
			Ok(text) => text,
			Err(e) => {
				eprintln!("Failed to read {}: {}", path.display(), e);
				std::process::exit(1);
			}
		};
		let report = wheel.import_entries(&text);
		if report.rejected_for_capacity > 0 {
			eprintln!(
				"{} names did not fit under the pool capacity",
				report.rejected_for_capacity
			);
		}
	}

	for name in &args.entries {
		if let Err(e) = wheel.add_entry(name) {
			eprintln!("skipping '{}': {}", name, e);
		}
	}

	let pool_size = wheel.entries().len();
	if pool_size == 0 {
		eprintln!("No entries to draw from. Pass names as arguments or with --names <file>.");
		std::process::exit(1);
	}

	if !args.json {
		println!("Drawing among {} entries ({} ms spin)...", pool_size, spin_duration_ms);
		wheel.subscribe(Arc::new(ProgressPrinter));
	}

	let wheel = Arc::new(Mutex::new(wheel));
	let driver = SpinDriver::new(Arc::clone(&wheel));

	let outcome = match driver.run_spin().await {
		Ok(Some(outcome)) => outcome,
		Ok(None) => {
			eprintln!("Spin was cancelled");
			std::process::exit(1);
		}
		Err(e) => {
			eprintln!("{}", e);
			std::process::exit(1);
		}
	};

	if args.json {
		println!("{}", serde_json::to_string_pretty(&outcome).expect("serialize outcome"));
	} else {
		println!(
			"\n\nWinner: {} (entry {} of {})",
			outcome.winner.display_name,
			outcome.winner_index + 1,
			pool_size
		);
	}
}
