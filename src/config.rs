use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

// Engine tuning knobs. Everything has a default so an absent or partial
// wheel.toml still yields a working wheel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WheelConfig {
	// Maximum pool size; None means unbounded. The shipped default keeps
	// the historical 20-entry cap.
	#[serde(default = "default_capacity")]
	pub capacity: Option<usize>,

	#[serde(default = "default_spin_duration")]
	pub spin_duration_ms: u64,

	// How long past the nominal duration the forced-completion timer waits
	// before it ends a stalled spin.
	#[serde(default = "default_grace_period")]
	pub grace_period_ms: u64,

	#[serde(default = "default_tick_interval")]
	pub tick_interval_ms: u64,

	#[serde(default = "default_min_full_spins")]
	pub min_full_spins: u32,

	// Random extra turns drawn from 0..=this, for visual variety only.
	#[serde(default = "default_extra_full_spins")]
	pub extra_full_spins: u32,

	#[serde(default)]
	pub seed: Option<u64>,
}

fn default_capacity() -> Option<usize> {
	Some(20)
}

fn default_spin_duration() -> u64 {
	6000
}

fn default_grace_period() -> u64 {
	500
}

fn default_tick_interval() -> u64 {
	16
}

fn default_min_full_spins() -> u32 {
	3
}

fn default_extra_full_spins() -> u32 {
	2
}

impl Default for WheelConfig {
	fn default() -> Self {
		Self {
			capacity: default_capacity(),
			spin_duration_ms: default_spin_duration(),
			grace_period_ms: default_grace_period(),
			tick_interval_ms: default_tick_interval(),
			min_full_spins: default_min_full_spins(),
			extra_full_spins: default_extra_full_spins(),
			seed: None,
		}
	}
}

fn config_paths(filename: &str) -> Vec<PathBuf> {
	let mut paths = Vec::new();

	if let Some(config_dir) = dirs::config_dir() {
		paths.push(config_dir.join("giveaway-wheel").join(filename));
	}

	paths.push(PathBuf::from("config").join(filename));

	paths
}

fn find_config(filename: &str) -> Option<PathBuf> {
	config_paths(filename).into_iter().find(|p| p.exists())
}

pub fn load_config<P: AsRef<Path>>(path: P) -> Result<WheelConfig, String> {
	let content = fs::read_to_string(&path)
		.map_err(|e| format!("Failed to read {}: {}", path.as_ref().display(), e))?;

	toml::from_str(&content).map_err(|e| format!("Failed to parse wheel config: {}", e))
}

pub fn load_config_auto() -> Result<WheelConfig, String> {
	match find_config("wheel.toml") {
		Some(path) => load_config(&path),
		None => Ok(WheelConfig::default()),
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_defaults() {
		let config = WheelConfig::default();
		assert_eq!(config.capacity, Some(20));
		assert_eq!(config.spin_duration_ms, 6000);
		assert_eq!(config.grace_period_ms, 500);
		assert_eq!(config.tick_interval_ms, 16);
		assert_eq!(config.min_full_spins, 3);
		assert_eq!(config.extra_full_spins, 2);
		assert_eq!(config.seed, None);
	}

	#[test]
	fn test_partial_toml_fills_in_defaults() {
		let config: WheelConfig = toml::from_str("spin_duration_ms = 1500\n").unwrap();
		assert_eq!(config.spin_duration_ms, 1500);
		assert_eq!(config.capacity, Some(20));
		assert_eq!(config.min_full_spins, 3);
	}

	#[test]
	fn test_empty_toml_is_all_defaults() {
		let config: WheelConfig = toml::from_str("").unwrap();
		assert_eq!(config.capacity, Some(20));
		assert_eq!(config.grace_period_ms, 500);
	}

	#[test]
	fn test_full_toml_overrides_everything() {
		let config: WheelConfig = toml::from_str(
			"capacity = 50\n\
			 spin_duration_ms = 3000\n\
			 grace_period_ms = 250\n\
			 tick_interval_ms = 33\n\
			 min_full_spins = 5\n\
			 extra_full_spins = 0\n\
			 seed = 42\n",
		)
		.unwrap();
		assert_eq!(config.capacity, Some(50));
		assert_eq!(config.spin_duration_ms, 3000);
		assert_eq!(config.grace_period_ms, 250);
		assert_eq!(config.tick_interval_ms, 33);
		assert_eq!(config.min_full_spins, 5);
		assert_eq!(config.extra_full_spins, 0);
		assert_eq!(config.seed, Some(42));
	}
}
