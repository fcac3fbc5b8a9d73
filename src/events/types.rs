use serde::{Deserialize, Serialize};

use crate::errors::WheelError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntryId(pub u64);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
	pub id: EntryId,
	pub display_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpinOutcome {
	pub winner_index: usize,
	pub winner: Entry,
	pub final_rotation_deg: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum WheelEvent {
	PoolChanged {
		entries: Vec<Entry>,
	},

	Progress {
		rotation_deg: f64,
	},

	Resolved {
		winner_index: usize,
		winner: Entry,
		final_rotation_deg: f64,
	},

	Rejected {
		error: WheelError,
	},
}
