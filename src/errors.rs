use serde::{Deserialize, Serialize};

use crate::events::EntryId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum WheelError {
	EmptyPool,
	SpinInProgress,
	DuplicateEntry { name: String },
	PoolFull { capacity: usize },
	EntryTooLong { name: String },
	EmptyName,
	NotFound { id: EntryId },
}

impl WheelError {
	pub fn kind(&self) -> &'static str {
		match self {
			WheelError::EmptyPool => "empty-pool",
			WheelError::SpinInProgress => "spin-in-progress",
			WheelError::DuplicateEntry { .. } => "duplicate-entry",
			WheelError::PoolFull { .. } => "pool-full",
			WheelError::EntryTooLong { .. } => "entry-too-long",
			WheelError::EmptyName => "empty-name",
			WheelError::NotFound { .. } => "not-found",
		}
	}
}

impl std::fmt::Display for WheelError {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			WheelError::EmptyPool => write!(f, "the entry pool is empty"),
			WheelError::SpinInProgress => write!(f, "a spin is already in progress"),
			WheelError::DuplicateEntry { name } => write!(f, "entry '{}' is already in the pool", name),
			WheelError::PoolFull { capacity } => write!(f, "the pool is at its capacity of {} entries", capacity),
			WheelError::EntryTooLong { name } => write!(f, "entry '{}' is longer than 20 characters", name),
			WheelError::EmptyName => write!(f, "entry name is empty"),
			WheelError::NotFound { id } => write!(f, "no entry with id {}", id.0),
		}
	}
}

impl std::error::Error for WheelError {}
