use serde::{Deserialize, Serialize};

use crate::errors::WheelError;
use crate::events::{Entry, EntryId};
use crate::logging;

pub const MAX_NAME_LEN: usize = 20;

// Ordered collection of candidate names. Insertion order defines segment
// order on the wheel, so it is never re-sorted.
#[derive(Debug, Clone)]
pub struct EntryPool {
	entries: Vec<Entry>,
	capacity: Option<usize>,
	next_id: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImportReport {
	pub added: Vec<Entry>,
	pub rejected_for_capacity: usize,
}

impl EntryPool {
	pub fn new(capacity: Option<usize>) -> Self {
		Self {
			entries: Vec::new(),
			capacity,
			next_id: 0,
		}
	}

	pub fn add(&mut self, name: &str) -> Result<Entry, WheelError> {
		let name = name.trim();
		if name.is_empty() {
			return Err(WheelError::EmptyName);
		}
		if name.chars().count() > MAX_NAME_LEN {
			return Err(WheelError::EntryTooLong { name: name.to_string() });
		}
		if self.entries.iter().any(|e| e.display_name == name) {
			return Err(WheelError::DuplicateEntry { name: name.to_string() });
		}
		if let Some(capacity) = self.capacity {
			if self.entries.len() >= capacity {
				return Err(WheelError::PoolFull { capacity });
			}
		}

		let entry = Entry {
			id: EntryId(self.next_id),
			display_name: name.to_string(),
		};
		self.next_id += 1;
		self.entries.push(entry.clone());
		logging::pool::added(&entry.display_name, self.entries.len());
		Ok(entry)
	}

	pub fn remove(&mut self, id: EntryId) -> Result<Entry, WheelError> {
		let index = self
			.entries
			.iter()
			.position(|e| e.id == id)
			.ok_or(WheelError::NotFound { id })?;
		let entry = self.entries.remove(index);
		logging::pool::removed(&entry.display_name, self.entries.len());
		Ok(entry)
	}

	// Splits on line breaks, trims, and silently drops empty, over-length,
	// and already-present names. Names that only failed to fit under the
	// capacity are counted so the caller can report a partial import.
	pub fn import_bulk(&mut self, text: &str) -> ImportReport {
		let mut report = ImportReport::default();

		for line in text.lines() {
			let name = line.trim();
			if name.is_empty() || name.chars().count() > MAX_NAME_LEN {
				continue;
			}
			if self.entries.iter().any(|e| e.display_name == name) {
				continue;
			}
			match self.add(name) {
				Ok(entry) => report.added.push(entry),
				Err(WheelError::PoolFull { .. }) => report.rejected_for_capacity += 1,
				Err(_) => {}
			}
		}

		logging::pool::imported(report.added.len(), report.rejected_for_capacity);
		report
	}

	pub fn clear(&mut self) {
		self.entries.clear();
		logging::pool::cleared();
	}

	// Ordered copy handed to the spin machinery; pool edits after this point
	// cannot affect an in-flight spin.
	pub fn snapshot(&self) -> Vec<Entry> {
		self.entries.clone()
	}

	pub fn entries(&self) -> &[Entry] {
		&self.entries
	}

	pub fn capacity(&self) -> Option<usize> {
		self.capacity
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}
}
