mod types;

pub use types::{Entry, EntryId, SpinOutcome, WheelEvent};
