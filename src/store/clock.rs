//! Time source for entry ids.

use std::fmt;

use chrono::Utc;

use crate::models::EntryId;

/// Supplies the id for a new entry.
///
/// Production code uses [`SystemClock`]; tests inject a clock that can repeat
/// or step seconds to exercise collision and eviction handling.
pub trait Clock: fmt::Debug {
    fn now(&self) -> EntryId;
}

/// Wall-clock seconds since the Unix epoch
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> EntryId {
        EntryId::new(Utc::now().timestamp())
    }
}

/// Clock that returns the next second on every call
#[cfg(test)]
#[derive(Debug)]
pub(crate) struct StepClock(std::cell::Cell<i64>);

#[cfg(test)]
impl StepClock {
    pub(crate) fn starting_at(secs: i64) -> Self {
        Self(std::cell::Cell::new(secs))
    }
}

#[cfg(test)]
impl Clock for StepClock {
    fn now(&self) -> EntryId {
        let secs = self.0.get();
        self.0.set(secs + 1);
        EntryId::new(secs)
    }
}
