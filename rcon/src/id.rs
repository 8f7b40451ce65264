//! Request id generation.

use std::time::{SystemTime, UNIX_EPOCH};

/// Supplies a fresh id for every outbound packet that needs one.
///
/// Any `FnMut() -> i32` closure is an id source. Ids need not be unique, but
/// the strict client tells a command's output apart from its delimiter echo
/// by id, so two consecutive ids should differ.
pub trait IdSource {
    /// Returns the next id.
    fn next_id(&mut self) -> i32;
}

impl<F: FnMut() -> i32> IdSource for F {
    fn next_id(&mut self) -> i32 {
        self()
    }
}

/// Derives an id in `0..100_000` from the wall clock at 100µs resolution.
///
/// Calls made within the same 100µs window return the same id; prefer
/// [`SequentialIds`] for the strict client.
#[allow(clippy::cast_possible_truncation)]
pub fn time_based_id() -> i32 {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    // Always below 100_000.
    ((nanos / 100_000) % 100_000) as i32
}

/// Strictly increasing positive ids, wrapping back to `1`.
///
/// Never yields `-1`, which servers use to signal a rejected password.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SequentialIds {
    /// The id handed out by the next call.
    next: i32,
}

impl SequentialIds {
    /// Starts counting at `start`, or at `1` if `start` is not positive.
    pub const fn starting_at(start: i32) -> Self {
        Self {
            next: if start > 0 { start } else { 1 },
        }
    }
}

impl Default for SequentialIds {
    /// Seeds the counter from [`time_based_id`], so ids differ across runs.
    fn default() -> Self {
        Self::starting_at(time_based_id())
    }
}

impl IdSource for SequentialIds {
    fn next_id(&mut self) -> i32 {
        let id = self.next;
        self.next = if id == i32::MAX { 1 } else { id + 1 };
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn time_based_id_is_in_range() {
        for _ in 0..100 {
            assert!((0..100_000).contains(&time_based_id()));
        }
    }

    #[test]
    fn sequential_increments_and_wraps() {
        let mut ids = SequentialIds::starting_at(i32::MAX - 1);
        assert_eq!(ids.next_id(), i32::MAX - 1);
        assert_eq!(ids.next_id(), i32::MAX);
        assert_eq!(ids.next_id(), 1);
        assert_eq!(ids.next_id(), 2);
    }

    #[test]
    fn sequential_never_starts_below_one() {
        assert_eq!(SequentialIds::starting_at(-1).next_id(), 1);
        assert_eq!(SequentialIds::starting_at(0).next_id(), 1);
        assert!(SequentialIds::default().next_id() >= 1);
    }

    #[test]
    fn closures_are_id_sources() {
        let mut n = 10;
        let mut source = move || {
            n += 1;
            n
        };
        assert_eq!(IdSource::next_id(&mut source), 11);
        assert_eq!(IdSource::next_id(&mut source), 12);
    }
}
