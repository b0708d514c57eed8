use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Half-open time interval `[start, end)` during which a room is held.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeWindow {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// Whether the interval is well-formed. Empty and inverted intervals
    /// are both rejected.
    pub fn is_ordered(&self) -> bool {
        self.start < self.end
    }

    /// Two half-open windows overlap iff `s1 < e2 && s2 < e1`. Windows
    /// that merely touch at a boundary do not overlap.
    pub fn overlaps(&self, other: &TimeWindow) -> bool {
        self.start < other.end && other.start < self.end
    }

    pub fn has_ended(&self, now: DateTime<Utc>) -> bool {
        self.end <= now
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn at(hour: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 9, 1, hour, min, 0).unwrap()
    }

    #[test]
    fn overlapping_windows_are_detected() {
        let a = TimeWindow::new(at(10, 0), at(12, 0));
        let b = TimeWindow::new(at(11, 0), at(13, 0));
        assert!(a.overlaps(&b));
    }

    #[test]
    fn overlap_is_symmetric() {
        let a = TimeWindow::new(at(10, 0), at(12, 0));
        let b = TimeWindow::new(at(11, 0), at(13, 0));
        let c = TimeWindow::new(at(13, 0), at(14, 0));
        assert_eq!(a.overlaps(&b), b.overlaps(&a));
        assert_eq!(a.overlaps(&c), c.overlaps(&a));
    }

    #[test]
    fn touching_boundary_is_not_an_overlap() {
        let a = TimeWindow::new(at(10, 0), at(12, 0));
        let b = TimeWindow::new(at(12, 0), at(13, 0));
        assert!(!a.overlaps(&b));
        assert!(!b.overlaps(&a));
    }

    #[test]
    fn contained_window_overlaps() {
        let a = TimeWindow::new(at(10, 0), at(12, 0));
        let b = TimeWindow::new(at(10, 30), at(11, 0));
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
    }

    #[test]
    fn ordering_check() {
        assert!(TimeWindow::new(at(10, 0), at(11, 0)).is_ordered());
        assert!(!TimeWindow::new(at(11, 0), at(10, 0)).is_ordered());
        assert!(!TimeWindow::new(at(10, 0), at(10, 0)).is_ordered());
    }

    #[test]
    fn has_ended_uses_the_end_instant() {
        let w = TimeWindow::new(at(10, 0), at(12, 0));
        assert!(w.has_ended(at(12, 0)));
        assert!(w.has_ended(at(13, 0)));
        assert!(!w.has_ended(at(11, 59)));
    }
}
