//! Temporal overlap rule for staff shifts.
//!
//! A candidate shift conflicts with an existing one only when their overlap
//! lasts strictly longer than the configured tolerance. The tolerance exists
//! so brief shift handovers do not require manual adjustment; equality at
//! the boundary is accepted.

use crate::models::TimeSpan;

/// True if `candidate` conflicts with any interval in `existing`.
pub fn overlaps(candidate: &TimeSpan, existing: &[TimeSpan], tolerance_minutes: i64) -> bool {
    existing
        .iter()
        .any(|span| exceeds_tolerance(candidate, span, tolerance_minutes))
}

fn exceeds_tolerance(a: &TimeSpan, b: &TimeSpan, tolerance_minutes: i64) -> bool {
    let overlap_start = a.start.max(b.start);
    let overlap_end = a.end.min(b.end);
    if overlap_start >= overlap_end {
        // Touching or disjoint intervals never conflict.
        return false;
    }
    // Strict comparison: an overlap of exactly the tolerance is accepted.
    (overlap_end - overlap_start).num_seconds() > tolerance_minutes * 60
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;

    fn span(start: &str, end: &str) -> TimeSpan {
        let parse =
            |s| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").expect("valid datetime");
        TimeSpan {
            start: parse(start),
            end: parse(end),
        }
    }

    #[test]
    fn test_touching_intervals_never_overlap() {
        let candidate = span("2023-10-01 16:00:00", "2023-10-02 00:00:00");
        let existing = [span("2023-10-01 08:00:00", "2023-10-01 16:00:00")];
        assert!(!overlaps(&candidate, &existing, 0));
    }

    #[test]
    fn test_disjoint_intervals_never_overlap_regardless_of_tolerance() {
        let candidate = span("2023-10-02 08:00:00", "2023-10-02 16:00:00");
        let existing = [span("2023-10-01 08:00:00", "2023-10-01 16:00:00")];
        assert!(!overlaps(&candidate, &existing, 0));
        assert!(!overlaps(&candidate, &existing, 20));
    }

    #[test]
    fn test_handover_within_tolerance_is_accepted() {
        // 10-minute overlap (09:50-10:00) against a 20-minute tolerance.
        let candidate = span("2023-10-01 09:50:00", "2023-10-01 18:00:00");
        let existing = [span("2023-10-01 08:00:00", "2023-10-01 10:00:00")];
        assert!(!overlaps(&candidate, &existing, 20));
    }

    #[test]
    fn test_exact_tolerance_boundary_is_accepted() {
        // Exactly 20 minutes of overlap.
        let candidate = span("2023-10-01 09:40:00", "2023-10-01 18:00:00");
        let existing = [span("2023-10-01 08:00:00", "2023-10-01 10:00:00")];
        assert!(!overlaps(&candidate, &existing, 20));
    }

    #[test]
    fn test_one_second_past_tolerance_is_rejected() {
        let candidate = span("2023-10-01 09:39:59", "2023-10-01 18:00:00");
        let existing = [span("2023-10-01 08:00:00", "2023-10-01 10:00:00")];
        assert!(overlaps(&candidate, &existing, 20));
    }

    #[test]
    fn test_candidate_inside_existing_uses_candidate_length() {
        let candidate = span("2023-10-01 10:00:00", "2023-10-01 10:15:00");
        let existing = [span("2023-10-01 08:00:00", "2023-10-01 16:00:00")];
        assert!(!overlaps(&candidate, &existing, 20));
        assert!(overlaps(&candidate, &existing, 10));
    }

    #[test]
    fn test_any_existing_interval_can_reject() {
        let candidate = span("2023-10-01 12:00:00", "2023-10-01 20:00:00");
        let existing = [
            span("2023-10-01 00:00:00", "2023-10-01 04:00:00"),
            span("2023-10-01 13:00:00", "2023-10-01 14:00:00"),
        ];
        assert!(overlaps(&candidate, &existing, 20));
    }
}
