//! Assessment week classifier.
//!
//! Nigerian term calendar banding: week 1 is orientation and takes no
//! scores, week 7 is the summative test, the final week is the exam, and
//! every other week in range carries a weekly assessment.

use crate::models::grades::entities::AssessmentKind;

/// Score ceiling for a weekly assessment.
pub const WEEKLY_MAX_POINTS: u32 = 5;
/// Score ceiling for the summative test.
pub const SUMMATIVE_MAX_POINTS: u32 = 20;
/// Score ceiling for the exam.
pub const EXAM_MAX_POINTS: u32 = 20;

/// The summative test is fixed to week 7 regardless of term length.
pub const SUMMATIVE_WEEK: u32 = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssessmentInfo {
    pub kind: AssessmentKind,
    pub max_points: u32,
}

impl AssessmentInfo {
    pub fn is_valid(&self) -> bool {
        self.kind != AssessmentKind::Invalid
    }
}

/// Classify `(week, total_weeks)` into an assessment kind and its ceiling.
///
/// Pure and total: any week outside the bands (week 1 included) classifies
/// as `Invalid` with a ceiling of 0.
pub fn classify_week(week: u32, total_weeks: u32) -> AssessmentInfo {
    if week == SUMMATIVE_WEEK {
        AssessmentInfo {
            kind: AssessmentKind::Summative,
            max_points: SUMMATIVE_MAX_POINTS,
        }
    } else if week == total_weeks {
        AssessmentInfo {
            kind: AssessmentKind::Exam,
            max_points: EXAM_MAX_POINTS,
        }
    } else if (2..=6).contains(&week) || (week >= 8 && total_weeks >= 1 && week <= total_weeks - 1)
    {
        AssessmentInfo {
            kind: AssessmentKind::Weekly,
            max_points: WEEKLY_MAX_POINTS,
        }
    } else {
        AssessmentInfo {
            kind: AssessmentKind::Invalid,
            max_points: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_week_seven_is_summative_for_any_term_length() {
        for total_weeks in [8, 10, 12, 14] {
            let info = classify_week(7, total_weeks);
            assert_eq!(info.kind, AssessmentKind::Summative);
            assert_eq!(info.max_points, SUMMATIVE_MAX_POINTS);
        }
    }

    #[test]
    fn test_summative_rule_wins_when_term_ends_at_week_seven() {
        // Week 7 checks before the exam-week rule.
        assert_eq!(classify_week(7, 7).kind, AssessmentKind::Summative);
    }

    #[test]
    fn test_final_week_is_exam() {
        for total_weeks in [10, 12, 14] {
            let info = classify_week(total_weeks, total_weeks);
            assert_eq!(info.kind, AssessmentKind::Exam);
            assert_eq!(info.max_points, EXAM_MAX_POINTS);
        }
    }

    #[test]
    fn test_week_one_is_invalid() {
        for total_weeks in [7, 10, 12, 14] {
            let info = classify_week(1, total_weeks);
            assert_eq!(info.kind, AssessmentKind::Invalid);
            assert_eq!(info.max_points, 0);
        }
    }

    #[test]
    fn test_weekly_bands_over_a_twelve_week_term() {
        for week in 2..=6 {
            assert_eq!(classify_week(week, 12).kind, AssessmentKind::Weekly);
        }
        for week in 8..=11 {
            assert_eq!(classify_week(week, 12).kind, AssessmentKind::Weekly);
        }
        assert_eq!(classify_week(2, 12).max_points, WEEKLY_MAX_POINTS);
    }

    #[test]
    fn test_out_of_range_weeks_are_invalid() {
        assert_eq!(classify_week(0, 12).kind, AssessmentKind::Invalid);
        assert_eq!(classify_week(13, 12).kind, AssessmentKind::Invalid);
        assert_eq!(classify_week(99, 12).kind, AssessmentKind::Invalid);
    }
}
