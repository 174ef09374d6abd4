use chrono::Datelike;

/// 1-based ordinal day within the date's calendar year.
///
/// Works on the calendar date rather than elapsed milliseconds, so daylight
/// saving changes between January 1st and today never shift the result.
pub fn day_of_year(date: impl Datelike) -> u32 {
    date.ordinal()
}

/// Index of the quiz of the day among `count` documents, or `None` when the
/// collection is empty.
pub fn quiz_index_for_day(day_of_year: u32, count: usize) -> Option<usize> {
    if count == 0 {
        return None;
    }
    let day = day_of_year.saturating_sub(1) as usize;
    Some(day % count)
}

/// Picks the quiz of the day out of the fetched documents.
///
/// `count` comes from a separate count query and may disagree with the
/// number of fetched documents, so the index is wrapped a second time
/// against the list itself.
pub fn pick_daily<T>(mut fetched: Vec<T>, count: usize, day_of_year: u32) -> Option<T> {
    let idx = quiz_index_for_day(day_of_year, count)?;
    if fetched.is_empty() {
        return None;
    }
    let len = fetched.len();
    Some(fetched.swap_remove(idx % len))
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    #[test]
    fn day_of_year_is_one_based() {
        let jan1 = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        let dec31 = NaiveDate::from_ymd_opt(2026, 12, 31).unwrap();
        let leap_dec31 = NaiveDate::from_ymd_opt(2024, 12, 31).unwrap();
        assert_eq!(day_of_year(jan1), 1);
        assert_eq!(day_of_year(dec31), 365);
        assert_eq!(day_of_year(leap_dec31), 366);
    }

    #[test]
    fn day_of_year_ignores_dst_transition() {
        // Late March falls after the spring DST switch in most zones.
        let date = NaiveDate::from_ymd_opt(2026, 3, 30).unwrap();
        assert_eq!(day_of_year(date), 31 + 28 + 30);
    }

    #[test]
    fn empty_collection_selects_nothing() {
        assert_eq!(quiz_index_for_day(1, 0), None);
        assert_eq!(quiz_index_for_day(200, 0), None);
    }

    #[test]
    fn index_stays_in_bounds() {
        for count in 1..=20 {
            for day in 1..=366 {
                let idx = quiz_index_for_day(day, count).unwrap();
                assert!(idx < count, "day {day} count {count} gave {idx}");
            }
        }
    }

    #[test]
    fn selection_wraps_around() {
        assert_eq!(quiz_index_for_day(1, 3), Some(0));
        assert_eq!(quiz_index_for_day(2, 3), Some(1));
        assert_eq!(quiz_index_for_day(3, 3), Some(2));
        assert_eq!(quiz_index_for_day(4, 3), Some(0));
    }

    #[test]
    fn pick_daily_rewraps_when_count_and_list_disagree() {
        let fetched = vec!["a", "b", "c"];
        // (5 - 1) % 5 = 4, then 4 % 3 = 1
        assert_eq!(pick_daily(fetched, 5, 5), Some("b"));
    }

    #[test]
    fn pick_daily_reports_empty_list() {
        let fetched: Vec<&str> = Vec::new();
        assert_eq!(pick_daily(fetched, 2, 10), None);
        assert_eq!(pick_daily(vec!["a"], 0, 10), None);
    }
}
