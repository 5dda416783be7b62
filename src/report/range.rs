//! Date ranges for the report pages.

use time::{Date, Month};

/// An inclusive range of dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    /// The first day in the range.
    pub start: Date,
    /// The last day in the range.
    pub end: Date,
}

/// The first through the last day of the month containing `today`.
pub fn current_month_range(today: Date) -> DateRange {
    let start = today.replace_day(1).unwrap_or(today);
    let last_day = today.month().length(today.year());
    let end = today.replace_day(last_day).unwrap_or(today);

    DateRange { start, end }
}

/// The month before the one containing `today`.
pub fn previous_month_range(today: Date) -> DateRange {
    let (year, month) = match today.month() {
        Month::January => (today.year() - 1, Month::December),
        month => (today.year(), month.previous()),
    };

    match Date::from_calendar_date(year, month, 1) {
        Ok(first_day) => current_month_range(first_day),
        Err(error) => {
            tracing::warn!("could not get the month before {today}: {error}");
            current_month_range(today)
        }
    }
}

/// Fill in missing bounds with the month containing `today`.
///
/// Each bound is replaced independently. A start after the end is kept as is
/// and simply matches no expenses.
pub fn resolve_range(start: Option<Date>, end: Option<Date>, today: Date) -> DateRange {
    let month = current_month_range(today);

    DateRange {
        start: start.unwrap_or(month.start),
        end: end.unwrap_or(month.end),
    }
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use super::{DateRange, current_month_range, previous_month_range, resolve_range};

    #[test]
    fn current_month_covers_whole_month() {
        assert_eq!(
            current_month_range(date!(2024 - 02 - 14)),
            DateRange {
                start: date!(2024 - 02 - 01),
                end: date!(2024 - 02 - 29)
            }
        );
        assert_eq!(
            current_month_range(date!(2023 - 12 - 31)),
            DateRange {
                start: date!(2023 - 12 - 01),
                end: date!(2023 - 12 - 31)
            }
        );
    }

    #[test]
    fn previous_month_wraps_year() {
        assert_eq!(
            previous_month_range(date!(2024 - 01 - 20)),
            DateRange {
                start: date!(2023 - 12 - 01),
                end: date!(2023 - 12 - 31)
            }
        );
        assert_eq!(
            previous_month_range(date!(2023 - 03 - 31)),
            DateRange {
                start: date!(2023 - 02 - 01),
                end: date!(2023 - 02 - 28)
            }
        );
    }

    #[test]
    fn resolve_replaces_each_bound_independently() {
        let today = date!(2024 - 06 - 15);

        assert_eq!(
            resolve_range(None, None, today),
            DateRange {
                start: date!(2024 - 06 - 01),
                end: date!(2024 - 06 - 30)
            }
        );
        assert_eq!(
            resolve_range(Some(date!(2024 - 01 - 01)), None, today),
            DateRange {
                start: date!(2024 - 01 - 01),
                end: date!(2024 - 06 - 30)
            }
        );
        assert_eq!(
            resolve_range(None, Some(date!(2024 - 06 - 10)), today),
            DateRange {
                start: date!(2024 - 06 - 01),
                end: date!(2024 - 06 - 10)
            }
        );
    }
}
