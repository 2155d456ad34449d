use chrono::{Months, NaiveDate};

/// Visit dates for one plan entry: the i-th visit lands `i * interval_months`
/// calendar months after the start. Pure so recurrence rules are testable
/// without touching persistence.
pub fn schedule_dates(start_date: NaiveDate, interval_months: u32, count: u32) -> Vec<NaiveDate> {
    (0..count)
        .filter_map(|i| start_date.checked_add_months(Months::new(i * interval_months)))
        .collect()
}
