use crate::config::EAT_OFFSET_MS;

/// Cursor for one archive listing query: the last millisecond of a calendar
/// month, shifted into the fixed EAT offset.
pub type TimeCursor = i64;

/// Ordered month cursors for the inclusive (year, month) scan range.
/// Start year runs from `start_month`, end year up to `end_month`, interior
/// years cover all twelve months. Pure and deterministic.
pub fn month_cursors(
    start_year: i32,
    end_year: i32,
    start_month: u32,
    end_month: u32,
) -> Vec<TimeCursor> {
    let mut cursors = Vec::new();
    for year in start_year..=end_year {
        let from = if year == start_year { start_month } else { 1 };
        let to = if year == end_year { end_month } else { 12 };
        for month in from..=to {
            cursors.push(month_end_cursor(year, month));
        }
    }
    cursors
}

/// Last millisecond of (year, month): first UTC millisecond of the following
/// month minus 1 ms, minus the EAT offset. December rolls into January.
pub fn month_end_cursor(year: i32, month: u32) -> TimeCursor {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    days_from_civil(next_year, next_month, 1) * 86_400_000 - 1 - EAT_OFFSET_MS
}

/// `YYYY-MM` label for a cursor, for diagnostics. Interprets the raw epoch
/// milliseconds as UTC, matching how the cursor was built.
pub fn cursor_month_label(cursor: TimeCursor) -> String {
    let days = cursor.div_euclid(86_400_000);
    let (year, month, _) = civil_from_days(days);
    format!("{year:04}-{month:02}")
}

/// Days since the Unix epoch for a proleptic-Gregorian civil date, via the
/// Julian day number.
fn days_from_civil(year: i32, month: u32, day: u32) -> i64 {
    let (year, month, day) = (year as i64, month as i64, day as i64);
    let a = (14 - month) / 12;
    let y = year + 4800 - a;
    let m = month + 12 * a - 3;
    let jdn = day + (153 * m + 2) / 5 + 365 * y + y / 4 - y / 100 + y / 400 - 32045;
    jdn - 2_440_588
}

/// Inverse of `days_from_civil`.
fn civil_from_days(days: i64) -> (i32, u32, u32) {
    let jdn = days + 2_440_588;
    let a = jdn + 32044;
    let b = (4 * a + 3) / 146097;
    let c = a - 146097 * b / 4;
    let d = (4 * c + 3) / 1461;
    let e = c - 1461 * d / 4;
    let m = (5 * e + 2) / 153;
    let day = e - (153 * m + 2) / 5 + 1;
    let month = m + 3 - 12 * (m / 10);
    let year = 100 * b + d - 4800 + m / 10;
    (year as i32, month as u32, day as u32)
}
