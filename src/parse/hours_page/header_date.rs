use chrono::{Datelike, NaiveDate};

/// Reads a header cell like `Monday` / `September 9`, which carries no year.
///
/// The year is the one (of last year, this year, next year) that names a real date whose
/// weekday matches, picking the one closest to `today` so a page scraped in late December
/// can list January dates.
pub fn parse_header_date(fragments: &[&str], today: NaiveDate) -> Result<NaiveDate, String> {
    let [day_of_week, month_day] = fragments else {
        return Err(format!(
            "expected a day of week and a month/day, found {} text fragments",
            fragments.len()
        ));
    };
    let text = format!("{day_of_week} {month_day}");

    let year = today.year();
    (year - 1..=year + 1)
        .filter_map(|y| NaiveDate::parse_from_str(&format!("{text} {y}"), "%A %B %d %Y").ok())
        .min_by_key(|date| (*date - today).num_days().abs())
        .ok_or_else(|| format!("`{text}` is not a weekday followed by a month and day"))
}
