use chrono::{DateTime, Days, NaiveDate, Utc};

pub fn parse_day(s: &str, today: NaiveDate) -> Result<NaiveDate, String> {
    let s = s.trim().to_lowercase();

    if s == "today" {
        return Ok(today);
    }
    if s == "yesterday" {
        return today
            .checked_sub_days(Days::new(1))
            .ok_or_else(|| "date overflow".to_string());
    }

    // YYYY-MM-DD
    if let Ok(d) = NaiveDate::parse_from_str(&s, "%Y-%m-%d") {
        return Ok(d);
    }

    // DDMMYYYY (e.g. 18022026)
    if s.len() == 8 && s.chars().all(|c| c.is_ascii_digit()) {
        return NaiveDate::parse_from_str(&s, "%d%m%Y")
            .map_err(|_| "expected DDMMYYYY like 18022026".to_string());
    }

    Err("expected today|yesterday|YYYY-MM-DD|DDMMYYYY".into())
}

pub fn parse_bool_flag(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "y" => Some(true),
        "false" | "0" | "no" | "n" => Some(false),
        _ => None,
    }
}

pub fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Millisecond timestamp id, bumped past any id already taken.
pub fn next_id<'a, I>(now: DateTime<Utc>, taken: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let taken: Vec<&str> = taken.into_iter().collect();
    let mut candidate = now.timestamp_millis();
    loop {
        let id = candidate.to_string();
        if !taken.contains(&id.as_str()) {
            return id;
        }
        candidate += 1;
    }
}

pub fn plural(count: usize) -> &'static str {
    if count == 1 { "" } else { "s" }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn parses_day_formats() {
        let today = NaiveDate::from_ymd_opt(2026, 2, 18).unwrap();
        assert_eq!(parse_day("today", today), Ok(today));
        assert_eq!(
            parse_day("Yesterday", today),
            Ok(NaiveDate::from_ymd_opt(2026, 2, 17).unwrap())
        );
        assert_eq!(parse_day("2026-01-05", today), Ok(NaiveDate::from_ymd_opt(2026, 1, 5).unwrap()));
        assert_eq!(parse_day("18022026", today), Ok(today));
        assert!(parse_day("soon", today).is_err());
    }

    #[test]
    fn next_id_skips_taken_values() {
        let now = Utc.timestamp_millis_opt(1_700_000_000_000).unwrap();
        assert_eq!(next_id(now, []), "1700000000000");
        assert_eq!(
            next_id(now, ["1700000000000", "1700000000001"]),
            "1700000000002"
        );
    }

    #[test]
    fn bool_flags() {
        assert_eq!(parse_bool_flag("true"), Some(true));
        assert_eq!(parse_bool_flag(" FALSE "), Some(false));
        assert_eq!(parse_bool_flag("maybe"), None);
    }
}
