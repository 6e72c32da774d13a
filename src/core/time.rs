use time::macros::format_description;
use time::{format_description::well_known::Rfc3339, Date, OffsetDateTime, PrimitiveDateTime};

pub(crate) fn primitive_now_utc() -> PrimitiveDateTime {
    let now = OffsetDateTime::now_utc();
    PrimitiveDateTime::new(now.date(), now.time())
}

pub(crate) fn format_primitive(value: PrimitiveDateTime) -> String {
    value.assume_utc().format(&Rfc3339).unwrap_or_else(|_| value.assume_utc().to_string())
}

pub(crate) fn format_optional(value: Option<PrimitiveDateTime>) -> Option<String> {
    value.map(format_primitive)
}

/// Calendar dates travel as `YYYY-MM-DD`.
pub(crate) fn parse_date(raw: &str) -> Option<Date> {
    Date::parse(raw.trim(), &format_description!("[year]-[month]-[day]")).ok()
}

pub(crate) fn format_date(value: Date) -> String {
    value
        .format(&format_description!("[year]-[month]-[day]"))
        .unwrap_or_else(|_| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::{Date, Time};

    fn sample() -> PrimitiveDateTime {
        let date = Date::from_calendar_date(2025, time::Month::January, 2).unwrap();
        let time = Time::from_hms(10, 20, 30).unwrap();
        PrimitiveDateTime::new(date, time)
    }

    #[test]
    fn format_primitive_outputs_utc_z() {
        assert_eq!(format_primitive(sample()), "2025-01-02T10:20:30Z");
    }

    #[test]
    fn format_optional_keeps_none() {
        assert_eq!(format_optional(None), None);
        assert_eq!(format_optional(Some(sample())).as_deref(), Some("2025-01-02T10:20:30Z"));
    }

    #[test]
    fn dates_use_iso_calendar_form() {
        let date = parse_date(" 2025-03-02 ").expect("date");
        assert_eq!(date, Date::from_calendar_date(2025, time::Month::March, 2).unwrap());
        assert_eq!(format_date(date), "2025-03-02");
    }

    #[test]
    fn malformed_dates_are_rejected() {
        assert_eq!(parse_date("2025-02-30"), None);
        assert_eq!(parse_date("03/02/2025"), None);
        assert_eq!(parse_date(""), None);
    }
}
