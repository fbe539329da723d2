use time::{format_description::well_known::Rfc3339, macros::format_description, OffsetDateTime};

pub fn now_utc() -> OffsetDateTime {
    OffsetDateTime::now_utc()
}

pub fn format_offset(value: OffsetDateTime) -> String {
    value.format(&Rfc3339).unwrap_or_else(|_| value.to_string())
}

pub fn parse_timestamp(raw: &str) -> Option<OffsetDateTime> {
    OffsetDateTime::parse(raw.trim(), &Rfc3339).ok()
}

/// `YYYY-MM-DD`
pub fn format_date(value: OffsetDateTime) -> String {
    let format = format_description!("[year]-[month]-[day]");
    value.format(&format).unwrap_or_else(|_| value.date().to_string())
}

/// `YYYY-MM-DD HH:MM`
pub fn format_date_time(value: OffsetDateTime) -> String {
    let format = format_description!("[year]-[month]-[day] [hour]:[minute]");
    value.format(&format).unwrap_or_else(|_| value.to_string())
}

/// Short Korean-locale date as rendered in score lists, e.g. `2025. 3. 7.`
pub fn format_korean_date(value: OffsetDateTime) -> String {
    format!("{}. {}. {}.", value.year(), u8::from(value.month()), value.day())
}
