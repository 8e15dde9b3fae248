use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

pub fn now_utc_rfc3339() -> Result<String, time::error::Format> {
    OffsetDateTime::now_utc().format(&Rfc3339)
}

/// Generation date as `YYYY-MM-DD`.
pub fn today_utc() -> String {
    OffsetDateTime::now_utc().date().to_string()
}
