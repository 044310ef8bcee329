pub mod auth;
pub mod message;
pub mod rsvp;
pub mod session;
pub mod user;

use chrono::{SecondsFormat, Utc};
use sea_orm::prelude::DateTimeWithTimeZone;

/// Render a stored instant as an ISO 8601 UTC string with millisecond precision,
/// e.g. `2026-03-14T18:30:00.000Z`.
#[must_use]
pub fn to_iso(instant: &DateTimeWithTimeZone) -> String {
    instant
        .with_timezone(&Utc)
        .to_rfc3339_opts(SecondsFormat::Millis, true)
}
