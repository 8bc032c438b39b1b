// src/utils/time.rs

//! Run timestamp formatting.

use chrono::{FixedOffset, Utc};

/// China Standard Time offset from UTC, in hours.
const TZ_OFFSET_HOURS: i32 = 8;

/// Label appended to formatted timestamps.
const TZ_LABEL: &str = "CST";

/// Current civil time in UTC+8, formatted `YYYY-MM-DD HH:MM:SS CST`.
pub fn run_timestamp() -> String {
    let tz = FixedOffset::east_opt(TZ_OFFSET_HOURS * 3600).expect("valid fixed offset");
    let now = Utc::now().with_timezone(&tz);
    format!("{} {}", now.format("%Y-%m-%d %H:%M:%S"), TZ_LABEL)
}
