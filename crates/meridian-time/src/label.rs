//! Labels for the time-travel control

use chrono::{DateTime, Utc};

use crate::LocalTimeFormatter;

/// Label shown for a zero offset
pub const PRESENT_LABEL: &str = "PRESENT";

/// "PRESENT", "+2H 30M", "-1H"
pub fn offset_label(offset_minutes: i32) -> String {
    if offset_minutes == 0 {
        return PRESENT_LABEL.to_string();
    }

    let sign = if offset_minutes > 0 { '+' } else { '-' };
    let total = offset_minutes.unsigned_abs();
    let hours = total / 60;
    let minutes = total % 60;

    if minutes == 0 {
        format!("{sign}{hours}H")
    } else {
        format!("{sign}{hours}H {minutes}M")
    }
}

/// The moment the control points at, in the viewer's zone: "Mon 3:30 PM".
///
/// `None` while no offset is applied.
pub fn selection_label<F: LocalTimeFormatter>(
    formatter: &F,
    real_now: DateTime<Utc>,
    offset_minutes: i32,
) -> Option<String> {
    if offset_minutes == 0 {
        return None;
    }

    let target = real_now.checked_add_signed(chrono::Duration::minutes(i64::from(offset_minutes)))?;
    let local = formatter.viewer_local_time(target).ok()?;
    Some(local.wall.format("%a %-I:%M %p").to_string())
}
