// LapsSync - FILETIME decoding
//
// `ms-Mcs-AdmPwdExpirationTime` is a Windows FILETIME: the number of
// 100-nanosecond ticks since 1601-01-01T00:00:00Z. A u64 tick count can exceed
// what a single i64-nanosecond duration holds, so the offset is applied in
// chunks of the largest representable whole-tick duration.

use chrono::{DateTime, TimeDelta, TimeZone, Utc};

/// Nanoseconds per FILETIME tick.
const NANOS_PER_TICK: i64 = 100;

/// Largest tick count whose nanosecond length still fits in an i64.
const MAX_CHUNK_TICKS: u64 = (i64::MAX / NANOS_PER_TICK) as u64;

/// The FILETIME epoch, 1601-01-01T00:00:00Z.
pub fn filetime_epoch() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(1601, 1, 1, 0, 0, 0)
        .single()
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

/// Convert a FILETIME tick count into an absolute UTC instant.
///
/// `decode(0)` is the epoch itself. Callers that treat zero as "unknown" must
/// do so before calling; see [`parse_expiration`].
pub fn decode(ticks: u64) -> DateTime<Utc> {
    let chunk = TimeDelta::nanoseconds(MAX_CHUNK_TICKS as i64 * NANOS_PER_TICK);

    let mut instant = filetime_epoch();
    let mut remaining = ticks;
    while remaining > MAX_CHUNK_TICKS {
        instant = add_saturating(instant, chunk);
        remaining -= MAX_CHUNK_TICKS;
    }
    if remaining != 0 {
        instant = add_saturating(instant, TimeDelta::nanoseconds(remaining as i64 * NANOS_PER_TICK));
    }
    instant
}

// u64::MAX ticks lands around year 60056, well inside chrono's range.
fn add_saturating(instant: DateTime<Utc>, delta: TimeDelta) -> DateTime<Utc> {
    instant
        .checked_add_signed(delta)
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

/// Validate a raw directory attribute and decode it.
///
/// Returns `None` ("no expiration known") for an absent/empty attribute, a
/// value that is not a non-negative integer, or zero. Never fails: bad input is
/// logged and the record carries on without an expiration.
pub fn parse_expiration(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        tracing::debug!("No expiration time set on record");
        return None;
    }

    match raw.parse::<u64>() {
        Ok(0) => None,
        Ok(ticks) => Some(decode(ticks)),
        Err(e) => {
            tracing::warn!(value = %raw, error = %e, "Can't convert expiration time, treating as unknown");
            None
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
