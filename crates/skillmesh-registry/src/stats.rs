//! Download statistics over the append-only event log
//!
//! Windows are computed read-side against a caller-supplied "now". An
//! event lands in a window only when `0 <= now - timestamp <= window`,
//! so a future-dated event is invisible to every window while still
//! counting toward the all-time total. Events are never validated or
//! rewritten at ingest time.

use serde_json::Value;

use skillmesh_types::{AggregateStats, DownloadEvent, SkillStats, StatsParams, TimeRange};

use crate::error::{HandlerError, Result};
use crate::store::{encode, RegistryStore};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct WindowCounts {
    total: u64,
    last_7_days: u64,
    last_30_days: u64,
}

fn count_events<'a>(events: impl Iterator<Item = &'a DownloadEvent>, now_ms: i64) -> WindowCounts {
    let mut counts = WindowCounts::default();
    for event in events {
        counts.total += 1;
        let age = now_ms - event.timestamp;
        if age < 0 {
            continue;
        }
        if age <= skillmesh_types::WINDOW_7_DAYS_MS {
            counts.last_7_days += 1;
        }
        if age <= skillmesh_types::WINDOW_30_DAYS_MS {
            counts.last_30_days += 1;
        }
    }
    counts
}

/// `Get-Download-Stats` dispatch: per-skill when a name is given,
/// aggregate when a scope is given, an error when neither is.
pub fn download_stats(store: &RegistryStore, params: &StatsParams, now_ms: i64) -> Result<Value> {
    let range = match params.time_range.as_deref() {
        None => TimeRange::All,
        Some(raw) => TimeRange::parse(raw).ok_or_else(|| HandlerError::InvalidTimeRange {
            value: raw.to_string(),
        })?,
    };

    match (&params.name, &params.scope) {
        (Some(name), _) => encode(&skill_stats(store, name, range, now_ms)?),
        (None, Some(scope)) if scope == "skill" => Err(HandlerError::NameRequired),
        (None, Some(_)) => encode(&aggregate_stats(store, range, now_ms)),
        (None, None) => Err(HandlerError::NameRequired),
    }
}

/// Registry-wide counts for the requested window
pub fn aggregate_stats(store: &RegistryStore, range: TimeRange, now_ms: i64) -> AggregateStats {
    let counts = count_events(store.downloads().iter(), now_ms);
    let total_skills = store.skill_count() as u64;
    match range {
        TimeRange::All => AggregateStats::All {
            total_skills,
            downloads_total: counts.total,
            downloads_7_days: counts.last_7_days,
            downloads_30_days: counts.last_30_days,
        },
        TimeRange::Days30 => AggregateStats::Days30 {
            total_skills,
            downloads_30_days: counts.last_30_days,
        },
        TimeRange::Days7 => AggregateStats::Days7 {
            total_skills,
            downloads_7_days: counts.last_7_days,
        },
    }
}

/// Counts for one skill across all of its versions
pub fn skill_stats(
    store: &RegistryStore,
    name: &str,
    range: TimeRange,
    now_ms: i64,
) -> Result<SkillStats> {
    let latest = store.latest(name).ok_or(HandlerError::SkillNotFound)?;
    let skill_name = latest.name.clone();
    let version = latest.version.clone();

    let counts = count_events(
        store.downloads().iter().filter(|e| e.skill_name == name),
        now_ms,
    );

    Ok(match range {
        TimeRange::All => SkillStats::All {
            skill_name,
            version,
            downloads_total: counts.total,
            downloads_7_days: counts.last_7_days,
            downloads_30_days: counts.last_30_days,
        },
        TimeRange::Days30 => SkillStats::Days30 {
            skill_name,
            version,
            downloads_30_days: counts.last_30_days,
        },
        TimeRange::Days7 => SkillStats::Days7 {
            skill_name,
            version,
            downloads_7_days: counts.last_7_days,
        },
    })
}
