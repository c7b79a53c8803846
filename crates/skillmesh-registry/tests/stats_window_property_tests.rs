//! Property-based tests for download window counting

use proptest::prelude::*;
use serde_json::json;

use skillmesh_registry::{stats, RegistryStore};
use skillmesh_types::{
    actions, RecordDownloadParams, RegistryRequest, SkillStats, StatsParams, TimeRange,
    WINDOW_30_DAYS_MS,
};

const NOW_MS: i64 = WINDOW_30_DAYS_MS * 4;

fn store_with_events(ages_ms: &[i64]) -> RegistryStore {
    let mut store = RegistryStore::new();
    let register = RegistryRequest::new(
        actions::REGISTER_SKILL,
        json!({"name": "web-scraper", "version": "1.0.0", "contentId": "cid-1"}),
    );
    assert_eq!(store.handle_at(&register, 0)["status"], "success");

    for age in ages_ms {
        store.record_download(RecordDownloadParams {
            name: "web-scraper".to_string(),
            version: "1.0.0".to_string(),
            requester: "addr-tester".to_string(),
            timestamp: NOW_MS - age,
        });
    }
    store
}

fn all_time_counts(store: &RegistryStore) -> (u64, u64, u64) {
    match stats::skill_stats(store, "web-scraper", TimeRange::All, NOW_MS).unwrap() {
        SkillStats::All {
            downloads_total,
            downloads_7_days,
            downloads_30_days,
            ..
        } => (downloads_total, downloads_7_days, downloads_30_days),
        other => panic!("expected all-time shape, got {other:?}"),
    }
}

/// Negative ages are future timestamps; positive ages reach back well past
/// the 30-day window.
fn age_strategy() -> impl Strategy<Value = i64> {
    -WINDOW_30_DAYS_MS * 2..WINDOW_30_DAYS_MS * 3
}

#[test]
fn prop_windows_nest_for_past_events() {
    proptest!(|(ages in prop::collection::vec(0..WINDOW_30_DAYS_MS * 3, 0..64))| {
        let store = store_with_events(&ages);
        let (total, d7, d30) = all_time_counts(&store);

        prop_assert!(d7 <= d30, "7-day count {d7} exceeds 30-day count {d30}");
        prop_assert!(d30 <= total, "30-day count {d30} exceeds total {total}");
        prop_assert_eq!(total, ages.len() as u64);
    });
}

#[test]
fn prop_future_events_count_only_toward_total() {
    proptest!(|(ages in prop::collection::vec(age_strategy(), 0..64))| {
        let store = store_with_events(&ages);
        let (total, d7, d30) = all_time_counts(&store);

        let future = ages.iter().filter(|age| **age < 0).count() as u64;
        let past = ages.len() as u64 - future;

        prop_assert_eq!(total, ages.len() as u64, "total must include future events");
        prop_assert!(d7 <= past, "windows must exclude future events");
        prop_assert!(d30 <= past, "windows must exclude future events");
    });
}

#[test]
fn prop_windowed_replies_never_leak_other_fields() {
    proptest!(|(ages in prop::collection::vec(age_strategy(), 0..32))| {
        let mut store = store_with_events(&ages);

        let seven = store.handle_at(
            &RegistryRequest::new(
                actions::GET_DOWNLOAD_STATS,
                json!({"name": "web-scraper", "timeRange": "7"}),
            ),
            NOW_MS,
        );
        prop_assert!(seven.get("downloads7Days").is_some());
        prop_assert!(seven.get("downloads30Days").is_none());
        prop_assert!(seven.get("downloadsTotal").is_none());

        let thirty = store.handle_at(
            &RegistryRequest::new(
                actions::GET_DOWNLOAD_STATS,
                json!({"name": "web-scraper", "timeRange": "30"}),
            ),
            NOW_MS,
        );
        prop_assert!(thirty.get("downloads30Days").is_some());
        prop_assert!(thirty.get("downloads7Days").is_none());
        prop_assert!(thirty.get("downloadsTotal").is_none());

        let all = store.handle_at(
            &RegistryRequest::new(
                actions::GET_DOWNLOAD_STATS,
                json!({"name": "web-scraper", "timeRange": "all"}),
            ),
            NOW_MS,
        );
        prop_assert!(all.get("downloadsTotal").is_some());
        prop_assert!(all.get("downloads7Days").is_some());
        prop_assert!(all.get("downloads30Days").is_some());
    });
}

#[test]
fn prop_aggregate_total_is_monotonic_in_events() {
    proptest!(|(ages in prop::collection::vec(age_strategy(), 1..32))| {
        let mut store = RegistryStore::new();
        let register = RegistryRequest::new(
            actions::REGISTER_SKILL,
            json!({"name": "web-scraper", "version": "1.0.0", "contentId": "cid-1"}),
        );
        store.handle_at(&register, 0);

        let mut previous_total = 0u64;
        for age in &ages {
            store.record_download(RecordDownloadParams {
                name: "web-scraper".to_string(),
                version: "1.0.0".to_string(),
                requester: "addr-tester".to_string(),
                timestamp: NOW_MS - age,
            });
            let value = stats::download_stats(
                &store,
                &StatsParams {
                    scope: Some("all".to_string()),
                    name: None,
                    time_range: Some("all".to_string()),
                },
                NOW_MS,
            )
            .unwrap();
            let total = value["downloadsTotal"].as_u64().unwrap();
            prop_assert!(total > previous_total, "all-time total must grow with every event");
            previous_total = total;
        }
    });
}
