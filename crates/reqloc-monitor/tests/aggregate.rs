//! Windowed aggregation and retention over the service log.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::sync::Arc;

use chrono::{DateTime, TimeDelta, Utc};

use reqloc_core::{CountRecord, Location, LocationCount};
use reqloc_monitor::aggregate::{aggregate, Window};
use reqloc_monitor::log::ServiceLog;
use reqloc_monitor::monitoring::{resolve_interval, MonitoringService};
use reqloc_monitor::retention::prune_once;

fn rec(service: &str, lat: f64, lon: f64, count: u64, ts: DateTime<Utc>) -> CountRecord {
    CountRecord::new(service, Location::coordinates(lat, lon), count, ts)
}

fn find<'a>(rows: &'a [LocationCount], service: &str, lat: f64, lon: f64) -> Option<&'a LocationCount> {
    rows.iter()
        .find(|r| r.service == service && r.location == Location::coordinates(lat, lon))
}

#[test]
fn same_group_counts_are_summed() {
    let now = Utc::now();
    let records = vec![
        rec("orders", 1.0, 1.0, 3, now - TimeDelta::seconds(5)),
        rec("orders", 1.0, 1.0, 5, now - TimeDelta::seconds(1)),
    ];
    let rows = aggregate(&records, &Window::ending_at(now, 60));
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].count, 8);
}

#[test]
fn groups_split_by_service_and_location() {
    let now = Utc::now();
    let records = vec![
        rec("orders", 1.0, 1.0, 2, now),
        rec("orders", 2.0, 1.0, 4, now),
        rec("users", 1.0, 1.0, 6, now),
    ];
    let rows = aggregate(&records, &Window::ending_at(now, 10));
    assert_eq!(rows.len(), 3);
    assert_eq!(find(&rows, "orders", 1.0, 1.0).unwrap().count, 2);
    assert_eq!(find(&rows, "orders", 2.0, 1.0).unwrap().count, 4);
    assert_eq!(find(&rows, "users", 1.0, 1.0).unwrap().count, 6);
}

#[test]
fn window_bounds_are_inclusive() {
    let now = Utc::now();
    let w = Window::ending_at(now, 60);
    assert!(w.contains(now));
    assert!(w.contains(now - TimeDelta::seconds(60)));
    assert!(!w.contains(now - TimeDelta::seconds(60) - TimeDelta::milliseconds(1)));
    assert!(!w.contains(now + TimeDelta::milliseconds(1)));
}

#[test]
fn zero_interval_keeps_only_exact_now() {
    let now = Utc::now();
    let records = vec![
        rec("orders", 1.0, 1.0, 1, now),
        rec("orders", 1.0, 1.0, 9, now - TimeDelta::milliseconds(1)),
    ];
    let rows = aggregate(&records, &Window::ending_at(now, 0));
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].count, 1);
}

#[test]
fn huge_interval_saturates_instead_of_overflowing() {
    let now = Utc::now();
    let w = Window::ending_at(now, u64::MAX);
    assert!(w.contains(DateTime::<Utc>::MIN_UTC));
}

#[test]
fn included_sum_matches_predicate_for_scattered_timestamps() {
    let now = Utc::now();
    let interval = 120;
    let mut records = Vec::new();
    let mut seed: u64 = 0x2545_f491_4f6c_dd1d;
    for i in 0..500u64 {
        seed = seed.wrapping_mul(6_364_136_223_846_793_005).wrapping_add(1_442_695_040_888_963_407);
        let offset_ms = (seed >> 33) as i64 % 300_000 - 60_000;
        let ts = now - TimeDelta::milliseconds(offset_ms);
        records.push(rec("svc", (i % 3) as f64, 0.0, i % 7, ts));
    }

    let w = Window::ending_at(now, interval);
    let expected: u64 = records
        .iter()
        .filter(|r| r.timestamp >= now - TimeDelta::seconds(interval as i64) && r.timestamp <= now)
        .map(|r| r.count)
        .sum();
    let got: u64 = aggregate(&records, &w).iter().map(|r| r.count).sum();
    assert_eq!(got, expected);
}

#[test]
fn empty_log_yields_empty_results() {
    let svc = MonitoringService::new(Arc::new(ServiceLog::new()), 60);
    assert!(svc.list_all().is_empty());
    assert!(svc.list_aggregated(None).unwrap().is_empty());
}

#[test]
fn ingest_stamps_receive_time() {
    let svc = MonitoringService::new(Arc::new(ServiceLog::new()), 60);
    let before = Utc::now();
    let r = svc
        .add_monitoring(LocationCount {
            service: "orders".into(),
            location: Location::coordinates(1.0, 1.0),
            count: 3,
        })
        .unwrap();
    assert!(r.timestamp >= before && r.timestamp <= Utc::now());
    assert_eq!(svc.log().service_records("orders").len(), 1);
}

#[test]
fn ingest_rejects_empty_service() {
    let svc = MonitoringService::new(Arc::new(ServiceLog::new()), 60);
    let err = svc
        .add_monitoring(LocationCount {
            service: "  ".into(),
            location: Location::coordinates(1.0, 1.0),
            count: 3,
        })
        .unwrap_err();
    assert_eq!(err.client_code().as_str(), "BAD_REQUEST");
}

#[test]
fn stale_records_fall_outside_default_window() {
    let log = Arc::new(ServiceLog::new());
    let now = Utc::now();
    log.append(rec("orders", 1.0, 1.0, 2, now - TimeDelta::seconds(10)));
    log.append(rec("orders", 1.0, 1.0, 5, now - TimeDelta::seconds(20)));
    log.append(rec("orders", 1.0, 1.0, 100, now - TimeDelta::seconds(3600)));

    let svc = MonitoringService::new(Arc::clone(&log), 60);
    let rows = svc.list_aggregated_at(now, 60);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].count, 7);
    assert_eq!(svc.list_all().len(), 3);
}

#[test]
fn interval_resolution() {
    assert_eq!(resolve_interval(None, 60).unwrap(), 60);
    assert_eq!(resolve_interval(Some(""), 60).unwrap(), 60);
    assert_eq!(resolve_interval(Some("abc"), 60).unwrap(), 60);
    assert_eq!(resolve_interval(Some("1.5"), 60).unwrap(), 60);
    assert_eq!(resolve_interval(Some("0"), 60).unwrap(), 0);
    assert_eq!(resolve_interval(Some(" 300 "), 60).unwrap(), 300);
    let err = resolve_interval(Some("-5"), 60).unwrap_err();
    assert_eq!(err.client_code().as_str(), "BAD_REQUEST");
}

#[test]
fn prune_drops_only_expired_records() {
    let log = ServiceLog::new();
    let now = Utc::now();
    log.append(rec("orders", 1.0, 1.0, 1, now - TimeDelta::seconds(7200)));
    log.append(rec("orders", 1.0, 1.0, 1, now));
    log.append(rec("users", 1.0, 1.0, 1, now - TimeDelta::seconds(7200)));

    assert_eq!(prune_once(&log, 3600), 2);
    assert_eq!(log.len(), 1);
    assert_eq!(log.service_records("users").len(), 0);
    assert_eq!(log.services().len(), 2);
}
