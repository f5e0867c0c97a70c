mod common;

use axum::http::StatusCode;
use common::*;
use inventory_collector_core::{
    CollectionError,
    ExporterCollector,
    RunSummary,
};
use pretty_assertions::assert_eq;
use std::time::Duration;
use temp_dir::TempDir;

fn collector(targets: Vec<inventory_collector_config::Target>) -> ExporterCollector {
    ExporterCollector::new(targets, reqwest::Client::new())
}

#[tokio::test]
async fn archives_every_endpoint_of_a_target() {
    let dir = TempDir::new().unwrap();
    let exporter = FakeExporter::spawn(vec![
        ("dpkg", Reply::Body("dpkg-data".to_string())),
        ("snap", Reply::Body("snap-data".to_string())),
        ("kernel", Reply::Body("kernel-data".to_string())),
    ])
    .await;

    let mut collector = collector(vec![target(&exporter.endpoint, "h", "m")]);
    let (collected, written) = run_collector(&mut collector, dir.path()).await;
    collected.unwrap();
    let summary = written.unwrap();

    assert_eq!(summary.entry_count(), 3);
    assert_eq!(archive_names(dir.path()), vec!["foo_@_bar_@_m_@_20240101120000.tar"]);
    assert_eq!(
        read_archive(&dir.child("foo_@_bar_@_m_@_20240101120000.tar")),
        vec![
            ("dpkg_@_h_@_20240101120000".to_string(), "dpkg-data".to_string()),
            ("snap_@_h_@_20240101120000".to_string(), "snap-data".to_string()),
            ("kernel_@_h_@_20240101120000".to_string(), "kernel-data".to_string()),
        ]
    );
    assert_eq!(exporter.events.all(), vec!["dpkg", "snap", "kernel"]);
}

#[tokio::test]
async fn targets_are_grouped_by_model() {
    let dir = TempDir::new().unwrap();
    let first = FakeExporter::spawn(vec![]).await;
    let second = FakeExporter::spawn(vec![]).await;
    let third = FakeExporter::spawn(vec![]).await;

    let mut collector = collector(vec![
        target(&first.endpoint, "h1", "openstack"),
        target(&second.endpoint, "h2", "openstack"),
        target(&third.endpoint, "h3", "k8s"),
    ]);
    let (collected, written) = run_collector(&mut collector, dir.path()).await;
    collected.unwrap();
    let summary = written.unwrap();

    assert_eq!(summary.archive_count(), 2);
    assert_eq!(
        archive_names(dir.path()),
        vec![
            "foo_@_bar_@_k8s_@_20240101120000.tar",
            "foo_@_bar_@_openstack_@_20240101120000.tar",
        ]
    );

    let shared: Vec<_> = read_archive(&dir.child("foo_@_bar_@_openstack_@_20240101120000.tar"))
        .into_iter()
        .map(|(name, _)| name)
        .collect();
    assert_eq!(
        shared,
        vec![
            "dpkg_@_h1_@_20240101120000",
            "snap_@_h1_@_20240101120000",
            "kernel_@_h1_@_20240101120000",
            "dpkg_@_h2_@_20240101120000",
            "snap_@_h2_@_20240101120000",
            "kernel_@_h2_@_20240101120000",
        ]
    );
}

#[tokio::test]
async fn error_status_aborts_every_remaining_target() {
    let dir = TempDir::new().unwrap();
    let failing = FakeExporter::spawn(vec![("snap", Reply::Status(StatusCode::INTERNAL_SERVER_ERROR))]).await;
    let untouched = FakeExporter::spawn(vec![]).await;

    let mut collector = collector(vec![
        target(&failing.endpoint, "h1", "m"),
        target(&untouched.endpoint, "h2", "other"),
    ]);
    let (collected, written) = run_collector(&mut collector, dir.path()).await;

    let err = collected.unwrap_err();
    match &err {
        CollectionError::Exporter { target, source } => {
            assert_eq!(target, &failing.endpoint);
            assert_eq!(source.status(), Some(StatusCode::INTERNAL_SERVER_ERROR));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(err
        .to_string()
        .starts_with(&format!("Failed to collect data from target '{}'", failing.endpoint)));

    assert_eq!(written.unwrap().entry_count(), 1);
    assert_eq!(
        read_archive(&dir.child("foo_@_bar_@_m_@_20240101120000.tar")),
        vec![("dpkg_@_h1_@_20240101120000".to_string(), "dpkg-data".to_string())]
    );
    assert!(untouched.events.all().is_empty());
    assert_eq!(failing.events.all(), vec!["dpkg", "snap"]);
}

#[tokio::test]
async fn timeout_is_a_collection_failure() {
    let dir = TempDir::new().unwrap();
    let exporter = FakeExporter::spawn(vec![("snap", Reply::Stall(Duration::from_secs(5)))]).await;

    let mut collector =
        collector(vec![target(&exporter.endpoint, "h", "m")]).with_timeout(Duration::from_millis(200));
    let (collected, written) = run_collector(&mut collector, dir.path()).await;

    match collected.unwrap_err() {
        CollectionError::Exporter { source, .. } => assert!(source.is_timeout()),
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(written.unwrap().entry_count(), 1);
    assert_eq!(exporter.events.all(), vec!["dpkg", "snap"]);
}

#[tokio::test]
async fn unreachable_target_is_a_collection_failure() {
    let dir = TempDir::new().unwrap();
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let endpoint = listener.local_addr().unwrap().to_string();
    drop(listener);

    let mut collector = collector(vec![target(&endpoint, "h", "m")]);
    let (collected, written) = run_collector(&mut collector, dir.path()).await;

    assert!(matches!(collected, Err(CollectionError::Exporter { .. })));
    assert_eq!(written.unwrap().entry_count(), 0);
    assert!(archive_names(dir.path()).is_empty());
}

#[tokio::test]
async fn no_targets_collects_nothing() {
    let dir = TempDir::new().unwrap();
    let mut collector = collector(vec![]);

    let (collected, written) = run_collector(&mut collector, dir.path()).await;

    collected.unwrap();
    assert_eq!(written.unwrap(), RunSummary::default());
}
