//! End-to-end tests for the cluster API.

use monitor_sdk::MonitorClient;

mod common;

use common::{start_server, start_server_in, unreachable, ScriptedProbe};

#[tokio::test]
async fn test_register_healthy_cluster() {
    let probe = ScriptedProbe::healthy();
    let server = start_server(probe.clone()).await;
    let client = MonitorClient::new(&server.url);

    let view = client
        .register_cluster("C1", &["10.0.0.1:6789"], "AQBkey==")
        .await
        .expect("registration should succeed");

    assert_eq!(view.name, "C1");
    assert_eq!(view.status, "ok");
    assert!(!view.is_stable, "stability window has not elapsed yet");
    assert!(view.detail.is_null());
    assert_eq!(server.runtime.scheduler.watched(), vec![view.id.clone()]);
    assert!(server.runtime.scheduler.poll_level(&view.id).is_some());
    assert!(probe.calls() >= 1);

    server.stop().await;
}

#[tokio::test]
async fn test_register_fails_when_cluster_unreachable() {
    let server = start_server(ScriptedProbe::with(vec![unreachable()])).await;
    let client = MonitorClient::new(&server.url);

    let err = client
        .register_cluster("C1", &["10.0.0.1:6789"], "AQBkey==")
        .await
        .unwrap_err();

    let message = err.to_string();
    assert!(message.contains("500"), "unexpected error: {message}");
    assert!(message.contains("failed to health check"), "unexpected error: {message}");
    assert!(client.list_clusters().await.unwrap().is_empty());
    assert!(server.runtime.scheduler.watched().is_empty());

    server.stop().await;
}

#[tokio::test]
async fn test_register_rejects_invalid_hosts() {
    let probe = ScriptedProbe::healthy();
    let server = start_server(probe.clone()).await;
    let client = MonitorClient::new(&server.url);

    let err = client
        .register_cluster("C1", &["mon-a.example"], "AQBkey==")
        .await
        .unwrap_err();
    assert!(err.to_string().contains("invalid address"), "unexpected error: {err}");

    let err = client
        .register_cluster("C1", &[], "AQBkey==")
        .await
        .unwrap_err();
    assert!(err.to_string().contains("invalid"), "unexpected error: {err}");

    assert_eq!(probe.calls(), 0);
    server.stop().await;
}

#[tokio::test]
async fn test_empty_list_is_no_content() {
    let server = start_server(ScriptedProbe::healthy()).await;

    let res = reqwest::get(format!("{}/clusters", server.url)).await.unwrap();
    assert_eq!(res.status(), 204);
    assert!(res.text().await.unwrap().is_empty());

    let client = MonitorClient::new(&server.url);
    assert!(client.list_clusters().await.unwrap().is_empty());

    server.stop().await;
}

#[tokio::test]
async fn test_list_returns_registered_clusters_in_id_order() {
    let server = start_server(ScriptedProbe::healthy()).await;
    let client = MonitorClient::new(&server.url);

    let first = client
        .register_cluster("C1", &["10.0.0.1:6789"], "k1")
        .await
        .unwrap();
    tokio::time::sleep(std::time::Duration::from_millis(2)).await;
    let second = client
        .register_cluster("C2", &["10.0.0.2:6789", "10.0.0.3:6789"], "k2")
        .await
        .unwrap();

    let listed = client.list_clusters().await.unwrap();
    let ids: Vec<&str> = listed.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, vec![first.id.as_str(), second.id.as_str()]);
    assert!(listed.iter().all(|c| c.status == "ok" && !c.is_stable));

    server.stop().await;
}

#[tokio::test]
async fn test_clusters_survive_restart() {
    let dir = tempfile::tempdir().unwrap();

    let server = start_server_in(ScriptedProbe::healthy(), dir.path()).await;
    let registered = MonitorClient::new(&server.url)
        .register_cluster("C1", &["10.0.0.1:6789"], "AQBkey==")
        .await
        .unwrap();
    server.stop().await;

    let restarted = start_server_in(ScriptedProbe::healthy(), dir.path()).await;
    assert_eq!(restarted.runtime.scheduler.watched(), vec![registered.id.clone()]);

    let listed = MonitorClient::new(&restarted.url).list_clusters().await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, registered.id);
    assert_eq!(listed[0].name, "C1");

    restarted.stop().await;
}
