// Endpoint tests: report ingestion (auth, validation, storage laws) and
// the JSON read views, against a real SQLite file.

use axum_test::TestServer;
use lanwatch::device_repo::DeviceRepo;
use lanwatch::models::DeviceSnapshot;
use lanwatch::routes;
use std::sync::Arc;
use tempfile::TempDir;

const TOKEN: &str = "123456";

async fn test_server(dir: &TempDir) -> (TestServer, Arc<DeviceRepo>) {
    let path = dir.path().join("lanwatch.db");
    let repo = Arc::new(DeviceRepo::connect(path.to_str().unwrap()).await.unwrap());
    repo.init().await.unwrap();
    let server = TestServer::new(routes::app(repo.clone(), TOKEN));
    (server, repo)
}

fn snapshot(ip: &str, name: &str, heartbeat_time: &str) -> DeviceSnapshot {
    DeviceSnapshot {
        ip: ip.to_string(),
        mac: "aa:bb:cc:dd:ee:ff".to_string(),
        name: name.to_string(),
        heartbeat_time: heartbeat_time.to_string(),
    }
}

fn now_heartbeat() -> String {
    lanwatch::models::current_heartbeat_time()
}

#[tokio::test]
async fn report_with_valid_token_records_batch() {
    let dir = TempDir::new().unwrap();
    let (server, repo) = test_server(&dir).await;

    let batch = vec![snapshot("192.168.18.107", "laptop", &now_heartbeat())];
    let response = server
        .post("/api/report")
        .add_header("token", TOKEN)
        .json(&batch)
        .await;

    response.assert_status_ok();
    let json: serde_json::Value = response.json();
    assert_eq!(json["code"], 200);
    assert_eq!(json["msg"], "OK");
    assert_eq!(repo.count_devices().await.unwrap(), 1);
    assert_eq!(repo.count_logs().await.unwrap(), 1);
}

#[tokio::test]
async fn report_with_bad_token_is_401_and_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let (server, repo) = test_server(&dir).await;

    let batch = vec![snapshot("192.168.18.107", "laptop", &now_heartbeat())];
    let response = server
        .post("/api/report")
        .add_header("token", "wrong")
        .json(&batch)
        .await;

    response.assert_status_unauthorized();
    let json: serde_json::Value = response.json();
    assert_eq!(json["code"], 401);
    assert_eq!(repo.count_devices().await.unwrap(), 0);
    assert_eq!(repo.count_logs().await.unwrap(), 0);
}

#[tokio::test]
async fn report_with_missing_token_is_401() {
    let dir = TempDir::new().unwrap();
    let (server, repo) = test_server(&dir).await;

    let batch = vec![snapshot("192.168.18.107", "laptop", &now_heartbeat())];
    let response = server.post("/api/report").json(&batch).await;

    response.assert_status_unauthorized();
    assert_eq!(repo.count_logs().await.unwrap(), 0);
}

#[tokio::test]
async fn empty_batch_is_400_and_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let (server, repo) = test_server(&dir).await;

    let response = server
        .post("/api/report")
        .add_header("token", TOKEN)
        .json(&Vec::<DeviceSnapshot>::new())
        .await;

    response.assert_status_bad_request();
    let json: serde_json::Value = response.json();
    assert_eq!(json["code"], 400);
    assert_eq!(repo.count_devices().await.unwrap(), 0);
    assert_eq!(repo.count_logs().await.unwrap(), 0);
}

#[tokio::test]
async fn index_json_is_sorted_by_ip_with_time_offset() {
    let dir = TempDir::new().unwrap();
    let (server, _repo) = test_server(&dir).await;

    let hb = now_heartbeat();
    let batch = vec![
        snapshot("192.168.18.20", "b", &hb),
        snapshot("192.168.18.1", "a", &hb),
    ];
    server
        .post("/api/report")
        .add_header("token", TOKEN)
        .json(&batch)
        .await
        .assert_status_ok();

    let response = server.get("/index.json").await;
    response.assert_status_ok();
    let json: serde_json::Value = response.json();
    let devices = json["devices"].as_array().unwrap();
    assert_eq!(devices.len(), 2);
    // String ascending, like the original view.
    assert_eq!(devices[0]["ip"], "192.168.18.1");
    assert_eq!(devices[1]["ip"], "192.168.18.20");
    // Heartbeat was "now"; offset stays tiny.
    assert!(devices[0]["time_offset"].as_i64().unwrap() < 60);
}

#[tokio::test]
async fn detail_json_returns_recent_logs_descending() {
    let dir = TempDir::new().unwrap();
    let (server, _repo) = test_server(&dir).await;

    let hb = now_heartbeat();
    server
        .post("/api/report")
        .add_header("token", TOKEN)
        .json(&vec![
            snapshot("10.0.0.5", "a", &hb),
            snapshot("10.0.0.6", "b", &hb),
        ])
        .await
        .assert_status_ok();

    let response = server.get("/detail.json").await;
    response.assert_status_ok();
    let json: serde_json::Value = response.json();
    assert_eq!(json["device_logs"].as_array().unwrap().len(), 2);

    let filtered = server.get("/detail.json?ip=10.0.0.5").await;
    filtered.assert_status_ok();
    let json: serde_json::Value = filtered.json();
    let logs = json["device_logs"].as_array().unwrap();
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0]["ip"], "10.0.0.5");
}

#[tokio::test]
async fn distribution_json_buckets_todays_reports() {
    let dir = TempDir::new().unwrap();
    let (server, _repo) = test_server(&dir).await;

    let now = chrono::Local::now();
    let hb = now.format("%Y-%m-%d %H:%M:%S").to_string();
    server
        .post("/api/report")
        .add_header("token", TOKEN)
        .json(&vec![
            snapshot("10.0.0.5", "a", &hb),
            snapshot("10.0.0.6", "b", &hb),
        ])
        .await
        .assert_status_ok();

    let response = server.get("/distribution.json").await;
    response.assert_status_ok();
    let json: serde_json::Value = response.json();

    assert_eq!(json["dates"].as_array().unwrap().len(), 31);
    assert_eq!(json["hours"].as_array().unwrap().len(), 24);

    let today = now.format("%Y%m%d").to_string();
    let hour = now.format("%H").to_string();
    assert_eq!(json["device_logs"][&today][&hour], 2);
}

#[tokio::test]
async fn read_endpoints_do_not_require_token() {
    let dir = TempDir::new().unwrap();
    let (server, _repo) = test_server(&dir).await;

    server.get("/index.json").await.assert_status_ok();
    server.get("/detail.json").await.assert_status_ok();
    server.get("/distribution.json").await.assert_status_ok();
    server.get("/favicon.ico").await.assert_status_ok();
}

#[tokio::test]
async fn version_endpoint_reports_package_identity() {
    let dir = TempDir::new().unwrap();
    let (server, _repo) = test_server(&dir).await;

    let response = server.get("/version").await;
    response.assert_status_ok();
    let json: serde_json::Value = response.json();
    assert_eq!(json["name"], "lanwatch");
    assert!(json["version"].as_str().is_some());
}
