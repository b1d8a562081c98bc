//! End-to-end tests against a live server on an ephemeral port

use launcher_client::{BatchOperation, ClientApi, ClientConfig, RpcClient};
use launcher_core::models::LauncherConfig;
use launcher_server::{ApiError, LauncherServer, MethodRegistry, RpcServer};
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::Arc;
use tempfile::TempDir;

async fn start_server(temp_dir: &TempDir) -> (LauncherServer, SocketAddr) {
    let mut config = LauncherConfig::default().with_data_dir(temp_dir.path());
    config.server.host = "127.0.0.1".to_string();
    config.server.rpc_port = 0;

    let server = LauncherServer::new(config);
    let addr = server.start().await.unwrap();
    (server, addr)
}

async fn connected_api(addr: SocketAddr) -> ClientApi {
    let config = ClientConfig::new(addr.ip().to_string(), addr.port());
    let api = ClientApi::new(Arc::new(RpcClient::new(&config).unwrap()));
    api.connect().await.unwrap();
    api
}

fn url(addr: SocketAddr) -> String {
    format!("http://{}/", addr)
}

#[tokio::test]
async fn test_memory_create_then_read() {
    let temp_dir = TempDir::new().unwrap();
    let (server, addr) = start_server(&temp_dir).await;
    let api = connected_api(addr).await;

    assert_eq!(
        api.create_file("/a.txt", "hi", Some("memory")).await.unwrap(),
        json!(true)
    );
    assert_eq!(
        api.read_file("/a.txt", Some("memory")).await.unwrap(),
        json!("hi")
    );
    assert_eq!(
        api.read_file("/missing.txt", Some("memory")).await.unwrap(),
        Value::Null
    );

    server.stop().await;
}

#[tokio::test]
async fn test_git_fs_commits_writes() {
    let temp_dir = TempDir::new().unwrap();
    let (server, addr) = start_server(&temp_dir).await;
    let api = connected_api(addr).await;

    api.create_file("notes/today.txt", "draft", Some("git"))
        .await
        .unwrap();
    api.update_file("notes/today.txt", "final", Some("git"))
        .await
        .unwrap();

    let history = api.fs_history(Some(10), Some("git")).await.unwrap();
    assert_eq!(history.as_array().unwrap().len(), 2);
    assert_eq!(api.fs_git_status(Some("git")).await.unwrap(), json!([]));

    server.stop().await;
}

#[tokio::test]
async fn test_concurrent_git_writes_each_commit() {
    let temp_dir = TempDir::new().unwrap();
    let (server, addr) = start_server(&temp_dir).await;
    let api = connected_api(addr).await;

    let paths: Vec<String> = (0..16).map(|i| format!("f{}.txt", i)).collect();
    let writes = paths
        .iter()
        .map(|path| api.create_file(path, "data", Some("git")));
    for created in futures::future::join_all(writes).await {
        assert_eq!(created.unwrap(), json!(true));
    }

    let history = api.fs_history(Some(100), Some("git")).await.unwrap();
    assert_eq!(history.as_array().unwrap().len(), 16);
    assert_eq!(api.fs_git_status(Some("git")).await.unwrap(), json!([]));

    server.stop().await;
}

#[tokio::test]
async fn test_unknown_method_envelope() {
    let temp_dir = TempDir::new().unwrap();
    let (server, addr) = start_server(&temp_dir).await;

    let response = reqwest::Client::new()
        .post(url(addr))
        .json(&json!({"jsonrpc": "2.0", "method": "no.such.method", "params": {}, "id": 7}))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(
        body,
        json!({
            "jsonrpc": "2.0",
            "error": {
                "code": -32603,
                "message": "Internal error",
                "data": "Method not found: no.such.method"
            },
            "id": 7
        })
    );

    server.stop().await;
}

#[tokio::test]
async fn test_success_and_handler_error_are_both_200() {
    let temp_dir = TempDir::new().unwrap();
    let (server, addr) = start_server(&temp_dir).await;
    let http = reqwest::Client::new();

    let ok = http
        .post(url(addr))
        .json(&json!({"jsonrpc": "2.0", "method": "system.getComponents", "id": 1}))
        .send()
        .await
        .unwrap();
    assert_eq!(ok.status(), 200);
    let body: Value = ok.json().await.unwrap();
    assert!(body.get("result").is_some());
    assert!(body.get("error").is_none());

    let failed = http
        .post(url(addr))
        .json(&json!({
            "jsonrpc": "2.0",
            "method": "fs.read",
            "params": {"fsName": "nope", "path": "/a"},
            "id": 2
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(failed.status(), 200);
    let body: Value = failed.json().await.unwrap();
    assert_eq!(body["error"]["code"], -32603);
    assert_eq!(body["error"]["data"], "File system not found: nope");
    assert!(body.get("result").is_none());

    server.stop().await;
}

#[tokio::test]
async fn test_missing_method_is_invalid_method() {
    let temp_dir = TempDir::new().unwrap();
    let (server, addr) = start_server(&temp_dir).await;

    let body: Value = reqwest::Client::new()
        .post(url(addr))
        .json(&json!({"jsonrpc": "2.0", "params": {}, "id": 3}))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(body["error"]["data"], "Invalid method");
    assert_eq!(body["id"], 3);

    server.stop().await;
}

#[tokio::test]
async fn test_non_post_is_405() {
    let temp_dir = TempDir::new().unwrap();
    let (server, addr) = start_server(&temp_dir).await;
    let http = reqwest::Client::new();

    for request in [
        http.get(url(addr)),
        http.put(url(addr)).body(r#"{"method":"system.getStatus"}"#),
        http.delete(url(addr)),
    ] {
        let response = request.send().await.unwrap();
        assert_eq!(response.status(), 405);
        assert_eq!(
            response.headers()["access-control-allow-origin"],
            "*"
        );
        let body: Value = response.json().await.unwrap();
        assert_eq!(
            body,
            json!({"error": {"code": 405, "message": "Method Not Allowed"}})
        );
    }

    server.stop().await;
}

#[tokio::test]
async fn test_options_preflight() {
    let temp_dir = TempDir::new().unwrap();
    let (server, addr) = start_server(&temp_dir).await;

    let response = reqwest::Client::new()
        .request(reqwest::Method::OPTIONS, url(addr))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    let headers = response.headers();
    assert_eq!(headers["access-control-allow-origin"], "*");
    assert_eq!(
        headers["access-control-allow-methods"],
        "GET, POST, PUT, DELETE, OPTIONS"
    );
    assert_eq!(
        headers["access-control-allow-headers"],
        "Content-Type, Authorization"
    );
    assert!(response.text().await.unwrap().is_empty());

    server.stop().await;
}

#[tokio::test]
async fn test_malformed_json_is_500() {
    let temp_dir = TempDir::new().unwrap();
    let (server, addr) = start_server(&temp_dir).await;

    let response = reqwest::Client::new()
        .post(url(addr))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 500);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"]["code"], 500);
    assert_eq!(body["error"]["message"], "Internal Server Error");
    assert!(body["error"]["details"].is_string());

    server.stop().await;
}

#[tokio::test]
async fn test_large_body_is_accepted() {
    let temp_dir = TempDir::new().unwrap();
    let (server, addr) = start_server(&temp_dir).await;
    let http = reqwest::Client::new();
    let data = "x".repeat(3 * 1024 * 1024);

    let response = http
        .post(url(addr))
        .json(&json!({
            "jsonrpc": "2.0",
            "method": "fs.create",
            "params": {"fsName": "memory", "path": "/big.txt", "data": data},
            "id": 1
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    assert_eq!(response.headers()["access-control-allow-origin"], "*");
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["result"], true);

    let stats: Value = http
        .post(url(addr))
        .json(&json!({
            "jsonrpc": "2.0",
            "method": "fs.stats",
            "params": {"fsName": "memory"},
            "id": 2
        }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(stats["result"]["totalSize"], 3 * 1024 * 1024);

    let rejected = http
        .get(url(addr))
        .body("y".repeat(3 * 1024 * 1024))
        .send()
        .await
        .unwrap();
    assert_eq!(rejected.status(), 405);
    assert_eq!(
        rejected.headers()["access-control-allow-headers"],
        "Content-Type, Authorization"
    );

    server.stop().await;
}

#[tokio::test]
async fn test_handler_panic_is_500() {
    let mut registry = MethodRegistry::new();
    registry.register("boom", |_| async {
        if true {
            panic!("handler exploded");
        }
        Ok::<_, ApiError>(Value::Null)
    });
    let server = RpcServer::new("127.0.0.1", 0, Arc::new(registry));
    let addr = server.start().await.unwrap();

    let response = reqwest::Client::new()
        .post(url(addr))
        .json(&json!({"jsonrpc": "2.0", "method": "boom", "id": 1}))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 500);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"]["details"], "handler exploded");

    server.stop().await;
}

#[tokio::test]
async fn test_batch_reports_each_operation() {
    let temp_dir = TempDir::new().unwrap();
    let (server, addr) = start_server(&temp_dir).await;
    let api = connected_api(addr).await;

    let results = api
        .batch(&[
            BatchOperation::new(
                "fs.create",
                json!({"fsName": "memory", "path": "/b.txt", "data": "x"}),
            ),
            BatchOperation::new("no.such.method", json!({})),
            BatchOperation::new("fs.read", json!({"fsName": "memory", "path": "/b.txt"})),
            BatchOperation::new("fs.read", json!({"fsName": "missing", "path": "/b.txt"})),
        ])
        .await;

    assert_eq!(results.len(), 4);
    let failures = results.iter().filter(|r| !r.success).count();
    assert_eq!(failures, 2);
    assert!(results[0].success);
    assert!(!results[1].success);
    assert_eq!(results[2].result, Some(json!("x")));
    assert!(!results[3].success);

    server.stop().await;
}

#[tokio::test]
async fn test_component_unavailable() {
    let registry = {
        let core = Arc::new(launcher_core::Core::new(LauncherConfig::default()));
        launcher_server::build_registry(&core)
    };
    let server = RpcServer::new("127.0.0.1", 0, Arc::new(registry));
    let addr = server.start().await.unwrap();

    let body: Value = reqwest::Client::new()
        .post(url(addr))
        .json(&json!({"jsonrpc": "2.0", "method": "container.list", "id": 5}))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(body["error"]["data"], "Container component not available");

    server.stop().await;
}

#[tokio::test]
async fn test_component_methods_through_client() {
    let temp_dir = TempDir::new().unwrap();
    let (server, addr) = start_server(&temp_dir).await;
    let api = connected_api(addr).await;

    let container = api
        .container_create(json!({"name": "web", "image": "nginx"}))
        .await
        .unwrap();
    assert_eq!(container["status"], "created");

    assert_eq!(
        api.persistence_save("k", json!({"v": 1})).await.unwrap(),
        json!(true)
    );
    assert_eq!(api.persistence_load("k").await.unwrap(), json!({"v": 1}));

    let hook = api
        .trigger_api("webhook", "createWebhook", json!({"workflowId": "wf"}))
        .await
        .unwrap();
    assert_eq!(hook["url"], "/api/webhook/wf");

    let info = api.server_info().await.unwrap();
    assert_eq!(info["status"]["initialized"], true);
    assert_eq!(info["components"].as_array().unwrap().len(), 6);

    server.stop().await;
}

#[tokio::test]
async fn test_connect_fails_without_server() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let client = RpcClient::new(&ClientConfig::new("127.0.0.1", port)).unwrap();
    let err = client.connect().await.unwrap_err();

    assert!(err.to_string().starts_with("Ping failed: "));
    assert!(!client.is_connected());
}
