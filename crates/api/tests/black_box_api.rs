use std::sync::Arc;

use packforge_infra::{InventoryStore, JsonFileStore};
use packforge_inventory::InventoryRecord;
use reqwest::StatusCode;
use serde_json::{json, Value};

struct TestServer {
    base_url: String,
    store: Arc<InventoryStore>,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn(prefix: &str) -> Self {
        Self::spawn_with(Arc::new(InventoryStore::new()), prefix).await
    }

    async fn spawn_with(store: Arc<InventoryStore>, prefix: &str) -> Self {
        // Same router as prod, bound to an ephemeral port.
        let app = packforge_api::app::build_app(Arc::clone(&store), prefix);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url,
            store,
            handle,
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn pack_json(size: u64) -> Value {
    json!({
        "type": {
            "id": "9f1c6d2e-4b3a-4c8e-9a51-0d7e2f6b8c41",
            "name": "Chelsea Boot",
            "forSale": true,
            "price": 30000
        },
        "size": size
    })
}

fn packs_json(sizes: &[u64]) -> Value {
    Value::Array(sizes.iter().map(|s| pack_json(*s)).collect())
}

async fn put_packs(client: &reqwest::Client, url: String, sizes: &[u64]) -> reqwest::Response {
    client
        .put(url)
        .json(&packs_json(sizes))
        .send()
        .await
        .unwrap()
}

#[tokio::test]
async fn health_is_ok() {
    let srv = TestServer::spawn("").await;
    let res = reqwest::get(format!("{}/health", srv.base_url)).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn replace_then_order_allocates_packs() {
    let srv = TestServer::spawn("").await;
    let client = reqwest::Client::new();

    let res = put_packs(
        &client,
        format!("{}/inventory/boots", srv.base_url),
        &[5000, 250, 1000, 500, 2000],
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    let sizes: Vec<u64> = body["response"]["boots"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["size"].as_u64().unwrap())
        .collect();
    assert_eq!(sizes, vec![250, 500, 1000, 2000, 5000]);

    let res = client
        .get(format!("{}/inventory/boots/order/1", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body, json!({ "response": { "250": 1 } }));

    let res = client
        .get(format!("{}/inventory/boots/order/12001", srv.base_url))
        .send()
        .await
        .unwrap();
    let body: Value = res.json().await.unwrap();
    assert_eq!(
        body,
        json!({ "response": { "250": 1, "2000": 1, "5000": 2 } })
    );
}

#[tokio::test]
async fn list_returns_the_serialized_inventory() {
    let srv = TestServer::spawn("").await;
    let client = reqwest::Client::new();
    put_packs(&client, format!("{}/inventory/boots", srv.base_url), &[500, 250]).await;

    let res = client
        .get(format!("{}/inventory/", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    let boots = body["response"]["boots"].as_array().unwrap();
    assert_eq!(boots.len(), 2);
    assert_eq!(boots[0]["size"], 250);
    assert_eq!(boots[0]["type"]["forSale"], true);
}

#[tokio::test]
async fn duplicate_pack_sizes_are_rejected_and_previous_packs_kept() {
    let srv = TestServer::spawn("").await;
    let client = reqwest::Client::new();
    let url = format!("{}/inventory/boots", srv.base_url);

    assert_eq!(put_packs(&client, url.clone(), &[250]).await.status(), StatusCode::OK);

    let res = put_packs(&client, url, &[500, 500]).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "validation_error");

    let kept: Vec<u64> = srv
        .store
        .get_packs("boots")
        .unwrap()
        .iter()
        .map(|p| p.size)
        .collect();
    assert_eq!(kept, vec![250]);
}

#[tokio::test]
async fn malformed_body_is_a_bad_request() {
    let srv = TestServer::spawn("").await;
    let res = reqwest::Client::new()
        .put(format!("{}/inventory/boots", srv.base_url))
        .header("content-type", "application/json")
        .body(r#"[{ "size": "big" }]"#)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn order_errors_map_to_status_codes() {
    let srv = TestServer::spawn("").await;
    let client = reqwest::Client::new();
    put_packs(&client, format!("{}/inventory/boots", srv.base_url), &[250]).await;

    let res = client
        .get(format!("{}/inventory/boots/order/ten", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = client
        .get(format!("{}/inventory/coats/order/10", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "item_not_found");
}

#[tokio::test]
async fn versioned_prefix_moves_inventory_routes() {
    let srv = TestServer::spawn("/v1").await;
    let client = reqwest::Client::new();

    let res = put_packs(&client, format!("{}/v1/inventory/boots", srv.base_url), &[250]).await;
    assert_eq!(res.status(), StatusCode::OK);

    let res = client
        .get(format!("{}/inventory/", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = client
        .get(format!("{}/v1/inventory/boots/order/300", srv.base_url))
        .send()
        .await
        .unwrap();
    let body: Value = res.json().await.unwrap();
    assert_eq!(body, json!({ "response": { "250": 2 } }));
}

#[tokio::test]
async fn responses_carry_cors_headers_and_preflight_is_no_content() {
    let srv = TestServer::spawn("").await;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/inventory/", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.headers()["access-control-allow-origin"], "*");

    let res = client
        .request(
            reqwest::Method::OPTIONS,
            format!("{}/inventory/boots", srv.base_url),
        )
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NO_CONTENT);
    assert_eq!(res.headers()["access-control-allow-origin"], "*");
    assert!(res.headers()["access-control-allow-methods"]
        .to_str()
        .unwrap()
        .contains("PUT"));
}

#[tokio::test]
async fn replaced_packs_reach_durable_storage() {
    let path = std::env::temp_dir().join(format!("packforge-api-{}.json", uuid::Uuid::new_v4()));
    let storage: JsonFileStore<InventoryRecord> = JsonFileStore::new(&path);
    storage.save(&InventoryRecord::new()).unwrap();

    let (store, worker) = InventoryStore::open(storage.clone()).unwrap();
    let srv = TestServer::spawn_with(Arc::new(store), "").await;
    let client = reqwest::Client::new();
    let res = put_packs(&client, format!("{}/inventory/boots", srv.base_url), &[1000, 250]).await;
    assert_eq!(res.status(), StatusCode::OK);

    tokio::task::spawn_blocking(move || worker.shutdown())
        .await
        .unwrap();

    let on_disk = storage.load().unwrap();
    let sizes: Vec<u64> = on_disk["boots"].iter().map(|p| p.size).collect();
    assert_eq!(sizes, vec![250, 1000]);
    let _ = std::fs::remove_file(path);
}
