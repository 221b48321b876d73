use axum::http::StatusCode;
use message_board::{
    api::{build_router, AppState},
    config::Config,
};
use std::net::{SocketAddr, TcpListener};
use tokio::task::JoinHandle;

async fn spawn_server() -> (SocketAddr, JoinHandle<()>, tempfile::TempDir) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    listener.set_nonblocking(true).unwrap();

    let tmp = tempfile::tempdir().unwrap();
    let config = Config {
        bind: addr.to_string(),
        db_path: tmp.path().join("messages.db"),
        logging_enabled: false,
    };
    let state = AppState::new(config).unwrap();
    let app = build_router(state);
    let server = tokio::spawn(async move {
        axum::Server::from_tcp(listener)
            .unwrap()
            .serve(app.into_make_service())
            .await
            .unwrap();
    });
    (addr, server, tmp)
}

#[tokio::test]
async fn message_crud_flow() {
    let (addr, server, _tmp) = spawn_server().await;
    let client = reqwest::Client::new();

    // create
    let resp = client
        .post(format!("http://{}/messages", addr))
        .json(&serde_json::json!({"author": "Jose", "content": "hello"}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: serde_json::Value = resp.json().await.unwrap();
    let id = created["id"].as_str().unwrap().to_string();
    assert!(!id.is_empty());
    assert!(created["created_at"].as_i64().unwrap() > 0);
    assert_eq!(created["like_count"].as_u64().unwrap(), 0);

    // get returns the created record
    let resp = client
        .get(format!("http://{}/messages/{}", addr, id))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let fetched: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(fetched, created);

    // update with matching id changes only content
    let resp = client
        .put(format!("http://{}/messages/{}", addr, id))
        .json(&serde_json::json!({"id": id, "content": "hi"}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::ACCEPTED);
    let updated: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(updated["content"], "hi");
    assert_eq!(updated["author"], "Jose");
    assert_eq!(updated["id"], created["id"]);
    assert_eq!(updated["created_at"], created["created_at"]);
    assert_eq!(updated["like_count"], created["like_count"]);

    // update with a different body id is rejected and writes nothing
    let resp = client
        .put(format!("http://{}/messages/{}", addr, id))
        .json(&serde_json::json!({
            "id": "9a092684-62f4-4c7e-3372-dfd784581712",
            "content": "hijacked"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(
        body["error"],
        "updated message does not present the correct id"
    );
    let resp = client
        .get(format!("http://{}/messages/{}", addr, id))
        .send()
        .await
        .unwrap();
    let fetched: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(fetched["content"], "hi");

    // update of an unknown id is rejected
    let resp = client
        .put(format!(
            "http://{}/messages/9a092684-62f4-4c7e-8372-dfd784581711",
            addr
        ))
        .json(&serde_json::json!({
            "id": "9a092684-62f4-4c7e-8372-dfd784581711",
            "content": "hi"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "message not found");

    // delete, then the record is gone
    let resp = client
        .delete(format!("http://{}/messages/{}", addr, id))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["deleted"], true);

    let resp = client
        .get(format!("http://{}/messages/{}", addr, id))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    // deleting again is rejected
    let resp = client
        .delete(format!("http://{}/messages/{}", addr, id))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "message not found");

    server.abort();
}

#[tokio::test]
async fn rejects_invalid_input() {
    let (addr, server, _tmp) = spawn_server().await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("http://{}/messages", addr))
        .json(&serde_json::json!({"author": "", "content": "hello"}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "empty_author");

    let resp = client
        .post(format!("http://{}/messages", addr))
        .json(&serde_json::json!({"author": "Jose", "content": "   "}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "empty_content");

    let resp = client
        .get(format!("http://{}/messages/not-a-uuid", addr))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "invalid_id");

    server.abort();
}

#[tokio::test]
async fn list_pagination() {
    let (addr, server, _tmp) = spawn_server().await;
    let client = reqwest::Client::new();

    for i in 0..5 {
        let resp = client
            .post(format!("http://{}/messages", addr))
            .json(&serde_json::json!({"author": "Jose", "content": format!("m{}", i)}))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::CREATED);
    }

    // defaults apply when no paging parameters are given
    let resp = client
        .get(format!("http://{}/messages", addr))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let all: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(all["page"].as_u64().unwrap(), 0);
    assert_eq!(all["size"].as_u64().unwrap(), 10);
    assert_eq!(all["total_elements"].as_u64().unwrap(), 5);
    assert_eq!(all["total_pages"].as_u64().unwrap(), 1);
    let content = all["content"].as_array().unwrap();
    assert_eq!(content.len(), 5);
    for pair in content.windows(2) {
        assert!(pair[0]["created_at"].as_i64().unwrap() >= pair[1]["created_at"].as_i64().unwrap());
    }

    // explicit pages partition the set without omission or duplication
    let mut combined = Vec::new();
    for page in 0..3 {
        let resp = client
            .get(format!("http://{}/messages?page={}&size=2", addr, page))
            .send()
            .await
            .unwrap();
        let body: serde_json::Value = resp.json().await.unwrap();
        assert_eq!(body["total_pages"].as_u64().unwrap(), 3);
        combined.extend(body["content"].as_array().unwrap().clone());
    }
    assert_eq!(&combined, content);

    server.abort();
}
