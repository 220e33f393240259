//! Integration tests for the chat relay over real WebSocket connections.
//!
//! Each test starts an in-process server on an ephemeral port and drives it
//! with `tokio-tungstenite` clients and `reqwest`.

use std::{net::SocketAddr, sync::Arc, time::Duration};

use futures_util::{SinkExt, StreamExt};
use hubbub_server::{
    infrastructure::{
        message_pusher::WebSocketMessagePusher, repository::InMemoryPresenceRepository,
    },
    ui::Server,
    usecase::Relay,
};
use hubbub_shared::time::SystemClock;
use serde_json::{Value, json};
use tokio::net::{TcpListener, TcpStream};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async, tungstenite::Message};

type Client = WebSocketStream<MaybeTlsStream<TcpStream>>;

const RECV_TIMEOUT: Duration = Duration::from_secs(2);
const SILENCE_WINDOW: Duration = Duration::from_millis(300);

/// Helper struct to manage an in-process server
struct TestServer {
    addr: SocketAddr,
}

impl TestServer {
    /// Start a test server on an ephemeral port
    async fn start() -> Self {
        let (relay, _relay_task) = Relay::new(
            Box::new(InMemoryPresenceRepository::new()),
            Box::new(WebSocketMessagePusher::new()),
            Arc::new(SystemClock),
        )
        .spawn();

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("Failed to read local addr");
        let app = Server::new(relay).router();

        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("Server error");
        });

        TestServer { addr }
    }

    fn http_url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// Open a WebSocket connection to this server
    async fn connect(&self) -> Client {
        let (client, _response) = connect_async(format!("ws://{}/ws", self.addr))
            .await
            .expect("Failed to connect");
        client
    }
}

async fn send(client: &mut Client, event: Value) {
    client
        .send(Message::Text(event.to_string().into()))
        .await
        .expect("Failed to send event");
}

async fn send_raw(client: &mut Client, text: &str) {
    client
        .send(Message::Text(text.to_string().into()))
        .await
        .expect("Failed to send frame");
}

/// Receive the next JSON event, skipping control frames
async fn recv(client: &mut Client) -> Value {
    loop {
        let msg = tokio::time::timeout(RECV_TIMEOUT, client.next())
            .await
            .expect("Timed out waiting for event")
            .expect("Connection closed")
            .expect("WebSocket error");
        if let Message::Text(text) = msg {
            return serde_json::from_str(text.as_str()).expect("Invalid JSON from server");
        }
    }
}

/// Assert that no event arrives within the silence window
async fn assert_silent(client: &mut Client) {
    let result = tokio::time::timeout(SILENCE_WINDOW, client.next()).await;
    assert!(result.is_err(), "Unexpected frame: {:?}", result);
}

fn presence(names: &[&str]) -> Value {
    json!({"type": "presence", "payload": names})
}

fn join(username: &str) -> Value {
    json!({"type": "join", "payload": username})
}

fn chat(username: &str, text: &str) -> Value {
    json!({"type": "chat", "payload": {"username": username, "text": text}})
}

#[tokio::test]
async fn test_two_users_chat_and_typing() {
    // テスト項目: alice と bob の join → chat → typing → disconnect が正しく配信される
    // given (前提条件):
    let server = TestServer::start().await;
    let mut a = server.connect().await;

    // when (操作): alice が join
    send(&mut a, join("alice")).await;

    // then (期待する結果):
    assert_eq!(recv(&mut a).await, presence(&["alice"]));

    // when (操作): bob が join
    let mut b = server.connect().await;
    send(&mut b, join("bob")).await;

    // then (期待する結果): 両者に更新後のプレゼンスが届く
    assert_eq!(recv(&mut a).await, presence(&["alice", "bob"]));
    assert_eq!(recv(&mut b).await, presence(&["alice", "bob"]));

    // when (操作): alice がチャットを送信
    send(&mut a, chat("alice", "hi")).await;

    // then (期待する結果): 送信者を含む両者に同じタイムスタンプで届く
    let to_a = recv(&mut a).await;
    let to_b = recv(&mut b).await;
    assert_eq!(to_a, to_b);
    assert_eq!(to_a["type"], "chat");
    assert_eq!(to_a["payload"]["username"], "alice");
    assert_eq!(to_a["payload"]["text"], "hi");
    assert!(to_a["payload"]["timestamp"].as_i64().unwrap() > 0);

    // when (操作): bob がタイピング開始
    send(&mut b, json!({"type": "typingStart", "payload": "bob"})).await;

    // then (期待する結果): alice のみに届く
    assert_eq!(
        recv(&mut a).await,
        json!({"type": "typing", "payload": {"username": "bob", "state": "started"}})
    );
    // bob の次のイベントは自分のチャットであり、タイピング通知ではない
    send(&mut b, chat("bob", "done")).await;
    assert_eq!(recv(&mut b).await["payload"]["text"], "done");
    assert_eq!(recv(&mut a).await["payload"]["text"], "done");

    // when (操作): bob が切断
    b.close(None).await.expect("Failed to close");

    // then (期待する結果): alice に最終プレゼンスが届く
    assert_eq!(recv(&mut a).await, presence(&["alice"]));
}

#[tokio::test]
async fn test_typing_stop_is_relayed_to_peers_only() {
    // テスト項目: typingStop は送信者以外に stopped として届く
    // given (前提条件):
    let server = TestServer::start().await;
    let mut a = server.connect().await;
    send(&mut a, join("alice")).await;
    recv(&mut a).await;
    let mut b = server.connect().await;
    send(&mut b, join("bob")).await;
    recv(&mut a).await;
    recv(&mut b).await;

    // when (操作):
    send(&mut a, json!({"type": "typingStop", "payload": "alice"})).await;

    // then (期待する結果):
    assert_eq!(
        recv(&mut b).await,
        json!({"type": "typing", "payload": {"username": "alice", "state": "stopped"}})
    );
    assert_silent(&mut a).await;
}

#[tokio::test]
async fn test_empty_username_is_ignored() {
    // テスト項目: 空・空白のみのユーザー名での join はプレゼンスを配信しない
    // given (前提条件):
    let server = TestServer::start().await;
    let mut a = server.connect().await;

    // when (操作):
    send(&mut a, join("")).await;
    send(&mut a, join("   ")).await;

    // then (期待する結果):
    assert_silent(&mut a).await;

    // 有効なユーザー名なら配信される
    send(&mut a, join("alice")).await;
    assert_eq!(recv(&mut a).await, presence(&["alice"]));
}

#[tokio::test]
async fn test_malformed_frames_are_ignored() {
    // テスト項目: 不正なフレームは無視され、接続は維持される
    // given (前提条件):
    let server = TestServer::start().await;
    let mut a = server.connect().await;

    // when (操作):
    send_raw(&mut a, "not json").await;
    send(&mut a, json!({"type": "rename", "payload": "mallory"})).await;
    a.send(Message::Binary(vec![1u8, 2, 3].into()))
        .await
        .expect("Failed to send binary frame");
    send(&mut a, join("alice")).await;

    // then (期待する結果):
    assert_eq!(recv(&mut a).await, presence(&["alice"]));
}

#[tokio::test]
async fn test_anonymous_disconnect_does_not_broadcast() {
    // テスト項目: join 前に切断した接続ではプレゼンスが配信されない
    // given (前提条件):
    let server = TestServer::start().await;
    let mut a = server.connect().await;
    send(&mut a, join("alice")).await;
    recv(&mut a).await;

    // when (操作):
    let mut anonymous = server.connect().await;
    anonymous.close(None).await.expect("Failed to close");

    // then (期待する結果):
    assert_silent(&mut a).await;
}

#[tokio::test]
async fn test_duplicate_usernames_are_listed_separately() {
    // テスト項目: 同じユーザー名の接続が 2 つあればプレゼンスにも 2 件並ぶ
    // given (前提条件):
    let server = TestServer::start().await;
    let mut a = server.connect().await;
    send(&mut a, join("alice")).await;
    recv(&mut a).await;

    // when (操作):
    let mut b = server.connect().await;
    send(&mut b, join("alice")).await;

    // then (期待する結果):
    assert_eq!(recv(&mut b).await, presence(&["alice", "alice"]));
    assert_eq!(recv(&mut a).await, presence(&["alice", "alice"]));
}

#[tokio::test]
async fn test_chat_timestamps_are_non_decreasing() {
    // テスト項目: 連続したチャットのタイムスタンプは減少しない
    // given (前提条件):
    let server = TestServer::start().await;
    let mut a = server.connect().await;

    // when (操作):
    send(&mut a, chat("alice", "first")).await;
    send(&mut a, chat("alice", "second")).await;

    // then (期待する結果):
    let first = recv(&mut a).await;
    let second = recv(&mut a).await;
    assert_eq!(first["payload"]["text"], "first");
    assert_eq!(second["payload"]["text"], "second");
    assert!(
        second["payload"]["timestamp"].as_i64().unwrap()
            >= first["payload"]["timestamp"].as_i64().unwrap()
    );
}

#[tokio::test]
async fn test_http_endpoints() {
    // テスト項目: ルート・ヘルスチェック・プレゼンスの HTTP エンドポイントが応答する
    // given (前提条件):
    let server = TestServer::start().await;
    let mut a = server.connect().await;
    send(&mut a, join("alice")).await;
    recv(&mut a).await;

    // when (操作):
    let root = reqwest::get(server.http_url("/"))
        .await
        .expect("Failed to GET /");
    let root_status = root.status();
    let root_body = root.text().await.expect("Failed to read body");
    let health: Value = reqwest::get(server.http_url("/api/health"))
        .await
        .expect("Failed to GET /api/health")
        .json()
        .await
        .expect("Invalid health JSON");
    let presence_body: Value = reqwest::get(server.http_url("/api/presence"))
        .await
        .expect("Failed to GET /api/presence")
        .json()
        .await
        .expect("Invalid presence JSON");

    // then (期待する結果):
    assert!(root_status.is_success());
    assert!(root_body.contains("running"));
    assert_eq!(health, json!({"status": "ok"}));
    assert_eq!(presence_body, json!({"users": ["alice"], "count": 1}));
}

#[tokio::test]
async fn test_cors_allows_any_origin() {
    // テスト項目: 任意のオリジンからのアクセスが許可される
    // given (前提条件):
    let server = TestServer::start().await;

    // when (操作):
    let response = reqwest::Client::new()
        .get(server.http_url("/api/health"))
        .header("Origin", "http://example.com")
        .send()
        .await
        .expect("Failed to GET /api/health");

    // then (期待する結果):
    assert_eq!(
        response
            .headers()
            .get("access-control-allow-origin")
            .and_then(|v| v.to_str().ok()),
        Some("*")
    );
}
