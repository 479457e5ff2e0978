#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use chrono::{TimeZone, Utc};
use serde_json::Value;
use soldium_core::{Clock, FixedClock, UserId};
use soldium_server::{build_router, AppState, LocalIdentityProvider, ServerConfig};
use soldium_store::{DocumentStore, InMemoryStore};
use tokio::io::{AsyncReadExt, AsyncWriteExt};

pub const WALLET: &str = "7xKXtg2CW87d97TXJSDpbD5jBkheTqA83TZRuJosgAsU";

pub struct TestApp {
    pub addr: SocketAddr,
    pub state: AppState,
    pub store: Arc<InMemoryStore>,
    pub clock: Arc<FixedClock>,
}

pub fn test_config() -> ServerConfig {
    ServerConfig {
        countdown_tick: Duration::from_secs(3600),
        ..ServerConfig::default()
    }
}

pub fn test_state() -> (AppState, Arc<InMemoryStore>, Arc<FixedClock>) {
    let clock = Arc::new(FixedClock::new(
        Utc.with_ymd_and_hms(2026, 2, 20, 12, 0, 0).unwrap(),
    ));
    let dyn_clock: Arc<dyn Clock> = clock.clone();
    let store = Arc::new(InMemoryStore::with_clock(dyn_clock.clone()));
    let dyn_store: Arc<dyn DocumentStore> = store.clone();
    let identity = Arc::new(LocalIdentityProvider::new(
        "test-pepper",
        Duration::from_secs(3600),
        dyn_clock.clone(),
    ));
    let state = AppState::new(test_config(), dyn_store, identity, dyn_clock).expect("app state");
    (state, store, clock)
}

pub async fn spawn_app() -> TestApp {
    let (state, store, clock) = test_state();
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral");
    let addr = listener.local_addr().expect("local addr");
    let app = build_router(state.clone());
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve app");
    });
    TestApp {
        addr,
        state,
        store,
        clock,
    }
}

/// Grants admin out-of-band, the same way the operator CLI does.
pub fn grant_admin(store: &dyn DocumentStore, user_id: &str) {
    let user = UserId::new(user_id).expect("user id");
    let mut account = store
        .get_account(&user)
        .expect("read account")
        .expect("account exists");
    account.is_admin = true;
    store.put_account(&user, &account).expect("write account");
}

pub async fn send_raw(
    method: &str,
    addr: SocketAddr,
    path: &str,
    headers: &[(&str, &str)],
    body: &str,
) -> (u16, String, String) {
    let mut stream = tokio::net::TcpStream::connect(addr)
        .await
        .expect("connect server");
    let mut req = format!("{method} {path} HTTP/1.1\r\nHost: {addr}\r\nConnection: close\r\n");
    for (k, v) in headers {
        req.push_str(&format!("{k}: {v}\r\n"));
    }
    if !body.is_empty() {
        req.push_str("Content-Type: application/json\r\n");
    }
    req.push_str(&format!("Content-Length: {}\r\n\r\n", body.len()));
    req.push_str(body);
    stream
        .write_all(req.as_bytes())
        .await
        .expect("write request");
    let mut response = String::new();
    stream
        .read_to_string(&mut response)
        .await
        .expect("read response");
    let (head, body) = response
        .split_once("\r\n\r\n")
        .expect("http response must have separator");
    let status = head
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .and_then(|s| s.parse::<u16>().ok())
        .expect("http status");
    (status, head.to_ascii_lowercase(), body.to_string())
}

pub fn json(body: &str) -> Value {
    serde_json::from_str(body).unwrap_or_else(|e| panic!("json body ({e}): {body}"))
}

pub fn bearer(token: &str) -> String {
    format!("Bearer {token}")
}

/// Signs up and returns `(token, user_id)`.
pub async fn sign_up(addr: SocketAddr, email: &str) -> (String, String) {
    let (status, _, body) = send_raw(
        "POST",
        addr,
        "/v1/auth/sign-up",
        &[],
        &format!(r#"{{"email":"{email}","password":"hunter22"}}"#),
    )
    .await;
    assert_eq!(status, 201, "sign-up failed: {body}");
    let v = json(&body);
    (
        v["token"].as_str().expect("token").to_string(),
        v["user_id"].as_str().expect("user id").to_string(),
    )
}

pub fn entry_body(amount: &str) -> String {
    format!(r#"{{"payment_reference":"5hGx9sig","solana_wallet":"{WALLET}","sol_amount":"{amount}"}}"#)
}
