mod support;

use support::{bearer, entry_body, grant_admin, json, send_raw, sign_up, spawn_app};

#[tokio::test]
async fn health_version_and_terms_are_public() {
    let app = spawn_app().await;
    let (status, _, body) = send_raw("GET", app.addr, "/healthz", &[], "").await;
    assert_eq!((status, body.as_str()), (200, "ok"));
    let (status, _, body) = send_raw("GET", app.addr, "/readyz", &[], "").await;
    assert_eq!((status, body.as_str()), (200, "ready"));

    let (status, head, body) = send_raw("GET", app.addr, "/v1/version", &[], "").await;
    assert_eq!(status, 200);
    assert!(head.contains("cache-control: public, max-age=30"));
    assert_eq!(json(&body)["api_version"], "v1");

    let (status, _, body) = send_raw("GET", app.addr, "/v1/presale/terms", &[], "").await;
    assert_eq!(status, 200);
    assert_eq!(json(&body)["rate"].as_f64(), Some(200_000.0));
}

#[tokio::test]
async fn quotes_price_sol_and_usd_without_writing() {
    let app = spawn_app().await;
    let (status, _, body) = send_raw("GET", app.addr, "/v1/presale/quote?sol=2", &[], "").await;
    assert_eq!(status, 200);
    let quote = json(&body);
    assert_eq!(quote["currency"], "sol");
    assert_eq!(quote["sodm_amount"].as_f64(), Some(400_000.0));

    let (status, _, body) = send_raw("GET", app.addr, "/v1/presale/quote?usd=10", &[], "").await;
    assert_eq!(status, 200);
    let sodm = json(&body)["sodm_amount"].as_f64().expect("sodm");
    assert!((sodm - 200_000.0).abs() < 1e-6);

    let (status, _, body) =
        send_raw("GET", app.addr, "/v1/presale/quote?sol=1e304", &[], "").await;
    assert_eq!(status, 400);
    assert_eq!(json(&body)["error"]["message"], "Please enter a valid SOL amount");

    let (status, _, body) = send_raw("GET", app.addr, "/v1/presale/quote", &[], "").await;
    assert_eq!(status, 400);
    assert_eq!(json(&body)["error"]["code"], "invalid_query_parameter");
    assert!(app.state.review.live().snapshot().is_empty());
}

#[tokio::test]
async fn request_id_is_echoed_and_stamped_into_errors() {
    let app = spawn_app().await;
    let (status, head, body) = send_raw(
        "GET",
        app.addr,
        "/v1/entries",
        &[("x-request-id", "req-contract-1")],
        "",
    )
    .await;
    assert_eq!(status, 401);
    assert!(head.contains("x-request-id: req-contract-1"));
    let err = &json(&body)["error"];
    assert_eq!(err["code"], "unauthenticated");
    assert_eq!(err["request_id"], "req-contract-1");

    let (_, head, _) = send_raw("GET", app.addr, "/healthz", &[], "").await;
    assert!(head.contains("x-request-id: req-"));
}

#[tokio::test]
async fn sign_up_rejects_weak_password_and_duplicate_email() {
    let app = spawn_app().await;
    let (status, _, body) = send_raw(
        "POST",
        app.addr,
        "/v1/auth/sign-up",
        &[],
        r#"{"email":"weak@example.com","password":"123"}"#,
    )
    .await;
    assert_eq!(status, 400);
    assert_eq!(json(&body)["error"]["message"], "Password is too weak");

    sign_up(app.addr, "dup@example.com").await;
    let (status, _, body) = send_raw(
        "POST",
        app.addr,
        "/v1/auth/sign-up",
        &[],
        r#"{"email":"DUP@example.com","password":"hunter22"}"#,
    )
    .await;
    assert_eq!(status, 409);
    assert_eq!(json(&body)["error"]["code"], "email_already_in_use");

    let (status, _, body) = send_raw(
        "POST",
        app.addr,
        "/v1/auth/sign-in",
        &[],
        r#"{"email":"dup@example.com","password":"wrong-pass"}"#,
    )
    .await;
    assert_eq!(status, 401);
    assert_eq!(json(&body)["error"]["message"], "Invalid email or password");
}

#[tokio::test]
async fn sign_out_invalidates_the_token() {
    let app = spawn_app().await;
    let (token, user_id) = sign_up(app.addr, "leaver@example.com").await;
    let auth = bearer(&token);

    let (status, _, body) = send_raw("GET", app.addr, "/v1/me", &[("authorization", auth.as_str())], "").await;
    assert_eq!(status, 200);
    let me = json(&body);
    assert_eq!(me["user_id"], user_id.as_str());
    assert_eq!(me["account"]["is_admin"], false);

    let (status, _, _) =
        send_raw("POST", app.addr, "/v1/auth/sign-out", &[("authorization", auth.as_str())], "").await;
    assert_eq!(status, 204);
    let (status, _, _) = send_raw("GET", app.addr, "/v1/me", &[("authorization", auth.as_str())], "").await;
    assert_eq!(status, 401);
}

#[tokio::test]
async fn submission_validation_failures_write_nothing() {
    let app = spawn_app().await;
    let (token, _) = sign_up(app.addr, "member@example.com").await;
    let auth = bearer(&token);

    let bad_wallet = r#"{"payment_reference":"sig","solana_wallet":"short","sol_amount":"1"}"#;
    let (status, _, body) =
        send_raw("POST", app.addr, "/v1/entries", &[("authorization", auth.as_str())], bad_wallet).await;
    assert_eq!(status, 400);
    let err = &json(&body)["error"];
    assert_eq!(err["code"], "validation_failed");
    assert_eq!(err["message"], "Invalid Solana wallet address");
    assert_eq!(err["details"]["field"], "solana_wallet");

    let (status, _, body) = send_raw(
        "POST",
        app.addr,
        "/v1/entries",
        &[("authorization", auth.as_str())],
        &entry_body("-1"),
    )
    .await;
    assert_eq!(status, 400);
    assert_eq!(json(&body)["error"]["message"], "Please enter a valid SOL amount");

    let (status, _, body) =
        send_raw("POST", app.addr, "/v1/entries", &[("authorization", auth.as_str())], "{not json").await;
    assert_eq!(status, 400);
    assert_eq!(json(&body)["error"]["code"], "validation_failed");

    let (_, _, body) = send_raw("GET", app.addr, "/v1/entries", &[("authorization", auth.as_str())], "").await;
    assert_eq!(json(&body)["entries"].as_array().map(Vec::len), Some(0));
}

/// The server answers before the body is drained and may reset the socket, so
/// this reads whatever arrived instead of requiring a clean close.
async fn send_oversized(addr: std::net::SocketAddr, token: &str, body: &str) -> (u16, String) {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    let mut stream = tokio::net::TcpStream::connect(addr)
        .await
        .expect("connect server");
    let req = format!(
        "POST /v1/entries HTTP/1.1\r\nHost: {addr}\r\nConnection: close\r\nAuthorization: Bearer {token}\r\nContent-Type: application/json\r\nContent-Length: {}\r\n\r\n{body}",
        body.len()
    );
    let _ = stream.write_all(req.as_bytes()).await;
    let mut raw = Vec::new();
    let mut chunk = [0_u8; 4096];
    loop {
        match stream.read(&mut chunk).await {
            Ok(0) | Err(_) => break,
            Ok(n) => raw.extend_from_slice(&chunk[..n]),
        }
    }
    let text = String::from_utf8_lossy(&raw).to_string();
    let (head, body) = text.split_once("\r\n\r\n").expect("http response");
    let status = head
        .split_whitespace()
        .nth(1)
        .and_then(|s| s.parse::<u16>().ok())
        .expect("http status");
    (status, body.to_string())
}

#[tokio::test]
async fn oversized_bodies_are_refused() {
    let app = spawn_app().await;
    let (token, _) = sign_up(app.addr, "big@example.com").await;
    let huge = format!(
        r#"{{"payment_reference":"{}","solana_wallet":"x","sol_amount":"1"}}"#,
        "a".repeat(20_000)
    );
    let (status, body) = send_oversized(app.addr, &token, &huge).await;
    assert_eq!(status, 413);
    assert_eq!(json(&body)["error"]["code"], "payload_too_large");
}

#[tokio::test]
async fn admin_routes_require_the_stored_admin_flag() {
    let app = spawn_app().await;
    let (member_token, _) = sign_up(app.addr, "member@example.com").await;
    let (admin_token, admin_id) = sign_up(app.addr, "admin@example.com").await;

    let (status, _, _) = send_raw("GET", app.addr, "/v1/admin/entries", &[], "").await;
    assert_eq!(status, 401);
    let (status, _, body) = send_raw(
        "GET",
        app.addr,
        "/v1/admin/entries",
        &[("authorization", bearer(&member_token).as_str())],
        "",
    )
    .await;
    assert_eq!(status, 403);
    assert_eq!(json(&body)["error"]["code"], "forbidden");

    grant_admin(app.store.as_ref(), &admin_id);
    let admin = bearer(&admin_token);
    let (status, _, body) =
        send_raw("GET", app.addr, "/v1/admin/entries", &[("authorization", admin.as_str())], "").await;
    assert_eq!(status, 200);
    assert_eq!(json(&body)["filter"], "all");

    let (status, _, body) = send_raw(
        "GET",
        app.addr,
        "/v1/admin/entries?status=bogus",
        &[("authorization", admin.as_str())],
        "",
    )
    .await;
    assert_eq!(status, 400);
    assert_eq!(json(&body)["error"]["code"], "invalid_query_parameter");

    let (status, _, _) = send_raw(
        "POST",
        app.addr,
        "/v1/entries",
        &[("authorization", admin.as_str())],
        &entry_body("1"),
    )
    .await;
    assert_eq!(status, 403);
}

#[tokio::test]
async fn review_transitions_are_single_shot() {
    let app = spawn_app().await;
    let (member_token, _) = sign_up(app.addr, "member@example.com").await;
    let (admin_token, admin_id) = sign_up(app.addr, "admin@example.com").await;
    grant_admin(app.store.as_ref(), &admin_id);
    let member = bearer(&member_token);
    let admin = bearer(&admin_token);

    let mut ids = Vec::new();
    for amount in ["2", "0.5"] {
        let (status, _, body) = send_raw(
            "POST",
            app.addr,
            "/v1/entries",
            &[("authorization", member.as_str())],
            &entry_body(amount),
        )
        .await;
        assert_eq!(status, 201);
        ids.push(json(&body)["id"].as_str().expect("id").to_string());
    }

    let verify = format!("/v1/admin/entries/{}/verify", ids[0]);
    let (status, _, body) =
        send_raw("POST", app.addr, &verify, &[("authorization", admin.as_str())], "").await;
    assert_eq!(status, 200);
    assert_eq!(json(&body)["status"], "verified");

    let (status, _, body) =
        send_raw("POST", app.addr, &verify, &[("authorization", admin.as_str())], "").await;
    assert_eq!(status, 409);
    assert_eq!(json(&body)["error"]["code"], "entry_not_pending");

    let reject_first = format!("/v1/admin/entries/{}/reject", ids[0]);
    let (status, _, _) = send_raw(
        "POST",
        app.addr,
        &reject_first,
        &[("authorization", admin.as_str())],
        r#"{"reason":"too late"}"#,
    )
    .await;
    assert_eq!(status, 409);

    let reject = format!("/v1/admin/entries/{}/reject", ids[1]);
    let (status, _, body) =
        send_raw("POST", app.addr, &reject, &[("authorization", admin.as_str())], "").await;
    assert_eq!(status, 200);
    let rejected = json(&body);
    assert_eq!(rejected["status"], "rejected");
    assert_eq!(rejected["rejection_reason"], "Payment could not be verified");
    assert!(rejected["verified_at"].is_string());

    let (status, _, body) = send_raw(
        "POST",
        app.addr,
        "/v1/admin/entries/does-not-exist/verify",
        &[("authorization", admin.as_str())],
        "",
    )
    .await;
    assert_eq!(status, 404);
    assert_eq!(json(&body)["error"]["code"], "not_found");

    let (status, _, body) =
        send_raw("GET", app.addr, "/v1/admin/stats", &[("authorization", admin.as_str())], "").await;
    assert_eq!(status, 200);
    let stats = json(&body);
    assert_eq!(stats["total"], 2);
    assert_eq!(stats["verified"], 1);
    assert_eq!(stats["rejected"], 1);
    assert_eq!(stats["total_sol"].as_f64(), Some(2.0));
    assert_eq!(stats["total_sodm"].as_f64(), Some(400_000.0));
}

#[tokio::test]
async fn countdown_settings_roundtrip_through_the_board() {
    let app = spawn_app().await;
    let (status, _, body) = send_raw("GET", app.addr, "/v1/countdown", &[], "").await;
    assert_eq!(status, 200);
    let view = json(&body);
    assert_eq!(view["burn_amount"], "25,000,000 SODM");
    assert_eq!(view["countdown"]["state"], "remaining");
    assert_eq!(view["countdown"]["days"], 2);
    assert_eq!(view["countdown"]["hours"], 12);

    let (admin_token, admin_id) = sign_up(app.addr, "admin@example.com").await;
    grant_admin(app.store.as_ref(), &admin_id);
    let admin = bearer(&admin_token);

    let (status, _, body) = send_raw(
        "PUT",
        app.addr,
        "/v1/admin/settings/countdown",
        &[("authorization", admin.as_str())],
        r#"{"next_burn_date":""}"#,
    )
    .await;
    assert_eq!(status, 400);
    assert_eq!(json(&body)["error"]["message"], "Next burn date is required");

    let (status, _, body) = send_raw(
        "PUT",
        app.addr,
        "/v1/admin/settings/countdown",
        &[("authorization", admin.as_str())],
        r#"{"next_burn_date":"2026-02-20T00:00","burn_amount":"10,000,000 SODM","burn_interval":"30 days"}"#,
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(json(&body)["burn_interval"], "30 days");

    let (status, _, body) = send_raw(
        "GET",
        app.addr,
        "/v1/admin/settings/countdown",
        &[("authorization", admin.as_str())],
        "",
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(json(&body)["burn_amount"], "10,000,000 SODM");

    let mut view = serde_json::Value::Null;
    for _ in 0..50 {
        let (_, _, body) = send_raw("GET", app.addr, "/v1/countdown", &[], "").await;
        view = json(&body);
        if view["burn_amount"] == "10,000,000 SODM" {
            break;
        }
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    }
    assert_eq!(view["burn_amount"], "10,000,000 SODM");
    assert_eq!(view["countdown"]["state"], "burn_in_progress");
}

#[tokio::test]
async fn partnership_inquiries_flow_to_admins() {
    let app = spawn_app().await;
    let (status, _, body) = send_raw(
        "POST",
        app.addr,
        "/v1/partnership-inquiries",
        &[],
        r#"{"name":"Ada","email":"ada@example.com","telegram":"@ada","project_name":"Lovelace","description":"listing","package":"Professional"}"#,
    )
    .await;
    assert_eq!(status, 201, "{body}");
    assert_eq!(json(&body)["package"], "professional");

    let (status, _, body) = send_raw(
        "POST",
        app.addr,
        "/v1/partnership-inquiries",
        &[],
        r#"{"name":"Ada","email":"not-an-email","telegram":"@ada","project_name":"x","description":"y"}"#,
    )
    .await;
    assert_eq!(status, 400);
    assert_eq!(json(&body)["error"]["details"]["field"], "email");

    let (admin_token, admin_id) = sign_up(app.addr, "admin@example.com").await;
    grant_admin(app.store.as_ref(), &admin_id);
    let (status, _, body) = send_raw(
        "GET",
        app.addr,
        "/v1/admin/partnership-inquiries",
        &[("authorization", bearer(&admin_token).as_str())],
        "",
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(json(&body)["inquiries"].as_array().map(Vec::len), Some(1));
}
