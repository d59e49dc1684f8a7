//! End-to-end tests for the Commander against a mock gateway and the
//! in-memory store.
//!
//! ```bash
//! cargo test -p paydesk-bot --test commander_flow
//! ```

use paydesk_bot::{AuthStore, BotConfig, BotError, Commander, MemoryAuthStore, Talker, TalkerKind};
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const CHAT: i64 = 100;
const USER: i64 = 7;

fn config_for(server: &MockServer) -> BotConfig {
    // One mock server plays both protocol versions; the paths differ.
    BotConfig::new(server.uri(), server.uri())
}

fn order_body(order_id: &str, status: &str) -> serde_json::Value {
    serde_json::json!({ "order_id": order_id, "status": status })
}

// ============================================================================
// Order resolution
// ============================================================================

#[tokio::test]
async fn gateway_id_hit_never_touches_the_client_id_namespace() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/orders/ORD-1"))
        .and(query_param("merchant_family", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(order_body("ORD-1", "pending")))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/orders/by-client-id/ORD-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(order_body("ORD-1", "pending")))
        .expect(0)
        .mount(&server)
        .await;

    let store = MemoryAuthStore::new();
    let commander = Commander::bind(&store, &config_for(&server), CHAT)
        .await
        .unwrap();

    let order = commander.order("ORD-1").await.unwrap();
    assert_eq!(order.order_id, "ORD-1");
}

#[tokio::test]
async fn not_found_falls_back_to_exactly_one_client_id_lookup() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/orders/abc123"))
        .respond_with(ResponseTemplate::new(404).set_body_string("no such order"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/orders/by-client-id/abc123"))
        .and(query_param("merchant_family", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(order_body("abc123", "completed")))
        .expect(1)
        .mount(&server)
        .await;

    let store = MemoryAuthStore::new();
    let commander = Commander::bind(&store, &config_for(&server), CHAT)
        .await
        .unwrap();

    let order = commander.order("abc123").await.unwrap();
    assert_eq!(order.order_id, "abc123");
    assert_eq!(order.status, "completed");
}

#[tokio::test]
async fn not_found_in_both_namespaces_propagates_without_further_fallback() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/orders/ghost"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/orders/by-client-id/ghost"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let store = MemoryAuthStore::new();
    let commander = Commander::bind(&store, &config_for(&server), CHAT)
        .await
        .unwrap();

    let err = commander.order("ghost").await.unwrap_err();
    match err {
        BotError::Gateway(g) => assert!(g.is_not_found()),
        other => panic!("expected gateway not-found, got {other}"),
    }
}

#[tokio::test]
async fn non_not_found_failures_skip_the_fallback() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/orders/ORD-1"))
        .respond_with(ResponseTemplate::new(500).set_body_string("gateway exploded"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/orders/by-client-id/ORD-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(order_body("ORD-1", "pending")))
        .expect(0)
        .mount(&server)
        .await;

    let store = MemoryAuthStore::new();
    let commander = Commander::bind(&store, &config_for(&server), CHAT)
        .await
        .unwrap();

    let err = commander.order("ORD-1").await.unwrap_err();
    match err {
        BotError::Gateway(g) => assert!(!g.is_not_found()),
        other => panic!("expected gateway failure, got {other}"),
    }
}

// ============================================================================
// Credential binding
// ============================================================================

#[tokio::test]
async fn bind_uses_the_chat_credentials_on_gateway_calls() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/orders/ORD-1"))
        .and(header("X-ACCESS-KEY", "chat-key"))
        .and(header("X-ACCESS-PASSPHRASE", "chat-phrase"))
        .respond_with(ResponseTemplate::new(200).set_body_json(order_body("ORD-1", "pending")))
        .expect(1)
        .mount(&server)
        .await;

    let store = MemoryAuthStore::new();
    store.add_auth_request(USER, CHAT).await.unwrap();
    let commander = Commander::bind(&store, &config_for(&server), CHAT)
        .await
        .unwrap();
    for answer in ["chat-key", "chat-phrase", "chat-secret"] {
        commander
            .auth_talker(USER)
            .accept_answer(answer)
            .await
            .unwrap();
    }

    // The first commander bound before the chat authorized; a fresh one
    // picks the credentials up.
    let commander = Commander::bind(&store, &config_for(&server), CHAT)
        .await
        .unwrap();
    commander.order("ORD-1").await.unwrap();
    commander.close();
}

#[tokio::test]
async fn bind_without_credentials_is_not_an_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/orders/ORD-1"))
        .and(header("X-ACCESS-KEY", ""))
        .respond_with(ResponseTemplate::new(401).set_body_string("unauthenticated"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/orders/by-client-id/ORD-1"))
        .respond_with(ResponseTemplate::new(401).set_body_string("unauthenticated"))
        .mount(&server)
        .await;

    let store = MemoryAuthStore::new();
    let commander = Commander::bind(&store, &config_for(&server), CHAT)
        .await
        .unwrap();

    // Degraded mode: the session exists, the gateway rejects its calls.
    let err = commander.order("ORD-1").await.unwrap_err();
    assert!(matches!(
        err,
        BotError::Gateway(paydesk_gateway::GatewayError::Auth(_))
    ));
}

// ============================================================================
// Lookups and deposit return
// ============================================================================

#[tokio::test]
async fn address_and_transaction_lookups_pass_through() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/orders/by-address/bc1qdeposit"))
        .and(query_param("merchant_family", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "order_ids": ["ORD-2", "ORD-1"]
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/orders/by-tx/deadbeef"))
        .and(query_param("merchant_family", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "order_ids": []
        })))
        .mount(&server)
        .await;

    let store = MemoryAuthStore::new();
    let commander = Commander::bind(&store, &config_for(&server), CHAT)
        .await
        .unwrap();

    assert_eq!(
        commander.address("bc1qdeposit").await.unwrap(),
        vec!["ORD-2", "ORD-1"]
    );
    assert!(commander.transaction("deadbeef").await.unwrap().is_empty());
}

#[tokio::test]
async fn return_deposit_sends_the_fixed_tag_and_unit_count() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/return-deposits"))
        .and(body_json(serde_json::json!({
            "order_id": "O1",
            "deposit_id": "D1",
            "return_address": "bc1qxyz",
            "currency": "BTC",
            "tag": "",
            "amount_units": "1"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "return_id": "RET-1",
            "order_id": "O1",
            "deposit_id": "D1",
            "return_address": "bc1qxyz",
            "currency": "BTC",
            "status": "created"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let store = MemoryAuthStore::new();
    let commander = Commander::bind(&store, &config_for(&server), CHAT)
        .await
        .unwrap();

    let rd = commander
        .return_deposit("O1", "D1", "bc1qxyz", "BTC")
        .await
        .unwrap();
    assert_eq!(rd.return_id, "RET-1");
}

// ============================================================================
// Authorization lifecycle and talker dispatch
// ============================================================================

#[tokio::test]
async fn auth_start_makes_the_auth_talker_fire() {
    let server = MockServer::start().await;
    let store = MemoryAuthStore::new();
    let commander = Commander::bind(&store, &config_for(&server), CHAT)
        .await
        .unwrap();

    assert!(commander.talker(USER).await.unwrap().is_none());

    commander.auth_start(USER, CHAT).await.unwrap();

    let talker = commander.talker(USER).await.unwrap().unwrap();
    assert_eq!(talker.kind(), TalkerKind::Auth);
    assert!(talker.next_question().await.unwrap().is_some());
}

#[tokio::test]
async fn auth_cancel_then_mykey_reports_no_key() {
    let server = MockServer::start().await;
    let store = MemoryAuthStore::new();
    let commander = Commander::bind(&store, &config_for(&server), CHAT)
        .await
        .unwrap();

    commander.auth_start(USER, CHAT).await.unwrap();
    commander
        .auth_talker(USER)
        .accept_answer("key-123")
        .await
        .unwrap();
    assert_eq!(
        commander.auth_mykey(USER).await.unwrap().as_deref(),
        Some("key-123")
    );

    commander.auth_cancel(USER).await.unwrap();
    assert_eq!(commander.auth_mykey(USER).await.unwrap(), None);
}

#[tokio::test]
async fn dispatch_returns_the_first_configured_variant_with_work() {
    let server = MockServer::start().await;
    let store = MemoryAuthStore::new();

    // Both flows pending: auth request open and a return draft started.
    let commander = Commander::bind(&store, &config_for(&server), CHAT)
        .await
        .unwrap();
    commander.auth_start(USER, CHAT).await.unwrap();
    commander.return_deposit_start(USER).await.unwrap();

    // Default priority puts auth first.
    let talker = commander.talker(USER).await.unwrap().unwrap();
    assert_eq!(talker.kind(), TalkerKind::Auth);

    // Reversed priority flips the winner without touching the store.
    let reversed = config_for(&server)
        .with_talkers(vec![TalkerKind::ReturnDeposit, TalkerKind::Auth]);
    let commander = Commander::bind(&store, &reversed, CHAT).await.unwrap();
    let talker = commander.talker(USER).await.unwrap().unwrap();
    assert_eq!(talker.kind(), TalkerKind::ReturnDeposit);
}

#[tokio::test]
async fn dispatch_is_none_once_every_flow_completes() {
    let server = MockServer::start().await;
    let store = MemoryAuthStore::new();
    let commander = Commander::bind(&store, &config_for(&server), CHAT)
        .await
        .unwrap();

    commander.auth_start(USER, CHAT).await.unwrap();
    for answer in ["k", "p", "s"] {
        let talker = commander.talker(USER).await.unwrap().unwrap();
        talker.accept_answer(answer).await.unwrap();
    }

    assert!(commander.talker(USER).await.unwrap().is_none());
}

#[tokio::test]
async fn get_talker_bypasses_the_pending_filter() {
    let server = MockServer::start().await;
    let store = MemoryAuthStore::new();
    let commander = Commander::bind(&store, &config_for(&server), CHAT)
        .await
        .unwrap();

    // Nothing pending, but direct construction still works.
    let talker = commander.get_talker(TalkerKind::ReturnDeposit, USER);
    assert_eq!(talker.kind(), TalkerKind::ReturnDeposit);
    assert!(talker.next_question().await.unwrap().is_none());
}

#[tokio::test]
async fn collected_draft_feeds_the_deposit_return() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/return-deposits"))
        .and(body_json(serde_json::json!({
            "order_id": "ORD-1001",
            "deposit_id": "DEP-1",
            "return_address": "bc1qrefund",
            "currency": "BTC",
            "tag": "",
            "amount_units": "1"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "return_id": "RET-9",
            "order_id": "ORD-1001",
            "deposit_id": "DEP-1",
            "return_address": "bc1qrefund",
            "currency": "BTC",
            "status": "created"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let store = MemoryAuthStore::new();
    let commander = Commander::bind(&store, &config_for(&server), CHAT)
        .await
        .unwrap();

    commander.return_deposit_start(USER).await.unwrap();
    for answer in ["ORD-1001", "DEP-1", "bc1qrefund", "BTC"] {
        let talker = commander.talker(USER).await.unwrap().unwrap();
        assert_eq!(talker.kind(), TalkerKind::ReturnDeposit);
        talker.accept_answer(answer).await.unwrap();
    }

    let paydesk_bot::ActiveTalker::ReturnDeposit(talker) =
        commander.get_talker(TalkerKind::ReturnDeposit, USER)
    else {
        panic!("expected the return-deposit variant");
    };
    let draft = talker.finish().await.unwrap();

    let rd = commander
        .return_deposit(
            draft.order_id.as_deref().unwrap(),
            draft.deposit_id.as_deref().unwrap(),
            draft.return_address.as_deref().unwrap(),
            draft.currency.as_deref().unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(rd.return_id, "RET-9");
}
