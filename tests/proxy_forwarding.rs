//! End-to-end proxy behavior against real TCP upstreams.

mod common;

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::Ordering;
use std::time::Duration;

use api_gateway::config::AppConfig;
use api_gateway::{attach_hook, hook, rules_from_config, HookOutcome, HttpServer, ProxyRule, RouteTable};
use axum::http::StatusCode as AxumStatus;
use axum::response::IntoResponse;
use tokio::net::TcpListener;
use url::Url;

use common::{
    start_echo_upstream, start_flaky_upstream, start_mock_upstream, start_slow_upstream,
};

fn target(addr: SocketAddr) -> Url {
    Url::parse(&format!("http://{addr}")).unwrap()
}

async fn start_gateway_with(config: AppConfig, rules: Vec<ProxyRule>) -> SocketAddr {
    let server = HttpServer::new(config, RouteTable::empty(), rules);
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(server.run(listener));
    tokio::time::sleep(Duration::from_millis(50)).await;
    addr
}

async fn start_gateway(rules: Vec<ProxyRule>) -> SocketAddr {
    let mut config = AppConfig::default();
    config.proxy.enabled = true;
    config.docs.enabled = false;
    start_gateway_with(config, rules).await
}

#[tokio::test]
async fn forwards_to_matching_rule() {
    let (upstream, hits) = start_mock_upstream("hello from upstream").await;
    let gateway = start_gateway(vec![ProxyRule::new("/api/*", target(upstream))]).await;

    let response = reqwest::get(format!("http://{gateway}/api/users"))
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    assert_eq!(response.text().await.unwrap(), "hello from upstream");
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn returns_404_when_nothing_matches() {
    let (upstream, hits) = start_mock_upstream("unused").await;
    let gateway = start_gateway(vec![ProxyRule::new("/api/*", target(upstream))]).await;

    let response = reqwest::get(format!("http://{gateway}/other/path"))
        .await
        .unwrap();

    assert_eq!(response.status(), 404);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Not Found");
    assert_eq!(hits.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn disabled_rule_is_ignored() {
    let (upstream, hits) = start_mock_upstream("unused").await;
    let gateway =
        start_gateway(vec![ProxyRule::new("/api/*", target(upstream)).enabled(false)]).await;

    let response = reqwest::get(format!("http://{gateway}/api/users"))
        .await
        .unwrap();

    assert_eq!(response.status(), 404);
    assert_eq!(hits.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn most_specific_rule_wins_end_to_end() {
    let (general, general_hits) = start_mock_upstream("general").await;
    let (auth, auth_hits) = start_mock_upstream("auth").await;
    let gateway = start_gateway(vec![
        ProxyRule::new("/api/*", target(general)),
        ProxyRule::new("/api/auth", target(auth)),
    ])
    .await;

    let response = reqwest::get(format!("http://{gateway}/api/auth"))
        .await
        .unwrap();

    assert_eq!(response.text().await.unwrap(), "auth");
    assert_eq!(auth_hits.load(Ordering::SeqCst), 1);
    assert_eq!(general_hits.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn retries_until_success() {
    let (upstream, hits) = start_flaky_upstream(2).await;
    let gateway =
        start_gateway(vec![ProxyRule::new("/api/*", target(upstream)).retries(3)]).await;

    let response = reqwest::get(format!("http://{gateway}/api/data"))
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    assert_eq!(response.text().await.unwrap(), "recovered");
    assert_eq!(hits.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn exhausted_retries_return_502() {
    let (upstream, hits) = start_flaky_upstream(u32::MAX).await;
    let gateway =
        start_gateway(vec![ProxyRule::new("/api/*", target(upstream)).retries(2)]).await;

    let response = reqwest::get(format!("http://{gateway}/api/data"))
        .await
        .unwrap();

    assert_eq!(response.status(), 502);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Bad Gateway");
    assert_eq!(hits.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn timeout_counts_as_failure() {
    let (upstream, _hits) = start_slow_upstream(Duration::from_secs(2)).await;
    let gateway = start_gateway(vec![ProxyRule::new("/api/*", target(upstream))
        .timeout(Duration::from_millis(200))])
    .await;

    let response = reqwest::get(format!("http://{gateway}/api/slow"))
        .await
        .unwrap();

    assert_eq!(response.status(), 502);
}

#[tokio::test]
async fn hook_veto_skips_forward() {
    let (upstream, hits) = start_mock_upstream("unused").await;
    let rule = ProxyRule::new("/api/*", target(upstream))
        .with_hook(hook(|_ctx| async { HookOutcome::deny() }));
    let gateway = start_gateway(vec![rule]).await;

    let response = reqwest::get(format!("http://{gateway}/api/users"))
        .await
        .unwrap();

    assert_eq!(response.status(), 403);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Forbidden");
    assert_eq!(hits.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn hook_supplied_response_returned_verbatim() {
    let (upstream, hits) = start_mock_upstream("unused").await;
    let rule = ProxyRule::new("/api/*", target(upstream)).with_hook(hook(|_ctx| async {
        HookOutcome::reject((AxumStatus::UNAUTHORIZED, "nope").into_response())
    }));
    let gateway = start_gateway(vec![rule]).await;

    let response = reqwest::get(format!("http://{gateway}/api/users"))
        .await
        .unwrap();

    assert_eq!(response.status(), 401);
    assert_eq!(response.text().await.unwrap(), "nope");
    assert_eq!(hits.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn hook_headers_and_target_override() {
    let (original, original_hits) = start_mock_upstream("unused").await;
    let (echo, echo_hits) = start_echo_upstream().await;

    let redirect = target(echo);
    let rule = ProxyRule::new("/api/*", target(original)).with_hook(hook(move |_ctx| {
        let redirect = redirect.clone();
        async move {
            let mut headers = HashMap::new();
            headers.insert("x-user-id".to_string(), "42".to_string());
            HookOutcome::Proceed {
                headers,
                target: Some(redirect),
            }
        }
    }));
    let gateway = start_gateway(vec![rule]).await;

    let response = reqwest::get(format!("http://{gateway}/api/users"))
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    let echoed = response.text().await.unwrap();
    assert!(echoed.contains("GET /api/users"));
    assert!(echoed.contains("x-user-id: 42"));
    assert_eq!(echo_hits.load(Ordering::SeqCst), 1);
    assert_eq!(original_hits.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn wildcard_params_reach_hook() {
    let (echo, _hits) = start_echo_upstream().await;

    let rule = ProxyRule::new("/users/*/profile", target(echo)).with_hook(hook(|ctx| async move {
        let mut headers = HashMap::new();
        if let Some(id) = ctx.params.get("param0") {
            headers.insert("x-user-id".to_string(), id.clone());
        }
        HookOutcome::proceed_with_headers(headers)
    }));
    let gateway = start_gateway(vec![rule]).await;

    let response = reqwest::get(format!("http://{gateway}/users/123/profile"))
        .await
        .unwrap();

    let echoed = response.text().await.unwrap();
    assert!(echoed.contains("x-user-id: 123"));
}

#[tokio::test]
async fn config_rules_accept_hooks_by_pattern() {
    let (echo, _hits) = start_echo_upstream().await;

    let config: AppConfig = toml::from_str(&format!(
        r#"
        [proxy]
        enabled = true

        [[proxy.rules]]
        pattern = "/api/*"
        target = "http://{echo}"
        "#
    ))
    .unwrap();

    let mut rules = rules_from_config(&config.proxy.rules).unwrap();
    let attached = attach_hook(
        &mut rules,
        "/api/*",
        hook(|_ctx| async {
            let mut headers = HashMap::new();
            headers.insert("x-attached".to_string(), "yes".to_string());
            HookOutcome::proceed_with_headers(headers)
        }),
    );
    assert!(attached);
    assert!(!attach_hook(
        &mut rules,
        "/missing/*",
        hook(|_ctx| async { HookOutcome::proceed() }),
    ));

    let gateway = start_gateway_with(config, rules).await;

    let response = reqwest::get(format!("http://{gateway}/api/users"))
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    let echoed = response.text().await.unwrap();
    assert!(echoed.contains("x-attached: yes"));
}

#[tokio::test]
async fn rule_headers_are_forwarded() {
    let (echo, _hits) = start_echo_upstream().await;
    let rule = ProxyRule::new("/api/*", target(echo)).header("x-forwarded-by", "gateway");
    let gateway = start_gateway(vec![rule]).await;

    let response = reqwest::get(format!("http://{gateway}/api/ping"))
        .await
        .unwrap();

    let echoed = response.text().await.unwrap();
    assert!(echoed.contains("x-forwarded-by: gateway"));
}

#[tokio::test]
async fn query_string_is_preserved() {
    let (echo, _hits) = start_echo_upstream().await;
    let gateway = start_gateway(vec![ProxyRule::new("/search/*", target(echo))]).await;

    let response = reqwest::get(format!("http://{gateway}/search/items?q=rust&page=2"))
        .await
        .unwrap();

    let echoed = response.text().await.unwrap();
    assert!(echoed.contains("GET /search/items?q=rust&page=2"));
}
