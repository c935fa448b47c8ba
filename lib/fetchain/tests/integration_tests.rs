//! End-to-end tests for `Api` + `HyperTransport` using wiremock.

use std::time::Duration;

use assert2::{check, let_assert};
use fetchain::middleware::{GET, HEAD, POST, abortable, bearer_auth, header, json, query};
use fetchain::{
    AbortController, Error, Query, Redirect, TransportConfig, TransportError, chain, from_fn,
};
use serde::{Deserialize, Serialize};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_json, header as has_header, method, path},
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct User {
    id: u64,
    name: String,
}

#[tokio::test]
async fn get_decodes_json() {
    let mock_server = MockServer::start().await;
    let user = User {
        id: 1,
        name: "Alice".to_string(),
    };

    Mock::given(method("GET"))
        .and(path("/users/1"))
        .and(has_header("Accept", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&user))
        .mount(&mock_server)
        .await;

    let api = fetchain::api(mock_server.uri());
    let response = api
        .at("/users/1", chain![GET, header("Accept", "application/json")])
        .await
        .expect("response");

    check!(response.status() == 200);
    check!(response.status_text() == "OK");
    let body: User = response.json().expect("json");
    check!(body == user);

    let_assert!(Some(request) = response.request());
    check!(request.url().path() == "/users/1");
}

#[tokio::test]
async fn post_json_with_ordered_query() {
    let mock_server = MockServer::start().await;
    let greeting = serde_json::json!({ "hello": "world" });

    Mock::given(method("POST"))
        .and(path("/greetings"))
        .and(has_header("Content-Type", "application/json"))
        .and(body_json(&greeting))
        .respond_with(ResponseTemplate::new(201).set_body_string("created"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let api = fetchain::api(format!("{}/", mock_server.uri()));
    let params = Query::new()
        .param("hello", ["Bing", "Dwen", "Dwen"])
        .param("world", "2022");
    let response = api
        .at(
            "greetings?hello=stale",
            chain![POST, json(greeting.clone()), query(params)],
        )
        .await
        .expect("response");

    check!(response.status() == 201);
    check!(response.text().expect("utf8") == "created");

    let received = mock_server.received_requests().await.expect("recording");
    let_assert!([request] = received.as_slice());
    check!(request.url.query() == Some("hello=Bing&hello=Dwen&hello=Dwen&world=2022"));
}

#[tokio::test]
async fn error_statuses_are_responses() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_string("nope"))
        .mount(&mock_server)
        .await;

    let api = fetchain::api(mock_server.uri());
    let response = api.at("/missing", Vec::new()).await.expect("response");

    check!(response.status() == 404);
    check!(response.status_text() == "Not Found");
    check!(response.is_client_error());
    check!(response.text().expect("utf8") == "nope");
}

#[tokio::test]
async fn abort_fails_the_call() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
        .mount(&mock_server)
        .await;

    let controller = AbortController::new();
    let timer = controller.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(100)).await;
        timer.abort();
    });

    let api = fetchain::api(mock_server.uri());
    let err = api
        .at("/slow", chain![POST, abortable(&controller)])
        .await
        .expect_err("aborted");

    check!(err.is_transport());
    let_assert!(Some(cause) = TransportError::of(&err));
    check!(cause.is_aborted());
}

#[tokio::test]
async fn pre_aborted_signal_never_reaches_the_server() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let controller = AbortController::new();
    controller.abort();

    let api = fetchain::api(mock_server.uri());
    let err = api
        .call(chain![abortable(&controller)])
        .await
        .expect_err("aborted");

    let_assert!(Some(cause) = TransportError::of(&err));
    check!(cause.is_aborted());
}

#[tokio::test]
async fn timeout_is_reported() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
        .mount(&mock_server)
        .await;

    let config = TransportConfig::builder()
        .timeout(Duration::from_millis(100))
        .build();
    let api = fetchain::api_with_config(mock_server.uri(), config);
    let err = api.call(Vec::new()).await.expect_err("timeout");

    let_assert!(Some(cause) = TransportError::of(&err));
    check!(cause.is_timeout());
}

#[tokio::test]
async fn connection_failure_is_reported() {
    let api = fetchain::api("http://127.0.0.1:1");
    let err = api.call(Vec::new()).await.expect_err("refused");

    let_assert!(Some(cause) = TransportError::of(&err));
    check!(cause.is_connection());
}

#[tokio::test]
async fn invalid_address_is_reported_before_the_network() {
    let api = fetchain::api("not a url");
    let err = api.at("/x", Vec::new()).await.expect_err("invalid");

    check!(err.is_invalid_address());
}

fn redirect_policy(policy: Redirect) -> fetchain::Link {
    fetchain::Link::single(from_fn(move |ctx, next| {
        ctx.set_redirect(policy);
        next.run(ctx)
    }))
}

async fn redirecting_server() -> MockServer {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/old"))
        .respond_with(ResponseTemplate::new(303).insert_header("Location", "/new"))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/new"))
        .respond_with(ResponseTemplate::new(200).set_body_string("moved"))
        .mount(&mock_server)
        .await;

    mock_server
}

#[tokio::test]
async fn redirects_follow_by_default() {
    let mock_server = redirecting_server().await;
    let api = fetchain::api(mock_server.uri());

    let response = api
        .at("/old", chain![POST, json("payload")])
        .await
        .expect("response");

    check!(response.status() == 200);
    check!(response.text().expect("utf8") == "moved");
}

#[tokio::test]
async fn redirect_policy_manual_and_error() {
    let mock_server = redirecting_server().await;
    let api = fetchain::api(mock_server.uri());

    let response = api
        .at("/old", chain![POST, redirect_policy(Redirect::Manual)])
        .await
        .expect("response");
    check!(response.status() == 303);
    check!(response.header("location") == Some("/new"));

    let err = api
        .at("/old", chain![POST, redirect_policy(Redirect::Error)])
        .await
        .expect_err("refused");
    let_assert!(Some(TransportError::Redirect(_)) = TransportError::of(&err));
}

#[tokio::test]
async fn credentials_stay_with_the_original_origin() {
    let origin = MockServer::start().await;
    let elsewhere = MockServer::start().await;

    Mock::given(path("/start"))
        .respond_with(
            ResponseTemplate::new(302)
                .insert_header("Location", format!("{}/landing", elsewhere.uri()).as_str()),
        )
        .mount(&origin)
        .await;
    Mock::given(path("/landing"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&elsewhere)
        .await;

    let api = fetchain::api(origin.uri());
    let response = api
        .at("/start", chain![bearer_auth("secret-token"), header("x-trace", "7")])
        .await
        .expect("response");
    check!(response.status() == 200);

    let received = elsewhere.received_requests().await.expect("recording");
    let_assert!([request] = received.as_slice());
    check!(request.headers.get("authorization").is_none());
    check!(request.headers.get("x-trace").is_some());
}

#[tokio::test]
async fn head_keeps_its_method_across_redirects() {
    let mock_server = MockServer::start().await;

    Mock::given(path("/a"))
        .respond_with(ResponseTemplate::new(301).insert_header("Location", "/b"))
        .mount(&mock_server)
        .await;
    Mock::given(method("HEAD"))
        .and(path("/b"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    let api = fetchain::api(mock_server.uri());
    let response = api.at("/a", chain![HEAD]).await.expect("response");
    check!(response.status() == 200);

    let received = mock_server.received_requests().await.expect("recording");
    let methods: Vec<String> = received.iter().map(|r| r.method.to_string()).collect();
    check!(methods == ["HEAD", "HEAD"]);
}

#[tokio::test]
async fn middleware_can_reject_a_response() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    let ensure_success = from_fn(|ctx, next| {
        Box::pin(async move {
            let response = next.run(ctx).await?;
            if response.is_server_error() {
                return Err(Error::middleware(format!(
                    "server answered {}",
                    response.status()
                )));
            }
            Ok(response)
        })
    });

    let api = fetchain::api(mock_server.uri());
    let err = api.call(chain![ensure_success]).await.expect_err("rejected");

    let_assert!(Error::Middleware(message) = err);
    check!(message == "server answered 503");
}

#[tokio::test]
async fn concurrent_calls_keep_their_own_headers() {
    let mock_server = MockServer::start().await;

    for tenant in ["a", "b"] {
        Mock::given(method("GET"))
            .and(path(format!("/{tenant}")))
            .and(has_header("x-tenant", tenant))
            .respond_with(ResponseTemplate::new(200).set_body_string(tenant))
            .expect(1)
            .mount(&mock_server)
            .await;
    }

    let api = fetchain::api(mock_server.uri());
    let (a, b) = tokio::join!(
        api.at("a", chain![header("x-tenant", "a")]),
        api.at("b", chain![header("x-tenant", "b")]),
    );

    check!(a.expect("a").text().expect("utf8") == "a");
    check!(b.expect("b").text().expect("utf8") == "b");
}
