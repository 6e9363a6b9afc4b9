//! End-to-end tests for `Client` over the hyper transport, using wiremock.

use std::collections::HashMap;
use std::time::Duration;

use assert2::{check, let_assert};
use izzi::{Body, Client, DecodeCause, Error, Method, RequestOptions};
use serde::{Deserialize, Serialize};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_bytes, body_json, header, method, path},
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct User {
    id: u64,
    user_name: String,
    display_name: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct NewUser {
    user_name: String,
}

fn alice() -> serde_json::Value {
    serde_json::json!({ "id": 1, "user_name": "alice", "display_name": "Alice" })
}

#[tokio::test]
async fn get_decodes_snake_case_payload() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/users/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(alice()))
        .mount(&mock_server)
        .await;

    let client = Client::new();
    let user: User = client
        .get(&format!("{}/users/1", mock_server.uri()))
        .await
        .expect("user");

    check!(user.id == 1);
    check!(user.user_name == "alice");
    check!(user.display_name.as_deref() == Some("Alice"));
}

#[tokio::test]
async fn post_sends_snake_case_json() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/users"))
        .and(header("content-type", "application/json"))
        .and(body_json(serde_json::json!({ "user_name": "bob" })))
        .respond_with(
            ResponseTemplate::new(201)
                .set_body_json(serde_json::json!({ "id": 42, "user_name": "bob" })),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = Client::new();
    let body = Body::Structured(NewUser {
        user_name: "bob".to_string(),
    });
    let user: User = client
        .post(&format!("{}/users", mock_server.uri()), body)
        .await
        .expect("user");

    check!(user.id == 42);
    check!(user.display_name.is_none());
}

#[tokio::test]
async fn put_without_naming_conversion_sends_keys_unchanged() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/users/1"))
        .and(body_json(serde_json::json!({ "userName": "carol" })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "id": 1, "userName": "carol" })),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = Client::new();
    let user: User = client
        .request(
            &format!("{}/users/1", mock_server.uri()),
            Method::Put,
            None,
            Some(Body::Structured(NewUser {
                user_name: "carol".to_string(),
            })),
            RequestOptions::new().with_convert_naming(false),
        )
        .await
        .expect("user");

    check!(user.user_name == "carol");
}

#[tokio::test]
async fn binary_body_is_sent_as_octet_stream() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/upload"))
        .and(header("content-type", "application/octet-stream"))
        .and(body_bytes(vec![0xde, 0xad, 0xbe, 0xef]))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = Client::new();
    let body: Body<()> = Body::binary(vec![0xde, 0xad, 0xbe, 0xef]);
    let () = client
        .post(&format!("{}/upload", mock_server.uri()), body)
        .await
        .expect("empty response");
}

#[tokio::test]
async fn caller_headers_are_sent() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/me"))
        .and(header("authorization", "Bearer token"))
        .and(header("accept", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(alice()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let headers = HashMap::from([
        ("Authorization".to_string(), "Bearer token".to_string()),
        ("Accept".to_string(), "application/json".to_string()),
    ]);

    let client = Client::new();
    let user: User = client
        .request_without_body(
            &format!("{}/me", mock_server.uri()),
            Method::Get,
            Some(headers),
            RequestOptions::new(),
        )
        .await
        .expect("user");

    check!(user.user_name == "alice");
}

#[tokio::test]
async fn body_content_type_overrides_caller_header() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PATCH"))
        .and(path("/users/1"))
        .and(header("content-type", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(alice()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let headers = HashMap::from([("content-type".to_string(), "text/plain".to_string())]);

    let client = Client::new();
    let user: User = client
        .request(
            &format!("{}/users/1", mock_server.uri()),
            Method::Patch,
            Some(headers),
            Some(Body::Structured(NewUser {
                user_name: "alice".to_string(),
            })),
            RequestOptions::new(),
        )
        .await
        .expect("user");

    check!(user.id == 1);
}

#[tokio::test]
async fn not_found_carries_status_and_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/users/999"))
        .respond_with(ResponseTemplate::new(404).set_body_string("user not found"))
        .mount(&mock_server)
        .await;

    let client = Client::new();
    let err = client
        .get::<User>(&format!("{}/users/999", mock_server.uri()))
        .await
        .expect_err("404");

    check!(err.status_code() == Some(404));
    check!(err.is_client_error());
    check!(err.body_text() == Some("user not found"));
    insta::assert_snapshot!(err.to_string(), @"HTTP error 404: user not found");
}

#[tokio::test]
async fn server_error_body_can_be_decoded() {
    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct ApiError {
        error_code: String,
    }

    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/users/1"))
        .respond_with(
            ResponseTemplate::new(503)
                .set_body_json(serde_json::json!({ "error_code": "maintenance" })),
        )
        .mount(&mock_server)
        .await;

    let client = Client::new();
    let err = client
        .delete::<()>(&format!("{}/users/1", mock_server.uri()))
        .await
        .expect_err("503");

    check!(err.is_server_error());
    let_assert!(Some(Ok(api_error)) = err.decode_body::<ApiError>(true));
    check!(api_error.error_code == "maintenance");
}

#[tokio::test]
async fn cached_get_hits_the_network_once() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/users/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(alice()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = Client::new();
    let url = format!("{}/users/1", mock_server.uri());

    let first: User = client
        .get_cached(&url, Duration::from_secs(60))
        .await
        .expect("first");
    let second: User = client
        .get_cached(&url, Duration::from_secs(60))
        .await
        .expect("second");

    check!(first == second);
    check!(client.cache().lookup(&url).is_some());
}

#[tokio::test]
async fn uncached_get_always_hits_the_network() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/users/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(alice()))
        .expect(2)
        .mount(&mock_server)
        .await;

    let client = Client::new();
    let url = format!("{}/users/1", mock_server.uri());

    let _: User = client.get(&url).await.expect("first");
    let _: User = client.get(&url).await.expect("second");
}

#[tokio::test]
async fn post_is_never_cached() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(alice()))
        .expect(2)
        .mount(&mock_server)
        .await;

    let client = Client::new();
    let url = format!("{}/users", mock_server.uri());
    let options = RequestOptions::cached(Duration::from_secs(60));

    for _ in 0..2 {
        let _: User = client
            .request(
                &url,
                Method::Post,
                None,
                Some(Body::Structured(NewUser {
                    user_name: "alice".to_string(),
                })),
                options,
            )
            .await
            .expect("user");
    }

    check!(client.cache().lookup(&url).is_none());
}

#[tokio::test]
async fn error_responses_are_not_cached() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/flaky"))
        .respond_with(ResponseTemplate::new(500))
        .expect(2)
        .mount(&mock_server)
        .await;

    let client = Client::new();
    let url = format!("{}/flaky", mock_server.uri());

    for _ in 0..2 {
        let err = client
            .get_cached::<User>(&url, Duration::from_secs(60))
            .await
            .expect_err("500");
        check!(err.status_code() == Some(500));
        check!(err.body_text().is_none());
    }
}

#[tokio::test]
async fn slow_server_times_out() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(alice())
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&mock_server)
        .await;

    let client = Client::new();
    let err = client
        .request_without_body::<User>(
            &format!("{}/slow", mock_server.uri()),
            Method::Get,
            None,
            RequestOptions::new().with_timeout(Duration::from_millis(100)),
        )
        .await
        .expect_err("timeout");

    check!(err.is_timeout());
    insta::assert_snapshot!(err.to_string(), @"request timed out after 100ms");
}

#[tokio::test]
async fn invalid_url_is_rejected() {
    let client = Client::new();
    let err = client.get::<User>("://missing-scheme").await.expect_err("url");

    let_assert!(Error::InvalidUrl { url, .. } = err);
    check!(url == "://missing-scheme");
}

#[tokio::test]
async fn unreachable_host_is_a_transport_failure() {
    // nothing listens on the discard port
    let client = Client::builder()
        .connect_timeout(Duration::from_secs(2))
        .build();
    let err = client
        .get::<User>("http://127.0.0.1:9/users")
        .await
        .expect_err("connection refused");

    check!(err.is_transport());
}

#[tokio::test]
async fn empty_body_is_no_data() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/empty"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&mock_server)
        .await;

    let client = Client::new();
    let err = client
        .get::<User>(&format!("{}/empty", mock_server.uri()))
        .await
        .expect_err("no data");

    let_assert!(Error::NoData = err);
}

#[tokio::test]
async fn shape_mismatch_reports_the_missing_field() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/users/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "id": 1 })))
        .mount(&mock_server)
        .await;

    let client = Client::new();
    let err = client
        .get::<User>(&format!("{}/users/1", mock_server.uri()))
        .await
        .expect_err("decode");

    let_assert!(Some(DecodeCause::MissingField { field, .. }) = err.decode_cause());
    check!(field == "userName");
}
