//! # SupportBot CLI FAQ Integration Tests
//!
//! File: cli/tests/faq.rs
//!
//! Covers `supportbot faq list|show|categories|vote`, including a vote
//! against a mocked PostgREST-style vote table.
//!
mod common;
use common::*;
use predicates::prelude::*;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[test]
fn test_faq_list_paginates_with_configured_page_size() {
    let fixture = Fixture::new();
    fixture
        .cmd()
        .args(["faq", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("faq-001"))
        .stdout(predicate::str::contains("faq-002"))
        .stdout(predicate::str::contains("faq-003").not())
        .stdout(predicate::str::contains("Page 1 of 2 (3 items)."));

    fixture
        .cmd()
        .args(["faq", "list", "--page", "9"])
        .assert()
        .success()
        .stdout(predicate::str::contains("faq-003"))
        .stdout(predicate::str::contains("Page 2 of 2 (3 items)."));
}

#[test]
fn test_faq_list_search_and_category() {
    let fixture = Fixture::new();
    fixture
        .cmd()
        .args(["faq", "list", "--search", "취소"])
        .assert()
        .success()
        .stdout(predicate::str::contains("faq-001"))
        .stdout(predicate::str::contains("Page 1 of 1 (1 item)."));

    fixture
        .cmd()
        .args(["faq", "list", "--category", "포인트", "--page-size", "5"])
        .assert()
        .success()
        .stdout(predicate::str::contains("faq-002"))
        .stdout(predicate::str::contains("faq-001").not());

    fixture
        .cmd()
        .args(["faq", "list", "--search", "환불"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No FAQ items found."));
}

#[test]
fn test_faq_show_renders_content_blocks() {
    let fixture = Fixture::new();
    fixture
        .cmd()
        .args(["faq", "show", "faq-001"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "[세금계산서] 세금계산서를 취소하려면 어떻게 하나요?",
        ))
        .stdout(predicate::str::contains("• 계약 해제\n• 공급가액 변동"))
        .stdout(predicate::str::contains("※ 전송 후에는 삭제할 수 없습니다."));
}

#[test]
fn test_faq_show_unknown_id() {
    let fixture = Fixture::new();
    fixture
        .cmd()
        .args(["faq", "show", "faq-404"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("FAQ item 'faq-404' not found."));
}

#[test]
fn test_faq_categories() {
    let fixture = Fixture::new();
    fixture
        .cmd()
        .args(["faq", "categories"])
        .assert()
        .success()
        .stdout(predicate::str::contains("세금계산서 (2)\n포인트 (1)"));
}

#[test]
fn test_faq_vote_in_memory() {
    let fixture = Fixture::new();
    fixture
        .cmd()
        .args(["faq", "vote", "faq-002"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Marked 'faq-002' as helpful (1 vote)."));

    fixture
        .cmd()
        .args(["faq", "vote", "faq-404"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_faq_vote_and_count_against_remote_table() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/ip"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ip": "203.0.113.9" })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/rest/v1/faq_helpful"))
        .and(header("apikey", "test-key"))
        .and(body_json(json!({ "faq_id": "faq-001", "ip_address": "203.0.113.9" })))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/faq_helpful"))
        .and(query_param("faq_id", r#"in.("faq-001")"#))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "faq_id": "faq-001" },
            { "faq_id": "faq-001" },
            { "faq_id": "faq-001" }
        ])))
        .mount(&server)
        .await;

    let fixture = Fixture::with_config_extra(&format!(
        "endpoint = \"{uri}/rest/v1\"\napi_key = \"test-key\"\n",
        uri = server.uri()
    ));
    // `with_config_extra` appends to the [votes] table; point the IP lookup at the mock too.
    let config = std::fs::read_to_string(&fixture.config)
        .unwrap()
        .replace("http://127.0.0.1:9/", &format!("{}/ip", server.uri()));
    std::fs::write(&fixture.config, config).unwrap();

    let vote = fixture.cmd().args(["faq", "vote", "faq-001"]).ok().unwrap();
    assert!(String::from_utf8_lossy(&vote.stdout).contains("Marked 'faq-001' as helpful (3 votes)."));

    let show = fixture.cmd().args(["faq", "show", "faq-001", "--votes"]).ok().unwrap();
    assert!(String::from_utf8_lossy(&show.stdout).contains("Helpful: 3"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_faq_vote_backend_failure_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("db down"))
        .mount(&server)
        .await;

    let fixture = Fixture::with_config_extra(&format!("endpoint = \"{}\"\n", server.uri()));
    let output = fixture.cmd().args(["faq", "vote", "faq-001"]).output().unwrap();
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Vote backend error"));
}
