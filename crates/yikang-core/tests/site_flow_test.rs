#![allow(clippy::unwrap_used)]
// Public site flows against a mocked service.

use std::sync::Arc;

use secrecy::SecretString;
use serde_json::{Value, json};
use url::Url;
use wiremock::matchers::{method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

use yikang_api::ServiceClient;
use yikang_core::site::{
    CONTACT_RECEIPT_MESSAGE, CasesSection, ContactForm, ContactSection, ContactTab,
    DEMO_RECEIPT_MESSAGE, DemoRequestForm, NewsSection, SectionState, SiteData,
};
use yikang_core::CoreError;

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, SiteData) {
    let server = MockServer::start().await;
    let client = ServiceClient::with_client(
        reqwest::Client::new(),
        Url::parse(&server.uri()).unwrap(),
        SecretString::from("anon-key".to_owned()),
    );
    (server, SiteData::new(Arc::new(client)))
}

async fn last_body(server: &MockServer) -> Value {
    let requests = server.received_requests().await.unwrap();
    let last = requests.last().unwrap();
    serde_json::from_slice(&last.body).unwrap()
}

fn case(id: i64, created_at: &str) -> Value {
    json!({
        "id": id,
        "title": format!("案例{id}"),
        "hospital_name": "北京协和医院",
        "status": "active",
        "created_at": created_at
    })
}

// ── Submissions ─────────────────────────────────────────────────────

#[tokio::test]
async fn test_contact_submission_stamps_new_and_returns_id() {
    let (server, site) = setup().await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/contacts"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([
            { "id": 42, "name": "张三", "phone": "13800000000", "status": "new" }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let mut form = ContactForm {
        name: "张三".into(),
        phone: "13800000000".into(),
        hospital_name: "某医院".into(),
        ..ContactForm::default()
    };
    form.toggle_interest("数字化远程康复系统");

    let receipt = site.submit_contact(&form).await.unwrap();
    assert_eq!(receipt.message, CONTACT_RECEIPT_MESSAGE);
    assert_eq!(receipt.id, Some(42));
    assert_eq!(receipt.status, "success");

    let body = last_body(&server).await;
    let row = &body[0];
    assert_eq!(row["status"], "new");
    assert_eq!(row["name"], "张三");
    assert_eq!(row["interest_products"], json!(["数字化远程康复系统"]));
    assert!(row["created_at"].as_str().is_some_and(|s| !s.is_empty()));
}

#[tokio::test]
async fn test_demo_submission_stamps_pending() {
    let (server, site) = setup().await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/demo_requests"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([{ "id": 7 }])))
        .expect(1)
        .mount(&server)
        .await;

    let form = DemoRequestForm {
        contact_name: "李四".into(),
        phone: "13900000000".into(),
        preferred_time: "工作日上午".into(),
        ..DemoRequestForm::default()
    };
    let receipt = site.submit_demo_request(&form).await.unwrap();
    assert_eq!(receipt.message, DEMO_RECEIPT_MESSAGE);
    assert_eq!(receipt.id, Some(7));

    let body = last_body(&server).await;
    assert_eq!(body[0]["status"], "pending");
}

#[tokio::test]
async fn test_invalid_form_never_reaches_service() {
    let (server, site) = setup().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([])))
        .expect(0)
        .mount(&server)
        .await;

    let form = ContactForm {
        name: "  ".into(),
        ..ContactForm::default()
    };
    let err = site.submit_contact(&form).await.unwrap_err();
    let CoreError::Validation(errors) = err else {
        panic!("expected validation error, got {err:?}");
    };
    assert_eq!(errors.errors().len(), 2);
    assert!(errors.get("name").is_some());
    assert!(errors.get("phone").is_some());
}

#[tokio::test]
async fn test_submission_error_carries_service_message() {
    let (server, site) = setup().await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/contacts"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "code": "42501",
            "message": "new row violates row-level security policy"
        })))
        .mount(&server)
        .await;

    let form = ContactForm {
        name: "张三".into(),
        phone: "1".into(),
        ..ContactForm::default()
    };
    let err = site.submit_contact(&form).await.unwrap_err();
    assert_eq!(err.to_string(), "new row violates row-level security policy");
}

// ── Public reads ────────────────────────────────────────────────────

#[tokio::test]
async fn test_news_query_filters_published_without_limit() {
    let (server, site) = setup().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/news"))
        .and(query_param("status", "eq.published"))
        .and(query_param("order", "published_at.desc"))
        .and(query_param_is_missing("limit"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": 2, "title": "新", "status": "published", "published_at": "2025-07-25" },
            { "id": 1, "title": "旧", "status": "published", "published_at": "2025-07-20T08:00:00+00:00" }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let news = site.get_news(None).await.unwrap();
    assert_eq!(news.len(), 2);
    assert_eq!(news[0].title, "新");
    assert!(news[0].published_at.is_some());
}

#[tokio::test]
async fn test_cases_query_defaults_to_ten_active() {
    let (server, site) = setup().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/product_cases"))
        .and(query_param("status", "eq.active"))
        .and(query_param("order", "created_at.desc"))
        .and(query_param("limit", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    assert!(site.get_product_cases(None).await.unwrap().is_empty());
}

// ── Sections ────────────────────────────────────────────────────────

#[tokio::test]
async fn test_cases_section_renders_three_newest() {
    let (server, site) = setup().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/product_cases"))
        .and(query_param("limit", "3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            case(3, "2025-07-25T00:00:00Z"),
            case(2, "2025-07-20T00:00:00Z"),
            case(1, "2025-07-15T00:00:00Z")
        ])))
        .mount(&server)
        .await;

    let mut section = CasesSection::new();
    assert_eq!(*section.state(), SectionState::Loading);
    section.load(&site).await;

    let ids: Vec<_> = section.state().items().iter().map(|c| c.id).collect();
    assert_eq!(ids, vec![3, 2, 1]);
}

#[tokio::test]
async fn test_cases_section_empty_and_failed_render_empty() {
    let (server, site) = setup().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/product_cases"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/product_cases"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let mut section = CasesSection::new();
    section.load(&site).await;
    assert_eq!(*section.state(), SectionState::Empty);

    section.load(&site).await;
    assert_eq!(*section.state(), SectionState::Empty);
}

#[tokio::test]
async fn test_news_section_show_all_drops_limit() {
    let (server, site) = setup().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/news"))
        .and(query_param("limit", "3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": 1, "title": "一", "status": "published" }
        ])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/news"))
        .and(query_param_is_missing("limit"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": 1, "title": "一", "status": "published" },
            { "id": 0, "title": "零", "status": "published" }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let mut section = NewsSection::new();
    section.load(&site).await;
    assert_eq!(section.state().items().len(), 1);

    section.set_show_all(&site, true).await;
    assert!(section.show_all());
    assert_eq!(section.state().items().len(), 2);
}

#[tokio::test]
async fn test_contact_section_resets_form_after_success() {
    let (server, site) = setup().await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/demo_requests"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([{ "id": 9 }])))
        .mount(&server)
        .await;

    let mut section = ContactSection::new();
    section.switch_tab(ContactTab::Demo);
    section.demo.contact_name = "王五".into();
    section.demo.phone = "13700000000".into();

    section.submit(&site).await.unwrap();
    assert!(!section.is_submitting());
    assert_eq!(section.banners().success(), Some(DEMO_RECEIPT_MESSAGE));
    assert_eq!(section.demo, DemoRequestForm::default());
}

#[tokio::test]
async fn test_contact_section_keeps_form_on_failure() {
    let (server, site) = setup().await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/contacts"))
        .respond_with(ResponseTemplate::new(503).set_body_json(json!({
            "message": "service unavailable"
        })))
        .mount(&server)
        .await;

    let mut section = ContactSection::new();
    section.contact.name = "张三".into();
    section.contact.phone = "13800000000".into();

    assert!(section.submit(&site).await.is_err());
    assert_eq!(section.banners().error(), Some("service unavailable"));
    assert_eq!(section.contact.name, "张三");
}
