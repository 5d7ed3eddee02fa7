#![allow(clippy::unwrap_used)]
// Admin screens against a mocked service: content CRUD and the inbox
// status workflow.

use std::sync::Arc;
use std::time::Duration;

use secrecy::SecretString;
use serde_json::{Value, json};
use url::Url;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use yikang_api::{AuthUser, ServiceClient};
use yikang_core::admin::{
    CasesScreen, Confirmation, ContactsScreen, DIALOG_CLOSE_DELAY, DemosScreen, NewsScreen,
    SaveOutcome, StatusFilter,
};
use yikang_core::{ContactStatus, CoreError, DemoStatus, NewsStatus, StatusKind};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, Arc<ServiceClient>) {
    let server = MockServer::start().await;
    let client = ServiceClient::with_client(
        reqwest::Client::new(),
        Url::parse(&server.uri()).unwrap(),
        SecretString::from("anon-key".to_owned()),
    );
    (server, Arc::new(client))
}

fn admin() -> AuthUser {
    AuthUser {
        id: "8d0f".into(),
        email: Some("admin@example.com".into()),
        role: Some("authenticated".into()),
        last_sign_in_at: None,
    }
}

async fn mount_list(server: &MockServer, table: &str, rows: Value) {
    Mock::given(method("GET"))
        .and(path(format!("/rest/v1/{table}")))
        .and(query_param("order", "created_at.desc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(rows))
        .mount(server)
        .await;
}

async fn bodies(server: &MockServer, verb: &str) -> Vec<Value> {
    server
        .received_requests()
        .await
        .unwrap()
        .into_iter()
        .filter(|r| r.method.as_str() == verb)
        .map(|r| serde_json::from_slice(&r.body).unwrap())
        .collect()
}

fn news_rows() -> Value {
    json!([
        {
            "id": 2, "title": "草稿动态", "content": "正文", "status": "draft",
            "author": "", "created_at": "2025-07-26T00:00:00Z"
        },
        {
            "id": 1, "title": "已发布动态", "content": "正文", "status": "published",
            "author": "团队", "published_at": "2025-07-20T08:00:00Z",
            "created_at": "2025-07-20T00:00:00Z"
        }
    ])
}

// ── Content screens ─────────────────────────────────────────────────

#[tokio::test]
async fn test_create_news_defaults_author_and_stamps_publish_time() {
    let (server, client) = setup().await;
    mount_list(&server, "news", news_rows()).await;
    Mock::given(method("POST"))
        .and(path("/rest/v1/news"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([{ "id": 3 }])))
        .expect(1)
        .mount(&server)
        .await;

    let mut screen = NewsScreen::new(client);
    screen.load().await.unwrap();
    assert_eq!(screen.list().rows().len(), 2);

    let form = screen.open_new(Some(&admin()));
    assert_eq!(form.author, "admin@example.com");
    form.title = "新动态".into();
    form.content = "内容".into();
    form.status = NewsStatus::Published;

    assert_eq!(screen.save().await.unwrap(), SaveOutcome::Created);
    assert_eq!(screen.banners().success(), Some("公司动态创建成功！"));
    // Still open until the close delay passes.
    assert!(screen.dialog().is_some());

    let posted = bodies(&server, "POST").await;
    let row = &posted[0][0];
    assert_eq!(row["title"], "新动态");
    assert_eq!(row["status"], "published");
    assert_eq!(row["author"], "admin@example.com");
    assert!(row["published_at"].is_string());
    assert!(row["created_at"].is_string());
    assert!(row["updated_at"].is_string());
}

#[tokio::test]
async fn test_edit_keeps_existing_publish_time() {
    let (server, client) = setup().await;
    mount_list(&server, "news", news_rows()).await;
    Mock::given(method("PATCH"))
        .and(path("/rest/v1/news"))
        .and(query_param("id", "eq.1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{ "id": 1 }])))
        .expect(2)
        .mount(&server)
        .await;

    let mut screen = NewsScreen::new(client);
    screen.load().await.unwrap();

    // Two sequential edits of the same row each write in full.
    for title in ["第一次修改", "第二次修改"] {
        let form = screen.open_edit(1, Some(&admin())).unwrap();
        assert_eq!(form.author, "团队");
        form.title = title.into();
        assert_eq!(screen.save().await.unwrap(), SaveOutcome::Updated);
    }

    let patched = bodies(&server, "PATCH").await;
    assert_eq!(patched.len(), 2);
    assert_eq!(patched[0]["title"], "第一次修改");
    assert_eq!(patched[1]["title"], "第二次修改");
    for row in &patched {
        assert_eq!(row["published_at"], "2025-07-20T08:00:00+00:00");
        assert!(row.get("created_at").is_none());
    }
}

#[tokio::test]
async fn test_unpublishing_clears_publish_time() {
    let (server, client) = setup().await;
    mount_list(&server, "news", news_rows()).await;
    Mock::given(method("PATCH"))
        .and(path("/rest/v1/news"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let mut screen = NewsScreen::new(client);
    screen.load().await.unwrap();
    screen.open_edit(1, None).unwrap().status = NewsStatus::Archived;
    screen.save().await.unwrap();

    let patched = bodies(&server, "PATCH").await;
    assert_eq!(patched[0]["published_at"], Value::Null);
}

#[tokio::test]
async fn test_invalid_case_form_is_not_sent() {
    let (server, client) = setup().await;
    mount_list(&server, "product_cases", json!([])).await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([])))
        .expect(0)
        .mount(&server)
        .await;

    let mut screen = CasesScreen::new(client);
    screen.load().await.unwrap();
    screen.open_new(None).title = "只有标题".into();

    let err = screen.save().await.unwrap_err();
    assert!(matches!(err, CoreError::Validation(_)));
    assert_eq!(screen.banners().error(), Some("请输入医院名称"));
    assert!(screen.dialog().is_some());
}

#[tokio::test]
async fn test_failed_save_keeps_dialog_and_reports() {
    let (server, client) = setup().await;
    mount_list(&server, "product_cases", json!([])).await;
    Mock::given(method("POST"))
        .and(path("/rest/v1/product_cases"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "code": "42501",
            "message": "permission denied for table product_cases"
        })))
        .mount(&server)
        .await;

    let mut screen = CasesScreen::new(client);
    screen.load().await.unwrap();
    let form = screen.open_new(None);
    form.title = "案例".into();
    form.hospital_name = "医院".into();

    assert!(screen.save().await.is_err());
    assert_eq!(
        screen.banners().error(),
        Some("保存失败: permission denied for table product_cases")
    );
    assert!(screen.dialog().is_some());
    assert!(!screen.is_submitting());
}

#[tokio::test]
async fn test_dialog_closes_after_delay_only_on_success() {
    let (server, client) = setup().await;
    mount_list(&server, "product_cases", json!([])).await;
    Mock::given(method("POST"))
        .and(path("/rest/v1/product_cases"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "message": "permission denied for table product_cases"
        })))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/rest/v1/product_cases"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([{ "id": 1 }])))
        .mount(&server)
        .await;

    let mut screen = CasesScreen::new(client);
    screen.load().await.unwrap();
    let form = screen.open_new(None);
    form.title = "案例".into();
    form.hospital_name = "医院".into();

    // A failed save never schedules a close.
    assert!(screen.save().await.is_err());
    tokio::time::pause();
    tokio::time::advance(DIALOG_CLOSE_DELAY * 2).await;
    assert!(screen.dialog().is_some());
    tokio::time::resume();

    assert_eq!(screen.save().await.unwrap(), SaveOutcome::Created);
    tokio::time::pause();
    tokio::time::advance(DIALOG_CLOSE_DELAY - Duration::from_millis(100)).await;
    assert!(screen.dialog().is_some());
    assert!(screen.form_mut().is_some());
    tokio::time::advance(Duration::from_millis(200)).await;
    assert!(screen.dialog().is_none());
    assert!(screen.form_mut().is_none());
    assert!(screen.save().await.is_err());
}

#[tokio::test]
async fn test_delete_requires_confirmation() {
    let (server, client) = setup().await;
    mount_list(&server, "news", news_rows()).await;
    Mock::given(method("DELETE"))
        .and(path("/rest/v1/news"))
        .and(query_param("id", "eq.2"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let mut screen = NewsScreen::new(client);
    screen.load().await.unwrap();

    assert!(!screen.delete(2, Confirmation::Declined).await.unwrap());
    assert!(screen.delete(2, Confirmation::from(true)).await.unwrap());
    assert_eq!(screen.banners().success(), Some("公司动态删除成功！"));
}

#[tokio::test]
async fn test_load_failure_shows_prefixed_message() {
    let (server, client) = setup().await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/news"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "message": "internal error"
        })))
        .mount(&server)
        .await;

    let mut screen = NewsScreen::new(client);
    assert!(screen.load().await.is_err());
    assert!(!screen.is_loading());
    assert!(
        screen
            .banners()
            .error()
            .is_some_and(|m| m.starts_with("加载公司动态失败"))
    );
}

// ── Inbox screens ───────────────────────────────────────────────────

#[tokio::test]
async fn test_demo_status_change_patches_only_status() {
    let (server, client) = setup().await;
    let mut screen = DemosScreen::new(client);

    // Any status may move to any other, and the reload shows it.
    for &from in DemoStatus::ALL {
        for &to in DemoStatus::ALL.iter().filter(|&&s| s != from) {
            server.reset().await;
            let row = |status: DemoStatus| {
                json!([{ "id": 5, "contact_name": "王五", "phone": "1", "status": status.as_str() }])
            };
            Mock::given(method("GET"))
                .and(path("/rest/v1/demo_requests"))
                .respond_with(ResponseTemplate::new(200).set_body_json(row(from)))
                .up_to_n_times(1)
                .mount(&server)
                .await;
            mount_list(&server, "demo_requests", row(to)).await;
            Mock::given(method("PATCH"))
                .and(path("/rest/v1/demo_requests"))
                .and(query_param("id", "eq.5"))
                .and(body_json(json!({ "status": to.as_str() })))
                .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
                .expect(1)
                .mount(&server)
                .await;

            screen.load().await.unwrap();
            assert_eq!(screen.select(5).unwrap().status, from);

            screen.set_status(5, to).await.unwrap();
            assert_eq!(screen.list().find(5).unwrap().status, to, "{from} -> {to}");
            assert_eq!(screen.selected().unwrap().status, to);
            assert_eq!(
                screen.banners().success().map(ToOwned::to_owned),
                Some(format!("状态已成功更新为: {}", to.label()))
            );
            assert!(!screen.is_updating());
            server.verify().await;
        }
    }

    screen.close_detail();
    assert!(screen.selected().is_none());
}

#[tokio::test]
async fn test_unknown_status_is_rejected_locally() {
    let (server, client) = setup().await;
    Mock::given(method("PATCH"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&server)
        .await;

    let mut screen = ContactsScreen::new(client);
    let err = screen.set_status(1, ContactStatus::Unknown).await.unwrap_err();
    assert!(matches!(err, CoreError::Validation(_)));
}

#[tokio::test]
async fn test_status_change_failure_reports() {
    let (server, client) = setup().await;
    mount_list(&server, "contacts", json!([])).await;
    Mock::given(method("PATCH"))
        .and(path("/rest/v1/contacts"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "message": "invalid input value for enum"
        })))
        .mount(&server)
        .await;

    let mut screen = ContactsScreen::new(client);
    screen.load().await.unwrap();
    assert!(screen.set_status(1, ContactStatus::Closed).await.is_err());
    assert_eq!(
        screen.banners().error(),
        Some("状态更新失败: invalid input value for enum")
    );
}

#[tokio::test]
async fn test_contacts_search_and_filter_compose() {
    let (server, client) = setup().await;
    mount_list(
        &server,
        "contacts",
        json!([
            { "id": 3, "name": "张三", "phone": "1", "hospital_name": "北京协和医院", "status": "contacted" },
            { "id": 2, "name": "李四", "phone": "2", "hospital_name": "北京协和医院", "status": "new" },
            { "id": 1, "name": "王五", "phone": "3", "hospital_name": "浙江省人民医院", "status": "contacted" }
        ]),
    )
    .await;

    let mut screen = ContactsScreen::new(client);
    screen.load().await.unwrap();
    screen.list_mut().set_search("协和");
    screen
        .list_mut()
        .set_filter(StatusFilter::Only(ContactStatus::Contacted));

    let visible: Vec<_> = screen.list().visible().iter().map(|c| c.id).collect();
    assert_eq!(visible, vec![3]);

    let selected = screen.select(3).unwrap();
    assert_eq!(selected.name, "张三");
}
