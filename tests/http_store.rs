//! `HttpTemplateStore` against a local fake of the template API.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Path, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};

use invoice_designer_lib::error::AppError;
use invoice_designer_lib::models::{PageLayout, Spacing, Template, TemplateId};
use invoice_designer_lib::persistence::{
    from_record, to_record, HttpTemplateStore, TemplateStore,
};

#[derive(Clone, Default)]
struct FakeApi {
    records: Arc<Mutex<Vec<Value>>>,
    next_id: Arc<AtomicU64>,
    token: Option<&'static str>,
}

impl FakeApi {
    fn check_auth(&self, headers: &HeaderMap) -> Result<(), StatusCode> {
        let Some(token) = self.token else {
            return Ok(());
        };
        let expected = format!("Bearer {token}");
        match headers.get(header::AUTHORIZATION) {
            Some(value) if value.as_bytes() == expected.as_bytes() => Ok(()),
            _ => Err(StatusCode::UNAUTHORIZED),
        }
    }
}

async fn list(State(api): State<FakeApi>, headers: HeaderMap) -> Result<Json<Value>, StatusCode> {
    api.check_auth(&headers)?;
    let records = api.records.lock().expect("records lock").clone();
    Ok(Json(json!({ "data": records })))
}

async fn create(
    State(api): State<FakeApi>,
    headers: HeaderMap,
    Json(mut body): Json<Value>,
) -> Result<(StatusCode, Json<Value>), StatusCode> {
    api.check_auth(&headers)?;
    let id = api.next_id.fetch_add(1, Ordering::SeqCst) + 1;
    body["id"] = json!(id);
    body["created_at"] = json!("2026-10-16T12:00:00Z");
    api.records.lock().expect("records lock").push(body.clone());
    Ok((StatusCode::CREATED, Json(body)))
}

async fn get_one(
    State(api): State<FakeApi>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<Value>, StatusCode> {
    api.check_auth(&headers)?;
    let records = api.records.lock().expect("records lock");
    records
        .iter()
        .find(|r| r["id"].to_string() == id)
        .cloned()
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

async fn remove(
    State(api): State<FakeApi>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<StatusCode, StatusCode> {
    api.check_auth(&headers)?;
    let mut records = api.records.lock().expect("records lock");
    let before = records.len();
    records.retain(|r| r["id"].to_string() != id);
    if records.len() == before {
        return Err(StatusCode::NOT_FOUND);
    }
    Ok(StatusCode::NO_CONTENT)
}

async fn serve(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("serve");
    });
    format!("http://{addr}/api")
}

async fn fake_api(token: Option<&'static str>) -> (String, FakeApi) {
    let api = FakeApi {
        token,
        ..FakeApi::default()
    };
    let router = Router::new()
        .route("/api/invoice-templates", get(list).post(create))
        .route("/api/invoice-templates/:id", get(get_one).delete(remove))
        .with_state(api.clone());
    (serve(router).await, api)
}

fn store(base: &str, token: Option<&str>) -> HttpTemplateStore {
    HttpTemplateStore::new(
        base,
        "invoice-templates",
        token.map(str::to_string),
        Duration::from_secs(5),
    )
    .expect("store")
}

fn custom_template() -> Template {
    Template {
        name: "Headshots".to_string(),
        layout: PageLayout {
            width: 210.0,
            height: 250.0,
            margin: Spacing::uniform(10.0),
            ..PageLayout::default()
        },
        ..Template::default()
    }
}

#[tokio::test]
async fn create_list_get_delete_round_trip() {
    let (base, api) = fake_api(None).await;
    let store = store(&base, None);

    let stored = store
        .create(&to_record(&custom_template()))
        .await
        .expect("create");
    assert_eq!(stored.id, Some(TemplateId::new("1")));
    assert_eq!(stored.created_at.as_deref(), Some("2026-10-16T12:00:00Z"));

    // The body on the wire is the stored shape: px page size, mm margins.
    let wire = api.records.lock().expect("records lock")[0].clone();
    assert_eq!(wire["paper_size"], "Custom");
    assert_eq!(wire["margins"]["left"], 10.0);
    assert!(wire.get("layout").is_none());

    let listed = store.list().await.expect("list");
    assert_eq!(listed, vec![stored.clone()]);

    let id = stored.id.clone().expect("id");
    let fetched = store.get(&id).await.expect("get");
    let template = from_record(fetched);
    assert!((template.layout.height - 250.0).abs() < 1e-9);
    assert_eq!(template.layout.margin, Spacing::uniform(10.0));

    store.delete(&id).await.expect("delete");
    assert!(store.list().await.expect("list").is_empty());
}

#[tokio::test]
async fn unknown_id_is_not_found() {
    let (base, _api) = fake_api(None).await;
    let store = store(&base, None);
    let missing = TemplateId::new("999");
    assert!(matches!(store.get(&missing).await, Err(AppError::NotFound(_))));
    assert!(matches!(store.delete(&missing).await, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn bearer_token_is_sent() {
    let (base, _api) = fake_api(Some("s3cret")).await;

    let anonymous = store(&base, None);
    match anonymous.list().await {
        Err(AppError::Storage { status, .. }) => assert_eq!(status, 401),
        other => panic!("expected 401, got {other:?}"),
    }

    let authorized = store(&base, Some("s3cret"));
    assert!(authorized.list().await.expect("list").is_empty());
}

#[tokio::test]
async fn server_error_keeps_status_and_body() {
    let router = Router::new().route(
        "/api/invoice-templates",
        get(|| async { (StatusCode::SERVICE_UNAVAILABLE, "maintenance window") }),
    );
    let base = serve(router).await;

    match store(&base, None).list().await {
        Err(AppError::Storage { status, message }) => {
            assert_eq!(status, 503);
            assert_eq!(message, "maintenance window");
        }
        other => panic!("expected storage error, got {other:?}"),
    }
}

#[tokio::test]
async fn bare_array_list_response_is_accepted() {
    let router = Router::new().route(
        "/api/invoice-templates",
        get(|| async {
            Json(json!([
                { "id": "abc", "name": "Bare", "page_width": 600, "page_height": 800 }
            ]))
        }),
    );
    let base = serve(router).await;

    let records = store(&base, None).list().await.expect("list");
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].id, Some(TemplateId::new("abc")));
    assert_eq!(records[0].margins, Spacing::ZERO);
}

#[tokio::test]
async fn unreachable_store_is_a_transport_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);

    let result = store(&format!("http://{addr}/api"), None).list().await;
    assert!(matches!(result, Err(AppError::Transport(_))), "{result:?}");
}
