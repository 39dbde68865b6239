// crms-client/tests/rest_backend.rs
// REST table client and auth client against a fake hosted backend

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use crms_client::backend::{select_rows, TableClient};
use crms_client::{AuthClient, ClientConfig, ClientError, RestTableClient, Room};
use parking_lot::Mutex;
use serde_json::{json, Value};
use shared::{Filter, TableQuery};
use uuid::Uuid;

const ANON_KEY: &str = "anon-key";
const USER_TOKEN: &str = "user-token";

#[derive(Debug, Clone)]
struct Recorded {
    method: Method,
    table: String,
    params: Vec<(String, String)>,
    apikey: Option<String>,
    authorization: Option<String>,
    prefer: Option<String>,
    body: Option<Value>,
}

#[derive(Clone, Default)]
struct Fake {
    requests: Arc<Mutex<Vec<Recorded>>>,
}

impl Fake {
    fn record(
        &self,
        method: Method,
        table: String,
        params: Vec<(String, String)>,
        headers: &HeaderMap,
        body: Option<Value>,
    ) {
        let header = |name: &str| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        };
        self.requests.lock().push(Recorded {
            method,
            table,
            params,
            apikey: header("apikey"),
            authorization: header("authorization"),
            prefer: header("prefer"),
            body,
        });
    }

    fn last(&self) -> Recorded {
        self.requests.lock().last().cloned().unwrap()
    }
}

async fn select_handler(
    State(fake): State<Fake>,
    Path(table): Path<String>,
    Query(params): Query<Vec<(String, String)>>,
    headers: HeaderMap,
) -> Response {
    fake.record(Method::GET, table.clone(), params, &headers, None);
    match table.as_str() {
        "rooms" => Json(json!([{
            "id": Uuid::nil(),
            "name": "Lab C-205",
            "location": "Science Wing",
            "capacity": 30,
            "amenities": null,
            "description": null,
            "is_available": true
        }]))
        .into_response(),
        "broken" => (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "code": "PGRST100",
                "message": "failed to parse filter",
                "details": null,
                "hint": "check the operator"
            })),
        )
            .into_response(),
        "secret" => (StatusCode::UNAUTHORIZED, "JWT expired").into_response(),
        _ => Json(json!([])).into_response(),
    }
}

async fn insert_handler(
    State(fake): State<Fake>,
    Path(table): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> StatusCode {
    fake.record(Method::POST, table, Vec::new(), &headers, Some(body));
    StatusCode::CREATED
}

async fn update_handler(
    State(fake): State<Fake>,
    Path(table): Path<String>,
    Query(params): Query<Vec<(String, String)>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> StatusCode {
    fake.record(Method::PATCH, table, params, &headers, Some(body));
    StatusCode::NO_CONTENT
}

async fn token_handler(Json(body): Json<Value>) -> Response {
    if body["password"] == "correct horse" {
        Json(json!({
            "access_token": USER_TOKEN,
            "token_type": "bearer",
            "user": { "id": Uuid::nil(), "email": body["email"] }
        }))
        .into_response()
    } else {
        (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "invalid_grant", "error_description": "Invalid login credentials" })),
        )
            .into_response()
    }
}

async fn spawn_backend() -> (ClientConfig, Fake) {
    let fake = Fake::default();
    let app = Router::new()
        .route(
            "/rest/v1/{table}",
            get(select_handler).post(insert_handler).patch(update_handler),
        )
        .route("/auth/v1/token", post(token_handler))
        .route("/auth/v1/logout", post(|| async { StatusCode::NO_CONTENT }))
        .with_state(fake.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (ClientConfig::new(format!("http://{addr}/"), ANON_KEY), fake)
}

fn pairs(items: &[(&str, &str)]) -> Vec<(String, String)> {
    items
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[tokio::test]
async fn test_select_query_and_headers() {
    let (config, fake) = spawn_backend().await;
    let client = RestTableClient::new(&config).unwrap();

    let query = TableQuery::all("rooms").eq("is_available", true).order_by("name");
    let rooms: Vec<Room> = select_rows(&client, &query).await.unwrap();

    assert_eq!(rooms.len(), 1);
    assert_eq!(rooms[0].name, "Lab C-205");
    assert!(rooms[0].amenities.is_empty());

    let request = fake.last();
    assert_eq!(request.method, Method::GET);
    assert_eq!(request.table, "rooms");
    assert_eq!(
        request.params,
        pairs(&[("select", "*"), ("is_available", "eq.true"), ("order", "name.asc")])
    );
    assert_eq!(request.apikey.as_deref(), Some(ANON_KEY));
    // anonymous requests carry the anon key as bearer
    assert_eq!(request.authorization.as_deref(), Some("Bearer anon-key"));
}

#[tokio::test]
async fn test_projection_and_user_token() {
    let (config, fake) = spawn_backend().await;
    let client = RestTableClient::new(&config).unwrap().with_access_token(USER_TOKEN);
    let id = Uuid::new_v4();

    let query = TableQuery::all("equipment").columns("name, type").eq("id", id);
    let rows = client.select(&query).await.unwrap();

    assert!(rows.is_empty());
    let request = fake.last();
    assert_eq!(
        request.params,
        pairs(&[("select", "name,type"), ("id", &format!("eq.{id}"))])
    );
    assert_eq!(request.authorization.as_deref(), Some("Bearer user-token"));
}

#[tokio::test]
async fn test_insert_and_update() {
    let (config, fake) = spawn_backend().await;
    let client = RestTableClient::new(&config).unwrap().with_access_token(USER_TOKEN);
    let id = Uuid::new_v4();

    client
        .insert("reservations", json!({ "status": "pending", "notes": null }))
        .await
        .unwrap();
    let request = fake.last();
    assert_eq!(request.method, Method::POST);
    assert_eq!(request.table, "reservations");
    assert_eq!(request.prefer.as_deref(), Some("return=minimal"));
    assert_eq!(request.body.unwrap()["status"], "pending");

    client
        .update(
            "reservations",
            json!({ "status": "cancelled" }),
            &[Filter::eq("id", id)],
        )
        .await
        .unwrap();
    let request = fake.last();
    assert_eq!(request.method, Method::PATCH);
    assert_eq!(request.params, pairs(&[("id", &format!("eq.{id}"))]));
    assert_eq!(request.body.unwrap(), json!({ "status": "cancelled" }));
}

#[tokio::test]
async fn test_error_mapping() {
    let (config, _fake) = spawn_backend().await;
    let client = RestTableClient::new(&config).unwrap();

    let err = client.select(&TableQuery::all("broken")).await.unwrap_err();
    match err {
        ClientError::Api { code, message, hint, .. } => {
            assert_eq!(code, "PGRST100");
            assert_eq!(message, "failed to parse filter");
            assert_eq!(hint.as_deref(), Some("check the operator"));
        }
        other => panic!("unexpected error: {other:?}"),
    }

    let err = client.select(&TableQuery::all("secret")).await.unwrap_err();
    assert!(matches!(err, ClientError::Unauthorized(_)));
}

#[tokio::test]
async fn test_sign_in_and_out() {
    let (config, _fake) = spawn_backend().await;
    let auth = AuthClient::new(&config).unwrap();

    let session = auth.sign_in("lisa@campus.edu", "correct horse").await.unwrap();
    assert_eq!(session.user_id, Uuid::nil());
    assert_eq!(session.email.as_deref(), Some("lisa@campus.edu"));
    assert_eq!(session.access_token, USER_TOKEN);
    auth.sign_out(&session).await.unwrap();

    let err = auth.sign_in("lisa@campus.edu", "wrong").await.unwrap_err();
    match err {
        ClientError::Unauthorized(message) => assert_eq!(message, "Invalid login credentials"),
        other => panic!("unexpected error: {other:?}"),
    }
}
