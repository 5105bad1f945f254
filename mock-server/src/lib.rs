use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, Method, StatusCode, Uri},
    routing::{any, get},
    Json, Router,
};
use base64::{engine::general_purpose::STANDARD, Engine};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewClient {
    pub first_name: String,
    pub last_name: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientPatch {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

/// JSON envelope used by create and patch: `{"client": {...}}`. Extra
/// top-level fields such as `appkey` are ignored.
#[derive(Deserialize)]
struct Envelope<T> {
    client: T,
}

/// What `/echo` saw on the wire.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Echo {
    pub method: String,
    pub query: Option<String>,
    pub content_type: Option<String>,
    pub authorization: Option<String>,
    pub body: String,
}

#[derive(Clone)]
pub struct AppState {
    authorization: Arc<String>,
    clients: Arc<RwLock<HashMap<Uuid, Client>>>,
}

type Failure = (StatusCode, Json<Value>);

pub fn app(username: &str, password: &str) -> Router {
    let state = AppState {
        authorization: Arc::new(format!(
            "Basic {}",
            STANDARD.encode(format!("{username}:{password}"))
        )),
        clients: Arc::new(RwLock::new(HashMap::new())),
    };
    Router::new()
        .route("/echo", any(echo))
        .route("/api/clients", get(list_clients).post(create_client))
        .route(
            "/api/clients/{id}",
            get(get_client).patch(patch_client).delete(delete_client),
        )
        .route("/api/search", get(search))
        .route("/api/documents/{id}", get(get_document))
        .with_state(state)
}

pub async fn run(
    listener: TcpListener,
    username: &str,
    password: &str,
) -> Result<(), std::io::Error> {
    axum::serve(listener, app(username, password)).await
}

fn failure(status: StatusCode, return_status: &str) -> Failure {
    (
        status,
        Json(json!({ "returnCode": status.as_u16(), "returnStatus": return_status })),
    )
}

fn authorize(state: &AppState, headers: &HeaderMap) -> Result<(), Failure> {
    let given = headers.get(header::AUTHORIZATION).and_then(|v| v.to_str().ok());
    if given == Some(state.authorization.as_str()) {
        Ok(())
    } else {
        tracing::debug!("rejecting request with bad credentials");
        Err(failure(StatusCode::UNAUTHORIZED, "INVALID_CREDENTIALS"))
    }
}

fn content_type(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

async fn echo(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: String,
) -> Result<Json<Echo>, Failure> {
    authorize(&state, &headers)?;
    Ok(Json(Echo {
        method: method.to_string(),
        query: uri.query().map(str::to_string),
        content_type: content_type(&headers),
        authorization: headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        body,
    }))
}

async fn list_clients(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<Client>>, Failure> {
    authorize(&state, &headers)?;
    let clients = state.clients.read().await;
    Ok(Json(clients.values().cloned().collect()))
}

async fn create_client(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: String,
) -> Result<(StatusCode, Json<Client>), Failure> {
    authorize(&state, &headers)?;
    let is_json = content_type(&headers).is_some_and(|ct| ct.starts_with("application/json"));
    let input = if is_json {
        serde_json::from_str::<Envelope<NewClient>>(&body).map(|e| e.client).ok()
    } else {
        let form: HashMap<String, String> = url::form_urlencoded::parse(body.as_bytes())
            .into_owned()
            .collect();
        match (form.get("firstName"), form.get("lastName")) {
            (Some(first), Some(last)) => Some(NewClient {
                first_name: first.clone(),
                last_name: last.clone(),
            }),
            _ => None,
        }
    };
    let input = input.ok_or_else(|| failure(StatusCode::BAD_REQUEST, "INVALID_PARAMETERS"))?;

    let client = Client {
        id: Uuid::new_v4(),
        first_name: input.first_name,
        last_name: input.last_name,
    };
    state.clients.write().await.insert(client.id, client.clone());
    Ok((StatusCode::CREATED, Json(client)))
}

async fn get_client(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> Result<Json<Client>, Failure> {
    authorize(&state, &headers)?;
    let clients = state.clients.read().await;
    clients
        .get(&id)
        .cloned()
        .map(Json)
        .ok_or_else(|| failure(StatusCode::NOT_FOUND, "INVALID_CLIENT_ID"))
}

async fn patch_client(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
    body: String,
) -> Result<Json<Client>, Failure> {
    authorize(&state, &headers)?;
    let patch = serde_json::from_str::<Envelope<ClientPatch>>(&body)
        .map(|e| e.client)
        .map_err(|_| failure(StatusCode::BAD_REQUEST, "INVALID_PARAMETERS"))?;

    let mut clients = state.clients.write().await;
    let client = clients
        .get_mut(&id)
        .ok_or_else(|| failure(StatusCode::NOT_FOUND, "INVALID_CLIENT_ID"))?;
    if let Some(first_name) = patch.first_name {
        client.first_name = first_name;
    }
    if let Some(last_name) = patch.last_name {
        client.last_name = last_name;
    }
    Ok(Json(client.clone()))
}

async fn delete_client(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, Failure> {
    authorize(&state, &headers)?;
    let mut clients = state.clients.write().await;
    clients
        .remove(&id)
        .map(|_| Json(json!({ "returnCode": 0, "returnStatus": "SUCCESS" })))
        .ok_or_else(|| failure(StatusCode::NOT_FOUND, "INVALID_CLIENT_ID"))
}

async fn search(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Value>, Failure> {
    authorize(&state, &headers)?;
    let query = params
        .get("query")
        .map(|q| q.to_lowercase())
        .ok_or_else(|| failure(StatusCode::BAD_REQUEST, "INVALID_PARAMETERS"))?;
    let limit = match params.get("limit") {
        Some(raw) => raw
            .parse::<usize>()
            .map_err(|_| failure(StatusCode::BAD_REQUEST, "INVALID_PARAMETERS"))?,
        None => 100,
    };
    let types: Vec<String> = match params.get("searchtypes") {
        Some(raw) => raw
            .trim_matches(|c| c == '[' || c == ']')
            .split(',')
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect(),
        None => vec!["CLIENT".to_string()],
    };

    let mut results = serde_json::Map::new();
    for kind in types {
        let hits: Vec<Value> = if kind == "CLIENT" {
            let clients = state.clients.read().await;
            clients
                .values()
                .filter(|c| {
                    format!("{} {}", c.first_name, c.last_name)
                        .to_lowercase()
                        .contains(&query)
                })
                .take(limit)
                .map(|c| {
                    json!({
                        "resultID": c.id.to_string(),
                        "displayString": format!("{} {}", c.first_name, c.last_name),
                    })
                })
                .collect()
        } else {
            Vec::new()
        };
        results.insert(kind, Value::Array(hits));
    }
    Ok(Json(Value::Object(results)))
}

async fn get_document(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<Value>, Failure> {
    authorize(&state, &headers)?;
    let content: Vec<u8> = (0..=255u8).cycle().take(1024).collect();
    Ok(Json(json!({
        "documentId": id,
        "content": format!("data:image/png;base64,{}", STANDARD.encode(content)),
    })))
}
