//! JSON API over the ledger.
//!
//! - `POST /api/transaction`  `{ "text": "spent $40 on groceries" }`
//! - `GET  /api/summary`
//! - `POST /api/update_goal`  `{ "goal": "Trip", "amount": 50 }`

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tally_core::{time::today_in, LedgerError, RecordError, RecordStore};
use tally_finance::Ledger;
use tokio::sync::Mutex;
use tracing::{error, info, warn};

/// Shared handler state. The mutex gives the store one caller at a time.
pub struct AppState<S> {
    pub ledger: Mutex<Ledger<S>>,
    pub timezone: String,
}

impl<S: RecordStore> AppState<S> {
    pub fn new(ledger: Ledger<S>, timezone: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            ledger: Mutex::new(ledger),
            timezone: timezone.into(),
        })
    }

    fn today(&self) -> Result<NaiveDate> {
        today_in(&self.timezone)
    }
}

#[derive(Debug, Deserialize)]
pub struct AddTransactionRequest {
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateGoalRequest {
    #[serde(default)]
    pub goal: Option<String>,
    #[serde(default, deserialize_with = "amount_input::deserialize")]
    pub amount: f64,
}

// Amounts may arrive as numbers, numeric strings or null
mod amount_input {
    use serde::{Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum AmountOrString {
        Amount(f64),
        String(String),
        Null,
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<f64, D::Error>
    where
        D: Deserializer<'de>,
    {
        match AmountOrString::deserialize(deserializer)? {
            AmountOrString::Amount(v) => Ok(v),
            AmountOrString::String(s) => s
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| serde::de::Error::custom(format!("invalid amount '{s}'"))),
            AmountOrString::Null => Ok(0.0),
        }
    }
}

#[derive(Debug, Serialize)]
struct MessageBody {
    message: String,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

fn message(status: StatusCode, msg: impl Into<String>) -> Response {
    (status, Json(MessageBody { message: msg.into() })).into_response()
}

fn failure(status: StatusCode, msg: impl Into<String>) -> Response {
    (status, Json(ErrorBody { error: msg.into() })).into_response()
}

fn bad_body(route: &str, rejection: JsonRejection) -> Response {
    warn!("{route}: unreadable body: {rejection}");
    failure(StatusCode::BAD_REQUEST, rejection.body_text())
}

fn internal(e: impl std::fmt::Display) -> Response {
    error!("request failed: {e}");
    failure(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
}

/// Axum handler for POST /api/transaction
pub async fn add_transaction<S: RecordStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    payload: Result<Json<AddTransactionRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match payload {
        Ok(p) => p,
        Err(rejection) => return bad_body("POST /api/transaction", rejection),
    };
    info!("POST /api/transaction - text: {:?}", request.text);

    let today = match state.today() {
        Ok(d) => d,
        Err(e) => return internal(e),
    };

    let ledger = state.ledger.lock().await;
    match ledger.record(&request.text, today) {
        Ok(_) => message(StatusCode::OK, "Transaction added successfully"),
        Err(RecordError::Rejected(e)) => {
            warn!("rejected input: {e}");
            failure(StatusCode::BAD_REQUEST, "Could not process the input")
        }
        Err(RecordError::Ledger(e)) => internal(e),
    }
}

/// Axum handler for GET /api/summary
pub async fn get_summary<S: RecordStore + 'static>(State(state): State<Arc<AppState<S>>>) -> Response {
    info!("GET /api/summary");

    let today = match state.today() {
        Ok(d) => d,
        Err(e) => return internal(e),
    };

    let ledger = state.ledger.lock().await;
    match ledger.summary(today) {
        Ok(summary) => (StatusCode::OK, Json(summary)).into_response(),
        Err(e) => internal(e),
    }
}

/// Axum handler for POST /api/update_goal
pub async fn update_goal<S: RecordStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    payload: Result<Json<UpdateGoalRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match payload {
        Ok(p) => p,
        Err(rejection) => return bad_body("POST /api/update_goal", rejection),
    };
    info!("POST /api/update_goal - request: {:?}", request);

    let Some(goal) = request.goal else {
        return failure(StatusCode::NOT_FOUND, "Goal not found");
    };

    let ledger = state.ledger.lock().await;
    match ledger.update_goal(&goal, request.amount) {
        Ok(_) => message(StatusCode::OK, format!("Updated {goal} goal successfully")),
        Err(LedgerError::GoalNotFound(_)) => failure(StatusCode::NOT_FOUND, "Goal not found"),
        Err(e) => internal(e),
    }
}

pub fn router<S: RecordStore + 'static>(state: Arc<AppState<S>>) -> Router {
    let api = Router::new()
        .route("/transaction", post(add_transaction::<S>))
        .route("/summary", get(get_summary::<S>))
        .route("/update_goal", post(update_goal::<S>));

    Router::new().nest("/api", api).with_state(state)
}

pub async fn serve<S: RecordStore + 'static>(state: Arc<AppState<S>>, addr: SocketAddr) -> Result<()> {
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Listening on {}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}
