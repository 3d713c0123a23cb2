//! Warikan is a web app for tracking shared household expenses between two
//! people across three currencies, and working out who owes whom.
//!
//! This library provides a JSON REST API backed by a single-table SQLite
//! database, a pure balance/settlement engine, and the client-side session
//! state the UI renders from.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use serde_json::json;
use tokio::signal;

mod app_state;
mod db;
mod endpoints;
pub mod ledger;
mod logging;
pub mod models;
mod routes;
mod routing;
pub mod session;
pub mod stores;

pub use app_state::AppState;
pub use db::initialize as initialize_db;
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use routing::build_router;
pub use stores::{SQLiteExpenseStore, SqlAppState, create_app_state};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// An expense was inserted with an ID that already exists in the database.
    ///
    /// IDs are assigned by the caller (or derived from the creation time), so
    /// the client should retry with a different ID.
    #[error("an expense with the ID \"{0}\" already exists in the database")]
    DuplicateExpenseId(String),

    /// A request that requires an expense ID did not supply one.
    #[error("expense ID is required")]
    MissingExpenseId,

    /// The requested expense was not found in the database.
    #[error("the requested expense could not be found")]
    NotFound,

    /// A string did not match one of the three supported currencies.
    #[error("\"{0}\" is not a supported currency")]
    InvalidCurrency(String),

    /// A string did not match either of the two household members.
    #[error("\"{0}\" is not a member of this household")]
    InvalidParticipant(String),

    /// A string did not match one of the six expense categories.
    #[error("\"{0}\" is not a known expense category")]
    InvalidCategory(String),

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = match self {
            Error::NotFound => StatusCode::NOT_FOUND,
            Error::MissingExpenseId => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!("An unexpected error occurred: {}", self);
        }

        // The underlying message is embedded for diagnostics. There is no
        // authentication, so nothing sensitive can leak here.
        let body = Json(json!({ "error": self.to_string() }));

        (status, body).into_response()
    }
}
