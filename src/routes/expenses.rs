//! Route handlers for the expense REST API.
//!
//! Outcomes map onto status codes as follows: absence of the requested
//! record is 404, a missing required ID is 400, and any storage-engine fault
//! is 500 with the underlying message embedded in the JSON error body.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};

use crate::{
    AppState, Error,
    models::{Category, Currency, Expense, ExpenseUpdate, Participant, iso_date},
    stores::ExpenseStore,
};

/// The response body for endpoints that return the full expense list.
#[derive(Debug, Serialize, Deserialize)]
pub struct ExpenseListResponse {
    /// Every stored expense, newest ledger date first.
    pub expenses: Vec<Expense>,
}

/// The response body for endpoints that return a single expense.
#[derive(Debug, Serialize, Deserialize)]
pub struct ExpenseResponse {
    /// The requested or just-mutated expense.
    pub expense: Expense,
}

/// The response body for successful deletions.
#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteResponse {
    /// Always true; failures use the error body instead.
    pub success: bool,
}

/// The request body for creating an expense.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateExpenseRequest {
    /// Optional caller-supplied ID. When absent (or empty) the server
    /// derives one from the current Unix time in milliseconds.
    #[serde(default)]
    pub id: Option<String>,
    /// Free-text label.
    pub description: String,
    /// The amount in `currency`.
    pub amount: f64,
    /// The native currency of the amount.
    pub currency: Currency,
    /// Which household member fronted the money.
    pub paid_by: Participant,
    /// Which category the expense is filed under.
    pub category: Category,
    /// The ledger date.
    #[serde(with = "iso_date")]
    pub date: Date,
    /// The settlement flag; defaults to false.
    #[serde(default)]
    pub is_paid: Option<bool>,
}

/// The request body for the collection-level update endpoint, which carries
/// the target ID alongside the partial fields.
#[derive(Debug, Serialize, Deserialize)]
pub struct UpdateExpenseRequest {
    /// The ID of the expense to update.
    #[serde(default)]
    pub id: Option<String>,
    /// The fields to merge onto the stored record.
    #[serde(flatten)]
    pub update: ExpenseUpdate,
}

/// The query parameters for the collection-level delete endpoint.
#[derive(Debug, Deserialize)]
pub struct DeleteExpenseParams {
    /// The ID of the expense to delete.
    #[serde(default)]
    pub id: Option<String>,
}

/// A route handler for listing every expense.
///
/// # Errors
/// Returns a 500 response if the store fails.
pub async fn get_expenses<E>(
    State(state): State<AppState<E>>,
) -> Result<Json<ExpenseListResponse>, Error>
where
    E: ExpenseStore + Clone + Send + Sync + 'static,
{
    let expenses = state.expense_store.get_all()?;

    Ok(Json(ExpenseListResponse { expenses }))
}

/// A route handler for creating a new expense.
///
/// Responds with 201 and the stored record. A clashing ID surfaces as a
/// storage fault (500), mirroring the engine-enforced uniqueness contract.
pub async fn create_expense<E>(
    State(state): State<AppState<E>>,
    Json(data): Json<CreateExpenseRequest>,
) -> Result<(StatusCode, Json<ExpenseResponse>), Error>
where
    E: ExpenseStore + Clone + Send + Sync + 'static,
{
    let id = match data.id {
        Some(id) if !id.is_empty() => id,
        _ => {
            let unix_millis = OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000;
            unix_millis.to_string()
        }
    };

    let expense = Expense {
        id,
        description: data.description,
        amount: data.amount,
        currency: data.currency,
        paid_by: data.paid_by,
        category: data.category,
        date: data.date,
        is_paid: data.is_paid.unwrap_or(false),
    };

    let mut store = state.expense_store;
    let created = store.insert(expense)?;

    Ok((StatusCode::CREATED, Json(ExpenseResponse { expense: created })))
}

/// A route handler for the collection-level partial update, where the target
/// ID travels in the request body.
///
/// # Errors
/// Responds with 400 if the body has no ID, 404 if no expense matches it.
pub async fn update_expenses<E>(
    State(state): State<AppState<E>>,
    Json(data): Json<UpdateExpenseRequest>,
) -> Result<Json<ExpenseResponse>, Error>
where
    E: ExpenseStore + Clone + Send + Sync + 'static,
{
    let id = data.id.ok_or(Error::MissingExpenseId)?;

    let mut store = state.expense_store;
    let expense = store.update(&id, data.update)?.ok_or(Error::NotFound)?;

    Ok(Json(ExpenseResponse { expense }))
}

/// A route handler for the collection-level delete, where the target ID
/// travels as a query parameter.
///
/// # Errors
/// Responds with 400 if the `id` parameter is missing, 404 if no expense
/// matches it.
pub async fn delete_expenses<E>(
    State(state): State<AppState<E>>,
    Query(params): Query<DeleteExpenseParams>,
) -> Result<Json<DeleteResponse>, Error>
where
    E: ExpenseStore + Clone + Send + Sync + 'static,
{
    let id = params.id.ok_or(Error::MissingExpenseId)?;

    let mut store = state.expense_store;
    if !store.delete(&id)? {
        return Err(Error::NotFound);
    }

    Ok(Json(DeleteResponse { success: true }))
}

/// A route handler for fetching a single expense by its ID.
///
/// # Errors
/// Responds with 404 if no expense matches the ID.
pub async fn get_expense<E>(
    State(state): State<AppState<E>>,
    Path(expense_id): Path<String>,
) -> Result<Json<ExpenseResponse>, Error>
where
    E: ExpenseStore + Clone + Send + Sync + 'static,
{
    let expense = state
        .expense_store
        .get(&expense_id)?
        .ok_or(Error::NotFound)?;

    Ok(Json(ExpenseResponse { expense }))
}

/// A route handler for partially updating a single expense by its ID.
///
/// # Errors
/// Responds with 404 if no expense matches the ID.
pub async fn update_expense<E>(
    State(state): State<AppState<E>>,
    Path(expense_id): Path<String>,
    Json(update): Json<ExpenseUpdate>,
) -> Result<Json<ExpenseResponse>, Error>
where
    E: ExpenseStore + Clone + Send + Sync + 'static,
{
    let mut store = state.expense_store;
    let expense = store.update(&expense_id, update)?.ok_or(Error::NotFound)?;

    Ok(Json(ExpenseResponse { expense }))
}

/// A route handler for deleting a single expense by its ID.
///
/// # Errors
/// Responds with 404 if no expense matches the ID.
pub async fn delete_expense<E>(
    State(state): State<AppState<E>>,
    Path(expense_id): Path<String>,
) -> Result<Json<DeleteResponse>, Error>
where
    E: ExpenseStore + Clone + Send + Sync + 'static,
{
    let mut store = state.expense_store;
    if !store.delete(&expense_id)? {
        return Err(Error::NotFound);
    }

    Ok(Json(DeleteResponse { success: true }))
}

/// A route handler for flipping an expense's settlement flag.
///
/// # Errors
/// Responds with 404 if no expense matches the ID.
pub async fn toggle_expense_paid<E>(
    State(state): State<AppState<E>>,
    Path(expense_id): Path<String>,
) -> Result<Json<ExpenseResponse>, Error>
where
    E: ExpenseStore + Clone + Send + Sync + 'static,
{
    let mut store = state.expense_store;
    let expense = store.toggle_paid(&expense_id)?.ok_or(Error::NotFound)?;

    Ok(Json(ExpenseResponse { expense }))
}

#[cfg(test)]
mod expense_route_tests {
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use rusqlite::Connection;
    use serde_json::json;

    use crate::{build_router, create_app_state, endpoints, endpoints::format_endpoint};

    use super::{DeleteResponse, ExpenseListResponse, ExpenseResponse};

    fn test_server() -> TestServer {
        let connection = Connection::open_in_memory().expect("Could not open database in memory.");
        let state = create_app_state(connection).expect("Could not create app state.");

        TestServer::new(build_router(state))
    }

    fn groceries_body() -> serde_json::Value {
        json!({
            "id": "x1",
            "description": "スーパーで買い物",
            "amount": 3500.0,
            "currency": "YEN",
            "paidBy": "Ron",
            "category": "food",
            "date": "2026-02-10",
            "isPaid": false,
        })
    }

    #[tokio::test]
    async fn list_is_empty_on_a_fresh_database() {
        let server = test_server();

        let response = server.get(endpoints::EXPENSES).await;

        response.assert_status_ok();
        let body = response.json::<ExpenseListResponse>();
        assert!(body.expenses.is_empty());
    }

    #[tokio::test]
    async fn create_responds_with_201_and_the_stored_expense() {
        let server = test_server();

        let response = server.post(endpoints::EXPENSES).json(&groceries_body()).await;

        response.assert_status(StatusCode::CREATED);
        let body = response.json::<ExpenseResponse>();
        assert_eq!(body.expense.id, "x1");
        assert_eq!(body.expense.description, "スーパーで買い物");
        assert_eq!(body.expense.amount, 3500.0);
        assert!(!body.expense.is_paid);
    }

    #[tokio::test]
    async fn create_without_id_derives_one_from_the_clock() {
        let server = test_server();
        let mut body = groceries_body();
        body.as_object_mut().unwrap().remove("id");

        let response = server.post(endpoints::EXPENSES).json(&body).await;

        response.assert_status(StatusCode::CREATED);
        let created = response.json::<ExpenseResponse>().expense;
        assert!(!created.id.is_empty());
        assert!(
            created.id.chars().all(|c| c.is_ascii_digit()),
            "derived ID {} should be a millisecond timestamp",
            created.id
        );
    }

    #[tokio::test]
    async fn create_defaults_is_paid_to_false() {
        let server = test_server();
        let mut body = groceries_body();
        body.as_object_mut().unwrap().remove("isPaid");

        let response = server.post(endpoints::EXPENSES).json(&body).await;

        response.assert_status(StatusCode::CREATED);
        assert!(!response.json::<ExpenseResponse>().expense.is_paid);
    }

    #[tokio::test]
    async fn create_with_duplicate_id_is_a_storage_fault() {
        let server = test_server();
        server.post(endpoints::EXPENSES).json(&groceries_body()).await;

        let response = server.post(endpoints::EXPENSES).json(&groceries_body()).await;

        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn get_by_id_round_trips_the_created_expense() {
        let server = test_server();
        let created = server
            .post(endpoints::EXPENSES)
            .json(&groceries_body())
            .await
            .json::<ExpenseResponse>()
            .expense;

        let response = server.get(&format_endpoint(endpoints::EXPENSE, "x1")).await;

        response.assert_status_ok();
        assert_eq!(response.json::<ExpenseResponse>().expense, created);
    }

    #[tokio::test]
    async fn get_by_unknown_id_responds_with_404() {
        let server = test_server();

        let response = server
            .get(&format_endpoint(endpoints::EXPENSE, "missing"))
            .await;

        response.assert_status_not_found();
    }

    #[tokio::test]
    async fn list_orders_by_date_descending() {
        let server = test_server();
        for (id, date) in [("a", "2026-02-01"), ("b", "2026-02-14"), ("c", "2026-02-08")] {
            let mut body = groceries_body();
            body["id"] = json!(id);
            body["date"] = json!(date);
            server.post(endpoints::EXPENSES).json(&body).await;
        }

        let response = server.get(endpoints::EXPENSES).await;

        let ids: Vec<String> = response
            .json::<ExpenseListResponse>()
            .expenses
            .into_iter()
            .map(|expense| expense.id)
            .collect();
        assert_eq!(ids, vec!["b", "c", "a"]);
    }

    #[tokio::test]
    async fn collection_put_updates_only_the_supplied_fields() {
        let server = test_server();
        server.post(endpoints::EXPENSES).json(&groceries_body()).await;

        let response = server
            .put(endpoints::EXPENSES)
            .json(&json!({ "id": "x1", "amount": 4200.0 }))
            .await;

        response.assert_status_ok();
        let updated = response.json::<ExpenseResponse>().expense;
        assert_eq!(updated.amount, 4200.0);
        assert_eq!(updated.description, "スーパーで買い物");
    }

    #[tokio::test]
    async fn collection_put_without_id_responds_with_400() {
        let server = test_server();

        let response = server
            .put(endpoints::EXPENSES)
            .json(&json!({ "amount": 4200.0 }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn collection_put_with_unknown_id_responds_with_404() {
        let server = test_server();

        let response = server
            .put(endpoints::EXPENSES)
            .json(&json!({ "id": "missing", "amount": 1.0 }))
            .await;

        response.assert_status_not_found();
    }

    #[tokio::test]
    async fn item_put_updates_the_expense() {
        let server = test_server();
        server.post(endpoints::EXPENSES).json(&groceries_body()).await;

        let response = server
            .put(&format_endpoint(endpoints::EXPENSE, "x1"))
            .json(&json!({ "paidBy": "Jin", "currency": "WON" }))
            .await;

        response.assert_status_ok();
        let updated = response.json::<ExpenseResponse>().expense;
        assert_eq!(updated.paid_by, crate::models::Participant::Jin);
        assert_eq!(updated.currency, crate::models::Currency::Won);
        assert_eq!(updated.amount, 3500.0);
    }

    #[tokio::test]
    async fn item_put_with_unknown_id_responds_with_404() {
        let server = test_server();

        let response = server
            .put(&format_endpoint(endpoints::EXPENSE, "missing"))
            .json(&json!({ "amount": 1.0 }))
            .await;

        response.assert_status_not_found();
    }

    #[tokio::test]
    async fn collection_delete_removes_the_expense() {
        let server = test_server();
        server.post(endpoints::EXPENSES).json(&groceries_body()).await;

        let response = server
            .delete(endpoints::EXPENSES)
            .add_query_param("id", "x1")
            .await;

        response.assert_status_ok();
        assert!(response.json::<DeleteResponse>().success);

        server
            .get(&format_endpoint(endpoints::EXPENSE, "x1"))
            .await
            .assert_status_not_found();
    }

    #[tokio::test]
    async fn collection_delete_without_id_responds_with_400() {
        let server = test_server();

        let response = server.delete(endpoints::EXPENSES).await;

        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn collection_delete_with_unknown_id_responds_with_404() {
        let server = test_server();

        let response = server
            .delete(endpoints::EXPENSES)
            .add_query_param("id", "missing")
            .await;

        response.assert_status_not_found();
    }

    #[tokio::test]
    async fn item_delete_removes_the_expense() {
        let server = test_server();
        server.post(endpoints::EXPENSES).json(&groceries_body()).await;

        let response = server
            .delete(&format_endpoint(endpoints::EXPENSE, "x1"))
            .await;

        response.assert_status_ok();
        assert!(response.json::<DeleteResponse>().success);
    }

    #[tokio::test]
    async fn item_delete_with_unknown_id_responds_with_404() {
        let server = test_server();

        let response = server
            .delete(&format_endpoint(endpoints::EXPENSE, "missing"))
            .await;

        response.assert_status_not_found();
    }

    #[tokio::test]
    async fn toggle_flips_the_settlement_flag() {
        let server = test_server();
        server.post(endpoints::EXPENSES).json(&groceries_body()).await;

        let response = server
            .post(&format_endpoint(endpoints::EXPENSE_TOGGLE, "x1"))
            .await;

        response.assert_status_ok();
        assert!(response.json::<ExpenseResponse>().expense.is_paid);
    }

    #[tokio::test]
    async fn toggling_twice_restores_the_original_flag() {
        let server = test_server();
        server.post(endpoints::EXPENSES).json(&groceries_body()).await;
        let toggle_path = format_endpoint(endpoints::EXPENSE_TOGGLE, "x1");

        server.post(&toggle_path).await;
        let response = server.post(&toggle_path).await;

        response.assert_status_ok();
        assert!(!response.json::<ExpenseResponse>().expense.is_paid);
    }

    #[tokio::test]
    async fn toggle_with_unknown_id_responds_with_404() {
        let server = test_server();

        let response = server
            .post(&format_endpoint(endpoints::EXPENSE_TOGGLE, "missing"))
            .await;

        response.assert_status_not_found();
    }

    #[tokio::test]
    async fn error_bodies_carry_a_human_readable_message() {
        let server = test_server();

        let response = server
            .get(&format_endpoint(endpoints::EXPENSE, "missing"))
            .await;

        let body = response.json::<serde_json::Value>();
        assert!(body["error"].as_str().unwrap().contains("could not be found"));
    }
}
