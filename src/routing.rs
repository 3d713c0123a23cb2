//! Application router configuration mapping endpoint URIs to route handlers.

use axum::{
    Router, middleware,
    routing::{get, post},
};

use crate::{
    AppState, endpoints,
    logging::logging_middleware,
    routes::expenses::{
        create_expense, delete_expense, delete_expenses, get_expense, get_expenses,
        toggle_expense_paid, update_expense, update_expenses,
    },
    stores::ExpenseStore,
};

/// Return a router with all the app's routes.
pub fn build_router<E>(state: AppState<E>) -> Router
where
    E: ExpenseStore + Clone + Send + Sync + 'static,
{
    Router::new()
        .route(
            endpoints::EXPENSES,
            get(get_expenses)
                .post(create_expense)
                .put(update_expenses)
                .delete(delete_expenses),
        )
        .route(
            endpoints::EXPENSE,
            get(get_expense).put(update_expense).delete(delete_expense),
        )
        .route(endpoints::EXPENSE_TOGGLE, post(toggle_expense_paid))
        .layer(middleware::from_fn(logging_middleware))
        .with_state(state)
}
