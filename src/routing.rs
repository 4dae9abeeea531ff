//! Application router configuration.

use axum::{
    Router,
    response::Redirect,
    routing::{get, post, put},
};

use crate::{
    AppState,
    dashboard::get_dashboard_page,
    endpoints,
    internal_server_error::get_internal_server_error_page,
    not_found::get_404_not_found,
    transaction::{
        create_transaction_endpoint, delete_transaction_endpoint, edit_transaction_endpoint,
        get_edit_transaction_page, get_expenses_list, get_expenses_page, get_incomes_list,
        get_incomes_page, get_new_expense_page, get_new_income_page,
    },
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    let page_routes = Router::new()
        .route(endpoints::ROOT, get(get_index_page))
        .route(endpoints::DASHBOARD_VIEW, get(get_dashboard_page))
        .route(endpoints::EXPENSES_VIEW, get(get_expenses_page))
        .route(endpoints::EXPENSES_LIST, get(get_expenses_list))
        .route(endpoints::NEW_EXPENSE_VIEW, get(get_new_expense_page))
        .route(endpoints::INCOMES_VIEW, get(get_incomes_page))
        .route(endpoints::INCOMES_LIST, get(get_incomes_list))
        .route(endpoints::NEW_INCOME_VIEW, get(get_new_income_page))
        .route(
            endpoints::EDIT_TRANSACTION_VIEW,
            get(get_edit_transaction_page),
        )
        .route(
            endpoints::INTERNAL_ERROR_VIEW,
            get(get_internal_server_error_page),
        );

    // These routes are called by HTMX and respond with alerts or an HX-REDIRECT header.
    let api_routes = Router::new()
        .route(
            endpoints::TRANSACTIONS_API,
            post(create_transaction_endpoint),
        )
        .route(
            endpoints::TRANSACTION,
            put(edit_transaction_endpoint).delete(delete_transaction_endpoint),
        );

    page_routes
        .merge(api_routes)
        .fallback(get_404_not_found)
        .with_state(state)
}

/// The root path '/' redirects to the dashboard page.
async fn get_index_page() -> Redirect {
    Redirect::to(endpoints::DASHBOARD_VIEW)
}

#[cfg(test)]
mod root_route_tests {
    use axum::{http::StatusCode, response::IntoResponse};

    use crate::{endpoints, routing::get_index_page};

    #[tokio::test]
    async fn root_redirects_to_dashboard() {
        let response = get_index_page().await.into_response();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);

        let location = response.headers().get("location").unwrap();
        assert_eq!(location, endpoints::DASHBOARD_VIEW);
    }
}
