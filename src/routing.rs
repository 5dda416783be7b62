//! Application router configuration.

use axum::{
    Router,
    response::Redirect,
    routing::{delete, get, post},
};
use tower_http::services::ServeDir;

use crate::{
    AppState,
    category::{
        create_category_endpoint, delete_category_endpoint, get_categories_json,
        get_categories_page, get_new_category_page,
    },
    endpoints,
    expense::{
        create_expense_endpoint, delete_expense_endpoint, edit_expense_endpoint,
        get_create_expense_page, get_edit_expense_page, get_expenses_page,
    },
    internal_server_error::get_internal_server_error_page,
    not_found::get_404_not_found,
    report::{get_analytics_page, get_dashboard_page, get_summary_page},
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    let page_routes = Router::new()
        .route(endpoints::ROOT, get(get_index_page))
        .route(endpoints::DASHBOARD_VIEW, get(get_dashboard_page))
        .route(endpoints::EXPENSES_VIEW, get(get_expenses_page))
        .route(endpoints::NEW_EXPENSE_VIEW, get(get_create_expense_page))
        .route(endpoints::EDIT_EXPENSE_VIEW, get(get_edit_expense_page))
        .route(endpoints::SUMMARY_VIEW, get(get_summary_page))
        .route(endpoints::ANALYTICS_VIEW, get(get_analytics_page))
        .route(endpoints::CATEGORIES_VIEW, get(get_categories_page))
        .route(endpoints::NEW_CATEGORY_VIEW, get(get_new_category_page))
        .route(
            endpoints::INTERNAL_ERROR_VIEW,
            get(get_internal_server_error_page),
        );

    let api_routes = Router::new()
        .route(endpoints::EXPENSES_API, post(create_expense_endpoint))
        .route(
            endpoints::EXPENSE,
            delete(delete_expense_endpoint).put(edit_expense_endpoint),
        )
        .route(
            endpoints::CATEGORIES_API,
            get(get_categories_json).post(create_category_endpoint),
        )
        .route(endpoints::CATEGORY, delete(delete_category_endpoint));

    page_routes
        .merge(api_routes)
        .nest_service(endpoints::STATIC, ServeDir::new("static/"))
        .fallback(get_404_not_found)
        .with_state(state)
}

/// The root path '/' redirects to the expense list.
async fn get_index_page() -> Redirect {
    Redirect::to(endpoints::EXPENSES_VIEW)
}
