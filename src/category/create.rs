//! Category creation page and endpoint.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::Form;
use axum_htmx::HxRedirect;
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    category::{
        create_category,
        domain::{CategoryFormData, DEFAULT_CATEGORY_COLOR, DEFAULT_CATEGORY_ICON},
    },
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, base,
    },
    navigation::NavBar,
};

/// The state needed for creating a category.
#[derive(Debug, Clone)]
pub struct CreateCategoryEndpointState {
    /// The database connection for managing categories.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateCategoryEndpointState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render the category creation page.
pub async fn get_new_category_page() -> Response {
    new_category_view().into_response()
}

/// Handle category creation form submission.
///
/// Redirects to the category list on success, otherwise responds with an
/// alert describing the problem.
pub async fn create_category_endpoint(
    State(state): State<CreateCategoryEndpointState>,
    Form(form): Form<CategoryFormData>,
) -> Response {
    let new_category = match form.into_new_category() {
        Ok(new_category) => new_category,
        Err(error) => return error.into_alert_response(),
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match create_category(new_category, &connection) {
        Ok(category) => {
            tracing::info!("Created category {} ({})", category.name, category.id);

            (
                HxRedirect(endpoints::CATEGORIES_VIEW.to_owned()),
                StatusCode::SEE_OTHER,
            )
                .into_response()
        }
        Err(error @ Error::DuplicateCategoryName(_)) => error.into_alert_response(),
        Err(error) => {
            tracing::error!("An unexpected error occurred while creating a category: {error}");

            error.into_alert_response()
        }
    }
}

fn new_category_view() -> Markup {
    let nav_bar = NavBar::new(endpoints::NEW_CATEGORY_VIEW).into_html();
    let form = new_category_form_view();

    let content = html! {
        (nav_bar)
        div class=(FORM_CONTAINER_STYLE) { (form) }
    };

    base("Create Category", &[], &content)
}

fn new_category_form_view() -> Markup {
    let create_category_endpoint = endpoints::CATEGORIES_API;

    html! {
        form
            hx-post=(create_category_endpoint)
            hx-target-error="#alert-container"
            class="w-full space-y-4 md:space-y-6"
        {
            div
            {
                label
                    for="name"
                    class=(FORM_LABEL_STYLE)
                {
                    "Category Name"
                }

                input
                    id="name"
                    type="text"
                    name="name"
                    placeholder="Category Name"
                    required
                    autofocus
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label
                    for="color"
                    class=(FORM_LABEL_STYLE)
                {
                    "Colour"
                }

                input
                    id="color"
                    type="color"
                    name="color"
                    value=(DEFAULT_CATEGORY_COLOR)
                    class="h-10 w-full cursor-pointer rounded";
            }

            div
            {
                label
                    for="icon"
                    class=(FORM_LABEL_STYLE)
                {
                    "Icon"
                }

                input
                    id="icon"
                    type="text"
                    name="icon"
                    placeholder=(DEFAULT_CATEGORY_ICON)
                    maxlength="8"
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Create Category" }
        }
    }
}

#[cfg(test)]
mod new_category_page_tests {
    use axum::http::StatusCode;

    use crate::{
        category::get_new_category_page,
        endpoints,
        test_utils::{
            assert_content_type, assert_form_input, assert_form_submit_button,
            assert_hx_endpoint, assert_valid_html, must_get_form, parse_html_document,
        },
    };

    #[tokio::test]
    async fn render_page() {
        let response = get_new_category_page().await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_content_type(&response, "text/html; charset=utf-8");

        let html = parse_html_document(response).await;
        assert_valid_html(&html);

        let form = must_get_form(&html);
        assert_hx_endpoint(&form, endpoints::CATEGORIES_API, "hx-post");
        assert_form_input(&form, "name", "text");
        assert_form_submit_button(&form);
    }
}

#[cfg(test)]
mod create_category_endpoint_tests {
    use std::sync::{Arc, Mutex};

    use axum::{extract::State, http::StatusCode, response::IntoResponse};
    use axum_extra::extract::Form;
    use rusqlite::Connection;

    use crate::{
        category::{
            create::CreateCategoryEndpointState, create_category_endpoint,
            domain::{CategoryFormData, DEFAULT_CATEGORY_COLOR, DEFAULT_CATEGORY_ICON},
            get_all_categories,
        },
        db::initialize,
        endpoints,
        test_utils::{assert_hx_redirect, assert_valid_html, parse_html_fragment},
    };

    fn get_category_state() -> CreateCategoryEndpointState {
        let connection =
            Connection::open_in_memory().expect("Could not open in-memory SQLite database");
        initialize(&connection).expect("Could not initialize database");

        CreateCategoryEndpointState {
            db_connection: Arc::new(Mutex::new(connection)),
        }
    }

    fn form(name: &str) -> CategoryFormData {
        CategoryFormData {
            name: name.to_owned(),
            color: None,
            icon: None,
        }
    }

    #[tokio::test]
    async fn can_create_category() {
        let state = get_category_state();

        let response = create_category_endpoint(State(state.clone()), Form(form("Pets")))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_hx_redirect(&response, endpoints::CATEGORIES_VIEW);

        let categories = get_all_categories(&state.db_connection.lock().unwrap()).unwrap();
        let pets = categories
            .iter()
            .find(|category| category.name.as_ref() == "Pets")
            .expect("new category not found");
        assert_eq!(pets.color, DEFAULT_CATEGORY_COLOR);
        assert_eq!(pets.icon.as_deref(), Some(DEFAULT_CATEGORY_ICON));
    }

    #[tokio::test]
    async fn create_category_fails_on_empty_name() {
        let state = get_category_state();

        let response = create_category_endpoint(State(state), Form(form("   ")))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let html = parse_html_fragment(response).await;
        assert_valid_html(&html);
    }

    #[tokio::test]
    async fn create_category_fails_on_duplicate_name() {
        let state = get_category_state();
        let want_count = get_all_categories(&state.db_connection.lock().unwrap())
            .unwrap()
            .len();

        let response = create_category_endpoint(State(state.clone()), Form(form("Food")))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::CONFLICT);
        let got_count = get_all_categories(&state.db_connection.lock().unwrap())
            .unwrap()
            .len();
        assert_eq!(got_count, want_count);
    }
}
