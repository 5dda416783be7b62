//! Categories listing page.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    category::{Category, count_expenses_per_category, get_all_categories},
    endpoints,
    html::{
        LINK_STYLE, PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE,
        base, category_badge, delete_action_button,
    },
    navigation::NavBar,
};

/// The state needed for the categories listing page.
#[derive(Debug, Clone)]
pub struct CategoriesPageState {
    /// The database connection for reading categories and expense counts.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CategoriesPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A category with the number of expenses filed under it.
#[derive(Debug, Clone)]
struct CategoryRow {
    category: Category,
    expense_count: u32,
    delete_url: String,
}

/// Render the categories listing page with expense counts.
pub async fn get_categories_page(
    State(state): State<CategoriesPageState>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let categories = get_all_categories(&connection)
        .inspect_err(|error| tracing::error!("Failed to retrieve categories: {error}"))?;

    let expenses_per_category = count_expenses_per_category(&connection)
        .inspect_err(|error| tracing::error!("Could not count expenses per category: {error}"))?;

    let rows = categories
        .into_iter()
        .map(|category| CategoryRow {
            expense_count: *expenses_per_category.get(&category.id).unwrap_or(&0),
            delete_url: endpoints::format_endpoint(endpoints::CATEGORY, category.id),
            category,
        })
        .collect::<Vec<_>>();

    Ok(categories_view(&rows).into_response())
}

fn categories_view(rows: &[CategoryRow]) -> Markup {
    let new_category_route = endpoints::NEW_CATEGORY_VIEW;
    let nav_bar = NavBar::new(endpoints::CATEGORIES_VIEW).into_html();

    let table_row = |row: &CategoryRow| {
        let confirm_message = format!(
            "Are you sure you want to delete '{}'?",
            row.category.name
        );

        html!(
            tr class=(TABLE_ROW_STYLE) data-category-row="true"
            {
                td class=(TABLE_CELL_STYLE)
                {
                    (category_badge(
                        row.category.name.as_ref(),
                        &row.category.color,
                        row.category.icon.as_deref(),
                    ))
                }

                td class=(TABLE_CELL_STYLE)
                {
                    (row.expense_count)
                }

                td class=(TABLE_CELL_STYLE)
                {
                    @if row.expense_count == 0 {
                        (delete_action_button(
                            &row.delete_url,
                            &confirm_message,
                            "closest tr",
                            "delete",
                        ))
                    } @else {
                        span
                            class="text-gray-400 dark:text-gray-500"
                            title="Categories with expenses cannot be deleted"
                        {
                            "In use"
                        }
                    }
                }
            }
        )
    };

    let content = html!(
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="space-y-4 w-full lg:max-w-5xl"
            {
                header class="flex justify-between flex-wrap items-end"
                {
                    h1 class="text-xl font-bold" { "Categories" }

                    a href=(new_category_route) class=(LINK_STYLE)
                    {
                        "Create Category"
                    }
                }

                section class="dark:bg-gray-800 w-full"
                {
                    table class="w-full text-sm text-left rtl:text-right
                        text-gray-500 dark:text-gray-400"
                    {
                        thead class=(TABLE_HEADER_STYLE)
                        {
                            tr
                            {
                                th scope="col" class=(TABLE_CELL_STYLE)
                                {
                                    "Name"
                                }
                                th scope="col" class=(TABLE_CELL_STYLE)
                                {
                                    "Expenses"
                                }
                                th scope="col" class=(TABLE_CELL_STYLE)
                                {
                                    "Actions"
                                }
                            }
                        }

                        tbody
                        {
                            @for row in rows {
                                (table_row(row))
                            }

                            @if rows.is_empty() {
                                tr
                                {
                                    td
                                        colspan="3"
                                        class="px-6 py-4 text-center
                                            text-gray-500 dark:text-gray-400"
                                    {
                                        "No categories created yet. "
                                        a href=(new_category_route) class=(LINK_STYLE)
                                        {
                                            "Create your first category"
                                        }
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    );

    base("Categories", &[], &content)
}

#[cfg(test)]
mod categories_page_tests {
    use std::sync::{Arc, Mutex};

    use axum::{extract::State, http::StatusCode};
    use rusqlite::Connection;
    use scraper::{ElementRef, Html, Selector};
    use time::macros::date;

    use crate::{
        category::{CategoryName, create_category, domain::NewCategory, get_categories_page},
        db::initialize,
        endpoints,
        expense::{Expense, ExpenseAmount, create_expense},
        test_utils::{assert_valid_html, parse_html_document},
    };

    use super::CategoriesPageState;

    fn get_state() -> CategoriesPageState {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();

        CategoriesPageState {
            db_connection: Arc::new(Mutex::new(connection)),
        }
    }

    fn must_get_rows(html: &Html) -> Vec<ElementRef<'_>> {
        let selector = Selector::parse("tr[data-category-row]").unwrap();
        html.select(&selector).collect()
    }

    #[tokio::test]
    async fn lists_categories_by_name_with_counts() {
        let state = get_state();
        let pets_id = {
            let connection = state.db_connection.lock().unwrap();
            let pets = create_category(
                NewCategory::new(CategoryName::new_unchecked("Pets")),
                &connection,
            )
            .unwrap();
            create_expense(
                Expense::build(ExpenseAmount::new_unchecked(5.0), pets.id, date!(2024 - 01 - 05)),
                &connection,
            )
            .unwrap();
            pets.id
        };

        let response = get_categories_page(State(state)).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let html = parse_html_document(response).await;
        assert_valid_html(&html);

        let rows = must_get_rows(&html);
        assert_eq!(rows.len(), 9);

        let td = Selector::parse("td").unwrap();
        let names: Vec<String> = rows
            .iter()
            .map(|row| {
                row.select(&td)
                    .next()
                    .unwrap()
                    .text()
                    .collect::<String>()
                    .trim()
                    .to_owned()
            })
            .collect();
        assert!(names[0].ends_with("Education"), "got {names:?}");
        assert!(names[5].ends_with("Pets"), "got {names:?}");

        let pets_row = rows[5];
        let cells: Vec<_> = pets_row.select(&td).collect();
        assert_eq!(cells[1].text().collect::<String>().trim(), "1");

        let button = Selector::parse("button").unwrap();
        assert!(
            pets_row.select(&button).next().is_none(),
            "categories in use should not have a delete button"
        );

        let delete_url = endpoints::format_endpoint(endpoints::CATEGORY, pets_id);
        let unused_row = rows[0];
        let got_delete_url = unused_row
            .select(&button)
            .next()
            .expect("unused category should have a delete button")
            .attr("hx-delete")
            .unwrap();
        assert_ne!(got_delete_url, delete_url);
    }
}
