//! Categories that expenses are filed under.

mod api;
mod create;
mod db;
mod delete;
pub(crate) mod domain;
mod list;

pub use api::get_categories_json;
pub use create::{create_category_endpoint, get_new_category_page};
pub use db::{
    count_expenses_per_category, create_category, create_category_table, delete_category,
    get_all_categories, get_category, seed_categories,
};
pub use delete::delete_category_endpoint;
pub use domain::{Category, CategoryId, CategoryName, NewCategory};
pub use list::get_categories_page;
