//! Core category domain types.

use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::Error;

/// The colour given to categories created without one.
pub const DEFAULT_CATEGORY_COLOR: &str = "#C7CEEA";

/// The icon given to categories created through the web form without one.
pub const DEFAULT_CATEGORY_ICON: &str = "📌";

/// A validated, non-empty category name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct CategoryName(String);

impl CategoryName {
    /// Create a category name.
    ///
    /// Leading and trailing whitespace is removed.
    ///
    /// # Errors
    ///
    /// This function will return an [Error::EmptyCategoryName] if `name` is an empty string.
    pub fn new(name: &str) -> Result<Self, Error> {
        let name = name.trim();

        if name.is_empty() {
            Err(Error::EmptyCategoryName)
        } else {
            Ok(Self(name.to_string()))
        }
    }

    /// Create a category name without validation.
    ///
    /// The caller should ensure that the string is not empty.
    ///
    /// This function has `_unchecked` in the name but is not `unsafe`, because if the non-empty invariant is violated it will cause incorrect behaviour but not affect memory safety.
    pub fn new_unchecked(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl AsRef<str> for CategoryName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for CategoryName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CategoryName::new(s)
    }
}

impl Display for CategoryName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Database identifier for a category.
pub type CategoryId = i64;

/// A category that expenses are filed under (e.g., 'Food', 'Transport').
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct Category {
    /// The ID of the category.
    pub id: CategoryId,
    /// The unique name of the category.
    pub name: CategoryName,
    /// A CSS colour, e.g. "#FF6B6B".
    pub color: String,
    /// An emoji shown next to the name.
    pub icon: Option<String>,
    /// When the category was created.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// The data needed to create a category.
#[derive(Debug, Clone, PartialEq)]
pub struct NewCategory {
    /// The unique name of the category.
    pub name: CategoryName,
    /// A CSS colour, e.g. "#FF6B6B".
    pub color: String,
    /// An emoji shown next to the name.
    pub icon: Option<String>,
}

impl NewCategory {
    /// A new category with the default colour and no icon.
    pub fn new(name: CategoryName) -> Self {
        Self {
            name,
            color: DEFAULT_CATEGORY_COLOR.to_owned(),
            icon: None,
        }
    }

    /// Set the colour of the category.
    pub fn color(mut self, color: &str) -> Self {
        self.color = color.to_owned();
        self
    }

    /// Set the icon of the category.
    pub fn icon(mut self, icon: Option<&str>) -> Self {
        self.icon = icon.map(str::to_owned);
        self
    }
}

/// Form data for category creation.
///
/// Empty fields are parsed as `None`.
#[derive(Debug, Serialize, Deserialize)]
pub struct CategoryFormData {
    /// The name of the new category.
    pub name: String,
    /// A CSS colour, defaults to the colour of "Other".
    pub color: Option<String>,
    /// An emoji shown next to the name.
    pub icon: Option<String>,
}

impl CategoryFormData {
    /// Validate the form and fill in the default colour and icon.
    ///
    /// # Errors
    /// Returns [Error::EmptyCategoryName] if the name is blank.
    pub fn into_new_category(self) -> Result<NewCategory, Error> {
        let name = CategoryName::new(&self.name)?;
        let color = non_blank(self.color).unwrap_or_else(|| DEFAULT_CATEGORY_COLOR.to_owned());
        let icon = non_blank(self.icon).unwrap_or_else(|| DEFAULT_CATEGORY_ICON.to_owned());

        Ok(NewCategory::new(name).color(&color).icon(Some(&icon)))
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod category_name_tests {
    use crate::{Error, category::CategoryName};

    #[test]
    fn new_fails_on_empty_string() {
        let category_name = CategoryName::new("");

        assert_eq!(category_name, Err(Error::EmptyCategoryName));
    }

    #[test]
    fn new_fails_on_just_whitespace() {
        let category_name = CategoryName::new("\n\t \r");

        assert_eq!(category_name, Err(Error::EmptyCategoryName));
    }

    #[test]
    fn new_trims_whitespace() {
        let category_name = CategoryName::new("  Pets ").unwrap();

        assert_eq!(category_name.as_ref(), "Pets");
    }
}

#[cfg(test)]
mod category_form_tests {
    use crate::category::{
        CategoryName,
        domain::{CategoryFormData, DEFAULT_CATEGORY_COLOR, DEFAULT_CATEGORY_ICON},
    };

    #[test]
    fn fills_in_defaults() {
        let form = CategoryFormData {
            name: "Pets".to_owned(),
            color: None,
            icon: Some("   ".to_owned()),
        };

        let new_category = form.into_new_category().unwrap();

        assert_eq!(new_category.name, CategoryName::new_unchecked("Pets"));
        assert_eq!(new_category.color, DEFAULT_CATEGORY_COLOR);
        assert_eq!(new_category.icon.as_deref(), Some(DEFAULT_CATEGORY_ICON));
    }

    #[test]
    fn keeps_given_color_and_icon() {
        let form = CategoryFormData {
            name: "Pets".to_owned(),
            color: Some("#123456".to_owned()),
            icon: Some("🐶".to_owned()),
        };

        let new_category = form.into_new_category().unwrap();

        assert_eq!(new_category.color, "#123456");
        assert_eq!(new_category.icon.as_deref(), Some("🐶"));
    }
}
