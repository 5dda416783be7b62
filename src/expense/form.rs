//! The form shared by the create and edit expense pages.

use maud::{Markup, html};
use serde::Deserialize;
use time::Date;

use crate::{
    Error,
    category::{Category, CategoryId},
    expense::{DEFAULT_PAYMENT_METHOD, Expense, ExpenseAmount, ExpenseBuilder},
    html::{FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE},
};

/// Suggestions offered for the payment method field.
pub const PAYMENT_METHODS: [&str; 5] = [
    DEFAULT_PAYMENT_METHOD,
    "Credit Card",
    "Debit Card",
    "Bank Transfer",
    "E-Wallet",
];

/// The form data for creating or replacing an expense.
///
/// Every field is optional so that a missing field is reported as a
/// validation error instead of a rejected request.
#[derive(Debug, Default, Deserialize)]
pub struct ExpenseForm {
    /// The amount spent.
    pub amount: Option<f64>,
    /// The category to file the expense under.
    pub category_id: Option<CategoryId>,
    /// When the money was spent.
    pub expense_date: Option<Date>,
    /// What the money was spent on.
    pub description: Option<String>,
    /// How the expense was paid for.
    pub payment_method: Option<String>,
}

impl ExpenseForm {
    /// Validate the form.
    ///
    /// A blank payment method is replaced with [DEFAULT_PAYMENT_METHOD].
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::MissingAmount] or [Error::InvalidAmount] for a missing or non-positive amount,
    /// - [Error::MissingCategory] if no category was chosen,
    /// - or [Error::MissingDate] if no date was given.
    pub fn into_builder(self) -> Result<ExpenseBuilder, Error> {
        let amount = ExpenseAmount::new(self.amount.ok_or(Error::MissingAmount)?)?;
        let category_id = self.category_id.ok_or(Error::MissingCategory)?;
        let expense_date = self.expense_date.ok_or(Error::MissingDate)?;

        let description = self.description.unwrap_or_default();
        let payment_method = self
            .payment_method
            .map(|method| method.trim().to_owned())
            .filter(|method| !method.is_empty())
            .unwrap_or_else(|| DEFAULT_PAYMENT_METHOD.to_owned());

        Ok(Expense::build(amount, category_id, expense_date)
            .description(description.trim())
            .payment_method(&payment_method))
    }
}

/// The values to pre-fill the expense form with.
pub struct ExpenseFormDefaults<'a> {
    /// The amount to show, empty for a new expense.
    pub amount: Option<f64>,
    /// The category to select, none for a new expense.
    pub category_id: Option<CategoryId>,
    /// The date to show.
    pub expense_date: Date,
    /// The description to show.
    pub description: Option<&'a str>,
    /// The payment method to show.
    pub payment_method: &'a str,
}

/// The inputs shared by the create and edit expense forms.
pub fn expense_form_fields(
    defaults: &ExpenseFormDefaults<'_>,
    available_categories: &[Category],
) -> Markup {
    let amount_str = defaults.amount.map(|amount| format!("{amount:.2}"));

    html! {
        div
        {
            label
                for="amount"
                class=(FORM_LABEL_STYLE)
            {
                "Amount"
            }

            input
                name="amount"
                id="amount"
                type="number"
                step="0.01"
                placeholder="0.00"
                min="0.01"
                required
                autofocus
                value=[amount_str.as_deref()]
                class=(FORM_TEXT_INPUT_STYLE);
        }

        div
        {
            label
                for="category_id"
                class=(FORM_LABEL_STYLE)
            {
                "Category"
            }

            select
                name="category_id"
                id="category_id"
                required
                class=(FORM_TEXT_INPUT_STYLE)
            {
                option value="" { "Select a category" }

                @for category in available_categories {
                    @let label = match &category.icon {
                        Some(icon) => format!("{icon} {}", category.name),
                        None => category.name.to_string(),
                    };

                    @if Some(category.id) == defaults.category_id {
                        option value=(category.id) selected { (label) }
                    } @else {
                        option value=(category.id) { (label) }
                    }
                }
            }
        }

        div
        {
            label
                for="expense_date"
                class=(FORM_LABEL_STYLE)
            {
                "Date"
            }

            input
                name="expense_date"
                id="expense_date"
                type="date"
                value=(defaults.expense_date)
                required
                class=(FORM_TEXT_INPUT_STYLE);
        }

        div
        {
            label
                for="description"
                class=(FORM_LABEL_STYLE)
            {
                "Description"
            }

            input
                name="description"
                id="description"
                type="text"
                placeholder="What was it for?"
                value=[defaults.description]
                class=(FORM_TEXT_INPUT_STYLE);
        }

        div
        {
            label
                for="payment_method"
                class=(FORM_LABEL_STYLE)
            {
                "Payment Method"
            }

            input
                name="payment_method"
                id="payment_method"
                type="text"
                list="payment-methods"
                value=(defaults.payment_method)
                class=(FORM_TEXT_INPUT_STYLE);

            datalist id="payment-methods"
            {
                @for method in PAYMENT_METHODS {
                    option value=(method) {}
                }
            }
        }
    }
}

#[cfg(test)]
mod expense_form_tests {
    use time::macros::date;

    use crate::{Error, expense::DEFAULT_PAYMENT_METHOD};

    use super::ExpenseForm;

    fn valid_form() -> ExpenseForm {
        ExpenseForm {
            amount: Some(85.0),
            category_id: Some(1),
            expense_date: Some(date!(2024 - 01 - 05)),
            description: Some("  Noodles ".to_owned()),
            payment_method: None,
        }
    }

    #[test]
    fn valid_form_defaults_payment_method() {
        let builder = valid_form().into_builder().expect("form should be valid");

        assert_eq!(builder.amount.as_f64(), 85.0);
        assert_eq!(builder.category_id, 1);
        assert_eq!(builder.description, "Noodles");
        assert_eq!(builder.payment_method, DEFAULT_PAYMENT_METHOD);
    }

    #[test]
    fn blank_payment_method_uses_default() {
        let form = ExpenseForm {
            payment_method: Some("   ".to_owned()),
            ..valid_form()
        };

        let builder = form.into_builder().unwrap();

        assert_eq!(builder.payment_method, DEFAULT_PAYMENT_METHOD);
    }

    #[test]
    fn missing_fields_are_reported() {
        let cases = [
            (
                ExpenseForm {
                    amount: None,
                    ..valid_form()
                },
                Error::MissingAmount,
            ),
            (
                ExpenseForm {
                    category_id: None,
                    ..valid_form()
                },
                Error::MissingCategory,
            ),
            (
                ExpenseForm {
                    expense_date: None,
                    ..valid_form()
                },
                Error::MissingDate,
            ),
            (
                ExpenseForm {
                    amount: Some(0.0),
                    ..valid_form()
                },
                Error::InvalidAmount(0.0),
            ),
        ];

        for (form, want) in cases {
            assert_eq!(form.into_builder(), Err(want));
        }
    }
}
