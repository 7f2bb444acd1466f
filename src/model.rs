use serde::{Deserialize, Serialize};

/// The closed set of categories the backend accepts.
pub const CATEGORIES: [&str; 7] = [
    "Food",
    "Transport",
    "Shopping",
    "Utilities",
    "Entertainment",
    "Health",
    "Other",
];

/// User-set marker on an expense: green for a good spend, red for a
/// concerning one. An unflagged expense carries `None`; flags are set
/// but never cleared.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Flag {
    Green,
    Red,
}

/// One expense record as the server returns it. The id is assigned by
/// the server and never changes.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct Expense {
    pub id: i64,
    pub amount: f64,
    pub category: String,
    #[serde(default)]
    pub description: Option<String>,
    pub date: String,
    #[serde(default)]
    pub flag: Option<Flag>,
}

impl Expense {
    pub fn description_text(&self) -> &str {
        self.description.as_deref().unwrap_or("")
    }
}

/// The editable fields of an expense, validated and ready to submit as
/// the create/edit request body.
#[derive(Clone, PartialEq, Debug, Serialize)]
pub struct ExpenseDraft {
    pub amount: f64,
    pub category: String,
    pub description: String,
    pub date: String,
}

impl ExpenseDraft {
    /// Builds a draft from raw form input. Category and date are
    /// required and the amount must be numeric; description is
    /// optional. The amount's sign is not checked here, the server has
    /// the final say.
    pub fn parse(
        amount: &str,
        category: &str,
        description: &str,
        date: &str,
    ) -> Result<Self, String> {
        let amount: f64 = amount
            .trim()
            .parse()
            .map_err(|_| "Please enter a valid amount.".to_string())?;

        let category = category.trim();
        if category.is_empty() {
            return Err("Please select a category.".to_string());
        }

        let date = date.trim();
        if date.is_empty() {
            return Err("Please pick a date.".to_string());
        }

        Ok(Self {
            amount,
            category: category.to_string(),
            description: description.trim().to_string(),
            date: date.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{Expense, ExpenseDraft, Flag};

    #[test]
    fn draft_parse_accepts_complete_input() {
        let draft = ExpenseDraft::parse("250.50", "Food", "Lunch", "2024-03-01").unwrap();

        assert_eq!(draft.amount, 250.50);
        assert_eq!(draft.category, "Food");
        assert_eq!(draft.description, "Lunch");
        assert_eq!(draft.date, "2024-03-01");
    }

    #[test]
    fn draft_parse_allows_empty_description() {
        let draft = ExpenseDraft::parse("10", "Transport", "", "2024-03-01").unwrap();
        assert_eq!(draft.description, "");
    }

    #[test]
    fn draft_parse_allows_negative_amounts() {
        // Refund-style entries are not rejected client-side.
        let draft = ExpenseDraft::parse("-42.00", "Shopping", "Return", "2024-03-02").unwrap();
        assert_eq!(draft.amount, -42.0);
    }

    #[test]
    fn draft_parse_rejects_non_numeric_amount() {
        let result = ExpenseDraft::parse("abc", "Food", "", "2024-03-01");
        assert_eq!(result, Err("Please enter a valid amount.".to_string()));
    }

    #[test]
    fn draft_parse_rejects_missing_category() {
        let result = ExpenseDraft::parse("10", "  ", "", "2024-03-01");
        assert_eq!(result, Err("Please select a category.".to_string()));
    }

    #[test]
    fn draft_parse_rejects_missing_date() {
        let result = ExpenseDraft::parse("10", "Food", "", "");
        assert_eq!(result, Err("Please pick a date.".to_string()));
    }

    #[test]
    fn expense_deserializes_server_payload() {
        let raw = r#"{
            "id": 2,
            "amount": 1200.5,
            "category": "Shopping",
            "description": "New headphones",
            "date": "2025-09-26",
            "flag": "red"
        }"#;

        let expense: Expense = serde_json::from_str(raw).unwrap();

        assert_eq!(expense.id, 2);
        assert_eq!(expense.amount, 1200.5);
        assert_eq!(expense.flag, Some(Flag::Red));
    }

    #[test]
    fn expense_tolerates_missing_optional_fields() {
        let raw = r#"{"id": 1, "amount": 250.0, "category": "Food", "date": "2025-09-27"}"#;

        let expense: Expense = serde_json::from_str(raw).unwrap();

        assert_eq!(expense.description, None);
        assert_eq!(expense.description_text(), "");
        assert_eq!(expense.flag, None);
    }
}
