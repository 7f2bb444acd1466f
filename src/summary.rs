use std::collections::HashMap;

use crate::model::Expense;

/// Totals derived from the current ledger snapshot. Never stored;
/// recomputed from the full record list on every read.
#[derive(Clone, PartialEq, Debug, Default)]
pub struct SpendingSummary {
    pub total: f64,
    pub count: usize,
    pub average: f64,
    pub by_category: Vec<(String, f64)>,
}

/// Sums the snapshot into per-category totals, a grand total, the
/// transaction count, and the average. No rounding happens here,
/// display formatting is the view's business.
pub fn summarize(expenses: &[Expense]) -> SpendingSummary {
    let mut totals: HashMap<String, f64> = HashMap::new();
    let mut total = 0.0;

    for expense in expenses {
        *totals.entry(expense.category.clone()).or_insert(0.0) += expense.amount;
        total += expense.amount;
    }

    let count = expenses.len();
    let average = if count > 0 { total / count as f64 } else { 0.0 };

    let mut by_category: Vec<(String, f64)> = totals.into_iter().collect();
    by_category.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

    SpendingSummary {
        total,
        count,
        average,
        by_category,
    }
}

#[cfg(test)]
mod tests {
    use super::summarize;
    use crate::model::Expense;

    fn expense(amount: f64, category: &str) -> Expense {
        Expense {
            id: 0,
            amount,
            category: category.to_string(),
            description: None,
            date: "2025-09-27".to_string(),
            flag: None,
        }
    }

    #[test]
    fn empty_ledger_summarizes_to_zeros() {
        let summary = summarize(&[]);

        assert_eq!(summary.total, 0.0);
        assert_eq!(summary.count, 0);
        assert_eq!(summary.average, 0.0);
        assert!(summary.by_category.is_empty());
    }

    #[test]
    fn grand_total_matches_both_the_records_and_the_category_totals() {
        let expenses = vec![
            expense(250.0, "Food"),
            expense(1200.5, "Shopping"),
            expense(150.0, "Transport"),
            expense(49.5, "Food"),
        ];

        let summary = summarize(&expenses);

        let record_sum: f64 = expenses.iter().map(|e| e.amount).sum();
        let category_sum: f64 = summary.by_category.iter().map(|(_, v)| v).sum();

        assert_eq!(summary.total, record_sum);
        assert_eq!(summary.total, category_sum);
        assert_eq!(summary.count, 4);
        assert_eq!(summary.average, record_sum / 4.0);
    }

    #[test]
    fn single_expense_summary() {
        let summary = summarize(&[expense(250.50, "Food")]);

        assert_eq!(summary.total, 250.50);
        assert_eq!(summary.count, 1);
        assert_eq!(summary.average, 250.50);
        assert_eq!(summary.by_category, vec![("Food".to_string(), 250.50)]);
    }

    #[test]
    fn categories_are_ordered_by_descending_total() {
        let expenses = vec![
            expense(10.0, "Health"),
            expense(500.0, "Shopping"),
            expense(90.0, "Food"),
            expense(60.0, "Food"),
        ];

        let summary = summarize(&expenses);

        assert_eq!(summary.by_category[0].0, "Shopping");
        assert_eq!(summary.by_category[1], ("Food".to_string(), 150.0));
        assert_eq!(summary.by_category[2].0, "Health");
    }

    #[test]
    fn negative_amounts_flow_through_unchanged() {
        let summary = summarize(&[expense(100.0, "Food"), expense(-40.0, "Food")]);

        assert_eq!(summary.total, 60.0);
        assert_eq!(summary.by_category, vec![("Food".to_string(), 60.0)]);
    }
}
