use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;
use serde_json::{json, Value};

use crate::cli::OutputFormat;
use crate::database::models::Expense;

/// Output a success message in the appropriate format
pub fn output_success(output_format: &OutputFormat, message: &str, data: Option<Value>) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({
                "success": true,
                "message": message
            });

            if let (Some(Value::Object(extra)), Some(object)) = (data, response.as_object_mut()) {
                object.extend(extra);
            }

            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            println!("✓ {}", message);
        }
    }
    Ok(())
}

/// Print any serializable value as pretty JSON.
pub fn output_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Two decimal places, e.g. `$12.50`.
pub fn format_amount(amount: Decimal) -> String {
    format!(
        "${:.2}",
        amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    )
}

/// `part` as a percentage of `total`, one decimal place. Zero when `total` is zero.
pub fn category_share(part: Decimal, total: Decimal) -> Decimal {
    if total.is_zero() {
        return Decimal::ZERO;
    }
    part.checked_mul(Decimal::ONE_HUNDRED)
        .and_then(|scaled| scaled.checked_div(total))
        .unwrap_or(Decimal::ZERO)
        .round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero)
}

/// Sum of the amounts shown on one page, `None` if it does not fit a `Decimal`.
pub fn page_total(expenses: &[Expense]) -> Option<Decimal> {
    expenses
        .iter()
        .try_fold(Decimal::ZERO, |sum, expense| sum.checked_add(expense.amount))
}

pub fn print_expense_table(expenses: &[Expense]) {
    println!(
        "{:<36}  {:<10}  {:>10}  {:<14}  {}",
        "ID", "DATE", "AMOUNT", "CATEGORY", "DESCRIPTION"
    );
    for expense in expenses {
        println!(
            "{:<36}  {:<10}  {:>10}  {:<14}  {}",
            expense.id,
            expense.date.format("%Y-%m-%d"),
            format_amount(expense.amount),
            expense.category,
            expense.description
        );
    }
}

pub fn print_expense(expense: &Expense) {
    println!("ID:          {}", expense.id);
    println!("Date:        {}", expense.date.format("%Y-%m-%d %H:%M"));
    println!("Amount:      {}", format_amount(expense.amount));
    println!("Category:    {}", expense.category);
    println!("Description: {}", expense.description);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::NewExpense;
    use chrono::Utc;
    use uuid::Uuid;

    #[test]
    fn amounts_have_two_places() {
        assert_eq!(format_amount(Decimal::new(125, 1)), "$12.50");
        assert_eq!(format_amount(Decimal::new(10005, 3)), "$10.01");
        assert_eq!(format_amount(Decimal::ZERO), "$0.00");
    }

    #[test]
    fn shares_are_percentages_of_total() {
        assert_eq!(category_share(Decimal::from(30), Decimal::from(60)), Decimal::from(50));
        assert_eq!(category_share(Decimal::from(1), Decimal::from(3)), Decimal::new(333, 1));
        assert_eq!(category_share(Decimal::from(5), Decimal::ZERO), Decimal::ZERO);
        assert_eq!(category_share(Decimal::MAX, Decimal::MAX), Decimal::ZERO);
    }

    fn expense(amount: Decimal) -> Expense {
        NewExpense {
            user: Uuid::nil(),
            amount,
            description: "item".to_string(),
            category: "Food".to_string(),
            date: Utc::now(),
        }
        .into_expense(Utc::now())
    }

    #[test]
    fn page_total_sums_without_panicking() {
        let page = vec![expense(Decimal::new(1050, 2)), expense(Decimal::from(2))];
        assert_eq!(page_total(&page), Some(Decimal::new(1250, 2)));
        assert_eq!(page_total(&[]), Some(Decimal::ZERO));

        let huge = vec![expense(Decimal::MAX), expense(Decimal::MAX)];
        assert_eq!(page_total(&huge), None);
    }
}
