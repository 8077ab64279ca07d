use std::str::FromStr;

use clap::Subcommand;
use rust_decimal::Decimal;
use uuid::Uuid;

use super::{authenticated_client, parse_date_arg};
use crate::cli::config::load_session;
use crate::cli::utils::{
    format_amount, output_json, output_success, page_total, print_expense, print_expense_table,
};
use crate::cli::OutputFormat;
use crate::client::{ExpenseFilters, ExpenseInput, ExpenseState, ExpenseUpdate};

#[derive(Subcommand)]
pub enum ExpenseCommands {
    #[command(about = "List expenses, newest first")]
    List {
        #[arg(long, default_value_t = 1, help = "Page number")]
        page: i64,
        #[arg(long, help = "Only this category (`all` for every category)")]
        category: Option<String>,
        #[arg(long, help = "Earliest date, inclusive")]
        start_date: Option<String>,
        #[arg(long, help = "Latest date, inclusive")]
        end_date: Option<String>,
    },

    #[command(about = "Show one expense")]
    Show {
        #[arg(help = "Expense id")]
        id: Uuid,
    },

    #[command(about = "Record a new expense")]
    Add {
        #[arg(help = "Amount, e.g. 12.50")]
        amount: String,
        #[arg(help = "Description")]
        description: String,
        #[arg(long, short, help = "Category")]
        category: String,
        #[arg(long, help = "Date (defaults to now)")]
        date: Option<String>,
    },

    #[command(about = "Change fields of an expense")]
    Update {
        #[arg(help = "Expense id")]
        id: Uuid,
        #[arg(long)]
        amount: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long, short)]
        category: Option<String>,
        #[arg(long)]
        date: Option<String>,
    },

    #[command(about = "Delete an expense")]
    Delete {
        #[arg(help = "Expense id")]
        id: Uuid,
    },
}

fn parse_amount(raw: &str) -> anyhow::Result<Decimal> {
    Decimal::from_str(raw.trim()).map_err(|_| anyhow::anyhow!("Invalid amount: {}", raw))
}

fn report(output_format: &OutputFormat, banner: crate::client::Banner) -> anyhow::Result<()> {
    if !banner.success {
        anyhow::bail!(banner.message);
    }
    output_success(output_format, &banner.message, None)
}

pub async fn handle(cmd: ExpenseCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    let session = load_session()?;
    let client = authenticated_client(&session)?;

    match cmd {
        ExpenseCommands::List {
            page,
            category,
            start_date,
            end_date,
        } => {
            let mut state = ExpenseState::new(client);
            state
                .fetch_expenses(
                    page,
                    ExpenseFilters {
                        category,
                        start_date,
                        end_date,
                    },
                )
                .await?;

            match output_format {
                OutputFormat::Json => output_json(&serde_json::json!({
                    "expenses": state.expenses(),
                    "currentPage": state.current_page(),
                    "totalPages": state.total_pages(),
                    "total": state.total(),
                })),
                OutputFormat::Text => {
                    if state.expenses().is_empty() {
                        println!("No expenses found");
                    } else {
                        print_expense_table(state.expenses());
                        let page_sum = page_total(state.expenses())
                            .map(format_amount)
                            .unwrap_or_else(|| "too much to total".to_string());
                        println!();
                        println!(
                            "Page {} of {} ({} expenses, {} on this page)",
                            state.current_page(),
                            state.total_pages(),
                            state.total(),
                            page_sum
                        );
                    }
                    Ok(())
                }
            }
        }
        ExpenseCommands::Show { id } => {
            let expense = client.get_expense(id).await?;
            match output_format {
                OutputFormat::Json => output_json(&expense),
                OutputFormat::Text => {
                    print_expense(&expense);
                    Ok(())
                }
            }
        }
        ExpenseCommands::Add {
            amount,
            description,
            category,
            date,
        } => {
            let input = ExpenseInput {
                amount: parse_amount(&amount)?,
                description,
                category,
                date: date.as_deref().map(parse_date_arg).transpose()?,
            };
            let mut state = ExpenseState::new(client);
            let banner = state.add_expense(&input).await;
            report(&output_format, banner)
        }
        ExpenseCommands::Update {
            id,
            amount,
            description,
            category,
            date,
        } => {
            let update = ExpenseUpdate {
                amount: amount.as_deref().map(parse_amount).transpose()?,
                description,
                category,
                date: date.as_deref().map(parse_date_arg).transpose()?,
            };
            let mut state = ExpenseState::new(client);
            let banner = state.update_expense(id, &update).await;
            report(&output_format, banner)
        }
        ExpenseCommands::Delete { id } => {
            let mut state = ExpenseState::new(client);
            let banner = state.delete_expense(id).await;
            report(&output_format, banner)
        }
    }
}
