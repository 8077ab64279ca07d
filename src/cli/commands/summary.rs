use clap::Args;

use super::authenticated_client;
use crate::cli::config::load_session;
use crate::cli::utils::{category_share, format_amount, output_json};
use crate::cli::OutputFormat;

#[derive(Args)]
pub struct SummaryArgs {
    #[arg(long, help = "Earliest date, inclusive")]
    pub start_date: Option<String>,
    #[arg(long, help = "Latest date, inclusive")]
    pub end_date: Option<String>,
}

pub async fn handle(args: SummaryArgs, output_format: OutputFormat) -> anyhow::Result<()> {
    let session = load_session()?;
    let client = authenticated_client(&session)?;
    let summary = client
        .expense_summary(args.start_date.as_deref(), args.end_date.as_deref())
        .await?;

    if let OutputFormat::Json = output_format {
        return output_json(&summary);
    }

    let overall = &summary.overall;
    println!("Total:   {}", format_amount(overall.total_expenses));
    println!("Count:   {}", overall.count);
    println!("Average: {}", format_amount(overall.average_expense));

    if summary.by_category.is_empty() {
        return Ok(());
    }

    println!();
    println!("{:<16}  {:>10}  {:>6}  {:>6}", "CATEGORY", "TOTAL", "COUNT", "SHARE");
    for row in &summary.by_category {
        println!(
            "{:<16}  {:>10}  {:>6}  {:>5}%",
            row.category,
            format_amount(row.total),
            row.count,
            category_share(row.total, overall.total_expenses)
        );
    }
    Ok(())
}
