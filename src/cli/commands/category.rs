use clap::Subcommand;
use serde_json::json;

use super::authenticated_client;
use crate::cli::config::load_session;
use crate::cli::utils::{output_json, output_success};
use crate::cli::OutputFormat;
use crate::client::CategoryManager;

#[derive(Subcommand)]
pub enum CategoryCommands {
    #[command(about = "List your categories (or the default palette when you have none)")]
    List,

    #[command(about = "Add a category")]
    Add {
        #[arg(help = "Category name")]
        name: String,
        #[arg(long, help = "Hex color, e.g. #FF6384")]
        color: Option<String>,
    },

    #[command(about = "Remove a category by its position in `category list`")]
    Remove {
        #[arg(help = "Position, starting at 1")]
        position: usize,
    },
}

pub async fn handle(cmd: CategoryCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    let session = load_session()?;
    let client = authenticated_client(&session)?;
    let mut manager = CategoryManager::new(client.me().await?.categories);

    match cmd {
        CategoryCommands::List => match output_format {
            OutputFormat::Json => output_json(&json!({ "categories": manager.effective() })),
            OutputFormat::Text => {
                if manager.categories().is_empty() {
                    println!("No custom categories; using the default palette:");
                }
                for (index, category) in manager.effective().iter().enumerate() {
                    println!("{:>3}. {:<16} {}", index + 1, category.name, category.color);
                }
                Ok(())
            }
        },
        CategoryCommands::Add { name, color } => {
            if name.trim().is_empty() {
                anyhow::bail!("Category name cannot be empty");
            }
            manager.add_category(&client, &name, color.as_deref()).await?;
            output_success(
                &output_format,
                "Category added successfully",
                Some(json!({ "categories": manager.categories() })),
            )
        }
        CategoryCommands::Remove { position } => {
            let index = position
                .checked_sub(1)
                .ok_or_else(|| anyhow::anyhow!("Positions start at 1"))?;
            let removed = manager.remove_category(&client, index).await?;
            output_success(
                &output_format,
                &format!("Category {} removed successfully", removed.name),
                Some(json!({ "categories": manager.categories() })),
            )
        }
    }
}
