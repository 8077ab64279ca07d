use std::borrow::Cow;

use super::api::{ApiClient, ClientError};
use crate::database::models::{Category, DEFAULT_CATEGORY_COLOR};

/// Palette shown when the user has not defined any categories.
pub const DEFAULT_PALETTE: [(&str, &str); 7] = [
    ("Food", "#FF6384"),
    ("Transport", "#36A2EB"),
    ("Entertainment", "#FFCE56"),
    ("Utilities", "#4BC0C0"),
    ("Shopping", "#9966FF"),
    ("Healthcare", "#FF9F40"),
    ("Other", "#FF6384"),
];

pub fn default_categories() -> Vec<Category> {
    DEFAULT_PALETTE
        .iter()
        .map(|(name, color)| Category::new(*name, *color))
        .collect()
}

/// The user's category list. Local state changes only after the server has
/// accepted the full replacement list.
#[derive(Debug, Clone, Default)]
pub struct CategoryManager {
    categories: Vec<Category>,
}

impl CategoryManager {
    pub fn new(categories: Vec<Category>) -> Self {
        Self { categories }
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// What a picker should offer: the user's list, or the default palette.
    pub fn effective(&self) -> Cow<'_, [Category]> {
        if self.categories.is_empty() {
            Cow::Owned(default_categories())
        } else {
            Cow::Borrowed(&self.categories)
        }
    }

    /// Expenses may name categories that no longer exist; those get the fallback color.
    pub fn color_for(&self, name: &str) -> String {
        self.categories
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.color.clone())
            .or_else(|| {
                DEFAULT_PALETTE
                    .iter()
                    .find(|(n, _)| *n == name)
                    .map(|(_, color)| color.to_string())
            })
            .unwrap_or_else(|| DEFAULT_CATEGORY_COLOR.to_string())
    }

    pub async fn add_category(
        &mut self,
        client: &ApiClient,
        name: &str,
        color: Option<&str>,
    ) -> Result<(), ClientError> {
        let mut updated = self.categories.clone();
        updated.push(Category::new(name.trim(), color.unwrap_or(DEFAULT_CATEGORY_COLOR)));
        self.categories = client.update_categories(&updated).await?;
        Ok(())
    }

    pub async fn remove_category(&mut self, client: &ApiClient, index: usize) -> Result<Category, ClientError> {
        if index >= self.categories.len() {
            return Err(ClientError::CategoryIndex(index));
        }
        let mut updated = self.categories.clone();
        let removed = updated.remove(index);
        self.categories = client.update_categories(&updated).await?;
        Ok(removed)
    }
}
