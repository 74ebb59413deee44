use serde::{Deserialize, Serialize};

/// Category selector that matches every item.
pub const ALL_CATEGORIES: &str = "all";

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct CatalogItem {
    pub id: String,
    pub en: String,
    pub notes: Option<String>,
    pub category: String,
}

/// Immutable list of learnable items, in authoring order.
#[derive(Clone, Debug, Default)]
pub struct Catalog {
    items: Vec<CatalogItem>,
}

impl Catalog {
    pub fn new(items: Vec<CatalogItem>) -> Self {
        Self { items }
    }

    pub fn items(&self) -> &[CatalogItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&CatalogItem> {
        self.items.iter().find(|i| i.id == id)
    }

    pub fn ids(&self) -> Vec<String> {
        self.items.iter().map(|i| i.id.clone()).collect()
    }

    /// Distinct categories in first-seen order.
    pub fn categories(&self) -> Vec<String> {
        let mut out: Vec<String> = Vec::new();
        for item in &self.items {
            if !out.contains(&item.category) {
                out.push(item.category.clone());
            }
        }
        out
    }

    pub fn filter_by_category(&self, category: &str) -> Vec<CatalogItem> {
        filter_by_category(&self.items, category)
    }
}

pub fn filter_by_category(items: &[CatalogItem], category: &str) -> Vec<CatalogItem> {
    let q = category.trim().to_lowercase();
    if q.is_empty() || q == ALL_CATEGORIES {
        return items.to_vec();
    }
    items
        .iter()
        .filter(|i| i.category.to_lowercase() == q)
        .cloned()
        .collect()
}

pub fn filter_by_text(items: &[CatalogItem], query: &str) -> Vec<CatalogItem> {
    let q = query.trim().to_lowercase();
    if q.is_empty() {
        return items.to_vec();
    }
    items
        .iter()
        .filter(|i| {
            i.id.to_lowercase().contains(&q)
                || i.en.to_lowercase().contains(&q)
                || i.notes
                    .as_ref()
                    .map(|n| n.to_lowercase().contains(&q))
                    .unwrap_or(false)
        })
        .cloned()
        .collect()
}
