//! Default category catalogue for fresh graphs

use anyhow::{Context, Result};
use graph_store::{props, GraphStore, Label};
use tracing::info;

/// (id, name, icon)
pub const DEFAULT_CATEGORIES: &[(&str, &str, &str)] = &[
    ("cat1", "Just for Fun", "smile"),
    ("cat2", "Happiness & Values", "heart-o"),
    ("cat3", "Health & Wellbeing", "medkit"),
    ("cat4", "Environment & Nature", "tree"),
    ("cat5", "Animal Protection", "paw"),
    ("cat6", "Human Rights & Justice", "balance-scale"),
    ("cat7", "Education & Sciences", "graduation-cap"),
    ("cat8", "Cooperation & Development", "users"),
    ("cat9", "Democracy & Politics", "university"),
    ("cat10", "Economy & Finances", "money"),
    ("cat11", "Energy & Technology", "flash"),
    ("cat12", "IT, Internet & Data Privacy", "mouse-pointer"),
    ("cat13", "Art, Culture & Sport", "paint-brush"),
    ("cat14", "Freedom of Speech", "bullhorn"),
    ("cat15", "Consumption & Sustainability", "shopping-cart"),
    ("cat16", "Global Peace & Nonviolence", "angellist"),
];

/// Merge the default categories; existing ones are left as they are
pub async fn seed_categories(store: &dyn GraphStore) -> Result<usize> {
    for (id, name, icon) in DEFAULT_CATEGORIES {
        store
            .merge_node(
                Label::Category,
                id,
                props! {
                    "id" => *id,
                    "name" => *name,
                    "slug" => super::text::slugify(name),
                    "icon" => *icon,
                },
            )
            .await
            .with_context(|| format!("Failed to seed category {}", id))?;
    }

    info!(count = DEFAULT_CATEGORIES.len(), "Seeded categories");
    Ok(DEFAULT_CATEGORIES.len())
}
