//! Built-in content for a fresh install.
//!
//! Used when a collection has never been saved, so the public site renders
//! something sensible before the admin has filled it in.

use super::catalog::Category;
use super::content::{AboutItem, Advantage, Hero};
use crate::types::{AboutItemId, AdvantageId, CategoryId};

/// Default home page banner.
#[must_use]
pub fn hero() -> Hero {
    Hero {
        title: "Hear the world".to_string(),
        highlighted_text: "clearly".to_string(),
        subtitle: "Hearing aids and hearing care".to_string(),
        description: "Free hearing test, fitting and aftercare from certified audiologists."
            .to_string(),
        image_url: String::new(),
    }
}

/// Default categories.
#[must_use]
pub fn categories() -> Vec<Category> {
    vec![
        Category {
            id: CategoryId::new("1"),
            name: "Hearing aids".to_string(),
            icon: "Ear".to_string(),
        },
        Category {
            id: CategoryId::new("2"),
            name: "Batteries and accessories".to_string(),
            icon: "Battery".to_string(),
        },
    ]
}

/// Default selling points.
#[must_use]
pub fn advantages() -> Vec<Advantage> {
    [
        ("Stethoscope", "Free hearing test", "Audiometry in 30 minutes"),
        ("ShieldCheck", "Warranty", "Official warranty on every device"),
        ("Wrench", "Aftercare", "Cleaning and adjustment for life"),
    ]
    .into_iter()
    .enumerate()
    .map(|(n, (icon, title, description))| Advantage {
        id: AdvantageId::new((n + 1).to_string()),
        icon: icon.to_string(),
        title: title.to_string(),
        description: description.to_string(),
    })
    .collect()
}

/// Default "About us" paragraphs.
#[must_use]
pub fn about() -> Vec<AboutItem> {
    vec![AboutItem {
        id: AboutItemId::new("1"),
        title: "Who we are".to_string(),
        description: "A family hearing centre fitting hearing aids since 2010.".to_string(),
    }]
}
