//! Flat content records shown on the public site.
//!
//! None of these reference each other or the catalog. Each lives in its own
//! collection and is edited wholesale from the admin panel.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::record::{Collection, Record};
use crate::error::{ValidationError, require_text};
use crate::types::{AboutItemId, AdvantageId, ArticleId, PartnerId, ServiceId};

/// Implements [`Record`] for a content type keyed by `id`, requiring the
/// given text field to be non-empty.
macro_rules! content_record {
    ($ty:ty, $id:ty, $collection:expr, $required:ident) => {
        impl Record for $ty {
            type Id = $id;
            const COLLECTION: Collection = $collection;

            fn id(&self) -> &$id {
                &self.id
            }

            fn set_id(&mut self, id: $id) {
                self.id = id;
            }

            fn validate(&self) -> Result<(), ValidationError> {
                require_text(&self.$required, stringify!($required))
            }
        }
    };
}

/// A service offered in the clinic (fitting, audiometry, repair).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    #[serde(default)]
    pub id: ServiceId,
    pub name: String,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub contact: String,
    #[serde(default)]
    pub link: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

content_record!(Service, ServiceId, Collection::Services, name);

/// A paragraph of the "About us" section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AboutItem {
    #[serde(default)]
    pub id: AboutItemId,
    pub title: String,
    #[serde(default)]
    pub description: String,
}

content_record!(AboutItem, AboutItemId, Collection::About, title);

/// A blog article.
///
/// `date` is free text as entered by the admin (`15.10.2026`); it defaults
/// to the day the article is saved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    #[serde(default)]
    pub id: ArticleId,
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub date: String,
}

impl Article {
    /// Date format used for article dates.
    pub const DATE_FORMAT: &'static str = "%d.%m.%Y";
}

impl Record for Article {
    type Id = ArticleId;
    const COLLECTION: Collection = Collection::Articles;

    fn id(&self) -> &ArticleId {
        &self.id
    }

    fn set_id(&mut self, id: ArticleId) {
        self.id = id;
    }

    fn validate(&self) -> Result<(), ValidationError> {
        require_text(&self.title, "title")
    }

    fn prepare(&mut self) {
        if self.date.trim().is_empty() {
            self.date = Utc::now().format(Self::DATE_FORMAT).to_string();
        }
    }
}

/// A selling point on the home page ("Free hearing test").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Advantage {
    #[serde(default)]
    pub id: AdvantageId,
    #[serde(default)]
    pub icon: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
}

content_record!(Advantage, AdvantageId, Collection::Advantages, title);

/// A manufacturer or partner logo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Partner {
    #[serde(default)]
    pub id: PartnerId,
    pub name: String,
    #[serde(default)]
    pub logo_url: String,
}

content_record!(Partner, PartnerId, Collection::Partners, name);

/// The home page banner. There is exactly one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hero {
    pub title: String,
    #[serde(default)]
    pub highlighted_text: String,
    #[serde(default)]
    pub subtitle: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image_url: String,
}

impl Hero {
    /// Check that the banner has a title.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyField`] if the title is blank.
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text(&self.title, "title")
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_article_date_defaults_to_today() {
        let mut article: Article = serde_json::from_str(r#"{"title":"Caring for your aid"}"#).unwrap();
        assert!(article.date.is_empty());
        article.prepare();
        assert!(chrono::NaiveDate::parse_from_str(&article.date, Article::DATE_FORMAT).is_ok());
    }

    #[test]
    fn test_article_date_kept() {
        let mut article: Article =
            serde_json::from_str(r#"{"title":"Batteries","date":"01.02.2025"}"#).unwrap();
        article.prepare();
        assert_eq!(article.date, "01.02.2025");
    }

    #[test]
    fn test_required_fields() {
        let service: Service = serde_json::from_str(r#"{"name":" "}"#).unwrap();
        assert_eq!(service.validate(), Err(ValidationError::EmptyField { field: "name" }));

        let about: AboutItem = serde_json::from_str(r#"{"title":"Since 2010"}"#).unwrap();
        assert!(about.validate().is_ok());

        let hero = Hero {
            title: String::new(),
            highlighted_text: String::new(),
            subtitle: String::new(),
            description: String::new(),
            image_url: String::new(),
        };
        assert!(hero.validate().is_err());
    }

    #[test]
    fn test_camel_case_fields() {
        let partner: Partner =
            serde_json::from_str(r#"{"id":"x","name":"Signia","logoUrl":"/s.png"}"#).unwrap();
        assert_eq!(partner.logo_url, "/s.png");
        let json = serde_json::to_value(&partner).unwrap();
        assert!(json.get("logoUrl").is_some());
    }
}
