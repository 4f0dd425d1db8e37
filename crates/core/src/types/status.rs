//! Status enums.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Order handling status.
///
/// The set is flat: the admin may move an order between any two statuses,
/// including back from `completed` to `processing`. Nothing advances a
/// status automatically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Just placed by a visitor.
    #[default]
    New,
    /// Picked up by staff.
    Processing,
    /// Handed over to the customer.
    Completed,
}

impl OrderStatus {
    /// Every status, in display order.
    pub const ALL: [Self; 3] = [Self::New, Self::Processing, Self::Completed];

    /// Wire name of the status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Processing => "processing",
            Self::Completed => "completed",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "new" => Ok(Self::New),
            "processing" => Ok(Self::Processing),
            "completed" => Ok(Self::Completed),
            other => Err(ValidationError::UnknownStatus(other.to_string())),
        }
    }
}

/// Public site section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    #[default]
    Home,
    Catalog,
    Services,
    About,
    Articles,
}

impl Section {
    /// Every section, in navigation order.
    pub const ALL: [Self; 5] = [
        Self::Home,
        Self::Catalog,
        Self::Services,
        Self::About,
        Self::Articles,
    ];

    /// URL path of the section.
    #[must_use]
    pub const fn path(&self) -> &'static str {
        match self {
            Self::Home => "/",
            Self::Catalog => "/catalog",
            Self::Services => "/services",
            Self::About => "/about",
            Self::Articles => "/articles",
        }
    }
}
