//! Closed set of editable content sections.

use core::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Identifier of a content section.
///
/// Variants are listed in editor order, grouped by the page that shows them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SectionId {
    // Home
    Hero,
    WhyChoose,
    ProductCategories,
    ProductShowcase,
    CompanyLogos,
    // About
    AboutHero,
    AboutStats,
    Mission,
    Vision,
    Values,
    Partnership,
    Experience,
    // Services
    Services,
    // Gallery
    Gallery,
    // Contact
    Contact,
    // Every page
    Footer,
    Navbar,
}

/// Unknown section id.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown content section: {0}")]
pub struct UnknownSection(pub String);

impl SectionId {
    /// Every section in editor order.
    pub const ALL: [Self; 17] = [
        Self::Hero,
        Self::WhyChoose,
        Self::ProductCategories,
        Self::ProductShowcase,
        Self::CompanyLogos,
        Self::AboutHero,
        Self::AboutStats,
        Self::Mission,
        Self::Vision,
        Self::Values,
        Self::Partnership,
        Self::Experience,
        Self::Services,
        Self::Gallery,
        Self::Contact,
        Self::Footer,
        Self::Navbar,
    ];

    /// Sections persisted together through the about document.
    pub const ABOUT_FAMILY: [Self; 7] = [
        Self::AboutHero,
        Self::AboutStats,
        Self::Mission,
        Self::Vision,
        Self::Values,
        Self::Partnership,
        Self::Experience,
    ];

    /// Wire id, as used in `/content/:section` and the overrides map.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Hero => "hero",
            Self::WhyChoose => "whyChoose",
            Self::ProductCategories => "productCategories",
            Self::ProductShowcase => "productShowcase",
            Self::CompanyLogos => "companyLogos",
            Self::AboutHero => "aboutHero",
            Self::AboutStats => "aboutStats",
            Self::Mission => "mission",
            Self::Vision => "vision",
            Self::Values => "values",
            Self::Partnership => "partnership",
            Self::Experience => "experience",
            Self::Services => "services",
            Self::Gallery => "gallery",
            Self::Contact => "contact",
            Self::Footer => "footer",
            Self::Navbar => "navbar",
        }
    }

    /// Whether the section is saved as part of the about document.
    #[must_use]
    pub const fn is_about_family(self) -> bool {
        matches!(
            self,
            Self::AboutHero
                | Self::AboutStats
                | Self::Mission
                | Self::Vision
                | Self::Values
                | Self::Partnership
                | Self::Experience
        )
    }

    /// Sections saved one by one through the generic content store.
    pub fn non_about() -> impl Iterator<Item = Self> {
        Self::ALL.into_iter().filter(|id| !id.is_about_family())
    }
}

impl fmt::Display for SectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SectionId {
    type Err = UnknownSection;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|id| id.as_str() == s)
            .ok_or_else(|| UnknownSection(s.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_ids_round_trip() {
        for id in SectionId::ALL {
            assert_eq!(id.as_str().parse::<SectionId>().unwrap(), id);
            let json = serde_json::to_string(&id).unwrap();
            assert_eq!(json, format!("\"{}\"", id.as_str()));
        }
    }

    #[test]
    fn test_unknown_section() {
        assert!("sidebar".parse::<SectionId>().is_err());
        assert!("Hero".parse::<SectionId>().is_err());
    }

    #[test]
    fn test_about_family_partition() {
        assert_eq!(SectionId::non_about().count(), 10);
        assert!(SectionId::ABOUT_FAMILY.iter().all(|id| id.is_about_family()));
        assert!(!SectionId::Hero.is_about_family());
    }
}
