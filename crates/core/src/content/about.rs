//! The about page composite document.
//!
//! The backend stores the seven about sections as one document behind
//! `GET/PUT /about`. The editor works on seven independent sections, so the
//! document is decomposed on load and recomposed on save.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{SectionContent, SectionId, as_content, list_of, text_of};

/// `hero` part of the about document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AboutHero {
    pub title: String,
    pub description: String,
    pub description2: String,
    pub image: String,
}

/// `stats` part of the about document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AboutStats {
    pub years: String,
    pub years_label: String,
    pub clients: String,
    pub clients_label: String,
    pub projects: String,
    pub projects_label: String,
}

/// `mission` and `vision` parts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TitledText {
    pub title: String,
    pub content: String,
}

/// `partnership` part.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Partnership {
    pub title: String,
    pub partner_name: String,
    pub description1: String,
    pub description2: String,
    pub image: String,
}

/// `experience` part.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Experience {
    pub title: String,
    pub description: String,
    pub clients: Vec<String>,
    /// `{id, image, alt}` objects.
    pub images: Vec<Value>,
}

/// Wire shape of `GET/PUT /about`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AboutDocument {
    pub hero: AboutHero,
    pub stats: AboutStats,
    pub mission: TitledText,
    pub vision: TitledText,
    /// `{id?, title, description}` objects.
    pub values: Vec<Value>,
    pub partnership: Partnership,
    pub experience: Experience,
}

fn section<'a>(
    sections: &'a BTreeMap<SectionId, SectionContent>,
    id: SectionId,
) -> Option<&'a SectionContent> {
    sections.get(&id)
}

fn field(sections: &BTreeMap<SectionId, SectionContent>, id: SectionId, key: &str) -> String {
    section(sections, id)
        .map(|c| text_of(c, key))
        .unwrap_or_default()
}

fn list(sections: &BTreeMap<SectionId, SectionContent>, id: SectionId, key: &str) -> Vec<Value> {
    section(sections, id)
        .map(|c| list_of(c, key).to_vec())
        .unwrap_or_default()
}

/// Build the about document from the seven editor sections.
///
/// Missing text fields become `""` and missing lists become `[]`.
#[must_use]
pub fn compose(sections: &BTreeMap<SectionId, SectionContent>) -> AboutDocument {
    use SectionId::{AboutHero as H, AboutStats as S, Experience as E, Partnership as P};

    AboutDocument {
        hero: AboutHero {
            title: field(sections, H, "title"),
            description: field(sections, H, "description"),
            description2: field(sections, H, "description2"),
            image: field(sections, H, "image"),
        },
        stats: AboutStats {
            years: field(sections, S, "years"),
            years_label: field(sections, S, "yearsLabel"),
            clients: field(sections, S, "clients"),
            clients_label: field(sections, S, "clientsLabel"),
            projects: field(sections, S, "projects"),
            projects_label: field(sections, S, "projectsLabel"),
        },
        mission: TitledText {
            title: field(sections, SectionId::Mission, "title"),
            content: field(sections, SectionId::Mission, "content"),
        },
        vision: TitledText {
            title: field(sections, SectionId::Vision, "title"),
            content: field(sections, SectionId::Vision, "content"),
        },
        values: list(sections, SectionId::Values, "values"),
        partnership: Partnership {
            title: field(sections, P, "title"),
            partner_name: field(sections, P, "partnerName"),
            description1: field(sections, P, "description1"),
            description2: field(sections, P, "description2"),
            image: field(sections, P, "image"),
        },
        experience: Experience {
            title: field(sections, E, "title"),
            description: field(sections, E, "description"),
            clients: list(sections, E, "clients")
                .iter()
                .map(|v| super::value_text(Some(v)))
                .collect(),
            images: list(sections, E, "images"),
        },
    }
}

/// Split a fetched about document into the seven editor sections.
///
/// Only keys present in the document are returned; callers layer the result
/// over the section defaults.
#[must_use]
pub fn decompose(doc: &Value) -> [(SectionId, SectionContent); 7] {
    let part = |key: &str| as_content(doc.get(key));

    let mut values = SectionContent::new();
    if let Some(list @ Value::Array(_)) = doc.get("values") {
        values.insert("values".to_string(), list.clone());
    }

    [
        (SectionId::AboutHero, part("hero")),
        (SectionId::AboutStats, part("stats")),
        (SectionId::Mission, part("mission")),
        (SectionId::Vision, part("vision")),
        (SectionId::Values, values),
        (SectionId::Partnership, part("partnership")),
        (SectionId::Experience, part("experience")),
    ]
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc() -> Value {
        json!({
            "hero": {"title": "About Us", "description": "We brand.", "description2": "", "image": "/uploads/a.jpg"},
            "stats": {"years": "12+", "yearsLabel": "Years", "clients": "600+", "clientsLabel": "Clients", "projects": "2000+", "projectsLabel": "Projects"},
            "mission": {"title": "Mission", "content": "Deliver."},
            "vision": {"title": "Vision", "content": "Lead."},
            "values": [{"id": 1, "title": "Integrity", "description": "Honest"}],
            "partnership": {"title": "Partners", "partnerName": "BARRON", "description1": "d1", "description2": "d2", "image": ""},
            "experience": {"title": "Experience", "description": "Clients:", "clients": ["Banks"], "images": [{"id": 3, "image": "/uploads/e.jpg", "alt": "Our Experience"}]}
        })
    }

    #[test]
    fn test_decompose_then_compose_preserves_document() {
        let sections: BTreeMap<_, _> = decompose(&doc()).into_iter().collect();
        let composed = compose(&sections);
        let original: AboutDocument = serde_json::from_value(doc()).unwrap();
        assert_eq!(composed, original);
    }

    #[test]
    fn test_compose_missing_sections_are_empty() {
        let composed = compose(&BTreeMap::new());
        assert_eq!(composed, AboutDocument::default());
        let wire = serde_json::to_value(&composed).unwrap();
        assert_eq!(wire["hero"]["description2"], json!(""));
        assert_eq!(wire["stats"]["yearsLabel"], json!(""));
        assert_eq!(wire["values"], json!([]));
        assert_eq!(wire["experience"]["images"], json!([]));
    }

    #[test]
    fn test_decompose_partial_document() {
        let parts = decompose(&json!({"mission": {"title": "M"}}));
        let mission = parts.iter().find(|(id, _)| *id == SectionId::Mission).unwrap();
        assert_eq!(mission.1.get("title"), Some(&json!("M")));
        let values = parts.iter().find(|(id, _)| *id == SectionId::Values).unwrap();
        assert!(values.1.is_empty());
    }

    #[test]
    fn test_wire_names_are_camel_case() {
        let wire = serde_json::to_value(AboutDocument::default()).unwrap();
        assert!(wire["partnership"].get("partnerName").is_some());
        assert!(wire["stats"].get("projectsLabel").is_some());
    }
}
