//! Section content editor.
//!
//! Every section is rendered generically from its schema. Edits live in the
//! submitted form: each post rebuilds a [`SectionDraft`] from the inputs,
//! applies the requested action and either re-renders the draft or saves
//! it. Unsaved edits are never lost on failure because the failed draft is
//! rendered back.

use askama::Template;
use axum::{
    extract::{Multipart, Path, Query, State},
    response::{IntoResponse, Redirect, Response},
};
use reshow_core::api_url::resolve_image_url;
use reshow_core::content::{
    ContentBundle, DraftItem, FieldKind, FieldSpec, ListSpec, ListTarget, SectionDraft, SectionId,
    UnknownSection,
};
use reshow_core::types::LogoDisplay;
use serde::Deserialize;
use tracing::instrument;

use super::form::SubmittedForm;
use super::{AdminLayout, LoadError, render_after};
use crate::backend::ApiError;
use crate::content::load_bundle;
use crate::error::{AppError, Result, add_breadcrumb};
use crate::middleware::{CurrentAdmin, RequireAdminAuth};
use crate::routes::Flash;
use crate::state::AppState;

const EDITOR_PATH: &str = "/admin/content";
const SAVED: &str = "Content saved successfully!";
const ALL_SAVED: &str = "All content saved successfully!";
const SAVE_FAILED: &str = "Failed to save content";
const LOAD_FAILED: &str = "Failed to load content. Please check your connection and try again.";

/// What a post to the editor asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorAction {
    /// Re-render the submitted draft.
    Apply,
    /// Append an empty item to a list.
    AddItem(ListTarget),
    /// Remove the item at an index.
    RemoveItem(ListTarget, usize),
    /// Save this section.
    Save,
    /// Save every section.
    SaveAll,
}

impl EditorAction {
    /// Read the value of the pressed button. Unknown values re-render.
    #[must_use]
    pub fn parse(value: &str) -> Self {
        let remove = |target, index: &str| {
            index
                .parse()
                .map_or(Self::Apply, |index| Self::RemoveItem(target, index))
        };
        match value.split_once(':') {
            Some(("remove_item", index)) => remove(ListTarget::Primary, index),
            Some(("remove_image", index)) => remove(ListTarget::Images, index),
            _ => match value {
                "add_item" => Self::AddItem(ListTarget::Primary),
                "add_image" => Self::AddItem(ListTarget::Images),
                "save" => Self::Save,
                "save_all" => Self::SaveAll,
                _ => Self::Apply,
            },
        }
    }
}

/// A `<select>` option.
#[derive(Debug, Clone)]
pub struct SelectOption {
    pub value: &'static str,
    pub label: &'static str,
    pub selected: bool,
}

/// One scalar input of the editor.
#[derive(Debug, Clone)]
pub struct EditorField {
    pub input: String,
    pub label: &'static str,
    pub value: String,
    pub multiline: bool,
    pub image: bool,
    pub preview: Option<String>,
    pub options: Vec<SelectOption>,
}

impl EditorField {
    fn new(input: String, spec: &FieldSpec, value: String, api: &str) -> Self {
        let options = match spec.kind {
            FieldKind::LogoDisplay => {
                let current = LogoDisplay::from_stored(&value);
                LogoDisplay::ALL
                    .into_iter()
                    .map(|option| SelectOption {
                        value: option.as_str(),
                        label: option.label(),
                        selected: option == current,
                    })
                    .collect()
            }
            FieldKind::Text | FieldKind::Image => Vec::new(),
        };
        let preview = (spec.is_image() && !value.trim().is_empty())
            .then(|| resolve_image_url(&value, api));
        Self {
            input,
            label: spec.label,
            value,
            multiline: spec.multiline,
            image: spec.is_image(),
            preview,
            options,
        }
    }

    /// Whether the field is a selector.
    #[must_use]
    pub fn is_select(&self) -> bool {
        !self.options.is_empty()
    }
}

/// One entry of an editable list.
#[derive(Debug, Clone)]
pub struct EditorItem {
    pub index: usize,
    /// Input of a plain-text item.
    pub input: String,
    pub text: String,
    pub fields: Vec<EditorField>,
    /// Values without a widget, carried through unchanged.
    pub hidden: Vec<(String, String)>,
}

/// An editable list of a section.
#[derive(Debug, Clone)]
pub struct EditorList {
    pub label: &'static str,
    pub strings: bool,
    pub add_action: &'static str,
    pub remove_action: &'static str,
    pub items: Vec<EditorItem>,
}

impl EditorList {
    fn new(target: ListTarget, spec: &ListSpec, items: &[DraftItem], api: &str) -> Self {
        let prefix = target.form_prefix();
        let (add_action, remove_action) = match target {
            ListTarget::Primary => ("add_item", "remove_item"),
            ListTarget::Images => ("add_image", "remove_image"),
        };
        let items = items
            .iter()
            .enumerate()
            .map(|(index, item)| {
                let mut view = EditorItem {
                    index,
                    input: format!("{prefix}.{index}"),
                    text: String::new(),
                    fields: Vec::new(),
                    hidden: Vec::new(),
                };
                match item {
                    DraftItem::Text(text) => view.text.clone_from(text),
                    DraftItem::Object { fields, .. } => {
                        let specs = spec.item_fields();
                        view.fields = specs
                            .iter()
                            .map(|field| {
                                EditorField::new(
                                    format!("{prefix}.{index}.{}", field.name),
                                    field,
                                    item.field(field.name),
                                    api,
                                )
                            })
                            .collect();
                        if let Some(id) = item.form_id() {
                            view.hidden.push((format!("{prefix}.{index}.id"), id));
                        }
                        view.hidden.extend(
                            fields
                                .keys()
                                .filter(|key| !specs.iter().any(|f| f.name == key.as_str()))
                                .map(|key| (format!("{prefix}.{index}.{key}"), item.field(key))),
                        );
                    }
                }
                view
            })
            .collect();

        Self {
            label: spec.label,
            strings: spec.is_strings(),
            add_action,
            remove_action,
            items,
        }
    }
}

/// One section of the editor.
#[derive(Debug, Clone)]
pub struct EditorSection {
    pub id: &'static str,
    pub name: &'static str,
    pub about: bool,
    pub expanded: bool,
    pub fields: Vec<EditorField>,
    pub lists: Vec<EditorList>,
}

impl EditorSection {
    fn new(draft: &SectionDraft, expanded: bool, api: &str) -> Self {
        let schema = draft.schema();
        let fields = schema
            .fields
            .iter()
            .map(|spec| {
                EditorField::new(
                    format!("f.{}", spec.name),
                    spec,
                    draft.scalar(spec.name),
                    api,
                )
            })
            .collect();
        let lists = [
            (ListTarget::Primary, schema.list),
            (ListTarget::Images, schema.images),
        ]
        .into_iter()
        .filter_map(|(target, spec)| {
            spec.map(|spec| EditorList::new(target, &spec, draft.items(target), api))
        })
        .collect();

        Self {
            id: draft.id().as_str(),
            name: schema.name,
            about: draft.id().is_about_family(),
            expanded,
            fields,
            lists,
        }
    }
}

/// Content editor template.
#[derive(Template)]
#[template(path = "admin/content.html")]
pub struct ContentTemplate {
    pub layout: AdminLayout,
    pub sections: Vec<EditorSection>,
    pub load_error: Option<LoadError>,
    pub flash: Flash,
}

/// Query of the editor page.
#[derive(Debug, Default, Deserialize)]
pub struct EditorQuery {
    #[serde(default)]
    pub section: Option<String>,
    #[serde(flatten)]
    pub flash: Flash,
}

fn editor_url(id: SectionId) -> String {
    format!("{EDITOR_PATH}?section={id}")
}

/// Render the editor, with `draft` in place of its section's saved state.
async fn render_editor(
    state: &AppState,
    admin: &CurrentAdmin,
    draft: Option<&SectionDraft>,
    expanded: Option<SectionId>,
    flash: Flash,
) -> Result<Response> {
    let api = state.backend().base_url();
    let loaded = load_bundle(state.backend(), &admin.token).await;

    let (sections, load_error) = match &loaded {
        Ok(bundle) => {
            let sections = SectionId::ALL
                .into_iter()
                .map(|id| match draft.filter(|d| d.id() == id) {
                    Some(draft) => EditorSection::new(draft, true, api),
                    None => EditorSection::new(
                        &SectionDraft::from_content(id, bundle.get(id)),
                        expanded == Some(id),
                        api,
                    ),
                })
                .collect();
            (sections, None)
        }
        Err(e) if e.is_unauthorized() => return Err(AppError::Backend(ApiError::Unauthorized)),
        Err(e) => {
            tracing::error!("Failed to fetch content: {e}");
            let sections = draft
                .map(|d| EditorSection::new(d, true, api))
                .into_iter()
                .collect();
            let mut error = LoadError::new(e);
            if !error.retry {
                error.message = LOAD_FAILED.to_string();
            }
            (sections, Some(error))
        }
    };

    let template = ContentTemplate {
        layout: AdminLayout::new(state, admin, EDITOR_PATH),
        sections,
        load_error,
        flash,
    };
    Ok(render_after(&template, &[loaded.as_ref().err()]))
}

/// Display the editor.
///
/// GET /admin/content
#[instrument(skip(state, admin))]
pub async fn editor(
    State(state): State<AppState>,
    RequireAdminAuth(admin): RequireAdminAuth,
    Query(query): Query<EditorQuery>,
) -> Result<Response> {
    let expanded = query.section.as_deref().and_then(|s| s.parse().ok());
    render_editor(&state, &admin, None, expanded, query.flash).await
}

/// Persist one section. About sections are saved as the whole about
/// document.
async fn save_section(
    state: &AppState,
    admin: &CurrentAdmin,
    draft: &SectionDraft,
) -> std::result::Result<(), ApiError> {
    let backend = state.backend();
    let id = draft.id();
    if id.is_about_family() {
        let mut bundle = load_bundle(backend, &admin.token).await?;
        bundle.set(id, draft.to_content());
        backend
            .save_about(&admin.token, &bundle.about_document())
            .await?;
    } else {
        backend
            .save_section(&admin.token, id, &draft.to_content())
            .await?;
    }
    state.content().invalidate(id).await;
    Ok(())
}

/// Persist every section of `bundle`: the generic sections one by one,
/// then the about document once.
///
/// Returns the failures as `section: message`.
async fn save_bundle(
    state: &AppState,
    admin: &CurrentAdmin,
    bundle: &ContentBundle,
) -> std::result::Result<Vec<String>, ApiError> {
    let backend = state.backend();
    let mut failures = Vec::new();

    for (id, content) in bundle.non_about_sections() {
        match backend.save_section(&admin.token, id, content).await {
            Ok(()) => {}
            Err(e) if e.is_unauthorized() => return Err(e),
            Err(e) => {
                tracing::error!(section = %id, "Failed to save section: {e}");
                failures.push(format!("{id}: {}", e.message_or(SAVE_FAILED)));
            }
        }
    }
    match backend
        .save_about(&admin.token, &bundle.about_document())
        .await
    {
        Ok(()) => {}
        Err(e) if e.is_unauthorized() => return Err(e),
        Err(e) => {
            tracing::error!("Failed to save about document: {e}");
            failures.push(format!("about: {}", e.message_or(SAVE_FAILED)));
        }
    }

    state.content().invalidate_all().await;
    Ok(failures)
}

/// Apply an editor action to one section.
///
/// POST /admin/content/{section}
#[instrument(skip(state, admin, multipart))]
pub async fn submit(
    State(state): State<AppState>,
    RequireAdminAuth(admin): RequireAdminAuth,
    Path(section): Path<String>,
    multipart: Multipart,
) -> Result<Response> {
    let id: SectionId = section
        .parse()
        .map_err(|e: UnknownSection| AppError::NotFound(e.to_string()))?;

    let mut form = SubmittedForm::read(multipart).await?;
    let action = EditorAction::parse(form.get("action").unwrap_or_default());
    let uploaded = form
        .upload_images(state.backend(), &admin.token, "content")
        .await;
    let mut draft = SectionDraft::from_form(id, form.inputs());

    if let Err(failure) = uploaded {
        if failure.unauthorized {
            return Err(AppError::Backend(ApiError::Unauthorized));
        }
        return render_editor(&state, &admin, Some(&draft), None, Flash::error(failure.message))
            .await;
    }

    let edited = match action {
        EditorAction::Apply => Ok(()),
        EditorAction::AddItem(target) => draft.push_item(target),
        EditorAction::RemoveItem(target, index) => draft.remove_item(target, index),
        EditorAction::Save => {
            return match save_section(&state, &admin, &draft).await {
                Ok(()) => {
                    add_breadcrumb("content", "Saved section", Some(&[("section", id.as_str())]));
                    tracing::info!(section = %id, "Section saved");
                    Ok(Redirect::to(&Flash::success(SAVED).redirect_url(&editor_url(id)))
                        .into_response())
                }
                Err(e) if e.is_unauthorized() => Err(AppError::Backend(e)),
                Err(e) => {
                    tracing::error!(section = %id, "Failed to save section: {e}");
                    let flash = Flash::error(e.message_or(SAVE_FAILED));
                    render_editor(&state, &admin, Some(&draft), None, flash).await
                }
            };
        }
        EditorAction::SaveAll => {
            let mut bundle = match load_bundle(state.backend(), &admin.token).await {
                Ok(bundle) => bundle,
                Err(e) if e.is_unauthorized() => return Err(AppError::Backend(e)),
                Err(e) => {
                    tracing::error!("Failed to fetch content before saving: {e}");
                    let flash = Flash::error(e.message_or(SAVE_FAILED));
                    return render_editor(&state, &admin, Some(&draft), None, flash).await;
                }
            };
            bundle.set(id, draft.to_content());
            let failures = save_bundle(&state, &admin, &bundle).await?;
            add_breadcrumb("content", "Saved all sections", None);
            if failures.is_empty() {
                tracing::info!("All sections saved");
                return Ok(
                    Redirect::to(&Flash::success(ALL_SAVED).redirect_url(&editor_url(id)))
                        .into_response(),
                );
            }
            let flash = Flash::error(format!("{SAVE_FAILED}: {}", failures.join("; ")));
            return render_editor(&state, &admin, Some(&draft), None, flash).await;
        }
    };

    let flash = match edited {
        Ok(()) => Flash::default(),
        Err(e) => Flash::error(e.to_string()),
    };
    render_editor(&state, &admin, Some(&draft), None, flash).await
}

#[cfg(test)]
#[allow(clippy::indexing_slicing)]
mod tests {
    use super::*;
    use reshow_core::content::defaults::hardcoded;

    const API: &str = "http://localhost:3000/api";

    #[test]
    fn test_parse_actions() {
        assert_eq!(EditorAction::parse("save"), EditorAction::Save);
        assert_eq!(EditorAction::parse("save_all"), EditorAction::SaveAll);
        assert_eq!(
            EditorAction::parse("add_image"),
            EditorAction::AddItem(ListTarget::Images)
        );
        assert_eq!(
            EditorAction::parse("remove_item:2"),
            EditorAction::RemoveItem(ListTarget::Primary, 2)
        );
        assert_eq!(EditorAction::parse("remove_item:x"), EditorAction::Apply);
        assert_eq!(EditorAction::parse(""), EditorAction::Apply);
    }

    #[test]
    fn test_navbar_renders_logo_selector() {
        let draft = SectionDraft::from_content(SectionId::Navbar, &hardcoded(SectionId::Navbar));
        let view = EditorSection::new(&draft, false, API);
        let select = view
            .fields
            .iter()
            .find(|f| f.input == "f.logoDisplay")
            .map(|f| f.options.iter().filter(|o| o.selected).map(|o| o.value).collect::<Vec<_>>());
        assert_eq!(select, Some(vec!["text"]));
    }

    #[test]
    fn test_object_items_carry_ids_and_unknown_keys() {
        let mut content = hardcoded(SectionId::CompanyLogos);
        content.insert(
            "logos".to_string(),
            serde_json::json!([{"id": 7, "name": "Acme", "image": "/uploads/content/a.png", "tier": "gold"}]),
        );
        let draft = SectionDraft::from_content(SectionId::CompanyLogos, &content);
        let view = EditorSection::new(&draft, true, API);

        let item = &view.lists[0].items[0];
        assert!(item.hidden.contains(&("l.0.id".to_string(), "7".to_string())));
        assert!(item.hidden.contains(&("l.0.tier".to_string(), "gold".to_string())));
        let image = item.fields.iter().find(|f| f.image).map(|f| f.preview.clone());
        assert_eq!(
            image,
            Some(Some("http://localhost:3000/uploads/content/a.png".to_string()))
        );
    }

    #[test]
    fn test_string_lists() {
        let draft = SectionDraft::from_content(SectionId::WhyChoose, &hardcoded(SectionId::WhyChoose));
        let view = EditorSection::new(&draft, false, API);
        let list = &view.lists[0];
        assert!(list.strings);
        assert_eq!(list.items[0].input, "l.0");
        assert!(!list.items[0].text.is_empty());
    }
}
