//! Field and list shapes of every section.
//!
//! The editor is rendered generically from these descriptors, so each field
//! carries its own widget metadata instead of the editor guessing from names.

use super::SectionId;

/// Widget used for a scalar field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Free text.
    Text,
    /// Image path, edited through the upload control.
    Image,
    /// Navbar logo display selector.
    LogoDisplay,
}

/// A scalar field of a section or of a list item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    /// Rendered as a text area.
    pub multiline: bool,
}

impl FieldSpec {
    const fn text(name: &'static str, label: &'static str) -> Self {
        Self {
            name,
            label,
            kind: FieldKind::Text,
            multiline: false,
        }
    }

    const fn long(name: &'static str, label: &'static str) -> Self {
        Self {
            name,
            label,
            kind: FieldKind::Text,
            multiline: true,
        }
    }

    const fn image(name: &'static str, label: &'static str) -> Self {
        Self {
            name,
            label,
            kind: FieldKind::Image,
            multiline: false,
        }
    }

    const fn logo_display(name: &'static str, label: &'static str) -> Self {
        Self {
            name,
            label,
            kind: FieldKind::LogoDisplay,
            multiline: false,
        }
    }

    /// Whether this field holds an image path.
    #[must_use]
    pub const fn is_image(&self) -> bool {
        matches!(self.kind, FieldKind::Image)
    }
}

/// Shape of list items.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListItemKind {
    /// Plain strings (benefits, client names).
    Strings,
    /// Objects with an `id` and the given fields.
    Objects(&'static [FieldSpec]),
}

/// A collection field of a section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListSpec {
    pub field: &'static str,
    pub label: &'static str,
    pub item: ListItemKind,
    /// Initial values for fields of a newly added object item.
    pub new_item_defaults: &'static [(&'static str, &'static str)],
}

impl ListSpec {
    /// Fields of object items; empty for string lists.
    #[must_use]
    pub const fn item_fields(&self) -> &'static [FieldSpec] {
        match self.item {
            ListItemKind::Strings => &[],
            ListItemKind::Objects(fields) => fields,
        }
    }

    /// Whether items are plain strings.
    #[must_use]
    pub const fn is_strings(&self) -> bool {
        matches!(self.item, ListItemKind::Strings)
    }
}

/// Shape of one section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionSchema {
    pub id: SectionId,
    pub name: &'static str,
    pub fields: &'static [FieldSpec],
    pub list: Option<ListSpec>,
    /// Second collection (only the experience section has one).
    pub images: Option<ListSpec>,
}

const fn strings(field: &'static str, label: &'static str) -> ListSpec {
    ListSpec {
        field,
        label,
        item: ListItemKind::Strings,
        new_item_defaults: &[],
    }
}

const fn objects(
    field: &'static str,
    label: &'static str,
    fields: &'static [FieldSpec],
) -> ListSpec {
    ListSpec {
        field,
        label,
        item: ListItemKind::Objects(fields),
        new_item_defaults: &[],
    }
}

const CATEGORY_ITEM: &[FieldSpec] = &[
    FieldSpec::text("title", "Title"),
    FieldSpec::long("description", "Description"),
    FieldSpec::image("image", "Image"),
];

const SHOWCASE_ITEM: &[FieldSpec] = &[
    FieldSpec::text("title", "Title"),
    FieldSpec::image("image", "Image"),
];

const LOGO_ITEM: &[FieldSpec] = &[
    FieldSpec::text("name", "Company Name"),
    FieldSpec::image("image", "Logo"),
];

const VALUE_ITEM: &[FieldSpec] = &[
    FieldSpec::text("title", "Title"),
    FieldSpec::long("description", "Description"),
];

const EXPERIENCE_IMAGE_ITEM: &[FieldSpec] = &[
    FieldSpec::text("alt", "Alt Text"),
    FieldSpec::image("image", "Image"),
];

const GALLERY_ITEM: &[FieldSpec] = &[
    FieldSpec::text("name", "Name"),
    FieldSpec::text("alt", "Alt Text"),
    FieldSpec::image("image", "Image"),
];

static SCHEMAS: [SectionSchema; 17] = [
    SectionSchema {
        id: SectionId::Hero,
        name: "Hero Section (Home)",
        fields: &[
            FieldSpec::text("title", "Title"),
            FieldSpec::long("subtitle", "Subtitle"),
            FieldSpec::long("description", "Description"),
            FieldSpec::image("image", "Image"),
            FieldSpec::text("buttonText", "Button Text"),
        ],
        list: None,
        images: None,
    },
    SectionSchema {
        id: SectionId::WhyChoose,
        name: "Why Choose Reshow Section (Home)",
        fields: &[
            FieldSpec::text("title", "Title"),
            FieldSpec::image("image", "Image"),
        ],
        list: Some(strings("benefits", "Benefits")),
        images: None,
    },
    SectionSchema {
        id: SectionId::ProductCategories,
        name: "Product Categories Section (Home)",
        fields: &[
            FieldSpec::text("title", "Title"),
            FieldSpec::long("subtitle", "Subtitle"),
            FieldSpec::long("description", "Description"),
            FieldSpec::text("buttonText", "Button Text"),
        ],
        list: Some(objects("categories", "Categories", CATEGORY_ITEM)),
        images: None,
    },
    SectionSchema {
        id: SectionId::ProductShowcase,
        name: "Product Showcase Section (Home)",
        fields: &[
            FieldSpec::text("title", "Title"),
            FieldSpec::long("description", "Description"),
        ],
        list: Some(objects("products", "Products", SHOWCASE_ITEM)),
        images: None,
    },
    SectionSchema {
        id: SectionId::CompanyLogos,
        name: "Company Logos Section (Home)",
        fields: &[FieldSpec::text("title", "Title")],
        list: Some(objects("logos", "Logos", LOGO_ITEM)),
        images: None,
    },
    SectionSchema {
        id: SectionId::AboutHero,
        name: "About Hero Section (About Page)",
        fields: &[
            FieldSpec::text("title", "Title"),
            FieldSpec::long("description", "Description"),
            FieldSpec::long("description2", "Second Description"),
            FieldSpec::image("image", "Image"),
        ],
        list: None,
        images: None,
    },
    SectionSchema {
        id: SectionId::AboutStats,
        name: "About Stats Section (About Page)",
        fields: &[
            FieldSpec::text("years", "Years"),
            FieldSpec::text("yearsLabel", "Years Label"),
            FieldSpec::text("clients", "Clients"),
            FieldSpec::text("clientsLabel", "Clients Label"),
            FieldSpec::text("projects", "Projects"),
            FieldSpec::text("projectsLabel", "Projects Label"),
        ],
        list: None,
        images: None,
    },
    SectionSchema {
        id: SectionId::Mission,
        name: "Mission Section (About Page)",
        fields: &[
            FieldSpec::text("title", "Title"),
            FieldSpec::long("content", "Content"),
        ],
        list: None,
        images: None,
    },
    SectionSchema {
        id: SectionId::Vision,
        name: "Vision Section (About Page)",
        fields: &[
            FieldSpec::text("title", "Title"),
            FieldSpec::long("content", "Content"),
        ],
        list: None,
        images: None,
    },
    SectionSchema {
        id: SectionId::Values,
        name: "Values Section (About Page)",
        fields: &[],
        list: Some(objects("values", "Values", VALUE_ITEM)),
        images: None,
    },
    SectionSchema {
        id: SectionId::Partnership,
        name: "Partnership Section (About Page)",
        fields: &[
            FieldSpec::text("title", "Title"),
            FieldSpec::text("partnerName", "Partner Name"),
            FieldSpec::long("description1", "First Description"),
            FieldSpec::long("description2", "Second Description"),
            FieldSpec::image("image", "Image"),
        ],
        list: None,
        images: None,
    },
    SectionSchema {
        id: SectionId::Experience,
        name: "Experience Section (About Page)",
        fields: &[
            FieldSpec::text("title", "Title"),
            FieldSpec::long("description", "Description"),
        ],
        list: Some(strings("clients", "Client Sectors")),
        images: Some(ListSpec {
            field: "images",
            label: "Experience Images",
            item: ListItemKind::Objects(EXPERIENCE_IMAGE_ITEM),
            new_item_defaults: &[("alt", "Our Experience")],
        }),
    },
    SectionSchema {
        id: SectionId::Services,
        name: "Services Section (Services Page)",
        fields: &[
            FieldSpec::text("title", "Title"),
            FieldSpec::long("description", "Description"),
            FieldSpec::image("image", "Image"),
        ],
        list: None,
        images: None,
    },
    SectionSchema {
        id: SectionId::Gallery,
        name: "Gallery Section (Gallery Page)",
        fields: &[
            FieldSpec::text("title", "Title"),
            FieldSpec::long("description", "Description"),
        ],
        list: Some(objects("images", "Images", GALLERY_ITEM)),
        images: None,
    },
    SectionSchema {
        id: SectionId::Contact,
        name: "Contact Section (Contact Page)",
        fields: &[
            FieldSpec::text("title", "Title"),
            FieldSpec::long("description", "Description"),
            FieldSpec::long("address", "Address"),
            FieldSpec::text("phone", "Phone"),
            FieldSpec::text("phone2", "Second Phone"),
            FieldSpec::text("email", "Email"),
        ],
        list: None,
        images: None,
    },
    SectionSchema {
        id: SectionId::Footer,
        name: "Footer (All Pages)",
        fields: &[
            FieldSpec::text("companyName", "Company Name"),
            FieldSpec::long("tagline", "Tagline"),
            FieldSpec::long("address", "Address"),
            FieldSpec::text("phone1", "Phone"),
            FieldSpec::text("phone2", "Second Phone"),
            FieldSpec::text("email", "Email"),
            FieldSpec::text("facebook", "Facebook URL"),
            FieldSpec::text("instagram", "Instagram URL"),
            FieldSpec::text("twitter", "Twitter URL"),
            FieldSpec::text("tiktok", "TikTok URL"),
        ],
        list: None,
        images: None,
    },
    SectionSchema {
        id: SectionId::Navbar,
        name: "Navbar Settings (All Pages)",
        fields: &[
            FieldSpec::image("logoImage", "Logo Image"),
            FieldSpec::logo_display("logoDisplay", "Logo Display"),
        ],
        list: None,
        images: None,
    },
];

impl SectionId {
    /// Shape of this section.
    #[must_use]
    #[allow(clippy::indexing_slicing)] // SCHEMAS is ordered like SectionId::ALL
    pub fn schema(self) -> &'static SectionSchema {
        &SCHEMAS[self as usize]
    }
}

impl SectionSchema {
    /// Look up a scalar field by name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&'static FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// The list spec stored under `field`, primary or secondary.
    #[must_use]
    pub fn list_for(&self, field: &str) -> Option<&ListSpec> {
        self.list
            .as_ref()
            .filter(|l| l.field == field)
            .or_else(|| self.images.as_ref().filter(|l| l.field == field))
    }
}
