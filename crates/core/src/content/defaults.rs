//! Default content for every section.
//!
//! The public site never renders an empty section: whatever the backend
//! returns is layered over these values.

use serde_json::{Value, json};

use super::{SectionContent, SectionId};

/// Company address shown on the contact page and in the footer.
pub const COMPANY_ADDRESS: &str =
    "55 Cnr Herbert Chitepo & Rekai Tangwena, Belvedere, Harare, Zimbabwe";

/// Sales email address.
pub const COMPANY_EMAIL: &str = "sales@reshow.co.zw";

/// Primary phone number.
pub const COMPANY_PHONE: &str = "+263 779 363 766";

/// Secondary phone number.
pub const COMPANY_PHONE_2: &str = "+263 772 780 083";

/// Tagline used by the hero and the footer.
pub const TAGLINE: &str = "Name it we brand it.";

fn object(value: Value) -> SectionContent {
    match value {
        Value::Object(map) => map,
        _ => SectionContent::new(),
    }
}

/// Hardcoded defaults for a section.
#[must_use]
#[allow(clippy::too_many_lines)]
pub fn hardcoded(id: SectionId) -> SectionContent {
    object(match id {
        SectionId::Hero => json!({
            "title": "Reshow Investments (Pvt) Ltd",
            "subtitle": TAGLINE,
            "description": "Trusted Zimbabwean company specialising in corporate branding, promotional gifts, corporate apparel, and branding solutions.",
            "image": "/images/placeholder/hero-image.jpg",
            "buttonText": "Request Quote",
        }),
        SectionId::WhyChoose => json!({
            "title": "Why Choose Reshow",
            "image": "/images/placeholder/why-choose.jpg",
            "benefits": [
                "Over a decade of industry experience",
                "International quality through BARRON partnership",
                "Customised branding solutions",
                "Reliable turnaround times",
                "Professional and customer-focused service",
            ],
        }),
        SectionId::ProductCategories => json!({
            "title": "Explore Our Product Categories",
            "subtitle": "Products",
            "description": "Discover our comprehensive range of corporate branding solutions, promotional products, and professional apparel tailored to your needs.",
            "buttonText": "View Products",
            "categories": [
                {"id": 1, "title": "Corporate Apparel", "description": "Professional workwear and corporate clothing solutions", "image": "/images/placeholder/apparel.jpg"},
                {"id": 2, "title": "Promotional Gifts", "description": "Custom branded gifts and promotional items", "image": "/images/placeholder/gifts.jpg"},
                {"id": 3, "title": "Top Sellers", "description": "Our most popular branding solutions", "image": "/images/placeholder/topsellers.jpg"},
                {"id": 4, "title": "PPE Wear", "description": "Personal protective equipment and safety gear", "image": "/images/placeholder/ppe.jpg"},
                {"id": 5, "title": "Headwear", "description": "Branded caps, hats, and headwear solutions", "image": "/images/placeholder/headwear.jpg"},
            ],
        }),
        SectionId::ProductShowcase => json!({
            "title": "Our Branding Solutions",
            "description": "A snapshot of our corporate branding, apparel, promotional gifts, and professional workwear solutions.",
            "products": [
                {"id": 1, "title": "Workwear & PPE", "image": "/images/placeholder/workwear.jpg"},
                {"id": 2, "title": "Corporate Apparel", "image": "/images/placeholder/apparel.jpg"},
                {"id": 3, "title": "Branded Mugs", "image": "/images/placeholder/mug.jpg"},
                {"id": 4, "title": "Promotional Bottles", "image": "/images/placeholder/bottle.jpg"},
                {"id": 5, "title": "Gift Packaging", "image": "/images/placeholder/packaging.jpg"},
                {"id": 6, "title": "Corporate Headwear", "image": "/images/placeholder/cap.jpg"},
            ],
        }),
        SectionId::CompanyLogos => json!({
            "title": "Trusted by Companies We've Worked With",
            "logos": [
                {"id": 1, "name": "Company 1", "image": "/images/placeholder/logo1.png"},
                {"id": 2, "name": "Company 2", "image": "/images/placeholder/logo2.png"},
                {"id": 3, "name": "Company 3", "image": "/images/placeholder/logo3.png"},
                {"id": 4, "name": "Company 4", "image": "/images/placeholder/logo4.png"},
                {"id": 5, "name": "Company 5", "image": "/images/placeholder/logo5.png"},
            ],
        }),
        SectionId::AboutHero => json!({
            "title": "About Reshow Investments",
            "description": "At Reshow Investments, we believe in the power of branding. With years of experience in corporate branding, promotional gifts, and corporate apparel, we help businesses make a lasting impression.",
            "description2": "",
            "image": "/images/placeholder/about-company.jpg",
        }),
        SectionId::AboutStats => json!({
            "years": "10+",
            "yearsLabel": "Years of Experience",
            "clients": "500+",
            "clientsLabel": "Happy Clients",
            "projects": "1000+",
            "projectsLabel": "Projects Completed",
        }),
        SectionId::Mission => json!({"title": "Our Mission", "content": ""}),
        SectionId::Vision => json!({"title": "Our Vision", "content": ""}),
        SectionId::Values => json!({
            "values": [
                {"title": "Efficiency", "description": "Timely turnaround without compromising quality"},
                {"title": "Integrity", "description": "Transparent operations and honest engagement"},
                {"title": "Flexibility", "description": "Tailored solutions that adapt to client needs"},
            ],
        }),
        SectionId::Partnership => json!({
            "title": "Strategic Partnerships",
            "partnerName": "BARRON South Africa",
            "description1": "",
            "description2": "",
            "image": "/images/placeholder/barron-partnership.jpg",
        }),
        SectionId::Experience => json!({
            "title": "Our Experience",
            "description": "With over 10 years of experience, we serve clients across:",
            "clients": [
                "Financial institutions",
                "Government and municipalities",
                "Manufacturing and industrial sectors",
            ],
            "images": [],
        }),
        SectionId::Services => json!({
            "title": "Our Services",
            "description": "Comprehensive branding solutions for your organisation",
            "image": "",
        }),
        SectionId::Gallery => json!({
            "title": "Gallery",
            "description": "View our portfolio of branding solutions and products.",
            "images": [
                {"id": 1, "name": "Gallery Image 1", "image": "/images/placeholder.jpg", "alt": "Gallery Image 1"},
                {"id": 2, "name": "Gallery Image 2", "image": "/images/placeholder.jpg", "alt": "Gallery Image 2"},
                {"id": 3, "name": "Gallery Image 3", "image": "/images/placeholder.jpg", "alt": "Gallery Image 3"},
            ],
        }),
        SectionId::Contact => json!({
            "title": "Contact Us",
            "description": "Get in touch with us for your branding needs.",
            "address": COMPANY_ADDRESS,
            "phone": COMPANY_PHONE,
            "phone2": COMPANY_PHONE_2,
            "email": COMPANY_EMAIL,
        }),
        SectionId::Footer => json!({
            "companyName": "Reshow Investments",
            "tagline": TAGLINE,
            "address": COMPANY_ADDRESS,
            "phone1": COMPANY_PHONE,
            "phone2": COMPANY_PHONE_2,
            "email": COMPANY_EMAIL,
            "facebook": "https://facebook.com",
            "instagram": "https://instagram.com",
            "twitter": "https://twitter.com",
            "tiktok": "https://tiktok.com",
        }),
        SectionId::Navbar => json!({"logoImage": "", "logoDisplay": "text"}),
    })
}

/// Placeholder images shown on the about page while no experience images
/// have been uploaded.
#[must_use]
pub fn experience_placeholders() -> Vec<(String, String)> {
    (1..=4)
        .map(|n| {
            (
                format!("/images/placeholder/experience-{n}.jpg"),
                "Our Experience".to_string(),
            )
        })
        .collect()
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

/// Layer values read from a page endpoint over the hardcoded defaults.
///
/// Only keys the section knows are taken, and blank page values never
/// replace a default (page endpoints often return `""` for unset fields).
#[must_use]
pub fn layer_page_values(mut defaults: SectionContent, page: &SectionContent) -> SectionContent {
    for (key, value) in page {
        if is_blank(value) {
            continue;
        }
        if let Some(slot) = defaults.get_mut(key) {
            *slot = value.clone();
        }
    }
    defaults
}
