//! Reply shortcuts for the quote inbox.
//!
//! Both hand the reply to the admin's own mail or chat client; nothing is
//! sent by the site.

use thiserror::Error;

use super::Quote;

const SIGNATURE: &str = "Best regards,\nReshow Investments Team";

/// No phone number to message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Please enter a phone number")]
pub struct PhoneRequired;

fn product_lines(quote: &Quote, quantity_label: &str) -> String {
    quote
        .products
        .iter()
        .map(|p| format!("- {} ({quantity_label}: {})", p.product_name, p.quantity))
        .collect::<Vec<_>>()
        .join("\n")
}

/// `mailto:` link with a prefilled reply.
#[must_use]
pub fn reply_mailto(quote: &Quote) -> String {
    let names = quote
        .products
        .iter()
        .map(|p| p.product_name.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    let subject = format!("Re: Quote Request - {names}");
    let body = format!(
        "Dear {},\n\nThank you for your quote request.\n\n\
         We have received your request for the following products:\n{}\n\n\
         We will get back to you shortly with pricing and details.\n\n{SIGNATURE}",
        quote.name,
        product_lines(quote, "Quantity"),
    );
    format!(
        "mailto:{}?subject={}&body={}",
        quote.email,
        urlencoding::encode(&subject),
        urlencoding::encode(&body)
    )
}

/// `wa.me` link with a prefilled message.
///
/// `phone_override` (typed in the inbox) wins over the quote's own number.
/// Everything but digits is stripped from the number.
pub fn whatsapp_link(quote: &Quote, phone_override: Option<&str>) -> Result<String, PhoneRequired> {
    let phone = phone_override
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .or_else(|| quote.phone())
        .ok_or(PhoneRequired)?;
    let digits: String = phone.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return Err(PhoneRequired);
    }

    let message = format!(
        "Hello {},\n\nThank you for your quote request.\n\n\
         Your requested products:\n{}\n\n\
         We will provide you with pricing and details shortly.\n\n{SIGNATURE}",
        quote.name,
        product_lines(quote, "Qty"),
    );
    Ok(format!(
        "https://wa.me/{digits}?text={}",
        urlencoding::encode(&message)
    ))
}
