//! Anti-forgery token scraping
//!
//! The portal embeds a single-use token in a hidden form field of its landing
//! page and expects it back as a request header on every state-changing call.
//! The markup layout is an external contract: when the field disappears the
//! fetch fails with [`PortalError::TokenNotFound`] instead of sending an
//! empty header.

use std::sync::LazyLock;

use scraper::{Html, Selector};
use tracing::{debug, trace};

use crate::error::PortalError;
use crate::transport::PortalTransport;

/// Name of the hidden input carrying the token
pub const TOKEN_FIELD: &str = "__RequestVerificationToken";

/// Header the portal reads the token from
///
/// Header names pass through the `http` crate, which lowercases them on the
/// wire (`requestverificationtoken`). The portal matches header names
/// case-insensitively.
pub const TOKEN_HEADER: &str = "RequestVerificationToken";

static TOKEN_INPUT: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(r#"input[name="__RequestVerificationToken"]"#)
        .expect("anti-forgery selector is valid")
});

/// Fetch the landing page and extract a fresh anti-forgery token
///
/// The page is requested without bearer credentials, over the transport's
/// cookie jar so the token pairs with the portal's anti-forgery cookie.
pub async fn fetch(transport: &PortalTransport) -> Result<String, PortalError> {
    let markup = transport.landing_page().await?;
    let token = extract(&markup)?;
    debug!("Fetched anti-forgery token");
    Ok(token)
}

/// Extract the token from landing page markup
///
/// Returns the value of the first matching input in document order. Inputs
/// with the right name but no value are skipped.
pub fn extract(markup: &str) -> Result<String, PortalError> {
    let document = Html::parse_document(markup);

    document
        .select(&TOKEN_INPUT)
        .find_map(|input| {
            let value = input.value().attr("value").filter(|v| !v.is_empty());
            if value.is_none() {
                trace!("Skipping anti-forgery input without a value");
            }
            value.map(str::to_string)
        })
        .ok_or(PortalError::TokenNotFound)
}
