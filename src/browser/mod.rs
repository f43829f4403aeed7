use anyhow::{bail, Context, Result};

use crate::listing::Listing;

/// Open a listing's original post in the user's default browser
///
/// # Errors
/// Returns error if the listing has no post URL or no browser can be opened
pub fn open_listing(listing: &Listing) -> Result<&str> {
    let Some(url) = listing.post_url.as_deref().filter(|u| !u.trim().is_empty()) else {
        bail!("Listing {} has no post URL", listing.post_id);
    };
    webbrowser::open(url).with_context(|| format!("Failed to open browser for URL: {}", url))?;
    Ok(url)
}
