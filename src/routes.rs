use crate::config::DetailRoutes;
use regex::Regex;

/// Kind of page a listing URL points at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetailKind {
    /// The listing's own detail page
    Listing,
    /// A company brand page hosting the listing
    Brand,
}

/// Picks the detail extraction routine for a listing URL
#[derive(Debug)]
pub struct DetailRouter {
    listing: Regex,
    brand: Regex,
}

impl DetailRouter {
    /// Compile the configured route patterns
    pub fn new(routes: &DetailRoutes) -> Result<Self, regex::Error> {
        Ok(Self {
            listing: Regex::new(&routes.listing_pattern)?,
            brand: Regex::new(&routes.brand_pattern)?,
        })
    }

    /// Classify a URL; listing detail wins when both patterns match
    pub fn classify(&self, url: &str) -> Option<DetailKind> {
        if self.listing.is_match(url) {
            ::log::debug!("Classifying as listing detail: {}", url);
            Some(DetailKind::Listing)
        } else if self.brand.is_match(url) {
            ::log::debug!("Classifying as brand page: {}", url);
            Some(DetailKind::Brand)
        } else {
            None
        }
    }
}
