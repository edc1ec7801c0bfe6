//! Offline parsing of page sources fetched from the browser.

pub mod html;
pub mod text;

pub use html::{DetailParseError, parse_detail};
