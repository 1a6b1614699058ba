//! Domain types shared across the API, redirect and analytics layers.

mod url;

pub use url::{ClickEvent, ShortenRequest, UrlEntry};
