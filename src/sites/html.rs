//! Small selector helpers shared by the site extractors

use regex::Regex;
use std::sync::LazyLock;
use scraper::{ElementRef, Selector};

/// Parses a CSS selector, `None` when it is invalid
pub(crate) fn selector(css: &str) -> Option<Selector> {
    Selector::parse(css).ok()
}

/// Concatenates the element's text nodes, each trimmed
pub(crate) fn stripped_text(element: ElementRef<'_>) -> String {
    element.text().map(str::trim).collect()
}

/// First descendant matching `css`
pub(crate) fn first<'a>(scope: ElementRef<'a>, css: &str) -> Option<ElementRef<'a>> {
    let selector = selector(css)?;
    let found = scope.select(&selector).next();
    found
}

/// Stripped text of the first descendant matching `css`, empty when absent
pub(crate) fn first_text(scope: ElementRef<'_>, css: &str) -> String {
    first(scope, css).map(stripped_text).unwrap_or_default()
}

/// All descendants matching `css`
pub(crate) fn all<'a>(scope: ElementRef<'a>, css: &str) -> Vec<ElementRef<'a>> {
    let Some(selector) = selector(css) else {
        return Vec::new();
    };
    let found = scope.select(&selector).collect();
    found
}

static DIGITS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d+").unwrap());

/// First run of ASCII digits in `text`
pub(crate) fn first_number(text: &str) -> Option<u64> {
    DIGITS.find(text)?.as_str().parse().ok()
}
