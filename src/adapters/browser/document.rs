//! CSS-selector queries over a fetched HTML document.
//!
//! `scraper::Html` is not `Send`, so every helper parses, queries and drops the
//! document synchronously and only owned strings leave this module.

use crate::utils::error::{EtlError, Result};
use scraper::{ElementRef, Html, Selector};

pub fn parse_selector(selector: &str) -> Result<Selector> {
    Selector::parse(selector).map_err(|e| EtlError::SelectorError {
        selector: selector.to_string(),
        message: format!("{:?}", e),
    })
}

/// Element text with runs of whitespace collapsed, the way a rendered page reads.
pub fn element_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn matches(html: &str, selector: &str) -> Result<bool> {
    let selector = parse_selector(selector)?;
    let document = Html::parse_document(html);
    let found = document.select(&selector).next().is_some();
    Ok(found)
}

pub fn first_text(html: &str, selector: &str) -> Result<Option<String>> {
    let selector = parse_selector(selector)?;
    let document = Html::parse_document(html);
    let text = document.select(&selector).next().map(element_text);
    Ok(text)
}

pub fn all_texts(html: &str, selector: &str) -> Result<Vec<String>> {
    let selector = parse_selector(selector)?;
    let document = Html::parse_document(html);
    let texts = document.select(&selector).map(element_text).collect();
    Ok(texts)
}

pub fn first_inner_html(html: &str, selector: &str) -> Result<Option<String>> {
    let selector = parse_selector(selector)?;
    let document = Html::parse_document(html);
    let inner = document.select(&selector).next().map(|el| el.inner_html());
    Ok(inner)
}
