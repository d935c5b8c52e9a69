//! # Localization Overlay
//!
//! A read-time transform that substitutes locale strings into content.
//! Stored content is never touched: `localize` borrows its input and returns
//! a new value.
//!
//! - Products whose id has a table entry get the table's name and description;
//!   any other product passes through unchanged.
//! - Hero lines, subtitle and CTA take the table entry when it is non-empty,
//!   otherwise the original value is kept.

use crate::translations::Translation;
use crate::types::Locale;
use crate::types::content::{AppContent, HeroContent, Product};

/// Produce the view of `base` for `locale`.
#[must_use]
pub fn localize(base: &AppContent, locale: Locale) -> AppContent {
    let table = Translation::for_locale(locale);

    let products = base
        .products
        .iter()
        .map(|p| localize_product(p, table))
        .collect();

    AppContent {
        products,
        hero: HeroContent {
            title_line1: first_available(table.hero_title_1, &base.hero.title_line1),
            title_line2: first_available(table.hero_title_2, &base.hero.title_line2),
            subtitle: first_available(table.hero_subtitle, &base.hero.subtitle),
            cta_button: first_available(table.hero_cta, &base.hero.cta_button),
        },
        ..base.clone()
    }
}

fn localize_product(product: &Product, table: &Translation) -> Product {
    match table.product(&product.id) {
        Some(text) => Product {
            name: text.name.to_string(),
            description: text.description.to_string(),
            ..product.clone()
        },
        None => product.clone(),
    }
}

fn first_available(entry: &str, original: &str) -> String {
    if entry.is_empty() { original } else { entry }.to_string()
}
