//! # Content Records
//!
//! The aggregate of marketing copy, catalogs and payment settings that drives
//! the landing page. Products and plans carry stable identifiers; plans carry
//! their own payment settings, which may be absent in payloads written by
//! older clients and are backfilled on read (see `defaults::backfill_content`).

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Hero banner copy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeroContent {
    pub title_line1: String,
    pub title_line2: String,
    pub subtitle: String,
    pub cta_button: String,
}

/// A catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub benefits: Vec<String>,
    pub icon_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub badge: Option<String>,
    #[serde(default)]
    pub popularity: u32,
}

/// A "why us" highlight card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureHighlight {
    pub icon_name: String,
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FaqItem {
    pub category: String,
    pub question: String,
    pub answer: String,
}

/// Billing period of a plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanKind {
    Monthly,
    Annual,
    Lifetime,
}

/// A pricing plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Plan {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: PlanKind,
    pub active: bool,
    pub price_from: f64,
    pub price_to: f64,
    #[serde(default)]
    pub highlight: bool,
    #[serde(default)]
    pub order: u32,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub included_tools: Vec<String>,
    /// Absent in payloads written before per-plan payments existed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_settings: Option<PaymentSettings>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FooterContent {
    pub copyright_text: String,
    pub disclaimer_text: String,
}

/// Headline numbers and message templates for the social-proof widgets.
///
/// Counts are kept as display strings; templates contain `{count}` or
/// `{name}` placeholders filled in by the page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SocialProof {
    pub total_members: String,
    pub total_reviews: String,
    pub satisfaction_rate: String,
    pub refund_rate: String,
    pub average_rating: String,
    pub recent_opens_template: String,
    pub recent_opens_min: String,
    pub recent_opens_max: String,
    pub chat_online_min: String,
    pub chat_online_max: String,
    pub user_added_template: String,
}

// =============================================================================
// PAYMENT SETTINGS
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PixSettings {
    pub enabled: bool,
    pub titular: String,
    pub chave: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CopyPasteSettings {
    pub enabled: bool,
    pub titular: String,
    pub code: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentLinkSettings {
    pub enabled: bool,
    pub titular: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardSettings {
    pub enabled: bool,
    pub titular: String,
    pub gateway_url: String,
}

/// Coins accepted by the crypto payment method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Coin {
    #[serde(rename = "BTC")]
    Btc,
    #[serde(rename = "ETH")]
    Eth,
    #[serde(rename = "DOGE")]
    Doge,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CryptoSettings {
    pub enabled: bool,
    pub titular: String,
    pub selected_coin: Coin,
    pub wallets: BTreeMap<Coin, String>,
}

/// Payment methods offered at checkout. Each method is enabled independently.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentSettings {
    pub pix: PixSettings,
    pub copy_paste: CopyPasteSettings,
    pub payment_link: PaymentLinkSettings,
    pub card: CardSettings,
    pub crypto: CryptoSettings,
}

impl PaymentSettings {
    /// Whether at least one method can take a payment.
    #[must_use]
    pub fn any_enabled(&self) -> bool {
        self.pix.enabled
            || self.copy_paste.enabled
            || self.payment_link.enabled
            || self.card.enabled
            || self.crypto.enabled
    }
}

// =============================================================================
// AGGREGATE
// =============================================================================

/// Everything the landing page renders.
///
/// Fields missing from a stored payload are filled from the defaults when
/// read through `defaults::content_from_value`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppContent {
    pub hero: HeroContent,
    pub products: Vec<Product>,
    pub features: Vec<FeatureHighlight>,
    pub faq: Vec<FaqItem>,
    pub plans: Vec<Plan>,
    pub footer: FooterContent,
    pub social_proof: SocialProof,
    pub payment_settings: PaymentSettings,
}

impl AppContent {
    #[must_use]
    pub fn product(&self, id: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    /// Active plans sorted by their display order.
    #[must_use]
    pub fn active_plans(&self) -> Vec<&Plan> {
        let mut plans: Vec<&Plan> = self.plans.iter().filter(|p| p.active).collect();
        plans.sort_by_key(|p| p.order);
        plans
    }
}
