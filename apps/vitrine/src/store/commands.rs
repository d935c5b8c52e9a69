//! # Update Commands
//!
//! Typed edits accepted by `CoreStore::update_config` and
//! `CoreStore::update_content`. Each variant names exactly one field or
//! section and carries its new value.

use serde::{Deserialize, Serialize};
use vitrine_core::types::content::{
    FaqItem, FeatureHighlight, FooterContent, HeroContent, PaymentSettings, Plan, Product,
    SocialProof,
};
use vitrine_core::{AppConfig, AppContent, Environment, PricingMode, ProviderKind, ThemeMode};

// =============================================================================
// CONFIG UPDATES
// =============================================================================

/// Replace one field of [`AppConfig`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "camelCase")]
pub enum ConfigUpdate {
    PricingMode(PricingMode),
    ThemeMode(ThemeMode),
    Provider(ProviderKind),
    Environment(Environment),
    MaintenanceMode(bool),
    Version(String),
    AnchorPrice(f64),
}

impl ConfigUpdate {
    /// Wire name of the field this update touches.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        match self {
            ConfigUpdate::PricingMode(_) => "pricingMode",
            ConfigUpdate::ThemeMode(_) => "themeMode",
            ConfigUpdate::Provider(_) => "provider",
            ConfigUpdate::Environment(_) => "environment",
            ConfigUpdate::MaintenanceMode(_) => "maintenanceMode",
            ConfigUpdate::Version(_) => "version",
            ConfigUpdate::AnchorPrice(_) => "anchorPrice",
        }
    }

    /// Audit detail line, e.g. `Changed themeMode to cyber`.
    #[must_use]
    pub fn describe(&self) -> String {
        let value = match self {
            ConfigUpdate::PricingMode(v) => v.to_string(),
            ConfigUpdate::ThemeMode(v) => v.to_string(),
            ConfigUpdate::Provider(v) => v.to_string(),
            ConfigUpdate::Environment(v) => v.to_string(),
            ConfigUpdate::MaintenanceMode(v) => v.to_string(),
            ConfigUpdate::Version(v) => v.clone(),
            ConfigUpdate::AnchorPrice(v) => v.to_string(),
        };
        format!("Changed {} to {}", self.field(), value)
    }

    pub fn apply(self, config: &mut AppConfig) {
        match self {
            ConfigUpdate::PricingMode(v) => config.pricing_mode = v,
            ConfigUpdate::ThemeMode(v) => config.theme_mode = v,
            ConfigUpdate::Provider(v) => config.provider = v,
            ConfigUpdate::Environment(v) => config.environment = v,
            ConfigUpdate::MaintenanceMode(v) => config.maintenance_mode = v,
            ConfigUpdate::Version(v) => config.version = v,
            ConfigUpdate::AnchorPrice(v) => config.anchor_price = v,
        }
    }
}

// =============================================================================
// CONTENT UPDATES
// =============================================================================

/// Replace a section of [`AppContent`], or upsert one catalog entry by id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "section", content = "value", rename_all = "camelCase")]
pub enum ContentUpdate {
    Hero(HeroContent),
    Products(Vec<Product>),
    Features(Vec<FeatureHighlight>),
    Faq(Vec<FaqItem>),
    Plans(Vec<Plan>),
    Footer(FooterContent),
    SocialProof(SocialProof),
    PaymentSettings(PaymentSettings),
    /// Replace the product with the same id, or append it.
    UpsertProduct(Product),
    /// Replace the plan with the same id, or append it.
    UpsertPlan(Plan),
}

impl ContentUpdate {
    #[must_use]
    pub const fn section(&self) -> &'static str {
        match self {
            ContentUpdate::Hero(_) => "hero",
            ContentUpdate::Products(_) | ContentUpdate::UpsertProduct(_) => "products",
            ContentUpdate::Features(_) => "features",
            ContentUpdate::Faq(_) => "faq",
            ContentUpdate::Plans(_) | ContentUpdate::UpsertPlan(_) => "plans",
            ContentUpdate::Footer(_) => "footer",
            ContentUpdate::SocialProof(_) => "socialProof",
            ContentUpdate::PaymentSettings(_) => "paymentSettings",
        }
    }

    /// Audit detail line: `Updated hero` or `Updated products.tool_ghost`.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            ContentUpdate::UpsertProduct(p) => format!("Updated {}.{}", self.section(), p.id),
            ContentUpdate::UpsertPlan(p) => format!("Updated {}.{}", self.section(), p.id),
            _ => format!("Updated {}", self.section()),
        }
    }

    pub fn apply(self, content: &mut AppContent) {
        match self {
            ContentUpdate::Hero(v) => content.hero = v,
            ContentUpdate::Products(v) => content.products = v,
            ContentUpdate::Features(v) => content.features = v,
            ContentUpdate::Faq(v) => content.faq = v,
            ContentUpdate::Plans(v) => content.plans = v,
            ContentUpdate::Footer(v) => content.footer = v,
            ContentUpdate::SocialProof(v) => content.social_proof = v,
            ContentUpdate::PaymentSettings(v) => content.payment_settings = v,
            ContentUpdate::UpsertProduct(product) => {
                match content.products.iter_mut().find(|p| p.id == product.id) {
                    Some(slot) => *slot = product,
                    None => content.products.push(product),
                }
            }
            ContentUpdate::UpsertPlan(plan) => {
                match content.plans.iter_mut().find(|p| p.id == plan.id) {
                    Some(slot) => *slot = plan,
                    None => content.plans.push(plan),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vitrine_core::{default_config, default_content};

    #[test]
    fn config_update_touches_one_field() {
        let mut config = default_config();
        ConfigUpdate::ThemeMode(ThemeMode::Matrix).apply(&mut config);
        assert_eq!(config.theme_mode, ThemeMode::Matrix);
        assert_eq!(config.pricing_mode, default_config().pricing_mode);
    }

    #[test]
    fn config_update_describes_wire_value() {
        let update = ConfigUpdate::PricingMode(PricingMode::Compact);
        assert_eq!(update.describe(), "Changed pricingMode to LayoutCOMPACT");
    }

    #[test]
    fn upsert_product_replaces_by_id() {
        let mut content = default_content();
        let mut ghost = content.product("tool_ghost").expect("ghost").clone();
        ghost.popularity = 1;
        let count = content.products.len();

        ContentUpdate::UpsertProduct(ghost).apply(&mut content);
        assert_eq!(content.products.len(), count);
        assert_eq!(content.product("tool_ghost").map(|p| p.popularity), Some(1));
    }

    #[test]
    fn upsert_plan_appends_new_ids() {
        let mut content = default_content();
        let mut plan = content.plans[0].clone();
        plan.id = "plan_mensal".to_string();
        let count = content.plans.len();

        let update = ContentUpdate::UpsertPlan(plan);
        assert_eq!(update.describe(), "Updated plans.plan_mensal");
        update.apply(&mut content);
        assert_eq!(content.plans.len(), count + 1);
    }

    #[test]
    fn updates_deserialize_from_tagged_json() {
        let update: ConfigUpdate =
            serde_json::from_str(r#"{"field":"maintenanceMode","value":true}"#).expect("decode");
        assert_eq!(update, ConfigUpdate::MaintenanceMode(true));
    }
}
