//! # Property-Based Tests
//!
//! Invariants of the content model checked with proptest: the localization
//! overlay, the payment-settings backfill and the audit ring cap.

use proptest::collection::vec;
use proptest::prelude::*;
use vitrine_core::primitives::{AUDIT_LOG_CAPACITY, KNOWN_PRODUCT_IDS};
use vitrine_core::types::content::HeroContent;
use vitrine_core::{
    AppContent, AuditLogEntry, Environment, KvStore, Locale, Product, Severity, backfill_content,
    content_from_value, default_content, default_payment_settings, localize,
};

// =============================================================================
// STRATEGIES
// =============================================================================

fn locale() -> impl Strategy<Value = Locale> {
    prop::sample::select(Locale::ALL.to_vec())
}

fn product_id() -> impl Strategy<Value = String> {
    prop_oneof![
        prop::sample::select(KNOWN_PRODUCT_IDS.to_vec()).prop_map(str::to_string),
        "custom_[a-z]{1,8}",
    ]
}

fn product() -> impl Strategy<Value = Product> {
    (product_id(), ".{0,24}", ".{0,48}", 0u32..200).prop_map(|(id, name, description, popularity)| {
        Product {
            id,
            name,
            description,
            benefits: vec![],
            icon_name: "Box".to_string(),
            badge: None,
            popularity,
        }
    })
}

fn content() -> impl Strategy<Value = AppContent> {
    (
        vec(product(), 0..12),
        ".{0,16}",
        ".{0,16}",
        ".{0,32}",
        ".{0,16}",
    )
        .prop_map(|(products, line1, line2, subtitle, cta)| AppContent {
            products,
            hero: HeroContent {
                title_line1: line1,
                title_line2: line2,
                subtitle,
                cta_button: cta,
            },
            ..default_content()
        })
}

fn audit_entry(n: usize) -> AuditLogEntry {
    AuditLogEntry {
        id: format!("log-{n}"),
        timestamp: n as i64,
        action: "TEST".to_string(),
        user: "ADMIN".to_string(),
        details: String::new(),
        environment: Environment::Prod,
        severity: Severity::Info,
    }
}

// =============================================================================
// PROPERTY TESTS
// =============================================================================

proptest! {
    /// Applying a second locale erases every trace of the first.
    #[test]
    fn localization_is_not_cumulative(base in content(), first in locale(), second in locale()) {
        let twice = localize(&localize(&base, first), second);
        prop_assert_eq!(twice, localize(&base, second));
    }

    /// Localizing never changes its input.
    #[test]
    fn localization_does_not_mutate_input(base in content(), target in locale()) {
        let snapshot = base.clone();
        let _ = localize(&base, target);
        prop_assert_eq!(base, snapshot);
    }

    /// Same locale twice gives the same view.
    #[test]
    fn localization_is_idempotent(base in content(), target in locale()) {
        let once = localize(&base, target);
        prop_assert_eq!(localize(&once, target), once);
    }

    /// Product order and unknown products survive the overlay.
    #[test]
    fn localization_preserves_catalog_shape(base in content(), target in locale()) {
        let view = localize(&base, target);
        prop_assert_eq!(view.products.len(), base.products.len());
        for (seen, original) in view.products.iter().zip(&base.products) {
            prop_assert_eq!(&seen.id, &original.id);
            if !KNOWN_PRODUCT_IDS.contains(&original.id.as_str()) {
                prop_assert_eq!(seen, original);
            }
        }
    }

    /// Backfill only fills holes and is stable under repetition.
    #[test]
    fn backfill_is_idempotent(missing in vec(any::<bool>(), 2)) {
        let mut content = default_content();
        for (plan, drop) in content.plans.iter_mut().zip(&missing) {
            if *drop {
                plan.payment_settings = None;
            }
        }
        let once = backfill_content(content);
        prop_assert!(once.plans.iter().all(|p| p.payment_settings == Some(default_payment_settings())));
        prop_assert_eq!(backfill_content(once.clone()), once);
    }

    /// The audit ring never holds more than the cap and keeps the newest.
    #[test]
    fn audit_ring_is_bounded(count in 0usize..180) {
        let store = KvStore::in_memory().expect("store");
        for n in 0..count {
            store.append_audit(&audit_entry(n)).expect("append");
        }
        let kept = count.min(AUDIT_LOG_CAPACITY);
        let recent = store.recent_audit(AUDIT_LOG_CAPACITY).expect("recent");
        prop_assert_eq!(recent.len(), kept);
        if let Some(newest) = recent.first() {
            prop_assert_eq!(&newest.id, &format!("log-{}", count - 1));
        }
    }
}

// =============================================================================
// DECODE TESTS
// =============================================================================

#[test]
fn stored_content_round_trips_through_decode() {
    let content = default_content();
    let value = serde_json::to_value(&content).expect("encode");
    assert_eq!(content_from_value(value).expect("decode"), content);
}

#[test]
fn decode_backfills_legacy_plans() {
    let mut value = serde_json::to_value(default_content()).expect("encode");
    if let Some(plans) = value["plans"].as_array_mut() {
        for plan in plans {
            if let Some(obj) = plan.as_object_mut() {
                obj.remove("paymentSettings");
            }
        }
    }
    let decoded = content_from_value(value).expect("decode");
    assert!(decoded.plans.iter().all(|p| p.payment_settings.is_some()));
}
