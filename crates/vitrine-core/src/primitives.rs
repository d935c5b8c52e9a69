//! # Primitives
//!
//! Fixed constants compiled into the binary: storage keys, capacities, and
//! input limits shared by the store and the HTTP endpoint.

/// Maximum number of audit entries kept. Older entries are evicted on append.
pub const AUDIT_LOG_CAPACITY: usize = 100;

/// Actor recorded on audit entries written from the admin surface.
pub const DEFAULT_ACTOR: &str = "ADMIN";

/// Product identifiers that carry a translation table entry.
pub const KNOWN_PRODUCT_IDS: [&str; 8] = [
    "bundle_elite",
    "tool_sequence",
    "tool_viking",
    "tool_sniper",
    "tool_ghost",
    "tool_cards",
    "tool_speed",
    "tool_magnata",
];

// =============================================================================
// INPUT VALIDATION LIMITS
// =============================================================================

/// Maximum encoded size of a single stored document (config, flags, content).
pub const MAX_DOCUMENT_BYTES: usize = 1024 * 1024;

/// Maximum length of the free-text fields of an audit entry.
pub const MAX_AUDIT_TEXT_LENGTH: usize = 4096;
