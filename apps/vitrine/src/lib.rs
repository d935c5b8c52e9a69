//! # vitrine
//!
//! The async tier of Vitrine: data providers, the core store, the HTTP
//! endpoint and configuration loading. The synchronous model lives in
//! `vitrine-core`.
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────┐
//! │                    apps/vitrine                           │
//! │                                                           │
//! │   CLI (clap) ──► CoreStore ──► DataProvider ─┬─► Local    │
//! │                                              └─► Remote ──┼──► HTTP API (axum)
//! │                                                           │        │
//! │                   vitrine-core (model, KvStore) ◄─────────┼────────┘
//! └───────────────────────────────────────────────────────────┘
//! ```

pub mod api;
pub mod config;
pub mod provider;
pub mod store;
