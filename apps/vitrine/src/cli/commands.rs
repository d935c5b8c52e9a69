//! # CLI Command Implementations

use super::Cli;
use anyhow::{Context, anyhow, bail};
use serde::Serialize;
use std::sync::Arc;
use vitrine::api;
use vitrine::config::VitrineConfig;
use vitrine::provider::{DataProvider, LocalProvider, Providers, RemoteProvider, SharedProvider};
use vitrine::store::{ConfigUpdate, CoreStore, StoreOptions};
use vitrine_core::{
    Environment, FeatureFlag, KvStore, Locale, Preferences, StorageKey, default_config,
    default_content, default_features, localize,
};

// =============================================================================
// SETTINGS
// =============================================================================

/// Load the configuration and apply command-line overrides.
pub fn load_settings(cli: &Cli) -> anyhow::Result<VitrineConfig> {
    let mut settings = VitrineConfig::load(cli.config.as_deref())?;
    if let Some(ref database) = cli.database {
        settings.database = database.clone();
    }
    if let Some(provider) = cli.provider {
        settings.provider = provider;
    }
    if cli.verbose {
        tracing::info!(?settings.database, provider = %settings.provider, "Settings loaded");
    }
    Ok(settings)
}

fn open_kv(settings: &VitrineConfig) -> anyhow::Result<Arc<KvStore>> {
    let store = KvStore::open(&settings.database)
        .with_context(|| format!("Cannot open store at {}", settings.database.display()))?;
    Ok(Arc::new(store))
}

fn remote_provider(settings: &VitrineConfig) -> anyhow::Result<Option<RemoteProvider>> {
    let Some(ref url) = settings.remote.url else {
        return Ok(None);
    };
    let provider = RemoteProvider::new(
        url.clone(),
        settings.remote.api_key.clone(),
        settings.remote.timeout(),
    )?;
    Ok(Some(provider))
}

fn require_remote(settings: &VitrineConfig) -> anyhow::Result<RemoteProvider> {
    remote_provider(settings)?
        .ok_or_else(|| anyhow!("No remote endpoint configured (set remote.url or VITRINE_REMOTE_URL)"))
}

/// Create and boot a store for one command.
async fn booted_store(settings: &VitrineConfig) -> anyhow::Result<CoreStore> {
    let kv = open_kv(settings)?;
    let local: SharedProvider = Arc::new(LocalProvider::new(Arc::clone(&kv)));
    let remote = remote_provider(settings)?.map(|r| Arc::new(r) as SharedProvider);

    let store = CoreStore::new(StoreOptions {
        providers: Providers::new(local, remote),
        preferences: Preferences::new(kv),
        initial_provider: settings.provider,
    })?;
    store.boot().await?;
    Ok(store)
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

// =============================================================================
// SERVER COMMAND
// =============================================================================

pub async fn cmd_server(
    mut settings: VitrineConfig,
    host: Option<String>,
    port: Option<u16>,
) -> anyhow::Result<()> {
    if let Some(host) = host {
        settings.server.host = host;
    }
    if let Some(port) = port {
        settings.server.port = port;
    }

    let kv = open_kv(&settings)?;
    if let Some(ref demo) = settings.demo_member {
        api::provision_demo_member(&kv, demo)?;
    }

    println!("Vitrine Core API Starting...");
    println!();
    println!("Configuration:");
    println!("  Host:     {}", settings.server.host);
    println!("  Port:     {}", settings.server.port);
    println!("  Route:    {}", settings.server.route);
    println!("  Database: {}", settings.database.display());
    println!();
    println!("Actions ({}?action=…):", settings.server.route);
    println!("  GET  get_storage&key=config|features|content");
    println!("  POST save_storage");
    println!("  GET  get_logs");
    println!("  POST add_log");
    println!("  POST login");
    println!();
    println!("Press Ctrl+C to stop");
    println!();

    api::run_server(kv, &settings.server).await?;
    Ok(())
}

// =============================================================================
// INIT COMMAND
// =============================================================================

pub async fn cmd_init(settings: &VitrineConfig, json_mode: bool, force: bool) -> anyhow::Result<()> {
    let kv = open_kv(settings)?;
    if force {
        kv.put_document(StorageKey::Config, &serde_json::to_value(default_config())?)?;
        kv.put_document(StorageKey::Features, &serde_json::to_value(default_features())?)?;
        kv.put_document(StorageKey::Content, &serde_json::to_value(default_content())?)?;
        tracing::warn!("Local documents reset to defaults");
    }
    LocalProvider::new(kv).init().await?;

    if json_mode {
        print_json(&serde_json::json!({
            "success": true,
            "database": settings.database.display().to_string(),
            "reset": force,
        }))
    } else {
        println!("Initialized local store at {}", settings.database.display());
        Ok(())
    }
}

// =============================================================================
// STATUS COMMAND
// =============================================================================

pub async fn cmd_status(settings: &VitrineConfig, json_mode: bool) -> anyhow::Result<()> {
    let store = booted_store(settings).await?;
    let snapshot = store.snapshot().await;

    if json_mode {
        return print_json(&serde_json::json!({
            "provider": snapshot.active_provider,
            "phase": snapshot.phase,
            "initialized": snapshot.is_initialized,
            "config": snapshot.config,
            "features": snapshot.features,
            "locale": snapshot.locale,
            "liteMode": snapshot.lite_mode,
            "brandRgb": snapshot.theme.css_rgb(),
            "logCount": snapshot.logs.len(),
        }));
    }

    println!("Vitrine Status");
    println!("==============");
    println!("Provider:     {}", snapshot.active_provider);
    println!("Phase:        {:?}", snapshot.phase);
    println!("Initialized:  {}", snapshot.is_initialized);
    println!("Version:      {}", snapshot.config.version);
    println!("Environment:  {}", snapshot.config.environment);
    println!("Pricing mode: {}", snapshot.config.pricing_mode);
    println!("Theme:        {} ({})", snapshot.config.theme_mode, snapshot.theme.css_rgb());
    println!("Maintenance:  {}", snapshot.config.maintenance_mode);
    println!("Locale:       {}", snapshot.locale);
    println!("Lite mode:    {}", snapshot.lite_mode);
    println!("Audit log:    {} entries", snapshot.logs.len());
    println!();
    println!("Features:");
    for flag in FeatureFlag::ALL {
        let lock = if flag.is_locked() { " (locked)" } else { "" };
        println!("  {:<16} {}{}", flag, snapshot.features.get(flag), lock);
    }
    Ok(())
}

// =============================================================================
// CONFIG COMMAND
// =============================================================================

/// Build a typed update from a field name and a textual value.
pub fn parse_config_update(field: &str, value: &str) -> anyhow::Result<ConfigUpdate> {
    let update = match field {
        "pricingMode" => ConfigUpdate::PricingMode(value.parse()?),
        "themeMode" => ConfigUpdate::ThemeMode(value.parse()?),
        "provider" => ConfigUpdate::Provider(value.parse()?),
        "environment" => ConfigUpdate::Environment(value.parse()?),
        "maintenanceMode" => ConfigUpdate::MaintenanceMode(
            value.parse().with_context(|| format!("'{value}' is not true or false"))?,
        ),
        "version" => ConfigUpdate::Version(value.to_string()),
        "anchorPrice" => ConfigUpdate::AnchorPrice(
            value.parse().with_context(|| format!("'{value}' is not a number"))?,
        ),
        other => bail!("Unknown config field '{other}'"),
    };
    Ok(update)
}

pub async fn cmd_config(
    settings: &VitrineConfig,
    json_mode: bool,
    field: Option<String>,
    value: Option<String>,
) -> anyhow::Result<()> {
    let store = booted_store(settings).await?;

    match (field, value) {
        (None, _) => {}
        (Some(field), Some(value)) => {
            let update = parse_config_update(&field, &value)?;
            store.update_config(update).await?;
        }
        (Some(field), None) => bail!("Missing value for '{field}'"),
    }

    let config = store.config().await;
    if json_mode {
        print_json(&config)
    } else {
        println!("pricingMode     {}", config.pricing_mode);
        println!("themeMode       {}", config.theme_mode);
        println!("provider        {}", config.provider);
        println!("environment     {}", config.environment);
        println!("maintenanceMode {}", config.maintenance_mode);
        println!("version         {}", config.version);
        println!("anchorPrice     {}", config.anchor_price);
        Ok(())
    }
}

// =============================================================================
// FEATURE / LOCALE / ENVIRONMENT COMMANDS
// =============================================================================

pub async fn cmd_toggle(settings: &VitrineConfig, json_mode: bool, flag: &str) -> anyhow::Result<()> {
    let flag: FeatureFlag = flag.parse()?;
    let store = booted_store(settings).await?;
    store.toggle_feature(flag).await?;

    let enabled = store.features().await.get(flag);
    if json_mode {
        print_json(&serde_json::json!({ "flag": flag, "enabled": enabled }))
    } else {
        println!("{flag} is now {}", if enabled { "ON" } else { "OFF" });
        Ok(())
    }
}

pub async fn cmd_content(
    settings: &VitrineConfig,
    json_mode: bool,
    locale: Option<&str>,
) -> anyhow::Result<()> {
    let store = booted_store(settings).await?;
    let content = match locale {
        Some(raw) => localize(&store.base_content().await, raw.parse::<Locale>()?),
        None => store.content().await,
    };

    if json_mode {
        return print_json(&content);
    }
    println!("{}", content.hero.title_line1);
    println!("{}", content.hero.title_line2);
    println!("  {}", content.hero.subtitle);
    println!("  [{}]", content.hero.cta_button);
    println!();
    for product in &content.products {
        println!("{:<14} {}", product.id, product.name);
    }
    println!();
    for plan in content.active_plans() {
        let payments = plan
            .payment_settings
            .as_ref()
            .unwrap_or(&content.payment_settings);
        let checkout = if payments.any_enabled() { "" } else { " (no payment method)" };
        println!("{:<14} {} {:.2}-{:.2}{checkout}", plan.id, plan.name, plan.price_from, plan.price_to);
    }
    Ok(())
}

pub async fn cmd_set_locale(settings: &VitrineConfig, json_mode: bool, locale: &str) -> anyhow::Result<()> {
    let locale: Locale = locale.parse()?;
    let kv = open_kv(settings)?;
    Preferences::new(kv).set_locale(locale)?;

    if json_mode {
        print_json(&serde_json::json!({ "locale": locale }))
    } else {
        println!("Locale set to {locale}");
        Ok(())
    }
}

pub async fn cmd_set_env(
    settings: &VitrineConfig,
    json_mode: bool,
    environment: &str,
) -> anyhow::Result<()> {
    let environment: Environment = environment.parse()?;
    let store = booted_store(settings).await?;
    store.set_environment(environment).await?;

    if json_mode {
        print_json(&serde_json::json!({ "environment": environment }))
    } else {
        println!("Environment set to {environment}");
        Ok(())
    }
}

// =============================================================================
// LOGS COMMAND
// =============================================================================

pub async fn cmd_logs(settings: &VitrineConfig, json_mode: bool, limit: usize) -> anyhow::Result<()> {
    let store = booted_store(settings).await?;
    let logs: Vec<_> = store.logs().await.into_iter().take(limit).collect();

    if json_mode {
        return print_json(&logs);
    }
    if logs.is_empty() {
        println!("No audit entries.");
    }
    for entry in logs {
        let when = chrono::DateTime::from_timestamp_millis(entry.timestamp)
            .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_else(|| entry.timestamp.to_string());
        println!(
            "{when}  {:<8} {:<16} {:<6} {}",
            entry.severity, entry.action, entry.user, entry.details
        );
    }
    Ok(())
}

// =============================================================================
// REMOTE COMMANDS
// =============================================================================

pub async fn cmd_login(
    settings: &VitrineConfig,
    json_mode: bool,
    email: &str,
    password: &str,
) -> anyhow::Result<()> {
    let remote = require_remote(settings)?;
    let panel = remote.login(email, password).await?;

    if json_mode {
        return print_json(&panel);
    }
    println!("Welcome {}", panel.user.email);
    println!("Plan:    {}", panel.user.plan);
    println!("Balance: {:.2}", panel.user.balance);
    for tool in panel.tools {
        println!("  {:<10} {:<20} {:?}", tool.id, tool.name, tool.status);
    }
    Ok(())
}

pub async fn cmd_health(settings: &VitrineConfig, json_mode: bool) -> anyhow::Result<()> {
    let remote = require_remote(settings)?;
    let status = remote.health().await?;

    if json_mode {
        print_json(&serde_json::json!({
            "endpoint": remote.endpoint(),
            "provider": remote.kind(),
            "status": status,
        }))
    } else {
        println!("{} - {}", remote.endpoint(), status);
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use vitrine_core::{PricingMode, ThemeMode};

    #[test]
    fn parses_each_config_field() {
        assert_eq!(
            parse_config_update("pricingMode", "LayoutANCHOR").expect("pricing"),
            ConfigUpdate::PricingMode(PricingMode::Anchor)
        );
        assert_eq!(
            parse_config_update("themeMode", "matrix").expect("theme"),
            ConfigUpdate::ThemeMode(ThemeMode::Matrix)
        );
        assert_eq!(
            parse_config_update("maintenanceMode", "true").expect("maintenance"),
            ConfigUpdate::MaintenanceMode(true)
        );
        assert_eq!(
            parse_config_update("version", "2.0.0").expect("version"),
            ConfigUpdate::Version("2.0.0".to_string())
        );
        assert!(matches!(
            parse_config_update("anchorPrice", "49.9").expect("anchor"),
            ConfigUpdate::AnchorPrice(_)
        ));
    }

    #[test]
    fn rejects_bad_fields_and_values() {
        assert!(parse_config_update("colour", "red").is_err());
        assert!(parse_config_update("environment", "qa").is_err());
        assert!(parse_config_update("maintenanceMode", "yes").is_err());
        assert!(parse_config_update("anchorPrice", "cheap").is_err());
    }
}
