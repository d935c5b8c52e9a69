//! # Seed Values
//!
//! Hard-coded defaults used to seed an empty backend, plus the
//! forward-compatibility merge applied whenever content is read.
//!
//! The base copy is written in the default locale (`pt`); other locales are
//! applied at view time by `localize`.

use crate::types::content::{
    AppContent, CardSettings, Coin, CopyPasteSettings, CryptoSettings, FaqItem, FeatureHighlight,
    FooterContent, HeroContent, PaymentLinkSettings, PaymentSettings, PixSettings, Plan, PlanKind,
    Product, SocialProof,
};
use crate::types::{AppConfig, CoreError, Environment, FeatureFlags, PricingMode, ProviderKind, ThemeMode};
use crate::primitives::KNOWN_PRODUCT_IDS;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::BTreeMap;

/// Version string written into a freshly seeded configuration.
pub const SEED_VERSION: &str = "4.7.0";

#[must_use]
pub fn default_config() -> AppConfig {
    AppConfig {
        pricing_mode: PricingMode::Principal,
        theme_mode: ThemeMode::Gold,
        provider: ProviderKind::Local,
        environment: Environment::Prod,
        maintenance_mode: false,
        version: SEED_VERSION.to_string(),
        anchor_price: 350.0,
    }
}

#[must_use]
pub const fn default_features() -> FeatureFlags {
    FeatureFlags {
        sales_toast: true,
        exit_popup: true,
        floating_chat: true,
        top_banner: true,
        emulator: true,
        campaign_active: false,
        ai_enabled: false,
        global_notes: true,
    }
}

#[must_use]
pub fn default_payment_settings() -> PaymentSettings {
    PaymentSettings {
        pix: PixSettings {
            enabled: true,
            titular: "VITRINE LTDA".to_string(),
            chave: "pagamentos@vitrine.example".to_string(),
        },
        copy_paste: CopyPasteSettings {
            enabled: true,
            titular: "VITRINE".to_string(),
            code: "00020126360014BR.GOV.BCB.PIX0114+5500000000000520400005303986".to_string(),
        },
        payment_link: PaymentLinkSettings {
            enabled: true,
            titular: String::new(),
            url: "https://pay.vitrine.example/checkout/pass".to_string(),
        },
        card: CardSettings {
            enabled: true,
            titular: "VITRINE GATEWAY".to_string(),
            gateway_url: "https://pay.vitrine.example/card".to_string(),
        },
        crypto: CryptoSettings {
            enabled: true,
            titular: "VITRINE CRYPTO".to_string(),
            selected_coin: Coin::Btc,
            wallets: BTreeMap::from([
                (Coin::Btc, "bc1qexampleexampleexampleexampleexample0".to_string()),
                (Coin::Eth, "0x0000000000000000000000000000000000000000".to_string()),
                (Coin::Doge, "DExampleExampleExampleExampleExam".to_string()),
            ]),
        },
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}

fn product(id: &str, name: &str, icon: &str, badge: Option<&str>, popularity: u32, benefits: &[&str]) -> Product {
    Product {
        id: id.to_string(),
        name: name.to_string(),
        description: String::new(),
        benefits: strings(benefits),
        icon_name: icon.to_string(),
        badge: badge.map(str::to_string),
        popularity,
    }
}

fn default_products() -> Vec<Product> {
    vec![
        product("bundle_elite", "Vitrine Pass (Tudo em Um)", "Crown", Some("CADASTRO ABERTO"), 100, &[
            "Todas as ferramentas em uma licença",
            "Atualizações automáticas",
            "Suporte prioritário",
        ]),
        product("tool_sequence", "Planejador de Sequências", "Brain", None, 95, &[
            "Sugestões em tempo real",
            "Histórico de sessões",
        ]),
        product("tool_viking", "Piloto de Missões", "Coins", Some("SISTEMA ATIVO"), 99, &[
            "Automação de tarefas repetitivas",
            "Relatório por evento",
        ]),
        product("tool_sniper", "Localizador de Alvos", "Target", None, 92, &[
            "Filtros avançados",
            "Alertas configuráveis",
        ]),
        product("tool_ghost", "Modo Fantasma", "Ghost", None, 96, &[
            "Perfil privado",
            "Atividade oculta",
        ]),
        product("tool_cards", "Finalizador de Coleções", "Magnet", None, 88, &[
            "Prioriza itens raros",
            "Lista de faltantes",
        ]),
        product("tool_speed", "Acelerador", "Rabbit", None, 85, &[
            "Menos espera entre ações",
            "Animações reduzidas",
        ]),
        product("tool_magnata", "Módulo Comunidade", "Users", Some("COMUNIDADE"), 98, &[
            "Ajuda amigos a progredir",
            "Painel de grupo",
        ]),
    ]
}

fn default_plans() -> Vec<Plan> {
    let all_tools: Vec<String> = KNOWN_PRODUCT_IDS.iter().map(|s| (*s).to_string()).collect();
    vec![
        Plan {
            id: "plan_anual".to_string(),
            name: "Plano Anual".to_string(),
            kind: PlanKind::Annual,
            active: true,
            price_from: 299.0,
            price_to: 100.0,
            highlight: false,
            order: 1,
            description: "Acesso completo a todas as ferramentas por 1 ano.".to_string(),
            features: strings(&["Licença anual completa", "Atualizações semanais", "Operação 100% em nuvem"]),
            included_tools: all_tools.clone(),
            payment_settings: Some(default_payment_settings()),
        },
        Plan {
            id: "plan_vitalicio".to_string(),
            name: "Acesso Vitalício".to_string(),
            kind: PlanKind::Lifetime,
            active: true,
            price_from: 350.0,
            price_to: 150.0,
            highlight: true,
            order: 2,
            description: "Pague uma vez e use para sempre com todos os recursos.".to_string(),
            features: strings(&[
                "Licença vitalícia sem mensalidade",
                "Todas as ferramentas desbloqueadas",
                "Acesso antecipado a betas",
                "Suporte prioritário",
            ]),
            included_tools: all_tools,
            payment_settings: Some(default_payment_settings()),
        },
    ]
}

#[must_use]
pub fn default_content() -> AppContent {
    AppContent {
        hero: HeroContent {
            title_line1: "DOMINE O JOGO.".to_string(),
            title_line2: "ACESSO GRATUITO.".to_string(),
            subtitle: "Crie sua conta e acesse o painel de ferramentas. A ativação é feita dentro do painel.".to_string(),
            cta_button: "CRIAR ACESSO GRÁTIS".to_string(),
        },
        products: default_products(),
        features: vec![
            FeatureHighlight {
                icon_name: "Target".to_string(),
                title: "Resultado ou nada".to_string(),
                description: "Só iniciamos projetos com impacto claro e mensurável.".to_string(),
            },
            FeatureHighlight {
                icon_name: "Zap".to_string(),
                title: "Velocidade".to_string(),
                description: "Entregas rápidas porque executamos certo desde o início.".to_string(),
            },
            FeatureHighlight {
                icon_name: "Shield".to_string(),
                title: "Segurança".to_string(),
                description: "Riscos antecipados antes de chegarem até você.".to_string(),
            },
        ],
        faq: vec![
            FaqItem {
                category: "Acesso e Registro".to_string(),
                question: "O cadastro é gratuito?".to_string(),
                answer: "Sim. A licença das ferramentas é adquirida dentro do painel.".to_string(),
            },
            FaqItem {
                category: "Upgrade".to_string(),
                question: "Como ativo uma licença?".to_string(),
                answer: "No painel de membro, escolha uma ferramenta bloqueada ou clique em Upgrade.".to_string(),
            },
        ],
        plans: default_plans(),
        footer: FooterContent {
            copyright_text: "© 2026 VITRINE".to_string(),
            disclaimer_text: "Plataforma independente.".to_string(),
        },
        social_proof: SocialProof {
            total_members: "9.854".to_string(),
            total_reviews: "1.342".to_string(),
            satisfaction_rate: "98.5%".to_string(),
            refund_rate: "1.2%".to_string(),
            average_rating: "4.9".to_string(),
            recent_opens_template: "+{count} pessoas criaram conta agora".to_string(),
            recent_opens_min: "12".to_string(),
            recent_opens_max: "47".to_string(),
            chat_online_min: "400".to_string(),
            chat_online_max: "1500".to_string(),
            user_added_template: "{name} entrou na comunidade".to_string(),
        },
        payment_settings: default_payment_settings(),
    }
}

// =============================================================================
// FORWARD-COMPATIBILITY MERGE
// =============================================================================

/// Fill plan payment settings that are absent with the default settings.
///
/// Pure: the caller decides whether the result is ever written back.
#[must_use]
pub fn backfill_content(mut content: AppContent) -> AppContent {
    for plan in &mut content.plans {
        if plan.payment_settings.is_none() {
            plan.payment_settings = Some(default_payment_settings());
        }
    }
    content
}

/// Overlay the top-level fields of `stored` on the serialized `defaults`.
///
/// Fields missing from `stored`, or stored as `null`, keep their default.
fn merge_over_defaults<T>(defaults: &T, stored: Value, what: &str) -> Result<T, CoreError>
where
    T: Serialize + DeserializeOwned,
{
    let Value::Object(stored) = stored else {
        return Err(CoreError::Serialization(format!(
            "{what} document is not a JSON object"
        )));
    };
    let mut merged = match serde_json::to_value(defaults) {
        Ok(Value::Object(map)) => map,
        Ok(_) => {
            return Err(CoreError::Serialization(format!(
                "default {what} is not an object"
            )));
        }
        Err(e) => return Err(CoreError::Serialization(e.to_string())),
    };
    for (field, value) in stored {
        if !value.is_null() {
            merged.insert(field, value);
        }
    }
    serde_json::from_value(Value::Object(merged))
        .map_err(|e| CoreError::Serialization(format!("{what}: {e}")))
}

/// Decode a stored configuration; missing fields come from [`default_config`].
pub fn config_from_value(stored: Value) -> Result<AppConfig, CoreError> {
    merge_over_defaults(&default_config(), stored, "config")
}

/// Decode stored feature flags; missing flags come from [`default_features`].
pub fn features_from_value(stored: Value) -> Result<FeatureFlags, CoreError> {
    merge_over_defaults(&default_features(), stored, "features")
}

/// Decode a stored content document, tolerating documents written by older
/// clients.
///
/// Top-level sections missing from `stored` (or stored as `null`) are taken
/// from [`default_content`], then [`backfill_content`] runs.
pub fn content_from_value(stored: Value) -> Result<AppContent, CoreError> {
    let content = merge_over_defaults(&default_content(), stored, "content")?;
    Ok(backfill_content(content))
}
