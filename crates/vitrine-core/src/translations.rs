//! # Translation Tables
//!
//! One table per [`Locale`]. Every table defines every key: the overlay in
//! `localize` replaces a field only when the entry is non-empty, so a gap in
//! one table would let text from a previously applied locale leak through.

use crate::types::Locale;

/// Display name and description of a known product.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProductText {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
}

/// Strings substituted into content for one locale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Translation {
    pub hero_title_1: &'static str,
    pub hero_title_2: &'static str,
    pub hero_subtitle: &'static str,
    pub hero_cta: &'static str,
    pub products: [ProductText; 8],
}

impl Translation {
    /// Table for `locale`.
    #[must_use]
    pub fn for_locale(locale: Locale) -> &'static Translation {
        match locale {
            Locale::Pt => &PT,
            Locale::En => &EN,
            Locale::Es => &ES,
        }
    }

    /// Entry for a product id, if the id is one of the known products.
    #[must_use]
    pub fn product(&self, id: &str) -> Option<&ProductText> {
        self.products.iter().find(|p| p.id == id)
    }
}

const fn text(id: &'static str, name: &'static str, description: &'static str) -> ProductText {
    ProductText { id, name, description }
}

static PT: Translation = Translation {
    hero_title_1: "DOMINE O JOGO.",
    hero_title_2: "ACESSO GRATUITO.",
    hero_subtitle: "Crie sua conta e acesse o painel de ferramentas. A ativação é feita dentro do painel.",
    hero_cta: "CRIAR ACESSO GRÁTIS",
    products: [
        text("bundle_elite", "Vitrine Pass (Tudo em Um)", "Todas as ferramentas do painel em uma única licença."),
        text("tool_sequence", "Planejador de Sequências", "Sugere a próxima jogada com base no histórico da sessão."),
        text("tool_viking", "Piloto de Missões", "Automatiza tarefas repetitivas de eventos."),
        text("tool_sniper", "Localizador de Alvos", "Encontra alvos com filtros avançados."),
        text("tool_ghost", "Modo Fantasma", "Mantém seu perfil e sua atividade privados."),
        text("tool_cards", "Finalizador de Coleções", "Mostra o que falta para completar cada coleção."),
        text("tool_speed", "Acelerador", "Reduz o tempo de espera entre ações."),
        text("tool_magnata", "Módulo Comunidade", "Ferramentas para ajudar seu grupo a progredir."),
    ],
};

static EN: Translation = Translation {
    hero_title_1: "MASTER THE GAME.",
    hero_title_2: "FREE ACCESS.",
    hero_subtitle: "Create your account and open the tools panel. Activation happens inside the panel.",
    hero_cta: "CREATE FREE ACCESS",
    products: [
        text("bundle_elite", "Vitrine Pass (All-in-One)", "Every panel tool under a single license."),
        text("tool_sequence", "Sequence Planner", "Suggests your next move from the session history."),
        text("tool_viking", "Quest Autopilot", "Automates repetitive event tasks."),
        text("tool_sniper", "Target Finder", "Finds targets with advanced filters."),
        text("tool_ghost", "Ghost Mode", "Keeps your profile and activity private."),
        text("tool_cards", "Collection Finisher", "Shows what is missing to complete each collection."),
        text("tool_speed", "Time Warp", "Cuts the waiting time between actions."),
        text("tool_magnata", "Community Module", "Tools that help your group level up."),
    ],
};

static ES: Translation = Translation {
    hero_title_1: "DOMINA EL JUEGO.",
    hero_title_2: "ACCESO GRATUITO.",
    hero_subtitle: "Crea tu cuenta y accede al panel de herramientas. La activación se hace dentro del panel.",
    hero_cta: "CREAR ACCESO GRATIS",
    products: [
        text("bundle_elite", "Vitrine Pass (Todo en Uno)", "Todas las herramientas del panel en una sola licencia."),
        text("tool_sequence", "Planificador de Secuencias", "Sugiere tu próxima jugada según el historial de la sesión."),
        text("tool_viking", "Piloto de Misiones", "Automatiza tareas repetitivas de eventos."),
        text("tool_sniper", "Buscador de Objetivos", "Encuentra objetivos con filtros avanzados."),
        text("tool_ghost", "Modo Fantasma", "Mantiene tu perfil y tu actividad en privado."),
        text("tool_cards", "Finalizador de Colecciones", "Muestra lo que falta para completar cada colección."),
        text("tool_speed", "Acelerador", "Reduce el tiempo de espera entre acciones."),
        text("tool_magnata", "Módulo Comunidad", "Herramientas para que tu grupo progrese."),
    ],
};
