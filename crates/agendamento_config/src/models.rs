// --- File: crates/agendamento_config/src/models.rs ---

use serde::{Deserialize, Serialize};

// --- Booking Backend ---
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    /// Origin the page was served from; relative paths resolve against it.
    pub base_url: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000".to_string(),
        }
    }
}

// --- HTTP Client ---
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct HttpConfig {
    /// No timeout unless set: a hung request leaves the selector on "loading".
    pub timeout_secs: Option<u64>,
    pub follow_redirects: bool,
    /// Percent-encode the date in `/horarios/{date}/`. Off keeps the raw
    /// interpolation the backend routes were written against.
    pub encode_date_segment: bool,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: None,
            follow_redirects: true,
            encode_date_segment: false,
        }
    }
}

// --- Widget ---

/// Identifiers of the page elements the controller binds to.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct ElementIds {
    pub date_input: String,
    pub hour_select: String,
    pub message: String,
    pub form: String,
}

impl Default for ElementIds {
    fn default() -> Self {
        Self {
            date_input: "data-agendamento".to_string(),
            hour_select: "hora-agendamento".to_string(),
            message: "mensagem".to_string(),
            form: "form-agendamento".to_string(),
        }
    }
}

/// Texts shown in the hour selector placeholders and the message area.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct WidgetLabels {
    pub loading: String,
    pub no_slots: String,
    pub select_time: String,
    pub load_error: String,
    pub select_date_first: String,
    pub submit_error: String,
}

impl Default for WidgetLabels {
    fn default() -> Self {
        Self {
            loading: "Carregando horários...".to_string(),
            no_slots: "Nenhum horário disponível".to_string(),
            select_time: "Selecione o horário".to_string(),
            load_error: "Erro ao carregar horários".to_string(),
            select_date_first: "Selecione a data primeiro".to_string(),
            submit_error: "Ocorreu um erro. Tente novamente.".to_string(),
        }
    }
}

/// Message area text colors.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct MessageColors {
    pub success: String,
    pub error: String,
}

impl Default for MessageColors {
    fn default() -> Self {
        Self {
            success: "green".to_string(),
            error: "red".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct WidgetConfig {
    /// Path template for the hours lookup; `{date}` is replaced by the date.
    pub hours_path: String,
    pub ids: ElementIds,
    pub labels: WidgetLabels,
    pub colors: MessageColors,
    /// Drop hours responses that were overtaken by a later date change.
    pub discard_stale_hours: bool,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            hours_path: "/horarios/{date}/".to_string(),
            ids: ElementIds::default(),
            labels: WidgetLabels::default(),
            colors: MessageColors::default(),
            discard_stale_hours: false,
        }
    }
}

// --- Unified App Configuration ---
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub widget: WidgetConfig,
}
