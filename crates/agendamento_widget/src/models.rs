// --- File: crates/agendamento_widget/src/models.rs ---
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One bookable hour on the requested date, as returned by `/horarios/{date}/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSlot {
    /// "HH:MM" label, also used as the option value.
    pub hora: String,
    /// Remaining capacity for this hour.
    pub vagas: i64,
}

impl TimeSlot {
    pub fn new(hora: impl Into<String>, vagas: i64) -> Self {
        Self {
            hora: hora.into(),
            vagas,
        }
    }

    /// Text shown for this slot in the hour selector, e.g. `08:30 (4 vagas)`.
    pub fn option_label(&self) -> String {
        format!("{} ({} vagas)", self.hora, self.vagas)
    }
}

/// An `<option>` of the hour selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

impl SelectOption {
    /// A non-selectable entry (empty value) used for loading, empty and error states.
    pub fn placeholder(label: impl Into<String>) -> Self {
        Self {
            value: String::new(),
            label: label.into(),
        }
    }

    pub fn is_placeholder(&self) -> bool {
        self.value.is_empty()
    }
}

impl From<&TimeSlot> for SelectOption {
    fn from(slot: &TimeSlot) -> Self {
        Self {
            value: slot.hora.clone(),
            label: slot.option_label(),
        }
    }
}

/// Body returned by the booking endpoint: `{"success": "..."}` or `{"error": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SubmissionResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// What the message area should do with a [`SubmissionResult`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionOutcome {
    Success(String),
    Error(String),
    /// Neither key carried a message; nothing is rendered.
    Unrecognized,
}

impl SubmissionResult {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            success: Some(message.into()),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: None,
            error: Some(message.into()),
        }
    }

    /// Reads a result out of an arbitrary JSON body.
    ///
    /// Only string values count. Anything that is not an object, or an object
    /// without the keys, yields an empty result rather than an error.
    pub fn from_value(value: &Value) -> Self {
        let text = |key: &str| value.get(key).and_then(Value::as_str).map(str::to_owned);
        Self {
            success: text("success"),
            error: text("error"),
        }
    }

    /// `success` wins over `error`; empty strings count as absent.
    pub fn outcome(&self) -> SubmissionOutcome {
        match (non_empty(&self.success), non_empty(&self.error)) {
            (Some(message), _) => SubmissionOutcome::Success(message.to_owned()),
            (None, Some(message)) => SubmissionOutcome::Error(message.to_owned()),
            (None, None) => SubmissionOutcome::Unrecognized,
        }
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

/// A named form control. `reset` puts the value back to what the page
/// rendered, so hidden fields such as the CSRF token survive a reset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormField {
    pub name: String,
    pub default_value: String,
    pub value: String,
}

impl FormField {
    pub fn new(name: impl Into<String>, default_value: impl Into<String>) -> Self {
        let default_value = default_value.into();
        Self {
            name: name.into(),
            value: default_value.clone(),
            default_value,
        }
    }

    pub fn reset(&mut self) {
        self.value.clone_from(&self.default_value);
    }
}
