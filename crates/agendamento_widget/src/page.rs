// --- File: crates/agendamento_widget/src/page.rs ---
//! The page the widget renders into.
//!
//! [`BookingPage`] is the narrow surface the controller needs from a document:
//! element lookup, the hour selector, the message area and the form.
//! [`MemoryPage`] keeps all of that in memory; the terminal driver renders it
//! and the tests inspect it.

use crate::models::{FormField, SelectOption};
use agendamento_config::{ElementIds, WidgetLabels};
use std::collections::BTreeSet;

pub trait BookingPage: Send {
    /// Whether an element with this identifier exists.
    fn has_element(&self, id: &str) -> bool;

    /// Replaces every option of the hour selector.
    fn set_hour_options(&mut self, options: Vec<SelectOption>);

    fn set_message_text(&mut self, text: &str);

    fn set_message_color(&mut self, color: &str);

    /// The form's target address, possibly relative to the page origin.
    fn form_action(&self) -> String;

    /// Current `(name, value)` pairs of every form control, in document order.
    fn form_fields(&self) -> Vec<(String, String)>;

    /// Puts every form control back to its default value.
    fn reset_form(&mut self);
}

/// Field names of the booking form, in document order.
pub const BOOKING_FIELDS: [&str; 6] = ["nome", "email", "telefone", "data", "hora", "doador"];

/// The form field backed by the hour selector.
pub const HOUR_FIELD: &str = "hora";

/// An in-memory page.
#[derive(Debug, Clone, Default)]
pub struct MemoryPage {
    elements: BTreeSet<String>,
    hour_options: Vec<SelectOption>,
    message_text: String,
    message_color: Option<String>,
    form_action: String,
    fields: Vec<FormField>,
    /// Field whose value is whichever hour option is selected.
    hour_field: Option<String>,
    mutations: usize,
}

impl MemoryPage {
    /// An empty page with no elements, posting to `form_action`.
    pub fn new(form_action: impl Into<String>) -> Self {
        Self {
            form_action: form_action.into(),
            ..Self::default()
        }
    }

    /// The booking page: the four widget elements, the booking fields and a
    /// selector asking for a date first.
    pub fn standard(
        ids: &ElementIds,
        labels: &WidgetLabels,
        form_action: impl Into<String>,
    ) -> Self {
        let mut page = Self::new(form_action)
            .with_element(&ids.date_input)
            .with_element(&ids.hour_select)
            .with_element(&ids.message)
            .with_element(&ids.form);
        for name in BOOKING_FIELDS {
            let default = if name == "doador" { "False" } else { "" };
            page = page.with_field(name, default);
        }
        page = page.with_hour_field(HOUR_FIELD);
        page.hour_options = vec![SelectOption::placeholder(&labels.select_date_first)];
        page
    }

    pub fn with_element(mut self, id: impl Into<String>) -> Self {
        self.elements.insert(id.into());
        self
    }

    pub fn with_field(mut self, name: impl Into<String>, default_value: impl Into<String>) -> Self {
        self.fields.push(FormField::new(name, default_value));
        self
    }

    /// Binds the hour selector to the form field `name`: replacing the options
    /// selects the first one, and the field only takes values that are offered.
    pub fn with_hour_field(mut self, name: impl Into<String>) -> Self {
        self.hour_field = Some(name.into());
        self
    }

    /// Simulates user input. Returns false when the form has no such field, or
    /// when `name` is the hour field and `value` is not one of the options.
    pub fn set_field(&mut self, name: &str, value: impl Into<String>) -> bool {
        let value = value.into();
        if self.hour_field.as_deref() == Some(name)
            && !self.hour_options.iter().any(|o| o.value == value)
        {
            return false;
        }
        match self.fields.iter_mut().find(|f| f.name == name) {
            Some(field) => {
                field.value = value;
                true
            }
            None => false,
        }
    }

    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.name == name)
            .map(|f| f.value.as_str())
    }

    pub fn hour_options(&self) -> &[SelectOption] {
        &self.hour_options
    }

    pub fn message_text(&self) -> &str {
        &self.message_text
    }

    pub fn message_color(&self) -> Option<&str> {
        self.message_color.as_deref()
    }

    /// Number of writes made through [`BookingPage`]; user input via
    /// [`MemoryPage::set_field`] is not counted.
    pub fn mutation_count(&self) -> usize {
        self.mutations
    }
}

impl BookingPage for MemoryPage {
    fn has_element(&self, id: &str) -> bool {
        self.elements.contains(id)
    }

    fn set_hour_options(&mut self, options: Vec<SelectOption>) {
        self.mutations += 1;
        let selected = options.first().map(|o| o.value.clone()).unwrap_or_default();
        self.hour_options = options;
        if let Some(name) = &self.hour_field {
            if let Some(field) = self.fields.iter_mut().find(|f| &f.name == name) {
                field.value = selected;
            }
        }
    }

    fn set_message_text(&mut self, text: &str) {
        self.mutations += 1;
        self.message_text = text.to_string();
    }

    fn set_message_color(&mut self, color: &str) {
        self.mutations += 1;
        self.message_color = Some(color.to_string());
    }

    fn form_action(&self) -> String {
        self.form_action.clone()
    }

    fn form_fields(&self) -> Vec<(String, String)> {
        self.fields
            .iter()
            .map(|f| (f.name.clone(), f.value.clone()))
            .collect()
    }

    fn reset_form(&mut self) {
        self.mutations += 1;
        self.fields.iter_mut().for_each(FormField::reset);
    }
}
