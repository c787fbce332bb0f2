// --- File: crates/agendamento_widget/src/controller.rs ---
//! The booking form controller.
//!
//! Two handlers, each doing exactly one request:
//!
//! * [`BookingFormController::on_date_change`] shows "loading" in the hour
//!   selector, fetches the hours for the date and renders them.
//! * [`BookingFormController::on_form_submit`] posts the form and renders the
//!   server's success or error message.
//!
//! The page lock is only taken between suspension points, never across one.
//! Overlapping date changes are not serialized: whichever response arrives
//! last is what the selector shows, unless `discard_stale_hours` is set.

use crate::backend::BookingBackend;
use crate::models::{SelectOption, SubmissionOutcome};
use crate::page::BookingPage;
use agendamento_common::{missing_element, BookingError};
use agendamento_config::WidgetConfig;
use std::iter;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{debug, error, info, warn};

/// A form submit event. The handler always prevents the default navigation.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SubmitEvent {
    default_prevented: bool,
}

impl SubmitEvent {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }
}

/// How a date change ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateChangeOutcome {
    /// Empty date; the page was not touched.
    Ignored,
    /// The selector lists this many slots.
    Loaded(usize),
    /// The server had no slots for the date.
    Empty,
    /// The lookup failed; the selector shows the error placeholder.
    Failed,
    /// A later date change started before this one finished; its response was dropped.
    Superseded,
}

/// How a form submission ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Accepted(String),
    Rejected(String),
    /// The response had neither `success` nor `error`; nothing was rendered.
    Unrecognized,
    /// Transport or parse failure; the generic retry message is shown.
    Failed,
}

pub struct BookingFormController<P, B> {
    page: Arc<Mutex<P>>,
    backend: B,
    settings: WidgetConfig,
    hours_sequence: AtomicU64,
}

impl<P, B> BookingFormController<P, B>
where
    P: BookingPage,
    B: BookingBackend,
{
    /// Binds the controller to the page.
    ///
    /// Fails with [`BookingError::MissingElement`] if the page lacks any of the
    /// date input, hour selector, message area or form.
    pub fn attach(
        page: Arc<Mutex<P>>,
        backend: B,
        settings: WidgetConfig,
    ) -> Result<Self, BookingError> {
        {
            let guard = page.lock().unwrap_or_else(PoisonError::into_inner);
            let ids = &settings.ids;
            for id in [&ids.date_input, &ids.hour_select, &ids.message, &ids.form] {
                if !guard.has_element(id) {
                    return Err(missing_element(id));
                }
            }
        }
        debug!("booking form controller attached to #{}", settings.ids.form);

        Ok(Self {
            page,
            backend,
            settings,
            hours_sequence: AtomicU64::new(0),
        })
    }

    pub fn page(&self) -> &Arc<Mutex<P>> {
        &self.page
    }

    pub fn settings(&self) -> &WidgetConfig {
        &self.settings
    }

    /// Handles a change of the date input.
    pub async fn on_date_change(&self, date: &str) -> DateChangeOutcome {
        if date.is_empty() {
            return DateChangeOutcome::Ignored;
        }

        let sequence = self.hours_sequence.fetch_add(1, Ordering::SeqCst) + 1;
        let labels = &self.settings.labels;
        self.with_page(|page| {
            page.set_hour_options(vec![SelectOption::placeholder(&labels.loading)]);
            page.set_message_text("");
        });

        debug!(date, sequence, "fetching available hours");
        let (options, outcome) = match self.backend.fetch_hours(date).await {
            Ok(slots) if slots.is_empty() => (
                vec![SelectOption::placeholder(&labels.no_slots)],
                DateChangeOutcome::Empty,
            ),
            Ok(slots) => {
                let options = iter::once(SelectOption::placeholder(&labels.select_time))
                    .chain(slots.iter().map(SelectOption::from))
                    .collect();
                (options, DateChangeOutcome::Loaded(slots.len()))
            }
            Err(err) => {
                if err.is_transport() {
                    error!(date, error = %err, "failed to fetch available hours");
                } else {
                    error!(date, error = %err, "hours lookup could not be issued");
                }
                (
                    vec![SelectOption::placeholder(&labels.load_error)],
                    DateChangeOutcome::Failed,
                )
            }
        };

        if self.settings.discard_stale_hours
            && sequence != self.hours_sequence.load(Ordering::SeqCst)
        {
            debug!(date, sequence, "dropping hours response overtaken by a later date change");
            return DateChangeOutcome::Superseded;
        }

        self.with_page(|page| page.set_hour_options(options));
        outcome
    }

    /// Handles a submit of the booking form.
    pub async fn on_form_submit(&self, event: &mut SubmitEvent) -> SubmitOutcome {
        event.prevent_default();

        let (action, fields) = self.with_page(|page| (page.form_action(), page.form_fields()));
        let colors = &self.settings.colors;

        match self.backend.submit_form(&action, fields).await {
            Ok(result) => match result.outcome() {
                SubmissionOutcome::Success(message) => {
                    info!(action = %action, "booking accepted");
                    let placeholder =
                        SelectOption::placeholder(&self.settings.labels.select_date_first);
                    self.with_page(|page| {
                        page.set_message_color(&colors.success);
                        page.set_message_text(&message);
                        page.reset_form();
                        page.set_hour_options(vec![placeholder]);
                    });
                    SubmitOutcome::Accepted(message)
                }
                SubmissionOutcome::Error(message) => {
                    info!(action = %action, reason = %message, "booking rejected");
                    self.with_page(|page| {
                        page.set_message_color(&colors.error);
                        page.set_message_text(&message);
                    });
                    SubmitOutcome::Rejected(message)
                }
                SubmissionOutcome::Unrecognized => {
                    warn!(action = %action, "submission response has neither success nor error");
                    SubmitOutcome::Unrecognized
                }
            },
            Err(err) => {
                if err.is_transport() {
                    error!(action = %action, error = %err, "failed to submit booking form");
                } else {
                    error!(action = %action, error = %err, "booking form could not be submitted");
                }
                let message = &self.settings.labels.submit_error;
                self.with_page(|page| {
                    page.set_message_color(&colors.error);
                    page.set_message_text(message);
                });
                SubmitOutcome::Failed
            }
        }
    }

    fn with_page<T>(&self, f: impl FnOnce(&mut P) -> T) -> T {
        let mut guard = self.page.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut guard)
    }
}
