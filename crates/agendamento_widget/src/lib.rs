// --- File: crates/agendamento_widget/src/lib.rs ---
pub mod backend;
pub mod controller;
#[cfg(test)]
mod controller_test;
pub mod models;
pub mod page;

pub use backend::{BookingBackend, HttpBookingBackend};
pub use controller::{BookingFormController, DateChangeOutcome, SubmitEvent, SubmitOutcome};
pub use models::{FormField, SelectOption, SubmissionOutcome, SubmissionResult, TimeSlot};
pub use page::{BookingPage, MemoryPage, HOUR_FIELD};
