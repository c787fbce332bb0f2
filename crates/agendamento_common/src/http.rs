// --- File: crates/agendamento_common/src/http.rs ---

pub mod client;

/// Header the booking backend inspects to tell a scripted request apart from
/// a full-page form post.
pub const REQUESTED_WITH_HEADER: &str = "X-Requested-With";

/// Value sent with [`REQUESTED_WITH_HEADER`].
pub const REQUESTED_WITH_VALUE: &str = "XMLHttpRequest";
