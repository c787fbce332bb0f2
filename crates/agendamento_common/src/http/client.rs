// --- File: crates/agendamento_common/src/http/client.rs ---
use reqwest::{Client, Error as ReqwestError};
use std::time::Duration;

/// Creates a new HTTP client with custom configuration.
///
/// # Arguments
///
/// * `timeout` - Optional overall request timeout; `None` waits until the
///   server answers, the way a browser fetch does
/// * `follow_redirects` - Whether the client should follow redirects
pub fn create_client(
    timeout: Option<Duration>,
    follow_redirects: bool,
) -> Result<Client, ReqwestError> {
    let mut builder = Client::builder().redirect(if follow_redirects {
        reqwest::redirect::Policy::default()
    } else {
        reqwest::redirect::Policy::none()
    });
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    builder.build()
}
