// --- File: crates/agendamento_widget/src/backend.rs ---
//! The two endpoints the widget talks to.

use crate::models::{SubmissionResult, TimeSlot};
use agendamento_common::{create_client, BookingError, REQUESTED_WITH_HEADER, REQUESTED_WITH_VALUE};
use agendamento_config::AppConfig;
use async_trait::async_trait;
use reqwest::{multipart, Client, Url};
use std::time::Duration;
use tracing::debug;

/// Placeholder in the hours path template.
pub const DATE_PLACEHOLDER: &str = "{date}";

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookingBackend: Send + Sync {
    /// Available hours for `date`, in the order the server lists them.
    async fn fetch_hours(&self, date: &str) -> Result<Vec<TimeSlot>, BookingError>;

    /// Posts the form fields to `action` and returns the parsed result body.
    async fn submit_form(
        &self,
        action: &str,
        fields: Vec<(String, String)>,
    ) -> Result<SubmissionResult, BookingError>;
}

/// [`BookingBackend`] over HTTP.
#[derive(Debug, Clone)]
pub struct HttpBookingBackend {
    client: Client,
    base_url: Url,
    hours_path: String,
    encode_date_segment: bool,
}

impl HttpBookingBackend {
    /// A backend rooted at `base_url` with no request timeout and the default
    /// `/horarios/{date}/` route.
    pub fn new(base_url: &str) -> Result<Self, BookingError> {
        Ok(Self {
            client: create_client(None, true)?,
            base_url: parse_url(base_url)?,
            hours_path: "/horarios/{date}/".to_string(),
            encode_date_segment: false,
        })
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, BookingError> {
        let client = create_client(
            config.http.timeout_secs.map(Duration::from_secs),
            config.http.follow_redirects,
        )?;
        Ok(Self::new(&config.server.base_url)?
            .with_client(client)
            .with_hours_path(&config.widget.hours_path)
            .with_encoded_dates(config.http.encode_date_segment))
    }

    pub fn with_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }

    pub fn with_hours_path(mut self, hours_path: impl Into<String>) -> Self {
        self.hours_path = hours_path.into();
        self
    }

    pub fn with_encoded_dates(mut self, encode: bool) -> Self {
        self.encode_date_segment = encode;
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// URL of the hours lookup for `date`.
    ///
    /// By default the date is pasted into the template as is, so reserved
    /// characters in it change the meaning of the URL (a `?` starts a query).
    /// With encoding enabled the date always stays a single path segment.
    pub fn hours_url(&self, date: &str) -> Result<Url, BookingError> {
        if !self.encode_date_segment {
            let path = self.hours_path.replace(DATE_PLACEHOLDER, date);
            return self.join(&path);
        }

        let (before, after) = self
            .hours_path
            .split_once(DATE_PLACEHOLDER)
            .ok_or_else(|| {
                BookingError::ConfigError(format!(
                    "hours path {:?} has no {} placeholder",
                    self.hours_path, DATE_PLACEHOLDER
                ))
            })?;

        let mut url = self.join(before)?;
        {
            let mut segments = url.path_segments_mut().map_err(|_| {
                BookingError::UrlError(format!("{} cannot be a base", self.base_url))
            })?;
            segments.pop_if_empty();
            let mut rest = after.split('/');
            let date_suffix = rest.next().unwrap_or_default();
            segments.push(&format!("{}{}", date, date_suffix));
            for segment in rest {
                segments.push(segment);
            }
        }
        Ok(url)
    }

    /// Resolves the form action against the page origin. An empty action
    /// posts back to the origin itself.
    pub fn action_url(&self, action: &str) -> Result<Url, BookingError> {
        self.join(action)
    }

    fn join(&self, path: &str) -> Result<Url, BookingError> {
        self.base_url
            .join(path)
            .map_err(|e| BookingError::UrlError(format!("{}: {}", path, e)))
    }
}

fn parse_url(raw: &str) -> Result<Url, BookingError> {
    Url::parse(raw).map_err(|e| BookingError::UrlError(format!("{}: {}", raw, e)))
}

#[async_trait]
impl BookingBackend for HttpBookingBackend {
    async fn fetch_hours(&self, date: &str) -> Result<Vec<TimeSlot>, BookingError> {
        let url = self.hours_url(date)?;
        debug!("GET {}", url);

        let response = self.client.get(url).send().await?.error_for_status()?;
        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }

    async fn submit_form(
        &self,
        action: &str,
        fields: Vec<(String, String)>,
    ) -> Result<SubmissionResult, BookingError> {
        let url = self.action_url(action)?;
        debug!("POST {} ({} fields)", url, fields.len());

        let form = fields
            .into_iter()
            .fold(multipart::Form::new(), |form, (name, value)| form.text(name, value));

        let response = self
            .client
            .post(url)
            .header(REQUESTED_WITH_HEADER, REQUESTED_WITH_VALUE)
            .multipart(form)
            .send()
            .await?
            .error_for_status()?;
        let body = response.bytes().await?;
        let value: serde_json::Value = serde_json::from_slice(&body)?;
        // reading a key of `null` fails in the page script, unlike other non-objects
        if value.is_null() {
            return Err(BookingError::ParseError(format!(
                "submission response from {} is null",
                action
            )));
        }
        Ok(SubmissionResult::from_value(&value))
    }
}
