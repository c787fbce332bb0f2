// File: services/agendamento_cli/src/main.rs
use agendamento_common::{logging, BookingError};
use agendamento_config::{ensure_dotenv_loaded, load_config, AppConfig};
use agendamento_widget::{
    BookingFormController, DateChangeOutcome, HttpBookingBackend, MemoryPage, SubmitEvent,
    SubmitOutcome, HOUR_FIELD,
};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use std::process::ExitCode;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{warn, Level};

type Controller = BookingFormController<MemoryPage, HttpBookingBackend>;

#[derive(Parser, Debug)]
#[command(name = "agendamento", version, about = "Check hours and book a collection slot")]
struct Cli {
    /// Overrides `server.base_url` from the configuration
    #[arg(long, global = true)]
    base_url: Option<String>,

    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show the hour selector for a date (today when omitted)
    Horarios { date: Option<String> },
    /// Fill in the booking form and submit it
    Agendar {
        /// A form field as name=value, e.g. -f nome="Maria Silva"; repeatable
        #[arg(short, long = "field", value_parser = parse_field)]
        fields: Vec<(String, String)>,

        /// Form action, relative to the base URL
        #[arg(long, default_value = "/agendar/")]
        action: String,
    },
}

fn parse_field(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(name, value)| (name.trim().to_string(), value.to_string()))
        .filter(|(name, _)| !name.is_empty())
        .ok_or_else(|| format!("expected name=value, got {raw:?}"))
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli.command, cli.base_url).await {
        Ok(code) => code,
        Err(err) => {
            logging::log_error(&err, "agendamento");
            ExitCode::FAILURE
        }
    }
}

/// Loads `.env` first so a `RUST_LOG` set there reaches the filter.
fn init_logging(verbose: bool) {
    ensure_dotenv_loaded();
    logging::init_with_level(if verbose { Level::DEBUG } else { Level::INFO });
}

async fn run(command: Command, base_url: Option<String>) -> Result<ExitCode, BookingError> {
    let mut config = logging::log_result(
        load_config(),
        "configuration loaded",
        "failed to load configuration",
    )?;
    if let Some(base_url) = base_url {
        config.server.base_url = base_url;
    }
    let config = &config;

    match command {
        Command::Horarios { date } => {
            let date =
                date.unwrap_or_else(|| Local::now().date_naive().format("%Y-%m-%d").to_string());
            warn_if_not_iso_date(&date);

            let page =
                MemoryPage::standard(&config.widget.ids, &config.widget.labels, "/agendar/");
            let controller = attach(config, page)?;
            let outcome = controller.on_date_change(&date).await;
            print_hours(&controller);
            Ok(match outcome {
                DateChangeOutcome::Failed => ExitCode::FAILURE,
                _ => ExitCode::SUCCESS,
            })
        }
        Command::Agendar { fields, action } => {
            let mut page = MemoryPage::standard(&config.widget.ids, &config.widget.labels, action);
            let mut hour = None;
            for (name, value) in &fields {
                if name == HOUR_FIELD {
                    hour = Some(value.as_str());
                } else if !page.set_field(name, value.as_str()) {
                    // extra inputs such as csrfmiddlewaretoken
                    page = page.with_field(name.as_str(), value.as_str());
                }
            }
            let controller = attach(config, page)?;

            // pick the date first, the way a visitor would
            if let Some((_, date)) = fields.iter().find(|(name, _)| name == "data") {
                warn_if_not_iso_date(date);
                controller.on_date_change(date).await;
                print_hours(&controller);
            }

            // the hour can only be one the selector offers
            if let Some(hour) = hour {
                let picked = controller
                    .page()
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .set_field(HOUR_FIELD, hour);
                if !picked {
                    warn!("{} is not among the offered hours; not submitting", hour);
                    return Ok(ExitCode::FAILURE);
                }
            }

            let mut event = SubmitEvent::new();
            let outcome = controller.on_form_submit(&mut event).await;
            print_message(&controller);
            Ok(match outcome {
                SubmitOutcome::Accepted(_) => ExitCode::SUCCESS,
                SubmitOutcome::Unrecognized => {
                    println!("(the server answered without a message)");
                    ExitCode::FAILURE
                }
                SubmitOutcome::Rejected(_) | SubmitOutcome::Failed => ExitCode::FAILURE,
            })
        }
    }
}

fn attach(config: &AppConfig, page: MemoryPage) -> Result<Controller, BookingError> {
    let backend = HttpBookingBackend::from_config(config)?;
    BookingFormController::attach(Arc::new(Mutex::new(page)), backend, config.widget.clone())
}

/// The date goes to the server as typed; this only points out likely typos.
fn warn_if_not_iso_date(date: &str) {
    if NaiveDate::parse_from_str(date, "%Y-%m-%d").is_err() {
        warn!("{:?} is not a YYYY-MM-DD date; sending it unchanged", date);
    }
}

fn print_hours(controller: &Controller) {
    let page = controller.page().lock().unwrap_or_else(PoisonError::into_inner);
    for option in page.hour_options() {
        if option.is_placeholder() {
            println!("  [{}]", option.label);
        } else {
            println!("  {:<8} {}", option.value, option.label);
        }
    }
}

fn print_message(controller: &Controller) {
    let page = controller.page().lock().unwrap_or_else(PoisonError::into_inner);
    if !page.message_text().is_empty() {
        println!("{} ({})", page.message_text(), page.message_color().unwrap_or("default"));
    }
}
