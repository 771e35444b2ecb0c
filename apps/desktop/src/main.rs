use std::{path::PathBuf, sync::Arc};

use anyhow::{bail, Result};
use chrono::Local;
use clap::{Parser, Subcommand};
use client_core::{
    config::{load_settings, prepare_base_url, DEFAULT_CONFIG_FILE},
    ClientSettings, HandicapApi, HandicapSnapshot, HandicapViewState, HttpHandicapApi, Notice,
    RoundField, RoundSubmissionController, SubmitOutcome, SystemClock,
};
use tracing::{info, warn};

mod display;

#[derive(Parser, Debug)]
#[command(name = "handicap", about = "Track golf rounds and view your handicap")]
struct Cli {
    #[arg(long, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,
    /// Overrides the configured backend address.
    #[arg(long)]
    server_url: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show the current handicap.
    Show {
        /// Refresh again this many times while the handicap fails to load.
        #[arg(long, default_value_t = 0)]
        retries: u32,
    },
    /// Record a round, then show the refreshed handicap.
    AddRound {
        #[arg(long)]
        score: String,
        #[arg(long)]
        course_rating: String,
        #[arg(long)]
        slope_rating: String,
        /// Local date and time as YYYY-MM-DDTHH:MM; defaults to now.
        #[arg(long)]
        played_at: Option<String>,
        #[arg(long)]
        pin: String,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter("info")
        .with_writer(std::io::stderr)
        .init();
    let cli = Cli::parse();
    let settings = resolve_settings(&cli)?;

    let api: Arc<dyn HandicapApi> = Arc::new(HttpHandicapApi::new(&settings));
    let view = HandicapViewState::start(api.clone()).await;

    match cli.command {
        Command::Show { retries } => {
            for attempt in 1..=retries {
                if !matches!(view.snapshot(), HandicapSnapshot::Error(_)) {
                    break;
                }
                info!(attempt, "retrying handicap load");
                view.request_refresh().await?;
            }
        }
        Command::AddRound {
            score,
            course_rating,
            slope_rating,
            played_at,
            pin,
        } => {
            let mut controller =
                RoundSubmissionController::new(&settings, api, view.clone(), Arc::new(SystemClock));
            controller.update_field(RoundField::Score, score);
            controller.update_field(RoundField::CourseRating, course_rating);
            controller.update_field(RoundField::SlopeRating, slope_rating);
            if let Some(played_at) = played_at {
                controller.update_field(RoundField::PlayedAt, played_at);
            }
            controller.update_field(RoundField::AccessCode, pin);

            match controller.submit().await {
                Ok(SubmitOutcome::Submitted(round)) => {
                    println!(
                        "Recorded round #{}: {} at {:.1}/{} on {}",
                        round.id.0,
                        round.score,
                        round.course_rating,
                        round.slope_rating,
                        round.played_at.with_timezone(&Local).format("%Y-%m-%d %H:%M")
                    );
                }
                Ok(SubmitOutcome::Rejected(_)) => {
                    let message = controller
                        .notice()
                        .map(|notice| notice.to_string())
                        .or_else(|| controller.form().validation_message.clone())
                        .unwrap_or_else(|| Notice::FillAllFields.to_string());
                    bail!("{message}");
                }
                Err(err) => {
                    let notice = controller
                        .notice()
                        .unwrap_or(Notice::SubmissionFailed);
                    eprintln!("{notice}");
                    return Err(err.into());
                }
            }
        }
    }

    println!("{}", display::render_handicap(&view.snapshot()));
    Ok(())
}

fn resolve_settings(cli: &Cli) -> Result<ClientSettings> {
    let mut settings = load_settings(&cli.config);
    if let Some(server_url) = &cli.server_url {
        settings.api_base_url = server_url.clone();
    }
    settings.api_base_url = prepare_base_url(&settings.api_base_url)?;

    if settings.access_code.is_none() {
        warn!("no access code configured; every round submission will be refused");
    }
    Ok(settings)
}
