use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use dotenv::dotenv;
use serde::Serialize;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod cli;

use chat_cell::{ChatClient, ChatView};
use cli::{Cli, Command};
use shared_config::AppConfig;
use shared_http::{ReqwestTransport, RequestPipeline};
use shared_models::{Credential, CredentialStore};
use shared_utils::{FileCredentialStore, MemoryCredentialStore};
use video_session_cell::{SessionController, VideoRoomService};
use visits_cell::{AppointmentRequest, VisitsClient};

#[tokio::main]
async fn main() -> Result<()> {
    // Loading Env Vars
    dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = AppConfig::from_env();

    let credentials: Arc<dyn CredentialStore> = match &config.credential_store_path {
        Some(path) => Arc::new(FileCredentialStore::new(path)),
        None => Arc::new(MemoryCredentialStore::new()),
    };

    let pipeline = Arc::new(RequestPipeline::from_config(
        &config,
        Arc::new(ReqwestTransport::new()),
        credentials.clone(),
    ));

    info!("Using API at {}", pipeline.base_url());

    match cli.command {
        Command::Login { token } => {
            credentials.set(Credential::new(token))?;
            info!("Access token stored");
        }
        Command::Logout => {
            credentials.clear()?;
            info!("Access token cleared");
        }
        Command::Doctors => {
            let doctors = VisitsClient::new(pipeline).list_doctors().await?;
            print_json(&doctors)?;
        }
        Command::Availability { doctor_id } => {
            let slots = VisitsClient::new(pipeline).list_availability(&doctor_id).await?;
            print_json(&slots)?;
        }
        Command::Book { doctor, patient, slot } => {
            let request = AppointmentRequest::new(doctor, patient, slot);
            let appointment = VisitsClient::new(pipeline).create_appointment(&request).await?;
            print_json(&appointment)?;
        }
        Command::Chat { room: None } => {
            let rooms = ChatClient::new(pipeline).load_rooms().await?;
            print_json(&rooms)?;
        }
        Command::Chat { room: Some(room_id) } => {
            let messages = ChatClient::new(pipeline).load_messages(room_id).await?;
            print_json(&messages)?;
        }
        Command::Video => {
            let rooms = VideoRoomService::from_config(pipeline, &config);
            let view = ChatView::new(SessionController::new(rooms));

            let session = view.start_video_call().await?;
            print_json(&session)?;

            info!("Video call active, press Ctrl-C to hang up");
            tokio::signal::ctrl_c()
                .await
                .context("Failed to listen for Ctrl-C")?;
            view.close_video_call();
        }
    }

    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let rendered = serde_json::to_string_pretty(value).context("Failed to render response")?;
    println!("{}", rendered);
    Ok(())
}
