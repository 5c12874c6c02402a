use clap::{Parser, Subcommand};
use uuid::Uuid;

/// Telemedicine demo client: browse doctors, book visits, start video calls.
#[derive(Debug, Parser)]
#[command(name = "telemed-demo")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store an access token, as the login screen would.
    Login { token: String },

    /// Forget the stored access token.
    Logout,

    /// List doctors available for booking.
    Doctors,

    /// List open slots for one doctor.
    Availability { doctor_id: String },

    /// Book an appointment.
    Book {
        #[arg(long)]
        doctor: String,
        #[arg(long)]
        patient: String,
        #[arg(long)]
        slot: String,
    },

    /// List chat rooms, or the messages of one room.
    Chat {
        #[arg(long)]
        room: Option<Uuid>,
    },

    /// Start a video call and keep it open until Ctrl-C.
    Video,
}
