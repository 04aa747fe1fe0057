//! CLI argument definitions using clap derive macros.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::config::DEFAULT_API_URL;

/// Memory System CLI
///
/// Sign in, manage events, read reports and submit feedback.
#[derive(Parser, Debug)]
#[command(name = "memsys")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Base URL of memsys-server
    #[arg(long, global = true, env = "MEMSYS_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// Directory holding the persisted session
    #[arg(long, global = true, env = "MEMSYS_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Sign in and remember the session
    Login {
        /// Account email (prompted when omitted)
        #[arg(short, long)]
        email: Option<String>,

        /// Password (prompted when omitted)
        #[arg(long, env = "MEMSYS_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },

    /// Sign out and forget the session
    Logout,

    /// Show the signed-in principal and what it may reach
    Whoami,

    /// Event management (admin, secretary)
    Events(EventsCommand),

    /// Show the feedback report of one event (admin, secretary)
    Report {
        /// Event ID
        event_id: String,
    },

    /// List events with their response counts (admin, secretary)
    Reports,

    /// Submit feedback (no sign-in needed)
    Feedback(FeedbackCommand),
}

// ─────────────────────────────────────────────────────────────────────────────
// Event Commands
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Args, Debug)]
pub struct EventsCommand {
    #[command(subcommand)]
    pub action: EventsAction,
}

#[derive(Subcommand, Debug)]
pub enum EventsAction {
    /// List events
    List {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show one event
    Show {
        /// Event ID
        id: String,
    },

    /// Create an event
    Create {
        /// Event title
        title: String,

        /// Start date (YYYY-MM-DD)
        #[arg(short, long)]
        start: String,

        /// End date, defaults to the start date
        #[arg(short, long)]
        end: Option<String>,

        /// Description
        #[arg(short, long, default_value = "")]
        description: String,

        /// ID of a managed location
        #[arg(long)]
        location_id: Option<String>,

        /// Free-text location
        #[arg(long)]
        location: Option<String>,
    },

    /// Delete an event and its feedback
    Delete {
        /// Event ID
        id: String,

        /// Skip confirmation
        #[arg(short, long)]
        yes: bool,
    },
}

// ─────────────────────────────────────────────────────────────────────────────
// Feedback Commands
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Args, Debug)]
pub struct FeedbackCommand {
    #[command(subcommand)]
    pub action: FeedbackAction,
}

#[derive(Subcommand, Debug)]
pub enum FeedbackAction {
    /// Rate an event you attended (missing values are prompted)
    Participant {
        /// Event ID (chosen from a list when omitted)
        #[arg(long)]
        event: Option<String>,

        /// Art rating, 1-5
        #[arg(long)]
        art: Option<i32>,

        /// Food rating, 1-5
        #[arg(long)]
        food: Option<i32>,

        /// Group rating, 1-5
        #[arg(long)]
        group: Option<i32>,

        /// Conversations rating, 1-5
        #[arg(long)]
        conversations: Option<i32>,

        /// Free-text comments
        #[arg(long, default_value = "")]
        comments: String,

        /// Your name
        #[arg(long, default_value = "")]
        name: String,

        /// Your email
        #[arg(long, default_value = "")]
        email: String,
    },

    /// Report on an event you organized
    Organizer {
        /// Event ID (chosen from a list when omitted)
        #[arg(long)]
        event: Option<String>,

        /// Organizer name
        #[arg(long)]
        organizer_name: String,

        /// Total expenses
        #[arg(long, default_value_t = 0.0)]
        expenses: f64,

        /// Volunteer name (repeatable)
        #[arg(long = "volunteer")]
        volunteers: Vec<String>,

        /// What went wrong
        #[arg(long, default_value = "")]
        challenges: String,

        /// What to do differently
        #[arg(long, default_value = "")]
        suggestions: String,
    },
}
