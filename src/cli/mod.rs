use std::path::PathBuf;

use clap::{Subcommand, ValueEnum};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Register a new animal from its nose-print photos
    Register {
        /// Photos in capture order: front, left, right, top, front2
        #[arg(required = true)]
        images: Vec<PathBuf>,

        #[arg(long)]
        owner: String,

        #[arg(long)]
        owner_phone: Option<String>,

        #[arg(long)]
        owner_email: Option<String>,

        #[arg(long)]
        owner_address: Option<String>,

        #[arg(long)]
        owner_national_id: Option<String>,

        #[arg(long)]
        breed: String,

        #[arg(long)]
        color: String,

        #[arg(long, default_value = "0")]
        age: u32,

        /// Tag prefix, e.g. TW for TW-2025-XXXXXX
        #[arg(long)]
        tag_prefix: Option<String>,

        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Identify an animal from one or two fresh photos
    Verify {
        #[arg(required = true)]
        images: Vec<PathBuf>,

        /// Caller role, selects the thresholds (mobile, admin or live)
        #[arg(long, default_value = "mobile")]
        role: String,

        #[arg(long, default_value = "unknown")]
        location: String,

        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Identify an animal from a single live-camera frame
    VerifyLive {
        frame: PathBuf,

        #[arg(long, default_value = "live camera")]
        location: String,

        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Look an animal up by its tag
    VerifyTag {
        tag: String,

        #[arg(long, default_value = "mobile")]
        role: String,

        #[arg(long, default_value = "unknown")]
        location: String,

        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    List {
        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Show one animal with its samples and ownership history
    Show {
        id_or_tag: String,

        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    Delete {
        id_or_tag: String,
    },

    /// Hand an animal to a new owner, located by id, tag or probe photo
    Transfer {
        #[arg(required_unless_present = "probe")]
        id_or_tag: Option<String>,

        #[arg(long, conflicts_with = "id_or_tag")]
        probe: Option<PathBuf>,

        #[arg(long)]
        owner: String,

        #[arg(long)]
        owner_phone: Option<String>,

        #[arg(long)]
        owner_email: Option<String>,

        #[arg(long)]
        owner_address: Option<String>,

        #[arg(long)]
        owner_national_id: Option<String>,
    },

    /// Citizen reports
    #[command(subcommand)]
    Report(ReportCommands),

    /// Recent verification attempts, newest first
    Logs {
        #[arg(long, default_value = "20")]
        limit: usize,

        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    Stats {
        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,
    },
}

#[derive(Subcommand)]
pub enum ReportCommands {
    Submit {
        #[arg(long)]
        name: String,

        #[arg(long)]
        phone: Option<String>,

        #[arg(long)]
        email: Option<String>,

        #[arg(long)]
        tag: Option<String>,

        /// suspect, theft or other
        #[arg(long = "type", default_value = "other")]
        report_type: String,

        #[arg(long)]
        subject: String,

        #[arg(long)]
        message: String,

        #[arg(long)]
        location: Option<String>,
    },

    Status {
        id: i64,

        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    List {
        #[arg(long)]
        status: Option<String>,

        #[arg(long = "type")]
        report_type: Option<String>,

        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    Reply {
        id: i64,

        reply: String,

        /// pending, resolved or closed
        #[arg(long, default_value = "resolved")]
        status: String,
    },
}
