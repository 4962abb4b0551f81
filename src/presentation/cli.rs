// Command-line surface
use crate::domain::filters::PlantFilter;
use crate::domain::role::Role;
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "kpi-dash",
    about = "Role-based KPI dashboards for cement plant operations",
    version,
    long_about = None
)]
pub struct Cli {
    /// Print views as JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,

    /// More log output on stderr (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Extra configuration file layered over config/dashboard
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Sign in and remember the session token
    Login {
        #[arg(long, required_unless_present = "demo")]
        email: Option<String>,
        #[arg(long, required_unless_present = "demo")]
        password: Option<String>,
        /// Use the demo account for a role (cxo, plant-head, energy-manager, sales)
        #[arg(long, conflicts_with_all = ["email", "password"])]
        demo: Option<Role>,
    },

    /// Forget the stored session token
    Logout,

    /// Show who the stored session belongs to
    Whoami,

    /// Upload a plant workbook (.xlsx or .xls, at most 50MB)
    Upload { file: PathBuf },

    /// Show the dashboard for a role
    Dashboard {
        #[command(flatten)]
        filters: FilterArgs,
        /// Keep running and read filter changes from stdin
        #[arg(short, long)]
        interactive: bool,
    },

    /// Compare two or three plants side by side
    Compare {
        #[arg(required = true, num_args = 2..=3)]
        plants: Vec<String>,
        #[arg(long)]
        start: Option<NaiveDate>,
        #[arg(long)]
        end: Option<NaiveDate>,
    },

    /// List sample insight questions
    Prompts,

    /// Ask a question about the data behind the dashboard
    Ask {
        question: String,
        #[command(flatten)]
        filters: FilterArgs,
    },

    /// Email the dashboard report
    SendReport {
        email: String,
        #[arg(long)]
        role: Option<Role>,
        #[arg(long)]
        plant: Option<PlantFilter>,
    },

    /// Platform and client configuration
    Admin,
}

/// Filter overrides; anything left out comes from configuration or the session.
#[derive(Args, Debug, Clone, Default)]
pub struct FilterArgs {
    #[arg(long)]
    pub role: Option<Role>,
    #[arg(long)]
    pub plant: Option<PlantFilter>,
    #[arg(long)]
    pub start: Option<NaiveDate>,
    #[arg(long)]
    pub end: Option<NaiveDate>,
}

impl Commands {
    /// Commands that run without a session.
    pub fn is_public(&self) -> bool {
        matches!(self, Commands::Login { .. } | Commands::Logout | Commands::Prompts)
    }
}
