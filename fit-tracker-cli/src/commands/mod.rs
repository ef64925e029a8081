mod coach;
mod config_cmd;
mod estimate;
mod exercise_parser;
mod log;
mod login;
mod logout;
mod profile;
mod weight;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::session::Session;

pub use estimate::EstimateArgs;
pub use exercise_parser::parse_exercise;
pub use log::LogAddArgs;
pub use login::AuthArgs;
pub use profile::ProfileSetArgs;

#[derive(Parser)]
#[command(name = "fit-tracker")]
#[command(about = "Workout log, weight trend and AI coaching from the terminal", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to configuration file
    #[arg(long, global = true, env = "FIT_TRACKER_CONFIG")]
    config: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in to the fit-tracker backend
    Login(AuthArgs),

    /// Create an account
    Register(AuthArgs),

    /// Log out and discard cached AI results
    Logout,

    /// Show or edit your profile
    #[command(subcommand)]
    Profile(ProfileSubcommands),

    /// Manage workout logs
    #[command(subcommand)]
    Log(LogSubcommands),

    /// Track body weight
    #[command(subcommand)]
    Weight(WeightSubcommands),

    /// Estimate calories for a session without logging it
    Estimate(EstimateArgs),

    /// Weekly training plan
    #[command(subcommand)]
    Plan(PlanSubcommands),

    /// Short coaching advice based on recent workouts
    Advice,

    /// Scored training report
    Report,

    /// Progress insight for one exercise
    Insight {
        /// Exercise name as logged
        exercise: String,
    },

    /// Manage configuration
    #[command(subcommand)]
    Config(ConfigSubcommands),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand)]
enum ProfileSubcommands {
    /// Show your profile
    Show,

    /// Create or update your profile
    Set(ProfileSetArgs),
}

#[derive(Subcommand)]
enum LogSubcommands {
    /// Log a workout; a second workout on the same day is merged into the first
    Add(LogAddArgs),

    /// Generate simulated workouts for trying things out
    Demo {
        /// Days of history to simulate
        #[arg(short, long, default_value = "28")]
        days: u32,
    },

    /// List recent workouts
    List {
        /// Number of workouts to show
        #[arg(short, long, default_value = "10")]
        limit: usize,
    },
}

#[derive(Subcommand)]
enum WeightSubcommands {
    /// Record today's weight
    Add {
        /// Weight in kg
        kg: f64,
    },

    /// Show the change since your first recorded weight
    Trend,
}

#[derive(Subcommand)]
enum PlanSubcommands {
    /// Generate a plan from your profile and save it
    Generate,

    /// Show the active plan
    Show,
}

#[derive(Subcommand)]
enum ConfigSubcommands {
    /// Show current configuration
    Show,

    /// Initialize configuration with defaults
    Init {
        /// Overwrite existing config
        #[arg(short, long)]
        force: bool,
    },

    /// Set a value, e.g. `config set api.base_url https://fit.example.com`
    Set {
        /// Dotted key such as ai.api_key
        key: String,
        value: String,
    },
}

impl Cli {
    pub fn verbose(&self) -> bool {
        self.verbose
    }

    pub async fn execute(self) -> Result<()> {
        if let Commands::Completions { shell } = self.command {
            generate_completions(shell);
            return Ok(());
        }

        let mut session = Session::load(self.config.as_deref())?;
        tracing::debug!("Using config at {}", session.config_path().display());

        match self.command {
            Commands::Login(args) => login::login(&mut session, args).await,
            Commands::Register(args) => login::register(&mut session, args).await,
            Commands::Logout => logout::logout(&mut session).await,
            Commands::Profile(subcmd) => match subcmd {
                ProfileSubcommands::Show => profile::show_profile(&mut session).await,
                ProfileSubcommands::Set(args) => profile::set_profile(&mut session, args).await,
            },
            Commands::Log(subcmd) => match subcmd {
                LogSubcommands::Add(args) => log::add(&mut session, args).await,
                LogSubcommands::Demo { days } => log::demo(&mut session, days).await,
                LogSubcommands::List { limit } => log::list(&mut session, limit).await,
            },
            Commands::Weight(subcmd) => match subcmd {
                WeightSubcommands::Add { kg } => weight::add_weight(&mut session, kg).await,
                WeightSubcommands::Trend => weight::show_trend(&mut session).await,
            },
            Commands::Estimate(args) => estimate::estimate(&session, args).await,
            Commands::Plan(subcmd) => match subcmd {
                PlanSubcommands::Generate => coach::generate_plan(&mut session).await,
                PlanSubcommands::Show => coach::show_plan(&mut session).await,
            },
            Commands::Advice => coach::advice(&mut session).await,
            Commands::Report => coach::report(&mut session).await,
            Commands::Insight { exercise } => coach::insight(&mut session, &exercise).await,
            Commands::Config(subcmd) => match subcmd {
                ConfigSubcommands::Show => config_cmd::show_config(&session).await,
                ConfigSubcommands::Init { force } => config_cmd::init_config(&session, force).await,
                ConfigSubcommands::Set { key, value } => {
                    config_cmd::set_config(&mut session, &key, &value).await
                }
            },
            Commands::Completions { .. } => Ok(()),
        }
    }
}

fn generate_completions(shell: clap_complete::Shell) {
    use clap::CommandFactory;
    use clap_complete::generate;
    use std::io;

    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut io::stdout());
}
