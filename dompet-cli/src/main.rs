use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use dompet_client::{BankApi, HttpBankApi};
use dompet_core::{BreakdownTab, DateRange, HomeView, InsightView};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

mod config;
mod login;
mod render;
mod screens;
mod state;

use screens::Screens;

#[derive(Parser, Debug)]
#[command(
    name = "dompet",
    version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("DOMPET_BUILD_SHA"), ")"),
    about = "Dompet banking client"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Log in and remember the customer for later commands
    Login {
        /// Username (prompted if omitted)
        #[arg(long)]
        username: Option<String>,

        /// Echo the password while typing instead of masking it
        #[arg(long)]
        show_password: bool,
    },

    /// Log out and forget the stored session
    Logout,

    /// Show the account card
    Home {
        /// Reveal the balance instead of the masked placeholder
        #[arg(long)]
        show_balance: bool,

        /// Extra attempts after a retryable failure
        #[arg(long, default_value_t = 1)]
        retries: u32,
    },

    /// Show the income/expense summary and recommendations for a period
    Insight {
        /// Period start (YYYY-MM-DD); defaults to the current month
        #[arg(long, requires = "end")]
        start: Option<NaiveDate>,

        /// Period end (YYYY-MM-DD)
        #[arg(long, requires = "start")]
        end: Option<NaiveDate>,

        /// Breakdown tab to show
        #[arg(long, value_enum, default_value_t = TabArg::Income)]
        tab: TabArg,

        #[arg(long, default_value_t = 1)]
        retries: u32,
    },

    /// Manage ~/.dompet/config.toml
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write the default config if none exists
    Init,
    /// Print the effective config
    Show,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum TabArg {
    Income,
    Expense,
}

impl From<TabArg> for BreakdownTab {
    fn from(tab: TabArg) -> Self {
        match tab {
            TabArg::Income => BreakdownTab::Income,
            TabArg::Expense => BreakdownTab::Expense,
        }
    }
}

/// Binary events log under the `dompet` target, the library under `dompet_client`
const DEFAULT_LOG_FILTER: &str = "warn,dompet=info,dompet_client=info";

fn init_logging() {
    let filter = EnvFilter::try_from_env("DOMPET_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging();

    let cfg = config::load_config()?;

    match cli.command {
        Command::Config { command } => match command {
            ConfigCommand::Init => config::init_config()?,
            ConfigCommand::Show => {
                println!("# {}", config::config_path()?.display());
                print!("{}", toml::to_string_pretty(&cfg).context("serialize config")?);
            }
        },

        Command::Login {
            username,
            show_password,
        } => {
            let api = connect(&cfg)?;
            login::run_login(api.as_ref(), username, show_password).await?;
        }

        Command::Logout => {
            let api = connect(&cfg)?;
            login::run_logout(api.as_ref()).await?;
        }

        Command::Home {
            show_balance,
            retries,
        } => {
            let session = require_session()?;
            let mut screens = Screens::start(connect(&cfg)?, cfg.summary_options()?);

            let mut home = HomeView::new();
            if show_balance {
                home.toggle_balance();
            }
            screens.show_home(&mut home, &session.cif, retries).await?;
            screens.shutdown().await;

            print!("{}", render::render_home(&home));
        }

        Command::Insight {
            start,
            end,
            tab,
            retries,
        } => {
            let session = require_session()?;
            let options = cfg.summary_options()?;
            let range = match (start, end) {
                (Some(start), Some(end)) => DateRange::new(start, end)?,
                _ => {
                    let today = chrono::Utc::now().with_timezone(&options.timezone).date_naive();
                    DateRange::month_of(today)
                }
            };

            let mut screens = Screens::start(connect(&cfg)?, options);
            let mut insight = InsightView::new();
            insight.select_tab(tab.into());
            screens.show_insight(&mut insight, &session.cif, range, retries).await?;
            screens.shutdown().await;

            print!("{}", render::render_insight(&insight));
        }
    }

    Ok(())
}

fn connect(cfg: &config::Config) -> Result<Arc<dyn BankApi>> {
    let api = HttpBankApi::new(cfg.api_config()).context("building HTTP client")?;
    Ok(Arc::new(api))
}

fn require_session() -> Result<state::Session> {
    match state::load_session()? {
        Some(session) => Ok(session),
        None => bail!("Not logged in. Run: dompet login"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_log_filter_covers_binary_and_client() {
        let filter = EnvFilter::try_new(DEFAULT_LOG_FILTER).unwrap();
        let shown = filter.to_string().to_lowercase();
        assert!(shown.contains("dompet=info"));
        assert!(shown.contains("dompet_client=info"));
        assert!(!shown.contains("dompet_cli"));
    }

    #[test]
    fn test_login_show_password_flag() {
        let cli = Cli::try_parse_from(["dompet", "login", "--username", "indra", "--show-password"])
            .unwrap();
        assert!(matches!(
            cli.command,
            Command::Login { show_password: true, username: Some(ref u) } if u == "indra"
        ));
    }
}
