//! `skybook`: terminal front end for the flight booking service.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{anyhow, bail, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use skybook_app::render;
use skybook_app::views::{
    BookingView, Credentials, FooterView, HeaderView, HomeView, LoginView, LogoutView, SearchView, SignupView,
};
use skybook_app::AppState;
use skybook_core::SearchCriteria;
use skybook_shared::models::flight::wire_date;
use skybook_shared::FlightRequest;
use skybook_store::app_config::Config;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "skybook", about = "Search and book flights")]
struct Cli {
    /// Directory holding default/{RUN_MODE}/local config files.
    #[arg(long = "config", global = true, default_value = "config")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Search the catalogue.
    Search {
        #[arg(long)]
        from: Option<String>,
        #[arg(long)]
        to: Option<String>,
        /// YYYY-MM-DD
        #[arg(long)]
        start_date: Option<NaiveDate>,
        /// YYYY-MM-DD
        #[arg(long)]
        end_date: Option<NaiveDate>,
        /// Hide flights that can no longer be booked.
        #[arg(long)]
        available_only: bool,
    },

    Login {
        #[arg(long)]
        user: Option<String>,
        /// Read from stdin when omitted.
        #[arg(long)]
        password: Option<String>,
    },

    Signup {
        #[arg(long)]
        user: Option<String>,
        #[arg(long)]
        password: Option<String>,
    },

    Logout,

    /// Show who the stored token belongs to.
    Whoami {
        /// Keep watching the cookie jar and report login state changes.
        #[arg(long)]
        watch: bool,
    },

    Bookings {
        #[command(subcommand)]
        action: BookingAction,
    },

    /// Catalogue administration (admin accounts only).
    Flights {
        #[command(subcommand)]
        action: FlightAction,
    },
}

#[derive(Subcommand, Debug)]
enum BookingAction {
    List,
    Add { flight_id: i64 },
    Remove { flight_id: i64 },
}

#[derive(Subcommand, Debug)]
enum FlightAction {
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        price: f64,
        /// RFC 3339, YYYY-MM-DD or epoch millis.
        #[arg(long)]
        start_date: String,
        #[arg(long)]
        end_date: Option<String>,
        #[arg(long)]
        from: String,
        #[arg(long)]
        to: Option<String>,
        #[arg(long)]
        unavailable: bool,
    },
    Delete { flight_id: i64 },
}

fn prompt(label: &str) -> Result<String> {
    eprint!("{}: ", label);
    let mut s = String::new();
    std::io::stdin().read_line(&mut s).context("failed to read stdin")?;
    Ok(s.trim_end_matches(['\r', '\n']).to_string())
}

fn credentials(user: Option<String>, password: Option<String>) -> Result<Credentials> {
    let login = match user {
        Some(u) => u,
        None => prompt("Username")?,
    };
    let password = match password {
        Some(p) => p,
        None => prompt("Password")?,
    };
    Ok(Credentials::new(login, password))
}

fn parse_date(value: &str) -> Result<chrono::DateTime<chrono::Utc>> {
    wire_date::parse(value).ok_or_else(|| anyhow!("unrecognised date '{}'", value))
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "skybook=info,skybook_app=info,skybook_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = Config::load_from(&cli.config).context("failed to load config")?;
    tracing::debug!("API base {}", config.api.base_url);
    let state = AppState::from_config(&config)?;

    match cli.command {
        Commands::Search { from, to, start_date, end_date, available_only } => {
            let home = HomeView::new(SearchCriteria {
                start_date,
                end_date,
                start_location: from,
                end_location: to,
                filter_unavailable: available_only,
            });
            render::outcome(&home.submit(&state));

            let results = SearchView::load(&state).await;
            if results.failed {
                bail!("Search failed");
            }
            print!("{}", render::flight_table(&results.flights));
        }
        Commands::Login { user, password } => {
            let mut view = LoginView::new(Credentials::default());
            let outcome = view.init(&state);
            if outcome.navigation.is_some() {
                render::outcome(&outcome);
                return Ok(());
            }
            view.form = credentials(user, password)?;
            let outcome = view.submit(&state).await;
            if view.error {
                bail!("Login failed");
            }
            render::outcome(&outcome);
            println!("Logged in as {}.", state.session.username().unwrap_or_default());
        }
        Commands::Signup { user, password } => {
            let mut view = SignupView::new(credentials(user, password)?);
            let outcome = view.submit(&state).await;
            if view.error {
                bail!("Could not create the account");
            }
            render::outcome(&outcome);
        }
        Commands::Logout => {
            let (view, outcome) = LogoutView::run(&state);
            render::outcome(&outcome);
            if view.was_logged_in {
                println!("Logged out.");
            }
        }
        Commands::Whoami { watch } => {
            let mut header = HeaderView::new(&state);
            match &header.username {
                Some(name) if header.logged_in => println!("{} (scope: {})", name, state.session.scope().unwrap_or_default()),
                _ => println!("Not logged in."),
            }
            if watch {
                let _poll = state
                    .session
                    .spawn_polling(Duration::from_secs(config.session.poll_interval_seconds));
                loop {
                    let change = tokio::select! {
                        change = header.next_change(&state) => change,
                        _ = tokio::signal::ctrl_c() => None,
                    };
                    match change {
                        Some(true) => println!("Logged in as {}.", header.username.as_deref().unwrap_or_default()),
                        Some(false) => println!("Logged out."),
                        None => break,
                    }
                }
            }
            println!("{}", FooterView::text());
        }
        Commands::Bookings { action } => {
            let (mut view, outcome) = BookingView::load(&state).await;
            if outcome.navigation.is_some() {
                render::outcome(&outcome);
                bail!("Log in first");
            }
            let ok = match action {
                BookingAction::List => !view.failed,
                BookingAction::Add { flight_id } => view.book(&state, flight_id).await,
                BookingAction::Remove { flight_id } => view.cancel(&state, flight_id).await,
            };
            if !ok {
                bail!("Booking request failed");
            }
            print!("{}", render::flight_table(&view.bookings));
        }
        Commands::Flights { action } => match action {
            FlightAction::Create { name, price, start_date, end_date, from, to, unavailable } => {
                let request = FlightRequest {
                    name,
                    price,
                    start_date: parse_date(&start_date)?,
                    end_date: end_date.as_deref().map(parse_date).transpose()?,
                    start_location: from,
                    end_location: to,
                    is_available: !unavailable,
                };
                let created = state.flights.create_flight(&request).await?;
                print!("{}", render::flight_table(&[created]));
            }
            FlightAction::Delete { flight_id } => {
                state.flights.delete_flight(flight_id).await?;
                println!("Flight {} deleted.", flight_id);
            }
        },
    }

    Ok(())
}
