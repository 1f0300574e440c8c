use std::io::{self, BufRead};
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use serde::de::DeserializeOwned;

use healithm::config::{AppConfig, ConfigError};
use healithm::health::api::ApiError;
use healithm::health::types::{
    ActivityLevel, DailyLogPatch, Gender, HealthMetrics, NewDailyLog, NewWeightEntry, ProgressPeriod,
};
use healithm::pages::dashboard::DashboardPage;
use healithm::pages::guard::{PageDecision, Route};
use healithm::pages::login::LoginPage;
use healithm::pages::signup::SignupPage;
use healithm::pages::{Banner, SubmitOutcome};
use healithm::routes;
use healithm::state::{AppContext, ContextError};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("startup failed: {0}")]
    Context(#[from] ContextError),
    #[error("{0}")]
    Invalid(&'static str),
    #[error("{0}")]
    Auth(String),
    #[error("not signed in; run `healithm login` first")]
    NotSignedIn,
    #[error("{0}")]
    Health(String),
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "healithm", about = "Healithm health tracker")]
struct Cli {
    #[arg(long, env = "HEALITHM_API_URL")]
    api_url: Option<String>,

    #[arg(long, env = "HEALITHM_SESSION_FILE")]
    session_file: Option<PathBuf>,

    /// Log at debug level.
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the landing content and static site.
    Serve {
        #[arg(long, env = "PORT")]
        port: Option<u16>,
        #[arg(long, env = "WEBSITE_DIR")]
        website_dir: Option<PathBuf>,
    },
    Login(Credentials),
    Signup(Credentials),
    Logout,
    Whoami,
    Dashboard,
    Health(HealthCommand),
}

#[derive(Args, Debug)]
struct Credentials {
    #[arg(long)]
    email: String,
    /// Read from stdin when omitted.
    #[arg(long, env = "HEALITHM_PASSWORD", hide_env_values = true)]
    password: Option<String>,
}

#[derive(Args, Debug)]
struct HealthCommand {
    #[command(subcommand)]
    command: HealthSubcommand,
}

#[derive(Subcommand, Debug)]
enum HealthSubcommand {
    Metrics {
        #[command(subcommand)]
        command: Option<MetricsSubcommand>,
    },
    Logs {
        #[command(subcommand)]
        command: LogsSubcommand,
    },
    Weight {
        #[command(subcommand)]
        command: Option<WeightSubcommand>,
    },
    Meals {
        /// Comma-separated preferences.
        #[arg(long, value_delimiter = ',')]
        preferences: Option<Vec<String>>,
    },
    Workouts {
        #[arg(long, value_delimiter = ',')]
        goals: Option<Vec<String>>,
    },
    Analyze {
        #[arg(required = true)]
        food_items: Vec<String>,
    },
    Progress {
        #[arg(long, default_value = "week")]
        period: ProgressPeriod,
    },
}

#[derive(Subcommand, Debug)]
enum MetricsSubcommand {
    Update(MetricsArgs),
}

#[derive(Args, Debug)]
struct MetricsArgs {
    #[arg(long)]
    weight: Option<f64>,
    #[arg(long)]
    height: Option<f64>,
    #[arg(long)]
    age: Option<u32>,
    #[arg(long, value_parser = parse_wire_enum::<Gender>)]
    gender: Option<Gender>,
    #[arg(long)]
    target_weight: Option<f64>,
    #[arg(long, value_parser = parse_wire_enum::<ActivityLevel>)]
    activity_level: Option<ActivityLevel>,
}

#[derive(Subcommand, Debug)]
enum LogsSubcommand {
    List {
        #[arg(long)]
        start: String,
        #[arg(long)]
        end: String,
    },
    Add {
        #[arg(long)]
        date: String,
        #[arg(long, default_value_t = 0.0)]
        calories: f64,
        #[arg(long, default_value_t = 0.0)]
        protein: f64,
        #[arg(long, default_value_t = 0.0)]
        carbs: f64,
        #[arg(long, default_value_t = 0.0)]
        fats: f64,
        #[arg(long, default_value_t = 0.0)]
        water: f64,
        #[arg(long, default_value_t = 0)]
        steps: u64,
        #[arg(long)]
        exercise: Option<String>,
        #[arg(long)]
        notes: Option<String>,
    },
    Patch {
        log_id: String,
        /// JSON object with the fields to change.
        #[arg(long)]
        data: String,
    },
    Delete {
        log_id: String,
    },
}

#[derive(Subcommand, Debug)]
enum WeightSubcommand {
    Add {
        #[arg(long)]
        date: String,
        #[arg(long)]
        weight: f64,
    },
}

fn parse_wire_enum<T: DeserializeOwned>(raw: &str) -> Result<T, String> {
    serde_json::from_value(serde_json::Value::String(raw.to_owned())).map_err(|e| e.to_string())
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let level = match (&cli.command, cli.verbose) {
        (_, true) => tracing::Level::DEBUG,
        (Command::Serve { .. }, false) => tracing::Level::INFO,
        _ => tracing::Level::WARN,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .init();

    let mut config = AppConfig::from_env()?;
    if let Some(url) = cli.api_url {
        config.api_base_url = url.trim_end_matches('/').to_owned();
    }
    if let Some(path) = cli.session_file {
        config.session_file = path;
    }

    if let Command::Serve { port, website_dir } = cli.command {
        return run_serve(config, port, website_dir).await;
    }

    let ctx = AppContext::from_config(config)?;
    ctx.auth.restore_session().await;
    ctx.sync_api_token().await;

    match cli.command {
        Command::Serve { .. } => Ok(()),
        Command::Login(creds) => run_login(&ctx, creds).await,
        Command::Signup(creds) => run_signup(&ctx, creds).await,
        Command::Logout => run_logout(&ctx).await,
        Command::Whoami => run_whoami(&ctx),
        Command::Dashboard => run_dashboard(&ctx),
        Command::Health(health) => run_health(&ctx, health).await,
    }
}

async fn run_serve(config: AppConfig, port: Option<u16>, website_dir: Option<PathBuf>) -> Result<(), CliError> {
    let port = port.unwrap_or(config.port);
    let website_dir = website_dir.or(config.website_dir);
    if config.auth.is_none() {
        tracing::warn!("auth backend not configured; sign-in commands will fail");
    }

    let app = routes::app(website_dir.as_deref());
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}")).await?;
    tracing::info!(%port, website_dir = ?website_dir, "healithm listening");
    axum::serve(listener, app).await?;
    Ok(())
}

// =============================================================================
// AUTH COMMANDS
// =============================================================================

fn password_or_stdin(password: Option<String>) -> Result<String, CliError> {
    if let Some(password) = password {
        return Ok(password);
    }
    eprint!("password: ");
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_owned())
}

fn render_banner(banner: &Banner) -> String {
    match banner {
        Banner::ConfirmationEmail { message, guidance, docs_url } => {
            let mut out = format!("{message}\n");
            for step in *guidance {
                out.push_str(&format!("  - {step}\n"));
            }
            out.push_str(&format!("  Supabase docs: {docs_url}"));
            out
        }
        Banner::Error(message) | Banner::Success(message) => message.clone(),
    }
}

fn finish_submit(ctx: &AppContext, outcome: SubmitOutcome) -> Result<(), CliError> {
    match outcome {
        SubmitOutcome::Navigate(route) => {
            if let Some(user) = ctx.auth.state().user() {
                println!("Signed in as {}", user.email);
            }
            eprintln!("-> {}", route.path());
            Ok(())
        }
        SubmitOutcome::Show(banner @ Banner::Success(_)) => {
            println!("{}", render_banner(&banner));
            Ok(())
        }
        SubmitOutcome::Show(banner) => Err(CliError::Auth(render_banner(&banner))),
        SubmitOutcome::Invalid(msg) => Err(CliError::Invalid(msg)),
        SubmitOutcome::Busy => Err(CliError::Invalid("An auth request is already in progress.")),
    }
}

async fn run_login(ctx: &AppContext, creds: Credentials) -> Result<(), CliError> {
    let page = LoginPage::new(ctx.auth.clone());
    if let PageDecision::Redirect(route) = page.decision() {
        eprintln!("already signed in -> {}", route.path());
        return run_whoami(ctx);
    }
    let password = password_or_stdin(creds.password)?;
    let outcome = page.submit(&creds.email, &password).await;
    finish_submit(ctx, outcome)
}

async fn run_signup(ctx: &AppContext, creds: Credentials) -> Result<(), CliError> {
    let page = SignupPage::new(ctx.auth.clone());
    if let PageDecision::Redirect(route) = page.decision() {
        eprintln!("already signed in -> {}", route.path());
        return run_whoami(ctx);
    }
    let password = password_or_stdin(creds.password)?;
    let outcome = page.submit(&creds.email, &password).await;
    finish_submit(ctx, outcome)
}

async fn run_logout(ctx: &AppContext) -> Result<(), CliError> {
    let route = DashboardPage::new(ctx.auth.clone()).logout().await;
    if let Some(error) = ctx.auth.state().error() {
        eprintln!("warning: {error} (local session cleared)");
    }
    println!("Signed out");
    eprintln!("-> {}", route.path());
    Ok(())
}

fn run_whoami(ctx: &AppContext) -> Result<(), CliError> {
    match ctx.auth.state().user() {
        Some(user) => print_json(user),
        None => Err(CliError::NotSignedIn),
    }
}

fn run_dashboard(ctx: &AppContext) -> Result<(), CliError> {
    let page = DashboardPage::new(ctx.auth.clone());
    match page.decision() {
        PageDecision::Redirect(Route::Login) => Err(CliError::NotSignedIn),
        _ => {
            let view = page.view().ok_or(CliError::NotSignedIn)?;
            println!("{}", view.greeting);
            println!("{}", view.email);
            println!();
            println!("Coming soon:");
            for item in view.upcoming {
                println!("  - {item}");
            }
            Ok(())
        }
    }
}

// =============================================================================
// HEALTH COMMANDS
// =============================================================================

fn current_user_id(ctx: &AppContext) -> Result<String, CliError> {
    ctx.auth.state().user().map(|u| u.id.clone()).ok_or(CliError::NotSignedIn)
}

async fn run_health(ctx: &AppContext, health: HealthCommand) -> Result<(), CliError> {
    let user_id = current_user_id(ctx)?;
    let store = &ctx.health;
    match health.command {
        HealthSubcommand::Metrics { command: None } => {
            let metrics = store.fetch_health_metrics(&user_id).await.map_err(CliError::Health)?;
            print_json(&metrics)
        }
        HealthSubcommand::Metrics { command: Some(MetricsSubcommand::Update(args)) } => {
            let patch = HealthMetrics {
                weight: args.weight,
                height: args.height,
                age: args.age,
                gender: args.gender,
                target_weight: args.target_weight,
                activity_level: args.activity_level,
            };
            if patch.is_empty() {
                return Err(CliError::Invalid("Pass at least one metric to update."));
            }
            let saved = store.patch_health_metrics(&user_id, &patch).await.map_err(CliError::Health)?;
            print_json(&saved)
        }
        HealthSubcommand::Logs { command } => run_logs(ctx, &user_id, command).await,
        HealthSubcommand::Weight { command: None } => {
            let history = store.fetch_weight_history(&user_id).await.map_err(CliError::Health)?;
            print_json(&history)
        }
        HealthSubcommand::Weight { command: Some(WeightSubcommand::Add { date, weight }) } => {
            let entry = store
                .add_weight_entry(&user_id, &NewWeightEntry { date, weight })
                .await
                .map_err(CliError::Health)?;
            print_json(&entry)
        }
        HealthSubcommand::Meals { preferences } => {
            let meals = ctx.api.get_meal_recommendations(&user_id, preferences.as_deref()).await?;
            print_json(&meals)
        }
        HealthSubcommand::Workouts { goals } => {
            let workouts = ctx.api.get_workout_recommendations(&user_id, goals.as_deref()).await?;
            print_json(&workouts)
        }
        HealthSubcommand::Analyze { food_items } => {
            let analysis = ctx.api.analyze_nutrition(&user_id, &food_items).await?;
            print_json(&analysis)
        }
        HealthSubcommand::Progress { period } => {
            let progress = ctx.api.get_progress_analytics(&user_id, period).await?;
            print_json(&progress)
        }
    }
}

async fn run_logs(ctx: &AppContext, user_id: &str, command: LogsSubcommand) -> Result<(), CliError> {
    match command {
        LogsSubcommand::List { start, end } => {
            let logs = ctx.health.fetch_daily_logs(user_id, &start, &end).await.map_err(CliError::Health)?;
            print_json(&logs)
        }
        LogsSubcommand::Add { date, calories, protein, carbs, fats, water, steps, exercise, notes } => {
            let log = NewDailyLog { date, calories, protein, carbs, fats, water, steps, exercise, notes };
            let created = ctx.health.add_daily_log(user_id, &log).await.map_err(CliError::Health)?;
            print_json(&created)
        }
        LogsSubcommand::Patch { log_id, data } => {
            let patch: DailyLogPatch = serde_json::from_str(&data)?;
            let updated = ctx.api.patch_daily_log(user_id, &log_id, &patch).await?;
            print_json(&updated)
        }
        LogsSubcommand::Delete { log_id } => {
            ctx.api.delete_daily_log(user_id, &log_id).await?;
            println!("deleted {log_id}");
            Ok(())
        }
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}
