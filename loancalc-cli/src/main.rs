//! # Loancalc CLI - Loan Amortization Form TUI
//!
//! A terminal front-end for the loan amortization calculator.
//!
//! ## Features
//! - Interactive form with per-keystroke validation
//! - Date consistency checks between start, end and first payment
//! - Schedule table rendered in pt-BR currency and dates
//! - One-shot `calculate` subcommand for scripts
//!
//! ## Usage
//! ```bash
//! # Run the interactive TUI
//! loancalc
//!
//! # Point at another server and send Portuguese field names
//! loancalc --base-url http://calc:8080 --legacy-wire
//!
//! # Calculate without the TUI
//! loancalc calculate --start 2024-01-10 --end 2024-06-10 \
//!     --first-payment 2024-01-15 --amount 10000 --rate 2
//!
//! # Run system diagnostics
//! loancalc doctor
//! ```

use clap::{Args as ClapArgs, Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::env;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tabled::{builder::Builder, settings::Style};
use tokio::runtime::Handle;

use loancalc::prelude::*;
use loancalc_client::CalculationService;

#[cfg(feature = "http")]
use loancalc_client::HttpCalculationService;

#[cfg(not(feature = "http"))]
use loancalc_client::StaticCalculationService;

mod config_loader;
mod tui;

use config_loader::{CliConfig, Overrides};
use tui::{App, handle_events, ui};

/// Interactive loan amortization calculator
#[derive(Parser, Debug)]
#[command(name = "loancalc")]
#[command(author = "loancalc contributors")]
#[command(version)]
#[command(about = "Loan amortization form with a remote schedule calculator", long_about = None)]
struct Args {
    /// Enable file logging to logs/ directory
    #[arg(long, default_value = "false")]
    log: bool,

    /// Calculation server base URL (overrides config file and LOANCALC_BASE_URL)
    #[arg(long)]
    base_url: Option<String>,

    /// Send Portuguese field names on the wire
    #[arg(long, default_value = "false")]
    legacy_wire: bool,

    /// Show the optional installment count field
    #[arg(long, default_value = "false")]
    installments_field: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Validate the inputs, request a schedule and print it
    Calculate(CalculateArgs),
    /// Run diagnostics to check configuration and server reachability
    Doctor,
}

#[derive(ClapArgs, Debug)]
struct CalculateArgs {
    /// Start date, YYYY-MM-DD
    #[arg(long)]
    start: String,

    /// End date, YYYY-MM-DD
    #[arg(long)]
    end: String,

    /// First payment date, YYYY-MM-DD
    #[arg(long)]
    first_payment: String,

    /// Loan amount
    #[arg(long)]
    amount: String,

    /// Interest rate
    #[arg(long)]
    rate: String,

    /// Installment count
    #[arg(long)]
    installments: Option<String>,

    /// Print the raw response as JSON instead of a table
    #[arg(long, default_value = "false")]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let file_config = CliConfig::load();

    // Initialize tracing with optional file logging
    // NOTE: In TUI mode, we only log to file (no console) to avoid corrupting the UI
    let _file_guard: Option<tracing_appender::non_blocking::WorkerGuard>;
    let is_tui_mode = args.command.is_none(); // TUI mode if no subcommand
    let log_to_file = args.log || file_config.enable_logging.unwrap_or(false);

    if log_to_file {
        use tracing_subscriber::layer::SubscriberExt;
        use tracing_subscriber::util::SubscriberInitExt;

        std::fs::create_dir_all("logs")?;

        let file_appender = tracing_appender::rolling::daily("logs", "loancalc.log");
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
        _file_guard = Some(guard);

        let env_filter =
            tracing_subscriber::EnvFilter::from_default_env().add_directive("loancalc=debug".parse()?);

        if is_tui_mode {
            let file_layer = tracing_subscriber::fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false);

            tracing_subscriber::registry()
                .with(env_filter)
                .with(file_layer)
                .init();
        } else {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_writer(non_blocking)
                        .with_ansi(false),
                )
                .init();
        }

        tracing::info!(
            "--- Loan Calculator Session Started [{}] ---",
            chrono::Utc::now()
        );
    } else {
        _file_guard = None;
        // In TUI mode without logging, no subscriber is installed at all
        if !is_tui_mode {
            tracing_subscriber::fmt()
                .with_writer(std::io::stderr)
                .with_env_filter(
                    tracing_subscriber::EnvFilter::from_default_env()
                        .add_directive("loancalc=info".parse()?),
                )
                .init();
        }
    }

    let overrides = Overrides {
        base_url: args.base_url.clone(),
        legacy_wire: args.legacy_wire,
        installments_field: args.installments_field,
    };
    let config = file_config.apply(ControllerConfig::default().with_env()?, &overrides);
    config.validate()?;

    match args.command {
        Some(Commands::Calculate(input)) => run_calculate(config, input).await,
        Some(Commands::Doctor) => run_doctor(&config).await,
        None => run_tui(config).await,
    }
}

/// Builds the calculation service for this build's feature set.
fn build_service(config: &ControllerConfig) -> Result<Arc<dyn CalculationService>, LoanError> {
    #[cfg(feature = "http")]
    {
        Ok(Arc::new(HttpCalculationService::from_config(config)?))
    }

    #[cfg(not(feature = "http"))]
    {
        let _ = config;
        Ok(Arc::new(StaticCalculationService::failing(
            TransportFailure::no_response("compiled without the 'http' feature"),
        )))
    }
}

/// Run the TUI application
async fn run_tui(config: ControllerConfig) -> Result<(), Box<dyn std::error::Error>> {
    let service = build_service(&config)?;
    let controller = FormController::new(config)?;
    let mut app = App::new(controller, service, Handle::current());

    // Initialize terminal
    let mut terminal = ratatui::init();

    // Main loop
    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    ratatui::restore();

    result
}

/// Main application loop
fn run_app(
    terminal: &mut ratatui::DefaultTerminal,
    app: &mut App,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        // Draw the UI
        terminal.draw(|frame| ui(frame, app))?;

        // Handle events
        if handle_events(app)? {
            break;
        }
    }

    Ok(())
}

/// Validates the arguments as form input, sends one request and prints the schedule.
async fn run_calculate(
    config: ControllerConfig,
    input: CalculateArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = if input.installments.is_some() {
        config.with_layout(FormLayout::WithInstallments)
    } else {
        config
    };
    let service = build_service(&config)?;
    let endpoint = config.calculate_url();
    let mut controller = FormController::new(config)?;

    let values = [
        (FieldId::StartDate, Some(&input.start)),
        (FieldId::EndDate, Some(&input.end)),
        (FieldId::FirstPaymentDate, Some(&input.first_payment)),
        (FieldId::LoanAmount, Some(&input.amount)),
        (FieldId::InterestRate, Some(&input.rate)),
        (FieldId::InstallmentCount, input.installments.as_ref()),
    ];
    for (id, value) in values {
        if let Some(value) = value {
            controller.change(id, value.as_str());
        }
    }

    let request = match controller.begin_submit() {
        Ok(request) => request,
        Err(LoanError::InvalidForm { fields }) => {
            for id in &fields {
                let error = controller
                    .field(*id)
                    .and_then(|f| f.error.as_deref())
                    .unwrap_or_default();
                eprintln!("{} {}: {}", "✗".red().bold(), id.label(), error.red());
            }
            return Err(LoanError::InvalidForm { fields }.into());
        }
        Err(e) => return Err(e.into()),
    };

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::with_template("{spinner:.cyan} {msg}")?);
    spinner.set_message(format!("Calculating at {}", endpoint));
    spinner.enable_steady_tick(Duration::from_millis(100));

    let outcome = service.calculate(&request).await;
    spinner.finish_and_clear();

    let response = outcome.as_ref().ok().cloned();
    controller.finish_submit(outcome, Instant::now());

    let alerts = controller.alerts();
    if alerts.visible() == AlertKind::Error {
        let message = alerts.message().unwrap_or(messages::CALCULATION_FAILED);
        eprintln!("{} {}", "✗".red().bold(), message.red());
        return Err(message.to_string().into());
    }

    if input.json {
        println!("{}", serde_json::to_string_pretty(&response)?);
        return Ok(());
    }

    let mut builder = Builder::default();
    builder.push_record(SCHEDULE_COLUMNS);
    for row in &controller.results().rows {
        builder.push_record(row.cells.clone());
    }
    let mut table = builder.build();
    table.with(Style::rounded());

    println!("{}", table);
    println!(
        "{} {}",
        "✓".green().bold(),
        alerts.success().message().green()
    );
    Ok(())
}

/// Run doctor diagnostics (outside TUI)
async fn run_doctor(config: &ControllerConfig) -> Result<(), Box<dyn std::error::Error>> {
    println!("\n🚑 Loancalc Doctor - Diagnostics Tool");
    println!("═══════════════════════════════════════════════\n");

    // 1. Environment Info
    println!("1. System Information:");
    println!("   OS: {}", std::env::consts::OS);
    println!("   Arch: {}", std::env::consts::ARCH);
    println!("   CLI Version: {}", env!("CARGO_PKG_VERSION"));
    println!(
        "   NO_COLOR: {}",
        if env::var("NO_COLOR").is_ok() {
            "Set (True)"
        } else {
            "Unset"
        }
    );

    // 2. Configuration
    println!("\n2. Configuration:");
    match CliConfig::config_path() {
        Some(path) => println!(
            "   Config File: {:?} ({})",
            path,
            if path.exists() { "found" } else { "not found" }
        ),
        None => println!("   Config File: unavailable on this platform"),
    }
    println!("   Base URL: {}", config.base_url);
    println!("   Layout: {:?}", config.layout);
    println!("   Wire Format: {:?}", config.wire_format);
    println!("   Request Timeout: {}s", config.request_timeout_secs);

    // 3. Server Connectivity
    println!("\n3. Calculation Server:");
    print!("   Probing {}... ", config.health_url());
    use std::io::Write;
    std::io::stdout().flush()?;

    let service = build_service(config)?;
    match service.health().await {
        Ok(body) => {
            println!("{}", "✓ OK".green());
            if !body.trim().is_empty() {
                println!("   Response: {}", body.trim());
            }
        }
        Err(failure) => {
            println!("{}", "✗ FAILED".red());
            println!("   Error: {}", failure.user_message());
            if failure.status != 0 {
                println!("   Status: {}", failure.status);
            }
        }
    }

    println!("\nDiagnostics Complete.\n");
    Ok(())
}
