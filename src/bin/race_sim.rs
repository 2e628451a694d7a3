use clap::Parser;
use evented::app::console::Console;
use evented::app::demos::race_demo;
use evented::utils::{logger, validation::Validate};
use evented::{stop_channel, DemoConfig, RaceOutcome};

#[derive(Parser)]
#[command(name = "race-sim")]
#[command(about = "Race simulation with TOML configuration support")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "race.toml")]
    config: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Override the RNG seed from config
    #[arg(long)]
    seed: Option<u64>,

    /// Emit JSON logs and a JSON summary
    #[arg(long)]
    json: bool,

    /// Dry run - show the starting grid without racing
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // 初始化日誌
    if args.json {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(args.verbose);
    }

    tracing::info!("🚀 Starting race simulation");
    tracing::info!("📁 Loading configuration from: {}", args.config);

    // 載入 TOML 配置
    let mut config = match DemoConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", args.config, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };

    // 應用命令列覆蓋設定
    if let Some(seed) = args.seed {
        config.race.seed = Some(seed);
        tracing::info!("🔧 Seed overridden to: {}", seed);
    }

    // 驗證配置
    if let Err(e) = config.validate() {
        eprintln!("❌ Configuration validation failed: {}", e);
        eprintln!("💡 {}", e.recovery_suggestion());
        std::process::exit(1);
    }

    let console = Console::stdout();

    if args.dry_run {
        console.line(format!(
            "Dry run: {} vehicle(s), finish line {}, max {} laps",
            config.race.vehicles.len(),
            config.race.finish_line,
            config.race.max_laps
        ))?;
        for vehicle in race_demo::build_roster(&config.race)? {
            console.line(format!(
                "  {} ({}) speed {}",
                vehicle.model(),
                vehicle.kind(),
                vehicle.speed()
            ))?;
        }
        return Ok(());
    }

    let (handle, signal) = stop_channel();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            handle.stop();
        }
    });

    let summary = race_demo::run(&config.race, &console, &signal).await?;
    if args.json {
        race_demo::print_json(&summary, &console)?;
    } else {
        race_demo::print_standings(&summary, &console)?;
    }

    match summary.outcome {
        RaceOutcome::Completed => {
            if let Some(winner) = summary.winner() {
                tracing::info!("🏆 Winner: {} on lap {}", winner.model, winner.lap);
            }
        }
        RaceOutcome::Cancelled => tracing::warn!("🛑 Race cancelled"),
        RaceOutcome::LapLimitReached => std::process::exit(2),
    }

    Ok(())
}
