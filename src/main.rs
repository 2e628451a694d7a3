use clap::Parser;
use evented::app::console::Console;
use evented::app::demos::{calculator_demo, property_demo, race_demo};
use evented::utils::{logger, validation::Validate};
use evented::{stop_channel, CliArgs, Command, DemoConfig, RaceOutcome, StopHandle};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();

    // 初始化日誌
    logger::init_cli_logger(args.verbose);

    tracing::info!("Starting evented");
    if args.verbose {
        tracing::debug!("CLI args: {:?}", args);
    }

    // 載入並驗證配置
    let config = match args.load_config().and_then(|config| config.validate().map(|_| config)) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("❌ Configuration failed: {}", e);
            eprintln!("❌ {}", e);
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(1);
        }
    };

    let console = Console::stdout();

    let outcome = match args.command() {
        Command::Property { .. } => {
            property_demo::run(&config.property, &console)?;
            None
        }
        Command::Calc { .. } => {
            calculator_demo::run(&config.calculator, &console)?;
            None
        }
        Command::Race { .. } => Some(run_race(&config, &console, args.json).await?),
        Command::Demo => {
            property_demo::run(&config.property, &console)?;
            calculator_demo::run(&config.calculator, &console)?;
            Some(run_race(&config, &console, args.json).await?)
        }
    };

    if outcome == Some(RaceOutcome::LapLimitReached) {
        eprintln!("💡 Raise race.max_laps or lower race.finish_line");
        std::process::exit(2);
    }

    Ok(())
}

async fn run_race(
    config: &DemoConfig,
    console: &Console,
    json: bool,
) -> evented::Result<RaceOutcome> {
    let (handle, signal) = stop_channel();
    cancel_on_ctrl_c(handle);

    let summary = race_demo::run(&config.race, console, &signal).await?;
    if json {
        race_demo::print_json(&summary, console)?;
    } else {
        race_demo::print_standings(&summary, console)?;
    }
    Ok(summary.outcome)
}

fn cancel_on_ctrl_c(handle: StopHandle) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("🛑 Ctrl-C received, stopping race");
            handle.stop();
        }
    });
}
