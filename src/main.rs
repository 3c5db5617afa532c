use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use prettytable::{Cell, Row, Table};
use regime_lev::prelude::*;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "regime-lev")]
#[command(about = "A moving-average regime-switching leverage backtester", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    //run a backtest
    Run(RunArgs),

    //write a default configuration file
    InitConfig {
        //output path for the json configuration
        #[arg(long)]
        output: PathBuf,

        //model type (continuous, discrete)
        #[arg(long, default_value = "continuous")]
        model: String,
    },
}

#[derive(Args)]
struct RunArgs {
    //path to csv data file (date,close or 交易日期,收盤)
    #[arg(long)]
    data: PathBuf,

    //json configuration file, overridden by any flag below
    #[arg(long)]
    config: Option<PathBuf>,

    //model type (continuous, discrete)
    #[arg(long)]
    model: Option<String>,

    //moving average windows
    #[arg(long)]
    ma_short: Option<usize>,

    #[arg(long)]
    ma_medium: Option<usize>,

    #[arg(long)]
    ma_season: Option<usize>,

    //target leverage: up & season up
    #[arg(long, allow_hyphen_values = true)]
    x: Option<f64>,

    //target leverage: down & season up
    #[arg(long, allow_hyphen_values = true)]
    y: Option<f64>,

    //target leverage: up & season down
    #[arg(long, allow_hyphen_values = true)]
    a: Option<f64>,

    //target leverage: down & season down
    #[arg(long, allow_hyphen_values = true)]
    b: Option<f64>,

    #[arg(long, allow_hyphen_values = true)]
    initial_leverage: Option<f64>,

    //continuous model costs, charged on each leverage change
    #[arg(long)]
    fee_rate: Option<f64>,

    #[arg(long)]
    slippage_rate: Option<f64>,

    //symmetric leverage cap
    #[arg(long)]
    max_leverage: Option<f64>,

    //discrete model account settings
    #[arg(long)]
    initial_capital: Option<f64>,

    #[arg(long)]
    contract_multiplier: Option<f64>,

    //output options
    //output path for the result table csv
    #[arg(long)]
    output_csv: Option<PathBuf>,

    //output path for the event table csv
    #[arg(long)]
    events_csv: Option<PathBuf>,

    //print the event table
    #[arg(long)]
    show_events: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "regime_lev=info".into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run(args) => run(args)?,
        Commands::InitConfig { output, model } => {
            let kind = parse_model(&model)?;
            let config = BacktestConfig {
                model: ModelConfig::for_kind(kind, 0.0),
                ..Default::default()
            };
            config
                .to_json_file(&output)
                .context(format!("Failed to write configuration to {:?}", output))?;
            println!("Configuration written to {:?}", output);
        }
    }

    Ok(())
}

fn parse_model(name: &str) -> Result<ModelKind> {
    ModelKind::parse(name).ok_or_else(|| anyhow::anyhow!("Unknown model: {}", name))
}

//starts from the file (or defaults) and applies every flag given
fn build_config(args: &RunArgs) -> Result<BacktestConfig> {
    let mut config = match &args.config {
        Some(path) => BacktestConfig::from_json_file(path)
            .context(format!("Failed to load configuration from {:?}", path))?,
        None => BacktestConfig::default(),
    };

    if let Some(name) = &args.model {
        let kind = parse_model(name)?;
        if kind != config.model.kind() {
            config.model = ModelConfig::for_kind(kind, config.model.initial_leverage());
        }
    }

    let windows = &mut config.windows;
    windows.short = args.ma_short.unwrap_or(windows.short);
    windows.medium = args.ma_medium.unwrap_or(windows.medium);
    windows.season = args.ma_season.unwrap_or(windows.season);

    let coefficients = &mut config.coefficients;
    coefficients.x = args.x.unwrap_or(coefficients.x);
    coefficients.y = args.y.unwrap_or(coefficients.y);
    coefficients.a = args.a.unwrap_or(coefficients.a);
    coefficients.b = args.b.unwrap_or(coefficients.b);

    if args.max_leverage.is_some() {
        config.max_leverage = args.max_leverage;
    }

    match &mut config.model {
        ModelConfig::Continuous {
            initial_leverage,
            fee_rate,
            slippage_rate,
        } => {
            *initial_leverage = args.initial_leverage.unwrap_or(*initial_leverage);
            *fee_rate = args.fee_rate.unwrap_or(*fee_rate);
            *slippage_rate = args.slippage_rate.unwrap_or(*slippage_rate);

            if args.initial_capital.is_some() || args.contract_multiplier.is_some() {
                tracing::warn!("account settings are ignored by the continuous model");
            }
        }
        ModelConfig::Discrete {
            initial_leverage,
            initial_capital,
            contract_multiplier,
        } => {
            *initial_leverage = args.initial_leverage.unwrap_or(*initial_leverage);
            *initial_capital = args.initial_capital.unwrap_or(*initial_capital);
            *contract_multiplier = args.contract_multiplier.unwrap_or(*contract_multiplier);

            if args.fee_rate.is_some() || args.slippage_rate.is_some() {
                tracing::warn!("fee and slippage are ignored by the discrete model");
            }
        }
    }

    Ok(config)
}

fn run(args: RunArgs) -> Result<()> {
    println!("Regime Leverage Backtester");
    println!("==========================\n");

    let config = build_config(&args)?;

    //load data
    println!("Loading data from {:?}...", args.data);
    let series = load_csv(&args.data)?;

    if let (Some(first), Some(last)) = (series.first(), series.last()) {
        println!("Loaded {} bars", series.len());
        println!("Date range: {} to {}\n", first.date, last.date);
    }

    let windows = config.windows;
    println!(
        "Windows: short={}, medium={}, season={}",
        windows.short, windows.medium, windows.season
    );
    let c = config.coefficients;
    println!("Coefficients: X={} Y={} A={} B={}", c.x, c.y, c.a, c.b);
    match config.leverage_cap() {
        Some(cap) => println!("Leverage cap: {}\n", cap),
        None => println!("Leverage cap: none\n"),
    }

    //run backtest
    println!("Running backtest...\n");
    let engine = BacktestEngine::new(config)?;
    let result = engine.run(&series)?;

    //display results
    println!("Backtest Results");
    println!("================\n");
    result.summary.pretty_print_table();

    let events = result.events();
    if args.show_events {
        print_events(&events);
    }

    if let Some(report) = &result.collapse_report {
        if report.is_empty() {
            println!("\nNo equity collapse detected");
        } else {
            println!("\nEquity collapse on {} bar(s):", report.events.len());
            for event in &report.events {
                println!(
                    "  {} return={:.2}% equity={:.2}",
                    event.date,
                    event.strategy_return * 100.0,
                    event.equity
                );
            }
        }
    }

    //save outputs if requested
    if let Some(path) = args.output_csv {
        save_results_csv(&result, &path)?;
        println!("\nResult table saved to {:?}", path);
    }

    if let Some(path) = args.events_csv {
        save_events_csv(&events, &path)?;
        println!("Events saved to {:?}", path);
    }

    Ok(())
}

fn print_events(events: &[RegimeEvent]) {
    println!();
    if events.is_empty() {
        println!("No events triggered");
        return;
    }

    let mut table = Table::new();
    table.add_row(Row::new(vec![
        Cell::new("Date"),
        Cell::new("Event"),
        Cell::new("Season"),
        Cell::new("Leverage"),
    ]));

    for event in events {
        let kind = match event.kind {
            EventKind::Up => "UP",
            EventKind::Down => "DOWN",
        };
        let season = match event.season {
            Season::Up => "above season MA",
            Season::Down => "below season MA",
        };
        table.add_row(Row::new(vec![
            Cell::new(&event.date.to_string()),
            Cell::new(kind),
            Cell::new(season),
            Cell::new(&format!("{:.2}", event.leverage_today)),
        ]));
    }

    table.printstd();
}
