use anyhow::Result;
use clap::Parser;
use evosim_core::metrics::init_logging;
use evosim_lib::app::App;
use evosim_lib::model::config::AppConfig;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about = "Headless predator-prey neuroevolution", long_about = None)]
struct Args {
    /// Config file path
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Number of ticks to simulate
    #[arg(short, long, default_value_t = 10_000)]
    ticks: u64,

    /// Overrides `world.seed`
    #[arg(short, long)]
    seed: Option<u64>,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Print the summary as JSON
    #[arg(long)]
    json: bool,

    /// Print the default configuration as TOML and exit
    #[arg(long)]
    dump_config: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    if args.dump_config {
        println!("{}", toml::to_string(&AppConfig::default())?);
        return Ok(());
    }

    init_logging(&args.log_level);

    let mut config = App::load_config(&args.config)?;
    if let Some(seed) = args.seed {
        config.world.seed = seed;
    }

    let mut app = App::new(config)?;
    let summary = app.run(args.ticks);
    tracing::info!(
        ticks = summary.ticks,
        herbivores = summary.herbivores,
        carnivores = summary.carnivores,
        max_generation = summary.max_generation,
        "Run finished"
    );

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!("{summary}");
    }
    Ok(())
}
