use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use hurricane_loss::registry::catalog;
use hurricane_loss::{LossInputs, TimingConfig, run_with};
use tracing::error;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Mean annual economic loss from landfalling hurricanes in Florida and the
/// Gulf states.
///
/// Set TIMEIT=1 to time the run (TIMEIT_CYCLES, TIMEIT_LOGFILE tune it).
#[derive(Parser, Debug)]
#[command(name = "hurricane-loss", version)]
struct Args {
    /// Florida: expected landfalls per year
    #[arg(allow_negative_numbers = true)]
    florida_landfall_rate: Option<f64>,
    /// Florida: mean loss per landfall
    #[arg(allow_negative_numbers = true)]
    florida_mean: Option<f64>,
    /// Florida: stddev of the log of the loss per landfall
    #[arg(allow_negative_numbers = true)]
    florida_stddev: Option<f64>,
    /// Gulf states: expected landfalls per year
    #[arg(allow_negative_numbers = true)]
    gulf_landfall_rate: Option<f64>,
    /// Gulf states: mean loss per landfall
    #[arg(allow_negative_numbers = true)]
    gulf_mean: Option<f64>,
    /// Gulf states: stddev of the log of the loss per landfall
    #[arg(allow_negative_numbers = true)]
    gulf_stddev: Option<f64>,

    /// Number of Monte Carlo samples (simulated years)
    #[arg(short = 'n', long = "samples", default_value = "10000", allow_negative_numbers = true)]
    num_monte_carlo_samples: i64,

    /// Strategy id (see --list-strategies)
    #[arg(short = 's', long = "strategy", default_value = "0", allow_negative_numbers = true)]
    strategy_id: i64,

    /// Seed for the random number generator (random if omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// Worker threads for the parallel strategies
    #[arg(short, long)]
    workers: Option<usize>,

    /// Read all inputs from a JSON file instead of the positional arguments
    #[arg(long, conflicts_with_all = [
        "florida_landfall_rate", "florida_mean", "florida_stddev",
        "gulf_landfall_rate", "gulf_mean", "gulf_stddev",
    ])]
    config: Option<PathBuf>,

    /// Print the registered strategies and exit
    #[arg(long)]
    list_strategies: bool,

    /// Print the outcome as JSON
    #[arg(long)]
    json: bool,

    /// Debug logging (RUST_LOG overrides)
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn inputs(&self) -> Result<LossInputs, String> {
        if let Some(path) = &self.config {
            let mut inputs = LossInputs::from_json_file(path).map_err(|e| e.to_string())?;
            if self.seed.is_some() {
                inputs.rng_seed = self.seed;
            }
            return Ok(inputs);
        }

        let positional = [
            self.florida_landfall_rate,
            self.florida_mean,
            self.florida_stddev,
            self.gulf_landfall_rate,
            self.gulf_mean,
            self.gulf_stddev,
        ];
        let Some(values) = positional.into_iter().collect::<Option<Vec<f64>>>() else {
            return Err("six distribution parameters are required (or --config)".to_string());
        };

        Ok(LossInputs {
            florida_landfall_rate: values[0],
            florida_mean: values[1],
            florida_stddev: values[2],
            gulf_landfall_rate: values[3],
            gulf_mean: values[4],
            gulf_stddev: values[5],
            num_monte_carlo_samples: self.num_monte_carlo_samples,
            strategy_id: self.strategy_id,
            rng_seed: self.seed,
        })
    }
}

fn main() -> ExitCode {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("failed to set tracing subscriber");

    if args.list_strategies {
        for d in catalog() {
            println!("{:>3}  {}", d.id, d.description);
        }
        return ExitCode::SUCCESS;
    }

    let inputs = match args.inputs() {
        Ok(inputs) => inputs,
        Err(msg) => {
            error!("{msg}");
            return ExitCode::FAILURE;
        }
    };

    let timing = match TimingConfig::from_env() {
        Ok(t) => t,
        Err(e) => {
            error!("{e}");
            return ExitCode::FAILURE;
        }
    };

    match run_with(&inputs, args.workers, &timing) {
        Ok(outcome) if args.json => {
            println!("{}", serde_json::to_string(&outcome).expect("failed to serialize outcome"));
            ExitCode::SUCCESS
        }
        Ok(outcome) => {
            println!("{}", outcome.mean_loss);
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
