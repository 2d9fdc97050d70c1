use eventhorizon::{bench_derivative, bench_integration};
use eventhorizon::{Engine, Scenario, ScenarioConfig, SimulationOutput};

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(about = "Gravitational N-body and restricted three-body simulator")]
struct Args {
    /// Scenario file, looked up under `scenarios/` unless it is a path that exists
    #[arg(short, default_value = "vortex.yaml")]
    file_name: String,

    /// Override the vortex disk seed
    #[arg(long)]
    seed: Option<u64>,

    /// Run the scaling benchmarks instead of a scenario
    #[arg(long)]
    bench: bool,
}

// load here to keep main clean
fn load_scenario(file_name: &str) -> Result<ScenarioConfig> {
    let direct = PathBuf::from(file_name);
    let config_path = if direct.exists() {
        direct
    } else {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("scenarios").join(file_name)
    };

    ScenarioConfig::from_path(&config_path)
        .with_context(|| format!("failed to load scenario {}", config_path.display()))
}

fn report(output: &SimulationOutput) {
    let traj = &output.trajectory;
    println!(
        "{} bodies, {} samples, state dimension {}",
        output.bodies.len(),
        traj.len(),
        traj.dimension()
    );
    println!(
        "solver: {} accepted, {} rejected, {} evaluations",
        output.stats.accepted_steps, output.stats.rejected_steps, output.stats.fn_evals
    );
    if let Some(c) = &output.classification {
        println!("{c}");
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    if args.bench {
        bench_derivative();
        bench_integration();
        return Ok(());
    }

    let cfg = load_scenario(&args.file_name)?;
    let mut scenario = Scenario::build(cfg).context("invalid scenario")?;
    if let Some(seed) = args.seed {
        scenario = scenario.with_seed(seed);
    }

    info!("running {}", args.file_name);
    let output = Engine::run(&scenario).context("simulation failed")?;
    report(&output);

    Ok(())
}
