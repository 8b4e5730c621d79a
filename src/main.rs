use scatsim::{Scenario, ScenarioConfig};

use anyhow::{Context, Result};
use clap::Parser;
use log::LevelFilter;

use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(about = "Classical scattering of a particle fan off a fixed central potential")]
struct Args {
    /// Scenario file; bare names are looked up under `scenarios/`
    #[arg(short, default_value = "coulomb_fan.yaml")]
    file_name: String,

    /// Step each tick's particles on the rayon pool
    #[arg(long)]
    parallel: bool,

    /// Debug-level logging (repeat for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log warnings and errors
    #[arg(short, long)]
    quiet: bool,
}

fn scenario_path(file_name: &str) -> PathBuf {
    let direct = PathBuf::from(file_name);
    if direct.is_file() {
        return direct;
    }
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("scenarios").join(file_name)
}

// load here to keep main clean
fn load_scenario_from_yaml(file_name: &str) -> Result<ScenarioConfig> {
    let config_path = scenario_path(file_name);
    let file = File::open(&config_path)
        .with_context(|| format!("failed to open {}", config_path.display()))?;
    let reader = BufReader::new(file);
    let scenario_cfg: ScenarioConfig = serde_yaml::from_reader(reader)
        .with_context(|| format!("failed to parse {}", config_path.display()))?;

    Ok(scenario_cfg)
}

fn main() -> Result<()> {
    let args = Args::parse();

    let level = match (args.quiet, args.verbose) {
        (true, _) => LevelFilter::Warn,
        (false, 0) => LevelFilter::Info,
        (false, 1) => LevelFilter::Debug,
        (false, _) => LevelFilter::Trace,
    };
    scatsim::logger::init(level);

    let mut scenario_cfg = load_scenario_from_yaml(&args.file_name)?;
    scenario_cfg.parameters.parallel |= args.parallel;

    let mut scenario = Scenario::build_scenario(scenario_cfg).context("invalid scenario")?;
    let report = scenario.run().context("simulation aborted")?;

    println!("{:>8} {:>12} {:>14} {:>9} {:>7}", "b", "theta [deg]", "rutherford", "samples", "exited");
    for (i, res) in scenario.results().iter().enumerate() {
        let p = &scenario.simulation.particles()[i];
        println!(
            "{:>8.3} {:>12.4} {:>14.4} {:>9} {:>7}",
            res.b,
            res.theta.to_degrees(),
            scenario.rutherford(res.b).to_degrees(),
            p.samples(),
            !scenario.simulation.is_active(i) && !report.failures.iter().any(|(j, _)| *j == i),
        );
    }

    for (i, err) in &report.failures {
        println!("particle {i} (b = {}): {err}", scenario.impact_parameters[*i]);
    }

    Ok(())
}
