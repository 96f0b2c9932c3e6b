use std::fs;

use anyhow::{Context, Result};

use cellmd::SimulationConfig;

use crate::cli::Cli;

/// Resolves the run configuration: defaults, then the `--config` file, then
/// individual flags.
pub fn build_simulation_config(cli: &Cli) -> Result<SimulationConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            let source = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            SimulationConfig::from_toml(&source)
                .with_context(|| format!("Invalid config file: {}", path.display()))?
        }
        None => SimulationConfig::default(),
    };

    apply_overrides(&mut config, cli);
    config.validate()?;
    Ok(config)
}

fn apply_overrides(config: &mut SimulationConfig, cli: &Cli) {
    let grid = &cli.grid;
    let time = &cli.time;

    set(&mut config.cells_x, grid.cells_x);
    set(&mut config.cells_y, grid.cells_y);
    set(&mut config.particles_per_dim, grid.particles_per_dim);
    set(&mut config.cell_size, grid.cell_size);
    set(&mut config.cutoff, grid.cutoff);
    set(&mut config.temperature, grid.temperature);
    set(&mut config.seed, grid.seed);
    set(&mut config.end_time, time.end_time);

    if let Some(iterations) = time.iterations {
        config.iterations = iterations;
        config.time_step = None;
    }
    if time.time_step.is_some() {
        config.time_step = time.time_step;
    }
}

fn set<T>(slot: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *slot = value;
    }
}
