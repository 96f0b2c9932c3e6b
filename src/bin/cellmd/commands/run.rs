use std::time::Instant;

use anyhow::{Context, Result};
use log::info;

use cellmd::io::{OutputPaths, scientific, write_mesh, write_particles};
use cellmd::{Energies, Simulation};

use crate::cli::Cli;
use crate::config::build_simulation_config;
use crate::display::{Context as DisplayContext, Progress, print_final_energies, print_parameters};
use crate::io::{create_output, ensure_output_dir};

pub fn run_simulation(cli: Cli, ctx: DisplayContext) -> Result<()> {
    let config = build_simulation_config(&cli)?;
    let output = &cli.output;
    let paths = (!output.no_io).then(|| OutputPaths::new(output.basename.as_str()));
    let frequency = output.frequency.get();

    let mut sim = Simulation::new(config).context("Failed to set up simulation")?;

    if ctx.verbose {
        print_parameters(
            sim.config(),
            sim.constants(),
            paths.as_ref().map(OutputPaths::base),
        );
    }

    if let Some(paths) = &paths {
        ensure_output_dir(paths.parent())?;
    }

    let started = Instant::now();
    let dt = sim.constants().dt;
    let progress = Progress::new(ctx.interactive, sim.constants().iterations);

    while !sim.is_finished() {
        let energies = match sim.step() {
            Ok(energies) => energies,
            Err(e) => {
                progress.abandon();
                return Err(e).context("Simulation aborted");
            }
        };
        let index = sim.iteration() - 1;
        progress.advance(sim.iteration(), energies.total());

        if index % frequency == 0 {
            progress.println(&status_line(index, sim.time(), dt, &energies));

            if let Some(paths) = paths.as_ref().filter(|_| output.checkpoint) {
                // Checkpoints are numbered by step index, like the status line.
                let mut snapshot = sim.snapshot();
                snapshot.iteration = index;
                let path = paths.checkpoint(index);
                write_particles(create_output(&path)?, &snapshot)
                    .with_context(|| format!("Failed to write checkpoint: {}", path.display()))?;
            }
        }
    }

    progress.finish();

    let energies = sim.energies();
    println!(
        "Step {:>8}, Time: {:>14}, Final energy: {:>14}",
        sim.iteration(),
        scientific(sim.time(), 8),
        scientific(energies.total(), 8)
    );
    println!("Simulation complete.");

    if ctx.verbose {
        print_final_energies(&energies, sim.iteration(), sim.time());
    }

    if let Some(paths) = &paths {
        let mesh = paths.mesh();
        write_mesh(
            create_output(&mesh)?,
            sim.grid().dims(),
            sim.grid().cell_size(),
        )
        .with_context(|| format!("Failed to write mesh: {}", mesh.display()))?;

        let result = paths.result();
        write_particles(create_output(&result)?, &sim.snapshot())
            .with_context(|| format!("Failed to write result: {}", result.display()))?;
        info!("Wrote {} and {}", mesh.display(), result.display());
    }

    println!("total cpu time: {:.6} seconds", started.elapsed().as_secs_f64());
    Ok(())
}

fn status_line(step: usize, time: f64, dt: f64, energies: &Energies) -> String {
    format!(
        "Step {:>8}, Time: {:>14} (dt: {:>14}), Total energy: {:>14} (p:{:>14},k:{:>14}), Temp: {:>14}",
        step,
        scientific(time, 8),
        scientific(dt, 8),
        scientific(energies.total(), 8),
        scientific(energies.potential, 8),
        scientific(energies.kinetic, 8),
        scientific(energies.temperature(), 8),
    )
}
