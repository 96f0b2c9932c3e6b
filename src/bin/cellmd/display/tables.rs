use std::io::{self, Write};

use cellmd::{Constants, Energies, SimulationConfig};

use crate::util::text::truncate;

const INDENT: &str = "      ";

const BOX_INNER_WIDTH: usize = 62;
const SAFE_TABLE_WIDTH: usize = BOX_INNER_WIDTH - INDENT.len();

pub fn print_parameters(config: &SimulationConfig, constants: &Constants, output: Option<&str>) {
    let stderr = io::stderr();
    let mut out = stderr.lock();
    write_parameters(&mut out, config, constants, output);
}

pub fn print_final_energies(energies: &Energies, iteration: usize, time: f64) {
    let stderr = io::stderr();
    let mut out = stderr.lock();

    let rows = vec![
        ("Steps", iteration.to_string()),
        ("Time", format!("{time:.6e}")),
        ("Total energy", format!("{:.12e}", energies.total())),
        ("Potential", format!("{:.12e}", energies.potential)),
        ("Kinetic", format!("{:.12e}", energies.kinetic)),
        ("Temperature", format!("{:.6e}", energies.temperature())),
    ];
    print_kv_table(&mut out, "Final State", &rows);
}

fn write_parameters(
    out: &mut impl Write,
    config: &SimulationConfig,
    constants: &Constants,
    output: Option<&str>,
) {
    let extent = [
        config.cells_x as f64 * config.cell_size,
        config.cells_y as f64 * config.cell_size,
    ];

    let rows = vec![
        ("Grid", format!("{} × {} cells", config.cells_x, config.cells_y)),
        ("Domain", format!("{:.3} × {:.3}", extent[0], extent[1])),
        ("Cell size", format!("{}", config.cell_size)),
        ("Cutoff", format!("{}", config.cutoff)),
        (
            "Particles",
            format!(
                "{} ({}² per cell)",
                config.particle_count(),
                config.particles_per_dim
            ),
        ),
        ("Temperature", format!("{}", config.temperature)),
        ("End time", format!("{}", config.end_time)),
        ("Steps", format!("{}", constants.iterations)),
        ("Timestep", format!("{:.6e}", constants.dt)),
        ("Seed", format!("{}", config.seed)),
        ("Output", output.unwrap_or("disabled").to_string()),
    ];

    print_kv_table(out, "Run Parameters", &rows);
}

fn print_kv_table(out: &mut impl Write, title: &str, rows: &[(&str, String)]) {
    let key_w = 16usize;
    let sep_overhead = 6;
    let val_w = SAFE_TABLE_WIDTH.saturating_sub(key_w + sep_overhead);

    let _ = writeln!(
        out,
        "{}┌─ {} ─┐",
        INDENT,
        truncate(title, SAFE_TABLE_WIDTH - 6)
    );
    let _ = writeln!(
        out,
        "{}┌{k_line}┬{v_line}┐",
        INDENT,
        k_line = "─".repeat(key_w + 2),
        v_line = "─".repeat(val_w + 2)
    );

    for (key, val) in rows {
        let _ = writeln!(
            out,
            "{}│ {:<key_w$} │ {:>val_w$} │",
            INDENT,
            truncate(key, key_w),
            truncate(val, val_w),
        );
    }

    let _ = writeln!(
        out,
        "{}└{k_line}┴{v_line}┘",
        INDENT,
        k_line = "─".repeat(key_w + 2),
        v_line = "─".repeat(val_w + 2)
    );
}
