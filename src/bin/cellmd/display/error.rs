use std::io::{self, Write};

use anyhow::Error;

use crate::util::text::wrap;

#[rustfmt::skip]
pub fn print_error(err: &Error) {
    let mut stderr = io::stderr().lock();

    let _ = writeln!(stderr);
    let _ = writeln!(stderr, "   ╔══════════════════════════════════════════════════════════════╗");
    let _ = writeln!(stderr, "   ║  ✗ Error                                                     ║");
    let _ = writeln!(stderr, "   ╟──────────────────────────────────────────────────────────────╢");

    for line in wrap(&err.to_string(), 59) {
        let _ = writeln!(stderr, "   ║  {:<59} ║", line);
    }

    let mut source = err.source();
    while let Some(cause) = source {
        let _ = writeln!(stderr, "   ╟──────────────────────────────────────────────────────────────╢");
        let _ = writeln!(stderr, "   ║  Caused by:                                                  ║");
        for line in wrap(&cause.to_string(), 57) {
            let _ = writeln!(stderr, "   ║    {:<57} ║", line);
        }
        source = cause.source();
    }

    let hints = collect_hints(err);
    if !hints.is_empty() {
        let _ = writeln!(stderr, "   ╟──────────────────────────────────────────────────────────────╢");
        let _ = writeln!(stderr, "   ║  Hints:                                                      ║");
        for hint in hints {
            let wrapped = wrap(&hint, 55);
            if let Some((first, rest)) = wrapped.split_first() {
                let _ = writeln!(stderr, "   ║    • {:<55} ║", first);
                for line in rest {
                    let _ = writeln!(stderr, "   ║      {:<55} ║", line);
                }
            }
        }
    }

    let _ = writeln!(stderr, "   ╚══════════════════════════════════════════════════════════════╝");
    let _ = writeln!(stderr);
}

fn collect_hints(err: &Error) -> Vec<String> {
    let mut hints = HintCollector::default();

    hints.collect_sim_hints(err);
    hints.collect_output_hints(err);

    if !hints.has_typed_hints {
        for cause in err.chain() {
            if let Some(io_err) = cause.downcast_ref::<std::io::Error>() {
                hints.mark_typed();
                hints.collect_std_io_hints(io_err);
                break;
            }
        }
    }

    hints.hints
}

#[derive(Default)]
struct HintCollector {
    hints: Vec<String>,
    has_typed_hints: bool,
}

impl HintCollector {
    fn add(&mut self, hint: impl Into<String>) {
        self.hints.push(hint.into());
    }

    fn mark_typed(&mut self) {
        self.has_typed_hints = true;
    }

    fn collect_sim_hints(&mut self, err: &Error) {
        use cellmd::SimError;

        let Some(sim_err) = err.chain().find_map(|e| e.downcast_ref::<SimError>()) else {
            return;
        };

        self.mark_typed();

        match sim_err {
            SimError::InvalidConfiguration(msg) => {
                if msg.contains("cutoff") && msg.contains("cell size") {
                    self.add("The cutoff must not exceed the cell size (-r ≤ -s)");
                    self.add("Increase --cellsize or reduce --cutoff");
                } else if msg.contains("grid") {
                    self.add("Both --cellx and --celly must be at least 1");
                } else if msg.contains("time step") || msg.contains("iteration") {
                    self.add("Provide a positive --del-t or a non-zero --iters");
                } else {
                    self.add("Check the numeric options passed on the command line");
                }
            }

            SimError::ConfigParse(_) => {
                self.add("The --config file is not valid TOML for this program");
                self.add(
                    "Allowed keys: cells_x, cells_y, particles_per_dim, cell_size, cutoff, \
                     end_time, iterations, time_step, temperature, seed",
                );
            }

            SimError::DisplacementExceeded { cell_size, .. } => {
                self.add(format!(
                    "A particle travelled further than one cell ({cell_size}) in a single step"
                ));
                self.add("Reduce --del-t or increase --iters to shorten the timestep");
                self.add("A lower --temp also reduces particle speeds");
            }

            SimError::GridMismatch(_) => {
                self.add("The supplied grid does not match --cellx, --celly, or --cellsize");
            }
        }
    }

    fn collect_output_hints(&mut self, err: &Error) {
        use cellmd::io::Error as OutputError;

        let Some(out_err) = err.chain().find_map(|e| e.downcast_ref::<OutputError>()) else {
            return;
        };

        self.mark_typed();

        match out_err {
            OutputError::Io { source } => {
                self.collect_std_io_hints(source);
                self.add("Use --noio to run without writing snapshot files");
            }
        }
    }

    fn collect_std_io_hints(&mut self, source: &std::io::Error) {
        use std::io::ErrorKind;

        match source.kind() {
            ErrorKind::NotFound => {
                self.add("File or directory not found");
                self.add("Check the path passed to --config or --output");
            }

            ErrorKind::PermissionDenied => {
                self.add("Permission denied accessing the file");
                self.add("Check that the output directory is writable");
            }

            ErrorKind::StorageFull | ErrorKind::WriteZero => {
                self.add("Failed to write data (disk full?)");
                self.add("Reduce checkpoint frequency with --freq or drop --checkpoint");
            }

            ErrorKind::BrokenPipe => {
                self.add("Broken pipe: the output consumer terminated");
            }

            _ => {
                self.add("I/O operation failed");
                self.add("Check file paths, permissions, and disk space");
            }
        }
    }
}
