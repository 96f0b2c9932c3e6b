use std::io::{self, Write};
use std::time::{Duration, Instant};

use indicatif::{ProgressBar, ProgressStyle};

/// Step counter bar for an interactive run.
///
/// Status lines are routed through [`suspend`](ProgressBar::suspend) so they
/// land on stdout without tearing the bar on stderr.
pub struct StepBar {
    bar: ProgressBar,
    start: Instant,
}

impl StepBar {
    pub fn new(total_steps: usize) -> Self {
        let bar = ProgressBar::new(total_steps as u64);
        bar.set_style(
            ProgressStyle::default_bar()
                .template(
                    "  {spinner:.cyan} [{bar:36.cyan/blue}] {pos:>7}/{len:7} steps  {msg}  ({eta})",
                )
                .expect("invalid template")
                .progress_chars("━╸─")
                .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
        );
        bar.enable_steady_tick(Duration::from_millis(80));
        Self {
            bar,
            start: Instant::now(),
        }
    }

    pub fn advance(&self, iteration: usize, total_energy: f64) {
        self.bar.set_position(iteration as u64);
        self.bar.set_message(format!("E = {total_energy:.6e}"));
    }

    pub fn println(&self, line: &str) {
        self.bar.suspend(|| println!("{line}"));
    }

    pub fn abandon(self) {
        self.bar.abandon();
    }

    pub fn finish(self) {
        self.bar.finish_and_clear();
        print_footer(self.start.elapsed());
    }
}

fn print_footer(elapsed: Duration) {
    let mut stderr = io::stderr().lock();

    let _ = writeln!(stderr);
    let _ = writeln!(
        stderr,
        "  \x1b[2m╺━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━╸\x1b[0m"
    );
    let _ = writeln!(stderr);
    let _ = writeln!(
        stderr,
        "  \x1b[32m✓\x1b[0m Run complete {:>37}",
        format!("Total: {:.2}s", elapsed.as_secs_f64())
    );
    let _ = writeln!(stderr);
}

pub enum Progress {
    Interactive(StepBar),
    Silent,
}

impl Progress {
    pub fn new(interactive: bool, total_steps: usize) -> Self {
        if interactive {
            Self::Interactive(StepBar::new(total_steps))
        } else {
            Self::Silent
        }
    }

    pub fn advance(&self, iteration: usize, total_energy: f64) {
        if let Self::Interactive(bar) = self {
            bar.advance(iteration, total_energy);
        }
    }

    /// Prints a status line to stdout.
    pub fn println(&self, line: &str) {
        match self {
            Self::Interactive(bar) => bar.println(line),
            Self::Silent => println!("{line}"),
        }
    }

    /// Stops the bar in place after a failed step.
    pub fn abandon(self) {
        if let Self::Interactive(bar) = self {
            bar.abandon();
        }
    }

    pub fn finish(self) {
        if let Self::Interactive(bar) = self {
            bar.finish();
        }
    }
}
