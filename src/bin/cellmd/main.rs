use std::process::ExitCode;

use env_logger::Env;

mod cli;
mod commands;
mod config;
mod display;
mod io;
mod util;

fn main() -> ExitCode {
    let cli = cli::parse();

    let level = if cli.verbose { "info" } else { "warn" };
    env_logger::Builder::from_env(Env::default().default_filter_or(level)).init();

    let ctx = display::Context::detect()
        .with_quiet(cli.quiet)
        .with_verbose(cli.verbose);

    if ctx.interactive {
        display::print_banner();
    }

    match commands::run_simulation(cli, ctx) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            display::print_error(&e);
            ExitCode::FAILURE
        }
    }
}
