mod banner;
mod error;
mod progress;
mod tables;

pub use banner::{banner_for_help, print_banner};
pub use error::print_error;
pub use progress::Progress;
pub use tables::{print_final_energies, print_parameters};

#[derive(Debug, Clone, Copy)]
pub struct Context {
    pub interactive: bool,
    pub verbose: bool,
}

impl Context {
    pub fn detect() -> Self {
        Self {
            interactive: crate::io::stderr_is_tty(),
            verbose: false,
        }
    }

    pub fn with_quiet(self, quiet: bool) -> Self {
        if quiet {
            Self {
                interactive: false,
                ..self
            }
        } else {
            self
        }
    }

    pub fn with_verbose(self, verbose: bool) -> Self {
        Self { verbose, ..self }
    }
}
