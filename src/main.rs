//! Mockart - command-line tool for synthesizing placeholder art from asset keys

use std::process::ExitCode;

use mockart::cli;

fn main() -> ExitCode {
    cli::run()
}
