use std::process::ExitCode;

use colored::Colorize;
use typemock::cli;

fn main() -> ExitCode {
    let command_line_interface = cli::CommandLineInterface::load();
    tracing_subscriber::fmt()
        .with_max_level(command_line_interface.log_level())
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
    match command_line_interface.run() {
        Ok(code) => code,
        Err(error) => {
            eprintln!("{} {error:#}", "error:".red().bold());
            ExitCode::FAILURE
        }
    }
}
