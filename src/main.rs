use std::process::ExitCode;

use clap::Parser;

use prucam_lib::cli::Cli;

fn main() -> ExitCode {
    let cli = Cli::parse();
    prucam_lib::logging::init(cli.verbose, cli.quiet);

    match prucam_lib::run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e.chain());
            ExitCode::from(e.exit_code())
        }
    }
}
