mod admin;
mod completion;
mod doctor;
mod dump;
mod web;

use std::process::ExitCode;

use log::LevelFilter;

use gantry::{App, CliError, logger};

fn main() -> ExitCode {
    if let Err(e) = logger::init(logger::level_from_env(LevelFilter::Warn), None) {
        eprintln!("Error: {e}");
        return ExitCode::FAILURE;
    }

    let app = match build() {
        Ok(app) => app,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        }
    };

    match app.run(std::env::args_os()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(CliError::Clap(e)) => e.exit(),
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn build() -> Result<App, CliError> {
    App::builder("gantry")
        .usage("A self-hosted service with nested commands")
        .version(env!("CARGO_PKG_VERSION"))
        .command(web::command())
        .command(admin::command())
        .command(doctor::command())
        .command(doctor::convert_command().hidden())
        .command(dump::command())
        .command(completion::command())
        .default_command(web::NAME)
        .build()
}
