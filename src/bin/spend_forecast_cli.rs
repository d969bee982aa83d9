use std::io::{self, Read};
use std::process::ExitCode;

use spend_forecast::{
    config::ConfigManager, init, utils::build_info, ForecastError, ForecastService,
};

const USAGE: &str = "usage: spend_forecast_cli [--version] [REQUEST.json | -]";

fn main() -> ExitCode {
    init();

    let arg = std::env::args().nth(1);
    match arg.as_deref() {
        Some("--version") | Some("-V") => {
            println!("{}", build_info::current());
            return ExitCode::SUCCESS;
        }
        Some("--help") | Some("-h") => {
            println!("{USAGE}");
            return ExitCode::SUCCESS;
        }
        _ => {}
    }

    match run(arg.as_deref()) {
        Ok(rendered) => {
            println!("{rendered}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("Error: {err}");
            if err.is_client_error() {
                ExitCode::from(2)
            } else {
                ExitCode::FAILURE
            }
        }
    }
}

fn run(source: Option<&str>) -> Result<String, ForecastError> {
    let body = match source {
        None | Some("-") => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            buffer
        }
        Some(path) => std::fs::read_to_string(path)?,
    };
    let config = ConfigManager::new().load()?;
    ForecastService::new(config.forecaster()).handle_json(&body)
}
