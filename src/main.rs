use KiJSR::cli::cli_jsr::solve_from_file;
use KiJSR::cli::cli_main::run_interactive_menu;
use simplelog::{ColorChoice, Config, LevelFilter, TermLogger, TerminalMode};
use std::process::ExitCode;

pub fn main() -> ExitCode {
    let _ = TermLogger::init(
        LevelFilter::Info,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    );
    // kijsr <task.json> solves the file directly, without arguments the menu is shown
    match std::env::args().nth(1) {
        Some(path) => match solve_from_file(&path) {
            Ok(result) => {
                result.pretty_print();
                ExitCode::SUCCESS
            }
            Err(e) => {
                log::error!("{}: {}", path, e);
                ExitCode::FAILURE
            }
        },
        None => {
            run_interactive_menu();
            ExitCode::SUCCESS
        }
    }
}
