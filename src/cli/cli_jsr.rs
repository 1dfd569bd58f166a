use super::cli_main::get_user_input;
use crate::ReactorsJSR::frozen_gas::FrozenIdealGas;
use crate::ReactorsJSR::jsr_sweep::JSRSweepResult;
use crate::ReactorsJSR::task_parser_jsr::{JSRTaskFile, create_template};
use crate::cli::jsr_help::JSR_ENG_HELPER;
use log::error;
use std::error::Error;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

pub const TEMPLATE_FILE: &str = "problem_jsr.json";

pub fn jsr_menu() {
    loop {
        println!("\n=== JSR Problems ===");
        println!("\x1b[33m1. Solve from file\x1b[0m");
        println!("\x1b[33m2. Auto-discover problem files\x1b[0m");
        println!("\x1b[33m3. Generate template\x1b[0m");
        println!("\x1b[33m4. Read help\x1b[0m");
        println!("\x1b[33m0. Back to main menu\x1b[0m");
        print!("\x1b[36mEnter your choice: \x1b[0m");
        let _ = io::stdout().flush();

        let choice = get_user_input();
        match choice.trim() {
            "1" => solve_from_file_dialog(),
            "2" => auto_solve_problems(),
            "3" => match create_template(TEMPLATE_FILE) {
                Ok(()) => println!("Template generated successfully: {}", TEMPLATE_FILE),
                Err(e) => println!("Failed to generate template: {}", e),
            },
            "4" => show_help(),
            "0" => break,
            _ => println!("Invalid choice. Please try again."),
        }
    }
}

/// Parse a task file and solve it on a frozen ideal gas built from the task species
pub fn solve_from_file<P: AsRef<Path>>(path: P) -> Result<JSRSweepResult, Box<dyn Error>> {
    let task = JSRTaskFile::from_file(path)?;
    let mut gas = FrozenIdealGas::new(&task.species_refs())?;
    let result = task.solve(&mut gas)?;
    Ok(result)
}

fn solve_and_report(path: &Path) {
    match solve_from_file(path) {
        Ok(result) => result.pretty_print(),
        Err(e) => {
            error!("failed to solve {:?}: {}", path, e);
            println!("Error: {}", e);
        }
    }
}

fn solve_from_file_dialog() {
    print!("\x1b[36mEnter file path: \x1b[0m");
    let _ = io::stdout().flush();
    let file_path = get_user_input();
    let path = PathBuf::from(file_path.trim());

    if path.exists() {
        solve_and_report(&path);
    } else {
        println!("File not found: {}", file_path.trim());
    }
}

fn auto_solve_problems() {
    use std::{env, fs};

    let current_dir = match env::current_dir() {
        Ok(dir) => dir,
        Err(e) => {
            println!("Failed to get current directory: {}", e);
            return;
        }
    };
    println!("Searching for problem files in: {:?}", current_dir);

    let mut found_files = false;
    if let Ok(entries) = fs::read_dir(&current_dir) {
        for entry in entries.flatten() {
            let path = entry.path();
            if let Some(filename) = path.file_name() {
                let filename_str = filename.to_string_lossy();
                if filename_str.starts_with("problem") && path.is_file() {
                    println!("Found problem file: {:?}", path);
                    solve_and_report(&path);
                    found_files = true;
                }
            }
        }
    }

    if !found_files {
        println!("No files starting with 'problem' found in current directory.");
    }
}

fn show_help() {
    println!("\n=== JSR Help ===");
    println!("{}", JSR_ENG_HELPER);
    println!("\nPress Enter to return to menu...");
    let _ = get_user_input();
}
