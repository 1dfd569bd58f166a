use super::cli_jsr::jsr_menu;
use crate::Examples::jsr_examples::jsr_examples;
use std::io::{self, Write};

pub fn run_interactive_menu() {
    loop {
        show_main_menu();
        let choice = get_user_input();

        match choice.trim() {
            "1" => jsr_menu(),
            "2" => examples_menu(),
            "0" => {
                println!("Goodbye!");
                break;
            }
            _ => println!("Invalid choice. Please try again."),
        }
    }
}
/* colors
Blue (\x1b[34m) - Welcome header text

Yellow (\x1b[33m) - Menu options (1, 2, 0)

Cyan (\x1b[36m) - "Enter your choice:" prompt

Reset (\x1b[0m) - Returns to normal color after each colored section
*/
fn show_main_menu() {
    println!(
        "\x1b[34m\n Welcome to KiJSR: jet-stirred reactor runner \n \x1b[0m"
    );
    println!("\x1b[33m1. JSR Problems\x1b[0m");
    println!("\x1b[33m2. Examples\x1b[0m");
    println!("\x1b[33m0. Exit\x1b[0m");
    print!("\x1b[36mEnter your choice: \x1b[0m");
    let _ = io::stdout().flush();
}

fn examples_menu() {
    loop {
        println!("\n=== Examples ===");
        println!("1. Single JSR point");
        println!("2. JSR temperature sweep");
        println!("3. Show task template");
        println!("0. Back to main menu");
        print!("Enter your choice: ");
        let _ = io::stdout().flush();

        let choice = get_user_input();
        match choice.trim() {
            "1" => jsr_examples(0),
            "2" => jsr_examples(1),
            "3" => jsr_examples(2),
            "0" => break,
            _ => println!("Invalid choice. Please try again."),
        }
    }
}

pub(crate) fn get_user_input() -> String {
    let mut input = String::new();
    // end of input leaves the menus
    match io::stdin().read_line(&mut input) {
        Ok(0) | Err(_) => "0".to_string(),
        Ok(_) => input,
    }
}
