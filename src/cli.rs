pub mod cli_jsr;
pub mod cli_main;
pub mod jsr_help;
