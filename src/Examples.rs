pub mod jsr_examples;
