//! Suggest command - print example questions.

use colored::Colorize;
use samarth::suggested_questions;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", "Try asking:".cyan().bold());
    for question in suggested_questions() {
        println!("  - {}", question);
    }
    Ok(())
}
