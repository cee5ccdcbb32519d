use relay_core::is_analysis_intent;

use crate::util::{CliResult, read_input};

/// Print `true` when the text reads like a project analysis request.
pub fn run(input: Option<&str>, text: Option<String>) -> CliResult {
    let text = match text {
        Some(t) => t,
        None => read_input(input)?,
    };
    println!("{}", is_analysis_intent(&text));
    Ok(0)
}
