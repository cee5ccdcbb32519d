use relay_core::detect_refusal;

use crate::util::{CliResult, read_input};

/// Print the refusal line, or exit 1 silently when the text is not a refusal.
pub fn run(input: Option<&str>) -> CliResult {
    let text = read_input(input)?;
    match detect_refusal(&text) {
        Some(line) => {
            println!("{line}");
            Ok(0)
        }
        None => Ok(1),
    }
}
