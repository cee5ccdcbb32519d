use clap::Args;
use relay_core::{SectionPreset, normalize_sections};

use crate::util::{CliResult, exit_error, read_input};

#[derive(Args)]
pub struct NormalizeArgs {
    /// Required heading, in output order (repeatable)
    #[arg(long = "section", conflicts_with = "preset")]
    sections: Vec<String>,
    /// Named heading list: project_analysis, cost_optimization, executive_report
    #[arg(long)]
    preset: Option<String>,
    /// Omit missing sections instead of filling them with a placeholder
    #[arg(long)]
    skip_empty: bool,
}

/// Resolve the heading list the arguments ask for.
fn headings(args: &NormalizeArgs) -> Result<Vec<String>, String> {
    if let Some(name) = &args.preset {
        let preset = SectionPreset::from_name(name).ok_or_else(|| {
            let known: Vec<&str> = SectionPreset::ALL.iter().map(|p| p.name()).collect();
            format!("Unknown preset '{name}'. Known presets: {}", known.join(", "))
        })?;
        return Ok(preset.headings().iter().map(|h| h.to_string()).collect());
    }
    if args.sections.is_empty() {
        return Err("Provide --section at least once or --preset".to_string());
    }
    Ok(args.sections.clone())
}

pub fn run(input: Option<&str>, args: NormalizeArgs) -> CliResult {
    let headings = headings(&args).unwrap_or_else(|e| {
        exit_error(&e, Some("Run `relay normalize --help` for usage."))
    });
    let text = read_input(input)?;
    println!("{}", normalize_sections(&text, &headings, args.skip_empty));
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(sections: &[&str], preset: Option<&str>) -> NormalizeArgs {
        NormalizeArgs {
            sections: sections.iter().map(|s| s.to_string()).collect(),
            preset: preset.map(str::to_string),
            skip_empty: false,
        }
    }

    #[test]
    fn preset_names_resolve_case_insensitively() {
        let resolved = headings(&args(&[], Some("Executive_Report"))).expect("known preset");
        assert_eq!(
            resolved.len(),
            SectionPreset::ExecutiveReport.headings().len()
        );
    }

    #[test]
    fn unknown_preset_lists_known_names() {
        let err = headings(&args(&[], Some("weekly"))).expect_err("unknown preset");
        assert!(err.contains("project_analysis"));
    }

    #[test]
    fn explicit_sections_are_kept_in_order() {
        let resolved = headings(&args(&["B", "A"], None)).expect("sections given");
        assert_eq!(resolved, vec!["B".to_string(), "A".to_string()]);
        assert!(headings(&args(&[], None)).is_err());
    }
}
