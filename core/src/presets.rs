/// Headings of the project analysis report.
pub const PROJECT_ANALYSIS_SECTIONS: [&str; 13] = [
    "Overview",
    "1. User intent → extracted",
    "2. Key requirements",
    "3. Data quality notes",
    "4. Solution architecture (high-level)",
    "5. AI + AI Agents recommendations",
    "6. SEO evaluation",
    "7. Timeline / effort estimate",
    "8. Cost estimate (range)",
    "9. Investment prognosis (ROI + runway)",
    "10. Risks & mitigation",
    "11. Clarification questions",
    "12. Next steps",
];

/// Headings of the cost optimization report.
pub const COST_OPTIMIZATION_SECTIONS: [&str; 12] = [
    "Overview",
    "1. Current spend drivers → extracted",
    "2. Quick wins (next 2 weeks)",
    "3. Architecture & infra recommendations",
    "4. App/runtime optimizations",
    "5. Process & tooling (FinOps/SDLC)",
    "6. Expected savings (range, by item)",
    "7. Risks & trade-offs",
    "8. Implementation plan (phased)",
    "9. Metrics to monitor",
    "10. Open questions",
    "11. Next steps",
];

/// Headings of the executive one-pager.
pub const EXECUTIVE_REPORT_SECTIONS: [&str; 9] = [
    "1. TL;DR (one paragraph)",
    "2. Objectives → extracted",
    "3. Current KPIs & insights",
    "4. Key risks",
    "5. Recommendations (top 3)",
    "6. Timeline & owners",
    "7. Metrics to watch",
    "8. Open questions",
    "9. Next steps",
];

/// A named heading list the agent is asked to answer in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionPreset {
    ProjectAnalysis,
    CostOptimization,
    ExecutiveReport,
}

impl SectionPreset {
    pub const ALL: [SectionPreset; 3] = [
        Self::ProjectAnalysis,
        Self::CostOptimization,
        Self::ExecutiveReport,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::ProjectAnalysis => "project_analysis",
            Self::CostOptimization => "cost_optimization",
            Self::ExecutiveReport => "executive_report",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim().to_lowercase();
        Self::ALL.into_iter().find(|preset| preset.name() == name)
    }

    pub fn headings(self) -> &'static [&'static str] {
        match self {
            Self::ProjectAnalysis => &PROJECT_ANALYSIS_SECTIONS,
            Self::CostOptimization => &COST_OPTIMIZATION_SECTIONS,
            Self::ExecutiveReport => &EXECUTIVE_REPORT_SECTIONS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip_case_insensitively() {
        for preset in SectionPreset::ALL {
            assert_eq!(SectionPreset::from_name(preset.name()), Some(preset));
        }
        assert_eq!(
            SectionPreset::from_name(" Cost_Optimization "),
            Some(SectionPreset::CostOptimization)
        );
        assert_eq!(SectionPreset::from_name("default"), None);
    }

    #[test]
    fn preset_headings_are_unique() {
        for preset in SectionPreset::ALL {
            let headings = preset.headings();
            for (i, heading) in headings.iter().enumerate() {
                assert!(
                    !headings[i + 1..].contains(heading),
                    "{heading:?} repeats in {}",
                    preset.name()
                );
            }
        }
    }

    #[test]
    fn every_preset_ends_with_next_steps() {
        assert_eq!(SectionPreset::ProjectAnalysis.headings().len(), 13);
        assert_eq!(SectionPreset::CostOptimization.headings().len(), 12);
        assert_eq!(SectionPreset::ExecutiveReport.headings().len(), 9);
        assert_eq!(PROJECT_ANALYSIS_SECTIONS[0], "Overview");
        assert_eq!(PROJECT_ANALYSIS_SECTIONS[12], "12. Next steps");
        assert_eq!(COST_OPTIMIZATION_SECTIONS[11], "11. Next steps");
        assert_eq!(EXECUTIVE_REPORT_SECTIONS[8], "9. Next steps");
    }

    #[test]
    fn next_steps_is_not_folded_into_clarification_questions() {
        let mut answer = String::new();
        for heading in &PROJECT_ANALYSIS_SECTIONS[..12] {
            answer.push_str(&format!("{heading}\nbody of {heading}\n"));
        }
        answer.push_str("12. Next steps\nShip the MVP in Q1\n");

        let out = crate::normalize_sections(&answer, SectionPreset::ProjectAnalysis.headings(), true);
        let clarification = out
            .split("\n\n\n")
            .find(|section| section.starts_with("11. Clarification questions"))
            .expect("clarification section present");
        assert!(!clarification.contains("12. Next steps"), "got {clarification:?}");
        assert!(out.ends_with("12. Next steps\n\nShip the MVP in Q1"), "got {out:?}");
    }
}
