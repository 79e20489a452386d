//! Actionable resume improvement suggestions derived from skill gaps.

const MAX_LISTED_SKILLS: usize = 5;
const MIN_MATCHED_SKILLS: usize = 5;
const CLOUD_PLATFORMS: &[&str] = &["aws", "azure", "gcp"];

pub fn improvement_suggestions(missing_skills: &[String], matched_skills: &[String]) -> Vec<String> {
    let mut suggestions = Vec::new();
    let is_missing = |skill: &str| missing_skills.iter().any(|m| m == skill);

    if !missing_skills.is_empty() {
        let listed: Vec<&str> = missing_skills
            .iter()
            .take(MAX_LISTED_SKILLS)
            .map(String::as_str)
            .collect();
        suggestions.push(format!(
            "Add these key skills to your resume: {}",
            listed.join(", ")
        ));
    }

    if matched_skills.len() < MIN_MATCHED_SKILLS {
        suggestions.push(
            "Expand your technical skills section with more specific tools and frameworks"
                .to_string(),
        );
    }

    if is_missing("python") {
        suggestions
            .push("Python is required - add Python projects to your experience section".to_string());
    }

    if CLOUD_PLATFORMS.iter().any(|p| is_missing(p)) {
        suggestions.push("Consider getting cloud platform experience (AWS/Azure/GCP)".to_string());
    }

    if suggestions.is_empty() {
        suggestions.push(
            "Strong skill match! Consider highlighting achievements and impact in your experience"
                .to_string(),
        );
    }

    suggestions
}
