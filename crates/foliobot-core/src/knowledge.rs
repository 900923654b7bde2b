use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// One entry in the owner's social link directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SocialLink {
    pub platform: String,
    pub url: String,
}

/// Static profile facts the responder quotes. Built once at startup and
/// never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnowledgeBase {
    pub bot_name: String,
    pub owner: String,
    pub location: String,
    pub role: String,
    pub education: String,
    pub current_work: String,
    pub email: String,
    pub skills: Vec<String>,
    pub projects: Vec<String>,
    pub social_links: Vec<SocialLink>,
    pub experience: Vec<String>,
    pub awards: Vec<String>,
    pub certifications: String,
}

impl KnowledgeBase {
    /// The compiled-in profile used when no profile file is configured.
    pub fn builtin() -> Self {
        Self {
            bot_name: "FolioBot".to_string(),
            owner: "Maya Iyer".to_string(),
            location: "Bengaluru, India".to_string(),
            role: "Data Science enthusiast and Software Development Engineer".to_string(),
            education: "Bachelor of Engineering in Computer Science, Visvesvaraya Technological University, Bengaluru (2019 - 2023)".to_string(),
            current_work: "Software Developer at Kestrel Analytics (March 2024 - Present) - building the Lumen insights platform".to_string(),
            email: "hello@mayaiyer.dev".to_string(),
            skills: vec![
                "Python".to_string(),
                "JavaScript".to_string(),
                "SQL".to_string(),
                "MongoDB".to_string(),
                "React.js".to_string(),
                "Node.js".to_string(),
                "Machine Learning".to_string(),
                "Data Analysis".to_string(),
                "Power BI".to_string(),
                "Tableau".to_string(),
            ],
            projects: vec![
                "Fraudulent Transaction Prediction".to_string(),
                "Heart Failure Detection".to_string(),
                "Where Is My Bus?".to_string(),
                "Face Recognition Attendance".to_string(),
                "Expense Tracker".to_string(),
                "Result Conversion Tool".to_string(),
            ],
            social_links: vec![
                SocialLink {
                    platform: "linkedin".to_string(),
                    url: "https://www.linkedin.com/in/mayaiyer/".to_string(),
                },
                SocialLink {
                    platform: "github".to_string(),
                    url: "https://github.com/mayaiyer".to_string(),
                },
                SocialLink {
                    platform: "portfolio".to_string(),
                    url: "https://mayaiyer.dev/".to_string(),
                },
                SocialLink {
                    platform: "fiverr".to_string(),
                    url: "https://www.fiverr.com/mayaiyer".to_string(),
                },
                SocialLink {
                    platform: "freelancer".to_string(),
                    url: "https://www.freelancer.in/u/mayaiyer".to_string(),
                },
                SocialLink {
                    platform: "blog".to_string(),
                    url: "https://mayaiyer.dev/blog/".to_string(),
                },
            ],
            experience: vec![
                "Data Science Intern at Orvant Health, Bengaluru (August 2023 - November 2023)".to_string(),
                "Data Analyst Intern at the VTU Alumni Office, Bengaluru (January 2023 - March 2023)".to_string(),
                "Software Developer Intern at Seedling Labs, Bengaluru (June 2022 - August 2022)".to_string(),
            ],
            awards: vec![
                "Best Student Paper at the 2023 Smart Mobility Symposium for \"Where Is My Bus?\"".to_string(),
                "Runner-up, VTU TechFest 2022 project competition, for the Result Conversion Tool".to_string(),
            ],
            certifications: "Maya has completed certifications from IBM, Coursera, and freeCodeCamp covering Data Science, Machine Learning, and Web Development.".to_string(),
        }
    }

    /// Load a profile from a JSON file, so the bot can represent a
    /// different portfolio without a rebuild.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let kb: KnowledgeBase = serde_json::from_str(&content)?;
        Ok(kb)
    }

    /// Look up a social URL by platform name (case-insensitive).
    pub fn social_url(&self, platform: &str) -> Option<&str> {
        self.social_links
            .iter()
            .find(|link| link.platform.eq_ignore_ascii_case(platform))
            .map(|link| link.url.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::io::Write;

    #[test]
    fn builtin_platforms_are_unique() {
        let kb = KnowledgeBase::builtin();
        let mut seen = HashSet::new();
        for link in &kb.social_links {
            assert!(
                seen.insert(link.platform.to_lowercase()),
                "duplicate platform: {}",
                link.platform
            );
        }
    }

    #[test]
    fn social_url_is_case_insensitive() {
        let kb = KnowledgeBase::builtin();
        assert_eq!(kb.social_url("GitHub"), kb.social_url("github"));
        assert!(kb.social_url("github").is_some());
        assert!(kb.social_url("myspace").is_none());
    }

    #[test]
    fn load_reads_a_json_profile() {
        let kb = KnowledgeBase::builtin();
        let json = serde_json::to_string_pretty(&kb).unwrap();

        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();

        let loaded = KnowledgeBase::load(file.path()).unwrap();
        assert_eq!(loaded.owner, kb.owner);
        assert_eq!(loaded.skills, kb.skills);
        assert_eq!(loaded.social_links.len(), kb.social_links.len());
    }
}
