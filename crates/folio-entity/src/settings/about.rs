//! About page content.

use serde::{Deserialize, Serialize};
use validator::Validate;

use folio_core::types::JsonMap;

use super::singleton::SingletonEntity;

const META_TITLE_MAX: usize = 60;
const META_DESCRIPTION_MAX: usize = 160;

/// Owner profile, highlight counters and SEO metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct AboutContent {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    pub bio: String,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(max = 20))]
    pub phone: String,
    #[validate(length(max = 100))]
    pub location: String,
    /// `{"linkedin": url, ...}`.
    pub social_links: JsonMap,
    pub experience_years: u32,
    pub projects_completed: u32,
    pub clients_served: u32,
    #[validate(length(max = 60))]
    pub meta_title: String,
    #[validate(length(max = 160))]
    pub meta_description: String,
}

impl Default for AboutContent {
    fn default() -> Self {
        let mut about = Self {
            name: "Robert Jamngeny".to_string(),
            title: "ICT & Cybersecurity Specialist".to_string(),
            bio: "Connecting Technology, Strategy, and Storytelling for a Secure Digital Future."
                .to_string(),
            email: None,
            phone: String::new(),
            location: String::new(),
            social_links: JsonMap::new(),
            experience_years: 0,
            projects_completed: 0,
            clients_served: 0,
            meta_title: String::new(),
            meta_description: String::new(),
        };
        about.normalize();
        about
    }
}

impl SingletonEntity for AboutContent {
    const KIND: &'static str = "about_content";
    const TABLE: &'static str = "about_content";

    /// Derives SEO fields left blank from the name, title and bio.
    fn normalize(&mut self) {
        if self.email.as_deref().is_some_and(|e| e.trim().is_empty()) {
            self.email = None;
        }
        if self.meta_title.trim().is_empty() {
            self.meta_title = truncate(&format!("{} - {}", self.name, self.title), META_TITLE_MAX);
        }
        if self.meta_description.trim().is_empty() && !self.bio.trim().is_empty() {
            let collapsed = self.bio.split_whitespace().collect::<Vec<_>>().join(" ");
            self.meta_description = truncate(&collapsed, META_DESCRIPTION_MAX);
        }
    }
}

fn truncate(s: &str, max_chars: usize) -> String {
    s.chars().take(max_chars).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_derive_meta() {
        let a = AboutContent::default();
        assert_eq!(a.meta_title, "Robert Jamngeny - ICT & Cybersecurity Specialist");
        assert!(a.meta_description.starts_with("Connecting Technology"));
        assert!(a.validate().is_ok());
    }

    #[test]
    fn test_meta_title_is_truncated() {
        let mut a = AboutContent {
            name: "N".repeat(50),
            title: "T".repeat(50),
            meta_title: String::new(),
            ..Default::default()
        };
        a.normalize();
        assert_eq!(a.meta_title.chars().count(), 60);
    }

    #[test]
    fn test_explicit_meta_kept() {
        let mut a = AboutContent {
            meta_description: "Custom".into(),
            ..Default::default()
        };
        a.normalize();
        assert_eq!(a.meta_description, "Custom");
    }
}
