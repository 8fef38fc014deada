//! Site-wide system settings.

use serde::{Deserialize, Serialize};
use validator::Validate;

use folio_core::types::JsonMap;

use super::singleton::SingletonEntity;

/// Site identity, maintenance, security, feature and notification knobs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct SystemSetting {
    #[validate(length(min = 1, max = 200))]
    pub site_name: String,
    pub site_description: String,
    #[validate(email)]
    pub contact_email: String,

    pub maintenance_mode: bool,
    pub maintenance_message: String,

    #[validate(range(min = 1))]
    pub max_login_attempts: u32,
    #[validate(range(min = 1))]
    pub login_timeout_minutes: u32,
    #[validate(range(min = 1))]
    pub password_min_length: u32,
    pub require_password_complexity: bool,

    /// Requests per hour per user.
    #[validate(range(min = 1))]
    pub api_rate_limit: u32,
    /// Seconds; also the TTL of the cached public projection.
    #[validate(range(min = 1))]
    pub cache_timeout: u32,
    #[validate(range(min = 1))]
    pub search_results_limit: u32,

    pub enable_registration: bool,
    pub enable_comments: bool,
    pub enable_newsletter: bool,
    pub enable_analytics: bool,

    pub email_notifications: bool,
    pub slack_notifications: bool,
    #[validate(url)]
    pub slack_webhook_url: Option<String>,

    pub auto_backup: bool,
    #[validate(range(min = 1))]
    pub backup_frequency_days: u32,
    pub monitor_uptime: bool,

    pub theme_settings: JsonMap,
    pub custom_css: String,
    pub custom_js: String,
    pub metadata: JsonMap,
}

impl Default for SystemSetting {
    fn default() -> Self {
        Self {
            site_name: "Jamngeny Vision".to_string(),
            site_description: "ICT, Cybersecurity, and Strategic Writing Portfolio".to_string(),
            contact_email: "jamngeny@gmail.com".to_string(),
            maintenance_mode: false,
            maintenance_message: "Site is under maintenance. Please check back later.".to_string(),
            max_login_attempts: 5,
            login_timeout_minutes: 30,
            password_min_length: 8,
            require_password_complexity: true,
            api_rate_limit: 1000,
            cache_timeout: 300,
            search_results_limit: 50,
            enable_registration: false,
            enable_comments: false,
            enable_newsletter: false,
            enable_analytics: true,
            email_notifications: true,
            slack_notifications: false,
            slack_webhook_url: None,
            auto_backup: false,
            backup_frequency_days: 7,
            monitor_uptime: true,
            theme_settings: JsonMap::new(),
            custom_css: String::new(),
            custom_js: String::new(),
            metadata: JsonMap::new(),
        }
    }
}

impl SingletonEntity for SystemSetting {
    const KIND: &'static str = "system_setting";
    const TABLE: &'static str = "system_settings";

    fn normalize(&mut self) {
        self.site_name = self.site_name.trim().to_string();
        self.contact_email = self.contact_email.trim().to_string();
        if self
            .slack_webhook_url
            .as_deref()
            .is_some_and(|u| u.trim().is_empty())
        {
            self.slack_webhook_url = None;
        }
    }
}

/// The subset of system settings exposed without authentication.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemInfo {
    pub site_name: String,
    pub site_description: String,
    pub contact_email: String,
    pub maintenance_mode: bool,
    pub maintenance_message: String,
}

impl From<&SystemSetting> for SystemInfo {
    fn from(s: &SystemSetting) -> Self {
        Self {
            site_name: s.site_name.clone(),
            site_description: s.site_description.clone(),
            contact_email: s.contact_email.clone(),
            maintenance_mode: s.maintenance_mode,
            maintenance_message: s.maintenance_message.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let s = SystemSetting::default();
        assert!(s.validate().is_ok());
        assert_eq!(s.site_name, "Jamngeny Vision");
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let s: SystemSetting = serde_json::from_str(r#"{"site_name": "X"}"#).unwrap();
        assert_eq!(s.site_name, "X");
        assert_eq!(s.cache_timeout, 300);
    }

    #[test]
    fn test_blank_webhook_normalizes_to_none() {
        let mut s = SystemSetting {
            slack_webhook_url: Some("  ".into()),
            ..Default::default()
        };
        s.normalize();
        assert!(s.slack_webhook_url.is_none());
        assert!(s.validate().is_ok());
    }

    #[test]
    fn test_invalid_email_and_name_reported() {
        let s = SystemSetting {
            site_name: String::new(),
            contact_email: "not-an-email".into(),
            ..Default::default()
        };
        let errors = s.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("site_name"));
        assert!(fields.contains_key("contact_email"));
    }
}
