//! Contact form settings.

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidateEmail, ValidationError};

use super::singleton::SingletonEntity;

/// Contact form toggles, rate limiting, notifications and auto-response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ContactSetting {
    pub is_contact_form_enabled: bool,
    pub require_name: bool,
    pub require_email: bool,
    pub require_phone: bool,
    pub require_company: bool,
    pub require_subject: bool,

    pub rate_limit_enabled: bool,
    /// Seconds.
    #[validate(range(min = 1))]
    pub rate_limit_period: u32,
    /// Messages allowed per period.
    #[validate(range(min = 1))]
    pub rate_limit_count: u32,

    pub notify_on_new_message: bool,
    /// Comma-separated recipient addresses.
    #[validate(custom(function = "validate_email_list"))]
    pub notification_emails: String,

    pub auto_response_enabled: bool,
    #[validate(length(max = 200))]
    pub auto_response_subject: String,
    pub auto_response_message: String,

    pub recaptcha_enabled: bool,
    #[validate(length(max = 100))]
    pub recaptcha_site_key: String,
    #[validate(length(max = 100))]
    pub recaptcha_secret_key: String,

    pub available_categories: Vec<String>,
}

impl ContactSetting {
    /// Parsed notification recipients.
    pub fn notification_recipients(&self) -> Vec<String> {
        split_emails(&self.notification_emails)
    }
}

impl Default for ContactSetting {
    fn default() -> Self {
        Self {
            is_contact_form_enabled: true,
            require_name: true,
            require_email: true,
            require_phone: false,
            require_company: false,
            require_subject: false,
            rate_limit_enabled: true,
            rate_limit_period: 3600,
            rate_limit_count: 5,
            notify_on_new_message: true,
            notification_emails: String::new(),
            auto_response_enabled: true,
            auto_response_subject: "Thank you for your message".to_string(),
            auto_response_message: "Thank you for contacting us. We have received your message and will get back to you soon.".to_string(),
            recaptcha_enabled: false,
            recaptcha_site_key: String::new(),
            recaptcha_secret_key: String::new(),
            available_categories: ["general", "consulting", "writing", "support", "other"]
                .iter()
                .map(|c| c.to_string())
                .collect(),
        }
    }
}

impl SingletonEntity for ContactSetting {
    const KIND: &'static str = "contact_setting";
    const TABLE: &'static str = "contact_settings";

    fn normalize(&mut self) {
        self.notification_emails = split_emails(&self.notification_emails).join(", ");
        self.available_categories = self
            .available_categories
            .iter()
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .collect();
    }
}

fn split_emails(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|e| !e.is_empty())
        .map(str::to_string)
        .collect()
}

fn validate_email_list(raw: &str) -> Result<(), ValidationError> {
    if split_emails(raw).iter().all(|e| e.validate_email()) {
        Ok(())
    } else {
        Err(ValidationError::new("email_list"))
    }
}
