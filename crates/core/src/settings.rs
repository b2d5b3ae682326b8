//! Application settings record.
//!
//! Persisted as camelCase JSON. Missing keys fall back to [`Settings::default`],
//! so a partial file on disk merges over the defaults.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use crate::error::{ValidationError, ValidationResult};

/// Application-wide settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    /// Company display name
    pub company_name: String,
    /// Company contact email
    pub company_email: String,
    /// IANA timezone name
    pub timezone: String,
    /// Date display format
    pub date_format: String,
    /// UI language code
    pub language: String,

    /// Email notifications enabled
    pub email_notifications: bool,
    /// Push notifications enabled
    pub push_notifications: bool,
    /// Task reminders enabled
    pub task_reminders: bool,
    /// Project update notifications enabled
    pub project_updates: bool,
    /// Weekly report emails enabled
    pub weekly_reports: bool,

    /// Two-factor auth required
    pub two_factor_auth: bool,
    /// Session timeout in minutes (5-480)
    pub session_timeout: u32,
    /// Password expiry in days (30-365)
    pub password_expiry: u32,
    /// Allowed login attempts (3-10)
    pub login_attempts: u32,

    /// UI theme
    pub theme: Theme,
    /// Sidebar collapsed by default
    pub sidebar_collapsed: bool,
    /// Compact layout
    pub compact_mode: bool,

    /// Slack integration toggle
    pub slack_integration: bool,
    /// GitHub integration toggle
    pub github_integration: bool,
    /// Google Calendar integration toggle
    pub google_calendar: bool,
    /// Jira integration toggle
    pub jira_integration: bool,

    /// Automatic backups enabled
    pub auto_backup: bool,
    /// Backup cadence
    pub backup_frequency: BackupFrequency,
    /// Data retention in days (30-1095)
    pub data_retention: u32,
    /// Default export format
    pub export_format: ExportFormat,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            company_name: "NexaPro".to_string(),
            company_email: "admin@nexapro.com".to_string(),
            timezone: "Asia/Jakarta".to_string(),
            date_format: "DD/MM/YYYY".to_string(),
            language: "en".to_string(),
            email_notifications: true,
            push_notifications: true,
            task_reminders: true,
            project_updates: true,
            weekly_reports: false,
            two_factor_auth: false,
            session_timeout: 30,
            password_expiry: 90,
            login_attempts: 5,
            theme: Theme::Light,
            sidebar_collapsed: false,
            compact_mode: false,
            slack_integration: false,
            github_integration: false,
            google_calendar: false,
            jira_integration: false,
            auto_backup: true,
            backup_frequency: BackupFrequency::Daily,
            data_retention: 365,
            export_format: ExportFormat::Csv,
        }
    }
}

impl Settings {
    /// Check lengths, ranges and the email shape.
    pub fn validate(&self) -> ValidationResult {
        max_len("companyName", &self.company_name, 255)?;
        max_len("companyEmail", &self.company_email, 255)?;
        max_len("timezone", &self.timezone, 50)?;
        max_len("dateFormat", &self.date_format, 20)?;
        max_len("language", &self.language, 10)?;
        check_email(&self.company_email)?;
        in_range("sessionTimeout", self.session_timeout, 5, 480)?;
        in_range("passwordExpiry", self.password_expiry, 30, 365)?;
        in_range("loginAttempts", self.login_attempts, 3, 10)?;
        in_range("dataRetention", self.data_retention, 30, 1095)?;
        Ok(())
    }

    /// Set one field by its camelCase key.
    ///
    /// `raw` is parsed as JSON when possible (`true`, `42`) and taken as a
    /// plain string otherwise. The result is validated before it is applied.
    pub fn set(&mut self, key: &str, raw: &str) -> ValidationResult {
        let mut value = serde_json::to_value(&*self).map_err(|e| invalid(key, e))?;
        let map = value
            .as_object_mut()
            .ok_or_else(|| invalid(key, "settings are not an object"))?;
        if !map.contains_key(key) {
            return Err(ValidationError::unknown("setting", key));
        }
        let as_string = serde_json::Value::String(raw.to_string());
        let parsed = serde_json::from_str(raw).unwrap_or_else(|_| as_string.clone());
        map.insert(key.to_string(), parsed);

        // A numeric-looking company name is still a string.
        let updated: Settings = match serde_json::from_value(value.clone()) {
            Ok(updated) => updated,
            Err(first) => {
                if let Some(map) = value.as_object_mut() {
                    map.insert(key.to_string(), as_string);
                }
                serde_json::from_value(value).map_err(|_| invalid(key, first))?
            }
        };
        updated.validate()?;
        *self = updated;
        Ok(())
    }
}

fn invalid(field: &str, reason: impl std::fmt::Display) -> ValidationError {
    ValidationError::Invalid {
        field: field.to_string(),
        reason: reason.to_string(),
    }
}

fn max_len(field: &str, value: &str, max: usize) -> ValidationResult {
    if value.chars().count() > max {
        return Err(invalid(field, format!("longer than {max} characters")));
    }
    Ok(())
}

fn in_range(field: &str, value: u32, min: u32, max: u32) -> ValidationResult {
    if value < min || value > max {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            value: i64::from(value),
            min: i64::from(min),
            max: i64::from(max),
        });
    }
    Ok(())
}

fn email_pattern() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| {
        Regex::new(r"^[^@\s]+@[^@\s.]+(\.[^@\s.]+)+$").expect("email pattern is valid")
    })
}

fn check_email(value: &str) -> ValidationResult {
    if email_pattern().is_match(value) {
        Ok(())
    } else {
        Err(invalid("companyEmail", "not an email address"))
    }
}

/// UI theme.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    /// Light theme
    #[default]
    Light,
    /// Dark theme
    Dark,
    /// Follow the system
    Auto,
}

/// Backup cadence.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackupFrequency {
    /// Back up daily
    #[default]
    Daily,
    /// Back up weekly
    Weekly,
    /// Back up monthly
    Monthly,
}

/// Export file format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// Comma-separated values
    #[default]
    Csv,
    /// JSON
    Json,
    /// Excel workbook
    Xlsx,
    /// PDF document
    Pdf,
}
