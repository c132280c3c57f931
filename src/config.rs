//! Configuration handling for the registration desk

use anyhow::Result;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fs;
use std::path::PathBuf;

/// Default registration API address
pub const DEFAULT_API_URL: &str = "http://127.0.0.1:5000";

/// Environment variable that overrides the configured API address
pub const API_URL_ENV: &str = "FORMDESK_API_URL";

const DEFAULT_DORMITORY_ENDPOINT: &str = "/api/dormitory/register";
const DEFAULT_COURSE_ENDPOINT: &str = "/api/courses/register";
const DEFAULT_EMAIL_DOMAINS: [&str; 2] = ["@students.aau.edu.et", "@aau.edu.et"];
const DEFAULT_STUDENT_ID_PATTERN: &str = r"^[A-Za-z]{2,4}/\d{4,5}/\d{2}$";
const DEFAULT_PHONE_PATTERN: &str = r"^(\+251|0)[79]\d{8}$";

/// Dormitory form settings that vary per institution
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DormitoryConfig {
    /// Endpoint path for dormitory registrations
    pub endpoint: Option<String>,
    /// Suffixes a student email must contain
    pub allowed_email_domains: Option<Vec<String>>,
    /// Regular expression for the student ID
    pub student_id_pattern: Option<String>,
    /// Extra fields merged into every payload
    pub constant_fields: Option<Map<String, Value>>,
}

/// Course form settings
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CourseConfig {
    pub endpoint: Option<String>,
    pub constant_fields: Option<Map<String, Value>>,
}

/// User configuration for the desk
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DeskConfig {
    /// Registration API base URL
    pub api_url: Option<String>,
    /// Regular expression for phone numbers, shared by both forms
    pub phone_pattern: Option<String>,
    #[serde(default)]
    pub dormitory: DormitoryConfig,
    #[serde(default)]
    pub course: CourseConfig,
}

impl DeskConfig {
    /// Get the config file path
    fn config_path() -> Option<PathBuf> {
        ProjectDirs::from("io", "formdesk", "formdesk")
            .map(|dirs| dirs.config_dir().join("config.json"))
    }

    /// Load configuration from file, then apply the environment override
    pub fn load() -> Result<Self> {
        let mut config = match Self::config_path() {
            Some(path) if path.exists() => {
                let content = fs::read_to_string(&path)?;
                let config: DeskConfig = serde_json::from_str(&content)?;
                tracing::debug!("loaded config from {}", path.display());
                config
            }
            _ => Self::default(),
        };

        if let Ok(url) = std::env::var(API_URL_ENV) {
            config.api_url = Some(url);
        }

        Ok(config)
    }

    pub fn api_url(&self) -> &str {
        self.api_url.as_deref().unwrap_or(DEFAULT_API_URL)
    }

    pub fn phone_pattern(&self) -> &str {
        self.phone_pattern.as_deref().unwrap_or(DEFAULT_PHONE_PATTERN)
    }

    pub fn dormitory_endpoint(&self) -> &str {
        self.dormitory
            .endpoint
            .as_deref()
            .unwrap_or(DEFAULT_DORMITORY_ENDPOINT)
    }

    pub fn course_endpoint(&self) -> &str {
        self.course
            .endpoint
            .as_deref()
            .unwrap_or(DEFAULT_COURSE_ENDPOINT)
    }

    pub fn allowed_email_domains(&self) -> Vec<String> {
        self.dormitory
            .allowed_email_domains
            .clone()
            .unwrap_or_else(|| DEFAULT_EMAIL_DOMAINS.iter().map(|s| s.to_string()).collect())
    }

    pub fn student_id_pattern(&self) -> &str {
        self.dormitory
            .student_id_pattern
            .as_deref()
            .unwrap_or(DEFAULT_STUDENT_ID_PATTERN)
    }

    /// Constant dormitory payload fields; `status: "pending"` unless configured
    pub fn dormitory_constants(&self) -> Map<String, Value> {
        self.dormitory.constant_fields.clone().unwrap_or_else(|| {
            let mut map = Map::new();
            map.insert("status".to_string(), Value::from("pending"));
            map
        })
    }

    pub fn course_constants(&self) -> Map<String, Value> {
        self.course.constant_fields.clone().unwrap_or_default()
    }
}
