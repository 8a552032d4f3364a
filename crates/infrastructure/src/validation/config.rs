//! Startup validation for application configuration
//!
//! Critical issues in production prevent startup unless explicitly allowed.

use crate::config::AppConfig;
use std::fmt;

/// Environment variable that lets a production server start despite
/// critical findings
pub const ALLOW_INSECURE_ENV: &str = "AIRWATCH_ALLOW_INSECURE_CONFIG";

/// Severity level for configuration findings
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum WarningSeverity {
    /// Informational - no action required
    Info,
    /// Warning - should be addressed but not critical
    Warning,
    /// Critical - must be addressed in production
    Critical,
}

impl fmt::Display for WarningSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Info => write!(f, "INFO"),
            Self::Warning => write!(f, "WARNING"),
            Self::Critical => write!(f, "CRITICAL"),
        }
    }
}

/// A configuration finding with severity and description
#[derive(Debug, Clone)]
pub struct ConfigWarning {
    /// Severity level
    pub severity: WarningSeverity,
    /// Short code identifying the finding
    pub code: String,
    /// Human-readable description of the issue
    pub message: String,
    /// Recommended action to resolve the issue
    pub recommendation: String,
}

impl ConfigWarning {
    /// Create a new finding
    #[must_use]
    pub fn new(
        severity: WarningSeverity,
        code: impl Into<String>,
        message: impl Into<String>,
        recommendation: impl Into<String>,
    ) -> Self {
        Self {
            severity,
            code: code.into(),
            message: message.into(),
            recommendation: recommendation.into(),
        }
    }

    /// Create a critical finding
    #[must_use]
    pub fn critical(
        code: impl Into<String>,
        message: impl Into<String>,
        recommendation: impl Into<String>,
    ) -> Self {
        Self::new(WarningSeverity::Critical, code, message, recommendation)
    }

    /// Create a warning-level finding
    #[must_use]
    pub fn warning(
        code: impl Into<String>,
        message: impl Into<String>,
        recommendation: impl Into<String>,
    ) -> Self {
        Self::new(WarningSeverity::Warning, code, message, recommendation)
    }

    /// Create an informational notice
    #[must_use]
    pub fn info(
        code: impl Into<String>,
        message: impl Into<String>,
        recommendation: impl Into<String>,
    ) -> Self {
        Self::new(WarningSeverity::Info, code, message, recommendation)
    }

    /// Check if this finding is critical
    #[must_use]
    pub const fn is_critical(&self) -> bool {
        matches!(self.severity, WarningSeverity::Critical)
    }
}

impl fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}: {} - {}",
            self.severity, self.code, self.message, self.recommendation
        )
    }
}

/// Validates application configuration
#[derive(Debug, Clone, Copy, Default)]
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate configuration and return all findings, critical first
    #[must_use]
    pub fn validate(config: &AppConfig) -> Vec<ConfigWarning> {
        let mut warnings = Vec::new();
        let is_production = config.is_production();

        Self::check_alert_thresholds(config, &mut warnings);
        Self::check_openweather(config, is_production, &mut warnings);
        Self::check_cors_configuration(config, is_production, &mut warnings);
        Self::check_error_exposure(config, is_production, &mut warnings);
        Self::check_database_configuration(config, &mut warnings);
        Self::check_server_settings(config, &mut warnings);
        Self::check_recommendations(config, is_production, &mut warnings);

        warnings.sort_by(|a, b| b.severity.cmp(&a.severity));

        warnings
    }

    /// Whether startup should be refused
    ///
    /// Critical findings block a production start unless
    /// `AIRWATCH_ALLOW_INSECURE_CONFIG` is `true` or `1`.
    #[must_use]
    pub fn should_block_startup(config: &AppConfig, warnings: &[ConfigWarning]) -> bool {
        let has_critical = warnings.iter().any(ConfigWarning::is_critical);
        let allow_insecure = std::env::var(ALLOW_INSECURE_ENV)
            .map(|v| v == "true" || v == "1")
            .unwrap_or(false);

        config.is_production() && has_critical && !allow_insecure
    }

    /// Log all findings using tracing
    pub fn log_warnings(warnings: &[ConfigWarning]) {
        for warning in warnings {
            match warning.severity {
                WarningSeverity::Critical => {
                    tracing::error!(
                        code = %warning.code,
                        message = %warning.message,
                        recommendation = %warning.recommendation,
                        "Configuration issue"
                    );
                },
                WarningSeverity::Warning => {
                    tracing::warn!(
                        code = %warning.code,
                        message = %warning.message,
                        recommendation = %warning.recommendation,
                        "Configuration warning"
                    );
                },
                WarningSeverity::Info => {
                    tracing::info!(
                        code = %warning.code,
                        message = %warning.message,
                        recommendation = %warning.recommendation,
                        "Configuration notice"
                    );
                },
            }
        }
    }

    fn check_alert_thresholds(config: &AppConfig, warnings: &mut Vec<ConfigWarning>) {
        if let Err(e) = config.alerts.validate() {
            warnings.push(ConfigWarning::critical(
                "CFG001",
                e.to_string(),
                "Set alerts.moderate < alerts.unhealthy < alerts.dangerous",
            ));
        }
    }

    fn check_openweather(
        config: &AppConfig,
        is_production: bool,
        warnings: &mut Vec<ConfigWarning>,
    ) {
        if !config.openweather.has_api_key() {
            warnings.push(ConfigWarning::warning(
                "CFG002",
                "No OpenWeather API key configured; readings cannot be refreshed",
                "Set AIRWATCH_OPENWEATHER__API_KEY",
            ));
        }

        let base_url = config.openweather.base_url.as_str();
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            warnings.push(ConfigWarning::critical(
                "CFG003",
                format!("OpenWeather base URL is not an HTTP URL: {base_url}"),
                "Use the default https://api.openweathermap.org/data/2.5",
            ));
        } else if is_production && base_url.starts_with("http://") {
            warnings.push(ConfigWarning::warning(
                "CFG004",
                "OpenWeather base URL uses plain HTTP; the API key is sent in the query",
                "Use an https:// base URL in production",
            ));
        }

        if config.openweather.timeout_secs == 0 {
            warnings.push(ConfigWarning::warning(
                "CFG005",
                "OpenWeather timeout is 0 seconds",
                "Set openweather.timeout_secs to a positive value",
            ));
        }
    }

    fn check_cors_configuration(
        config: &AppConfig,
        is_production: bool,
        warnings: &mut Vec<ConfigWarning>,
    ) {
        if config.server.cors_enabled && config.server.allowed_origins.is_empty() {
            let severity = if is_production {
                WarningSeverity::Critical
            } else {
                WarningSeverity::Info
            };

            warnings.push(ConfigWarning::new(
                severity,
                "CFG006",
                "CORS is enabled with no origin restrictions (allows all origins)",
                "Specify server.allowed_origins in production",
            ));
        }
    }

    fn check_error_exposure(
        config: &AppConfig,
        is_production: bool,
        warnings: &mut Vec<ConfigWarning>,
    ) {
        if config.server.expose_internal_errors && is_production {
            warnings.push(ConfigWarning::critical(
                "CFG007",
                "Internal error details are exposed in API responses",
                "Disable server.expose_internal_errors in production",
            ));
        }
    }

    fn check_database_configuration(config: &AppConfig, warnings: &mut Vec<ConfigWarning>) {
        if config.database.max_connections == 0 {
            warnings.push(ConfigWarning::critical(
                "CFG008",
                "Database pool size is 0",
                "Set database.max_connections to at least 1",
            ));
        }

        if config.database.is_in_memory() {
            if config.database.max_connections > 1 {
                warnings.push(ConfigWarning::warning(
                    "CFG009",
                    "In-memory database with more than one connection; each connection sees its own database",
                    "Set database.max_connections = 1 for :memory:",
                ));
            }
            warnings.push(ConfigWarning::info(
                "CFG010",
                "Using an in-memory database; readings are lost on restart",
                "Set database.path to a file for persistent storage",
            ));
        }

        if !config.database.run_migrations {
            warnings.push(ConfigWarning::info(
                "CFG011",
                "Automatic migrations are disabled",
                "Make sure the schema is up to date before starting",
            ));
        }
    }

    fn check_server_settings(config: &AppConfig, warnings: &mut Vec<ConfigWarning>) {
        let format = config.server.log_format.to_lowercase();
        if format != "text" && format != "json" {
            warnings.push(ConfigWarning::warning(
                "CFG012",
                format!("Unknown log format '{}', falling back to text", config.server.log_format),
                "Use server.log_format = \"text\" or \"json\"",
            ));
        }

        if config.server.request_timeout_secs == 0 {
            warnings.push(ConfigWarning::warning(
                "CFG013",
                "Request timeout is 0 seconds; every request would time out",
                "Set server.request_timeout_secs to a positive value",
            ));
        }
    }

    fn check_recommendations(
        config: &AppConfig,
        is_production: bool,
        warnings: &mut Vec<ConfigWarning>,
    ) {
        if !config.recommendations.strict_tiling && is_production {
            warnings.push(ConfigWarning::warning(
                "CFG014",
                "Recommendation tiling errors will not stop startup",
                "Enable recommendations.strict_tiling in production",
            ));
        }
    }
}
