//! Transient user notifications
//!
//! Every user action ends in exactly one [`Notification`] per outcome. How it
//! is shown is up to the [`NotificationSink`]; the core only decides the
//! message, severity, anchor region and how long it stays visible.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::model::CaptureRegion;

/// How long a success notification stays visible
pub const SUCCESS_DURATION: Duration = Duration::from_millis(3000);

/// How long an error notification stays visible
pub const ERROR_DURATION: Duration = Duration::from_millis(5000);

/// Severity of a notification, mapped to a display color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Action completed
    Success,
    /// Recoverable failure
    Error,
}

impl Severity {
    /// Display color name
    pub fn color(&self) -> &'static str {
        match self {
            Severity::Success => "green",
            Severity::Error => "red",
        }
    }

    /// Default visibility duration
    pub fn default_duration(&self) -> Duration {
        match self {
            Severity::Success => SUCCESS_DURATION,
            Severity::Error => ERROR_DURATION,
        }
    }
}

/// A transient on-screen message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    /// Text shown to the user
    pub message:  String,
    /// Severity (selects the color)
    pub severity: Severity,
    /// Region the notification is anchored on
    pub region:   CaptureRegion,
    /// Visibility duration
    pub duration: Duration,
}

impl Notification {
    /// Creates a notification using the severity's default duration
    pub fn new(message: impl Into<String>, severity: Severity, region: CaptureRegion) -> Self {
        Self {
            message: message.into(),
            severity,
            region,
            duration: severity.default_duration(),
        }
    }

    /// Success notification
    pub fn success(message: impl Into<String>, region: CaptureRegion) -> Self {
        Self::new(message, Severity::Success, region)
    }

    /// Error notification
    pub fn error(message: impl Into<String>, region: CaptureRegion) -> Self {
        Self::new(message, Severity::Error, region)
    }
}

/// Renders notifications to the user
///
/// Implementations must not fail: a notification that cannot be shown is
/// dropped after logging.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    /// Shows a notification
    async fn notify(&self, notification: Notification);
}

/// Sink that writes notifications to the tracing log
///
/// Used instead of the console sink when logs are emitted as JSON, so that
/// notifications become structured records.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

#[async_trait]
impl NotificationSink for TracingNotifier {
    async fn notify(&self, n: Notification) {
        match n.severity {
            Severity::Error => tracing::error!(
                region = %n.region,
                color = n.severity.color(),
                duration_ms = n.duration.as_millis() as u64,
                "{}",
                n.message
            ),
            Severity::Success => tracing::info!(
                region = %n.region,
                color = n.severity.color(),
                duration_ms = n.duration.as_millis() as u64,
                "{}",
                n.message
            ),
        }
    }
}
