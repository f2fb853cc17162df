//! Access log format module
//!
//! An access line is rendered in one of the named formats (`combined`,
//! `common`, `json`) or from a custom pattern with `$variable` placeholders.
//! The CLF-style formats append the effective host and, for rewritten
//! requests, the path actually served.

use chrono::Local;
use serde::Serialize;

const TIME_LOCAL_FORMAT: &str = "%d/%b/%Y:%H:%M:%S %z";

/// Access log format selected by `logging.access_log_format`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogFormat {
    Combined,
    Common,
    Json,
    Pattern(String),
}

impl LogFormat {
    pub fn parse(name: &str) -> Self {
        match name {
            "combined" => Self::Combined,
            "common" => Self::Common,
            "json" => Self::Json,
            pattern => Self::Pattern(pattern.to_string()),
        }
    }
}

/// One served request
#[derive(Debug, Clone, Serialize)]
pub struct AccessLogEntry {
    pub remote_addr: String,
    pub time: chrono::DateTime<Local>,
    /// Effective host (forwarded host when present)
    pub host: Option<String>,
    pub method: String,
    /// Path as received
    pub path: String,
    /// Path served after a subdomain rewrite
    pub rewritten_path: Option<String>,
    /// Query string without the leading `?`
    pub query: Option<String>,
    pub http_version: String,
    pub status: u16,
    pub body_bytes: usize,
    pub referer: Option<String>,
    pub user_agent: Option<String>,
    pub request_time_us: u64,
}

impl AccessLogEntry {
    /// Entry stamped with the current local time
    pub fn new(remote_addr: String, method: String, path: String) -> Self {
        Self {
            remote_addr,
            time: Local::now(),
            host: None,
            method,
            path,
            rewritten_path: None,
            query: None,
            http_version: "1.1".to_string(),
            status: 200,
            body_bytes: 0,
            referer: None,
            user_agent: None,
            request_time_us: 0,
        }
    }

    /// Render with a format name or custom pattern
    pub fn format(&self, format: &str) -> String {
        self.render(&LogFormat::parse(format))
    }

    pub fn render(&self, format: &LogFormat) -> String {
        match format {
            LogFormat::Combined => format!(
                "{} \"{}\" \"{}\"{}",
                self.clf_prefix(),
                dash(self.referer.as_deref()),
                dash(self.user_agent.as_deref()),
                self.routing_suffix(),
            ),
            LogFormat::Common => format!("{}{}", self.clf_prefix(), self.routing_suffix()),
            LogFormat::Json => serde_json::to_string(self).unwrap_or_else(|e| {
                tracing::warn!(error = %e, "failed to serialize access log entry");
                self.render(&LogFormat::Common)
            }),
            LogFormat::Pattern(pattern) => self.expand(pattern),
        }
    }

    /// `$remote_addr - - [$time_local] "$request" $status $body_bytes_sent`
    fn clf_prefix(&self) -> String {
        format!(
            "{} - - [{}] \"{}\" {} {}",
            self.remote_addr,
            self.time.format(TIME_LOCAL_FORMAT),
            self.request_line(),
            self.status,
            self.body_bytes,
        )
    }

    fn routing_suffix(&self) -> String {
        let mut suffix = format!(" host={}", dash(self.host.as_deref()));
        if let Some(target) = &self.rewritten_path {
            suffix.push_str(" rewrite=");
            suffix.push_str(target);
        }
        suffix
    }

    fn request_uri(&self) -> String {
        match &self.query {
            Some(q) => format!("{}?{q}", self.path),
            None => self.path.clone(),
        }
    }

    fn request_line(&self) -> String {
        format!("{} {} HTTP/{}", self.method, self.request_uri(), self.http_version)
    }

    /// Value of a pattern variable; `None` leaves the text as written
    fn variable(&self, name: &str) -> Option<String> {
        let value = match name {
            "remote_addr" => self.remote_addr.clone(),
            "host" => dash(self.host.as_deref()).to_string(),
            "time_local" => self.time.format(TIME_LOCAL_FORMAT).to_string(),
            "time_iso8601" => self.time.to_rfc3339(),
            "request" => self.request_line(),
            "request_method" => self.method.clone(),
            "request_uri" => self.request_uri(),
            "rewritten_uri" => dash(self.rewritten_path.as_deref()).to_string(),
            "status" => self.status.to_string(),
            "body_bytes_sent" => self.body_bytes.to_string(),
            "http_referer" => dash(self.referer.as_deref()).to_string(),
            "http_user_agent" => dash(self.user_agent.as_deref()).to_string(),
            "request_time" => {
                #[allow(clippy::cast_precision_loss)]
                let seconds = self.request_time_us as f64 / 1_000_000.0;
                format!("{seconds:.3}")
            }
            _ => return None,
        };
        Some(value)
    }

    /// Substitute `$name` placeholders in one pass
    ///
    /// A name runs over ASCII letters, digits and `_`; unknown names are kept
    /// verbatim.
    fn expand(&self, pattern: &str) -> String {
        let mut out = String::with_capacity(pattern.len() + 64);
        let mut rest = pattern;
        while let Some(start) = rest.find('$') {
            out.push_str(&rest[..start]);
            let after = &rest[start + 1..];
            let len = after
                .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
                .unwrap_or(after.len());
            let name = &after[..len];
            match self.variable(name) {
                Some(value) => out.push_str(&value),
                None => {
                    out.push('$');
                    out.push_str(name);
                }
            }
            rest = &after[len..];
        }
        out.push_str(rest);
        out
    }
}

fn dash(value: Option<&str>) -> &str {
    value.unwrap_or("-")
}
