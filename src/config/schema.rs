//! KDL schema for taskboard.kdl.
//!
//! ```kdl
//! host "0.0.0.0"
//! port 3000
//! mode "full"            // or "minimal"
//! static-dir "public"
//! landing-page "Landing_page.html"
//! users-file "users.json"
//! projects-file "projects.json"
//! corrupt-policy "empty" // or "strict"
//! log-dir "/var/log/taskboard"
//! ```

use crate::storage::CorruptPolicy;
use crate::{Error, Result};
use kdl::{KdlDocument, KdlEntry, KdlNode, KdlValue};

/// Which route set the server exposes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Mode {
    /// Accounts with login plus project and task management
    #[default]
    Full,
    /// Registration and a raw user listing only
    Minimal,
}

impl Mode {
    /// Parse from string, case-insensitive.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "full" => Some(Mode::Full),
            "minimal" => Some(Mode::Minimal),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Full => "full",
            Mode::Minimal => "minimal",
        }
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Settings read from taskboard.kdl. Unset nodes are `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskboardConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub mode: Option<Mode>,
    pub static_dir: Option<String>,
    pub landing_page: Option<String>,
    pub users_file: Option<String>,
    pub projects_file: Option<String>,
    pub corrupt_policy: Option<CorruptPolicy>,
    pub log_dir: Option<String>,
}

fn first_string(doc: &KdlDocument, name: &str) -> Result<Option<String>> {
    let Some(node) = doc.get(name) else {
        return Ok(None);
    };
    match node.entries().first().map(|e| e.value()) {
        Some(KdlValue::String(s)) => Ok(Some(s.clone())),
        Some(other) => Err(Error::Config(format!(
            "{} must be a string, got {}",
            name, other
        ))),
        None => Err(Error::Config(format!("{} has no value", name))),
    }
}

impl TaskboardConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse KDL text.
    pub fn parse(text: &str) -> Result<Self> {
        let doc: KdlDocument = text
            .parse()
            .map_err(|e| Error::Config(format!("Invalid KDL: {}", e)))?;
        Self::from_kdl(&doc)
    }

    /// Read settings from a KDL document, rejecting invalid values.
    pub fn from_kdl(doc: &KdlDocument) -> Result<Self> {
        let mut config = Self::new();

        config.host = first_string(doc, "host")?;
        config.static_dir = first_string(doc, "static-dir")?;
        config.landing_page = first_string(doc, "landing-page")?;
        config.users_file = first_string(doc, "users-file")?;
        config.projects_file = first_string(doc, "projects-file")?;
        config.log_dir = first_string(doc, "log-dir")?;

        if let Some(node) = doc.get("port") {
            let port = node
                .entries()
                .first()
                .and_then(|e| e.value().as_integer())
                .and_then(|i| u16::try_from(i).ok())
                .ok_or_else(|| Error::Config("port must be an integer 0-65535".to_string()))?;
            config.port = Some(port);
        }

        if let Some(mode) = first_string(doc, "mode")? {
            config.mode = Some(
                Mode::parse(&mode)
                    .ok_or_else(|| Error::Config(format!("unknown mode: {}", mode)))?,
            );
        }

        if let Some(policy) = first_string(doc, "corrupt-policy")? {
            config.corrupt_policy = Some(CorruptPolicy::parse(&policy).ok_or_else(|| {
                Error::Config(format!("unknown corrupt-policy: {}", policy))
            })?);
        }

        Ok(config)
    }

    /// Serialize set values back to KDL.
    pub fn to_kdl(&self) -> KdlDocument {
        let mut doc = KdlDocument::new();

        let strings = [
            ("host", self.host.clone()),
            ("mode", self.mode.map(|m| m.as_str().to_string())),
            ("static-dir", self.static_dir.clone()),
            ("landing-page", self.landing_page.clone()),
            ("users-file", self.users_file.clone()),
            ("projects-file", self.projects_file.clone()),
            (
                "corrupt-policy",
                self.corrupt_policy.map(|p| p.as_str().to_string()),
            ),
            ("log-dir", self.log_dir.clone()),
        ];

        if let Some(port) = self.port {
            let mut node = KdlNode::new("port");
            node.push(KdlEntry::new(KdlValue::Integer(port as i128)));
            doc.nodes_mut().push(node);
        }

        for (name, value) in strings {
            if let Some(value) = value {
                let mut node = KdlNode::new(name);
                node.push(KdlEntry::new(KdlValue::String(value)));
                doc.nodes_mut().push(node);
            }
        }

        doc
    }
}
