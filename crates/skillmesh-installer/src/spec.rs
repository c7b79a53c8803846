//! Install target syntax, `name` or `name@version`

use std::fmt;
use std::str::FromStr;

use skillmesh_types::is_valid_skill_name;

use crate::error::InstallError;

/// What the operator asked to install
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetSpec {
    pub name: String,
    /// Exact version; `None` means latest published
    pub version: Option<String>,
}

impl TargetSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: None,
        }
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }
}

impl FromStr for TargetSpec {
    type Err = InstallError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let raw = raw.trim();
        let (name, version) = match raw.split_once('@') {
            Some((name, version)) => (name, Some(version)),
            None => (raw, None),
        };

        if !is_valid_skill_name(name) {
            return Err(InstallError::Validation(format!(
                "Invalid skill name: '{name}'"
            )));
        }

        let version = match version {
            Some(v) => {
                semver::Version::parse(v).map_err(|e| {
                    InstallError::Validation(format!("Invalid version '{v}' in '{raw}': {e}"))
                })?;
                Some(v.to_string())
            }
            None => None,
        };

        Ok(Self {
            name: name.to_string(),
            version,
        })
    }
}

impl fmt::Display for TargetSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.version {
            Some(version) => write!(f, "{}@{}", self.name, version),
            None => write!(f, "{}", self.name),
        }
    }
}
