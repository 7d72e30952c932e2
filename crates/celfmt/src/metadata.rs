//! Build and version identifiers reported once at startup.

use serde::Serialize;
use tracing::{info, warn};

/// Versions of this module and the libraries it was built from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildMetadata {
    /// Compiler the module was built with.
    pub rust: String,
    pub celfmt: String,
    #[serde(rename = "celfmt-parser")]
    pub parser: String,
    #[serde(rename = "celfmt-checker")]
    pub checker: String,
    /// Provider of the extension library declarations.
    #[serde(rename = "celfmt-common")]
    pub common: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commit_time: Option<String>,
}

impl BuildMetadata {
    /// Metadata recorded at build time, or `None` if the build script could
    /// not determine the compiler version.
    pub fn gather() -> Option<Self> {
        Self::from_parts(
            option_env!("CELFMT_RUSTC_VERSION"),
            option_env!("CELFMT_GIT_COMMIT"),
            option_env!("CELFMT_GIT_COMMIT_TIME"),
        )
    }

    fn from_parts(
        rust: Option<&str>,
        commit: Option<&str>,
        commit_time: Option<&str>,
    ) -> Option<Self> {
        let present = |value: Option<&str>| value.filter(|v| !v.is_empty()).map(str::to_string);
        Some(Self {
            rust: present(rust)?,
            celfmt: crate::VERSION.to_string(),
            parser: celfmt_parser::VERSION.to_string(),
            checker: celfmt_checker::VERSION.to_string(),
            common: celfmt_common::VERSION.to_string(),
            commit: present(commit),
            commit_time: present(commit_time),
        })
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Emit the record as one informational event.
    pub fn report(&self) {
        match self.to_json() {
            Ok(json) => info!(metadata = %json, "celfmt build metadata"),
            Err(err) => warn!(error = %err, "could not encode build metadata"),
        }
    }
}

/// Report build metadata if it is available.
pub fn report_build_metadata() {
    if let Some(metadata) = BuildMetadata::gather() {
        metadata.report();
    }
}
