//! Storage plans and the upload limits attached to them.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::UploadRejection;

const MIB: u64 = 1024 * 1024;
const GIB: u64 = 1024 * MIB;

const ALLOWED_EXTENSIONS: &[&str] = &[
    ".exe", ".txt", ".lua", ".py", ".js", ".json", ".md", ".zip", ".rar", ".pdf", ".doc", ".docx",
];

/// Storage plan granted to a user.
///
/// Every whitelisted identity is currently granted `Premium`; `Basic` is the
/// plan assumed for stored sessions that predate the plan field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Plan {
    #[default]
    Basic,
    Premium,
}

impl Plan {
    /// Returns the upload limits for this plan.
    #[must_use]
    pub fn limits(self) -> PlanLimits {
        match self {
            Self::Basic => PlanLimits {
                max_file_size: 13 * MIB,
                total_storage: GIB,
            },
            Self::Premium => PlanLimits {
                max_file_size: 30 * MIB,
                total_storage: 9 * GIB,
            },
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Basic => "basic",
            Self::Premium => "premium",
        }
    }
}

impl fmt::Display for Plan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Byte limits for a plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlanLimits {
    /// Largest single file accepted.
    pub max_file_size: u64,
    /// Total bytes a user may hold.
    pub total_storage: u64,
}

impl PlanLimits {
    /// Checks an upload against this plan before it is sent.
    ///
    /// Checks run in order: size, extension, remaining quota.
    ///
    /// # Errors
    ///
    /// Returns the first [`UploadRejection`] that applies.
    pub fn check_upload(
        &self,
        plan: Plan,
        file_name: &str,
        file_size: u64,
        used_bytes: u64,
    ) -> Result<(), UploadRejection> {
        if file_size > self.max_file_size {
            return Err(UploadRejection::TooLarge {
                plan,
                max_bytes: self.max_file_size,
                actual_bytes: file_size,
            });
        }

        let lower = file_name.to_lowercase();
        if !ALLOWED_EXTENSIONS.iter().any(|ext| lower.ends_with(ext)) {
            return Err(UploadRejection::InvalidType {
                file_name: file_name.to_string(),
            });
        }

        if used_bytes.saturating_add(file_size) > self.total_storage {
            return Err(UploadRejection::StorageFull {
                available_bytes: self.total_storage.saturating_sub(used_bytes),
            });
        }

        Ok(())
    }
}

/// Extensions accepted for upload, lowercase with the leading dot.
#[must_use]
pub fn allowed_extensions() -> &'static [&'static str] {
    ALLOWED_EXTENSIONS
}

/// Formats a byte count with binary units, e.g. `1.5 KB`.
#[must_use]
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["Bytes", "KB", "MB", "GB", "TB"];
    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    let rounded = (value * 100.0).round() / 100.0;
    format!("{rounded} {}", UNITS[unit])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plan_limits_match_tiers() {
        assert_eq!(Plan::Basic.limits().max_file_size, 13 * 1024 * 1024);
        assert_eq!(Plan::Basic.limits().total_storage, 1024 * 1024 * 1024);
        assert_eq!(Plan::Premium.limits().max_file_size, 30 * 1024 * 1024);
        assert_eq!(Plan::Premium.limits().total_storage, 9 * 1024 * 1024 * 1024);
    }

    #[test]
    fn plan_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Plan::Premium).unwrap(), "\"premium\"");
        let parsed: Plan = serde_json::from_str("\"basic\"").unwrap();
        assert_eq!(parsed, Plan::Basic);
    }

    #[test]
    fn upload_within_limits_is_accepted() {
        let limits = Plan::Premium.limits();
        assert!(
            limits
                .check_upload(Plan::Premium, "Script.LUA", 20 * MIB, 0)
                .is_ok()
        );
    }

    #[test]
    fn oversized_upload_is_rejected_first() {
        let limits = Plan::Basic.limits();
        let err = limits
            .check_upload(Plan::Basic, "movie.mkv", 14 * MIB, 0)
            .unwrap_err();
        assert!(matches!(err, UploadRejection::TooLarge { .. }));
    }

    #[test]
    fn disallowed_extension_is_rejected() {
        let limits = Plan::Premium.limits();
        let err = limits
            .check_upload(Plan::Premium, "photo.png", MIB, 0)
            .unwrap_err();
        assert_eq!(
            err,
            UploadRejection::InvalidType {
                file_name: "photo.png".to_string()
            }
        );
    }

    #[test]
    fn quota_overflow_reports_available_space() {
        let limits = Plan::Basic.limits();
        let used = GIB - MIB;
        let err = limits
            .check_upload(Plan::Basic, "notes.txt", 2 * MIB, used)
            .unwrap_err();
        assert_eq!(
            err,
            UploadRejection::StorageFull {
                available_bytes: MIB
            }
        );
    }

    #[test]
    fn format_bytes_units() {
        assert_eq!(format_bytes(0), "0 Bytes");
        assert_eq!(format_bytes(512), "512 Bytes");
        assert_eq!(format_bytes(1536), "1.5 KB");
        assert_eq!(format_bytes(13 * MIB), "13 MB");
        assert_eq!(format_bytes(9 * GIB), "9 GB");
    }
}
