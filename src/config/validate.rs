//! Settings validation logic.
//! Structural checks that must pass before any scanning or I/O happens.
//! Source/target containment is checked by the scanner, which also needs
//! the paths canonicalized; here we reject what can be rejected cheaply.

use anyhow::Result;
use tracing::debug;

use crate::errors::OrganizeError;

use super::types::Settings;

impl Settings {
    /// Validate the parts of a Settings value that do not require touching
    /// the filesystem: a non-empty source and ordered size bounds.
    pub fn validate(&self) -> Result<()> {
        if self.source_path.as_os_str().is_empty() {
            return Err(OrganizeError::InvalidSource(self.source_path.clone()).into());
        }

        if let (Some(min), Some(max)) = (self.min_size_bytes, self.max_size_bytes)
            && min > max
        {
            return Err(OrganizeError::InvalidSizeBounds { min, max }.into());
        }

        debug!(
            source = %self.source_path.display(),
            target = %self.target_path.display(),
            mode = %self.operation_mode,
            dry_run = self.dry_run,
            "settings validated"
        );
        Ok(())
    }
}
