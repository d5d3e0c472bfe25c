use std::path::{Path, PathBuf};

use crate::PERCUSSION_CHANNEL;

/// Settings for one split run
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SplitConfig {
    /// Channel whose note numbers select the instrument (None = all melodic)
    pub percussion_channel: Option<u8>,
    /// Where output files go (None = next to the input)
    pub output_dir: Option<PathBuf>,
    /// Prefix for output file names (None = input file stem)
    pub base_name: Option<String>,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            percussion_channel: Some(PERCUSSION_CHANNEL),
            output_dir: None,
            base_name: None,
        }
    }
}

impl SplitConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn percussion_channel(mut self, channel: Option<u8>) -> Self {
        self.percussion_channel = channel;
        self
    }

    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(dir.into());
        self
    }

    pub fn base_name(mut self, name: impl Into<String>) -> Self {
        self.base_name = Some(name.into());
        self
    }

    pub fn is_percussion(&self, channel: u8) -> bool {
        self.percussion_channel == Some(channel)
    }

    /// Output directory for a given input file
    pub fn resolve_output_dir(&self, input: &Path) -> PathBuf {
        match &self.output_dir {
            Some(dir) => dir.clone(),
            None => input
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_default(),
        }
    }

    /// File name prefix for a given input file
    pub fn resolve_base_name(&self, input: &Path) -> String {
        match &self.base_name {
            Some(name) => name.clone(),
            None => input
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| "split".to_string()),
        }
    }
}
