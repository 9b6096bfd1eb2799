//! OutputMode - how execution output is fitted into chat messages

use serde::{Deserialize, Serialize};

/// Display mode for execution output
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OutputMode {
    /// Split into as many fenced fragments as needed, nothing dropped
    #[default]
    Chunk,
    /// One message, tail cropped with a note of how much was dropped
    Crop,
}

impl std::fmt::Display for OutputMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputMode::Chunk => write!(f, "chunk"),
            OutputMode::Crop => write!(f, "crop"),
        }
    }
}

impl std::str::FromStr for OutputMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "chunk" => Ok(OutputMode::Chunk),
            "crop" => Ok(OutputMode::Crop),
            _ => Err(format!("Unknown output mode: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_output_mode() {
        assert_eq!("chunk".parse::<OutputMode>(), Ok(OutputMode::Chunk));
        assert_eq!("CROP".parse::<OutputMode>(), Ok(OutputMode::Crop));
        assert!("split".parse::<OutputMode>().is_err());
    }

    #[test]
    fn test_display_round_trips() {
        for mode in [OutputMode::Chunk, OutputMode::Crop] {
            assert_eq!(mode.to_string().parse::<OutputMode>(), Ok(mode));
        }
    }
}
