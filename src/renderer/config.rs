//! Configuration for graph output

use std::fmt;
use std::str::FromStr;

/// Text encoding of a rendered graph
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// `$opt` and `$def` strings as a PNP template sets them
    #[default]
    Pnp,
    /// Shell-quoted rrdtool `graph` arguments
    Argv,
    /// One directive per line
    Lines,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pnp" => Ok(OutputFormat::Pnp),
            "argv" => Ok(OutputFormat::Argv),
            "lines" => Ok(OutputFormat::Lines),
            other => Err(format!("unknown output format '{}'", other)),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            OutputFormat::Pnp => "pnp",
            OutputFormat::Argv => "argv",
            OutputFormat::Lines => "lines",
        })
    }
}

/// Configuration options for graph output
#[derive(Debug, Clone, Default)]
pub struct OutputConfig {
    pub format: OutputFormat,

    /// Image path; argv output starts with `graph <path>` when set
    pub output_path: Option<String>,
}

impl OutputConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the output format
    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    /// Set the image path
    pub fn with_output_path(mut self, path: impl Into<String>) -> Self {
        self.output_path = Some(path.into());
        self
    }
}
