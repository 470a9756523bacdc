//! Substitution variables handed to graph templates

use std::path::Path;

use serde::Deserialize;

use crate::graph::DataSource;
use crate::palette::Palette;
use crate::perfdata::PerfValue;

/// Service name used for host-level perfdata
pub const HOST_SERVICE: &str = "_HOST_";

/// Warning and critical bounds of one data source
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Thresholds {
    pub warning: Option<f64>,
    pub critical: Option<f64>,
}

impl Thresholds {
    pub fn new(warning: f64, critical: f64) -> Self {
        Self {
            warning: Some(warning),
            critical: Some(critical),
        }
    }
}

/// A data source as seen by a template
#[derive(Debug, Clone, PartialEq)]
pub struct SourceBinding {
    /// Perfdata label the source was created from
    pub label: String,
    pub source: DataSource,
    pub thresholds: Thresholds,
    /// Most recent value, when known
    pub current: Option<f64>,
}

impl SourceBinding {
    pub fn new(label: impl Into<String>, source: DataSource) -> Self {
        Self {
            label: label.into(),
            source,
            thresholds: Thresholds::default(),
            current: None,
        }
    }

    pub fn with_thresholds(mut self, thresholds: Thresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    pub fn with_current(mut self, value: f64) -> Self {
        self.current = Some(value);
        self
    }
}

/// How perfdata labels map onto RRD files
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RrdLayout {
    /// One file per label, `<dir>/<host>/<service>_<label>.rrd`, DS `1`
    #[default]
    Multiple,
    /// One file per service, `<dir>/<host>/<service>.rrd`, DS numbered by position
    Single,
}

/// Everything a template may interpolate
#[derive(Debug, Clone)]
pub struct TemplateContext {
    pub hostname: String,
    pub service: Option<String>,
    /// Data sources in perfdata order
    pub sources: Vec<SourceBinding>,
    pub palette: Palette,
}

impl TemplateContext {
    pub fn new(hostname: impl Into<String>) -> Self {
        Self {
            hostname: hostname.into(),
            service: None,
            sources: Vec::new(),
            palette: Palette::default(),
        }
    }

    pub fn with_service(mut self, service: impl Into<String>) -> Self {
        self.service = Some(service.into());
        self
    }

    pub fn with_palette(mut self, palette: Palette) -> Self {
        self.palette = palette;
        self
    }

    pub fn with_source(mut self, binding: SourceBinding) -> Self {
        self.sources.push(binding);
        self
    }

    /// Data source by 1-based position
    pub fn source(&self, index: usize) -> Option<&SourceBinding> {
        index.checked_sub(1).and_then(|i| self.sources.get(i))
    }

    /// Build a context from parsed perfdata and the RRD storage layout
    pub fn from_perfdata(
        hostname: impl Into<String>,
        service: Option<String>,
        values: &[PerfValue],
        rrd_dir: &Path,
        layout: RrdLayout,
    ) -> Self {
        let hostname = hostname.into();
        let service_part = sanitize(service.as_deref().unwrap_or(HOST_SERVICE));
        let host_dir = rrd_dir.join(sanitize(&hostname));

        let sources = values
            .iter()
            .enumerate()
            .map(|(i, value)| {
                let source = match layout {
                    RrdLayout::Multiple => {
                        let file = format!("{}_{}.rrd", service_part, sanitize(&value.label));
                        DataSource::new(host_dir.join(file).display().to_string(), "1")
                    }
                    RrdLayout::Single => {
                        let file = format!("{}.rrd", service_part);
                        DataSource::new(host_dir.join(file).display().to_string(), (i + 1).to_string())
                    }
                };
                SourceBinding {
                    label: value.label.clone(),
                    source,
                    thresholds: Thresholds {
                        warning: value.warning(),
                        critical: value.critical(),
                    },
                    current: value.value,
                }
            })
            .collect::<Vec<_>>();

        tracing::debug!(
            host = %hostname,
            sources = sources.len(),
            ?layout,
            "context built from perfdata"
        );

        Self {
            hostname,
            service,
            sources,
            palette: Palette::default(),
        }
    }
}

/// Make a name safe for use in a file name
///
/// Characters other than ASCII letters, digits, `-` and `.` become `_`.
pub fn sanitize(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '.' {
                c
            } else {
                '_'
            }
        })
        .collect()
}
