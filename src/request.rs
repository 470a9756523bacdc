//! Graph request files
//!
//! A request names the template to use and where its data comes from,
//! either as a perfdata sample mapped onto the RRD storage layout or as an
//! explicit list of sources:
//!
//! ```toml
//! template = "check_mk-systemtime"
//! host = "web01"
//! service = "System Time"
//! perfdata = "offset=0.3s;5;10;;"
//! rrd_dir = "/var/lib/pnp4nagios/perfdata"
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::error::ParseError;
use crate::graph::DataSource;
use crate::palette::Palette;
use crate::perfdata;
use crate::template::{RrdLayout, SourceBinding, TemplateContext, Thresholds};

/// Errors that can occur when loading a request
#[derive(Error, Debug)]
pub enum RequestError {
    #[error("Failed to read request file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse request TOML: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Invalid perfdata: {source}")]
    Perfdata {
        /// Perfdata text the error spans point into
        input: String,
        #[source]
        source: ParseError,
    },
    #[error("Request for '{template}' has neither perfdata nor sources")]
    NoSources { template: String },
}

/// Which template to render for which host, and from what data
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GraphRequest {
    /// Template name or alias
    pub template: String,
    pub host: String,
    #[serde(default)]
    pub service: Option<String>,
    /// Perfdata sample, optionally with the plugin output before `|`
    #[serde(default)]
    pub perfdata: Option<String>,
    #[serde(default = "default_rrd_dir")]
    pub rrd_dir: PathBuf,
    #[serde(default)]
    pub layout: RrdLayout,
    /// Explicit sources, used instead of the perfdata mapping
    #[serde(default)]
    pub sources: Vec<SourceEntry>,
}

/// An explicitly configured data source
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SourceEntry {
    pub rrd_file: String,
    #[serde(default = "default_ds")]
    pub ds: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub warning: Option<f64>,
    #[serde(default)]
    pub critical: Option<f64>,
    #[serde(default)]
    pub current: Option<f64>,
}

fn default_rrd_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_ds() -> String {
    "1".to_string()
}

impl GraphRequest {
    pub fn new(template: impl Into<String>, host: impl Into<String>) -> Self {
        Self {
            template: template.into(),
            host: host.into(),
            service: None,
            perfdata: None,
            rrd_dir: default_rrd_dir(),
            layout: RrdLayout::default(),
            sources: Vec::new(),
        }
    }

    /// Load a request from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, RequestError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Load a request from a TOML string
    pub fn from_str(content: &str) -> Result<Self, RequestError> {
        Ok(toml::from_str(content)?)
    }

    /// Replace the request's data with a perfdata sample
    ///
    /// Explicit sources are dropped so the sample is what gets graphed.
    pub fn set_perfdata(&mut self, perfdata: impl Into<String>) {
        if !self.sources.is_empty() {
            tracing::debug!(
                template = %self.template,
                sources = self.sources.len(),
                "perfdata replaces explicit sources"
            );
            self.sources.clear();
        }
        self.perfdata = Some(perfdata.into());
    }

    /// Resolve the request's data into a template context
    pub fn to_context(&self, palette: Palette) -> Result<TemplateContext, RequestError> {
        let ctx = if !self.sources.is_empty() {
            if self.perfdata.is_some() {
                tracing::warn!(
                    template = %self.template,
                    "request has explicit sources, ignoring perfdata"
                );
            }
            let mut ctx = TemplateContext::new(&self.host);
            ctx.service = self.service.clone();
            self.sources
                .iter()
                .enumerate()
                .fold(ctx, |ctx, (i, entry)| ctx.with_source(entry.binding(i + 1)))
        } else if let Some(raw) = &self.perfdata {
            let input = perfdata::split_output(raw);
            let values = perfdata::parse(input).map_err(|source| RequestError::Perfdata {
                input: input.to_string(),
                source,
            })?;
            TemplateContext::from_perfdata(
                &self.host,
                self.service.clone(),
                &values,
                &self.rrd_dir,
                self.layout,
            )
        } else {
            return Err(RequestError::NoSources {
                template: self.template.clone(),
            });
        };

        Ok(ctx.with_palette(palette))
    }
}

impl SourceEntry {
    fn binding(&self, position: usize) -> SourceBinding {
        let label = self
            .label
            .clone()
            .unwrap_or_else(|| format!("ds{}", position));
        let mut binding = SourceBinding::new(label, DataSource::new(&self.rrd_file, &self.ds))
            .with_thresholds(Thresholds {
                warning: self.warning,
                critical: self.critical,
            });
        binding.current = self.current;
        binding
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_perfdata_request() {
        let request = GraphRequest::from_str(
            r#"
            template = "systemtime"
            host = "web01"
            service = "System Time"
            perfdata = "OK - offset 0.3 s | offset=0.3s;5;10;;"
            rrd_dir = "/var/perf"
            "#,
        )
        .unwrap();
        assert_eq!(request.layout, RrdLayout::Multiple);

        let ctx = request.to_context(Palette::default()).unwrap();
        assert_eq!(ctx.service.as_deref(), Some("System Time"));
        let source = ctx.source(1).unwrap();
        assert_eq!(source.source.rrd_file, "/var/perf/web01/System_Time_offset.rrd");
        assert_eq!(source.thresholds, Thresholds::new(5.0, 10.0));
    }

    #[test]
    fn test_single_layout() {
        let request = GraphRequest::from_str(
            r#"
            template = "connections"
            host = "sh01"
            perfdata = "active=1 established=2"
            layout = "single"
            "#,
        )
        .unwrap();
        let ctx = request.to_context(Palette::default()).unwrap();
        assert_eq!(ctx.sources[1].source.rrd_file, "./sh01/_HOST_.rrd");
        assert_eq!(ctx.sources[1].source.ds, "2");
    }

    #[test]
    fn test_explicit_sources() {
        let request = GraphRequest::from_str(
            r#"
            template = "systemtime"
            host = "web01"

            [[sources]]
            rrd_file = "/data/offset.rrd"
            warning = 2.0
            critical = 4.0
            current = -1.5
            "#,
        )
        .unwrap();
        let ctx = request.to_context(Palette::default()).unwrap();
        let source = ctx.source(1).unwrap();
        assert_eq!(source.label, "ds1");
        assert_eq!(source.source, DataSource::new("/data/offset.rrd", "1"));
        assert_eq!(source.thresholds, Thresholds::new(2.0, 4.0));
        assert_eq!(source.current, Some(-1.5));
    }

    #[test]
    fn test_set_perfdata_replaces_sources() {
        let mut request = GraphRequest::from_str(
            r#"
            template = "systemtime"
            host = "web01"
            rrd_dir = "/var/perf"

            [[sources]]
            rrd_file = "/data/offset.rrd"
            warning = 2.0
            critical = 4.0
            "#,
        )
        .unwrap();
        request.set_perfdata("offset=0.3s;5;10;;");
        assert!(request.sources.is_empty());

        let ctx = request.to_context(Palette::default()).unwrap();
        let source = ctx.source(1).unwrap();
        assert_eq!(source.source.rrd_file, "/var/perf/web01/_HOST__offset.rrd");
        assert_eq!(source.thresholds, Thresholds::new(5.0, 10.0));
        assert_eq!(source.current, Some(0.3));
    }

    #[test]
    fn test_no_sources() {
        let request = GraphRequest::new("systemtime", "web01");
        assert!(matches!(
            request.to_context(Palette::default()),
            Err(RequestError::NoSources { .. })
        ));
    }

    #[test]
    fn test_bad_perfdata_keeps_input() {
        let mut request = GraphRequest::new("systemtime", "web01");
        request.perfdata = Some("offset=abc".to_string());
        match request.to_context(Palette::default()) {
            Err(RequestError::Perfdata { input, .. }) => assert_eq!(input, "offset=abc"),
            other => panic!("expected perfdata error, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_field_rejected() {
        let result = GraphRequest::from_str(
            r#"
            template = "systemtime"
            host = "web01"
            colour = "red"
            "#,
        );
        assert!(matches!(result, Err(RequestError::ParseError(_))));
    }
}
