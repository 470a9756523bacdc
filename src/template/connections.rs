//! Connection counts of a WAN optimizer

use crate::graph::{ConsolidationFn, Directive, GraphOptions, GraphSpec, Legend};

use super::{require_source, GraphTemplate, TemplateContext, TemplateError};

const NAME: &str = "check_mk-steelhead_connections";

/// Variable names of the five inputs, in data source order:
/// active, established, half-opened, half-closed, passthrough
const INPUTS: [&str; 5] = ["active", "est", "open", "close", "pass"];

/// Optimized connections, stacked from the baseline:
/// (variable, legend, colour role, GPRINT format)
const OPTIMIZED: [(&str, &str, &str, &str); 4] = [
    ("active", "Active    ", "connections-active", "%3.0lf"),
    ("est", "Established", "connections-established", "%3.0lf"),
    ("open", "Half opened", "connections-half-opened", "%2.0lf"),
    ("close", "Half closed", "connections-half-closed", "%2.0lf\\n"),
];

/// Stacked areas of optimized connections, the optimized and overall
/// totals as lines, and passthrough connections stacked on top.
#[derive(Debug, Default, Clone, Copy)]
pub struct SteelheadConnections;

impl GraphTemplate for SteelheadConnections {
    fn name(&self) -> &'static str {
        NAME
    }

    fn aliases(&self) -> &'static [&'static str] {
        &["steelhead_connections", "connections"]
    }

    fn description(&self) -> &'static str {
        "Current connections (active, established, half opened/closed, passthrough)"
    }

    fn build(&self, ctx: &TemplateContext) -> Result<GraphSpec, TemplateError> {
        let palette = &ctx.palette;
        let options = GraphOptions::new()
            .with_vertical_label("Connections")
            .with_lower_limit(0.0)
            .with_title(format!("Current connections on {}", ctx.hostname));
        let mut spec = GraphSpec::new(options);

        for (index, vname) in INPUTS.iter().enumerate() {
            let binding = require_source(ctx, NAME, index + 1)?;
            spec.push(Directive::def(
                *vname,
                binding.source.clone(),
                ConsolidationFn::Max,
            ));
        }

        spec.push(Directive::cdef("opt", "active,est,open,close,+,+,+".parse()?))
            .push(Directive::cdef("total", "opt,pass,+".parse()?));

        for (i, (vname, legend, role, format)) in OPTIMIZED.iter().enumerate() {
            let area = Directive::area(*vname, palette.color(role), Legend::text(*legend));
            spec.push(if i == 0 { area } else { area.stacked() })
                .push(Directive::gprint(*vname, ConsolidationFn::Last, *format));
        }

        spec.push(Directive::line(
            "total",
            palette.color("connections-total"),
            Legend::text("Total     "),
        ))
        .push(Directive::gprint("total", ConsolidationFn::Last, "%3.0lf"))
        .push(Directive::line(
            "opt",
            palette.color("connections-optimized"),
            Legend::text("Optimized  "),
        ))
        .push(Directive::gprint("opt", ConsolidationFn::Last, "%3.0lf"))
        .push(
            Directive::area(
                "pass",
                palette.color("connections-passthrough"),
                Legend::text("Passthrough"),
            )
            .stacked(),
        )
        .push(Directive::gprint("pass", ConsolidationFn::Last, "%3.0lf\\n"));

        spec.validate()?;
        Ok(spec)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::DataSource;
    use crate::template::SourceBinding;

    fn context(sources: usize) -> TemplateContext {
        (1..=sources).fold(TemplateContext::new("sh01"), |ctx, i| {
            ctx.with_source(SourceBinding::new(
                format!("s{}", i),
                DataSource::new(format!("/perf/sh01/conn_{}.rrd", i), "1"),
            ))
        })
    }

    #[test]
    fn test_options() {
        let spec = SteelheadConnections.build(&context(5)).unwrap();
        assert_eq!(spec.options.vertical_label.as_deref(), Some("Connections"));
        assert_eq!(spec.options.lower_limit, Some(0.0));
        assert_eq!(spec.options.upper_limit, None);
        assert_eq!(
            spec.options.title.as_deref(),
            Some("Current connections on sh01")
        );
    }

    #[test]
    fn test_defs_read_max_of_each_source_in_order() {
        let spec = SteelheadConnections.build(&context(5)).unwrap();
        let defs: Vec<_> = spec
            .directives
            .iter()
            .filter_map(|d| match d {
                Directive::Def { vname, source, cf } => {
                    Some((vname.as_str(), source.rrd_file.as_str(), *cf))
                }
                _ => None,
            })
            .collect();
        assert_eq!(
            defs,
            vec![
                ("active", "/perf/sh01/conn_1.rrd", ConsolidationFn::Max),
                ("est", "/perf/sh01/conn_2.rrd", ConsolidationFn::Max),
                ("open", "/perf/sh01/conn_3.rrd", ConsolidationFn::Max),
                ("close", "/perf/sh01/conn_4.rrd", ConsolidationFn::Max),
                ("pass", "/perf/sh01/conn_5.rrd", ConsolidationFn::Max),
            ]
        );
    }

    #[test]
    fn test_directive_order() {
        let spec = SteelheadConnections.build(&context(5)).unwrap();
        let keywords: Vec<_> = spec.directives.iter().map(|d| d.keyword()).collect();
        assert_eq!(
            keywords,
            vec![
                "DEF", "DEF", "DEF", "DEF", "DEF", "CDEF", "CDEF", "AREA", "GPRINT", "AREA",
                "GPRINT", "AREA", "GPRINT", "AREA", "GPRINT", "LINE", "GPRINT", "LINE",
                "GPRINT", "AREA", "GPRINT",
            ]
        );
    }

    #[test]
    fn test_only_first_area_starts_from_baseline() {
        let spec = SteelheadConnections.build(&context(5)).unwrap();
        let stacking: Vec<_> = spec
            .directives
            .iter()
            .filter_map(|d| match d {
                Directive::Area { vname, stack, .. } => Some((vname.as_str(), *stack)),
                _ => None,
            })
            .collect();
        assert_eq!(
            stacking,
            vec![
                ("active", false),
                ("est", true),
                ("open", true),
                ("close", true),
                ("pass", true),
            ]
        );
    }

    #[test]
    fn test_missing_source() {
        let err = SteelheadConnections.build(&context(4)).unwrap_err();
        assert!(matches!(
            err,
            TemplateError::MissingSource {
                index: 5,
                available: 4,
                ..
            }
        ));
    }
}
