//! Offset of a host's clock against the monitoring server

use crate::graph::{ConsolidationFn, Directive, GraphOptions, GraphSpec, Legend};

use super::{require_source, GraphTemplate, TemplateContext, TemplateError, ThresholdKind};

const NAME: &str = "check_mk-systemtime";

/// Time offset drawn symmetrically around zero, with the warning and
/// critical levels as reference lines on both sides.
///
/// The vertical axis spans `-critical..critical`. Thresholds of zero or
/// below are passed through as they are; the resulting axis and rules are
/// whatever rrdtool makes of them.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemTimeOffset;

impl GraphTemplate for SystemTimeOffset {
    fn name(&self) -> &'static str {
        NAME
    }

    fn aliases(&self) -> &'static [&'static str] {
        &["systemtime"]
    }

    fn description(&self) -> &'static str {
        "System time offset with warning and critical levels"
    }

    fn build(&self, ctx: &TemplateContext) -> Result<GraphSpec, TemplateError> {
        let binding = require_source(ctx, NAME, 1)?;
        let warn = binding
            .thresholds
            .warning
            .ok_or(TemplateError::MissingThreshold {
                template: NAME,
                kind: ThresholdKind::Warning,
                index: 1,
            })?;
        let crit = binding
            .thresholds
            .critical
            .ok_or(TemplateError::MissingThreshold {
                template: NAME,
                kind: ThresholdKind::Critical,
                index: 1,
            })?;

        let palette = &ctx.palette;
        let area = palette.color("systemtime-offset-area");
        let outline = palette.color("systemtime-offset-line");
        let warning = palette.color("systemtime-warning");
        let critical = palette.color("systemtime-critical");

        let options = GraphOptions::new()
            .with_vertical_label("offset (s)")
            .with_lower_limit(negate(crit))
            .with_upper_limit(crit)
            .with_title(format!("{}: system time offset to Nagios", ctx.hostname));
        let mut spec = GraphSpec::new(options);

        let source = &binding.source;
        spec.push(Directive::def("offset_max", source.clone(), ConsolidationFn::Max))
            .push(Directive::def("offset_min", source.clone(), ConsolidationFn::Min))
            .push(Directive::def("offset_avg", source.clone(), ConsolidationFn::Average));

        // clamp toward zero; offsetabs takes the raw extremes, the ABS
        // series are defined but not drawn
        spec.push(Directive::cdef("offmax", "offset_max,0,MAX".parse()?))
            .push(Directive::cdef("offmin", "offset_min,0,MIN".parse()?))
            .push(Directive::cdef("offsetabs_min", "offset_min,ABS".parse()?))
            .push(Directive::cdef("offsetabs_max", "offset_max,ABS".parse()?))
            .push(Directive::cdef("offsetabs", "offset_min,offset_max,MAX".parse()?));

        spec.push(Directive::area("offmax", area.clone(), Legend::text("time offset ")))
            .push(Directive::area("offmin", area, Legend::Omitted))
            .push(Directive::line_width(1.0, "offmin", outline.clone(), Legend::Blank))
            .push(Directive::line_width(1.0, "offmax", outline, Legend::Blank));

        spec.push(Directive::hrule(
            0.0,
            palette.color("systemtime-zero"),
            Legend::Blank,
        ))
        .push(Directive::hrule(warn, warning.clone(), Legend::text("")))
        .push(Directive::hrule(
            negate(warn),
            warning,
            Legend::text(format!("Warning: +/- {} s ", warn)),
        ))
        .push(Directive::hrule(crit, critical.clone(), Legend::text("")))
        .push(Directive::hrule(
            negate(crit),
            critical,
            Legend::text(format!("Critical: +/- {} s \\n", crit)),
        ));

        spec.push(Directive::gprint(
            "offset_avg",
            ConsolidationFn::Last,
            "current: %.1lf s",
        ))
        .push(Directive::gprint(
            "offsetabs",
            ConsolidationFn::Max,
            "max(+/-): %.1lf s ",
        ))
        .push(Directive::gprint(
            "offsetabs",
            ConsolidationFn::Average,
            "avg(+/-): %.1lf s",
        ));

        spec.validate()?;
        Ok(spec)
    }
}

/// Negate without producing `-0`
fn negate(value: f64) -> f64 {
    if value == 0.0 {
        0.0
    } else {
        -value
    }
}
