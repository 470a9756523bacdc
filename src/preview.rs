//! Dry-run of a graph definition
//!
//! Evaluates every `CDEF` over sample series and prints the `GPRINT`
//! values the way rrdtool would show them in the legend, without touching
//! any RRD file.
//!
//! ```rust
//! use std::collections::HashMap;
//! use rrd_graph_templates::graph::{ConsolidationFn, DataSource, Directive, GraphSpec};
//! use rrd_graph_templates::preview;
//!
//! let mut spec = GraphSpec::default();
//! spec.push(Directive::def("a", DataSource::new("a.rrd", "1"), ConsolidationFn::Max))
//!     .push(Directive::cdef("b", "a,2,*".parse().unwrap()))
//!     .push(Directive::gprint("b", ConsolidationFn::Max, "%.1lf"));
//!
//! let samples = HashMap::from([("a".to_string(), vec![1.0, 3.0])]);
//! let lines = preview::preview(&spec, &samples).unwrap();
//! assert_eq!(lines[0].text, "6.0");
//! ```

use std::collections::HashMap;

use thiserror::Error;

use crate::graph::{ConsolidationFn, Directive, GraphSpec, Legend};
use crate::rpn::EvalError;
use crate::template::TemplateContext;

/// Series per variable name, one value per time step; NaN is unknown
pub type Series = HashMap<String, Vec<f64>>;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum PreviewError {
    #[error("no samples for DEF '{vname}'")]
    MissingSamples { vname: String },

    #[error("samples for '{vname}' have {found} steps, expected {expected}")]
    LengthMismatch {
        vname: String,
        expected: usize,
        found: usize,
    },

    #[error("cannot evaluate CDEF '{vname}' at step {step}: {source}")]
    Eval {
        vname: String,
        step: usize,
        #[source]
        source: EvalError,
    },

    #[error("GPRINT uses undefined variable '{vname}'")]
    Undefined { vname: String },
}

/// One printed value
#[derive(Debug, Clone, PartialEq)]
pub struct PreviewLine {
    pub vname: String,
    pub cf: ConsolidationFn,
    pub value: f64,
    /// Formatted text with line-break markers removed
    pub text: String,
}

/// Compute every variable of `spec` from the DEF samples
pub fn evaluate(spec: &GraphSpec, samples: &Series) -> Result<Series, PreviewError> {
    let mut series = Series::new();
    let mut steps: Option<usize> = None;

    for directive in &spec.directives {
        match directive {
            Directive::Def { vname, .. } => {
                let values = samples.get(vname).ok_or_else(|| PreviewError::MissingSamples {
                    vname: vname.clone(),
                })?;
                let expected = *steps.get_or_insert(values.len());
                if values.len() != expected {
                    return Err(PreviewError::LengthMismatch {
                        vname: vname.clone(),
                        expected,
                        found: values.len(),
                    });
                }
                series.insert(vname.clone(), values.clone());
            }
            Directive::Cdef { vname, expr } => {
                let values = (0..steps.unwrap_or(0))
                    .map(|step| {
                        expr.eval(|name| series.get(name).and_then(|s| s.get(step)).copied())
                            .map_err(|source| PreviewError::Eval {
                                vname: vname.clone(),
                                step,
                                source,
                            })
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                series.insert(vname.clone(), values);
            }
            _ => {}
        }
    }

    tracing::trace!(variables = series.len(), steps = ?steps, "evaluated graph variables");
    Ok(series)
}

/// Evaluate `spec` and format each GPRINT
pub fn preview(spec: &GraphSpec, samples: &Series) -> Result<Vec<PreviewLine>, PreviewError> {
    let series = evaluate(spec, samples)?;
    spec.directives
        .iter()
        .filter_map(|d| match d {
            Directive::GPrint { vname, cf, format } => Some((vname, *cf, format)),
            _ => None,
        })
        .map(|(vname, cf, format)| {
            let values = series.get(vname).ok_or_else(|| PreviewError::Undefined {
                vname: vname.clone(),
            })?;
            let value = consolidate(cf, values);
            Ok(PreviewLine {
                vname: vname.clone(),
                cf,
                value,
                text: strip_markers(&format_value(format, value)).to_string(),
            })
        })
        .collect()
}

/// The legend block as rrdtool would lay it out, as plain text
///
/// Legends and GPRINT values are separated by spaces; a trailing `\n`
/// marker starts a new line.
pub fn legend(spec: &GraphSpec, samples: &Series) -> Result<String, PreviewError> {
    let mut printed = preview(spec, samples)?.into_iter();
    let mut out = String::new();

    for directive in &spec.directives {
        let item = match directive {
            Directive::Area { legend, .. }
            | Directive::Line { legend, .. }
            | Directive::HRule { legend, .. } => match legend {
                Legend::Text(text) if !strip_markers(text).trim().is_empty() => text.clone(),
                _ => continue,
            },
            Directive::GPrint { format, .. } => match printed.next() {
                Some(line) => {
                    let marker = &format[strip_markers(format).len()..];
                    format!("{}{}", line.text, marker)
                }
                None => continue,
            },
            Directive::Def { .. } | Directive::Cdef { .. } => continue,
        };

        let text = strip_markers(&item);
        if !out.is_empty() && !out.ends_with('\n') {
            out.push(' ');
        }
        out.push_str(text.trim_end());
        if item.ends_with("\\n") {
            out.push('\n');
        }
    }

    Ok(out.trim_end().to_string())
}

/// Single-step samples from the current values of a context
///
/// Each DEF gets the current value of the source it reads; sources
/// without a current value are unknown.
pub fn samples_from_context(spec: &GraphSpec, ctx: &TemplateContext) -> Series {
    spec.directives
        .iter()
        .filter_map(|d| match d {
            Directive::Def { vname, source, .. } => {
                let current = ctx
                    .sources
                    .iter()
                    .find(|b| &b.source == source)
                    .and_then(|b| b.current)
                    .unwrap_or(f64::NAN);
                Some((vname.clone(), vec![current]))
            }
            _ => None,
        })
        .collect()
}

/// Reduce a series to one value, skipping unknown steps
pub fn consolidate(cf: ConsolidationFn, values: &[f64]) -> f64 {
    let known = values.iter().copied().filter(|v| !v.is_nan());
    match cf {
        ConsolidationFn::Last => values
            .iter()
            .rev()
            .copied()
            .find(|v| !v.is_nan())
            .unwrap_or(f64::NAN),
        ConsolidationFn::Max => known.reduce(f64::max).unwrap_or(f64::NAN),
        ConsolidationFn::Min => known.reduce(f64::min).unwrap_or(f64::NAN),
        ConsolidationFn::Average => {
            let (sum, count) = known.fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
            if count == 0 {
                f64::NAN
            } else {
                sum / count as f64
            }
        }
    }
}

/// Text without a trailing `\n`, `\l`, `\r`, `\c`, `\j`, `\g` or `\s` marker
fn strip_markers(text: &str) -> &str {
    const MARKERS: [&str; 7] = ["\\n", "\\l", "\\r", "\\c", "\\j", "\\g", "\\s"];
    MARKERS
        .iter()
        .find_map(|m| text.strip_suffix(m))
        .unwrap_or(text)
}

/// Format `value` with a printf-style GPRINT format
///
/// Supports `%[flags][width][.precision][l](f|e|g)` and `%%`. `%s` (unit
/// scaling) prints nothing. Unknown values print as `nan`.
pub fn format_value(format: &str, value: f64) -> String {
    let mut out = String::new();
    let mut chars = format.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '%' {
            out.push(c);
            continue;
        }

        let mut spec = Conversion::default();
        while let Some(&flag) = chars.peek() {
            match flag {
                '-' => spec.left = true,
                '+' => spec.plus = true,
                ' ' => spec.space = true,
                '0' => spec.zero = true,
                _ => break,
            }
            chars.next();
        }
        spec.width = take_digits(&mut chars).unwrap_or(0);
        if chars.peek() == Some(&'.') {
            chars.next();
            spec.precision = Some(take_digits(&mut chars).unwrap_or(0));
        }
        if chars.peek() == Some(&'l') {
            chars.next();
        }

        match chars.next() {
            Some('%') => out.push('%'),
            Some('s') | Some('S') => {}
            Some(kind @ ('f' | 'e' | 'g' | 'F' | 'E' | 'G')) => {
                out.push_str(&spec.apply(kind, value));
            }
            Some(other) => {
                out.push('%');
                out.push(other);
            }
            None => out.push('%'),
        }
    }
    out
}

#[derive(Debug, Default)]
struct Conversion {
    left: bool,
    plus: bool,
    space: bool,
    zero: bool,
    width: usize,
    precision: Option<usize>,
}

impl Conversion {
    fn apply(&self, kind: char, value: f64) -> String {
        let precision = self.precision.unwrap_or(6);
        let body = if value.is_nan() {
            "nan".to_string()
        } else if value.is_infinite() {
            "inf".to_string()
        } else {
            match kind.to_ascii_lowercase() {
                'f' => format!("{:.*}", precision, value.abs()),
                'e' => exponential(value.abs(), precision),
                _ => general(value.abs(), precision),
            }
        };
        let body = if kind.is_ascii_uppercase() {
            body.to_uppercase()
        } else {
            body
        };

        let sign = if value.is_sign_negative() && !value.is_nan() && value != 0.0 {
            "-"
        } else if self.plus {
            "+"
        } else if self.space {
            " "
        } else {
            ""
        };

        let len = sign.len() + body.len();
        if len >= self.width {
            return format!("{}{}", sign, body);
        }
        let pad = self.width - len;
        if self.left {
            format!("{}{}{}", sign, body, " ".repeat(pad))
        } else if self.zero && value.is_finite() {
            format!("{}{}{}", sign, "0".repeat(pad), body)
        } else {
            format!("{}{}{}", " ".repeat(pad), sign, body)
        }
    }
}

fn take_digits(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) -> Option<usize> {
    let mut digits = String::new();
    while let Some(&c) = chars.peek() {
        if !c.is_ascii_digit() {
            break;
        }
        digits.push(c);
        chars.next();
    }
    digits.parse().ok()
}

/// `%e` of a non-negative number: mantissa, `e`, sign, two-digit exponent
fn exponential(value: f64, precision: usize) -> String {
    let formatted = format!("{:.*e}", precision, value);
    match formatted.split_once('e') {
        Some((mantissa, exp)) => {
            let exp: i32 = exp.parse().unwrap_or(0);
            let sign = if exp < 0 { '-' } else { '+' };
            format!("{}e{}{:02}", mantissa, sign, exp.abs())
        }
        None => formatted,
    }
}

/// `%g` of a non-negative number
fn general(value: f64, precision: usize) -> String {
    let precision = precision.max(1);
    let exponent = if value == 0.0 {
        0
    } else {
        format!("{:.*e}", precision - 1, value)
            .split_once('e')
            .and_then(|(_, exp)| exp.parse::<i32>().ok())
            .unwrap_or(0)
    };

    if exponent < -4 || exponent >= precision as i32 {
        let formatted = exponential(value, precision - 1);
        match formatted.split_once('e') {
            Some((mantissa, exp)) => format!("{}e{}", trim_fraction(mantissa), exp),
            None => formatted,
        }
    } else {
        let decimals = (precision as i32 - 1 - exponent).max(0) as usize;
        trim_fraction(&format!("{:.*}", decimals, value)).to_string()
    }
}

fn trim_fraction(number: &str) -> &str {
    if number.contains('.') {
        number.trim_end_matches('0').trim_end_matches('.')
    } else {
        number
    }
}
