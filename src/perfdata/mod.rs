//! Plugin performance data
//!
//! Monitoring plugins report metrics as whitespace-separated entries of
//! the form `label=value[unit];[warn];[crit];[min];[max]`. The warning and
//! critical fields are threshold ranges (`10`, `10:20`, `~:5`, `@10:20`).
//!
//! ```rust
//! use rrd_graph_templates::perfdata;
//!
//! let values = perfdata::parse("offset=0.3s;5;10;;").unwrap();
//! assert_eq!(values[0].label, "offset");
//! assert_eq!(values[0].warn.and_then(|r| r.bound()), Some(5.0));
//! ```

mod grammar;
pub mod lexer;

pub use grammar::parse;

/// A threshold range `[@][start:][end]`
///
/// An omitted start is 0, `~` is negative infinity and an omitted end is
/// positive infinity. `inside` is set by the `@` prefix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThresholdRange {
    pub start: f64,
    pub end: f64,
    pub inside: bool,
}

impl ThresholdRange {
    /// Single value standing in for the range on a graph
    ///
    /// This is the finite end of the range, or its start when the end is
    /// unbounded. A range open at both ends (`~:`) has none.
    pub fn bound(&self) -> Option<f64> {
        [self.end, self.start].into_iter().find(|v| v.is_finite())
    }
}

/// One perfdata entry
#[derive(Debug, Clone, PartialEq)]
pub struct PerfValue {
    pub label: String,
    /// `None` for the unknown value `U`
    pub value: Option<f64>,
    pub unit: Option<String>,
    pub warn: Option<ThresholdRange>,
    pub crit: Option<ThresholdRange>,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl PerfValue {
    /// Warning threshold as a single value
    pub fn warning(&self) -> Option<f64> {
        self.warn.and_then(|r| r.bound())
    }

    /// Critical threshold as a single value
    pub fn critical(&self) -> Option<f64> {
        self.crit.and_then(|r| r.bound())
    }
}

/// Performance data part of a plugin output line
///
/// Plugins separate their text from perfdata with `|`; input without a
/// separator is taken to be perfdata only.
pub fn split_output(output: &str) -> &str {
    match output.split_once('|') {
        Some((_, perf)) => perf.trim(),
        None => output.trim(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bound_prefers_finite_end() {
        let plain = ThresholdRange {
            start: 0.0,
            end: 5.0,
            inside: false,
        };
        assert_eq!(plain.bound(), Some(5.0));

        let open_end = ThresholdRange {
            start: 10.0,
            end: f64::INFINITY,
            inside: false,
        };
        assert_eq!(open_end.bound(), Some(10.0));
    }

    #[test]
    fn test_unbounded_range_has_no_bound() {
        let values = parse("offset=0.3s;~:;~:;;").unwrap();
        let warn = values[0].warn.unwrap();
        assert_eq!(warn.start, f64::NEG_INFINITY);
        assert_eq!(warn.end, f64::INFINITY);
        assert_eq!(warn.bound(), None);
        assert_eq!(values[0].warning(), None);
        assert_eq!(values[0].critical(), None);

        let values = parse("offset=0.3s;~:5;10:").unwrap();
        assert_eq!(values[0].warning(), Some(5.0));
        assert_eq!(values[0].critical(), Some(10.0));
    }

    #[test]
    fn test_warning_and_critical() {
        let values = parse("offset=1s;5;10").unwrap();
        assert_eq!(values[0].warning(), Some(5.0));
        assert_eq!(values[0].critical(), Some(10.0));

        let values = parse("active=20;;;;").unwrap();
        assert_eq!(values[0].warning(), None);
        assert_eq!(values[0].critical(), None);
    }

    #[test]
    fn test_split_output() {
        assert_eq!(
            split_output("OK - offset is 0.3 s | offset=0.3s;5;10"),
            "offset=0.3s;5;10"
        );
        assert_eq!(split_output(" offset=0.3s;5;10 "), "offset=0.3s;5;10");
    }
}
