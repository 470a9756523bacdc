//! rrdtool argument vectors

use crate::graph::GraphSpec;

use super::{directive_text, format_number, pnp::single_quote, LegendStyle};

/// Arguments for `rrdtool graph`
///
/// With an output path the vector starts with `graph <path>` and can be
/// passed to rrdtool as is; without one it holds options and directives
/// only. Fields are not shell-quoted.
pub fn render_argv(spec: &GraphSpec, output_path: Option<&str>) -> Vec<String> {
    let mut args = Vec::new();
    if let Some(path) = output_path {
        args.push("graph".to_string());
        args.push(path.to_string());
    }

    let options = &spec.options;
    if let Some(label) = &options.vertical_label {
        args.push("--vertical-label".to_string());
        args.push(label.clone());
    }
    if let Some(lower) = options.lower_limit {
        args.push("-l".to_string());
        args.push(format_number(lower));
    }
    if let Some(upper) = options.upper_limit {
        args.push("-u".to_string());
        args.push(format_number(upper));
    }
    if let Some(title) = &options.title {
        args.push("--title".to_string());
        args.push(title.clone());
    }

    args.extend(
        spec.directives
            .iter()
            .map(|d| directive_text(d, LegendStyle::Bare)),
    );
    args
}

/// Join arguments into one shell command line, quoting where needed
pub fn shell_join(args: &[String]) -> String {
    args.iter()
        .map(|arg| {
            let plain = !arg.is_empty()
                && arg
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || "-_.,/:#=+%@".contains(c));
            if plain {
                arg.clone()
            } else {
                single_quote(arg)
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
