//! rrd-graph-templates CLI
//!
//! Usage:
//!   rrd-graph-templates [OPTIONS]
//!
//! Options:
//!   -t, --template <NAME>   Template name or alias
//!   -H, --host <HOST>       Host name
//!   -s, --service <NAME>    Service description
//!   -p, --perfdata <DATA>   Perfdata sample (reads stdin if not provided)
//!   -r, --request <FILE>    Graph request file (TOML format)
//!   --palette <FILE>        Colour palette file (TOML format)
//!   -f, --format <FORMAT>   Output format: pnp, argv or lines
//!   --preview               Print the legend values of the sample
//!   -l, --list              List available templates
//!   -h, --help              Print help

use std::io::{self, IsTerminal, Read};
use std::path::PathBuf;
use std::process;

use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use rrd_graph_templates::preview;
use rrd_graph_templates::renderer;
use rrd_graph_templates::template::RrdLayout;
use rrd_graph_templates::{
    GraphRequest, OutputConfig, OutputFormat, Palette, RequestError, TemplateRegistry,
};

#[derive(Parser)]
#[command(name = "rrd-graph-templates")]
#[command(about = "rrdtool graph definitions for monitoring checks")]
struct Cli {
    /// Template name or alias
    #[arg(short, long)]
    template: Option<String>,

    /// Host name
    #[arg(short = 'H', long)]
    host: Option<String>,

    /// Service description (host perfdata if not provided)
    #[arg(short, long)]
    service: Option<String>,

    /// Perfdata sample, optionally with plugin output before '|'
    #[arg(short, long)]
    perfdata: Option<String>,

    /// Directory holding the per-host RRD directories
    #[arg(long)]
    rrd_dir: Option<PathBuf>,

    /// RRD storage layout
    #[arg(long, value_enum)]
    layout: Option<LayoutArg>,

    /// Graph request file (TOML format)
    #[arg(short, long)]
    request: Option<PathBuf>,

    /// Colour palette file (TOML format)
    #[arg(long)]
    palette: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = FormatArg::Pnp)]
    format: FormatArg,

    /// Image path; argv output becomes a complete `graph` command
    #[arg(short, long)]
    output: Option<String>,

    /// Print the legend values of the perfdata sample
    #[arg(long)]
    preview: bool,

    /// List available templates
    #[arg(short, long)]
    list: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum LayoutArg {
    Multiple,
    Single,
}

impl From<LayoutArg> for RrdLayout {
    fn from(arg: LayoutArg) -> Self {
        match arg {
            LayoutArg::Multiple => RrdLayout::Multiple,
            LayoutArg::Single => RrdLayout::Single,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum FormatArg {
    Pnp,
    Argv,
    Lines,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Pnp => OutputFormat::Pnp,
            FormatArg::Argv => OutputFormat::Argv,
            FormatArg::Lines => OutputFormat::Lines,
        }
    }
}

fn init_logging() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("rrd_graph_templates=warn"));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .finish();

    if let Err(error) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("logger initialization failed: {}", error);
    }
}

fn fail(message: impl std::fmt::Display) -> ! {
    eprintln!("Error: {}", message);
    process::exit(1);
}

fn main() {
    init_logging();
    let cli = Cli::parse();
    let registry = TemplateRegistry::builtin();

    if cli.list {
        for template in registry.templates() {
            let aliases = template.aliases();
            if aliases.is_empty() {
                println!("{}  {}", template.name(), template.description());
            } else {
                println!(
                    "{} ({})  {}",
                    template.name(),
                    aliases.join(", "),
                    template.description()
                );
            }
        }
        return;
    }

    let palette = match &cli.palette {
        Some(path) => Palette::from_file(path).unwrap_or_else(|e| {
            fail(format_args!("loading palette '{}': {}", path.display(), e))
        }),
        None => Palette::default(),
    };

    let request = build_request(&cli);
    tracing::debug!(template = %request.template, host = %request.host, "graph request");

    let ctx = match request.to_context(palette) {
        Ok(ctx) => ctx,
        Err(RequestError::Perfdata { input, source }) => {
            eprint!("{}", source.format(&input, "perfdata"));
            process::exit(1);
        }
        Err(e) => fail(e),
    };

    let spec = registry
        .build(&request.template, &ctx)
        .unwrap_or_else(|e| fail(e));

    let mut output = OutputConfig::new().with_format(cli.format.into());
    if let Some(path) = &cli.output {
        output = output.with_output_path(path.clone());
    }
    println!("{}", renderer::render(&spec, &output).trim_end());

    if cli.preview {
        let samples = preview::samples_from_context(&spec, &ctx);
        match preview::legend(&spec, &samples) {
            Ok(legend) => {
                println!();
                println!("{}", legend);
            }
            Err(e) => fail(e),
        }
    }
}

/// Request from `--request` with command-line flags taking precedence
fn build_request(cli: &Cli) -> GraphRequest {
    let mut request = match &cli.request {
        Some(path) => GraphRequest::from_file(path).unwrap_or_else(|e| {
            fail(format_args!("loading request '{}': {}", path.display(), e))
        }),
        None => {
            let template = cli
                .template
                .clone()
                .unwrap_or_else(|| fail("no template given (use --template or --request)"));
            let host = cli
                .host
                .clone()
                .unwrap_or_else(|| fail("no host given (use --host or --request)"));
            GraphRequest::new(template, host)
        }
    };

    if let Some(template) = &cli.template {
        request.template = template.clone();
    }
    if let Some(host) = &cli.host {
        request.host = host.clone();
    }
    if let Some(service) = &cli.service {
        request.service = Some(service.clone());
    }
    if let Some(dir) = &cli.rrd_dir {
        request.rrd_dir = dir.clone();
    }
    if let Some(layout) = cli.layout {
        request.layout = layout.into();
    }

    if let Some(perfdata) = &cli.perfdata {
        request.set_perfdata(perfdata.clone());
    } else if request.perfdata.is_none()
        && request.sources.is_empty()
        && !io::stdin().is_terminal()
    {
        let mut buffer = String::new();
        if let Err(e) = io::stdin().read_to_string(&mut buffer) {
            fail(format_args!("reading from stdin: {}", e));
        }
        request.perfdata = Some(buffer);
    }

    request
}
