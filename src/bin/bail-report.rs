use bail_error_rs::{
    BailErrorHandler, ErrorHandler, FileErrorHandler, Severity, TracingErrorHandler,
};
use clap::Parser;
use std::io::{self, BufRead};
use tracing_subscriber::EnvFilter;

/// Reports diagnostics and exits with status 1 at the first error or fatal one.
/// For example: bail-report -s warning "deprecated option"
#[derive(Parser)]
#[command(version, long_about = None)]
struct Cli {
    /// Severity of each report: debug, message, warning, error or fatal
    #[arg(short, long, default_value_t = Severity::Message)]
    severity: Severity,
    /// Prepended to every plain-text line, such as "router: ". With --tracing
    /// it becomes the events' context field
    #[arg(short, long, default_value = "")]
    prefix: String,
    /// Emit reports as tracing events (filtered by RUST_LOG) instead of plain text
    #[arg(long)]
    tracing: bool,
    /// Messages to report in order. Without any, each stdin line is reported,
    /// and a line like "warning: text" picks its own severity
    text: Vec<String>,
}

/// Splits a leading "<severity>:" off `line`, falling back to `default`.
fn parse_line(line: &str, default: Severity) -> (Severity, &str) {
    if let Some((head, rest)) = line.split_once(':') {
        if let Ok(severity) = head.parse::<Severity>() {
            return (severity, rest.strip_prefix(' ').unwrap_or(rest));
        }
    }
    (default, line)
}

/// Reports each line of `input`. Bytes that aren't UTF-8 are replaced rather
/// than dropped, and a read failure is itself reported as an error.
fn report_lines<H: ErrorHandler + ?Sized, B: BufRead>(errh: &H, mut input: B, default: Severity) {
    let mut buf = Vec::new();
    loop {
        buf.clear();
        match input.read_until(b'\n', &mut buf) {
            Ok(0) => return,
            Ok(_) => {}
            Err(err) => return errh.error(&format!("couldn't read input: {err}")),
        }

        let line = String::from_utf8_lossy(&buf);
        let line = line.strip_suffix('\n').unwrap_or(&line);
        let line = line.strip_suffix('\r').unwrap_or(line);
        let (severity, text) = parse_line(line, default);
        errh.handle_text(severity, text);
    }
}

fn main() {
    let opts = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .with_target(false)
        .init();

    let inner: Box<dyn ErrorHandler> = if opts.tracing {
        Box::new(TracingErrorHandler::new(opts.prefix))
    } else {
        Box::new(FileErrorHandler::with_context(io::stderr(), opts.prefix))
    };
    let errh = BailErrorHandler::new(inner.as_ref());

    if opts.text.is_empty() {
        report_lines(&errh, io::stdin().lock(), opts.severity);
    } else {
        for text in &opts.text {
            errh.handle_text(opts.severity, text);
        }
    }
}
