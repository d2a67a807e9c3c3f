//! rxdr CLI: inspect R serialization streams (`.rds`, `serialize()` output).

use clap::{Args, Parser, Subcommand};
use rxdr::value::{is_na_real, Element};
use rxdr::{DecodeOptions, Value};
use std::fmt::Write as _;
use std::io::{IsTerminal, Read, Write};
use std::process;

/// Maximal angezeigte Elemente pro Vektor im Textmodus.
const PREVIEW_ELEMENTS: usize = 8;

/// Stack fuer den Arbeits-Thread: Baum- und JSON-Ausgabe sind rekursiv.
const RENDER_STACK_SIZE: usize = 64 * 1024 * 1024;

#[derive(Parser)]
#[command(name = "rxdr", about = "Decode R XDR serialization streams")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Decode a stream and print the object graph
    Dump(DumpArgs),
    /// Print only the stream header
    Header(HeaderArgs),
}

#[derive(Args)]
struct DumpArgs {
    /// Input file (- for stdin)
    #[arg(short, long)]
    input: String,

    /// Output file (optional; default stdout)
    #[arg(short, long)]
    output: Option<String>,

    /// JSON output instead of the indented tree
    #[arg(long)]
    json: bool,

    /// Pretty-printed JSON output (2-space indent)
    #[arg(long, requires = "json")]
    pretty: bool,

    /// Maximum nesting depth
    #[arg(long, default_value_t = rxdr::options::DEFAULT_MAX_DEPTH)]
    max_depth: usize,

    /// Reject bytes after the root item
    #[arg(long)]
    strict: bool,

    /// Do not unpack a gzip envelope
    #[arg(long)]
    no_decompress: bool,
}

#[derive(Args)]
struct HeaderArgs {
    /// Input file (- for stdin)
    #[arg(short, long)]
    input: String,
}

fn read_input(path: &str) -> Result<Vec<u8>, String> {
    if path == "-" {
        if std::io::stdin().is_terminal() {
            eprintln!("Lese von stdin (Ctrl+D zum Beenden)...");
        }
        let mut buf = Vec::new();
        std::io::stdin()
            .read_to_end(&mut buf)
            .map_err(|e| format!("Lesefehler (stdin): {e}"))?;
        Ok(buf)
    } else {
        std::fs::read(path).map_err(|e| format!("Lesefehler '{}': {e}", path))
    }
}

fn write_output(path: Option<&str>, text: &str) -> Result<(), String> {
    match path {
        None | Some("-") => {
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(text.as_bytes())
                .and_then(|_| stdout.flush())
                .map_err(|e| format!("Schreibfehler (stdout): {e}"))
        }
        Some(p) => std::fs::write(p, text).map_err(|e| format!("Schreibfehler '{}': {e}", p)),
    }
}

fn main() {
    let cli = Cli::parse();

    let result = std::thread::Builder::new()
        .stack_size(RENDER_STACK_SIZE)
        .spawn(move || run(cli))
        .map_err(|e| format!("Thread-Start fehlgeschlagen: {e}"))
        .and_then(|handle| handle.join().unwrap_or_else(|_| Err("Abbruch im Arbeits-Thread".to_owned())));
    if let Err(e) = result {
        eprintln!("Fehler: {e}");
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), String> {
    match cli.command {
        Command::Dump(args) => run_dump(args),
        Command::Header(args) => run_header(args),
    }
}

fn run_dump(args: DumpArgs) -> Result<(), String> {
    let data = read_input(&args.input)?;
    let options = DecodeOptions::default()
        .with_max_depth(args.max_depth)
        .with_trailing_bytes(!args.strict)
        .with_decompress(!args.no_decompress);
    let value = rxdr::decode_with_options(&data, options)
        .map_err(|e| format!("Decode-Fehler: {e}"))?;

    let mut text = if args.json {
        let json = rxdr::json::to_json(&value);
        let rendered = if args.pretty {
            serde_json::to_string_pretty(&json)
        } else {
            serde_json::to_string(&json)
        };
        rendered.map_err(|e| format!("JSON-Fehler: {e}"))?
    } else {
        let mut out = String::new();
        dump_tree(&mut out, &value, 0);
        out
    };
    if !text.ends_with('\n') {
        text.push('\n');
    }
    write_output(args.output.as_deref(), &text)
}

fn run_header(args: HeaderArgs) -> Result<(), String> {
    let data = read_input(&args.input)?;
    let header = rxdr::read_stream_header(&data, DecodeOptions::default())
        .map_err(|e| format!("Header-Fehler: {e}"))?;
    let mut text = String::new();
    let _ = writeln!(text, "format:             {:?}", header.format);
    let _ = writeln!(text, "workspace:          {}", header.workspace);
    let _ = writeln!(text, "version:            {}", header.version);
    let _ = writeln!(text, "writer R version:   {}", header.writer_version);
    let _ = writeln!(text, "min reader version: {}", header.min_reader_version);
    write_output(None, &text)
}

// ============================================================================
// Textdarstellung
// ============================================================================

fn dump_tree(out: &mut String, value: &Value, indent: usize) {
    let pad = "  ".repeat(indent);
    match value {
        Value::Null => {
            let _ = writeln!(out, "{pad}NULL");
        }
        Value::Symbol(name) => {
            let _ = writeln!(out, "{pad}symbol `{name}`");
        }
        Value::Char(s) => {
            let _ = writeln!(out, "{pad}char {s:?}");
        }
        Value::Logical(v) => line(out, &pad, value, v.iter().map(|x| match x.to_bool() {
            Some(true) => "TRUE".to_owned(),
            Some(false) => "FALSE".to_owned(),
            None => "NA".to_owned(),
        })),
        Value::Integer(v) => line(out, &pad, value, v.iter().map(|x| {
            if x.is_na() { "NA".to_owned() } else { x.to_string() }
        })),
        Value::Real(v) => line(out, &pad, value, v.iter().map(|x| real_text(*x))),
        Value::Complex(v) => line(out, &pad, value, v.iter().map(|c| {
            if c.is_na() {
                "NA".to_owned()
            } else {
                format!("{}{:+}i", real_text(c.re), c.im)
            }
        })),
        Value::String(v) => line(out, &pad, value, v.iter().map(|s| format!("{s:?}"))),
        Value::Raw(v) => line(out, &pad, value, v.iter().map(|b| format!("{b:02x}"))),
        Value::List(list) => {
            let _ = writeln!(out, "{pad}list [{}]", list.len());
            for element in list.iter() {
                dump_tree(out, element, indent + 1);
            }
        }
        Value::PairList(head) => {
            let _ = writeln!(out, "{pad}{} [{}]", value.type_name(), head.len());
            for cell in head.iter() {
                let tag = cell.tag_str().unwrap_or("");
                let _ = writeln!(out, "{pad}  ${tag}");
                dump_tree(out, &cell.car, indent + 2);
                if let Value::PairList(_) | Value::Null = cell.cdr {
                    continue;
                }
                let _ = writeln!(out, "{pad}  . (tail)");
                dump_tree(out, &cell.cdr, indent + 2);
            }
        }
    }

    if let Some(attrs) = value.attributes() {
        for (name, attr) in attrs.iter() {
            let _ = writeln!(out, "{pad}  @{name}");
            dump_tree(out, &attr, indent + 2);
        }
    }
}

fn line(out: &mut String, pad: &str, value: &Value, items: impl Iterator<Item = String>) {
    let items: Vec<String> = items.take(PREVIEW_ELEMENTS + 1).collect();
    let shown = items.len().min(PREVIEW_ELEMENTS);
    let ellipsis = if items.len() > PREVIEW_ELEMENTS { " ..." } else { "" };
    let _ = writeln!(
        out,
        "{pad}{} [{}] {}{ellipsis}",
        value.type_name(),
        value.len(),
        items[..shown].join(" ")
    );
}

fn real_text(x: f64) -> String {
    if is_na_real(x) {
        "NA".to_owned()
    } else {
        x.to_string()
    }
}
