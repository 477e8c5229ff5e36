// ABOUTME: CLI binary for the CDOM builder.
// ABOUTME: Parses an HTML file or stdin and prints the CDOM, its classpaths or featurized pairs.

use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser as ClapParser;
use tracing_subscriber::EnvFilter;
use web2text_cdom::{Document, Featurizer, Parser};

#[derive(ClapParser, Debug)]
#[command(name = "cdom")]
#[command(about = "Build the collapsed DOM of an HTML document")]
struct Args {
    /// CSS selector choosing the root element (must match exactly one)
    #[arg(short = 'r', long = "root")]
    root: Option<String>,

    /// Force the input encoding (WHATWG label, e.g. windows-1251)
    #[arg(short = 'e', long = "encoding")]
    encoding: Option<String>,

    /// Print featurized pairs of consecutive significant text elements
    #[arg(long = "pairs", conflicts_with = "classpaths")]
    pairs: bool,

    /// Print the classpath and text of every text element, one per line
    #[arg(long = "classpaths")]
    classpaths: bool,

    /// Output file path (default: stdout)
    #[arg(short = 'o', long = "output")]
    output: Option<PathBuf>,

    /// HTML file to parse (default: stdin)
    #[arg()]
    file: Option<PathBuf>,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn classpath_lines(doc: &Document) -> String {
    doc.text_elements()
        .map(|id| {
            let text = doc.cdom()[id].text().unwrap_or_default();
            format!("{}\t{:?}", doc.classpath(id), text)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn render(args: &Args, mut doc: Document) -> anyhow::Result<String> {
    if args.classpaths {
        return Ok(classpath_lines(&doc));
    }
    if args.pairs {
        let pairs = doc.featurize(&Featurizer::new())?;
        return Ok(serde_json::to_string_pretty(&doc.pair_snapshots(&pairs))?);
    }
    Ok(serde_json::to_string_pretty(&doc.snapshot())?)
}

fn main() -> ExitCode {
    init_tracing();
    let args = Args::parse();

    let mut builder = Parser::builder();
    if let Some(root) = &args.root {
        builder = builder.root_selector(root.as_str());
    }
    if let Some(label) = &args.encoding {
        if encoding_rs::Encoding::for_label(label.trim().as_bytes()).is_none() {
            eprintln!("error: unknown encoding {:?}", label);
            return ExitCode::from(1);
        }
        builder = builder.encoding_label(label);
    }
    let parser = builder.build();

    let parsed = match &args.file {
        Some(path) => match fs::File::open(path) {
            Ok(file) => parser.parse_reader(file),
            Err(e) => {
                eprintln!("error reading file {:?}: {}", path, e);
                return ExitCode::from(1);
            }
        },
        None => parser.parse_reader(io::stdin().lock()),
    };

    let doc = match parsed {
        Ok(doc) => doc,
        Err(e) => {
            eprintln!("error parsing HTML: {}", e);
            return ExitCode::from(1);
        }
    };

    let output = match render(&args, doc) {
        Ok(output) => output,
        Err(e) => {
            eprintln!("error: {}", e);
            return ExitCode::from(1);
        }
    };

    if let Some(path) = &args.output {
        if let Err(e) = fs::write(path, &output) {
            eprintln!("error writing to {:?}: {}", path, e);
            return ExitCode::from(1);
        }
    } else {
        let mut stdout = io::stdout().lock();
        if writeln!(stdout, "{}", output).is_err() {
            return ExitCode::from(1);
        }
    }

    ExitCode::SUCCESS
}
