use std::io::{self, Write};
use std::path::Path;
use std::process;

use anyhow::Context;
use clap::{Parser, ValueEnum};

use b64pack::common::io::{read_input, read_stdin};
use b64pack::common::{io_error_msg, reset_sigpipe};
use b64pack::{Base64Writer, Framing, PackError, StreamSink};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    /// One quoted "$base64$..." string
    Json,
    /// Indented 64-column lines
    Yaml,
}

impl From<Format> for Framing {
    fn from(f: Format) -> Framing {
        match f {
            Format::Json => Framing::Inline,
            Format::Yaml => Framing::LineWrapped,
        }
    }
}

#[derive(Parser)]
#[command(
    name = "b64pack",
    about = "Pack native binary records from FILE, or standard input, as base64 text.",
    after_help = "With no FILE, or when FILE is -, read standard input.\n\n\
        DT is a type descriptor: an optional repeat count followed by one of\n\
        u c (8-bit), w s (16-bit), i f (32-bit) or d (64-bit), e.g. '3f2i'.\n\
        Input records use the host's byte order with each field aligned to its\n\
        own size; output is little-endian and tightly packed.",
    version
)]
struct Cli {
    /// Type descriptor of one record
    #[arg(short = 't', long = "dt", value_name = "DT")]
    dt: String,

    /// Output framing
    #[arg(short = 'f', long = "format", value_enum, default_value = "yaml")]
    format: Format,

    /// Indentation of wrapped lines (yaml only)
    #[arg(long = "indent", value_name = "N", default_value = "0")]
    indent: usize,

    /// File to process (reads stdin if omitted or -)
    file: Option<String>,
}

fn main() {
    reset_sigpipe();
    env_logger::init();

    let cli = Cli::parse();
    let filename = cli.file.as_deref().unwrap_or("-");

    if let Err(e) = run(&cli, filename) {
        if let Some(PackError::Io(io_err)) = e.downcast_ref::<PackError>() {
            if io_err.kind() == io::ErrorKind::BrokenPipe {
                process::exit(0);
            }
        }
        match e.downcast_ref::<io::Error>() {
            Some(io_err) => eprintln!("b64pack: {}: {}", e, io_error_msg(io_err)),
            None => eprintln!("b64pack: {:#}", e),
        }
        process::exit(1);
    }
}

fn run(cli: &Cli, filename: &str) -> anyhow::Result<()> {
    let data = if filename == "-" {
        read_stdin().context("-")?
    } else {
        read_input(Path::new(filename)).with_context(|| filename.to_owned())?
    };

    let stdout = io::stdout();
    let out = io::BufWriter::with_capacity(256 * 1024, stdout.lock());
    let mut sink = StreamSink::new(out, cli.format.into()).with_indent(cli.indent);

    let mut writer = Base64Writer::new(&mut sink)?;
    writer.write(&data, &cli.dt)?;
    writer.finish()?;

    // Inline payloads end without a newline; terminate the output line.
    let mut out = sink.into_inner()?;
    if matches!(cli.format, Format::Json) {
        out.write_all(b"\n")?;
    }
    out.flush()?;
    Ok(())
}
