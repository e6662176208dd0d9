//! aenker: decrypt aenker streams
//!
//! Usage:
//!   aenker [--config aenker.toml] open [-k KEY] [-i INPUT] [-o OUTPUT]
//!
//! KEY is either a base64-encoded X25519 private key or the path of a key
//! file holding one (default: ~/.local/share/aenker/aenkerkey). INPUT and
//! OUTPUT default to stdin and stdout.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use tracing::debug;
use zeroize::Zeroizing;

use aenker_core::{AenkerConfig, PaddingMode, StreamConfig};
use aenker_crypto::keys::is_base64_key;
use aenker_crypto::{decrypt_with, DecoderOptions, PrivateKey};

// ── CLI structure ──────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(
    name = "aenker",
    version,
    about = "Decrypt aenker streams",
    long_about = "aenker: decrypt X25519 + ChaCha20-Poly1305 chunked streams with a recipient private key"
)]
struct Cli {
    /// Path to aenker.toml configuration file (defaults apply if absent)
    #[arg(long, short = 'c', env = "AENKER_CONFIG")]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error); overrides the config file
    #[arg(long, env = "AENKER_LOG")]
    log: Option<String>,

    /// Log format; overrides the config file
    #[arg(long, env = "AENKER_LOG_FORMAT")]
    log_format: Option<LogFormat>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Decrypt a stream with a recipient private key
    #[command(visible_aliases = ["decrypt", "d"])]
    Open(OpenArgs),
}

#[derive(Args, Debug)]
struct OpenArgs {
    /// Base64 private key, or path to a key file containing one
    /// (default: ~/.local/share/aenker/aenkerkey)
    #[arg(long, short = 'k')]
    key: Option<String>,

    /// Encrypted input file ("-" or omitted: stdin)
    #[arg(long, short = 'i')]
    input: Option<PathBuf>,

    /// Plaintext output file, created or truncated ("-" or omitted: stdout)
    #[arg(long, short = 'o')]
    output: Option<PathBuf>,

    /// Plaintext chunk size the stream was written with (overrides config)
    #[arg(long)]
    chunk_size: Option<usize>,

    /// Padding removal for the final chunk (overrides config)
    #[arg(long)]
    padding: Option<PaddingArg>,

    /// Fail if any bytes follow the final chunk
    #[arg(long)]
    strict_eof: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum LogFormat {
    Json,
    Text,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum PaddingArg {
    ByValue,
    ByCount,
}

impl From<PaddingArg> for PaddingMode {
    fn from(arg: PaddingArg) -> Self {
        match arg {
            PaddingArg::ByValue => PaddingMode::ByValue,
            PaddingArg::ByCount => PaddingMode::ByCount,
        }
    }
}

// ── Entry point ────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    let level = cli.log.as_deref().unwrap_or(&config.log.level);
    let format = match cli.log_format {
        Some(format) => format,
        None if config.log.format == "json" => LogFormat::Json,
        None => LogFormat::Text,
    };
    init_logging(level, format);

    match cli.command {
        Commands::Open(args) => cmd_open(&config, &args),
    }
}

fn load_config(path: Option<&Path>) -> Result<AenkerConfig> {
    match path {
        Some(path) => AenkerConfig::load(path)
            .with_context(|| format!("loading config: {}", path.display())),
        None => Ok(AenkerConfig::default()),
    }
}

/// Logs go to stderr; stdout may carry plaintext.
fn init_logging(level: &str, format: LogFormat) {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    match format {
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().json().with_writer(io::stderr))
                .init();
        }
        LogFormat::Text => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().with_writer(io::stderr))
                .init();
        }
    }
}

// ── open ───────────────────────────────────────────────────────────────────────

fn cmd_open(config: &AenkerConfig, args: &OpenArgs) -> Result<()> {
    let private_key = load_private_key(args.key.as_deref())?;
    let options = decoder_options(&config.stream, args);
    debug!(
        chunk_size = options.chunk_size,
        padding = ?options.padding,
        strict_eof = options.reject_trailing_data,
        "opening stream"
    );

    let input = args.input.as_deref().filter(|p| !is_stdio(p));
    let output = args.output.as_deref().filter(|p| !is_stdio(p));

    let mut reader: Box<dyn Read> = match input {
        Some(path) => Box::new(BufReader::new(
            File::open(path).with_context(|| format!("opening input: {}", path.display()))?,
        )),
        None => Box::new(io::stdin().lock()),
    };
    let mut writer: Box<dyn Write> = match output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("creating output: {}", path.display()))?,
        )),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };

    let source = input.map_or_else(|| "stdin".to_string(), |p| p.display().to_string());
    let summary = decrypt_with(&private_key, &mut reader, &mut writer, &options)
        .with_context(|| format!("decrypting {source}"))?;
    writer.flush().context("flushing output")?;

    debug!(
        chunks = summary.chunks,
        bytes = summary.plaintext_bytes,
        "decrypted {source}"
    );
    Ok(())
}

/// `-k` accepts the key itself; anything not shaped like a key is a path.
fn load_private_key(key: Option<&str>) -> Result<PrivateKey> {
    match key {
        Some(key) if is_base64_key(key.trim()) => {
            PrivateKey::from_base64(key).context("decoding private key")
        }
        Some(path) => read_key_file(Path::new(path)),
        None => read_key_file(&default_key_path()),
    }
}

/// `$HOME/.local/share/aenker/aenkerkey`, or `./aenkerkey` without a home.
fn default_key_path() -> PathBuf {
    match std::env::var("HOME") {
        Ok(home) if !home.is_empty() => PathBuf::from(home)
            .join(".local")
            .join("share")
            .join("aenker")
            .join("aenkerkey"),
        _ => PathBuf::from(".").join("aenkerkey"),
    }
}

fn read_key_file(path: &Path) -> Result<PrivateKey> {
    debug!("reading key file {}", path.display());
    let contents = Zeroizing::new(
        std::fs::read_to_string(path)
            .with_context(|| format!("reading key file: {}", path.display()))?,
    );
    PrivateKey::from_key_file_contents(&contents)
        .with_context(|| format!("parsing key file: {}", path.display()))
}

/// Config file values, then command-line overrides.
fn decoder_options(stream: &StreamConfig, args: &OpenArgs) -> DecoderOptions {
    let mut options = DecoderOptions::from(stream);
    if let Some(chunk_size) = args.chunk_size {
        options.chunk_size = chunk_size;
    }
    if let Some(padding) = args.padding {
        options.padding = padding.into();
    }
    if args.strict_eof {
        options.reject_trailing_data = true;
    }
    options
}

fn is_stdio(path: &Path) -> bool {
    path.as_os_str() == "-"
}
