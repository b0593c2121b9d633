//! lamco-rdp-match - RDP Connection Request matcher
//!
//! Entry point for the matcher binary.

use std::fs::File;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::Semaphore;
use tracing::{debug, error, info, warn};
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer, Registry};

use lamco_rdp_match::config::Config;
use lamco_rdp_match::{RdpMatchError, RdpMatcher, RewindStream, Verdict};

/// Command-line arguments for lamco-rdp-match
#[derive(Parser, Debug)]
#[command(name = "lamco-rdp-match")]
#[command(version, about = "Classify RDP Connection Requests", long_about = None)]
pub struct Args {
    /// Configuration file path (TOML, or JSON with a .json extension)
    #[arg(short, long, env = "RDP_MATCH_CONFIG")]
    pub config: Option<PathBuf>,

    /// Verbose logging (can be specified multiple times)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Log format (json|pretty|compact)
    #[arg(long, global = true)]
    pub log_format: Option<String>,

    /// Write logs to file (in addition to stderr)
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Operating mode
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Evaluate captured Connection Requests stored in files
    Check {
        /// Files contain hex text instead of raw bytes
        #[arg(long)]
        hex: bool,

        /// Capture files
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Accept TCP connections and log the verdict for each one
    Listen {
        /// Listen address
        #[arg(short, long, env = "RDP_MATCH_LISTEN_ADDR")]
        listen: Option<String>,

        /// Listen port
        #[arg(short, long, env = "RDP_MATCH_PORT")]
        port: Option<u16>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Validation warns through tracing, so it runs once logging is up
    let config = resolve_config(&args)?;
    init_logging(&config, args.verbose)?;
    config.validate()?;

    info!("lamco-rdp-match v{}", env!("CARGO_PKG_VERSION"));
    debug!("Config: {:?}", config);

    let matcher = config.matcher()?;

    match args.command {
        Command::Check { hex, files } => {
            let all_matched = run_check(&matcher, &files, hex)?;
            if !all_matched {
                std::process::exit(1);
            }
            Ok(())
        }
        Command::Listen { .. } => run_listener(&config, matcher).await,
    }
}

/// Read the config file and apply command-line overrides, without validating
fn resolve_config(args: &Args) -> Result<Config> {
    let mut config = match &args.config {
        Some(path) => Config::read(path)?,
        None => Config::default_config(),
    };
    if let Some(format) = &args.log_format {
        config.logging.format = format.clone();
    }
    if let Some(log_file) = &args.log_file {
        config.logging.log_file = Some(log_file.clone());
    }
    if let Command::Listen { listen, port } = &args.command {
        config = config.with_overrides(listen.clone(), *port);
    }
    Ok(config)
}

fn run_check(matcher: &RdpMatcher, files: &[PathBuf], hex: bool) -> Result<bool> {
    let mut all_matched = true;

    for path in files {
        let raw = std::fs::read(path)
            .with_context(|| format!("Failed to read capture: {}", path.display()))?;
        let bytes = if hex {
            let text = String::from_utf8(raw)
                .with_context(|| format!("Capture is not text: {}", path.display()))?;
            parse_hex(&text).with_context(|| format!("Invalid hex in {}", path.display()))?
        } else {
            raw
        };

        let verdict = Verdict::from(matcher.match_bytes(&bytes));
        match &verdict.error {
            None if verdict.matched => println!("{}: match", path.display()),
            None => println!("{}: no match", path.display()),
            Some(err) => println!("{}: no match ({}: {})", path.display(), err.kind(), err),
        }
        all_matched &= verdict.matched;
    }

    Ok(all_matched)
}

/// Decode a hex dump, ignoring whitespace, commas and `0x` prefixes
fn parse_hex(text: &str) -> Result<Vec<u8>> {
    let digits: String = text
        .split(|c: char| c.is_whitespace() || c == ',')
        .map(|word| {
            word.strip_prefix("0x")
                .or_else(|| word.strip_prefix("0X"))
                .unwrap_or(word)
        })
        .collect();

    if digits.len() % 2 != 0 {
        anyhow::bail!("odd number of hex digits");
    }

    (0..digits.len())
        .step_by(2)
        .map(|i| {
            let pair = digits.get(i..i + 2).context("non-ASCII input")?;
            u8::from_str_radix(pair, 16).with_context(|| format!("invalid hex byte: {pair}"))
        })
        .collect()
}

async fn run_listener(config: &Config, matcher: RdpMatcher) -> Result<()> {
    let listener = TcpListener::bind(&config.listener.listen_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.listener.listen_addr))?;
    info!("Listening on {}", listener.local_addr()?);

    let matcher = Arc::new(matcher);
    let permits = Arc::new(Semaphore::new(config.listener.max_connections));
    let read_timeout = config.read_timeout();

    loop {
        tokio::select! {
            accepted = listener.accept() => {
                let (socket, peer) = match accepted {
                    Ok(conn) => conn,
                    Err(e) => {
                        warn!("Accept failed: {}", e);
                        continue;
                    }
                };

                let permit = match Arc::clone(&permits).try_acquire_owned() {
                    Ok(permit) => permit,
                    Err(_) => {
                        warn!(%peer, "Connection limit reached, dropping connection");
                        continue;
                    }
                };

                let matcher = Arc::clone(&matcher);
                tokio::spawn(async move {
                    let verdict = inspect(socket, &matcher, read_timeout).await;
                    match &verdict.error {
                        None => info!(%peer, matched = verdict.matched, "connection inspected"),
                        Some(err) if err.is_io() => {
                            debug!(%peer, error = %err, "connection closed before request")
                        }
                        Some(err) => {
                            info!(%peer, matched = false, kind = err.kind(), error = %err, "connection inspected")
                        }
                    }
                    drop(permit);
                });
            }
            signal = tokio::signal::ctrl_c() => {
                if let Err(e) = signal {
                    error!("Failed to listen for shutdown signal: {}", e);
                }
                info!("Shutting down");
                return Ok(());
            }
        }
    }
}

async fn inspect(
    socket: TcpStream,
    matcher: &RdpMatcher,
    read_timeout: std::time::Duration,
) -> Verdict {
    let mut stream = RewindStream::new(socket);
    match tokio::time::timeout(read_timeout, matcher.verdict(&mut stream)).await {
        Ok(verdict) => verdict,
        Err(elapsed) => Verdict::from(Err::<bool, _>(RdpMatchError::Io(std::io::Error::new(
            std::io::ErrorKind::TimedOut,
            elapsed,
        )))),
    }
}

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

fn init_logging(config: &Config, verbose: u8) -> Result<()> {
    let log_level = match verbose {
        0 => config.logging.level.as_str(),
        1 => "debug",
        _ => "trace",
    };

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("lamco_rdp_match={log_level},warn")));

    let format = config.logging.format.as_str();
    let mut layers = vec![fmt_layer(format, std::io::stderr, true)];

    // If log file is specified, write to both stderr and file
    if let Some(path) = &config.logging.log_file {
        let file = File::create(path)
            .with_context(|| format!("Failed to create log file: {}", path.display()))?;
        layers.push(fmt_layer(format, Arc::new(file), false));
    }

    tracing_subscriber::registry()
        .with(layers)
        .with(env_filter)
        .init();

    if let Some(path) = &config.logging.log_file {
        info!("Logging to file: {}", path.display());
    }
    Ok(())
}

/// One fmt layer in the configured format (json|compact|pretty)
fn fmt_layer<W>(format: &str, writer: W, ansi: bool) -> BoxedLayer
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let layer = tracing_subscriber::fmt::layer()
        .with_writer(writer)
        .with_ansi(ansi);
    match format {
        "json" => layer.json().boxed(),
        "compact" => layer.compact().boxed(),
        _ => layer.pretty().boxed(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_formats() {
        assert_eq!(parse_hex("03 00 00 13").unwrap(), vec![0x03, 0x00, 0x00, 0x13]);
        assert_eq!(parse_hex("0x03, 0x00,\n0x0e").unwrap(), vec![0x03, 0x00, 0x0e]);
        assert_eq!(parse_hex("0300").unwrap(), vec![0x03, 0x00]);
        assert!(parse_hex("").unwrap().is_empty());
    }

    #[test]
    fn test_parse_hex_rejects_garbage() {
        assert!(parse_hex("030").is_err());
        assert!(parse_hex("zz").is_err());
    }

    #[test]
    fn test_args_parse() {
        let args = Args::try_parse_from(["lamco-rdp-match", "check", "--hex", "a.hex"]).unwrap();
        match args.command {
            Command::Check { hex, files } => {
                assert!(hex);
                assert_eq!(files, vec![PathBuf::from("a.hex")]);
            }
            Command::Listen { .. } => panic!("expected check"),
        }

        assert!(Args::try_parse_from(["lamco-rdp-match", "check"]).is_err());
    }

    #[test]
    fn test_resolve_config_defers_validation() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[matcher]\ncookie_hash = \"a0123\"\ncustom_info = \"x\"\n[listener]\nread_timeout_ms = 0\n",
        )
        .unwrap();
        let path = path.to_string_lossy().into_owned();

        let args = Args::try_parse_from([
            "lamco-rdp-match",
            "--config",
            path.as_str(),
            "--log-format",
            "json",
            "listen",
            "--port",
            "13389",
        ])
        .unwrap();

        let config = resolve_config(&args).unwrap();
        assert_eq!(config.logging.format, "json");
        assert_eq!(config.listener.listen_addr, "0.0.0.0:13389");
        assert!(config.validate().is_err());
    }

    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<std::sync::Mutex<Vec<u8>>>);

    impl std::io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_fmt_layer_formats() {
        for format in ["json", "compact", "pretty"] {
            let logs = CapturedLogs::default();
            let writer = logs.clone();
            let layers = vec![fmt_layer(format, move || writer.clone(), false)];
            let subscriber = tracing_subscriber::registry().with(layers);
            tracing::subscriber::with_default(subscriber, || info!(port = 3389, "verdict ready"));

            let output = String::from_utf8(logs.0.lock().unwrap().clone()).unwrap();
            assert!(output.contains("verdict ready"), "{format}: {output}");
            assert_eq!(output.trim_start().starts_with('{'), format == "json", "{format}: {output}");
        }
    }
}
