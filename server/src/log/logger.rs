use crate::configs::server::LoggingConfig;
use crate::server_error::ServerError;
use std::io::{self, Write};
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::{Arc, Mutex};
use tracing::{event, info, trace, Level};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{
    filter::LevelFilter, fmt, fmt::format::Format, fmt::MakeWriter, reload, reload::Handle,
    EnvFilter, Layer, Registry,
};

const VERSION: &str = env!("CARGO_PKG_VERSION");

// Writer that does nothing
struct NullWriter;
impl Write for NullWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

// Keeps the entries logged before the configuration is known, they are
// replayed into the log file once it is opened.
struct EarlyLogWriter(Arc<Mutex<Vec<String>>>);
impl Write for EarlyLogWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut lock = self
            .0
            .lock()
            .map_err(|_| io::Error::other("early logs buffer is poisoned"))?;
        lock.push(String::from_utf8_lossy(buf).into_owned());
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

struct EarlyLogMakeWriter(Arc<Mutex<Vec<String>>>);
impl<'a> MakeWriter<'a> for EarlyLogMakeWriter {
    type Writer = EarlyLogWriter;

    fn make_writer(&'a self) -> Self::Writer {
        EarlyLogWriter(self.0.clone())
    }
}

type ReloadHandle = Handle<Box<dyn Layer<Registry> + Send + Sync>, Registry>;

pub struct Logging {
    file_guard: Option<WorkerGuard>,
    file_reload_handle: Option<ReloadHandle>,
    filtering_stdout_reload_handle: Option<ReloadHandle>,
    filtering_file_reload_handle: Option<ReloadHandle>,
    early_logs_buffer: Arc<Mutex<Vec<String>>>,
}

impl Logging {
    pub fn new() -> Self {
        Self {
            file_guard: None,
            file_reload_handle: None,
            filtering_stdout_reload_handle: None,
            filtering_file_reload_handle: None,
            early_logs_buffer: Arc::new(Mutex::new(vec![])),
        }
    }

    /// Installs the global subscriber. Stdout logging starts right away, file
    /// entries are buffered until `late_init` knows where to put them.
    pub fn early_init(&mut self) {
        let mut layers = vec![];

        let filtering_level = Self::get_filtering_level(None);
        let (filtering_stdout_layer, filtering_stdout_reload_handle) =
            reload::Layer::new(filtering_level.boxed());
        self.filtering_stdout_reload_handle = Some(filtering_stdout_reload_handle);

        let (filtering_file_layer, filtering_file_reload_handle) =
            reload::Layer::new(filtering_level.boxed());
        self.filtering_file_reload_handle = Some(filtering_file_reload_handle);

        let stdout_layer = fmt::Layer::default()
            .event_format(Self::get_log_format())
            .with_writer(io::stdout);
        layers.push(stdout_layer.and_then(filtering_stdout_layer).boxed());

        let file_layer = fmt::Layer::default()
            .event_format(Self::get_log_format())
            .with_target(true)
            .with_writer(EarlyLogMakeWriter(self.early_logs_buffer.clone()))
            .with_ansi(false)
            .boxed();
        let (file_layer, file_layer_reload_handle) = reload::Layer::new(file_layer);
        self.file_reload_handle = Some(file_layer_reload_handle);
        layers.push(file_layer.and_then(filtering_file_layer).boxed());

        // `try_init` fails when a subscriber is already installed, e.g. by a test harness.
        let _ = Registry::default()
            .with(layers)
            .with(EnvFilter::try_from_default_env().unwrap_or(EnvFilter::new("TRACE")))
            .try_init();
        info!("Codium server version: {VERSION}");
    }

    pub fn late_init(&mut self, config: &LoggingConfig) -> Result<(), ServerError> {
        trace!("Logging config: {}", config);

        let filtering_level = Self::get_filtering_level(Some(config));

        self.filtering_stdout_reload_handle
            .as_ref()
            .ok_or(ServerError::FilterReloadFailure)?
            .modify(|layer| *layer = filtering_level.boxed())
            .map_err(|_| ServerError::FilterReloadFailure)?;

        self.filtering_file_reload_handle
            .as_ref()
            .ok_or(ServerError::FilterReloadFailure)?
            .modify(|layer| *layer = filtering_level.boxed())
            .map_err(|_| ServerError::FilterReloadFailure)?;

        if config.path.is_empty() {
            self.clear_early_logs();
            self.file_reload_handle
                .as_ref()
                .ok_or(ServerError::FileReloadFailure)?
                .modify(|layer| *layer = fmt::layer().with_writer(|| NullWriter).boxed())
                .map_err(|_| ServerError::FileReloadFailure)?;
            info!("Logging initialized, file logging is disabled. Log level is: {filtering_level}.");
            return Ok(());
        }

        let logs_path = PathBuf::from(config.path.clone());
        std::fs::create_dir_all(&logs_path)?;
        let file_appender = tracing_appender::rolling::never(&logs_path, &config.file_name);
        let (mut non_blocking_file, file_guard) = tracing_appender::non_blocking(file_appender);

        self.dump_early_logs(&mut non_blocking_file)?;

        let file_layer = fmt::layer()
            .event_format(Self::get_log_format())
            .with_target(true)
            .with_writer(non_blocking_file)
            .with_ansi(false)
            .boxed();

        self.file_guard = Some(file_guard);
        self.file_reload_handle
            .as_ref()
            .ok_or(ServerError::FileReloadFailure)?
            .modify(|layer| *layer = file_layer)
            .map_err(|_| ServerError::FileReloadFailure)?;

        let print = format!(
            "Logging initialized, logs will be stored at: {:?}. Log level is: {}.",
            logs_path.join(&config.file_name),
            filtering_level
        );

        match filtering_level {
            LevelFilter::OFF => (),
            LevelFilter::ERROR => event!(Level::ERROR, "{}", print),
            LevelFilter::WARN => event!(Level::WARN, "{}", print),
            LevelFilter::INFO => event!(Level::INFO, "{}", print),
            LevelFilter::DEBUG => event!(Level::DEBUG, "{}", print),
            LevelFilter::TRACE => event!(Level::TRACE, "{}", print),
        }

        Ok(())
    }

    fn dump_early_logs<W: Write>(&self, writer: &mut W) -> Result<(), ServerError> {
        let mut early_logs_buffer = self
            .early_logs_buffer
            .lock()
            .map_err(|_| ServerError::FileReloadFailure)?;
        for log in early_logs_buffer.drain(..) {
            writer.write_all(log.as_bytes())?;
        }
        Ok(())
    }

    fn clear_early_logs(&self) {
        if let Ok(mut early_logs_buffer) = self.early_logs_buffer.lock() {
            early_logs_buffer.clear();
        }
    }

    // RUST_LOG always takes precedence over config
    fn get_filtering_level(config: Option<&LoggingConfig>) -> LevelFilter {
        if let Ok(rust_log) = std::env::var("RUST_LOG") {
            if let Ok(level) = LevelFilter::from_str(&rust_log.to_uppercase()) {
                level
            } else {
                println!("Invalid RUST_LOG value: {}, falling back to info", rust_log);
                LevelFilter::INFO
            }
        } else if let Some(config) = config {
            if let Ok(level) = LevelFilter::from_str(&config.level.to_uppercase()) {
                level
            } else {
                println!(
                    "Invalid log level in config: {}, falling back to info",
                    config.level
                );
                LevelFilter::INFO
            }
        } else {
            LevelFilter::INFO
        }
    }

    fn get_log_format() -> Format {
        Format::default().with_thread_ids(true)
    }
}

impl Default for Logging {
    fn default() -> Self {
        Self::new()
    }
}
