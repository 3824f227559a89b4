use std::{
    env,
    io::{self, Write},
    path::Path,
};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt::MakeWriter, prelude::*, registry, EnvFilter};

// --- Tee writer: console and file at once ---
struct Tee<A, B> {
    a: A,
    b: B,
}

impl<A, B> Write for Tee<A, B>
where
    A: Write,
    B: Write,
{
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let res_a = self.a.write(buf);
        let res_b = self.b.write(buf);
        res_a.or(res_b)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.a.flush()?;
        self.b.flush()
    }
}

#[derive(Clone)]
struct MakeTee<A, B> {
    make_a: A,
    make_b: B,
}

impl<'a, A, B, W1, W2> MakeWriter<'a> for MakeTee<A, B>
where
    A: MakeWriter<'a, Writer = W1>,
    B: MakeWriter<'a, Writer = W2>,
    W1: Write + 'a,
    W2: Write + 'a,
{
    type Writer = Tee<W1, W2>;
    fn make_writer(&'a self) -> Self::Writer {
        Tee {
            a: self.make_a.make_writer(),
            b: self.make_b.make_writer(),
        }
    }
}

/// Where log events are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogOutput {
    Console,
    File,
    Both,
    None,
}

impl LogOutput {
    fn parse(value: &str) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "file" => LogOutput::File,
            "both" => LogOutput::Both,
            "none" | "off" => LogOutput::None,
            _ => LogOutput::Console,
        }
    }
}

/// Logging settings, read from `FAB_LOG_*` environment variables.
#[derive(Debug, Clone)]
pub struct LogSettings {
    pub level: String,
    pub output: LogOutput,
    pub json: bool,
    pub file_path: String,
}

impl LogSettings {
    pub fn from_env() -> Self {
        Self {
            level: env::var("FAB_LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            output: LogOutput::parse(
                &env::var("FAB_LOG_OUTPUT").unwrap_or_else(|_| "console".to_string()),
            ),
            json: env::var("FAB_LOG_FORMAT").is_ok_and(|f| f.eq_ignore_ascii_case("json")),
            file_path: env::var("FAB_LOG_FILE")
                .unwrap_or_else(|_| "/tmp/fab-deploy.log".to_string()),
        }
    }

    /// Raise the level to `debug` unless something more verbose was asked for.
    pub fn with_debug(mut self, debug: bool) -> Self {
        if debug && !self.level.eq_ignore_ascii_case("trace") {
            self.level = "debug".to_string();
        }
        self
    }
}

/// Initializes the global tracing subscriber from the environment.
pub fn init_subscriber() -> Option<WorkerGuard> {
    init_with(&LogSettings::from_env())
}

/// Initializes the global tracing subscriber.
///
/// The returned guard flushes the file appender on drop and must be held for
/// the lifetime of the program. Installing a second subscriber is a no-op.
pub fn init_with(settings: &LogSettings) -> Option<WorkerGuard> {
    let mut env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&settings.level));
    if let Ok(directive) = "duct=warn".parse() {
        env_filter = env_filter.add_directive(directive);
    }

    let mut guard: Option<WorkerGuard> = None;
    let subscriber = registry().with(env_filter);

    let log_path = Path::new(&settings.file_path);
    let log_dir = log_path.parent().unwrap_or_else(|| Path::new("/tmp"));
    let log_filename = log_path
        .file_name()
        .unwrap_or_else(|| "fab-deploy.log".as_ref());

    let installed = match settings.output {
        LogOutput::Both => {
            let file_appender = tracing_appender::rolling::daily(log_dir, log_filename);
            let (non_blocking, file_guard) = tracing_appender::non_blocking(file_appender);
            guard = Some(file_guard);

            let tee_writer = MakeTee {
                make_a: std::io::stderr,
                make_b: non_blocking,
            };
            let fmt_layer = tracing_subscriber::fmt::layer().with_writer(tee_writer);
            if settings.json {
                subscriber.with(fmt_layer.json()).try_init()
            } else {
                subscriber.with(fmt_layer.compact()).try_init()
            }
        }
        LogOutput::Console => {
            let fmt_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);
            if settings.json {
                subscriber.with(fmt_layer.json()).try_init()
            } else {
                subscriber.with(fmt_layer.compact()).try_init()
            }
        }
        LogOutput::File => {
            let file_appender = tracing_appender::rolling::daily(log_dir, log_filename);
            let (non_blocking, file_guard) = tracing_appender::non_blocking(file_appender);
            guard = Some(file_guard);

            let fmt_layer = tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(non_blocking);
            if settings.json {
                subscriber.with(fmt_layer.json()).try_init()
            } else {
                subscriber.with(fmt_layer).try_init()
            }
        }
        LogOutput::None => subscriber.try_init(),
    };

    if let Err(e) = installed {
        tracing::debug!("tracing subscriber already installed: {}", e);
    }

    guard
}
