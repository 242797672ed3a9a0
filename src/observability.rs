//! Observability hooks for the encoder.
//!
//! Two tools live here. The `log_metric!` macro emits one structured key-value
//! line per encode stage; it is compiled out of release builds entirely.
//! `init_logging` installs an `env_logger` backend for the `log` facade, so the
//! `info!`/`warn!` lines emitted by the pipeline become visible.

use std::fs::OpenOptions;
use std::sync::Once;

use log::LevelFilter;

use crate::error::ShpforgeError;

/// Logs a structured key-value metric line at debug level, only in debug builds.
///
/// # Example
/// ```
/// use shpforge::log_metric;
/// let records = 12;
/// log_metric!("event" = "encode_shapes", "records" = &records);
/// ```
#[macro_export]
macro_rules! log_metric {
    ($($key:literal = $value:expr),+ $(,)?) => {
        #[cfg(debug_assertions)]
        {
            let mut parts = Vec::new();
            $(
                parts.push(format!("\"{}\": \"{}\"", $key, $value));
            )+

            log::debug!("SHPFORGE_METRIC: {{ {} }}", parts.join(", "));
        }
    };
}

static INIT_LOGGER: Once = Once::new();

/// Installs the global logger once per process. Later calls are no-ops.
///
/// With `log_file` set, output is appended to that file instead of stderr.
pub fn init_logging(level: LevelFilter, log_file: Option<&str>) -> Result<(), ShpforgeError> {
    // Open the file up front so a bad path is reported instead of swallowed.
    let target = match log_file {
        Some(path) => Some(OpenOptions::new().append(true).create(true).open(path)?),
        None => None,
    };

    INIT_LOGGER.call_once(move || {
        let mut builder = env_logger::Builder::new();

        builder.is_test(false);
        builder.filter_level(level);

        // Level and message only
        builder.format(|buf, record| {
            use std::io::Write;
            writeln!(buf, "[{}] {}", record.level(), record.args())?;
            buf.flush()?;
            Ok(())
        });

        if let Some(file) = target {
            builder.target(env_logger::Target::Pipe(Box::new(file)));
        }

        let _ = builder.try_init();
    });
    Ok(())
}
