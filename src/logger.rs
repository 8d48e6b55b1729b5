//! # Logger del Simulador
//!
//! Implementación mínima de `log::Log` que escribe en stderr con el formato
//! `[NIVEL] mensaje`, para no mezclar el log con el reporte en stdout.

use log::{LevelFilter, Metadata, Record, SetLoggerError};

struct StderrLogger;

impl log::Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            eprintln!("[{}] {}", record.level(), record.args());
        }
    }

    fn flush(&self) {}
}

static LOGGER: StderrLogger = StderrLogger;

/// Instala el logger global con el nivel indicado.
///
/// Solo puede llamarse una vez por proceso; la segunda llamada devuelve error.
pub fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
    log::set_logger(&LOGGER).map(|()| log::set_max_level(level))
}

/// Convierte el nombre de un nivel (`off`, `error`, `warn`, `info`, `debug`, `trace`).
pub fn parse_level(name: &str) -> Option<LevelFilter> {
    name.parse().ok()
}
