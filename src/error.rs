//! # Errores del Simulador
//!
//! Define el tipo de error único que devuelven todas las operaciones de la
//! biblioteca.

use std::fmt;
use std::io;

/// Resultado con el error del simulador.
pub type Result<T> = std::result::Result<T, SchedulerError>;

/// Errores que pueden ocurrir al registrar procesos o ejecutar una política.
#[derive(Debug)]
pub enum SchedulerError {
    /// Entrada inválida: cero procesos, ráfaga nula, quantum nulo, texto mal formado...
    InvalidInput(String),

    /// Se superó la capacidad del registro, o el tiempo simulado no cabe en `u64`
    ResourceExhausted(String),

    /// Error de E/S al leer la entrada o escribir el reporte
    Io(io::Error),

    /// Error al generar el reporte JSON
    Json(serde_json::Error),
}

impl SchedulerError {
    /// Construye un `InvalidInput` a partir de cualquier mensaje.
    pub fn invalid(message: impl Into<String>) -> Self {
        SchedulerError::InvalidInput(message.into())
    }

    /// Indica si el error se puede corregir pidiendo de nuevo el dato.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use cpu_scheduling_simulator::SchedulerError;
    ///
    /// assert!(SchedulerError::invalid("quantum = 0").is_recoverable());
    /// assert!(!SchedulerError::ResourceExhausted("101 > 100".into()).is_recoverable());
    /// ```
    pub fn is_recoverable(&self) -> bool {
        matches!(self, SchedulerError::InvalidInput(_))
    }
}

impl fmt::Display for SchedulerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchedulerError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            SchedulerError::ResourceExhausted(msg) => write!(f, "Resource exhausted: {}", msg),
            SchedulerError::Io(err) => write!(f, "I/O error: {}", err),
            SchedulerError::Json(err) => write!(f, "JSON error: {}", err),
        }
    }
}

impl std::error::Error for SchedulerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SchedulerError::Io(err) => Some(err),
            SchedulerError::Json(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for SchedulerError {
    fn from(err: io::Error) -> Self {
        SchedulerError::Io(err)
    }
}

impl From<serde_json::Error> for SchedulerError {
    fn from(err: serde_json::Error) -> Self {
        SchedulerError::Json(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let err = SchedulerError::invalid("process count must be > 0");
        assert_eq!(err.to_string(), "Invalid input: process count must be > 0");

        let err = SchedulerError::ResourceExhausted("101 processes, capacity 100".to_string());
        assert!(err.to_string().starts_with("Resource exhausted"));
    }

    #[test]
    fn test_io_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "missing.json");
        let err: SchedulerError = io_err.into();
        assert!(matches!(err, SchedulerError::Io(_)));
        assert!(!err.is_recoverable());
        assert!(std::error::Error::source(&err).is_some());
    }
}
