//! # Configuración del Simulador
//!
//! Constantes por defecto y configuración de la línea de comandos, con
//! soporte para variables de entorno.
//!
//! ## Ejemplos de uso
//!
//! ```bash
//! # Ejecución única
//! ./cpu-scheduling-simulator --processes "0:5,1:3,2:8" --algorithm rr --quantum 2
//!
//! # Las tres políticas sobre la misma entrada, en CSV
//! SCHED_INPUT=procesos.json ./cpu-scheduling-simulator --algorithm all --format csv
//!
//! # Sesión interactiva
//! ./cpu-scheduling-simulator
//! ```

use clap::Parser;

use crate::error::{Result, SchedulerError};
use crate::logger;
use crate::process::ProcessSpec;

/// Cantidad máxima de procesos por defecto
pub const MAX_PROCESSES: usize = 100;

/// Quantum por defecto para Round Robin
pub const DEFAULT_QUANTUM: u64 = 2;

/// Procesos de demostración: P1(0,5), P2(1,3), P3(2,8)
pub fn default_processes() -> Vec<ProcessSpec> {
    vec![
        ProcessSpec::new(0, 5),
        ProcessSpec::new(1, 3),
        ProcessSpec::new(2, 8),
    ]
}

/// Formato de salida de los reportes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Csv,
    Json,
}

impl OutputFormat {
    pub fn from_name(name: &str) -> Result<Self> {
        match name.trim().to_lowercase().as_str() {
            "table" | "text" => Ok(Self::Table),
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            other => Err(SchedulerError::invalid(format!("unknown output format '{}'", other))),
        }
    }
}

/// Configuración del simulador
#[derive(Debug, Clone, Parser)]
#[command(name = "cpu-scheduling-simulator")]
#[command(about = "Simulador de planificación de CPU: FCFS, SJF y Round Robin")]
#[command(version = "0.1.0")]
pub struct Config {
    /// Lista de procesos en línea: "llegada:ráfaga,llegada:ráfaga,..."
    #[arg(short, long, env = "SCHED_PROCESSES", conflicts_with = "input")]
    pub processes: Option<String>,

    /// Archivo JSON con un arreglo de { "arrival_time", "burst_time" }
    #[arg(short, long, env = "SCHED_INPUT")]
    pub input: Option<String>,

    /// Algoritmo a ejecutar una vez: fcfs, sjf, rr o all
    #[arg(short, long, env = "SCHED_ALGORITHM")]
    pub algorithm: Option<String>,

    /// Quantum para Round Robin
    #[arg(short, long, default_value_t = DEFAULT_QUANTUM, env = "SCHED_QUANTUM")]
    pub quantum: u64,

    /// Formato del reporte: table, csv o json
    #[arg(short, long, default_value = "table", env = "SCHED_FORMAT")]
    pub format: String,

    /// Capacidad máxima del registro de procesos
    #[arg(long = "max-processes", default_value_t = MAX_PROCESSES, env = "SCHED_MAX_PROCESSES")]
    pub max_processes: usize,

    /// Nivel de log: off, error, warn, info, debug o trace
    #[arg(long = "log-level", default_value = "warn", env = "SCHED_LOG")]
    pub log_level: String,
}

impl Config {
    /// Crea una nueva configuración parseando argumentos CLI
    pub fn new() -> Self {
        Config::parse()
    }

    /// Valida la configuración
    pub fn validate(&self) -> Result<()> {
        if self.quantum == 0 {
            return Err(SchedulerError::invalid("quantum must be > 0"));
        }
        if self.max_processes == 0 {
            return Err(SchedulerError::invalid("max processes must be >= 1"));
        }
        if logger::parse_level(&self.log_level).is_none() {
            return Err(SchedulerError::invalid(format!("unknown log level '{}'", self.log_level)));
        }
        if let Some(name) = &self.algorithm {
            if !name.eq_ignore_ascii_case("all") {
                crate::SchedulingAlgorithm::from_name(name, self.quantum)?;
            }
        }
        self.output_format()?;
        Ok(())
    }

    pub fn output_format(&self) -> Result<OutputFormat> {
        OutputFormat::from_name(&self.format)
    }

    /// Sin `--algorithm` se abre la sesión interactiva.
    pub fn is_interactive(&self) -> bool {
        self.algorithm.is_none()
    }

    /// Lee los procesos desde `--processes` o `--input`; sin ninguno de los
    /// dos usa los procesos de demostración.
    pub fn process_specs(&self) -> Result<Vec<ProcessSpec>> {
        if let Some(list) = &self.processes {
            return ProcessSpec::parse_list(list);
        }
        if let Some(path) = &self.input {
            return ProcessSpec::read_json_file(path);
        }
        Ok(default_processes())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            processes: None,
            input: None,
            algorithm: None,
            quantum: DEFAULT_QUANTUM,
            format: "table".to_string(),
            max_processes: MAX_PROCESSES,
            log_level: "warn".to_string(),
        }
    }
}
