//! # Simulador de Planificación de CPU
//!
//! Esta biblioteca calcula, para un conjunto fijo de procesos con tiempos de
//! llegada y ráfaga conocidos, los tiempos de finalización, turnaround y
//! espera que producen tres políticas clásicas, junto con el throughput y
//! los promedios de espera y turnaround.
//!
//! ## Características principales
//!
//! - **FCFS**: orden estable por tiempo de llegada.
//! - **SJF estático**: orden estable por (llegada, ráfaga), aplicado una sola
//!   vez; no re-elige el trabajo más corto entre los listos.
//! - **Round Robin**: simulación paso a paso con cola FIFO y quantum fijo.
//! - **Ejecuciones independientes**: cada ejecución trabaja sobre una copia del
//!   registro de procesos.
//! - **Reportes**: tabla de texto, CSV y JSON.
//!
//! ## Estructura del proyecto
//!
//! - `process`: procesos y registro canónico de la sesión
//! - `scheduler`: algoritmos de planificación y ordenadores FCFS/SJF
//! - `round_robin`: simulador Round Robin
//! - `metrics`: cálculo de métricas y generación de reportes
//! - `simulation`: orquestador de la sesión
//! - `session`: sesión interactiva con menú
//! - `config`: constantes y configuración de la línea de comandos
//! - `error`: tipo de error del simulador
//! - `logger`: logger a stderr para la fachada `log`

pub mod config;
pub mod error;
pub mod logger;
pub mod metrics;
pub mod process;
pub mod round_robin;
pub mod scheduler;
pub mod session;
pub mod simulation;

// Re-exportar las estructuras principales para facilitar su uso
pub use error::{Result, SchedulerError};
pub use metrics::{MetricsCalculator, ProcessMetrics, SimulationMetrics};
pub use process::{Process, ProcessRegistry, ProcessSpec};
pub use round_robin::RoundRobinSimulator;
pub use scheduler::{ExecutionSlice, ScheduleOutcome, SchedulingAlgorithm};
pub use simulation::Simulation;
