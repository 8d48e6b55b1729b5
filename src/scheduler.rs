//! # Módulo de Algoritmos de Planificación
//!
//! Este módulo define las políticas disponibles y los ordenadores estáticos
//! de FCFS y SJF. Round Robin vive en su propio módulo porque simula el paso
//! del tiempo en lugar de ordenar una sola vez.

use std::fmt;

use serde::Serialize;

use crate::error::{Result, SchedulerError};
use crate::metrics::MetricsCalculator;
use crate::process::Process;
use crate::round_robin::RoundRobinSimulator;

/// Algoritmos de planificación disponibles.
///
/// - FCFS ejecuta en orden de llegada
/// - SJF estático ordena una sola vez por (llegada, ráfaga)
/// - Round Robin reparte la CPU en turnos de a lo sumo `quantum`
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SchedulingAlgorithm {
    /// First-Come First-Served: no preemptivo, en orden de llegada.
    Fcfs,

    /// Shortest Job First no preemptivo como orden estático.
    ///
    /// No elige el trabajo más corto entre los listos en cada decisión: ordena
    /// una vez por llegada y luego por ráfaga, y ejecuta en ese orden fijo.
    StaticSjf,

    /// Round Robin: preemptivo con quantum fijo.
    RoundRobin {
        /// Tiempo máximo de CPU continuo por turno
        quantum: u64,
    },
}

impl SchedulingAlgorithm {
    /// Crea un nuevo algoritmo FCFS.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use cpu_scheduling_simulator::SchedulingAlgorithm;
    ///
    /// let algorithm = SchedulingAlgorithm::fcfs();
    /// assert!(!algorithm.is_preemptive());
    /// ```
    pub fn fcfs() -> Self {
        Self::Fcfs
    }

    /// Crea un nuevo algoritmo SJF estático.
    pub fn sjf() -> Self {
        Self::StaticSjf
    }

    /// Crea un nuevo algoritmo Round Robin con el quantum especificado.
    ///
    /// El quantum se valida al ejecutar (`validate`), no aquí.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use cpu_scheduling_simulator::SchedulingAlgorithm;
    ///
    /// let algorithm = SchedulingAlgorithm::round_robin(2);
    /// assert_eq!(algorithm.quantum(), Some(2));
    /// ```
    pub fn round_robin(quantum: u64) -> Self {
        Self::RoundRobin { quantum }
    }

    /// Interpreta un nombre de algoritmo de la línea de comandos.
    ///
    /// Acepta `fcfs`, `sjf` y `rr` / `round-robin`; `quantum` solo se usa
    /// para Round Robin.
    pub fn from_name(name: &str, quantum: u64) -> Result<Self> {
        match name.trim().to_lowercase().as_str() {
            "fcfs" => Ok(Self::Fcfs),
            "sjf" => Ok(Self::StaticSjf),
            "rr" | "round-robin" | "roundrobin" => Ok(Self::RoundRobin { quantum }),
            other => Err(SchedulerError::invalid(format!("unknown algorithm '{}'", other))),
        }
    }

    /// Determina si el algoritmo es preemptivo.
    pub fn is_preemptive(&self) -> bool {
        matches!(self, Self::RoundRobin { .. })
    }

    /// Quantum configurado, si es Round Robin.
    pub fn quantum(&self) -> Option<u64> {
        match self {
            Self::RoundRobin { quantum } => Some(*quantum),
            _ => None,
        }
    }

    /// Comprueba los parámetros del algoritmo.
    pub fn validate(&self) -> Result<()> {
        match self {
            Self::RoundRobin { quantum: 0 } => Err(SchedulerError::invalid("quantum must be > 0")),
            _ => Ok(()),
        }
    }

    /// Título usado en el encabezado de los reportes.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Fcfs => "First-Come-First-Serve (FCFS)",
            Self::StaticSjf => "Shortest Job First (SJF)",
            Self::RoundRobin { .. } => "Round Robin (RR)",
        }
    }

    /// Obtiene una descripción textual del algoritmo.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use cpu_scheduling_simulator::SchedulingAlgorithm;
    ///
    /// assert_eq!(SchedulingAlgorithm::fcfs().description(), "First-Come First-Served (no preemptivo)");
    /// assert!(SchedulingAlgorithm::round_robin(4).description().contains("quantum: 4"));
    /// ```
    pub fn description(&self) -> String {
        match self {
            Self::Fcfs => "First-Come First-Served (no preemptivo)".to_string(),
            Self::StaticSjf => "Shortest Job First estático (no preemptivo)".to_string(),
            Self::RoundRobin { quantum } => format!("Round Robin preemptivo (quantum: {})", quantum),
        }
    }

    /// Ejecuta la política sobre una copia de los procesos.
    ///
    /// `processes` debe venir en orden de entrada (ids 1..N). FCFS y SJF
    /// ordenan y delegan en el calculador de métricas; Round Robin simula
    /// y calcula sus propios tiempos de finalización.
    ///
    /// # Errors
    ///
    /// - `InvalidInput` si no hay procesos o el quantum es 0
    /// - `ResourceExhausted` si el tiempo simulado no cabe en `u64`
    pub fn schedule(
        &self,
        mut processes: Vec<Process>,
        calculator: &MetricsCalculator,
    ) -> Result<ScheduleOutcome> {
        self.validate()?;
        if processes.is_empty() {
            return Err(SchedulerError::invalid("at least one process is required"));
        }

        let timeline = match self {
            Self::Fcfs => {
                order_fcfs(&mut processes);
                calculator.apply_in_order(&mut processes)?
            }
            Self::StaticSjf => {
                order_static_sjf(&mut processes);
                calculator.apply_in_order(&mut processes)?
            }
            Self::RoundRobin { quantum } => {
                let mut simulator = RoundRobinSimulator::new(*quantum, processes)?;
                simulator.run()?;
                let (finished, timeline) = simulator.into_parts();
                processes = finished;
                timeline
            }
        };

        log::debug!("{}: {} tramos de ejecución", self, timeline.len());

        Ok(ScheduleOutcome {
            algorithm: *self,
            processes,
            timeline,
        })
    }
}

impl fmt::Display for SchedulingAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fcfs => write!(f, "FCFS"),
            Self::StaticSjf => write!(f, "SJF"),
            Self::RoundRobin { quantum } => write!(f, "Round Robin (quantum {})", quantum),
        }
    }
}

/// Intervalo continuo en el que un proceso ocupó la CPU.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ExecutionSlice {
    pub process_id: usize,
    pub start: u64,
    pub end: u64,
}

impl ExecutionSlice {
    pub fn len(&self) -> u64 {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.end == self.start
    }
}

/// Resultado de una ejecución: procesos en el orden de la política y la
/// línea de tiempo de tramos ejecutados.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleOutcome {
    pub algorithm: SchedulingAlgorithm,
    pub processes: Vec<Process>,
    pub timeline: Vec<ExecutionSlice>,
}

impl ScheduleOutcome {
    /// Instante en que termina el último tramo (makespan).
    pub fn final_time(&self) -> u64 {
        self.timeline.iter().map(|slice| slice.end).max().unwrap_or(0)
    }
}

/// Ordena por llegada; los empates conservan el orden de entrada.
pub fn order_fcfs(processes: &mut [Process]) {
    processes.sort_by_key(|p| p.arrival_time);
}

/// Ordena por (llegada, ráfaga); los empates conservan el orden de entrada.
pub fn order_static_sjf(processes: &mut [Process]) {
    processes.sort_by_key(|p| (p.arrival_time, p.burst_time));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn processes(input: &[(u64, u64)]) -> Vec<Process> {
        input
            .iter()
            .enumerate()
            .map(|(i, &(arrival, burst))| Process::new(i + 1, arrival, burst))
            .collect()
    }

    fn ids(processes: &[Process]) -> Vec<usize> {
        processes.iter().map(|p| p.id).collect()
    }

    #[test]
    fn test_fcfs_order_is_stable() {
        let mut list = processes(&[(3, 1), (1, 9), (3, 2), (1, 4), (0, 7)]);
        order_fcfs(&mut list);
        assert_eq!(ids(&list), vec![5, 2, 4, 1, 3]);
    }

    #[test]
    fn test_sjf_order_by_arrival_then_burst() {
        let mut list = processes(&[(2, 6), (0, 8), (2, 3), (0, 8), (0, 1)]);
        order_static_sjf(&mut list);
        assert_eq!(ids(&list), vec![5, 2, 4, 3, 1]);
    }

    #[test]
    fn test_sjf_does_not_pick_shortest_ready_job() {
        // P2 y P3 están listos cuando P1 termina en t=10, pero el orden es estático.
        let calculator = MetricsCalculator::new();
        let outcome = SchedulingAlgorithm::sjf()
            .schedule(processes(&[(0, 10), (1, 9), (2, 1)]), &calculator)
            .unwrap();

        assert_eq!(ids(&outcome.processes), vec![1, 2, 3]);
        assert_eq!(outcome.processes[2].completion_time, 20);
    }

    #[test]
    fn test_from_name() {
        assert_eq!(SchedulingAlgorithm::from_name("FCFS", 2).unwrap(), SchedulingAlgorithm::Fcfs);
        assert_eq!(SchedulingAlgorithm::from_name("sjf", 2).unwrap(), SchedulingAlgorithm::StaticSjf);
        assert_eq!(
            SchedulingAlgorithm::from_name("rr", 3).unwrap(),
            SchedulingAlgorithm::RoundRobin { quantum: 3 }
        );
        assert!(SchedulingAlgorithm::from_name("priority", 2).is_err());
    }

    #[test]
    fn test_zero_quantum_rejected() {
        let calculator = MetricsCalculator::new();
        let err = SchedulingAlgorithm::round_robin(0)
            .schedule(processes(&[(0, 1)]), &calculator)
            .unwrap_err();
        assert!(matches!(err, SchedulerError::InvalidInput(_)));
    }

    #[test]
    fn test_empty_input_rejected() {
        let calculator = MetricsCalculator::new();
        assert!(SchedulingAlgorithm::fcfs().schedule(Vec::new(), &calculator).is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", SchedulingAlgorithm::fcfs()), "FCFS");
        assert_eq!(format!("{}", SchedulingAlgorithm::sjf()), "SJF");
        assert_eq!(
            format!("{}", SchedulingAlgorithm::round_robin(2)),
            "Round Robin (quantum 2)"
        );
        assert!(SchedulingAlgorithm::round_robin(2).is_preemptive());
    }
}
