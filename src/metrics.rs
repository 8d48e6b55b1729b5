//! # Módulo de Métricas y Reportes
//!
//! Este módulo calcula los tiempos de finalización para las políticas que
//! solo ordenan (FCFS y SJF), agrega las métricas de una ejecución y genera
//! los reportes en texto, CSV y JSON.

use serde::Serialize;

use crate::error::{Result, SchedulerError};
use crate::process::{advance_time, Process};
use crate::scheduler::{ExecutionSlice, ScheduleOutcome, SchedulingAlgorithm};

/// Métricas individuales de un proceso en una ejecución.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProcessMetrics {
    pub process_id: usize,
    pub arrival_time: u64,
    pub burst_time: u64,
    pub completion_time: u64,
    pub turnaround_time: u64,
    pub waiting_time: u64,
}

impl From<&Process> for ProcessMetrics {
    fn from(process: &Process) -> Self {
        Self {
            process_id: process.id,
            arrival_time: process.arrival_time,
            burst_time: process.burst_time,
            completion_time: process.completion_time,
            turnaround_time: process.turnaround_time,
            waiting_time: process.waiting_time,
        }
    }
}

/// Métricas agregadas de una ejecución completa.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationMetrics {
    /// Política que produjo la ejecución
    pub algorithm: SchedulingAlgorithm,
    /// Filas en el orden que produjo la política
    pub processes: Vec<ProcessMetrics>,
    /// Tiempo promedio de espera
    pub average_waiting_time: f64,
    /// Tiempo promedio de turnaround
    pub average_turnaround_time: f64,
    /// N / finalización de la última fila (no del makespan)
    pub throughput: f64,
    /// Mayor tiempo de finalización
    pub makespan: u64,
    /// Ids ordenados por tiempo de finalización
    pub completion_order: Vec<usize>,
    /// Tramos de CPU en orden cronológico
    pub timeline: Vec<ExecutionSlice>,
}

/// Calculadora de métricas para la simulación.
///
/// Proporciona el cálculo de finalización en orden fijo, las métricas
/// agregadas y la generación de reportes formateados.
pub struct MetricsCalculator;

impl MetricsCalculator {
    /// Crea una nueva instancia del calculador de métricas.
    pub fn new() -> Self {
        Self
    }

    /// Ejecuta los procesos en el orden dado sobre un único servidor.
    ///
    /// Cada proceso empieza en `max(reloj, llegada)` y corre su ráfaga
    /// completa; la CPU queda ociosa hasta la siguiente llegada si hace falta.
    /// No se verifica que el orden sea factible.
    ///
    /// # Returns
    ///
    /// Un tramo de ejecución por proceso, en el mismo orden
    ///
    /// # Errors
    ///
    /// `ResourceExhausted` si algún tiempo de finalización no cabe en `u64`
    ///
    /// # Examples
    ///
    /// ```rust
    /// use cpu_scheduling_simulator::{MetricsCalculator, Process};
    ///
    /// let mut processes = vec![Process::new(1, 0, 5), Process::new(2, 9, 3)];
    /// let timeline = MetricsCalculator::new().apply_in_order(&mut processes).unwrap();
    ///
    /// assert_eq!(processes[0].completion_time, 5);
    /// assert_eq!(processes[1].completion_time, 12);
    /// assert_eq!(timeline[1].start, 9);
    /// ```
    pub fn apply_in_order(&self, processes: &mut [Process]) -> Result<Vec<ExecutionSlice>> {
        let mut current_time = 0;
        let mut timeline = Vec::with_capacity(processes.len());

        for process in processes.iter_mut() {
            let start = current_time.max(process.arrival_time);
            process.finish(advance_time(start, process.burst_time)?);
            current_time = process.completion_time;

            timeline.push(ExecutionSlice {
                process_id: process.id,
                start,
                end: current_time,
            });
        }

        Ok(timeline)
    }

    /// Calcula las métricas agregadas de una ejecución.
    ///
    /// # Errors
    ///
    /// `InvalidInput` si la ejecución no tiene procesos: los promedios y el
    /// throughput no están definidos.
    pub fn calculate_simulation_metrics(&self, outcome: &ScheduleOutcome) -> Result<SimulationMetrics> {
        let last = outcome
            .processes
            .last()
            .ok_or_else(|| SchedulerError::invalid("cannot compute metrics without processes"))?;

        let count = outcome.processes.len() as f64;
        // u128: la suma de tiempos u64 puede desbordar u64
        let total_waiting: u128 = outcome.processes.iter().map(|p| u128::from(p.waiting_time)).sum();
        let total_turnaround: u128 = outcome.processes.iter().map(|p| u128::from(p.turnaround_time)).sum();

        // Throughput sobre la finalización de la última fila, como en el reporte original.
        let throughput = if last.completion_time > 0 {
            count / last.completion_time as f64
        } else {
            0.0
        };

        let makespan = outcome
            .processes
            .iter()
            .map(|p| p.completion_time)
            .max()
            .unwrap_or(0);

        let mut by_completion: Vec<&Process> = outcome.processes.iter().collect();
        by_completion.sort_by_key(|p| p.completion_time);
        let completion_order = by_completion.iter().map(|p| p.id).collect();

        Ok(SimulationMetrics {
            algorithm: outcome.algorithm,
            processes: outcome.processes.iter().map(ProcessMetrics::from).collect(),
            average_waiting_time: total_waiting as f64 / count,
            average_turnaround_time: total_turnaround as f64 / count,
            throughput,
            makespan,
            completion_order,
            timeline: outcome.timeline.clone(),
        })
    }

    /// Genera el reporte de texto de una ejecución.
    pub fn generate_report(&self, metrics: &SimulationMetrics) -> String {
        let mut report = String::new();

        report.push_str(&format!("\n=== {} ===\n", metrics.algorithm.label()));
        if let Some(quantum) = metrics.algorithm.quantum() {
            report.push_str(&format!("Quantum: {}\n", quantum));
        }
        report.push('\n');

        report.push_str(&format!(
            "{:<6} {:>10} {:>10} {:>14} {:>12} {:>10}\n",
            "P", "Llegada", "Ráfaga", "Finalización", "Turnaround", "Espera"
        ));
        report.push_str(&format!("{}\n", "-".repeat(67)));

        for row in &metrics.processes {
            report.push_str(&format!(
                "{:<6} {:>10} {:>10} {:>14} {:>12} {:>10}\n",
                format!("P{}", row.process_id),
                row.arrival_time,
                row.burst_time,
                row.completion_time,
                row.turnaround_time,
                row.waiting_time,
            ));
        }

        report.push_str("\n=== ESTADÍSTICAS RESUMIDAS ===\n");
        report.push_str(&format!(
            "Tiempo promedio de espera: {:.2}\n",
            metrics.average_waiting_time
        ));
        report.push_str(&format!(
            "Tiempo promedio de turnaround: {:.2}\n",
            metrics.average_turnaround_time
        ));
        report.push_str(&format!(
            "Throughput: {:.2} procesos/unidad de tiempo\n",
            metrics.throughput
        ));
        report.push_str(&format!("Makespan: {}\n", metrics.makespan));
        report.push_str(&format!(
            "Orden de finalización: {:?}\n",
            metrics.completion_order
        ));
        report.push_str(&format!(
            "Línea de tiempo: {}\n",
            Self::format_timeline(&metrics.timeline)
        ));

        report
    }

    /// Genera el reporte en formato CSV (encabezado + una línea por proceso).
    pub fn generate_csv_report(&self, metrics: &SimulationMetrics) -> String {
        let mut csv = String::new();

        csv.push_str("ProcessID,Arrival,Burst,Completion,Turnaround,Waiting\n");
        for row in &metrics.processes {
            csv.push_str(&format!(
                "{},{},{},{},{},{}\n",
                row.process_id,
                row.arrival_time,
                row.burst_time,
                row.completion_time,
                row.turnaround_time,
                row.waiting_time
            ));
        }

        csv
    }

    /// Serializa las métricas completas como JSON.
    pub fn generate_json_report(&self, metrics: &SimulationMetrics) -> Result<String> {
        Ok(serde_json::to_string_pretty(metrics)?)
    }

    /// Tabla comparativa de varias ejecuciones sobre los mismos procesos.
    pub fn generate_comparison(&self, runs: &[SimulationMetrics]) -> String {
        let mut table = String::new();

        table.push_str("\n=== Comparación de Algoritmos ===\n");
        table.push_str(&format!(
            "| {:<26} | {:>10} | {:>10} | {:>10} | {:>8} |\n",
            "Algoritmo", "Espera", "Turnaround", "Throughput", "Makespan"
        ));
        table.push_str(&format!(
            "|{}|{}|{}|{}|{}|\n",
            "-".repeat(28),
            "-".repeat(12),
            "-".repeat(12),
            "-".repeat(12),
            "-".repeat(10)
        ));

        for run in runs {
            table.push_str(&format!(
                "| {:<26} | {:>10.2} | {:>10.2} | {:>10.2} | {:>8} |\n",
                run.algorithm.to_string(),
                run.average_waiting_time,
                run.average_turnaround_time,
                run.throughput,
                run.makespan
            ));
        }

        table
    }

    /// Formatea una línea de tiempo como `P1[0-2] P2[2-4] ...`.
    pub fn format_timeline(timeline: &[ExecutionSlice]) -> String {
        timeline
            .iter()
            .map(|slice| format!("P{}[{}-{}]", slice.process_id, slice.start, slice.end))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl Default for MetricsCalculator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome_from(algorithm: SchedulingAlgorithm, processes: Vec<Process>) -> ScheduleOutcome {
        let calculator = MetricsCalculator::new();
        algorithm.schedule(processes, &calculator).unwrap()
    }

    fn scenario() -> Vec<Process> {
        vec![
            Process::new(1, 0, 5),
            Process::new(2, 1, 3),
            Process::new(3, 2, 8),
        ]
    }

    #[test]
    fn test_apply_in_order_with_idle_gap() {
        let mut processes = vec![Process::new(1, 3, 2), Process::new(2, 4, 1)];
        let timeline = MetricsCalculator::new().apply_in_order(&mut processes).unwrap();

        assert_eq!(timeline[0], ExecutionSlice { process_id: 1, start: 3, end: 5 });
        assert_eq!(processes[1].completion_time, 6);
        assert_eq!(processes[1].waiting_time, 1);
    }

    #[test]
    fn test_apply_in_order_time_overflow() {
        let calculator = MetricsCalculator::new();

        let mut processes = vec![Process::new(1, u64::MAX, 1)];
        let err = calculator.apply_in_order(&mut processes).unwrap_err();
        assert!(matches!(err, SchedulerError::ResourceExhausted(_)));

        // El desborde también puede venir del reloj acumulado.
        let mut processes = vec![Process::new(1, 0, u64::MAX), Process::new(2, 0, 1)];
        assert!(calculator.apply_in_order(&mut processes).is_err());

        let mut processes = vec![Process::new(1, u64::MAX - 1, 1)];
        let timeline = calculator.apply_in_order(&mut processes).unwrap();
        assert_eq!(timeline[0].end, u64::MAX);
    }

    #[test]
    fn test_simulation_metrics() {
        let calculator = MetricsCalculator::new();
        let outcome = outcome_from(SchedulingAlgorithm::fcfs(), scenario());
        let metrics = calculator.calculate_simulation_metrics(&outcome).unwrap();

        assert!((metrics.average_waiting_time - 10.0 / 3.0).abs() < 1e-9);
        assert!((metrics.average_turnaround_time - 26.0 / 3.0).abs() < 1e-9);
        assert!((metrics.throughput - 3.0 / 16.0).abs() < 1e-9);
        assert_eq!(metrics.makespan, 16);
        assert_eq!(metrics.completion_order, vec![1, 2, 3]);
    }

    #[test]
    fn test_throughput_uses_last_row() {
        // En RR las filas siguen el orden de entrada: la última fila no es la que termina al final.
        let calculator = MetricsCalculator::new();
        let outcome = outcome_from(
            SchedulingAlgorithm::round_robin(2),
            vec![Process::new(1, 0, 5), Process::new(2, 1, 3)],
        );
        let metrics = calculator.calculate_simulation_metrics(&outcome).unwrap();

        assert_eq!(metrics.makespan, 8);
        assert!((metrics.throughput - 2.0 / 7.0).abs() < 1e-9);
        assert_eq!(metrics.completion_order, vec![2, 1]);
    }

    #[test]
    fn test_empty_outcome_rejected() {
        let outcome = ScheduleOutcome {
            algorithm: SchedulingAlgorithm::fcfs(),
            processes: Vec::new(),
            timeline: Vec::new(),
        };
        let err = MetricsCalculator::new()
            .calculate_simulation_metrics(&outcome)
            .unwrap_err();
        assert!(matches!(err, SchedulerError::InvalidInput(_)));
    }

    #[test]
    fn test_text_report() {
        let calculator = MetricsCalculator::new();
        let outcome = outcome_from(SchedulingAlgorithm::fcfs(), scenario());
        let metrics = calculator.calculate_simulation_metrics(&outcome).unwrap();
        let report = calculator.generate_report(&metrics);

        assert!(report.contains("First-Come-First-Serve (FCFS)"));
        assert!(report.contains("Tiempo promedio de espera: 3.33"));
        assert!(report.contains("Tiempo promedio de turnaround: 8.67"));
        assert!(report.contains("procesos/unidad de tiempo"));
        assert!(report.contains("Makespan: 16"));
        assert!(report.contains("P1[0-5] P2[5-8] P3[8-16]"));
    }

    #[test]
    fn test_csv_report() {
        let calculator = MetricsCalculator::new();
        let outcome = outcome_from(SchedulingAlgorithm::sjf(), scenario());
        let metrics = calculator.calculate_simulation_metrics(&outcome).unwrap();
        let csv = calculator.generate_csv_report(&metrics);

        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "ProcessID,Arrival,Burst,Completion,Turnaround,Waiting");
        assert_eq!(lines[3], "3,2,8,16,14,6");
    }

    #[test]
    fn test_json_report() {
        let calculator = MetricsCalculator::new();
        let outcome = outcome_from(SchedulingAlgorithm::round_robin(2), scenario());
        let metrics = calculator.calculate_simulation_metrics(&outcome).unwrap();
        let json = calculator.generate_json_report(&metrics).unwrap();

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["algorithm"]["round_robin"]["quantum"], 2);
        assert_eq!(value["processes"].as_array().unwrap().len(), 3);
    }

    #[test]
    fn test_format_timeline() {
        let timeline = vec![
            ExecutionSlice { process_id: 1, start: 0, end: 2 },
            ExecutionSlice { process_id: 2, start: 2, end: 3 },
        ];
        assert_eq!(MetricsCalculator::format_timeline(&timeline), "P1[0-2] P2[2-3]");
        assert_eq!(MetricsCalculator::format_timeline(&[]), "");
    }
}
