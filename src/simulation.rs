//! # Módulo de Simulación Principal
//!
//! Este módulo coordina una sesión de planificación: conserva el registro de
//! procesos, ejecuta cada política sobre una copia independiente y genera
//! los reportes.

use crate::config::{self, OutputFormat};
use crate::error::Result;
use crate::metrics::{MetricsCalculator, SimulationMetrics};
use crate::process::{ProcessRegistry, ProcessSpec};
use crate::scheduler::SchedulingAlgorithm;

/// Orquestador de la simulación.
///
/// La `Simulation` es dueña del registro canónico. Cada llamada a `run`
/// trabaja sobre un `snapshot`, de modo que ejecutar FCFS y luego Round Robin
/// en la misma sesión nunca comparte estado entre ejecuciones.
pub struct Simulation {
    /// Procesos de entrada de la sesión
    registry: ProcessRegistry,
    /// Calculadora de métricas para generar reportes
    metrics_calculator: MetricsCalculator,
}

impl Simulation {
    /// Crea una simulación sobre un registro ya construido.
    pub fn new(registry: ProcessRegistry) -> Self {
        Self {
            registry,
            metrics_calculator: MetricsCalculator::new(),
        }
    }

    /// Crea una simulación validando la entrada.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use cpu_scheduling_simulator::{ProcessSpec, Simulation, SchedulingAlgorithm};
    ///
    /// let specs = ProcessSpec::parse_list("0:5,1:3,2:8").unwrap();
    /// let simulation = Simulation::from_specs(&specs, 100).unwrap();
    /// let metrics = simulation.run(SchedulingAlgorithm::fcfs()).unwrap();
    /// assert_eq!(metrics.processes[2].completion_time, 16);
    /// ```
    pub fn from_specs(specs: &[ProcessSpec], capacity: usize) -> Result<Self> {
        Ok(Self::new(ProcessRegistry::from_specs(specs, capacity)?))
    }

    /// Simulación con los procesos de demostración.
    pub fn with_default_processes() -> Result<Self> {
        Self::from_specs(&config::default_processes(), config::MAX_PROCESSES)
    }

    /// Registro de procesos de la sesión.
    pub fn registry(&self) -> &ProcessRegistry {
        &self.registry
    }

    /// Ejecuta una política y retorna las métricas resultantes.
    ///
    /// # Errors
    ///
    /// `InvalidInput` si el registro está vacío o el quantum es 0, y
    /// `ResourceExhausted` si el tiempo simulado se desborda.
    pub fn run(&self, algorithm: SchedulingAlgorithm) -> Result<SimulationMetrics> {
        self.registry.ensure_not_empty()?;

        log::info!(
            "Ejecutando {} sobre {} procesos",
            algorithm.description(),
            self.registry.len()
        );

        let outcome = algorithm.schedule(self.registry.snapshot(), &self.metrics_calculator)?;
        let metrics = self.metrics_calculator.calculate_simulation_metrics(&outcome)?;

        log::info!(
            "{} completado: espera promedio {:.2}, makespan {}",
            algorithm,
            metrics.average_waiting_time,
            metrics.makespan
        );
        Ok(metrics)
    }

    /// Ejecuta FCFS, SJF y Round Robin sobre los mismos procesos.
    pub fn run_all(&self, quantum: u64) -> Result<Vec<SimulationMetrics>> {
        [
            SchedulingAlgorithm::fcfs(),
            SchedulingAlgorithm::sjf(),
            SchedulingAlgorithm::round_robin(quantum),
        ]
        .into_iter()
        .map(|algorithm| self.run(algorithm))
        .collect()
    }

    /// Genera el reporte de una ejecución en el formato pedido.
    pub fn render(&self, metrics: &SimulationMetrics, format: OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Table => Ok(self.generate_report(metrics)),
            OutputFormat::Csv => Ok(self.generate_csv_report(metrics)),
            OutputFormat::Json => self.generate_json_report(metrics),
        }
    }

    /// Genera un reporte detallado de los resultados.
    pub fn generate_report(&self, metrics: &SimulationMetrics) -> String {
        self.metrics_calculator.generate_report(metrics)
    }

    /// Genera un reporte en formato CSV.
    pub fn generate_csv_report(&self, metrics: &SimulationMetrics) -> String {
        self.metrics_calculator.generate_csv_report(metrics)
    }

    /// Genera un reporte en formato JSON.
    pub fn generate_json_report(&self, metrics: &SimulationMetrics) -> Result<String> {
        self.metrics_calculator.generate_json_report(metrics)
    }

    /// Tabla comparativa de varias ejecuciones.
    pub fn generate_comparison(&self, runs: &[SimulationMetrics]) -> String {
        self.metrics_calculator.generate_comparison(runs)
    }
}
