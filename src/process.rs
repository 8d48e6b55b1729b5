//! # Módulo de Procesos
//!
//! Este módulo define los procesos que se planifican y el registro que
//! conserva la entrada canónica de la sesión. Cada ejecución de una política
//! trabaja sobre una copia propia del registro (`snapshot`), de modo que
//! ninguna ejecución ve el estado modificado por otra.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config;
use crate::error::{Result, SchedulerError};

/// Datos de entrada de un proceso, tal como los suministra el usuario.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessSpec {
    /// Instante en que el proceso queda listo
    pub arrival_time: u64,
    /// Tiempo total de CPU requerido
    pub burst_time: u64,
}

impl ProcessSpec {
    pub fn new(arrival_time: u64, burst_time: u64) -> Self {
        Self { arrival_time, burst_time }
    }

    /// Interpreta una lista en línea con el formato `llegada:ráfaga,llegada:ráfaga,...`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use cpu_scheduling_simulator::ProcessSpec;
    ///
    /// let specs = ProcessSpec::parse_list("0:5, 1:3,2:8").unwrap();
    /// assert_eq!(specs.len(), 3);
    /// assert_eq!(specs[1], ProcessSpec::new(1, 3));
    /// ```
    pub fn parse_list(text: &str) -> Result<Vec<Self>> {
        text.split(',')
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(Self::parse_pair)
            .collect()
    }

    fn parse_pair(item: &str) -> Result<Self> {
        let (arrival, burst) = item
            .split_once(':')
            .ok_or_else(|| SchedulerError::invalid(format!("expected arrival:burst, got '{}'", item)))?;

        let arrival_time = parse_time(arrival, "arrival time")?;
        let burst_time = parse_time(burst, "burst time")?;
        Ok(Self::new(arrival_time, burst_time))
    }

    /// Lee un arreglo JSON de `{ "arrival_time": .., "burst_time": .. }`.
    ///
    /// Un campo ausente, negativo o no entero es `InvalidInput`, igual que en
    /// la lista en línea.
    pub fn from_json_str(json: &str) -> Result<Vec<Self>> {
        serde_json::from_str(json)
            .map_err(|err| SchedulerError::invalid(format!("invalid process list: {}", err)))
    }

    /// Lee la lista de procesos desde un archivo JSON.
    pub fn read_json_file(path: impl AsRef<Path>) -> Result<Vec<Self>> {
        let content = fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }
}

/// Interpreta un tiempo entero no negativo.
pub fn parse_time(text: &str, what: &str) -> Result<u64> {
    let text = text.trim();
    text.parse::<u64>()
        .map_err(|_| SchedulerError::invalid(format!("{} must be a non-negative integer, got '{}'", what, text)))
}

/// Avanza el reloj simulado; `ResourceExhausted` si el resultado no cabe en `u64`.
pub fn advance_time(clock: u64, delta: u64) -> Result<u64> {
    clock.checked_add(delta).ok_or_else(|| {
        SchedulerError::ResourceExhausted(format!(
            "simulated time overflows at t={} + {}",
            clock, delta
        ))
    })
}

/// Representa un proceso dentro de una ejecución de planificación.
///
/// Los campos de entrada (`id`, `arrival_time`, `burst_time`) no cambian
/// nunca. `remaining_time` y `enqueued` solo los usa Round Robin y se
/// reinician al comienzo de cada ejecución. Los tiempos derivados se calculan
/// una vez por ejecución.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Process {
    /// Identificador único (1-indexado, en orden de entrada)
    pub id: usize,
    /// Instante de llegada
    pub arrival_time: u64,
    /// Tiempo de CPU requerido
    pub burst_time: u64,
    /// Tiempo restante (solo Round Robin)
    pub remaining_time: u64,
    /// Ya fue agregado a la cola de listos (solo Round Robin)
    pub enqueued: bool,
    /// Instante de finalización
    pub completion_time: u64,
    /// `completion_time - arrival_time`
    pub turnaround_time: u64,
    /// `turnaround_time - burst_time`
    pub waiting_time: u64,
}

impl Process {
    /// Crea un proceso sin métricas calculadas.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use cpu_scheduling_simulator::Process;
    ///
    /// let process = Process::new(1, 0, 5);
    /// assert_eq!(process.remaining_time, 5);
    /// assert!(!process.is_finished());
    /// ```
    pub fn new(id: usize, arrival_time: u64, burst_time: u64) -> Self {
        Self {
            id,
            arrival_time,
            burst_time,
            remaining_time: burst_time,
            enqueued: false,
            completion_time: 0,
            turnaround_time: 0,
            waiting_time: 0,
        }
    }

    /// Registra la finalización y deriva turnaround y espera.
    pub fn finish(&mut self, completion_time: u64) {
        debug_assert!(
            completion_time >= self.arrival_time.saturating_add(self.burst_time),
            "P{} cannot finish at {} (arrival {}, burst {})",
            self.id,
            completion_time,
            self.arrival_time,
            self.burst_time
        );

        self.remaining_time = 0;
        self.completion_time = completion_time;
        self.turnaround_time = completion_time - self.arrival_time;
        self.waiting_time = self.turnaround_time - self.burst_time;
    }

    /// Reinicia el estado propio de Round Robin y borra las métricas previas.
    pub fn reset_for_round_robin(&mut self) {
        self.remaining_time = self.burst_time;
        self.enqueued = false;
        self.completion_time = 0;
        self.turnaround_time = 0;
        self.waiting_time = 0;
    }

    /// Indica si el proceso ya terminó en la ejecución actual.
    pub fn is_finished(&self) -> bool {
        self.remaining_time == 0 && self.completion_time > 0
    }
}

/// Registro canónico de los procesos de la sesión.
///
/// Valida la entrada al registrar (ráfaga positiva, capacidad) y entrega
/// copias independientes para cada ejecución.
#[derive(Debug, Clone)]
pub struct ProcessRegistry {
    processes: Vec<Process>,
    capacity: usize,
}

impl ProcessRegistry {
    /// Crea un registro vacío con la capacidad por defecto.
    pub fn new() -> Self {
        Self::with_capacity(config::MAX_PROCESSES)
    }

    /// Crea un registro vacío que admite como máximo `capacity` procesos.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            processes: Vec::new(),
            capacity,
        }
    }

    /// Construye un registro completo a partir de la entrada.
    ///
    /// # Errors
    ///
    /// - `InvalidInput` si no hay procesos o alguna ráfaga es 0
    /// - `ResourceExhausted` si hay más procesos que `capacity`
    ///
    /// # Examples
    ///
    /// ```rust
    /// use cpu_scheduling_simulator::{ProcessRegistry, ProcessSpec};
    ///
    /// let specs = vec![ProcessSpec::new(0, 5), ProcessSpec::new(1, 3)];
    /// let registry = ProcessRegistry::from_specs(&specs, 100).unwrap();
    /// assert_eq!(registry.len(), 2);
    /// assert_eq!(registry.processes()[1].id, 2);
    ///
    /// assert!(ProcessRegistry::from_specs(&[], 100).is_err());
    /// ```
    pub fn from_specs(specs: &[ProcessSpec], capacity: usize) -> Result<Self> {
        if specs.is_empty() {
            return Err(SchedulerError::invalid("at least one process is required"));
        }
        if specs.len() > capacity {
            return Err(SchedulerError::ResourceExhausted(format!(
                "{} processes requested, capacity is {}",
                specs.len(),
                capacity
            )));
        }

        let mut registry = Self::with_capacity(capacity);
        for spec in specs {
            registry.register(*spec)?;
        }
        Ok(registry)
    }

    /// Agrega un proceso y devuelve el id asignado.
    pub fn register(&mut self, spec: ProcessSpec) -> Result<usize> {
        if self.processes.len() >= self.capacity {
            return Err(SchedulerError::ResourceExhausted(format!(
                "registry is full ({} processes)",
                self.capacity
            )));
        }
        validate_burst(spec.burst_time)?;

        let id = self.processes.len() + 1;
        self.processes.push(Process::new(id, spec.arrival_time, spec.burst_time));
        log::debug!(
            "Registrado P{} (llegada {}, ráfaga {})",
            id,
            spec.arrival_time,
            spec.burst_time
        );
        Ok(id)
    }

    /// Copia independiente de los procesos, en orden de entrada.
    pub fn snapshot(&self) -> Vec<Process> {
        self.processes.clone()
    }

    /// Vista de solo lectura de los procesos registrados.
    pub fn processes(&self) -> &[Process] {
        &self.processes
    }

    pub fn len(&self) -> usize {
        self.processes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.processes.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Falla con `InvalidInput` si el registro está vacío.
    pub fn ensure_not_empty(&self) -> Result<()> {
        if self.is_empty() {
            Err(SchedulerError::invalid("no processes registered"))
        } else {
            Ok(())
        }
    }
}

impl Default for ProcessRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Una ráfaga de 0 rompería `completion >= arrival + burst` con sentido.
pub fn validate_burst(burst_time: u64) -> Result<()> {
    if burst_time == 0 {
        Err(SchedulerError::invalid("burst time must be > 0"))
    } else {
        Ok(())
    }
}
