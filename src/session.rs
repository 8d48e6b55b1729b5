//! # Sesión Interactiva
//!
//! Frontera de petición/respuesta con el usuario: lee los procesos una vez y
//! luego muestra el menú de algoritmos hasta que se elige salir. La entrada
//! inválida se informa y se vuelve a pedir; los algoritmos nunca validan
//! texto del usuario.
//!
//! La sesión es genérica sobre `BufRead`/`Write` para poder probarla con
//! buffers en memoria.

use std::io::{BufRead, Write};

use crate::config::OutputFormat;
use crate::error::{Result, SchedulerError};
use crate::process::{self, ProcessRegistry, ProcessSpec};
use crate::scheduler::SchedulingAlgorithm;
use crate::simulation::Simulation;

/// Opciones del menú principal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    Fcfs,
    Sjf,
    RoundRobin,
    Exit,
}

impl MenuChoice {
    /// Interpreta la opción tecleada (`1` a `4`).
    ///
    /// # Examples
    ///
    /// ```rust
    /// use cpu_scheduling_simulator::session::MenuChoice;
    ///
    /// assert_eq!(MenuChoice::parse(" 3 ").unwrap(), MenuChoice::RoundRobin);
    /// assert!(MenuChoice::parse("7").is_err());
    /// ```
    pub fn parse(text: &str) -> Result<Self> {
        match text.trim() {
            "1" => Ok(Self::Fcfs),
            "2" => Ok(Self::Sjf),
            "3" => Ok(Self::RoundRobin),
            "4" => Ok(Self::Exit),
            other => Err(SchedulerError::invalid(format!("invalid menu choice '{}'", other))),
        }
    }
}

const MENU: &str = "\nAlgoritmos de planificación de CPU:\n\
                    1. First-Come-First-Serve (FCFS)\n\
                    2. Shortest Job First (SJF)\n\
                    3. Round Robin (RR)\n\
                    4. Salir\n";

/// Sesión interactiva sobre una entrada y una salida cualquiera.
pub struct InteractiveSession<R, W> {
    input: R,
    output: W,
    format: OutputFormat,
    capacity: usize,
}

impl<R: BufRead, W: Write> InteractiveSession<R, W> {
    pub fn new(input: R, output: W, format: OutputFormat, capacity: usize) -> Self {
        Self {
            input,
            output,
            format,
            capacity,
        }
    }

    /// Ejecuta la sesión completa. El fin de la entrada equivale a salir.
    ///
    /// Pedir más procesos que la capacidad se trata como cualquier otra
    /// cantidad inválida, y una ejecución cuyo tiempo simulado se desborda se
    /// informa sin cerrar la sesión.
    ///
    /// # Errors
    ///
    /// Errores de E/S.
    pub fn run(&mut self) -> Result<()> {
        let Some(registry) = self.read_registry()? else {
            return Ok(());
        };
        let simulation = Simulation::new(registry);

        loop {
            self.output.write_all(MENU.as_bytes())?;
            let Some(line) = self.prompt_line("Elija una opción: ")? else {
                return Ok(());
            };

            let choice = match MenuChoice::parse(&line) {
                Ok(choice) => choice,
                Err(err) => {
                    log::warn!("{}", err);
                    writeln!(self.output, "Opción inválida. Intente de nuevo.")?;
                    continue;
                }
            };

            let algorithm = match choice {
                MenuChoice::Fcfs => SchedulingAlgorithm::fcfs(),
                MenuChoice::Sjf => SchedulingAlgorithm::sjf(),
                MenuChoice::RoundRobin => {
                    match self.prompt_number("Quantum para Round Robin: ", |q| {
                        if q == 0 {
                            Err(SchedulerError::invalid("quantum must be > 0"))
                        } else {
                            Ok(())
                        }
                    })? {
                        Some(quantum) => SchedulingAlgorithm::round_robin(quantum),
                        None => return Ok(()),
                    }
                }
                MenuChoice::Exit => return Ok(()),
            };

            let metrics = match simulation.run(algorithm) {
                Ok(metrics) => metrics,
                Err(SchedulerError::ResourceExhausted(msg)) => {
                    log::warn!("{}: {}", algorithm, msg);
                    writeln!(self.output, "No se pudo simular {}: {}", algorithm, msg)?;
                    continue;
                }
                Err(err) => return Err(err),
            };
            let report = simulation.render(&metrics, self.format)?;
            writeln!(self.output, "{}", report)?;
        }
    }

    /// Pide la cantidad de procesos y los tiempos de cada uno.
    ///
    /// Devuelve `None` si la entrada termina antes de completar el registro.
    pub fn read_registry(&mut self) -> Result<Option<ProcessRegistry>> {
        let capacity = self.capacity;
        let Some(count) = self.prompt_number("Número de procesos: ", |n| {
            if n == 0 {
                Err(SchedulerError::invalid("at least one process is required"))
            } else if usize::try_from(n).map_or(true, |n| n > capacity) {
                Err(SchedulerError::invalid(format!(
                    "{} processes requested, capacity is {}",
                    n, capacity
                )))
            } else {
                Ok(())
            }
        })?
        else {
            return Ok(None);
        };

        let mut registry = ProcessRegistry::with_capacity(capacity);
        for id in 1..=count {
            let Some(arrival_time) =
                self.prompt_number(&format!("Tiempo de llegada de P{}: ", id), |_| Ok(()))?
            else {
                return Ok(None);
            };
            let Some(burst_time) =
                self.prompt_number(&format!("Tiempo de ráfaga de P{}: ", id), process::validate_burst)?
            else {
                return Ok(None);
            };
            registry.register(ProcessSpec::new(arrival_time, burst_time))?;
        }

        Ok(Some(registry))
    }

    /// Pide un entero no negativo hasta que sea válido según `check`.
    fn prompt_number(
        &mut self,
        prompt: &str,
        check: impl Fn(u64) -> Result<()>,
    ) -> Result<Option<u64>> {
        loop {
            let Some(line) = self.prompt_line(prompt)? else {
                return Ok(None);
            };

            match process::parse_time(&line, "value").and_then(|n| check(n).map(|()| n)) {
                Ok(n) => return Ok(Some(n)),
                Err(err) if err.is_recoverable() => {
                    log::warn!("{}", err);
                    writeln!(self.output, "Entrada inválida: {}", err)?;
                }
                Err(err) => return Err(err),
            }
        }
    }

    /// Escribe el prompt y lee una línea; `None` al llegar al fin de la entrada.
    fn prompt_line(&mut self, prompt: &str) -> Result<Option<String>> {
        write!(self.output, "{}", prompt)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    /// Devuelve la salida, para inspeccionarla en pruebas.
    pub fn into_output(self) -> W {
        self.output
    }
}
