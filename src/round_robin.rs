//! # Simulador Round Robin
//!
//! Simula paso a paso una CPU con cola de listos FIFO y quantum fijo. A
//! diferencia de FCFS y SJF, los tiempos de finalización salen directamente
//! de la simulación.
//!
//! Orden dentro de cada paso:
//! 1. Se saca el proceso al frente de la cola y se ejecuta `min(restante, quantum)`
//! 2. Se encolan, en orden de entrada, los procesos que ya llegaron
//! 3. Si el proceso ejecutado no terminó, vuelve al final de la cola
//!
//! Así los procesos recién llegados quedan por delante del proceso interrumpido.

use std::collections::VecDeque;

use crate::error::{Result, SchedulerError};
use crate::process::{advance_time, Process};
use crate::scheduler::ExecutionSlice;

/// Estado de una ejecución de Round Robin.
///
/// La cola guarda índices dentro de `processes`, que conserva el orden de
/// entrada durante toda la simulación.
#[derive(Debug)]
pub struct RoundRobinSimulator {
    quantum: u64,
    processes: Vec<Process>,
    queue: VecDeque<usize>,
    clock: u64,
    unfinished: usize,
    timeline: Vec<ExecutionSlice>,
}

impl RoundRobinSimulator {
    /// Prepara una simulación sobre una copia de los procesos.
    ///
    /// Reinicia el estado propio de Round Robin de cada proceso y encola en
    /// orden de entrada los que llegan en el instante 0.
    ///
    /// # Errors
    ///
    /// `InvalidInput` si el quantum es 0 o alguna ráfaga es 0.
    pub fn new(quantum: u64, mut processes: Vec<Process>) -> Result<Self> {
        if quantum == 0 {
            return Err(SchedulerError::invalid("quantum must be > 0"));
        }
        if let Some(process) = processes.iter().find(|p| p.burst_time == 0) {
            return Err(SchedulerError::invalid(format!("P{} has a burst time of 0", process.id)));
        }

        for process in processes.iter_mut() {
            process.reset_for_round_robin();
        }

        let unfinished = processes.len();
        let mut simulator = Self {
            quantum,
            processes,
            queue: VecDeque::new(),
            clock: 0,
            unfinished,
            timeline: Vec::new(),
        };
        simulator.admit_arrivals();
        Ok(simulator)
    }

    /// Ejecuta hasta que todos los procesos terminan.
    ///
    /// # Errors
    ///
    /// `ResourceExhausted` si el reloj simulado se desborda.
    pub fn run(&mut self) -> Result<()> {
        log::debug!(
            "Round Robin: {} procesos, quantum {}",
            self.processes.len(),
            self.quantum
        );

        while self.unfinished > 0 {
            if self.queue.is_empty() && !self.idle_until_next_arrival() {
                break;
            }
            self.step()?;
        }

        log::debug!("Round Robin terminó en t={}", self.clock);
        Ok(())
    }

    /// Ejecuta un turno del proceso al frente de la cola.
    ///
    /// Devuelve `false` si la cola estaba vacía. Si el reloj se desborda,
    /// devuelve `ResourceExhausted` sin modificar el estado.
    pub fn step(&mut self) -> Result<bool> {
        let Some(&index) = self.queue.front() else {
            return Ok(false);
        };

        let start = self.clock;
        let process = &mut self.processes[index];
        let slice = process.remaining_time.min(self.quantum);
        let end = advance_time(start, slice)?;

        self.queue.pop_front();
        self.clock = end;
        process.remaining_time -= slice;
        if process.remaining_time == 0 {
            process.finish(end);
            self.unfinished -= 1;
        }

        let process_id = process.id;
        let remaining = process.remaining_time;
        self.timeline.push(ExecutionSlice {
            process_id,
            start,
            end: self.clock,
        });
        log::trace!(
            "t={}..{}: P{} ejecutó (restante: {})",
            start,
            self.clock,
            process_id,
            remaining
        );

        self.admit_arrivals();

        if remaining > 0 {
            self.queue.push_back(index);
        }
        Ok(true)
    }

    /// Encola, en orden de entrada, los procesos que ya llegaron y no se han encolado.
    fn admit_arrivals(&mut self) {
        for (index, process) in self.processes.iter_mut().enumerate() {
            if !process.enqueued && process.arrival_time <= self.clock {
                process.enqueued = true;
                self.queue.push_back(index);
                log::trace!("t={}: P{} entra a la cola", self.clock, process.id);
            }
        }
    }

    /// CPU ociosa: adelanta el reloj hasta la próxima llegada pendiente.
    fn idle_until_next_arrival(&mut self) -> bool {
        let next_arrival = self
            .processes
            .iter()
            .filter(|p| !p.enqueued)
            .map(|p| p.arrival_time)
            .min();

        match next_arrival {
            Some(arrival) => {
                log::trace!("t={}: CPU ociosa hasta t={}", self.clock, arrival);
                self.clock = self.clock.max(arrival);
                self.admit_arrivals();
                true
            }
            None => false,
        }
    }

    /// Tiempo simulado actual.
    pub fn clock(&self) -> u64 {
        self.clock
    }

    /// Procesos aún sin terminar.
    pub fn unfinished(&self) -> usize {
        self.unfinished
    }

    /// Ids en la cola de listos, del frente al final.
    pub fn ready_queue(&self) -> Vec<usize> {
        self.queue.iter().map(|&index| self.processes[index].id).collect()
    }

    /// Consume el simulador y devuelve los procesos (orden de entrada) y los tramos.
    pub fn into_parts(self) -> (Vec<Process>, Vec<ExecutionSlice>) {
        (self.processes, self.timeline)
    }
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

    fn simulate(quantum: u64, input: &[(u64, u64)]) -> (Vec<Process>, Vec<ExecutionSlice>) {
        let mut simulator = RoundRobinSimulator::new(quantum, processes(input)).unwrap();
        simulator.run().unwrap();
        simulator.into_parts()
    }

    #[test]
    fn test_two_processes_quantum_two() {
        let (done, timeline) = simulate(2, &[(0, 5), (1, 3)]);

        assert_eq!(done[0].completion_time, 8);
        assert_eq!(done[1].completion_time, 7);

        let order: Vec<usize> = timeline.iter().map(|s| s.process_id).collect();
        assert_eq!(order, vec![1, 2, 1, 2, 1]);
    }

    #[test]
    fn test_new_arrivals_go_before_preempted_process() {
        let mut simulator = RoundRobinSimulator::new(2, processes(&[(0, 4), (1, 2), (2, 2)])).unwrap();
        assert_eq!(simulator.ready_queue(), vec![1]);

        assert!(simulator.step().unwrap());
        assert_eq!(simulator.clock(), 2);
        assert_eq!(simulator.ready_queue(), vec![2, 3, 1]);
    }

    #[test]
    fn test_initial_queue_in_input_order() {
        let simulator = RoundRobinSimulator::new(1, processes(&[(0, 2), (3, 1), (0, 1)])).unwrap();
        assert_eq!(simulator.ready_queue(), vec![1, 3]);
        assert_eq!(simulator.unfinished(), 3);
    }

    #[test]
    fn test_idle_until_first_arrival() {
        let (done, timeline) = simulate(3, &[(5, 2), (6, 4)]);

        assert_eq!(timeline[0].start, 5);
        assert_eq!(done[0].completion_time, 7);
        assert_eq!(done[1].completion_time, 11);
        assert_eq!(done[1].waiting_time, 1);
    }

    #[test]
    fn test_idle_gap_between_processes() {
        let (done, _) = simulate(2, &[(0, 1), (10, 1)]);
        assert_eq!(done[0].completion_time, 1);
        assert_eq!(done[1].completion_time, 11);
    }

    #[test]
    fn test_slices_sum_to_burst() {
        let input = [(0, 7), (2, 4), (4, 1), (5, 9), (5, 3)];
        let quantum = 3;
        let (done, timeline) = simulate(quantum, &input);

        for process in &done {
            let slices: Vec<&ExecutionSlice> =
                timeline.iter().filter(|s| s.process_id == process.id).collect();
            let total: u64 = slices.iter().map(|s| s.len()).sum();
            assert_eq!(total, process.burst_time);
            assert!(slices.iter().all(|s| s.len() <= quantum && !s.is_empty()));
            assert_eq!(slices.last().unwrap().end, process.completion_time);
        }

        let makespan = done.iter().map(|p| p.completion_time).max().unwrap();
        assert_eq!(timeline.last().unwrap().end, makespan);
    }

    #[test]
    fn test_large_queue_growth() {
        // Muchos reencolados con quantum 1: la cola crece sin límite fijo.
        let input: Vec<(u64, u64)> = (0..50).map(|i| (0, 20 + i)).collect();
        let (done, timeline) = simulate(1, &input);

        let total_burst: u64 = input.iter().map(|&(_, b)| b).sum();
        assert_eq!(timeline.len() as u64, total_burst);
        assert!(done.iter().all(|p| p.is_finished()));
    }

    #[test]
    fn test_rejects_zero_quantum() {
        assert!(RoundRobinSimulator::new(0, processes(&[(0, 1)])).is_err());
    }

    #[test]
    fn test_step_on_empty_queue() {
        let mut simulator = RoundRobinSimulator::new(2, processes(&[(4, 1)])).unwrap();
        assert!(!simulator.step().unwrap());
        simulator.run().unwrap();
        assert_eq!(simulator.clock(), 5);
    }

    #[test]
    fn test_clock_overflow_is_an_error() {
        let mut simulator = RoundRobinSimulator::new(2, processes(&[(u64::MAX, 1)])).unwrap();
        let err = simulator.run().unwrap_err();
        assert!(matches!(err, SchedulerError::ResourceExhausted(_)));

        // El paso fallido no consume el proceso ni mueve el reloj.
        assert_eq!(simulator.clock(), u64::MAX);
        assert_eq!(simulator.unfinished(), 1);
        assert_eq!(simulator.ready_queue(), vec![1]);
    }

    #[test]
    fn test_runs_up_to_the_last_representable_instant() {
        let start = u64::MAX - 5;
        let (done, timeline) = simulate(2, &[(start, 3), (start, 2)]);
        assert_eq!(done[0].completion_time, u64::MAX);
        assert_eq!(done[1].completion_time, u64::MAX - 1);
        assert_eq!(timeline.last().unwrap().end, u64::MAX);
    }
}
