use std::io;
use std::process;

use cpu_scheduling_simulator::config::{Config, OutputFormat};
use cpu_scheduling_simulator::session::InteractiveSession;
use cpu_scheduling_simulator::{logger, Result, SchedulingAlgorithm, Simulation};

fn main() {
    let config = Config::new();

    if let Err(e) = config.validate() {
        eprintln!("Error de configuración: {}", e);
        process::exit(2);
    }

    let level = logger::parse_level(&config.log_level).unwrap_or(log::LevelFilter::Warn);
    if let Err(e) = logger::init(level) {
        eprintln!("No se pudo inicializar el logger: {}", e);
    }

    if let Err(e) = run(&config) {
        log::error!("{}", e);
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run(config: &Config) -> Result<()> {
    let format = config.output_format()?;

    if config.is_interactive() {
        log::info!("Iniciando sesión interactiva");
        let stdin = io::stdin();
        let mut session = InteractiveSession::new(stdin.lock(), io::stdout(), format, config.max_processes);
        return session.run();
    }

    let specs = config.process_specs()?;
    let simulation = Simulation::from_specs(&specs, config.max_processes)?;

    let name = config.algorithm.as_deref().unwrap_or("all");
    if name.eq_ignore_ascii_case("all") {
        let runs = simulation.run_all(config.quantum)?;
        for metrics in &runs {
            println!("{}", simulation.render(metrics, format)?);
        }
        if format == OutputFormat::Table {
            println!("{}", simulation.generate_comparison(&runs));
        }
        return Ok(());
    }

    let algorithm = SchedulingAlgorithm::from_name(name, config.quantum)?;
    let metrics = simulation.run(algorithm)?;
    println!("{}", simulation.render(&metrics, format)?);
    Ok(())
}
