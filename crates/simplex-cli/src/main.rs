use clap::{Parser, Subcommand};
use simplex_tableau::{LpProblem, Solution, SolutionStatus, Solver};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "simplex")]
#[command(about = "Solve small linear programs step by step with the simplex tableau", long_about = None)]
struct Cli {
    /// Log solver progress (same as RUST_LOG=debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Solve a problem file and print the result
    Solve {
        /// JSON file describing the problem
        file: PathBuf,
        /// Output format (json, pretty)
        #[arg(short, long, default_value = "pretty")]
        format: String,
        /// Print every intermediate tableau
        #[arg(short, long)]
        steps: bool,
        /// Maximum number of pivots (default: 20 x (variables + constraints))
        #[arg(long)]
        max_iterations: Option<usize>,
        /// Tolerance for floating point comparisons
        #[arg(long, default_value_t = 1e-9)]
        tolerance: f64,
        /// Rewrite >= constraints with non-positive RHS into <= form first
        #[arg(long)]
        normalize: bool,
    },
    /// Check a problem file for errors
    Check {
        /// The file to check
        file: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level)).init();

    match cli.command {
        Commands::Solve {
            file,
            format,
            steps,
            max_iterations,
            tolerance,
            normalize,
        } => {
            let mut problem = read_problem(&file);
            if normalize {
                problem = match problem.normalized() {
                    Ok(p) => p,
                    Err(e) => {
                        eprintln!("{}", e);
                        std::process::exit(1);
                    }
                };
            }

            let mut solver = Solver::new().with_tolerance(tolerance);
            if let Some(max) = max_iterations {
                solver = solver.with_max_iterations(max);
            }
            let solution = solver.solve(&problem);

            if format == "json" {
                match serde_json::to_string_pretty(&solution) {
                    Ok(json) => println!("{}", json),
                    Err(e) => {
                        eprintln!("Error serializing solution: {}", e);
                        std::process::exit(1);
                    }
                }
            } else {
                print_solution(&problem, &solution, steps);
            }

            if solution.status != SolutionStatus::Optimal {
                std::process::exit(1);
            }
        }
        Commands::Check { file } => {
            let problem = read_problem(&file);

            if let Err(e) = problem.validate() {
                eprintln!("✗ {} has errors:", file.display());
                eprintln!("  {}", e);
                std::process::exit(1);
            }

            println!("✓ {} is valid", file.display());
            println!("  {} variables", problem.num_variables());
            println!("  {} constraints", problem.num_constraints());
            if let Err(e) = problem.normalized() {
                println!("  not solvable without a phase-one method: {}", e);
            }
        }
    }
}

fn read_problem(file: &Path) -> LpProblem {
    let source = match std::fs::read_to_string(file) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error reading file: {}", e);
            std::process::exit(1);
        }
    };

    match serde_json::from_str::<LpProblem>(&source) {
        Ok(p) => p.with_default_names(),
        Err(e) => {
            eprintln!("Parse error: {}", e);
            std::process::exit(1);
        }
    }
}

fn print_solution(problem: &LpProblem, solution: &Solution, steps: bool) {
    if steps {
        for record in &solution.history {
            println!("Iteration {} (objective {:.4})", record.iteration, record.objective_value);
            print!("{}", record.tableau);
            if let (Some(entering), Some(leaving)) = (&record.entering, &record.leaving) {
                println!("  {} enters, {} leaves", entering, leaving);
            }
            println!();
        }
    }

    match solution.status {
        SolutionStatus::Optimal => {
            println!("Status: OPTIMAL");
            println!("Objective: {:.4}", solution.objective_value);
            println!("Iterations: {}", solution.iterations);
            println!();
            println!("Variables:");
            for (name, value) in problem.variables.iter().zip(&solution.decision_values) {
                println!("  {:10} {:12.4}", name, value);
            }
            println!("Slacks:");
            for (i, value) in solution.slack_values.iter().enumerate() {
                println!("  {:10} {:12.4}", simplex_tableau::slack_name(i), value);
            }

            if !solution.analysis.binding_constraints.is_empty() {
                println!();
                println!("Binding constraints:");
                for name in &solution.analysis.binding_constraints {
                    println!("  - {}", name);
                }
            }

            println!();
            println!("Shadow prices:");
            for sp in &solution.analysis.shadow_prices {
                println!("  {:20} {:10.4}", sp.constraint, sp.value);
            }
        }
        SolutionStatus::Unbounded => {
            println!("Status: UNBOUNDED");
            println!("The problem has no finite optimal solution.");
        }
        status => {
            println!("Status: {}", status.to_string().to_uppercase());
            if let Some(ref message) = solution.message {
                println!("{}", message);
            }
        }
    }
}
