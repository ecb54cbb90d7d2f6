use std::fs;

use elicit_power::config::{OmnibusConfig, PairwiseConfig, WithinSubjectsConfig};
use elicit_power::sweep::{
    sweep_effect_size, sweep_labelers, sweep_omnibus_effect_size, sweep_omnibus_sample_size,
    sweep_prompts_per_format, sweep_sample_size, Allocation, OmnibusSweepPoint, SweepPoint,
};

const USAGE: &str = "Usage: elicit-sweep --dimension \
sample_size|effect|labelers|prompts|omnibus_n|omnibus_effect \
[--values V1,V2,...] [--allocation equal|control_2x|control_only] [--sims N] [--seed S] [--output FILE]";

struct Args {
    dimension: String,
    values: Option<String>,
    allocation: Allocation,
    sims: usize,
    seed: u64,
    output: Option<String>,
}

fn parse_args() -> Args {
    let args: Vec<String> = std::env::args().collect();
    let mut parsed = Args {
        dimension: String::new(),
        values: None,
        allocation: Allocation::Equal,
        sims: 5000,
        seed: 42,
        output: None,
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--dimension" => {
                i += 1;
                if i < args.len() {
                    parsed.dimension = args[i].clone();
                }
            }
            "--values" => {
                i += 1;
                if i < args.len() {
                    parsed.values = Some(args[i].clone());
                }
            }
            "--allocation" => {
                i += 1;
                if i < args.len() {
                    parsed.allocation = match args[i].as_str() {
                        "equal" => Allocation::Equal,
                        "control_2x" => Allocation::ControlDouble,
                        "control_only" => Allocation::ControlOnly,
                        other => {
                            eprintln!("Invalid --allocation value: {}", other);
                            std::process::exit(1);
                        }
                    };
                }
            }
            "--sims" => {
                i += 1;
                if i < args.len() {
                    parsed.sims = args[i].parse().unwrap_or_else(|_| {
                        eprintln!("Invalid --sims value: {}", args[i]);
                        std::process::exit(1);
                    });
                }
            }
            "--seed" => {
                i += 1;
                if i < args.len() {
                    parsed.seed = args[i].parse().unwrap_or_else(|_| {
                        eprintln!("Invalid --seed value: {}", args[i]);
                        std::process::exit(1);
                    });
                }
            }
            "--output" => {
                i += 1;
                if i < args.len() {
                    parsed.output = Some(args[i].clone());
                }
            }
            "--help" | "-h" => {
                println!("{}", USAGE);
                println!();
                println!("Options:");
                println!("  --dimension D    What to sweep (required)");
                println!("  --values LIST    Comma-separated grid (default: per dimension)");
                println!("  --allocation A   Sample-size allocation rule (default: equal)");
                println!("  --sims N         Simulated trials per grid point (default: 5000)");
                println!("  --seed S         RNG seed (default: 42)");
                println!("  --output FILE    Write sweep points as JSON to FILE");
                std::process::exit(0);
            }
            other => {
                eprintln!("Unknown argument: {}", other);
                eprintln!("{}", USAGE);
                std::process::exit(1);
            }
        }
        i += 1;
    }

    if parsed.dimension.is_empty() {
        eprintln!("Missing required --dimension");
        eprintln!("{}", USAGE);
        std::process::exit(1);
    }
    parsed
}

fn parse_usize_grid(raw: &str) -> Vec<usize> {
    raw.split(',')
        .map(|v| {
            v.trim().parse().unwrap_or_else(|_| {
                eprintln!("Invalid grid value: {}", v);
                std::process::exit(1);
            })
        })
        .collect()
}

fn parse_f64_grid(raw: &str) -> Vec<f64> {
    raw.split(',')
        .map(|v| {
            v.trim().parse().unwrap_or_else(|_| {
                eprintln!("Invalid grid value: {}", v);
                std::process::exit(1);
            })
        })
        .collect()
}

fn print_points(points: &[SweepPoint]) {
    println!(
        "  {:<10} {:>9} {:>9} {:>9} {:>9}",
        "value", "bws", "pp", "either", "both"
    );
    for p in points {
        match &p.outcome {
            Ok(est) => println!(
                "  {:<10} {:>9.3} {:>9.3} {:>9.3} {:>9.3}",
                p.value, est.power_bws, est.power_pp, est.power_either, est.power_both
            ),
            Err(e) => println!("  {:<10} skipped: {}", p.value, e),
        }
    }
}

fn print_omnibus_points(points: &[OmnibusSweepPoint]) {
    println!("  {:<10} {:>9}", "value", "power");
    for p in points {
        match &p.outcome {
            Ok(est) => println!("  {:<10} {:>9.3}", p.value, est.power),
            Err(e) => println!("  {:<10} skipped: {}", p.value, e),
        }
    }
}

fn save_json<T: serde::Serialize>(points: &T, path: &str) {
    let json = serde_json::to_string_pretty(points).unwrap();
    if let Err(e) = fs::write(path, json) {
        eprintln!("Failed to write {}: {}", path, e);
        std::process::exit(1);
    }
    println!("Saved sweep to {}", path);
}

fn main() {
    let args = parse_args();

    match args.dimension.as_str() {
        "sample_size" => {
            let grid = args
                .values
                .as_deref()
                .map(parse_usize_grid)
                .unwrap_or_else(|| vec![5, 8, 10, 12, 15, 20, 25, 30]);
            println!(
                "Sweeping per-arm sample size ({} allocation, {} sims/point)",
                args.allocation.as_str(),
                args.sims
            );
            let points = sweep_sample_size(
                &PairwiseConfig::default(),
                &grid,
                args.allocation,
                args.sims,
                args.seed,
            );
            print_points(&points);
            if let Some(path) = &args.output {
                save_json(&points, path);
            }
        }
        "effect" => {
            let grid = args
                .values
                .as_deref()
                .map(parse_f64_grid)
                .unwrap_or_else(|| vec![0.10, 0.15, 0.20, 0.25, 0.30, 0.40, 0.50]);
            println!("Sweeping BWS improvement (PP tracks at 80%, {} sims/point)", args.sims);
            let points = sweep_effect_size(&PairwiseConfig::default(), &grid, args.sims, args.seed);
            print_points(&points);
            if let Some(path) = &args.output {
                save_json(&points, path);
            }
        }
        "labelers" => {
            let grid = args
                .values
                .as_deref()
                .map(parse_usize_grid)
                .unwrap_or_else(|| vec![4, 6, 8, 10, 12, 15]);
            println!("Sweeping labeler count ({} sims/point)", args.sims);
            let points =
                sweep_labelers(&WithinSubjectsConfig::default(), &grid, args.sims, args.seed);
            print_points(&points);
            if let Some(path) = &args.output {
                save_json(&points, path);
            }
        }
        "prompts" => {
            let grid = args
                .values
                .as_deref()
                .map(parse_usize_grid)
                .unwrap_or_else(|| vec![3, 5, 8, 10, 15]);
            println!("Sweeping prompts per format ({} sims/point)", args.sims);
            let points = sweep_prompts_per_format(
                &WithinSubjectsConfig::default(),
                &grid,
                args.sims,
                args.seed,
            );
            print_points(&points);
            if let Some(path) = &args.output {
                save_json(&points, path);
            }
        }
        "omnibus_n" => {
            let grid = args
                .values
                .as_deref()
                .map(parse_usize_grid)
                .unwrap_or_else(|| vec![5, 8, 10, 15, 20, 30]);
            println!("Sweeping per-format sample size, omnibus ANOVA ({} sims/point)", args.sims);
            let points =
                sweep_omnibus_sample_size(&OmnibusConfig::default(), &grid, args.sims, args.seed);
            print_omnibus_points(&points);
            if let Some(path) = &args.output {
                save_json(&points, path);
            }
        }
        "omnibus_effect" => {
            let grid = args
                .values
                .as_deref()
                .map(parse_f64_grid)
                .unwrap_or_else(|| vec![0.10, 0.15, 0.20, 0.25, 0.30, 0.40, 0.50]);
            println!(
                "Sweeping BWS improvement, omnibus ANOVA (PP tracks at 80%, {} sims/point)",
                args.sims
            );
            let points =
                sweep_omnibus_effect_size(&OmnibusConfig::default(), &grid, args.sims, args.seed);
            print_omnibus_points(&points);
            if let Some(path) = &args.output {
                save_json(&points, path);
            }
        }
        other => {
            eprintln!("Unknown --dimension: {}", other);
            eprintln!("{}", USAGE);
            std::process::exit(1);
        }
    }
}
