use std::fs;
use std::time::Instant;

use elicit_power::power::{
    estimate_omnibus_power, estimate_pairwise_power, estimate_within_subjects_power, Progress,
};
use elicit_power::scenarios::{Scenario, SCENARIOS};

const USAGE: &str =
    "Usage: elicit-scenarios [--design omnibus|pairwise|within|all] [--sims N] [--seed S] [--output FILE]";

struct Args {
    design: String,
    sims: Option<usize>,
    seed: u64,
    output: Option<String>,
}

fn parse_args() -> Args {
    let args: Vec<String> = std::env::args().collect();
    let mut parsed = Args {
        design: "all".to_string(),
        sims: None,
        seed: 42,
        output: None,
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--design" => {
                i += 1;
                if i < args.len() {
                    parsed.design = args[i].clone();
                }
            }
            "--sims" => {
                i += 1;
                if i < args.len() {
                    parsed.sims = Some(args[i].parse().unwrap_or_else(|_| {
                        eprintln!("Invalid --sims value: {}", args[i]);
                        std::process::exit(1);
                    }));
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
                println!("  --design D     Which design to run (default: all)");
                println!("  --sims N       Simulated trials per estimate (default: per config)");
                println!("  --seed S       RNG seed (default: 42)");
                println!("  --output FILE  Write all estimates as JSON to FILE");
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

    if !matches!(parsed.design.as_str(), "omnibus" | "pairwise" | "within" | "all") {
        eprintln!("Invalid --design value: {}", parsed.design);
        eprintln!("{}", USAGE);
        std::process::exit(1);
    }
    parsed
}

fn main() {
    let args = parse_args();
    let progress = Progress::Every(2000);
    let mut report = serde_json::Map::new();

    if args.design == "pairwise" || args.design == "all" {
        println!("Pairwise design (two-sample t, Bonferroni-corrected directional tests)");
        println!(
            "  {:<14} {:>9} {:>9} {:>9} {:>9} {:>11}",
            "scenario", "bws", "pp", "either", "both", "degenerate"
        );
        for s in SCENARIOS {
            let mut cfg = s.pairwise();
            if let Some(n) = args.sims {
                cfg.n_simulations = n;
            }
            let t0 = Instant::now();
            match estimate_pairwise_power(&cfg, args.seed, progress) {
                Ok(est) => {
                    println!(
                        "  {:<14} {:>9.3} {:>9.3} {:>9.3} {:>9.3} {:>11}   ({:.1}s)",
                        s.as_str(),
                        est.power_bws,
                        est.power_pp,
                        est.power_either,
                        est.power_both,
                        est.degenerate_trials,
                        t0.elapsed().as_secs_f64()
                    );
                    report.insert(
                        format!("pairwise_{}", s.as_str()),
                        serde_json::to_value(&est).unwrap(),
                    );
                }
                Err(e) => eprintln!("  {:<14} failed: {}", s.as_str(), e),
            }
        }
        println!();
    }

    if args.design == "omnibus" || args.design == "all" {
        println!("Omnibus design (one-way ANOVA across the three formats)");
        println!("  {:<14} {:>9} {:>11}", "scenario", "power", "degenerate");
        for s in SCENARIOS {
            let mut cfg = s.omnibus();
            if let Some(n) = args.sims {
                cfg.n_simulations = n;
            }
            match estimate_omnibus_power(&cfg, args.seed, progress) {
                Ok(est) => {
                    println!(
                        "  {:<14} {:>9.3} {:>11}",
                        s.as_str(),
                        est.power,
                        est.degenerate_trials
                    );
                    report.insert(
                        format!("omnibus_{}", s.as_str()),
                        serde_json::to_value(&est).unwrap(),
                    );
                }
                Err(e) => eprintln!("  {:<14} failed: {}", s.as_str(), e),
            }
        }
        println!();
    }

    if args.design == "within" || args.design == "all" {
        println!("Within-subjects design (paired t on per-labeler differences)");
        println!(
            "  {:<14} {:>9} {:>9} {:>9} {:>9}",
            "scenario", "bws", "pp", "either", "both"
        );
        for s in SCENARIOS {
            let mut cfg = s.within_subjects();
            if let Some(n) = args.sims {
                cfg.n_simulations = n;
            }
            match estimate_within_subjects_power(&cfg, args.seed, progress) {
                Ok(est) => {
                    println!(
                        "  {:<14} {:>9.3} {:>9.3} {:>9.3} {:>9.3}",
                        s.as_str(),
                        est.power_bws,
                        est.power_pp,
                        est.power_either,
                        est.power_both
                    );
                    report.insert(
                        format!("within_{}", s.as_str()),
                        serde_json::to_value(&est).unwrap(),
                    );
                }
                Err(e) => eprintln!("  {:<14} failed: {}", s.as_str(), e),
            }
        }
        println!();
    }

    if let Some(path) = args.output {
        let json = serde_json::to_string_pretty(&report).unwrap();
        if let Err(e) = fs::write(&path, json) {
            eprintln!("Failed to write {}: {}", path, e);
            std::process::exit(1);
        }
        println!("Saved estimates to {}", path);
    }
}
