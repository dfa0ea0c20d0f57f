mod args;

use args::Args;
use ruleasm_lib::{generate, Catalog, RuleSpec};
use std::{error::Error, fs, process};

fn main() {
    let args = Args::parse().unwrap_or_else(|e| e.exit());
    if let Err(e) = run(&args) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run(args: &Args) -> Result<(), Box<dyn Error>> {
    let catalog = Catalog::open(&args.catalog)?;
    let artifacts = generate(&args.rule, &args.symmetry, &catalog)?;

    println!("Valid rulestring: {}", artifacts.rule);
    println!("Valid symmetry: {}", artifacts.symmetry);
    let stars = stars(artifacts.rule);
    println!("Rule integer:     {}{}", artifacts.rule_integer, stars);
    println!("Rule circuit:     [{}]{}", artifacts.identifier, stars);

    fs::create_dir_all(&args.out)?;
    for per_target in &artifacts.targets {
        fs::write(args.out.join(per_target.logic_file_name()), &per_target.logic)?;
        fs::write(
            args.out.join(per_target.kernel_file_name()),
            &per_target.kernels,
        )?;
    }
    fs::write(args.out.join("params.h"), &artifacts.params)?;
    println!("Wrote {} headers to {}.", 2 * artifacts.targets.len() + 1, args.out.display());
    Ok(())
}

/// Star markers flagging rules that need the top-bit correction pass.
fn stars(rule: RuleSpec) -> &'static str {
    let correction = rule.top_bit_correction();
    match (correction.survival_differs, correction.birth_differs) {
        (false, false) => "",
        (true, false) => "*",
        (false, true) => "**",
        (true, true) => "***",
    }
}
