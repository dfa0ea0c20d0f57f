//! Parsing command-line arguments.

use clap::{builder::PossibleValuesParser, error::Result as ClapResult, value_parser, Arg, Command};
use ruleasm_lib::{RuleSpec, SYMMETRY_NAMES};
use std::path::PathBuf;

/// A struct to store the parse results.
pub(crate) struct Args {
    pub(crate) rule: String,
    pub(crate) symmetry: String,
    pub(crate) catalog: PathBuf,
    pub(crate) out: PathBuf,
}

impl Args {
    /// Parses the command-line arguments.
    pub(crate) fn parse() -> ClapResult<Self> {
        let matches = Command::new(env!("CARGO_PKG_NAME"))
            .version(env!("CARGO_PKG_VERSION"))
            .about(env!("CARGO_PKG_DESCRIPTION"))
            .long_about(
                "Generating bit-sliced SIMD update kernels for outer-totalistic \
                 cellular automata\n\
                 \n\
                 For each of the three x86-64 backends (SSE2, AVX1, AVX2) the \
                 program emits a header with the scheduled update logic and a \
                 header with the two-generation tile update kernels, plus a \
                 params.h describing the rule and tile geometry.\n\
                 \n\
                 Nothing is written unless the whole run succeeds.\n",
            )
            .arg(
                Arg::new("RULE")
                    .help("Rule of the cellular automaton")
                    .long_help(
                        "Rule of the cellular automaton\n\
                         Of the form bXsY, where X is a subset of {3, ..., 8} \
                         and Y is a subset of {0, ..., 8}.\n",
                    )
                    .required(true)
                    .index(1)
                    .value_parser(|s: &str| {
                        s.parse::<RuleSpec>()
                            .map(|_| s.to_string())
                            .map_err(|e| e.to_string())
                    }),
            )
            .arg(
                Arg::new("SYMMETRY")
                    .help("Symmetry of the search universe")
                    .index(2)
                    .default_value("C1")
                    .value_parser(PossibleValuesParser::new(SYMMETRY_NAMES)),
            )
            .arg(
                Arg::new("CATALOG")
                    .help("The circuit catalog file")
                    .long("catalog")
                    .default_value("includes/boolean.out")
                    .value_parser(value_parser!(PathBuf)),
            )
            .arg(
                Arg::new("OUT")
                    .help("Directory the generated headers are written to")
                    .short('o')
                    .long("out")
                    .default_value("includes")
                    .value_parser(value_parser!(PathBuf)),
            )
            .try_get_matches()?;

        Ok(Args {
            rule: matches.get_one::<String>("RULE").unwrap().clone(),
            symmetry: matches.get_one::<String>("SYMMETRY").unwrap().clone(),
            catalog: matches.get_one::<PathBuf>("CATALOG").unwrap().clone(),
            out: matches.get_one::<PathBuf>("OUT").unwrap().clone(),
        })
    }
}
