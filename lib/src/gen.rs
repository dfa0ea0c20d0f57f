//! The generation façade.
//!
//! One call takes a rulestring, a symmetry name and a catalog and
//! produces every artifact the downstream build consumes: the circuit
//! listing and the update kernels for each backend, plus the parameter
//! block. Nothing is written to disk here; callers decide where the
//! artifacts land, and only after the whole run has succeeded.

use crate::{
    alloc::allocate,
    asm::render,
    catalog::Catalog,
    emit::{state_update, update_function},
    error::Error,
    params::parameter_block,
    rule::RuleSpec,
    symmetry::Symmetry,
    target::{Target, TileGeometry},
};

/// The artifacts generated for one backend.
#[derive(Clone, Debug)]
pub struct TargetArtifacts {
    /// The backend these artifacts are for.
    pub target: Target,
    /// The rendered state-update logic on its own.
    pub logic: String,
    /// The history and non-history update kernels.
    pub kernels: String,
}

impl TargetArtifacts {
    /// The conventional file name for the logic listing.
    pub fn logic_file_name(&self) -> String {
        format!("lifelogic-{}.h", self.target.name())
    }

    /// The conventional file name for the kernels.
    pub fn kernel_file_name(&self) -> String {
        format!("lifeasm-{}.h", self.target.name())
    }
}

/// Everything one generation run produces.
#[derive(Clone, Debug)]
pub struct Artifacts {
    /// The parsed rule.
    pub rule: RuleSpec,
    /// The parsed symmetry.
    pub symmetry: Symmetry,
    /// The rule integer the circuit was looked up under.
    pub rule_integer: u16,
    /// The circuit identifier the catalog resolved to.
    pub identifier: String,
    /// Per-backend listings and kernels, in [`Target::ALL`] order.
    pub targets: Vec<TargetArtifacts>,
    /// The parameter block.
    pub params: String,
}

/// Generates all artifacts for a rule and symmetry.
///
/// Fails without partial output: a malformed rulestring, an unknown
/// symmetry, a rule missing from the catalog or a circuit that cannot be
/// register-allocated each abort the whole run.
pub fn generate(
    rule_string: &str,
    symmetry_name: &str,
    catalog: &Catalog,
) -> Result<Artifacts, Error> {
    let rule: RuleSpec = rule_string.parse()?;
    let symmetry: Symmetry = symmetry_name.parse()?;
    let rule_integer = rule.rule_integer();
    let identifier = catalog.identifier(rule_integer)?.to_string();
    let circuit = allocate(&catalog.circuit(rule_integer)?)?;

    // Register numbering is width-independent, so the logic is scheduled
    // once and rendered per backend.
    let logic = state_update(rule, &circuit);

    let targets = Target::ALL
        .iter()
        .map(|&target| {
            let geom = TileGeometry::new(target, symmetry);
            let mut kernels = update_function(rule, geom, &logic, false);
            kernels.push_str(&update_function(rule, geom, &logic, true));
            TargetArtifacts {
                target,
                logic: render(&logic, target),
                kernels,
            }
        })
        .collect();

    Ok(Artifacts {
        rule,
        symmetry,
        rule_integer,
        identifier,
        targets,
        params: parameter_block(rule, symmetry),
    })
}
