use ruleasm_lib::{
    allocate, generate, Catalog, Circuit, Error as RuleasmError, RuleSpec, Target, PHYSICAL_SLOTS,
};
use std::error::Error;

const CATALOG: &str = "3080:  12143031020413100100\n";

#[test]
fn rulestring_round_trip() -> Result<(), Box<dyn Error>> {
    for text in ["b3s23", "b36s125", "b38s0235678", "b3s", "bs23"] {
        let rule: RuleSpec = text.parse()?;
        assert_eq!(rule.to_string(), text);
    }
    Ok(())
}

#[test]
fn standard_life_rule_integer() -> Result<(), Box<dyn Error>> {
    let rule: RuleSpec = "b3s23".parse()?;
    assert_eq!(rule.rule_integer(), 3080);
    assert_eq!(rule.birth_mask(), 8);
    assert_eq!(rule.survival_mask(), 12);
    Ok(())
}

#[test]
fn reserved_integers_need_no_catalog() -> Result<(), Box<dyn Error>> {
    // The empty rule maps to rule integer 0, one of the five reserved
    // integers, so generation succeeds with an empty catalog.
    let rule: RuleSpec = "bs".parse()?;
    assert_eq!(rule.rule_integer(), 0);
    let artifacts = generate("bs", "C1", &Catalog::default())?;
    assert_eq!(artifacts.identifier, "-004");
    Ok(())
}

#[test]
fn andnot_source_order_is_normalised() {
    // Op digit 3 is ANDN with swapped sources; both spellings decode to
    // the same gate.
    assert_eq!(Circuit::decode("-123"), Circuit::decode("-212"));
}

#[test]
fn allocation_stays_inside_the_slot_pool() -> Result<(), Box<dyn Error>> {
    let catalog = Catalog::from_reader(CATALOG.as_bytes())?;
    let circuit = allocate(&catalog.circuit(3080)?)?;
    for step in circuit.steps() {
        assert!(step.dest < PHYSICAL_SLOTS);
        assert!(step.src1 < PHYSICAL_SLOTS);
        assert!(step.src2 < PHYSICAL_SLOTS);
    }
    Ok(())
}

#[test]
fn logic_listings_agree_across_vex_widths() -> Result<(), Box<dyn Error>> {
    // The 128-bit and 256-bit VEX encodings differ only in register
    // width; the scheduled logic is identical.
    let catalog = Catalog::from_reader(CATALOG.as_bytes())?;
    let artifacts = generate("b3s23", "C1", &catalog)?;
    let avx1 = &artifacts.targets[1];
    let avx2 = &artifacts.targets[2];
    assert_eq!(avx1.target, Target::Avx1);
    assert_eq!(avx2.target, Target::Avx2);
    assert_eq!(avx1.logic, avx2.logic.replace("ymm", "xmm"));
    Ok(())
}

#[test]
fn standard_life_artifacts() -> Result<(), Box<dyn Error>> {
    let catalog = Catalog::from_reader(CATALOG.as_bytes())?;
    let artifacts = generate("b3s23", "C1", &catalog)?;

    assert_eq!(artifacts.rule_integer, 3080);
    assert_eq!(artifacts.identifier, "12143031020413100100");

    for per_target in &artifacts.targets {
        let name = per_target.target.name();
        assert!(per_target
            .kernels
            .contains(&format!("void updateTile_{}_nohistory(VersaTile* sqt) {{", name)));
        assert!(per_target
            .kernels
            .contains(&format!("void updateTile_{}_history(VersaTile* sqt) {{", name)));
        assert!(per_target.kernels.contains("// Rule: b3s23"));
    }

    assert!(artifacts.params.contains("#define SYMMETRY \"C1\""));
    assert!(artifacts.params.contains("#define ROWS 32"));
    assert!(artifacts.params.contains("#define BIRTHS 8"));
    assert!(artifacts.params.contains("#define SURVIVALS 12"));
    assert!(artifacts.params.contains("#define STANDARD_LIFE 1"));
    assert!(artifacts.params.contains("#define GLIDERS_EXIST 1"));
    assert!(artifacts.params.contains("#define C1_SYMMETRY 1"));
    Ok(())
}

#[test]
fn malformed_rule_aborts_generation() -> Result<(), Box<dyn Error>> {
    let catalog = Catalog::from_reader(CATALOG.as_bytes())?;
    let err = generate("b9s2", "C1", &catalog).unwrap_err();
    assert_eq!(err, RuleasmError::MalformedRule("b9s2".to_string()));
    Ok(())
}
