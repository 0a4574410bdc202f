use bfcore::interpreter::StepBudget;
use bfcore::lower::lower;
use bfcore::optimizer::optimize;
use bfcore::parser::parse;
use bfcore::{CellWidth, Settings, Status, compile, run};
use proptest::prelude::*;

const INPUT: &[u8] = b"\x05\x03\xff\x00ok";

fn program() -> impl Strategy<Value = String> {
    let op = prop_oneof![
        4 => Just("+"),
        3 => Just("-"),
        3 => Just(">"),
        2 => Just("<"),
        1 => Just("."),
        1 => Just(","),
        2 => Just("[-]"),
        2 => Just("[->+<]"),
        1 => Just("[-<<+>>]"),
        1 => Just("[->++>---<<]"),
        1 => Just(">>>>>"),
        1 => Just("<<<<<"),
    ]
    .prop_map(str::to_string);
    op.prop_recursive(3, 48, 8, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 1..8).prop_map(|parts| parts.concat()),
            prop::collection::vec(inner, 0..6).prop_map(|parts| format!("[{}]", parts.concat())),
        ]
    })
    .prop_map(|body| format!(">>>{body}"))
}

fn execute(
    code: &str,
    width: CellWidth,
    optimize: bool,
    budget: u64,
) -> Option<(Vec<u8>, Status)> {
    let program = compile(code, optimize).ok()?;
    let settings = Settings::new(width).with_tape_len(16).with_optimize(optimize);
    let mut output = Vec::new();
    let outcome = run(
        &program,
        &settings,
        &mut &INPUT[..],
        &mut output,
        &mut StepBudget::new(budget),
    )
    .ok()?;
    Some((output, outcome.status))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(512))]

    #[test]
    fn optimizing_is_idempotent(code in program()) {
        let once = optimize(parse(&code).unwrap());
        let twice = optimize(once.clone());
        prop_assert_eq!(lower(&twice), lower(&once));
    }

    #[test]
    fn optimized_output_matches(code in program()) {
        for width in CellWidth::ALL {
            let Some((plain, status)) = execute(&code, width, false, 20_000) else {
                continue;
            };
            if status != Status::Completed {
                continue;
            }
            let optimized = execute(&code, width, true, 200_000);
            prop_assert_eq!(
                optimized,
                Some((plain, Status::Completed)),
                "width {} program {}",
                width,
                code
            );
        }
    }
}
