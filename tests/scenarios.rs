use bfcore::{CellWidth, Error, Inst, Opcode, ParseError, Settings, Status, compile, run_source};
use pretty_assertions::assert_eq;

const HELLO: &str = ">+++++++++[<++++++++>-]<.>+++++++[<++++>-]<+.+++++++..+++.>>>++++++++[<++++>-]<.>>>++++++++++[<+++++++++>-]<---.<<<<.+++.------.--------.>>+.";

fn output(code: &str, settings: &Settings, input: &[u8]) -> Vec<u8> {
    let (out, outcome) = run_source(code, settings, input).unwrap();
    assert_eq!(outcome.status, Status::Completed);
    out
}

#[test]
fn hello_world() {
    for width in CellWidth::ALL {
        for optimize in [false, true] {
            let settings = Settings::new(width).with_optimize(optimize);
            assert_eq!(
                String::from_utf8(output(HELLO, &settings, b"")).unwrap(),
                "Hello World!",
                "width {width}, optimize {optimize}"
            );
        }
    }
}

#[test]
fn echo_until_terminator() {
    let input = b"This is a test string.\0";
    for width in CellWidth::ALL {
        let settings = Settings::new(width);
        assert_eq!(output("+[,.]", &settings, input), input.to_vec());
    }
}

#[test]
fn echo_stops_at_end_of_input() {
    let settings = Settings::default();
    assert_eq!(output("+[,.]", &settings, b"abc"), b"abc\0".to_vec());
}

#[test]
fn clear_loop_compiles_to_one_assign() {
    assert_eq!(
        compile("[-]", true).unwrap(),
        vec![Inst::new(Opcode::Assign, 0, 0, 0)]
    );
}

#[test]
fn optimized_programs_have_no_loops_left_for_copies() {
    let program = compile("++++[->++>+++<<]>.>.", true).unwrap();
    assert!(program.iter().all(|inst| !inst.is_branch()));
    let settings = Settings::default();
    assert_eq!(output("++++[->++>+++<<]>.>.", &settings, b""), vec![8, 12]);
}

#[test]
fn wraparound_at_every_width() {
    let cases = [(CellWidth::I8, 256usize), (CellWidth::I16, 65536)];
    for (width, count) in cases {
        let code = "+".repeat(count);
        let (_, outcome) = run_source(&code, &Settings::new(width), b"").unwrap();
        assert_eq!(outcome.cells[0], 0, "width {width}");
    }
    for width in CellWidth::ALL {
        let settings = Settings::new(width).with_optimize(false);
        let (_, outcome) = run_source("-+", &settings, b"").unwrap();
        assert_eq!(outcome.cells[0], 0);
        let (_, outcome) = run_source("-", &Settings::new(width), b"").unwrap();
        assert_eq!(outcome.cells[0], -1);
    }
}

#[test]
fn decrementing_past_zero_stays_in_range_for_output() {
    let settings = Settings::new(CellWidth::I32);
    assert_eq!(output("-.", &settings, b""), vec![255]);
}

#[test]
fn growable_tape_keeps_cells_far_apart() {
    let code = format!("+++{}++", ">".repeat(100));
    let settings = Settings::default().with_tape_len(4);
    let (_, outcome) = run_source(&code, &settings, b"").unwrap();
    assert_eq!(outcome.cells[0], 3);
    assert_eq!(outcome.cells[100], 2);
    assert!(outcome.cells.len() >= 101);
}

#[test]
fn seek_loop_walks_the_tape() {
    let settings = Settings::default().with_tape_len(2);
    let code = "+>+>+>+>+<<<<[>]<.";
    let (out, outcome) = run_source(code, &settings, b"").unwrap();
    assert_eq!(out, vec![1]);
    assert_eq!(outcome.pointer, 4);
}

#[test]
fn unmatched_brackets_are_errors() {
    assert!(matches!(
        run_source("++[>+", &Settings::default(), b""),
        Err(Error::Parse(ParseError::UnmatchedOpen { position: 2 }))
    ));
    assert!(matches!(
        run_source("+]", &Settings::default(), b""),
        Err(Error::Parse(ParseError::UnmatchedClose { position: 1 }))
    ));
}

#[test]
fn backward_copy_at_cell_zero_is_skipped() {
    // The loop never runs, so the rewritten copy must not touch cell -1.
    let (_, outcome) = run_source("[<+>-]+", &Settings::default(), b"").unwrap();
    assert_eq!(outcome.cells[0], 1);
}

#[test]
fn moving_left_of_cell_zero_is_an_error() {
    assert!(matches!(
        run_source("<+", &Settings::default(), b""),
        Err(Error::Run(bfcore::RunError::TapeUnderflow { index: -1 }))
    ));
}
