use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use super::*;
use crate::error::Severity;
use crate::filesystem::FileSystem;

/// Files shared between a test and the interpreter that owns the boxed
/// filesystem.
#[derive(Clone, Default)]
struct MemoryFs {
    files: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryFs {
    fn get(&self, name: &str) -> Option<String> {
        self.files.borrow().get(name).cloned()
    }
}

impl FileSystem for MemoryFs {
    fn read_file(&self, name: &str) -> Option<String> {
        self.get(name)
    }

    fn write_file(&mut self, name: &str, contents: &str) -> Result<(), String> {
        self.files
            .borrow_mut()
            .insert(name.to_owned(), contents.to_owned());
        Ok(())
    }
}

fn run(source: &str) -> Interpreter {
    let mut interp = Interpreter::new();
    interp.set_random_seed(7);
    if let Err(err) = interp.run(source) {
        panic!("unexpected failure for {source:?}: {err}");
    }
    interp
}

fn run_err(source: &str) -> HydraError {
    let mut interp = Interpreter::new();
    interp.run(source).expect_err("program should fail")
}

fn number(interp: &Interpreter, name: &str) -> f64 {
    match interp.state.lookup(name) {
        Some((Value::Number(n), _)) => *n,
        other => panic!("{name} is not a number: {other:?}"),
    }
}

fn last_value(source: &str) -> Value {
    let mut interp = Interpreter::new();
    let values = interp.run(source).expect("program should run");
    values.last().cloned().expect("at least one statement")
}

// ---------------------------------------------------------------------------
// Expressions and variables
// ---------------------------------------------------------------------------

#[test]
fn multiplication_binds_tighter() {
    assert_eq!(last_value("2.0 + 3.0 * 4.0"), Value::Number(14.0));
}

#[test]
fn parentheses_group() {
    assert_eq!(last_value("(2.0 + 3.0) * 4.0"), Value::Number(20.0));
}

#[test]
fn left_to_right_within_a_level() {
    assert_eq!(last_value("8 / 4 / 2"), Value::Number(1.0));
    assert_eq!(last_value("10 - 3 - 2"), Value::Number(5.0));
    assert_eq!(last_value("1 - 2 * 3 + 4"), Value::Number(-1.0));
}

#[test]
fn unary_minus() {
    let interp = run("var a = 3\nvar b = -a * 2");
    assert!((number(&interp, "b") + 6.0).abs() < 1e-12);
}

#[test]
fn pi_constant() {
    let interp = run("var half = M_PI / 2");
    assert!((number(&interp, "half") - core::f64::consts::FRAC_PI_2).abs() < 1e-12);
}

#[test]
fn division_by_zero() {
    let err = run_err("var a = 1 / 0");
    assert_eq!(err.kind, ErrorKind::ArithmeticError);
    assert!(err.message.contains("Division by zero"), "got: {}", err.message);
}

#[test]
fn arithmetic_on_points_is_a_type_error() {
    let err = run_err("var p = Pol(r: 1, phi: 0)\nvar q = p + 1");
    assert_eq!(err.kind, ErrorKind::TypeError);
    assert!(err.message.contains("point"), "got: {}", err.message);
}

#[test]
fn declaration_and_reassignment() {
    let interp = run("var a = 5.0\na = a + 1");
    assert!((number(&interp, "a") - 6.0).abs() < 1e-12);
}

#[test]
fn assignment_to_undeclared_variable() {
    let err = run_err("y = 2.0");
    assert_eq!(err.kind, ErrorKind::UndefinedVariable);
    assert!(err.message.contains("undeclared variable 'y'"), "got: {}", err.message);
    assert!(err.message.contains("var y = ..."), "got: {}", err.message);
}

#[test]
fn use_of_undeclared_variable() {
    let err = run_err("var a = b");
    assert_eq!(err.kind, ErrorKind::UndefinedVariable);
    assert!(err.message.contains("'b'"), "got: {}", err.message);
}

#[test]
fn redefinition_in_same_scope() {
    let err = run_err("var a = 1\nvar a = 2");
    assert_eq!(err.kind, ErrorKind::Redefinition);
    assert!(err.message.contains("'a'"), "got: {}", err.message);
    assert_eq!(err.line, Some(2));
}

#[test]
fn reserved_names_cannot_be_assigned() {
    let err = run_err("var _x = 1");
    assert_eq!(err.kind, ErrorKind::ReservedName);
    let err = run_err("_p = 1");
    assert_eq!(err.kind, ErrorKind::ReservedName);
}

#[test]
fn vacuous_right_hand_side() {
    let err = run_err("var a = clear()");
    assert_eq!(err.kind, ErrorKind::NoValue);
    assert!(err.message.contains("did not have a value"), "got: {}", err.message);
}

#[test]
fn euclidean_initializer() {
    let interp = run("var p = Euc(x: 0, y: 1)\nvar r = radial(of: p)\nvar phi = angular(of: p)");
    assert!((number(&interp, "r") - 1.0).abs() < 1e-12);
    assert!((number(&interp, "phi") - core::f64::consts::FRAC_PI_2).abs() < 1e-12);
}

// ---------------------------------------------------------------------------
// Strings and output
// ---------------------------------------------------------------------------

#[test]
fn string_interpolation() {
    let interp = run("var a = 5.0\nvar s = \"Five is \\(a)\"");
    let (value, _) = interp.state.lookup("s").expect("s is defined");
    assert_eq!(value, &Value::String("Five is 5.000000".into()));
}

#[test]
fn interpolating_nothing_fails() {
    let err = run_err("var s = \"x \\(clear)\"");
    assert_eq!(err.kind, ErrorKind::TypeError);
}

#[test]
fn print_appends_a_line() {
    let mut interp = run("var a = 2\nprint(message: \"a is \\(a)\")\nprint(message: a * 2)");
    assert_eq!(interp.take_output(), "a is 2.000000\n4.000000\n");
    assert!(interp.take_output().is_empty(), "output is drained");
}

#[test]
fn show_lists_innermost_scope_first() {
    let mut interp = run("var b = 2\nvar a = \"x\"\nfor i in [1, 1, 1] {\nshow()\n}");
    let listing = interp.take_output();
    let lines: Vec<&str> = listing.lines().collect();
    assert_eq!(
        lines,
        [
            "Scope 2: (0 variables)",
            "Scope 1: (1 variables)",
            "  [0] i = '1.000000'",
            "Scope 0: (2 variables)",
            "  [0] a = 'x'",
            "  [1] b = '2.000000'",
        ]
    );
}

// ---------------------------------------------------------------------------
// Loops
// ---------------------------------------------------------------------------

#[test]
fn loop_runs_once_per_value() {
    let mut interp = run("for i in [0.0, 1.0, 2.0] {\nprint(message: i)\n}");
    assert_eq!(interp.take_output(), "0.000000\n1.000000\n2.000000\n");
    assert!(interp.state.lookup("i").is_none(), "loop variable escaped");
    assert_eq!(interp.state.depth(), 1);
}

#[test]
fn loop_variable_is_unreachable_afterwards() {
    let err = run_err("for i in [0.0, 1.0, 2.0] {\nvar x = i\n}\nvar y = i");
    assert_eq!(err.kind, ErrorKind::UndefinedVariable);
    assert_eq!(err.line, Some(4));
}

#[test]
fn loop_body_updates_outer_variables() {
    let interp = run("var total = 0\nfor i in [1, 1, 4] {\ntotal = total + i\n}");
    assert!((number(&interp, "total") - 10.0).abs() < 1e-12);
}

#[test]
fn each_iteration_gets_a_fresh_scope() {
    let interp = run("var n = 0\nfor i in [0, 1, 2] {\nvar local = i\nn = n + 1\n}");
    assert!((number(&interp, "n") - 3.0).abs() < 1e-12);
}

#[test]
fn fractional_steps_reach_the_upper_bound() {
    let mut interp = run("for t in [0, 0.1, 0.3] {\nprint(message: t)\n}");
    assert_eq!(interp.take_output().lines().count(), 4);
}

#[test]
fn nested_loops() {
    let interp = run(
        "var count = 0\nfor i in [1, 1, 3] {\nfor j in [1, 1, i] {\ncount = count + 1\n}\n}",
    );
    assert!((number(&interp, "count") - 6.0).abs() < 1e-12);
}

#[test]
fn empty_range_skips_the_body() {
    let mut interp = run("for i in [3, 1, 1] {\nprint(message: i)\n}");
    assert!(interp.take_output().is_empty());
}

#[test]
fn non_positive_step_is_rejected() {
    let err = run_err("for i in [0, 0, 1] {\n}");
    assert_eq!(err.kind, ErrorKind::InvalidLoop);
    assert!(err.message.contains("must be positive"), "got: {}", err.message);
}

#[test]
fn error_inside_loop_closes_its_scopes() {
    let mut interp = Interpreter::new();
    assert!(interp.run("for i in [0, 1, 2] {\nvar x = 1 / 0\n}").is_err());
    assert_eq!(interp.state.depth(), 1);
    assert!(interp.state.lookup("i").is_none());
}

#[test]
fn unclosed_loop_is_not_run() {
    let mut interp = Interpreter::new();
    let err = interp
        .run("var a = 1\nfor i in [0, 1, 2] {\nprint(message: i)")
        .expect_err("loop is never closed");
    assert_eq!(err.kind, ErrorKind::UnbalancedLoop);
    assert_eq!(err.line, Some(2));
    assert!(interp.state.lookup("a").is_none(), "nothing is evaluated");
    assert!(interp.take_output().is_empty());
}

// ---------------------------------------------------------------------------
// Built-in functions
// ---------------------------------------------------------------------------

#[test]
fn math_functions() {
    let interp = run(
        "var a = sin(x: M_PI / 2)\nvar b = cosh(x: 0)\nvar c = sqrt(x: 16)\nvar d = log(x: exp(x: 2))",
    );
    assert!((number(&interp, "a") - 1.0).abs() < 1e-12);
    assert!((number(&interp, "b") - 1.0).abs() < 1e-12);
    assert!((number(&interp, "c") - 4.0).abs() < 1e-12);
    assert!((number(&interp, "d") - 2.0).abs() < 1e-12);
}

#[test]
fn math_domain_errors() {
    assert_eq!(run_err("var a = log(x: 0)").kind, ErrorKind::InvalidArgument);
    assert_eq!(run_err("var a = sqrt(x: -1)").kind, ErrorKind::InvalidArgument);
    assert_eq!(run_err("var a = exp(x: 1000)").kind, ErrorKind::ArithmeticError);
}

#[test]
fn wrong_argument_type() {
    let err = run_err("var a = sin(x: \"one\")");
    assert_eq!(err.kind, ErrorKind::TypeError);
    assert!(err.message.contains("as number"), "got: {}", err.message);
    let err = run_err("circle(center: 1, radius: 1)");
    assert!(err.message.contains("as Pol"), "got: {}", err.message);
}

#[test]
fn distance_between_points() {
    let interp = run(
        "var d = distance(from: Pol(r: 1, phi: 0), to: Pol(r: 1, phi: M_PI))",
    );
    assert!((number(&interp, "d") - 2.0).abs() < 1e-9);
}

#[test]
fn theta_of_a_valid_triangle() {
    let interp = run("var t = theta(r1: 1, r2: 1, R: 2)");
    assert!((number(&interp, "t") - core::f64::consts::PI).abs() < 1e-6);
}

#[test]
fn theta_rejects_impossible_triangles() {
    let err = run_err("var t = theta(r1: 1, r2: 1, R: 3)");
    assert_eq!(err.kind, ErrorKind::InvalidArgument);
    assert!(err.message.contains("No triangle"), "got: {}", err.message);
    let err = run_err("var t = theta(r1: 5, r2: 1, R: 1)");
    assert_eq!(err.kind, ErrorKind::InvalidArgument);
    let err = run_err("var t = theta(r1: -1, r2: 1, R: 1)");
    assert!(err.message.contains("negative"), "got: {}", err.message);
}

#[test]
fn random_is_reproducible_and_in_range() {
    let program = "var a = random(from: 2, to: 3)\nvar b = random(from: 2, to: 3)";
    let first = run(program);
    let second = run(program);
    for name in ["a", "b"] {
        let value = number(&first, name);
        assert!((2.0..=3.0).contains(&value), "{name} = {value}");
        assert!((value - number(&second, name)).abs() < f64::EPSILON);
    }
    assert!((number(&first, "a") - number(&first, "b")).abs() > 0.0);
}

#[test]
fn random_with_reversed_bounds() {
    let err = run_err("var a = random(from: 3, to: 2)");
    assert!(err.message.contains("must not be larger"), "got: {}", err.message);
}

// ---------------------------------------------------------------------------
// Drawing
// ---------------------------------------------------------------------------

#[test]
fn drawing_builtins_add_to_the_canvas() {
    let interp = run(
        "var o = Pol(r: 0, phi: 0)\n\
         circle(center: o, radius: 1)\n\
         arc(center: o, radius: 1, from: 0, to: M_PI)\n\
         line(from: o, to: Pol(r: 2, phi: 1))\n\
         mark(center: o, radius: 0.1)",
    );
    assert_eq!(interp.canvas.paths.len(), 3);
    assert!(interp.canvas.paths[0].closed);
    assert!(!interp.canvas.paths[2].closed);
    assert_eq!(interp.canvas.marks.len(), 1);
}

#[test]
fn drawing_returns_no_value() {
    assert_eq!(
        last_value("circle(center: Pol(r: 0, phi: 0), radius: 1)"),
        Value::Vacuous
    );
}

#[test]
fn radius_must_be_positive() {
    let err = run_err("circle(center: Pol(r: 0, phi: 0), radius: 0)");
    assert_eq!(err.kind, ErrorKind::InvalidArgument);
    assert!(err.message.contains("radius must be positive"), "got: {}", err.message);
}

#[test]
fn clear_and_resolution() {
    let interp = run(
        "resolution(samples: 10)\nline(from: Pol(r: 0, phi: 0), to: Pol(r: 1, phi: 0))",
    );
    assert_eq!(interp.canvas.resolution(), 10);
    assert_eq!(interp.canvas.paths[0].len(), 11);

    let interp = run("circle(center: Pol(r: 0, phi: 0), radius: 1)\nclear");
    assert!(interp.canvas.is_empty());

    let err = run_err("resolution(samples: 0)");
    assert_eq!(err.kind, ErrorKind::InvalidArgument);
}

#[test]
fn curve_angle_samples_its_expression() {
    let interp = run(
        "resolution(samples: 20)\n\
         curve_angle(from: Pol(r: 2, phi: 0), to: Pol(r: 0.5, phi: 0), angle: radial(of: _p) / 4)",
    );
    let path = &interp.canvas.paths[0];
    assert_eq!(path.len(), 21);
    assert!(!path.closed);
    let first = path.points[0];
    let last = path.points[20];
    assert!((first.r - 0.5).abs() < 1e-12, "endpoints are ordered by radius");
    assert!((first.phi - 0.125).abs() < 1e-12);
    assert!((last.r - 2.0).abs() < 1e-12);
    assert!((last.phi - 0.5).abs() < 1e-12);
    assert!(interp.state.lookup("_p").is_none(), "cursor scope was closed");
}

#[test]
fn curve_distance_follows_the_segment() {
    let interp = run(
        "resolution(samples: 10)\n\
         curve_distance(from: Pol(r: 1, phi: 0), to: Pol(r: 1, phi: M_PI), distance: 0)",
    );
    let path = &interp.canvas.paths[0];
    assert_eq!(path.len(), 11);
    assert!((path.points[0].r - 1.0).abs() < 1e-9);
    assert!(path.points[5].r < 1e-9, "midpoint is the origin");
    assert!((path.points[10].r - 1.0).abs() < 1e-9);
}

#[test]
fn curve_errors_close_the_cursor_scope() {
    let mut interp = Interpreter::new();
    let err = interp
        .run("curve_distance(from: Pol(r: 0, phi: 0), to: Pol(r: 1, phi: 0), distance: \"far\")")
        .expect_err("distance is not a number");
    assert_eq!(err.kind, ErrorKind::TypeError);
    assert_eq!(interp.state.depth(), 1);
    assert!(interp.canvas.is_empty());
}

// ---------------------------------------------------------------------------
// Saving
// ---------------------------------------------------------------------------

#[test]
fn save_writes_svg_and_ipe() {
    let fs = MemoryFs::default();
    let mut interp = Interpreter::new();
    interp.set_filesystem(Box::new(fs.clone()));
    interp
        .run(
            "circle(center: Pol(r: 0, phi: 0), radius: 1)\n\
             save(file: \"out.svg\")\n\
             save(file: \"out.ipe\")",
        )
        .expect("program should run");
    let svg = fs.get("out.svg").expect("svg written");
    assert!(svg.contains("<svg"), "got: {svg}");
    let ipe = fs.get("out.ipe").expect("ipe written");
    assert!(ipe.contains("<ipe"), "got: {ipe}");
}

#[test]
fn save_rejects_unknown_formats() {
    let err = run_err("save(file: \"out.png\")");
    assert_eq!(err.kind, ErrorKind::InvalidArgument);
    assert!(err.message.contains("Unknown file format"), "got: {}", err.message);
}

#[test]
fn save_without_filesystem_fails() {
    let err = run_err("save(file: \"out.svg\")");
    assert_eq!(err.kind, ErrorKind::IoError);
}

// ---------------------------------------------------------------------------
// Diagnostics
// ---------------------------------------------------------------------------

#[test]
fn runtime_error_is_recorded_once_with_its_line() {
    let mut interp = Interpreter::new();
    let err = interp.run("var a = 1\nvar b = c").expect_err("c is undeclared");
    assert_eq!(err.line, Some(2));
    assert_eq!(err.source.as_deref(), Some("var b = c"));
    let errors: Vec<_> = interp.diagnostics.iter().filter(|d| d.is_error()).collect();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0], &err);
    let shown = err.to_string();
    assert!(shown.starts_with("Error in line 2: 'var b = c'."), "got: {shown}");
}

#[test]
fn parse_errors_stop_the_whole_run() {
    let mut interp = Interpreter::new();
    let err = interp
        .run("var a = 1\ncircle(center: p)")
        .expect_err("missing argument");
    assert_eq!(err.kind, ErrorKind::InvalidArguments);
    assert!(interp.state.lookup("a").is_none());
    assert!(
        interp
            .diagnostics
            .iter()
            .any(|d| d.severity == Severity::Info && d.message.contains("circle(center:radius)")),
        "usage note recorded"
    );
}

#[test]
fn later_runs_continue_line_numbers() {
    let mut interp = Interpreter::new();
    interp.run("var a = 1\nvar b = 2").expect("first chunk runs");
    let err = interp.run("var c = d").expect_err("d is undeclared");
    assert_eq!(err.line, Some(3));
    assert!((number(&interp, "a") - 1.0).abs() < 1e-12, "state survives runs");
}

#[test]
fn escaped_newline_stays_inside_the_string() {
    let mut interp = run("print(message: \"a\\nb\")\nvar c = 1");
    assert_eq!(interp.take_output(), "a\nb\n");
    assert!((number(&interp, "c") - 1.0).abs() < 1e-12);
}

#[test]
fn escaped_newlines_keep_line_numbers() {
    let mut interp = Interpreter::new();
    let err = interp
        .run("var s = \"x\\ny\"\nvar b = nowhere")
        .expect_err("nowhere is undeclared");
    assert_eq!(err.line, Some(2));
    assert_eq!(err.source.as_deref(), Some("var b = nowhere"));
}

#[test]
fn string_with_several_escapes() {
    let interp = run("var a = 1\nvar b = 2\nvar s = \"\\(a) and \\(b) and \\(a + b)!\"");
    let (value, _) = interp.state.lookup("s").expect("s is defined");
    assert_eq!(
        value,
        &Value::String("1.000000 and 2.000000 and 3.000000!".into())
    );
}

#[test]
fn loop_variable_changed_in_body_is_reread() {
    let mut interp = run("for i in [0, 1, 10] {\nprint(message: i)\ni = i + 4\n}");
    assert_eq!(interp.take_output(), "0.000000\n5.000000\n10.000000\n");
}
