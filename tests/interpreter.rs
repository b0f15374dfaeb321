use monkey_interpreter as monkey;

use monkey::environment::Environment;
use monkey::interpreter::{eval, Interpreter};
use monkey::parse_source;
use monkey::value::Value;
use pretty_assertions::assert_eq;

fn run(source: &str) -> Value {
    let (program, errors) = parse_source(source);
    assert!(errors.is_empty(), "parse errors for {:?}: {:?}", source, errors);

    let env = Environment::new_root();
    eval(&program, &env)
}

fn assert_integer(source: &str, expected: i64) {
    assert_eq!(run(source), Value::Integer(expected), "source: {}", source);
}

fn assert_boolean(source: &str, expected: bool) {
    assert_eq!(run(source), Value::Boolean(expected), "source: {}", source);
}

fn assert_null(source: &str) {
    assert_eq!(run(source), Value::Null, "source: {}", source);
}

fn assert_error(source: &str, expected: &str) {
    assert_eq!(
        run(source),
        Value::Error(expected.to_string()),
        "source: {}",
        source
    );
}

#[test]
fn test_integer_arithmetic() {
    let cases = [
        ("5", 5),
        ("-10", -10),
        ("5 + 5 + 5 + 5 - 10", 10),
        ("2 * 2 * 2 * 2 * 2", 32),
        ("5 + 5 * 2", 15),
        ("10 / 2 - 3", 2),
        ("-50 + 100 + -50", 0),
        ("20 + 2 * -10", 0),
        ("2 * (5 + 10)", 30),
        ("3 * 3 * 3 + 10", 37),
        ("(5 + 10 * 2 + 15 / 3) * 2 + -10", 50),
        ("7 / 2", 3),
        ("-7 / 2", -3),
    ];

    for (source, expected) in cases {
        assert_integer(source, expected);
    }
}

#[test]
fn test_integer_overflow_wraps() {
    assert_integer("9223372036854775807 + 1", i64::MIN);
    assert_integer("-9223372036854775807 - 2", i64::MAX);
    assert_integer("let min = -9223372036854775807 - 1; min / -1", i64::MIN);
    assert_integer("let min = -9223372036854775807 - 1; -min", i64::MIN);
}

#[test]
fn test_boolean_expressions() {
    let cases = [
        ("true", true),
        ("false", false),
        ("1 < 2", true),
        ("1 > 2", false),
        ("1 == 1", true),
        ("1 != 1", false),
        ("1 != 2", true),
        ("true == true", true),
        ("false == false", true),
        ("true == false", false),
        ("true != false", true),
        ("(1 < 2) == true", true),
        ("(1 > 2) == true", false),
    ];

    for (source, expected) in cases {
        assert_boolean(source, expected);
    }
}

#[test]
fn test_bang_operator_uses_truthiness() {
    let cases = [
        ("!true", false),
        ("!false", true),
        ("!5", false),
        ("!0", false),
        ("!!true", true),
        ("!!5", true),
        ("!\"\"", false),
        ("!if (false) { 1 }", true),
    ];

    for (source, expected) in cases {
        assert_boolean(source, expected);
    }
}

#[test]
fn test_string_concatenation() {
    assert_eq!(
        run("\"Hello\" + \" \" + \"World!\""),
        Value::String("Hello World!".to_string())
    );
}

#[test]
fn test_if_else_expressions() {
    assert_integer("if (true) { 10 }", 10);
    assert_null("if (false) { 10 }");
    assert_integer("if (1) { 10 }", 10);
    assert_integer("if (0) { 10 }", 10);
    assert_integer("if (1 < 2) { 10 }", 10);
    assert_null("if (1 > 2) { 10 }");
    assert_integer("if (1 > 2) { 10 } else { 20 }", 20);
    assert_integer("if (1 < 2) { 10 } else { 20 }", 10);
}

#[test]
fn test_return_statements() {
    assert_integer("return 10;", 10);
    assert_integer("return 10; 9;", 10);
    assert_integer("return 2 * 5; 9;", 10);
    assert_integer("9; return 2 * 5; 9;", 10);
    assert_null("return;");
    assert_integer(
        "if (10 > 1) { if (10 > 1) { return 10; } return 1; }",
        10,
    );
    assert_integer(
        "let f = fn(x) { return x; x + 10; }; f(10);",
        10,
    );
    assert_integer(
        "let f = fn(x) { let result = x + 10; return result; return 10; }; f(10);",
        20,
    );
}

#[test]
fn test_return_stops_at_call_boundary() {
    assert_integer("let f = fn() { return 1; }; f() + 10;", 11);
    assert_integer(
        "let inner = fn() { return 1; }; let outer = fn() { inner(); 2 }; outer()",
        2,
    );
}

#[test]
fn test_return_inside_if_value_leaves_function() {
    assert_integer(
        "let f = fn() { let x = if (true) { return 5; }; 10 }; f()",
        5,
    );
    assert_integer("fn() { 1 + if (true) { return 2; } }()", 2);
    assert_integer("fn() { -if (true) { return 8; } }()", 8);
    assert_integer("fn() { {\"a\": if (true) { return 3; }} }()", 3);
    assert_integer("fn() { [1, 2][if (true) { return 7; }] }()", 7);
    assert_integer(
        "fn() { if (if (true) { return 6; }) { 1 } else { 2 } }()",
        6,
    );
    assert_integer(
        "let id = fn(x) { x }; let f = fn() { id(if (true) { return 4; }); 0 }; f()",
        4,
    );

    // Unwrapped at program level, never stored inside the array.
    assert_eq!(run("[if (true) { return 1; }]"), Value::Integer(1));
    assert_eq!(
        run("let f = fn() { [if (true) { return 1; }] }; f()"),
        Value::Integer(1)
    );
}

#[test]
fn test_error_handling() {
    let cases = [
        ("5 + true;", "type mismatch: INTEGER + BOOLEAN"),
        ("5 + true; 5;", "type mismatch: INTEGER + BOOLEAN"),
        ("-true", "unknown operator: -BOOLEAN"),
        ("-\"a\"", "unknown operator: -STRING"),
        ("true + false;", "unknown operator: BOOLEAN + BOOLEAN"),
        ("true < false;", "unknown operator: BOOLEAN < BOOLEAN"),
        ("5; true + false; 5", "unknown operator: BOOLEAN + BOOLEAN"),
        ("if (10 > 1) { true + false; }", "unknown operator: BOOLEAN + BOOLEAN"),
        (
            "if (10 > 1) { if (10 > 1) { return true + false; } return 1; }",
            "unknown operator: BOOLEAN + BOOLEAN",
        ),
        ("foobar", "identifier not found: foobar"),
        ("\"Hello\" - \"World\"", "unknown operator: STRING - STRING"),
        ("\"a\" == \"a\"", "unknown operator: STRING == STRING"),
        ("1 == true", "type mismatch: INTEGER == BOOLEAN"),
        ("10 / 0", "division by zero: 10 / 0"),
        ("5(1)", "not a function: INTEGER"),
        ("fn(x) { x }()", "wrong number of arguments: want=1, got=0"),
        (
            "{\"name\": \"Monkey\"}[fn(x) { x }];",
            "index operator not supported: HASH[FUNCTION]",
        ),
        ("{[1]: 2}", "unusable as hash key: ARRAY"),
        ("1[0]", "index operator not supported: INTEGER[INTEGER]"),
        ("[1, 2][\"a\"]", "index operator not supported: ARRAY[STRING]"),
    ];

    for (source, expected) in cases {
        assert_error(source, expected);
    }
}

#[test]
fn test_errors_short_circuit_enclosing_block() {
    // Reaching the second statement would change the resulting message.
    assert_error(
        "let f = fn() { foobar; missing; }; f()",
        "identifier not found: foobar",
    );
    assert_error(
        "if (true) { 5 + true; let x = missing; }",
        "type mismatch: INTEGER + BOOLEAN",
    );
}

#[test]
fn test_errors_short_circuit_argument_and_element_lists() {
    assert_error("let f = fn(a, b) { a }; f(one, two)", "identifier not found: one");
    assert_error("[1, nope, also_nope]", "identifier not found: nope");
    assert_error("{\"a\": bad, worse: 1}", "identifier not found: bad");
    assert_error("missing(1)", "identifier not found: missing");
    assert_error("let x = oops; x", "identifier not found: oops");
}

#[test]
fn test_let_statements() {
    assert_integer("let a = 5; a;", 5);
    assert_integer("let a = 5 * 5; a;", 25);
    assert_integer("let a = 5; let b = a; b;", 5);
    assert_integer("let a = 5; let b = a; let c = a + b + 5; c;", 15);
    assert_integer("let a = 1; let a = a + 1; a", 2);
    assert_null("let a = 5;");
}

#[test]
fn test_function_object() {
    match run("fn(x) { x + 2; };") {
        Value::Function(function) => {
            let params: Vec<&str> = function
                .literal
                .parameters
                .iter()
                .map(|p| p.value.as_str())
                .collect();
            assert_eq!(params, vec!["x"]);
            assert_eq!(function.literal.body.to_string(), "{ (x + 2) }");
        }
        other => panic!("expected a function, got {:?}", other),
    }
}

#[test]
fn test_function_application() {
    assert_integer("let identity = fn(x) { x; }; identity(5);", 5);
    assert_integer("let identity = fn(x) { return x; }; identity(5);", 5);
    assert_integer("let double = fn(x) { x * 2; }; double(5);", 10);
    assert_integer("let add = fn(x, y) { x + y; }; add(5, 5);", 10);
    assert_integer("let add = fn(x, y) { x + y; }; add(5 + 5, add(5, 5));", 20);
    assert_integer("fn(x) { x; }(5)", 5);
    assert_null("fn() { }()");
}

#[test]
fn test_closures() {
    assert_integer(
        "let newAdder = fn(x) { fn(y) { x + y } }; let addTwo = newAdder(2); addTwo(3);",
        5,
    );
}

#[test]
fn test_closure_sees_later_rebinding_of_captured_scope() {
    assert_integer("let x = 1; let f = fn() { x }; let x = 2; f()", 2);
    assert_integer(
        "let make = fn() { let n = 1; let get = fn() { n }; let n = 41; get }; make()() + 1",
        42,
    );
}

#[test]
fn test_parameters_shadow_without_leaking() {
    assert_integer("let x = 10; let f = fn(x) { x * 2 }; f(3) + x", 16);
    assert_error("let f = fn(y) { y }; f(1); y", "identifier not found: y");
}

#[test]
fn test_recursion() {
    assert_integer(
        "let fib = fn(n) { if (n < 2) { n } else { fib(n - 1) + fib(n - 2) } }; fib(15)",
        610,
    );
    assert_integer(
        "let countdown = fn(n) { if (n == 0) { return 0; } countdown(n - 1) }; countdown(50)",
        0,
    );
}

#[test]
fn test_higher_order_functions() {
    let source = "
        let map = fn(arr, f) {
            let iter = fn(arr, acc) {
                if (len(arr) == 0) { acc } else { iter(rest(arr), push(acc, f(first(arr)))) }
            };
            iter(arr, []);
        };
        let reduce = fn(arr, initial, f) {
            let iter = fn(arr, result) {
                if (len(arr) == 0) { result } else { iter(rest(arr), f(result, first(arr))) }
            };
            iter(arr, initial);
        };
        let doubled = map([1, 2, 3, 4], fn(x) { x * 2 });
        reduce(doubled, 0, fn(acc, x) { acc + x })
    ";

    assert_integer(source, 20);
}

#[test]
fn test_array_literals_and_indexing() {
    assert_eq!(
        run("[1, 2 * 2, 3 + 3]"),
        Value::Array(vec![
            Value::Integer(1),
            Value::Integer(4),
            Value::Integer(6)
        ])
    );

    assert_integer("[1, 2, 3][0]", 1);
    assert_integer("[1, 2, 3][1]", 2);
    assert_integer("[1, 2, 3][2]", 3);
    assert_integer("let i = 0; [1][i];", 1);
    assert_integer("[1, 2, 3][1 + 1];", 3);
    assert_integer("let myArray = [1, 2, 3]; myArray[2];", 3);
    assert_integer(
        "let myArray = [1, 2, 3]; myArray[0] + myArray[1] + myArray[2];",
        6,
    );
    assert_null("[1, 2, 3][3]");
    assert_null("[1, 2, 3][5]");
    assert_null("[1, 2, 3][-1]");
}

#[test]
fn test_hash_literals_and_indexing() {
    let source = "
        let two = \"two\";
        {
            \"one\": 10 - 9,
            two: 1 + 1,
            \"thr\" + \"ee\": 6 / 2,
            4: 4,
            true: 5,
            false: 6
        }
    ";

    match run(source) {
        Value::Hash(pairs) => {
            assert_eq!(pairs.len(), 6);

            let lookups = [
                (Value::from("one"), 1),
                (Value::from("two"), 2),
                (Value::from("three"), 3),
                (Value::Integer(4), 4),
                (Value::Boolean(true), 5),
                (Value::Boolean(false), 6),
            ];

            for (key, expected) in lookups {
                let hash_key = key.hash_key().expect("hashable key");
                let pair = pairs.get(&hash_key).expect("key present");
                assert_eq!(pair.key, key);
                assert_eq!(pair.value, Value::Integer(expected));
            }
        }
        other => panic!("expected a hash, got {:?}", other),
    }

    assert_integer("{\"a\": 1}[\"a\"]", 1);
    assert_null("{\"a\": 1}[\"b\"]");
    assert_integer("let key = \"foo\"; {\"foo\": 5}[key]", 5);
    assert_null("{}[\"foo\"]");
    assert_integer("{5: 5}[5]", 5);
    assert_integer("{true: 5}[true]", 5);
    assert_integer("{false: 5}[false]", 5);
    // Integer 1 and boolean true are different keys.
    assert_null("{1: 5}[true]");
}

#[test]
fn test_duplicate_hash_keys_keep_last_value() {
    assert_integer("{\"a\": 1, \"a\": 2}[\"a\"]", 2);
    assert_integer("let h = {1: 1, 2: 2, 1: 3}; len([h[1], h[2]]) + h[1]", 5);
}

#[test]
fn test_builtin_functions() {
    assert_integer("len(\"\")", 0);
    assert_integer("len(\"four\")", 4);
    assert_integer("len(\"hello world\")", 11);
    assert_integer("len([1, 2, 3])", 3);
    assert_integer("len([])", 0);
    assert_error("len(1)", "argument to `len` not supported, got INTEGER");
    assert_error(
        "len(\"one\", \"two\")",
        "wrong number of arguments. got=2, want=1",
    );

    assert_integer("first([1, 2, 3])", 1);
    assert_null("first([])");
    assert_error("first(1)", "argument to `first` must be ARRAY, got INTEGER");

    assert_integer("last([1, 2, 3])", 3);
    assert_null("last([])");
    assert_error("last(1)", "argument to `last` must be ARRAY, got INTEGER");

    assert_eq!(
        run("rest([1, 2, 3])"),
        Value::Array(vec![Value::Integer(2), Value::Integer(3)])
    );
    assert_eq!(run("rest([1])"), Value::Array(vec![]));
    assert_null("rest([])");

    assert_eq!(run("push([], 1)"), Value::Array(vec![Value::Integer(1)]));
    assert_error("push(1, 1)", "argument to `push` must be ARRAY, got INTEGER");
    assert_integer("let a = [1]; let b = push(a, 2); len(a)", 1);

    assert_null("puts(\"hello\", 1)");
}

#[test]
fn test_builtins_resolve_after_scope_and_can_be_shadowed() {
    assert!(matches!(run("len"), Value::Builtin(b) if b.name == "len"));
    assert_integer("let len = fn(x) { 99 }; len([1])", 99);
}

#[test]
fn test_inspect_rendering() {
    let cases = [
        ("42", "42"),
        ("-7", "-7"),
        ("true", "true"),
        ("\"raw contents\"", "raw contents"),
        ("if (false) { 1 }", "null"),
        ("[1, \"two\", [true]]", "[1, two, [true]]"),
        ("{\"k\": 1}", "{k: 1}"),
        ("fn(x, y) { x + y }", "fn(x, y) { (x + y) }"),
        ("len", "builtin function len"),
        ("5 + true", "ERROR: type mismatch: INTEGER + BOOLEAN"),
    ];

    for (source, expected) in cases {
        assert_eq!(run(source).to_string(), expected, "source: {}", source);
    }
}

#[test]
fn test_interpreter_session_keeps_bindings() {
    let mut interpreter = Interpreter::new();

    let (first, _) = parse_source("let counter = fn(x) { x + 1 };");
    assert_eq!(interpreter.interpret(&first), Value::Null);

    let (second, _) = parse_source("counter(41)");
    assert_eq!(interpreter.interpret(&second), Value::Integer(42));

    assert!(interpreter.environment().borrow().get("counter").is_some());
}

#[test]
fn test_eval_accepts_individual_nodes() {
    let (program, errors) = parse_source("let a = 2; a * 21");
    assert!(errors.is_empty());

    let env = Environment::new_root();

    assert_eq!(eval(&program.statements[0], &env), Value::Null);
    assert_eq!(eval(&program.statements[1], &env), Value::Integer(42));
}
