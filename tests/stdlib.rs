mod common;

use common::{output, run};
use rox::error::{LoxError, RuntimeError};

#[test]
fn builtin_array_basics() {
    let lines = output(
        r#"
        var array = builtin_array(5);
        print array;
        print array.length;
        print array.get(2);
        array.set(2, "Hey!");
        print array.get(2);
        "#,
    );

    assert_eq!(lines, ["<native array>", "5", "nil", "Hey!"]);
}

#[test]
fn builtin_array_methods_are_native_functions() {
    let lines = output(
        r#"
        var array = builtin_array(1);
        var set = array.set;
        set(0, 42);
        print array.get(0);
        print set;
        "#,
    );

    assert_eq!(lines, ["42", "<native fn>"]);
}

#[test]
fn builtin_array_identity() {
    let lines = output(
        r#"
        var a = builtin_array(1);
        var b = a;
        print a == b;
        print a == builtin_array(1);
        "#,
    );

    assert_eq!(lines, ["true", "false"]);
}

#[test]
fn builtin_array_index_out_of_bounds() {
    match run("var a = builtin_array(2); a.get(2);").1 {
        Err(LoxError::Runtime(RuntimeError::Native { message, .. })) => {
            assert_eq!(message, "Array index out of bounds.");
        }
        other => panic!("expected a native error, got {:?}", other),
    }

    match run("builtin_array(2).set(-1, nil);").1 {
        Err(LoxError::Runtime(RuntimeError::Native { message, .. })) => {
            assert_eq!(message, "Array index out of bounds.");
        }
        other => panic!("expected a native error, got {:?}", other),
    }
}

#[test]
fn builtin_array_rejects_bad_arguments() {
    let (_, result) = run("builtin_array(\"five\");");
    let error = result.unwrap_err();
    assert!(error
        .to_string()
        .starts_with("Array length must be a non-negative integer."));
    assert_eq!(error.exit_code(), 70);

    let (_, result) = run("builtin_array(1).get(\"zero\");");
    assert!(result
        .unwrap_err()
        .to_string()
        .starts_with("Array index must be a number."));
}

#[test]
fn builtin_array_rejects_huge_lengths() {
    for source in [
        "var a = builtin_array(100000000000000000000000000000); print a.length;",
        "builtin_array(1000000000000);",
    ] {
        let (lines, result) = run(source);
        assert!(lines.is_empty());
        match result {
            Err(LoxError::Runtime(e @ RuntimeError::Native { .. })) => {
                assert_eq!(e.to_string(), "Array length too large.\n[line 1]");
            }
            other => panic!("expected a native error, got {:?}", other),
        }
    }

    assert_eq!(output("print builtin_array(0).length;"), ["0"]);
}

#[test]
fn builtin_array_unknown_property() {
    let (_, result) = run("builtin_array(1).push;");
    assert!(matches!(
        result,
        Err(LoxError::Runtime(RuntimeError::UndefinedProperty { .. }))
    ));
}

#[test]
fn builtin_array_arity_is_checked() {
    let (_, result) = run("builtin_array(1).get();");
    assert!(matches!(
        result,
        Err(LoxError::Runtime(RuntimeError::ArityMismatch {
            expected: 1,
            got: 0,
            ..
        }))
    ));
}

#[test]
fn array_add_and_remove() {
    let lines = output(
        r#"
        var array = Array();
        print array.length;
        array.add("first");
        print array.length;
        print array.get(0);
        print array.removeLast();
        print array.length;
        "#,
    );

    assert_eq!(lines, ["0", "1", "first", "first", "0"]);
}

#[test]
fn array_grows_past_its_initial_buffer() {
    let lines = output(
        r#"
        var array = Array();
        for (var i = 0; i < 100; i = i + 1) {
          array.add(i * i);
        }
        print array.length;
        print array.get(0);
        print array.get(9);
        print array.get(99);
        "#,
    );

    assert_eq!(lines, ["100", "0", "81", "9801"]);
}

#[test]
fn array_is_an_ordinary_class() {
    let lines = output(
        r#"
        class Stack < Array {
          peek() { return this.get(this.length - 1); }
        }

        var stack = Stack();
        stack.add(1);
        stack.add(2);
        print stack.peek();
        print Array;
        "#,
    );

    assert_eq!(lines, ["2", "<class Array>"]);
}

#[test]
fn remove_last_on_an_empty_array_fails() {
    let (_, result) = run("Array().removeLast();");
    assert!(matches!(
        result,
        Err(LoxError::Runtime(RuntimeError::Native { .. }))
    ));
}
