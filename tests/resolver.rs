mod common;

use common::{output, run, static_errors};
use rox::ast::ExprId;
use rox::error::{Diagnostics, LoxError};
use rox::interpreter::Interpreter;
use rox::parser::Parser;
use rox::resolver::Resolver;
use rox::scanner::scan_all;

/// Resolve `source` and return the recorded depth of every expression id, in
/// id order.  `None` means the occurrence is treated as a global.
fn depths(source: &str) -> Vec<Option<usize>> {
    let mut diagnostics = Diagnostics::new();
    let tokens = scan_all(source.as_bytes(), &mut diagnostics);
    assert!(diagnostics.is_empty());

    let mut parser = Parser::new(&tokens);
    let statements = parser.parse().expect("source should parse");

    let mut interpreter = Interpreter::new();
    Resolver::new(&mut interpreter)
        .resolve(&statements)
        .expect("source should resolve");

    (0..parser.next_id())
        .map(|id| interpreter.resolved_depth(ExprId(id)))
        .collect()
}

#[test]
fn globals_are_not_recorded() {
    // 1, g
    assert_eq!(depths("var g = 1; { print g; }"), [None, None]);
}

#[test]
fn locals_record_the_number_of_scopes_crossed() {
    // 1, a
    assert_eq!(depths("{ var a = 1; { print a; } }"), [None, Some(1)]);
}

#[test]
fn parameters_live_in_the_function_scope() {
    // x
    assert_eq!(depths("fun f(x) { return x; }"), [Some(0)]);
}

#[test]
fn closures_see_through_the_function_scope() {
    // 1, a
    assert_eq!(
        depths("{ var a = 1; fun f() { print a; } }"),
        [None, Some(1)]
    );
}

#[test]
fn assignment_records_its_own_occurrence() {
    // a (absorbed into the assignment), 2, a = 2
    assert_eq!(depths("{ var a; a = 2; }"), [None, None, Some(0)]);
}

#[test]
fn this_and_super_resolve_to_implicit_scopes() {
    // this
    assert_eq!(depths("class K { m() { return this; } }"), [Some(1)]);

    // A (superclass), super.m, call
    assert_eq!(
        depths("class A {} class B < A { m() { super.m(); } }"),
        [None, Some(2), None]
    );
}

#[test]
fn redeclaring_a_local_is_an_error() {
    assert_eq!(
        static_errors("{ var a = 1; var a = 2; }"),
        ["[line 1] Error at 'a': Already a variable with this name in this scope."]
    );
}

#[test]
fn redeclaring_a_global_is_allowed() {
    assert_eq!(output("var a = 1; var a = 2; print a;"), ["2"]);
}

#[test]
fn reading_a_local_in_its_own_initializer() {
    assert_eq!(
        static_errors("{ var a = a; }"),
        ["[line 1] Error at 'a': Can't read local variable in its own initializer."]
    );
}

#[test]
fn global_initializer_may_mention_its_own_name() {
    let (_, result) = run("var a = a;");
    assert!(matches!(result, Err(LoxError::Runtime(_))));
}

#[test]
fn return_outside_a_function() {
    assert_eq!(
        static_errors("return 1;"),
        ["[line 1] Error at 'return': Can't return from top-level code."]
    );
}

#[test]
fn returning_a_value_from_an_initializer() {
    assert_eq!(
        static_errors("class A { init() { return 1; } }"),
        ["[line 1] Error at 'return': Can't return a value from an initializer."]
    );
}

#[test]
fn bare_return_in_an_initializer_is_fine() {
    assert_eq!(
        output("class A { init() { return; } } print A();"),
        ["<instanceof <class A>>"]
    );
}

#[test]
fn this_outside_a_class() {
    assert_eq!(
        static_errors("print this;"),
        ["[line 1] Error at 'this': Can't use 'this' outside of a class."]
    );
    assert_eq!(
        static_errors("fun f() { return this; }"),
        ["[line 1] Error at 'this': Can't use 'this' outside of a class."]
    );
}

#[test]
fn class_inheriting_from_itself() {
    assert_eq!(
        static_errors("class A < A {}"),
        ["[line 1] Error at 'A': A class can't inherit from itself."]
    );
}

#[test]
fn super_outside_a_class() {
    assert_eq!(
        static_errors("super.m();"),
        ["[line 1] Error at 'super': Can't use 'super' outside of a class."]
    );
}

#[test]
fn super_without_a_superclass() {
    assert_eq!(
        static_errors("class A { m() { super.m(); } }"),
        ["[line 1] Error at 'super': Can't use 'super' in a class with no superclass."]
    );
}

#[test]
fn every_static_error_is_reported_and_nothing_runs() {
    let source = "print \"side effect\";\nreturn 1;\n{ var b = b; }\nprint this;";
    let (lines, result) = run(source);

    assert!(lines.is_empty());
    match result {
        Err(LoxError::Static(diagnostics)) => {
            let messages: Vec<String> = diagnostics.iter().map(|e| e.to_string()).collect();
            assert_eq!(
                messages,
                [
                    "[line 2] Error at 'return': Can't return from top-level code.",
                    "[line 3] Error at 'b': Can't read local variable in its own initializer.",
                    "[line 4] Error at 'this': Can't use 'this' outside of a class.",
                ]
            );
        }
        other => panic!("expected static errors, got {:?}", other),
    }
}

#[test]
fn syntax_and_lexical_errors_are_reported_together() {
    let errors = static_errors("var a = @;\nprint ;");

    assert_eq!(errors.len(), 3);
    assert_eq!(errors[0], "[line 1] Error: Unexpected character: @");
}
