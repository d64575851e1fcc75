use rox::ast::{ExprId, Stmt};
use rox::ast_printer::AstPrinter;
use rox::error::{Diagnostics, LoxError};
use rox::parser::Parser;
use rox::scanner::scan_all;

fn parse(source: &str) -> Result<Vec<Stmt>, Vec<LoxError>> {
    let mut diagnostics = Diagnostics::new();
    let tokens = scan_all(source.as_bytes(), &mut diagnostics);
    assert!(diagnostics.is_empty(), "unexpected lex errors: {}", diagnostics);
    Parser::new(&tokens).parse()
}

fn printed(source: &str) -> Vec<String> {
    let statements = parse(source).unwrap_or_else(|e| panic!("parse failed: {:?}", e));
    statements
        .iter()
        .map(|stmt| AstPrinter.print_stmt(stmt))
        .collect()
}

fn errors(source: &str) -> Vec<String> {
    match parse(source) {
        Ok(statements) => panic!("expected parse errors, got {:?}", statements),
        Err(errors) => errors.iter().map(|e| e.to_string()).collect(),
    }
}

#[test]
fn precedence_and_grouping() {
    assert_eq!(
        printed("print 1 + 2 * 3; var x = -(1.5); !true == false;"),
        [
            "(print (+ 1.0 (* 2.0 3.0)))",
            "(var x (- (group 1.5)))",
            "(; (== (! true) false))",
        ]
    );
}

#[test]
fn binary_operators_are_left_associative() {
    assert_eq!(printed("1 - 2 - 3;"), ["(; (- (- 1.0 2.0) 3.0))"]);
}

#[test]
fn assignment_is_right_associative_and_binds_loosest() {
    assert_eq!(
        printed("a = b = c or d and e;"),
        ["(; (= a (= b (or c (and d e)))))"]
    );
}

#[test]
fn property_access_calls_and_setters() {
    assert_eq!(
        printed("a.b(1, \"two\").c = nil;"),
        ["(; (.= (call (. a b) 1.0 two) c nil))"]
    );
}

#[test]
fn for_loop_desugars_to_while() {
    assert_eq!(
        printed("for (var i = 0; i < 3; i = i + 1) print i;"),
        ["(block (var i 0.0) (while (< i 3.0) (block (print i) (; (= i (+ i 1.0))))))"]
    );
}

#[test]
fn empty_for_clauses_loop_forever() {
    assert_eq!(printed("for (;;) tick();"), ["(while true (; (call tick)))"]);
}

#[test]
fn control_flow_statements() {
    assert_eq!(
        printed("if (a) print 1; else { print 2; } while (b) b = false;"),
        [
            "(if a (print 1.0) (block (print 2.0)))",
            "(while b (; (= b false)))",
        ]
    );
}

#[test]
fn functions_and_classes() {
    assert_eq!(
        printed(
            "fun add(a, b) { return a + b; }
             class B < A {
               init(x) { this.x = x; return; }
               m() { return super.m(); }
             }"
        ),
        [
            "(fun add (a b) (return (+ a b)))",
            "(class B < A (fun init (x) (; (.= this x x)) (return)) (fun m () (return (call (super m)))))",
        ]
    );
}

#[test]
fn invalid_assignment_target() {
    assert_eq!(
        errors("1 = 2;"),
        ["[line 1] Error at '=': Invalid assignment target."]
    );
    assert_eq!(
        errors("a + b = c;"),
        ["[line 1] Error at '=': Invalid assignment target."]
    );
}

#[test]
fn missing_semicolon_reports_at_end() {
    assert_eq!(
        errors("print 1"),
        ["[line 1] Error at end: Expect ';' after value."]
    );
}

#[test]
fn recovers_and_reports_every_error() {
    assert_eq!(
        errors("var = 1;\nprint ;\nvar ok = 2;\nclass { }"),
        [
            "[line 1] Error at '=': Expect variable name.",
            "[line 2] Error at ';': Expect expression.",
            "[line 4] Error at '{': Expect class name.",
        ]
    );
}

#[test]
fn too_many_arguments() {
    let args: Vec<String> = (0..256).map(|i| i.to_string()).collect();
    let source = format!("f({});", args.join(", "));

    let errors = errors(&source);
    assert_eq!(errors.len(), 1);
    assert!(errors[0].ends_with("Can't have more than 255 arguments."));
}

#[test]
fn every_expression_gets_its_own_id() {
    let tokens = scan_all(b"x; x;", &mut Diagnostics::new());
    let statements = Parser::new(&tokens).parse().unwrap();

    let ids: Vec<ExprId> = statements
        .iter()
        .map(|stmt| match stmt {
            Stmt::Expression(expr) => expr.id,
            other => panic!("expected an expression statement, got {:?}", other),
        })
        .collect();

    assert_eq!(ids, [ExprId(0), ExprId(1)]);
}

#[test]
fn ids_continue_from_the_seed() {
    let tokens = scan_all(b"1 + 2;", &mut Diagnostics::new());

    let mut parser = Parser::new(&tokens).starting_at(10);
    let statements = parser.parse().unwrap();

    match &statements[0] {
        Stmt::Expression(expr) => assert_eq!(expr.id, ExprId(12)),
        other => panic!("expected an expression statement, got {:?}", other),
    }
    assert_eq!(parser.next_id(), 13);
}
