use std::path::Path;
use std::process::Output;

use assert_cmd::Command;
use walkdir::WalkDir;

fn rox(args: &[&str]) -> Output {
    let mut cmd = Command::cargo_bin("rox").unwrap();
    cmd.args(args).output().unwrap()
}

fn stdout_of(output: &Output) -> String {
    String::from_utf8(output.stdout.clone()).unwrap()
}

fn stderr_of(output: &Output) -> String {
    String::from_utf8(output.stderr.clone()).unwrap()
}

/// Collects every `// expect: ` annotation in the file, in order.
fn find_expects(filename: &Path) -> Vec<String> {
    let content = std::fs::read_to_string(filename)
        .unwrap_or_else(|_| panic!("failed to read {}", filename.display()));

    let marker = "// expect: ";
    content
        .lines()
        .filter_map(|line| line.rfind(marker).map(|idx| line[idx + marker.len()..].to_string()))
        .collect()
}

#[test]
fn run_all_programs() {
    let entries = WalkDir::new("./tests/data/programs/")
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file());

    for entry in entries {
        let filename = entry.path();
        print!("{} ... ", filename.display());

        let expected = find_expects(filename).join("\n");
        let output = rox(&["run", filename.to_str().unwrap()]);

        let stdout = stdout_of(&output);
        let stderr = stderr_of(&output);

        assert!(output.status.success(), "stderr={}", stderr);
        assert_eq!(expected, stdout.trim_end(), "stderr={}", stderr);

        println!("OK");
    }
}

#[test]
fn runtime_error_exits_70() {
    let output = rox(&["run", "tests/data/errors/undefined.lox"]);

    assert_eq!(output.status.code(), Some(70));
    assert_eq!(stdout_of(&output), "before\n");
    assert_eq!(
        stderr_of(&output).trim_end(),
        "Undefined variable 'undefinedVariable'.\n[line 2]"
    );
}

#[test]
fn static_errors_exit_65_before_running() {
    let output = rox(&["run", "tests/data/errors/static_error.lox"]);

    assert_eq!(output.status.code(), Some(65));
    assert_eq!(stdout_of(&output), "");

    let stderr = stderr_of(&output);
    assert!(stderr.contains("[line 2] Error at 'return': Can't return from top-level code."));
    assert!(stderr.contains(
        "[line 4] Error at 'shadow': Can't read local variable in its own initializer."
    ));
}

#[test]
fn missing_file_fails() {
    let output = rox(&["run", "tests/data/does_not_exist.lox"]);

    assert!(!output.status.success());
    assert!(stderr_of(&output).contains("Failed to open file"));
}

#[test]
fn missing_filename_is_not_an_error() {
    let output = rox(&["run"]);

    assert_eq!(output.status.code(), Some(0));
    assert_eq!(
        stdout_of(&output),
        "No input filepath was provided. Exiting...\n"
    );
}

#[test]
fn tokenize_prints_tokens_and_lex_errors() {
    let output = rox(&["tokenize", "tests/data/errors/unexpected_char.lox"]);

    assert_eq!(output.status.code(), Some(65));

    let stdout = stdout_of(&output);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines[0], "VAR var null");
    assert_eq!(lines[3], "NUMBER 1 1.0");
    assert_eq!(lines.last(), Some(&"EOF  null"));

    assert_eq!(
        stderr_of(&output).trim_end(),
        "[line 2] Error: Unexpected character: @"
    );
}

#[test]
fn tokenize_json() {
    let output = rox(&["tokenize", "--json", "tests/data/programs/fib.lox"]);
    assert!(output.status.success());

    let stdout = stdout_of(&output);
    let first: serde_json::Value = serde_json::from_str(stdout.lines().next().unwrap()).unwrap();

    assert_eq!(first["token_type"], "FUN");
    assert_eq!(first["lexeme"], "fun");
    assert_eq!(first["line"], 1);
}

#[test]
fn parse_prints_the_tree() {
    let output = rox(&["parse", "tests/data/programs/fib.lox"]);
    assert!(output.status.success());

    let stdout = stdout_of(&output);
    let first = stdout.lines().next().unwrap();
    assert!(
        first.starts_with("(fun fib (n) (if (<= n 1.0) (return n))"),
        "got {}",
        first
    );
}

#[test]
fn repl_keeps_state_and_survives_errors() {
    let mut cmd = Command::cargo_bin("rox").unwrap();
    let output = cmd
        .arg("repl")
        .write_stdin("var a = 1;\nprint nope;\nprint a + 1;\nfun f() { return a; }\nprint f();\n")
        .output()
        .unwrap();

    assert!(output.status.success());

    let stdout = stdout_of(&output);
    let printed: Vec<&str> = stdout
        .split("> ")
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();
    assert_eq!(printed, ["2", "1"]);

    assert!(stderr_of(&output).contains("Undefined variable 'nope'."));
}
