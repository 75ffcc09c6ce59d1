//! End-to-end tests against the real Unix adapter: lines go through the
//! lexer, the segment walker and the orchestrator, and spawn actual
//! processes wired up with pipes and redirect files.

use std::fs;
use std::io::Cursor;

use pipesh::config::ConfigLoader;
use pipesh::error::Fault;
use pipesh::executor::Interpreter;
use pipesh::lexer::{Lexer, Token};
use pipesh::platform::UnixPlatform;
use tempfile::tempdir;

fn lex(line: &str) -> Vec<Token> {
    let mut lexer = Lexer::new();
    lexer.advance(line);
    lexer.advance("\n");
    assert!(lexer.is_line_complete(), "line left open: {line}");
    lexer.take_tokens()
}

fn run(line: &str) -> Result<(), Fault> {
    let mut interpreter = Interpreter::new(UnixPlatform::new());
    interpreter.run_line(&lex(line))
}

#[test]
fn redirect_out_writes_file() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("out.txt");
    run(&format!("echo hello > {}", out.display())).unwrap();
    assert_eq!(fs::read_to_string(&out).unwrap(), "hello\n");
}

#[test]
fn redirect_out_truncates() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("out.txt");
    run(&format!("echo aaaaaaaa > {}", out.display())).unwrap();
    run(&format!("echo b > {}", out.display())).unwrap();
    assert_eq!(fs::read_to_string(&out).unwrap(), "b\n");
}

#[test]
fn redirect_append_keeps_contents() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("log.txt");
    run(&format!("echo one > {}", out.display())).unwrap();
    run(&format!("echo two >> {}", out.display())).unwrap();
    assert_eq!(fs::read_to_string(&out).unwrap(), "one\ntwo\n");
}

#[test]
fn redirect_in_feeds_stdin() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("in.txt");
    let out = dir.path().join("out.txt");
    fs::write(&input, "from file\n").unwrap();
    run(&format!("cat < {} > {}", input.display(), out.display())).unwrap();
    assert_eq!(fs::read_to_string(&out).unwrap(), "from file\n");
}

#[test]
fn pipeline_connects_stages() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("out.txt");
    run(&format!("echo hello | cat > {}", out.display())).unwrap();
    assert_eq!(fs::read_to_string(&out).unwrap(), "hello\n");
}

#[test]
fn three_stage_pipeline() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("out.txt");
    run(&format!("echo deep | cat | cat > {}", out.display())).unwrap();
    assert_eq!(fs::read_to_string(&out).unwrap(), "deep\n");
}

#[test]
fn quoted_argument_reaches_child_intact() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("out.txt");
    run(&format!("echo \"a b\" > {}", out.display())).unwrap();
    assert_eq!(fs::read_to_string(&out).unwrap(), "a b\n");
}

#[test]
fn missing_input_file_faults_without_running() {
    let err = run("cat < /nonexistent/definitely/missing.txt").unwrap_err();
    assert_eq!(
        err,
        Fault::OpenFile("/nonexistent/definitely/missing.txt".to_string())
    );
}

#[test]
fn leading_operator_faults() {
    let err = run("| ls").unwrap_err();
    assert_eq!(err, Fault::UnexpectedToken("|".to_string()));
}

#[test]
fn double_redirect_faults_and_leaves_first_file_untouched_by_second() {
    let dir = tempdir().unwrap();
    let a = dir.path().join("a.txt");
    let b = dir.path().join("b.txt");
    let err = run(&format!("echo x > {} > {}", a.display(), b.display())).unwrap_err();
    assert_eq!(err, Fault::Redirection(b.display().to_string()));
    // the conflict is detected before the second open
    assert!(!b.exists());
}

#[test]
fn exec_failure_stays_in_the_child() {
    // the child reports and exits nonzero; the shell sees a normal exit
    assert_eq!(run("definitely-not-a-real-program-xyz"), Ok(()));
}

#[test]
fn full_session_over_a_reader() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("out.txt");
    let script = format!(
        "echo one > {out}\necho two >> {out}\necho three | cat >> {out}\n",
        out = out.display()
    );
    let config = ConfigLoader::default_config();
    let mut interpreter = Interpreter::new(UnixPlatform::new());
    pipesh::repl::run(Cursor::new(script), &mut interpreter, &config).unwrap();
    assert_eq!(fs::read_to_string(&out).unwrap(), "one\ntwo\nthree\n");
}
