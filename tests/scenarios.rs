//! End-to-end translation scenarios for both backends

use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};

use pseudoc::{CompileError, CompileOptions, Target, compile, compile_to};

const PY_FOOTER: &str = "    return\n\n\nif __name__ == \"__main__\":\n    main()\n";
const CPP_HEADER: &str = "#include <iostream>\n#include <string>\n\nint main() {\n";
const CPP_FOOTER: &str = "    return 0;\n}\n";

const ARITHMETIC: &str = "DECLARE x: INTEGER\nx = 1 + 2\nOUTPUT x\n";
const COUNTED_LOOP: &str = "FOR i = 1 TO 3\n  OUTPUT i\nNEXT\n";
const BRANCH: &str = "IF 1 > 2 THEN\n  OUTPUT \"a\"\nELSE\n  OUTPUT \"b\"\nENDIF\n";
const POST_TEST_LOOP: &str = "REPEAT\n  OUTPUT \"x\"\nUNTIL 1 == 1\n";

fn python(source: &str) -> String {
    compile(source, Target::Python, &CompileOptions::default()).unwrap()
}

fn cpp(source: &str) -> String {
    compile(source, Target::Cpp, &CompileOptions::default()).unwrap()
}

fn python_program(body: &str) -> String {
    format!("def main():\n{}{}", body, PY_FOOTER)
}

fn cpp_program(body: &str) -> String {
    format!("{}{}{}", CPP_HEADER, body, CPP_FOOTER)
}

#[test]
fn arithmetic_program() {
    assert_eq!(
        python(ARITHMETIC),
        python_program("    x = 0  # INTEGER\n    x = 1 + 2\n    print(x)\n")
    );
    assert_eq!(
        cpp(ARITHMETIC),
        cpp_program("    int x = 0;\n    x = 1 + 2;\n    std::cout << x << std::endl;\n")
    );
}

#[test]
fn counted_loop_includes_upper_bound() {
    assert_eq!(
        python(COUNTED_LOOP),
        python_program("    for i in range(1, 3 + 1):\n        print(i)\n")
    );
    assert_eq!(
        cpp(COUNTED_LOOP),
        cpp_program("    for (int i = 1; i <= 3; i++) {\n        std::cout << i << std::endl;\n    }\n")
    );
}

#[test]
fn two_way_branch() {
    assert_eq!(
        python(BRANCH),
        python_program(
            "    if 1 > 2:\n        print(\"a\")\n    else:\n        print(\"b\")\n"
        )
    );
    assert_eq!(
        cpp(BRANCH),
        cpp_program(
            "    if (1 > 2) {\n        std::cout << \"a\" << std::endl;\n    } else {\n        std::cout << \"b\" << std::endl;\n    }\n"
        )
    );
}

#[test]
fn post_test_loop() {
    assert_eq!(
        python(POST_TEST_LOOP),
        python_program(
            "    while True:\n        print(\"x\")\n        if 1 == 1:\n            break\n"
        )
    );
    assert_eq!(
        cpp(POST_TEST_LOOP),
        cpp_program("    do {\n        std::cout << \"x\" << std::endl;\n    } while (!(1 == 1));\n")
    );
}

#[test]
fn redeclaration_writes_nothing() {
    let source = "DECLARE x: INTEGER\nDECLARE x: STRING\n";
    for target in Target::ALL {
        let mut sink = Vec::new();
        let err = compile_to(source, target, &CompileOptions::default(), &mut sink).unwrap_err();
        assert!(matches!(err, CompileError::Redeclaration { ref name, .. } if name == "x"));
        assert_eq!(err.to_string(), "Re-declaration of identifier 'x'");
        assert!(sink.is_empty());
    }
}

#[test]
fn compile_to_matches_compile() {
    let source = "DECLARE n: INTEGER\nINPUT n\nWHILE n > 0\n  OUTPUT n\n  n = n - 1\nENDWHILE\n";
    for target in Target::ALL {
        let mut sink = Vec::new();
        compile_to(source, target, &CompileOptions::default(), &mut sink).unwrap();
        let expected = compile(source, target, &CompileOptions::default()).unwrap();
        assert_eq!(String::from_utf8(sink).unwrap(), expected);
    }
}

#[test]
fn translation_is_deterministic() {
    let source = STEPPED_CHAIN;
    for target in Target::ALL {
        let first = compile(source, target, &CompileOptions::default()).unwrap();
        let second = compile(source, target, &CompileOptions::default()).unwrap();
        assert_eq!(first, second);
    }
}

#[test]
fn scope_is_restored_after_block() {
    let source = "IF 1 == 1 THEN\n  DECLARE x: INTEGER\nENDIF\nDECLARE x: STRING\nINPUT x\n";
    for target in Target::ALL {
        assert!(compile(source, target, &CompileOptions::default()).is_ok());
    }

    let source = "IF 1 == 1 THEN\n  DECLARE x: INTEGER\nENDIF\nx = 2\n";
    let err = compile(source, Target::Python, &CompileOptions::default()).unwrap_err();
    assert_eq!(err.to_string(), "Unknown identifier: 'x'");
}

#[test]
fn errors_carry_spans() {
    let source = "DECLARE x: INTEGER\nCONSTANT K = 1\nK = x\n";
    let err = compile(source, Target::Cpp, &CompileOptions::default()).unwrap_err();
    assert_eq!(err.kind(), "Constant mutation");
    let span = err.span().unwrap();
    assert_eq!(&source[span.start..span.end], "K");
    assert_eq!(span.start, source.rfind("K =").unwrap());
}

// ==================== Running the generated code ====================

const ACCUMULATE: &str = "DECLARE total: INTEGER\nFOR k = 1 TO 3\n  total = total + k\nNEXT\nOUTPUT total\n";

const STEPPED_CHAIN: &str = "CONSTANT LIMIT = 10\n\
                             DECLARE total: INTEGER\n\
                             FOR k = 1 TO LIMIT STEP 2\n\
                             \x20 IF k > 5 THEN\n\
                             \x20   total = total + k\n\
                             \x20 ELSE IF k == 3 THEN\n\
                             \x20   OUTPUT \"three\"\n\
                             \x20 ENDIF\n\
                             NEXT k\n\
                             OUTPUT total\n";

const SIGN: &str = "DECLARE n: INTEGER\n\
                    INPUT n\n\
                    IF n < 0 THEN\n  OUTPUT \"negative\"\n\
                    ELSE IF n == 0 THEN\n  OUTPUT \"zero\"\n\
                    ELSE IF n < 10 THEN\n  OUTPUT \"small\"\n\
                    ELSE\n  OUTPUT \"large\"\nENDIF\n";

const COUNTDOWN: &str = "DECLARE n: INTEGER\nINPUT n\nWHILE n > 0\n  OUTPUT n\n  n = n - 1\nENDWHILE\n";

const COUNTER: &str = "DECLARE c: INTEGER\nREPEAT\n  c = c + 1\nUNTIL c >= 3\nOUTPUT c\n";

const COMPUTED_STEP: &str = "DECLARE n: INTEGER\n\
                             INPUT n\n\
                             FOR i = n * 2 TO n - 1 STEP 0 - n\n  OUTPUT i\nNEXT i\n";

const ECHO: &str = "INPUT word\nDECLARE c: CHAR\nINPUT c\nOUTPUT word\nOUTPUT c\n";

/// Run `cmd` with `stdin`, or `None` if the program could not be started
fn run(cmd: &mut Command, stdin: &str) -> Option<String> {
    let mut child = cmd
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .ok()?;
    child
        .stdin
        .take()
        .unwrap()
        .write_all(stdin.as_bytes())
        .unwrap();
    let output = child.wait_with_output().unwrap();
    assert!(output.status.success(), "program failed: {:?}", output);
    Some(String::from_utf8(output.stdout).unwrap())
}

/// Run a Python program with python3, or `None` if it is not installed
fn run_python(dir: &Path, program: &str, stdin: &str) -> Option<String> {
    let path = dir.join("prog.py");
    std::fs::write(&path, program).unwrap();
    run(Command::new("python3").arg(&path), stdin)
}

/// Build and run a C++ program with g++, or `None` if no compiler is installed
fn run_cpp(dir: &Path, program: &str, stdin: &str) -> Option<String> {
    let src = dir.join("prog.cpp");
    let exe = dir.join("prog");
    std::fs::write(&src, program).unwrap();
    let status = Command::new("g++").arg(&src).arg("-o").arg(&exe).status().ok()?;
    assert!(status.success(), "g++ rejected:\n{}", program);
    run(&mut Command::new(&exe), stdin)
}

/// Programs with their stdin and the output every backend must print
const RUNS: &[(&str, &str, &str)] = &[
    (ARITHMETIC, "", "3\n"),
    (COUNTED_LOOP, "", "1\n2\n3\n"),
    (BRANCH, "", "b\n"),
    (POST_TEST_LOOP, "", "x\n"),
    (ACCUMULATE, "", "6\n"),
    (STEPPED_CHAIN, "", "three\n16\n"),
    (SIGN, "-4\n", "negative\n"),
    (SIGN, "0\n", "zero\n"),
    (SIGN, "7\n", "small\n"),
    (SIGN, "12\n", "large\n"),
    (COUNTDOWN, "3\n", "3\n2\n1\n"),
    (COUNTER, "", "3\n"),
    (COMPUTED_STEP, "2\n", "4\n2\n"),
    ("FOR i = 5 TO 1 STEP -2\n  OUTPUT i\nNEXT i\n", "", "5\n3\n1\n"),
    (ECHO, "hello\nxyz\n", "hello\nx\n"),
];

#[test]
fn generated_python_runs() {
    let dir = tempfile::tempdir().unwrap();
    for &(source, stdin, expected) in RUNS {
        let Some(stdout) = run_python(dir.path(), &python(source), stdin) else {
            eprintln!("python3 not available, skipping");
            return;
        };
        assert_eq!(stdout, expected, "source:\n{}", source);
    }
}

#[test]
fn generated_cpp_runs() {
    let dir = tempfile::tempdir().unwrap();
    for &(source, stdin, expected) in RUNS {
        let Some(stdout) = run_cpp(dir.path(), &cpp(source), stdin) else {
            eprintln!("g++ not available, skipping");
            return;
        };
        assert_eq!(stdout, expected, "source:\n{}", source);
    }
}

#[test]
fn real_loop_bounds_are_rejected_for_every_target() {
    let source = "DECLARE r: REAL\nr = 1.5\nFOR i = 1 TO r\n  OUTPUT i\nNEXT\n";
    for target in Target::ALL {
        let err = compile(source, target, &CompileOptions::default()).unwrap_err();
        assert_eq!(err.to_string(), "Type error: FOR loop bound must be INTEGER, found REAL");
    }
}
