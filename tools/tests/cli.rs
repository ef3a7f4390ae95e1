use std::process::Command;

fn cnfgen(args: &[&str]) -> String {
    let out = Command::new(env!("CARGO_BIN_EXE_cnfgen"))
        .args(args)
        .output()
        .unwrap();
    assert!(out.status.success());
    String::from_utf8(out.stdout).unwrap()
}

#[test]
fn php_dimacs() {
    let out = cnfgen(&["php", "3", "2"]);
    let mut lines = out.lines();
    assert_eq!(
        lines.next(),
        Some("c Pigeonhole principle formula for 3 pigeons and 2 holes")
    );
    assert_eq!(lines.next(), Some("p cnf 6 9"));
    assert_eq!(lines.count(), 9);
}

#[test]
fn php_varnames_no_header() {
    let out = cnfgen(&["--no-header", "--varnames", "php", "2", "2"]);
    assert!(out.starts_with("c varname 1 p_{1,1}\nc varname 2 p_{1,2}\n"));
    assert!(out.contains("\np cnf 4 "));
}

#[test]
fn parity_opb() {
    let out = cnfgen(&["--format", "opb", "parity", "3"]);
    assert!(out.starts_with("* #variable= 3 #constraint= 3\n"));
}

#[test]
fn bphp_latex() {
    let out = cnfgen(&["--format", "latex", "--no-header", "bphp", "3", "2"]);
    assert!(out.starts_with("\\begin{align}"));
    assert!(out.ends_with("\\end{align}\n"));
}

#[test]
fn output_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("php.cnf");
    let stdout = cnfgen(&["-o", path.to_str().unwrap(), "php", "3", "3"]);
    assert!(stdout.is_empty());
    let written = std::fs::read_to_string(&path).unwrap();
    assert_eq!(written, cnfgen(&["php", "3", "3"]));
}

#[test]
fn invalid_arguments() {
    let out = Command::new(env!("CARGO_BIN_EXE_cnfgen"))
        .args(["php", "three", "2"])
        .output()
        .unwrap();
    assert!(!out.status.success());
}
