//! # Solver Interface for External Executables

use std::{
    fs, io,
    path::{Path, PathBuf},
    process::{self, Command},
};

use anyhow::Context;

use crate::{
    instances::{
        fio::{self, SolverOutput},
        Formula,
    },
    targets,
    types::Assignment,
};

use super::{SolverResult, SolverState, StateError};

/// Specifies what argument position the instance is passed to the solver at
///
/// Most solvers expect the instance as the last argument
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
enum InstanceArg {
    /// Pass the instance file path as the first solver argument
    First,
    /// Pass the instance file path as the last argument
    #[default]
    Last,
}

/// Options for how the formula is passed to the external solver
#[derive(Debug, Clone)]
pub struct InputVia(InputViaInt);

#[derive(Debug, Clone)]
enum InputViaInt {
    /// Passes the instance by writing it to a file at the specified path
    ///
    /// The file will _not_ be removed afterwards
    File(PathBuf, InstanceArg),
    /// Passes the instance by writing it to a temporary file that will automatically be removed
    TempFile(InstanceArg),
    /// Passes the instance through a pipe to `stdin`
    Pipe,
}

impl InputVia {
    /// Pass the input via a persistent file at `path`, passed to the solver as the last argument
    #[must_use]
    pub fn file_last<P: AsRef<Path>>(path: P) -> Self {
        InputVia(InputViaInt::File(
            path.as_ref().to_path_buf(),
            InstanceArg::Last,
        ))
    }

    /// Pass the input via a persistent file at `path`, passed to the solver as the first argument
    #[must_use]
    pub fn file_first<P: AsRef<Path>>(path: P) -> Self {
        InputVia(InputViaInt::File(
            path.as_ref().to_path_buf(),
            InstanceArg::First,
        ))
    }

    /// Pass the input via a temporary file, passed to the solver as the last argument
    #[must_use]
    pub fn tempfile_last() -> Self {
        InputVia(InputViaInt::TempFile(InstanceArg::Last))
    }

    /// Pass the input via a temporary file, passed to the solver as the first argument
    #[must_use]
    pub fn tempfile_first() -> Self {
        InputVia(InputViaInt::TempFile(InstanceArg::First))
    }

    /// Pass the input via a pipe to `<stdin>`
    #[must_use]
    pub fn pipe() -> Self {
        InputVia(InputViaInt::Pipe)
    }
}

impl Default for InputVia {
    fn default() -> Self {
        InputVia(InputViaInt::Pipe)
    }
}

/// Options for how the output of the solver is read
#[derive(Debug, Clone, Default)]
pub struct OutputVia(OutputViaInt);

#[derive(Debug, Clone, Default)]
enum OutputViaInt {
    /// The solver output is written to a file at the given path that is not automatically deleted
    File(PathBuf),
    /// The solver output is read directly through a pipe
    #[default]
    Pipe,
}

impl OutputVia {
    /// Process the solver output via a persistent file at `path`
    #[must_use]
    pub fn file<P: AsRef<Path>>(path: P) -> Self {
        OutputVia(OutputViaInt::File(path.as_ref().to_path_buf()))
    }

    /// Process the solver output via a pipe from `<stdout>`
    #[must_use]
    pub fn pipe() -> Self {
        OutputVia(OutputViaInt::Pipe)
    }
}

/// A SAT solver called via an external executable
///
/// The solver is run through [`Command`] once per call to [`Solver::solve`]
/// and its output is parsed with [`fio::parse_sat_solver_output`]. The
/// executable is expected to follow the SAT competition conventions: a
/// DIMACS CNF input, `s` and `v` output lines and exit codes 0, 10 or 20.
#[derive(Debug)]
pub struct Solver {
    cmd: Command,
    input: InputVia,
    output: OutputVia,
    signature: &'static str,
    state: Option<SolverOutput>,
}

impl Solver {
    /// Initializes a solver with a [`Command`] that is fully set up, except for the input instance
    ///
    /// # Notes
    ///
    /// - If input is passed via a file with a path that ends in a compression extension, the
    ///     instance file is compressed (requires feature `compression`)
    /// - If the solver output is processed via a file, compression is _not_ supported
    /// - The command is rebuilt for every call, calls to [`Command::env_clear`] are forgotten
    ///
    /// # Example
    ///
    /// ```
    /// use std::process::Command;
    /// use cnfgen::solvers::external;
    /// let solver = external::Solver::new(
    ///     Command::new("<path to solver binary>"),
    ///     external::InputVia::tempfile_last(),
    ///     external::OutputVia::pipe(),
    ///     "solver-signature",
    /// );
    /// ```
    #[must_use]
    pub fn new(cmd: Command, input: InputVia, output: OutputVia, signature: &'static str) -> Self {
        Solver {
            cmd,
            input,
            output,
            signature,
            state: None,
        }
    }

    /// Initializes a solver with default values for [`InputVia`] and [`OutputVia`]
    ///
    /// The default values are passing the input and processing the output
    /// via pipes.
    #[must_use]
    pub fn new_default(cmd: Command, signature: &'static str) -> Self {
        Solver::new(cmd, InputVia::default(), OutputVia::default(), signature)
    }

    /// Gets the signature of the solver
    pub fn signature(&self) -> &'static str {
        self.signature
    }

    /// Gets the state of the solver
    pub fn state(&self) -> SolverState {
        match &self.state {
            None => SolverState::Input,
            Some(SolverOutput::Sat(_)) => SolverState::Sat,
            Some(SolverOutput::Unsat) => SolverState::Unsat,
            Some(SolverOutput::Unknown) => SolverState::Unknown,
        }
    }

    /// Runs the solver executable on a formula. The solver can be reused for
    /// further formulas, the answer of the last call is kept until then.
    pub fn solve(&mut self, formula: &Formula) -> anyhow::Result<SolverResult> {
        log::info!(
            target: targets::SOLVER,
            "calling external solver `{}` ({:?})",
            self.signature,
            self.cmd.get_program()
        );
        self.state = None;
        let output = self.call_external(formula)?;
        let res = match output {
            SolverOutput::Sat(_) => SolverResult::Sat,
            SolverOutput::Unsat => SolverResult::Unsat,
            SolverOutput::Unknown => SolverResult::Interrupted,
        };
        log::debug!(target: targets::SOLVER, "external solver answered {res}");
        self.state = Some(output);
        Ok(res)
    }

    /// Gets the assignment found by the last satisfiable call
    pub fn solution(&self) -> anyhow::Result<Assignment> {
        match &self.state {
            Some(SolverOutput::Sat(sol)) => Ok(sol.clone()),
            _ => anyhow::bail!(StateError {
                required_state: SolverState::Sat,
                actual_state: self.state(),
            }),
        }
    }

    fn call_external(&self, formula: &Formula) -> anyhow::Result<SolverOutput> {
        // when writing to a temporary file, this needs to be explicitly closed at the end
        let mut temppath = None;
        let mut cmd = match &self.input.0 {
            InputViaInt::File(in_path, argpos) => {
                let mut writer = fio::open_compressed_uncompressed_write(in_path)?;
                write_instance(&mut writer, formula)?;
                drop(writer);
                self.command(Some((in_path.as_path(), *argpos)))
            }
            InputViaInt::TempFile(argpos) => {
                let mut writer = io::BufWriter::new(tempfile::NamedTempFile::new()?);
                write_instance(&mut writer, formula)?;
                let path = writer.into_inner()?.into_temp_path();
                let instance: &Path = &path;
                let cmd = self.command(Some((instance, *argpos)));
                temppath = Some(path);
                cmd
            }
            InputViaInt::Pipe => {
                let mut cmd = self.command(None);
                cmd.stdin(process::Stdio::piped());
                return match &self.output.0 {
                    OutputViaInt::File(path) => {
                        let mut child = cmd.stdout(fs::File::create(path)?).spawn()?;
                        let mut stdin =
                            io::BufWriter::new(child.stdin.take().context("solver stdin is not piped")?);
                        write_instance(&mut stdin, formula)?;
                        drop(stdin);
                        let exit = child.wait()?;
                        let output = fio::parse_sat_solver_output(io::BufReader::new(
                            fs::File::open(path)?,
                        ))?;
                        check_exit_code(exit)?;
                        Ok(output)
                    }
                    OutputViaInt::Pipe => {
                        let mut child = cmd.stdout(process::Stdio::piped()).spawn()?;
                        let mut stdin =
                            io::BufWriter::new(child.stdin.take().context("solver stdin is not piped")?);
                        let mut stdout =
                            io::BufReader::new(child.stdout.take().context("solver stdout is not piped")?);
                        // second thread for processing stdout to avoid blocking
                        let output_handle = std::thread::spawn(
                            move || -> anyhow::Result<(SolverOutput, io::BufReader<process::ChildStdout>)> {
                                // stdout is passed back so it stays open until the solver terminated
                                let output = fio::parse_sat_solver_output(&mut stdout)?;
                                Ok((output, stdout))
                            },
                        );
                        write_instance(&mut stdin, formula)?;
                        drop(stdin);
                        let exit = child.wait()?;
                        let (output, stdout) = output_handle
                            .join()
                            .map_err(|_| anyhow::anyhow!("solver output parsing thread panicked"))??;
                        drop(stdout);
                        check_exit_code(exit)?;
                        Ok(output)
                    }
                };
            }
        };
        let output = match &self.output.0 {
            OutputViaInt::File(path) => {
                // NOTE: this does not support compression
                cmd.stdout(fs::File::create(path)?);
                let exit = cmd.status()?;
                let output =
                    fio::parse_sat_solver_output(io::BufReader::new(fs::File::open(path)?))?;
                check_exit_code(exit)?;
                output
            }
            OutputViaInt::Pipe => {
                let mut child = cmd.stdout(process::Stdio::piped()).spawn()?;
                let mut stdout =
                    io::BufReader::new(child.stdout.take().context("solver stdout is not piped")?);
                let output = fio::parse_sat_solver_output(&mut stdout)?;
                check_exit_code(child.wait()?)?;
                // keep pipe open till after child has terminated
                drop(stdout);
                output
            }
        };
        if let Some(temppath) = temppath {
            temppath.close()?;
        }
        Ok(output)
    }

    /// Builds a fresh command from the configured one, passing the instance
    /// path at the requested position
    fn command(&self, instance: Option<(&Path, InstanceArg)>) -> Command {
        let mut cmd = Command::new(self.cmd.get_program());
        if let Some((path, InstanceArg::First)) = instance {
            cmd.arg(path);
        }
        cmd.args(self.cmd.get_args());
        if let Some((path, InstanceArg::Last)) = instance {
            cmd.arg(path);
        }
        for (key, val) in self.cmd.get_envs() {
            if let Some(val) = val {
                cmd.env(key, val);
            } else {
                cmd.env_remove(key);
            }
        }
        if let Some(dir) = self.cmd.get_current_dir() {
            cmd.current_dir(dir);
        }
        cmd
    }
}

fn write_instance<W: io::Write>(writer: &mut W, formula: &Formula) -> io::Result<()> {
    fio::dimacs::write_formula(writer, formula, fio::dimacs::Options::default())
}

fn check_exit_code(status: process::ExitStatus) -> anyhow::Result<()> {
    match status.code() {
        // the expected return codes for SAT solvers, not checked against the output
        Some(0 | 10 | 20) => Ok(()),
        Some(x) => anyhow::bail!("solver returned unexpected code {x}"),
        None => anyhow::bail!("solver process terminated by signal"),
    }
}

#[cfg(all(test, unix))]
mod tests {
    use std::process::Command;

    use super::{InputVia, OutputVia, Solver};
    use crate::{
        instances::Formula,
        solvers::{SolverResult, SolverState, StateError},
        types::{Assignment, TernaryVal},
    };

    fn script(body: &str) -> Command {
        let mut cmd = Command::new("sh");
        cmd.arg("-c").arg(body);
        cmd
    }

    fn unit_formula() -> Formula {
        let mut formula = Formula::new();
        formula.add_clause(&[(true, "a")]).unwrap();
        formula.add_clause(&[(false, "b")]).unwrap();
        formula
    }

    #[test]
    fn pipe_sat() {
        let mut solver = Solver::new_default(
            script("cat > /dev/null; echo 's SATISFIABLE'; echo 'v 1 -2 0'; exit 10"),
            "script",
        );
        assert_eq!(solver.state(), SolverState::Input);
        assert_eq!(solver.solve(&unit_formula()).unwrap(), SolverResult::Sat);
        assert_eq!(
            solver.solution().unwrap(),
            Assignment::from(vec![TernaryVal::True, TernaryVal::False])
        );
    }

    #[test]
    fn pipe_reads_input() {
        let mut solver = Solver::new_default(
            script("if grep -q '^p cnf 2 2$'; then echo 's UNSATISFIABLE'; else echo 's UNKNOWN'; fi; exit 20"),
            "script",
        );
        assert_eq!(solver.solve(&unit_formula()).unwrap(), SolverResult::Unsat);
        let err = solver.solution().unwrap_err();
        assert_eq!(
            err.downcast::<StateError>().unwrap(),
            StateError {
                required_state: SolverState::Sat,
                actual_state: SolverState::Unsat,
            }
        );
    }

    #[test]
    fn tempfile_last() {
        // the instance path becomes `$0` of the script
        let mut solver = Solver::new(
            script("grep -q '^1 0$' \"$0\" && echo 's SATISFIABLE' && echo 'v 1 -2 0'; exit 10"),
            InputVia::tempfile_last(),
            OutputVia::pipe(),
            "script",
        );
        assert_eq!(solver.solve(&unit_formula()).unwrap(), SolverResult::Sat);
    }

    #[test]
    fn file_input_file_output() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("instance.cnf");
        let output = dir.path().join("solver.log");
        let mut solver = Solver::new(
            script("echo 's UNKNOWN'"),
            InputVia::file_last(&input),
            OutputVia::file(&output),
            "script",
        );
        assert_eq!(
            solver.solve(&unit_formula()).unwrap(),
            SolverResult::Interrupted
        );
        assert!(std::fs::read_to_string(&input)
            .unwrap()
            .contains("p cnf 2 2\n"));
        assert_eq!(std::fs::read_to_string(&output).unwrap(), "s UNKNOWN\n");
    }

    #[test]
    fn unexpected_exit_code() {
        let mut solver = Solver::new_default(
            script("cat > /dev/null; echo 's UNSATISFIABLE'; exit 3"),
            "script",
        );
        assert!(solver.solve(&unit_formula()).is_err());
    }
}
