use std::io::{self, BufRead, Write};

use crate::builtins::{Flow, Registry};
use crate::env::EnvStore;
use crate::history::History;
use crate::parse::{self, Argv};
use crate::process_exec;

/// Stable tag prefixing every diagnostic on the error stream.
pub const TAG: &str = "SEEsh";

const PROMPT: &str = "? ";

/// One interactive session: the environment store, the history log and the
/// builtin table, plus the streams everything writes to.
///
/// All state is owned here and handed to the handlers by reference; nothing
/// goes through process-global storage, so a session can be driven entirely
/// from memory in tests.
pub struct Session {
    env: EnvStore,
    history: History,
    builtins: Registry,
    out: Box<dyn Write>,
    err: Box<dyn Write>,
}

impl Session {
    /// A session on the real process environment and standard streams.
    pub fn new() -> Self {
        Self::with_streams(
            EnvStore::from_process(),
            Box::new(io::stdout()),
            Box::new(io::stderr()),
        )
    }

    pub fn with_streams(env: EnvStore, out: Box<dyn Write>, err: Box<dyn Write>) -> Self {
        Self {
            env,
            history: History::new(),
            builtins: Registry::new(),
            out,
            err,
        }
    }

    pub fn env(&self) -> &EnvStore {
        &self.env
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    /// Dispatch one submitted line: record it, tokenize it, resolve the
    /// first token and execute. Blank lines are recorded and then ignored.
    pub fn dispatch(&mut self, line: &str) -> Flow {
        let line = line.strip_suffix('\n').unwrap_or(line);
        let line = line.strip_suffix('\r').unwrap_or(line);
        self.history.record(line);
        self.execute(&parse::tokenize(line))
    }

    fn execute(&mut self, argv: &Argv) -> Flow {
        let Some(name) = argv.name() else {
            return Flow::Continue;
        };

        if let Some(builtin) = self.builtins.lookup(name) {
            match self.builtins.run(
                builtin,
                argv,
                &mut self.env,
                &self.history,
                &mut self.out,
                &mut self.err,
            ) {
                Ok(flow) => flow,
                Err(e) => {
                    let _ = writeln!(self.err, "{TAG}: {name}: {e}");
                    Flow::Continue
                }
            }
        } else {
            self.launch(argv)
        }
    }

    /// Hand an unmatched command to the process executor and reap the
    /// child. Whatever happens to the child, the session continues.
    fn launch(&mut self, argv: &Argv) -> Flow {
        match process_exec::spawn(argv, &self.env) {
            Ok(child) => {
                if let Err(e) = child.wait() {
                    let _ = writeln!(self.err, "{TAG}: {e}");
                }
            }
            Err(e) => {
                let name = argv.name().unwrap_or_default();
                let _ = writeln!(self.err, "{TAG}: {name}: {e}");
            }
        }
        Flow::Continue
    }

    /// The interactive loop: prompt, read, dispatch, repeat.
    ///
    /// End of input is an implicit `exit`: the loop ends cleanly and the
    /// session-scoped state is released with the session. A broken input
    /// stream is reported and ends the session the same way.
    pub fn interpret<R: BufRead>(&mut self, mut input: R) -> io::Result<()> {
        loop {
            self.out.write_all(PROMPT.as_bytes())?;
            self.out.flush()?;

            let mut line = String::new();
            match input.read_line(&mut line) {
                Ok(0) => break,
                Ok(_) => {
                    if self.dispatch(&line) == Flow::Exit {
                        break;
                    }
                }
                // A line that was not valid UTF-8 has been consumed; report
                // it and keep reading.
                Err(e) if e.kind() == io::ErrorKind::InvalidData => {
                    writeln!(self.err, "{TAG}: {e}")?;
                }
                Err(e) => {
                    writeln!(self.err, "{TAG}: {e}")?;
                    break;
                }
            }
        }
        Ok(())
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::io::Cursor;
    use std::rc::Rc;

    /// A writer whose buffer stays inspectable after the session owns it.
    #[derive(Clone, Default)]
    struct SharedBuf(Rc<RefCell<Vec<u8>>>);

    impl SharedBuf {
        fn contents(&self) -> String {
            String::from_utf8(self.0.borrow().clone()).unwrap()
        }
    }

    impl Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.borrow_mut().write(buf)
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn session() -> (Session, SharedBuf, SharedBuf) {
        let out = SharedBuf::default();
        let err = SharedBuf::default();
        let session = Session::with_streams(
            EnvStore::from_process(),
            Box::new(out.clone()),
            Box::new(err.clone()),
        );
        (session, out, err)
    }

    #[test]
    fn blank_line_is_recorded_and_continues() {
        let (mut session, _out, err) = session();
        assert_eq!(session.dispatch("   \t\n"), Flow::Continue);
        assert_eq!(session.history().len(), 1);
        assert!(err.contents().is_empty());
    }

    #[test]
    fn builtin_resolution_beats_the_executor() {
        let (mut session, out, _err) = session();
        session.dispatch("set GREETING hello\n");
        assert_eq!(session.env().get("GREETING"), Some("hello"));
        session.dispatch("history\n");
        assert_eq!(out.contents(), "set GREETING hello\nhistory\n");
    }

    #[test]
    fn unknown_command_reports_and_continues() {
        let (mut session, _out, err) = session();
        assert_eq!(
            session.dispatch("definitely-not-a-real-command\n"),
            Flow::Continue
        );
        assert!(err.contents().starts_with("SEEsh: definitely-not-a-real-command:"));
    }

    #[test]
    fn external_program_runs_and_continues() {
        let (mut session, _out, err) = session();
        assert_eq!(session.dispatch("true\n"), Flow::Continue);
        assert_eq!(session.dispatch("false\n"), Flow::Continue);
        assert!(err.contents().is_empty());
    }

    #[test]
    fn exit_stops_the_loop_with_no_further_prompt() {
        let (mut session, out, _err) = session();
        let input = Cursor::new(b"exit\npwd\n".to_vec());
        session.interpret(input).unwrap();
        // One prompt for the exit line, none after, and pwd never ran.
        assert_eq!(out.contents(), "? ");
    }

    #[test]
    fn eof_on_first_read_is_an_implicit_exit() {
        let (mut session, out, err) = session();
        session.interpret(Cursor::new(Vec::new())).unwrap();
        assert_eq!(out.contents(), "? ");
        assert!(err.contents().is_empty());
    }

    #[test]
    fn consecutive_duplicate_lines_collapse_in_history() {
        let (mut session, out, _err) = session();
        let input = Cursor::new(b"set A 1\nset A 1\nset B 2\nhistory\n".to_vec());
        session.interpret(input).unwrap();
        assert!(out.contents().contains("set A 1\nset B 2\nhistory\n"));
        assert_eq!(session.history().len(), 3);
    }

    #[test]
    fn mutations_after_launch_do_not_reach_earlier_children() {
        // The child receives a copy of the store at spawn time; this just
        // pins the observable part: the store itself is still mutable after
        // a launch and the session carries on.
        let (mut session, _out, _err) = session();
        session.dispatch("true\n");
        session.dispatch("set AFTER yes\n");
        assert_eq!(session.env().get("AFTER"), Some("yes"));
    }
}
