use std::env;
use std::io::{self, Write};
use std::path::PathBuf;

use crate::env::EnvStore;
use crate::history::History;
use crate::parse::Argv;
use crate::shell::TAG;

/// What the dispatch loop should do after a command ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

/// One entry of the builtin table: a name, its one-line description for
/// `help`, and the handler it dispatches to.
pub struct Builtin {
    pub name: &'static str,
    pub desc: &'static str,
    kind: Kind,
}

#[derive(Clone, Copy)]
enum Kind {
    Cd,
    Pwd,
    Help,
    Exit,
    Set,
    Unset,
    History,
}

/// The fixed builtin table, constructed once at session start.
///
/// Lookup is a linear scan with exact name match; names are unique so the
/// first hit is the only one. An unknown name is not an error here — the
/// caller forwards it to the process executor.
pub struct Registry {
    table: Vec<Builtin>,
}

impl Registry {
    pub fn new() -> Self {
        let table = vec![
            Builtin {
                name: "cd",
                desc: "cd [dir]: Change the working directory to dir, or to HOME if dir is omitted.",
                kind: Kind::Cd,
            },
            Builtin {
                name: "pwd",
                desc: "pwd: Print the current working directory.",
                kind: Kind::Pwd,
            },
            Builtin {
                name: "help",
                desc: "help [command]: Print the description of one command, or of all of them if none is given.",
                kind: Kind::Help,
            },
            Builtin {
                name: "exit",
                desc: "exit: Exit the shell.",
                kind: Kind::Exit,
            },
            Builtin {
                name: "set",
                desc: "set [var] [val]: Set the variable var to val, or to the empty string if val is omitted. With no arguments, list every variable.",
                kind: Kind::Set,
            },
            Builtin {
                name: "unset",
                desc: "unset var: Remove the variable var.",
                kind: Kind::Unset,
            },
            Builtin {
                name: "history",
                desc: "history: Print every line entered this session, oldest first.",
                kind: Kind::History,
            },
        ];
        Self { table }
    }

    pub fn lookup(&self, name: &str) -> Option<&Builtin> {
        self.table.iter().find(|b| b.name == name)
    }

    /// Run one builtin against the session state.
    ///
    /// Usage and resource errors go to `err` and still yield `Continue`;
    /// only `exit` yields `Exit`. An `Err` out of here means a stream
    /// failed to accept output, not that the command itself failed.
    pub fn run(
        &self,
        builtin: &Builtin,
        argv: &Argv,
        store: &mut EnvStore,
        history: &History,
        out: &mut dyn Write,
        err: &mut dyn Write,
    ) -> io::Result<Flow> {
        match builtin.kind {
            Kind::Cd => cd(argv, store, err),
            Kind::Pwd => pwd(argv, out, err),
            Kind::Help => self.help(argv, out),
            Kind::Exit => Ok(Flow::Exit),
            Kind::Set => set(argv, store, out, err),
            Kind::Unset => unset(argv, store, err),
            Kind::History => {
                out.write_all(history.render().as_bytes())?;
                Ok(Flow::Continue)
            }
        }
    }

    fn help(&self, argv: &Argv, out: &mut dyn Write) -> io::Result<Flow> {
        match argv.get(1) {
            None => {
                writeln!(out, "SEEsh: a small shell.")?;
                writeln!(out, "---------------------")?;
                writeln!(out, "Commands:")?;
                for builtin in &self.table {
                    writeln!(out, "{}", builtin.desc)?;
                }
            }
            Some(name) => {
                if let Some(builtin) = self.lookup(name) {
                    writeln!(out, "{}", builtin.desc)?;
                }
            }
        }
        writeln!(out)?;
        Ok(Flow::Continue)
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

fn cd(argv: &Argv, store: &mut EnvStore, err: &mut dyn Write) -> io::Result<Flow> {
    let dir = match argv.get(1) {
        Some(d) => PathBuf::from(d),
        None => match store.get("HOME").map(PathBuf::from).or_else(dirs::home_dir) {
            Some(home) => home,
            None => {
                writeln!(err, "{TAG}: cd: HOME not set")?;
                return Ok(Flow::Continue);
            }
        },
    };

    if let Err(e) = env::set_current_dir(&dir) {
        writeln!(err, "{TAG}: cd: {}: {e}", dir.display())?;
        return Ok(Flow::Continue);
    }

    // PWD tracks the real working directory after every successful chdir.
    match env::current_dir() {
        Ok(cwd) => store.set("PWD", &cwd.display().to_string()),
        Err(e) => writeln!(err, "{TAG}: cd: {e}")?,
    }
    Ok(Flow::Continue)
}

fn pwd(argv: &Argv, out: &mut dyn Write, err: &mut dyn Write) -> io::Result<Flow> {
    if argv.get(1).is_some() {
        writeln!(err, "{TAG}: pwd takes no arguments")?;
        return Ok(Flow::Continue);
    }
    match env::current_dir() {
        Ok(cwd) => writeln!(out, "{}", cwd.display())?,
        Err(e) => writeln!(err, "{TAG}: pwd: {e}")?,
    }
    Ok(Flow::Continue)
}

fn set(argv: &Argv, store: &mut EnvStore, out: &mut dyn Write, err: &mut dyn Write) -> io::Result<Flow> {
    match (argv.get(1), argv.get(2)) {
        (None, _) => {
            for (name, value) in store.snapshot() {
                writeln!(out, "{name}={value}")?;
            }
        }
        (Some(name), value) => {
            if name.contains('=') {
                writeln!(err, "{TAG}: set: variable names may not contain '='")?;
            } else {
                store.set(name, value.unwrap_or(""));
            }
        }
    }
    Ok(Flow::Continue)
}

fn unset(argv: &Argv, store: &mut EnvStore, err: &mut dyn Write) -> io::Result<Flow> {
    if argv.len() != 2 {
        writeln!(err, "{TAG}: unset expects exactly one parameter")?;
        return Ok(Flow::Continue);
    }
    if let Some(name) = argv.get(1) {
        store.unset(name);
    }
    Ok(Flow::Continue)
}
