use std::fs;
use std::path::{Path, PathBuf};

use crate::builtins::Flow;
use crate::shell::Session;

/// Path of the per-user startup file.
pub fn rc_file_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".SEEshrc"))
}

/// Run the user's startup file through the session, if there is one.
///
/// Each line is dispatched exactly as if it had been typed at the prompt:
/// it is recorded in history, tokenized and executed, and a failing line
/// reports its error without stopping the rest of the file. A missing or
/// unreadable file silently skips this step. Returns [`Flow::Exit`] when
/// the file itself says `exit`, so the caller can skip the interactive
/// loop.
pub fn run_startup(session: &mut Session) -> Flow {
    match rc_file_path() {
        Some(path) => run_startup_file(session, &path),
        None => Flow::Continue,
    }
}

pub fn run_startup_file(session: &mut Session, path: &Path) -> Flow {
    let Ok(content) = fs::read_to_string(path) else {
        return Flow::Continue;
    };
    for line in content.lines() {
        if session.dispatch(line) == Flow::Exit {
            return Flow::Exit;
        }
    }
    Flow::Continue
}
