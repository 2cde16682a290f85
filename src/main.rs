mod builtins;
mod config;
mod env;
mod history;
mod parse;
mod process_exec;
mod shell;

use std::io;

use anyhow::Context;

use crate::builtins::Flow;
use crate::shell::Session;

fn main() -> anyhow::Result<()> {
    // The interpreter never dies to an interactive interrupt; a foreground
    // child restores the default disposition before exec, so Ctrl-C lands
    // on the child alone.
    unsafe {
        libc::signal(libc::SIGINT, libc::SIG_IGN);
        libc::signal(libc::SIGQUIT, libc::SIG_IGN);
    }

    let mut session = Session::new();

    // The startup file may contain an explicit exit.
    if config::run_startup(&mut session) == Flow::Exit {
        return Ok(());
    }

    let stdin = io::stdin();
    session
        .interpret(stdin.lock())
        .context("reading standard input")?;
    Ok(())
}
