use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ShellError {
	#[error("command-reading failed: {0}")]
	Input(io::Error),
	#[error("fork failed: {0}")]
	Fork(nix::Error),
	#[error("pipe failed: {0}")]
	Pipe(nix::Error),
	#[error("cannot open {}: {}", String::from_utf8_lossy(.path), .source)]
	FileOpen { path: Vec<u8>, source: io::Error },
	#[error("cannot execute {}: {}", String::from_utf8_lossy(.program), .source)]
	Exec { program: Vec<u8>, source: nix::Error },
	#[error("argument contains a NUL byte")]
	BadArgument,
	#[error("empty command")]
	EmptyCommand,
}

pub fn report(err: &ShellError) {
	eprintln!("osh: {err}");
}
