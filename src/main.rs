mod error;
mod eval;
mod job;
mod parser;
mod types;

use std::io::{self, BufRead, Write};
use std::process;

use tracing_subscriber::EnvFilter;

use error::{report, ShellError};
use job::JobRegistry;
use types::{Pipeline, MAX_LINE};

const PROMPT: &[u8] = b"osh> ";

fn main() {
	let filter = EnvFilter::try_from_env("OSH_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(io::stderr)
		.init();

	let mut jobs = JobRegistry::new();
	let stdin = io::stdin();
	let mut stdin = stdin.lock();
	let mut stdout = io::stdout();
	let mut line: Vec<u8> = Vec::with_capacity(MAX_LINE);

	loop {
		jobs.reap_finished();

		let _ = stdout.write_all(PROMPT);
		let _ = stdout.flush();

		line.clear();
		match stdin.read_until(b'\n', &mut line) {
			Ok(0) => break,
			Ok(_) => {}
			Err(e) => {
				report(&ShellError::Input(e));
				process::exit(1);
			}
		}
		line.truncate(MAX_LINE);

		// A line containing "exit" anywhere quits, even mid-word.
		if line.windows(4).any(|window| window == b"exit") {
			break;
		}

		let tokens = parser::tokenize(&line);
		if tokens.args.is_empty() {
			continue;
		}

		let result = match parser::split_pipe(tokens.args) {
			(left, Some(right)) => {
				let pipeline = Pipeline { left, right, background: tokens.background };
				eval::run_pipeline(&mut jobs, &pipeline)
			}
			(args, None) => {
				let command = parser::resolve_redirects(args, tokens.background);
				eval::run_command(&mut jobs, &command)
			}
		};
		if let Err(e) = result {
			report(&e);
		}
	}
}
