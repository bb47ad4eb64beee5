use crate::types::{Command, TokenLine, MAX_ARGS};

pub fn tokenize(line: &[u8]) -> TokenLine<'_> {
	let mut args: Vec<&[u8]> = Vec::new();
	let mut background = false;
	let mut start: Option<usize> = None;

	for (i, &byte) in line.iter().enumerate() {
		match byte {
			b' ' | b'\t' => {
				if let Some(s) = start.take() {
					push_arg(&mut args, &line[s..i]);
				}
			}
			b'\n' => {
				if let Some(s) = start.take() {
					push_arg(&mut args, &line[s..i]);
				}
				break;
			}
			// First '&' ends parsing wherever it appears; anything
			// after it on the line is discarded.
			b'&' => {
				if let Some(s) = start.take() {
					push_arg(&mut args, &line[s..i]);
				}
				background = true;
				break;
			}
			_ => {
				if start.is_none() {
					start = Some(i);
				}
			}
		}
	}
	if let Some(s) = start {
		push_arg(&mut args, &line[s..]);
	}

	TokenLine { args, background }
}

fn push_arg<'a>(args: &mut Vec<&'a [u8]>, arg: &'a [u8]) {
	if args.len() < MAX_ARGS {
		args.push(arg);
	}
}

pub fn split_pipe(args: Vec<&[u8]>) -> (Vec<&[u8]>, Option<Vec<&[u8]>>) {
	match args.iter().position(|&arg| arg == b"|") {
		Some(i) => {
			let mut left = args;
			let mut right = left.split_off(i);
			right.remove(0);
			(left, Some(right))
		}
		None => (args, None),
	}
}

pub fn resolve_redirects(args: Vec<&[u8]>, background: bool) -> Command<'_> {
	let mut stdin_file = None;
	let mut stdout_file = None;
	let mut keep = vec![true; args.len()];

	// '<' and '>' track independent positions, so both pairs are
	// removed even when the two operators appear on one line.
	let mut i = 0;
	while i < args.len() {
		match args[i] {
			b"<" => {
				keep[i] = false;
				if let Some(&path) = args.get(i + 1) {
					stdin_file = Some(path);
					keep[i + 1] = false;
					i += 1;
				}
			}
			b">" => {
				keep[i] = false;
				if let Some(&path) = args.get(i + 1) {
					stdout_file = Some(path);
					keep[i + 1] = false;
					i += 1;
				}
			}
			_ => {}
		}
		i += 1;
	}

	let argv = args
		.into_iter()
		.zip(keep)
		.filter_map(|(arg, kept)| kept.then_some(arg))
		.collect();

	Command { argv, stdin_file, stdout_file, background }
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn splits_on_whitespace() {
		let line = tokenize(b"ls -l\n");
		assert_eq!(line.args, vec![b"ls".as_ref(), b"-l".as_ref()]);
		assert!(!line.background);
	}

	#[test]
	fn tabs_separate_tokens() {
		let line = tokenize(b"wc\t-c  report\n");
		assert_eq!(line.args, vec![b"wc".as_ref(), b"-c".as_ref(), b"report".as_ref()]);
	}

	#[test]
	fn trailing_ampersand_backgrounds() {
		let line = tokenize(b"sleep 5 &\n");
		assert_eq!(line.args, vec![b"sleep".as_ref(), b"5".as_ref()]);
		assert!(line.background);
	}

	#[test]
	fn ampersand_truncates_the_rest_of_the_line() {
		let line = tokenize(b"ls & extra\n");
		assert_eq!(line.args, vec![b"ls".as_ref()]);
		assert!(line.background);
	}

	#[test]
	fn ampersand_closes_an_open_token() {
		let line = tokenize(b"sleep 5&\n");
		assert_eq!(line.args, vec![b"sleep".as_ref(), b"5".as_ref()]);
		assert!(line.background);
	}

	#[test]
	fn empty_line_has_no_args() {
		let line = tokenize(b"\n");
		assert!(line.args.is_empty());
		assert!(!line.background);
	}

	#[test]
	fn missing_newline_still_closes_the_last_token() {
		let line = tokenize(b"echo hi");
		assert_eq!(line.args, vec![b"echo".as_ref(), b"hi".as_ref()]);
	}

	#[test]
	fn argument_count_is_capped() {
		let text = "a ".repeat(MAX_ARGS + 10) + "\n";
		let line = tokenize(text.as_bytes());
		assert_eq!(line.args.len(), MAX_ARGS);
	}

	#[test]
	fn splits_at_the_pipe_token() {
		let args: Vec<&[u8]> = vec![b"ls", b"|", b"wc", b"-l"];
		let (left, right) = split_pipe(args);
		assert_eq!(left, vec![b"ls".as_ref()]);
		assert_eq!(right.unwrap(), vec![b"wc".as_ref(), b"-l".as_ref()]);
	}

	#[test]
	fn no_pipe_leaves_args_alone() {
		let args: Vec<&[u8]> = vec![b"ls", b"-l"];
		let (left, right) = split_pipe(args);
		assert_eq!(left, vec![b"ls".as_ref(), b"-l".as_ref()]);
		assert!(right.is_none());
	}

	#[test]
	fn resolves_both_redirections_at_once() {
		let args: Vec<&[u8]> = vec![b"sort", b"<", b"in.txt", b">", b"out.txt"];
		let cmd = resolve_redirects(args, false);
		assert_eq!(cmd.argv, vec![b"sort".as_ref()]);
		assert_eq!(cmd.stdin_file, Some(b"in.txt".as_ref()));
		assert_eq!(cmd.stdout_file, Some(b"out.txt".as_ref()));
	}

	#[test]
	fn input_redirection_alone() {
		let args: Vec<&[u8]> = vec![b"wc", b"-l", b"<", b"in.txt"];
		let cmd = resolve_redirects(args, false);
		assert_eq!(cmd.argv, vec![b"wc".as_ref(), b"-l".as_ref()]);
		assert_eq!(cmd.stdin_file, Some(b"in.txt".as_ref()));
		assert_eq!(cmd.stdout_file, None);
	}

	#[test]
	fn operator_without_filename_is_dropped() {
		let args: Vec<&[u8]> = vec![b"cat", b"<"];
		let cmd = resolve_redirects(args, false);
		assert_eq!(cmd.argv, vec![b"cat".as_ref()]);
		assert_eq!(cmd.stdin_file, None);
	}

	#[test]
	fn last_redirection_wins() {
		let args: Vec<&[u8]> = vec![b"cat", b"<", b"first", b"<", b"second"];
		let cmd = resolve_redirects(args, false);
		assert_eq!(cmd.argv, vec![b"cat".as_ref()]);
		assert_eq!(cmd.stdin_file, Some(b"second".as_ref()));
	}
}
