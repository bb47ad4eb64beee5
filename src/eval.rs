use std::ffi::{CString, OsStr};
use std::fs::{File, OpenOptions};
use std::os::unix::ffi::OsStrExt;
use std::os::unix::fs::OpenOptionsExt;
use std::os::unix::io::{IntoRawFd, RawFd};

use nix::unistd::{self, ForkResult};

use crate::error::{report, ShellError};
use crate::job::{Child, JobRegistry};
use crate::types::{Command, Pipeline};

const EXEC_FAILED: i32 = 127;
const BAD_ARGV: i32 = 126;

pub fn run_command(jobs: &mut JobRegistry, cmd: &Command) -> Result<(), ShellError> {
	if cmd.argv.is_empty() {
		return Err(ShellError::EmptyCommand);
	}

	match unsafe { unistd::fork() }.map_err(ShellError::Fork)? {
		ForkResult::Child => exec_child(cmd),
		ForkResult::Parent { child } => {
			let child = Child::new(child);
			tracing::debug!(pid = child.pid().as_raw(), "spawned");
			if cmd.background {
				jobs.register(child);
			} else {
				child.wait();
			}
			Ok(())
		}
	}
}

pub fn run_pipeline(jobs: &mut JobRegistry, pipeline: &Pipeline) -> Result<(), ShellError> {
	if pipeline.left.is_empty() || pipeline.right.is_empty() {
		return Err(ShellError::EmptyCommand);
	}

	let (read_end, write_end) = unistd::pipe().map_err(ShellError::Pipe)?;
	let (read_end, write_end) = (read_end.into_raw_fd(), write_end.into_raw_fd());

	let left = match unsafe { unistd::fork() } {
		Err(e) => {
			close_quietly(read_end);
			close_quietly(write_end);
			return Err(ShellError::Fork(e));
		}
		Ok(ForkResult::Child) => {
			close_quietly(read_end);
			redirect_fd(write_end, libc::STDOUT_FILENO);
			close_quietly(write_end);
			exec_or_exit(&pipeline.left)
		}
		Ok(ForkResult::Parent { child }) => Child::new(child),
	};

	let right = match unsafe { unistd::fork() } {
		Err(e) => {
			// The writer is already running; the registry reaps it
			// once it dies on the closed pipe.
			close_quietly(read_end);
			close_quietly(write_end);
			jobs.register(left);
			return Err(ShellError::Fork(e));
		}
		Ok(ForkResult::Child) => {
			close_quietly(write_end);
			redirect_fd(read_end, libc::STDIN_FILENO);
			close_quietly(read_end);
			exec_or_exit(&pipeline.right)
		}
		Ok(ForkResult::Parent { child }) => Child::new(child),
	};

	// The read side only reports EOF once every write-end copy is
	// closed; the parent must not keep either end open.
	close_quietly(read_end);
	close_quietly(write_end);

	tracing::debug!(
		left = left.pid().as_raw(),
		right = right.pid().as_raw(),
		"pipeline spawned"
	);
	if pipeline.background {
		jobs.register(left);
		jobs.register(right);
	} else {
		left.wait();
		right.wait();
	}
	Ok(())
}

fn exec_child(cmd: &Command) -> ! {
	if let Some(path) = cmd.stdin_file {
		// A failed open is reported but not fatal; the command then
		// runs against the shell's own stdin.
		match File::open(OsStr::from_bytes(path)) {
			Ok(file) => {
				let fd = file.into_raw_fd();
				redirect_fd(fd, libc::STDIN_FILENO);
				close_quietly(fd);
			}
			Err(e) => report(&ShellError::FileOpen { path: path.to_vec(), source: e }),
		}
	}

	if let Some(path) = cmd.stdout_file {
		let opened = OpenOptions::new()
			.write(true)
			.create(true)
			.truncate(true)
			.mode(0o644)
			.open(OsStr::from_bytes(path));
		match opened {
			Ok(file) => {
				let fd = file.into_raw_fd();
				redirect_fd(fd, libc::STDOUT_FILENO);
				close_quietly(fd);
			}
			Err(e) => report(&ShellError::FileOpen { path: path.to_vec(), source: e }),
		}
	}

	exec_or_exit(&cmd.argv)
}

fn exec_or_exit(argv: &[&[u8]]) -> ! {
	let args: Result<Vec<CString>, _> = argv.iter().map(|&arg| CString::new(arg.to_vec())).collect();
	let args = match args {
		Ok(args) => args,
		Err(_) => {
			report(&ShellError::BadArgument);
			unsafe { libc::_exit(BAD_ARGV) }
		}
	};

	match unistd::execvp(&args[0], &args) {
		Ok(_) => unreachable!(),
		Err(e) => {
			report(&ShellError::Exec { program: argv[0].to_vec(), source: e });
			unsafe { libc::_exit(EXEC_FAILED) }
		}
	}
}

fn redirect_fd(fd: RawFd, target: RawFd) {
	if let Err(e) = unistd::dup2(fd, target) {
		eprintln!("osh: dup2 failed: {e}");
	}
}

fn close_quietly(fd: RawFd) {
	let _ = unistd::close(fd);
}
