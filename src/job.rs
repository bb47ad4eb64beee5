use nix::errno::Errno;
use nix::sys::wait::{waitpid, WaitPidFlag, WaitStatus};
use nix::unistd::Pid;

pub struct Child {
	pid: Pid,
}

impl Child {
	pub fn new(pid: Pid) -> Child {
		Child { pid }
	}

	pub fn pid(&self) -> Pid {
		self.pid
	}

	/// Blocks until this child (not just any child of the shell) is gone.
	pub fn wait(&self) {
		loop {
			match waitpid(self.pid, None) {
				Ok(WaitStatus::Exited(..)) | Ok(WaitStatus::Signaled(..)) => return,
				Ok(_) => continue,
				Err(Errno::EINTR) => continue,
				Err(Errno::ECHILD) => return,
				Err(e) => {
					tracing::warn!(pid = self.pid.as_raw(), "waitpid failed: {e}");
					return;
				}
			}
		}
	}

	/// Non-blocking poll; true once the child has been reaped.
	pub fn try_wait(&self) -> bool {
		match waitpid(self.pid, Some(WaitPidFlag::WNOHANG)) {
			Ok(WaitStatus::Exited(..)) | Ok(WaitStatus::Signaled(..)) => true,
			Ok(_) => false,
			Err(Errno::ECHILD) => true,
			Err(_) => false,
		}
	}
}

/// Backgrounded children, reaped opportunistically between prompts.
#[derive(Default)]
pub struct JobRegistry {
	jobs: Vec<Child>,
}

impl JobRegistry {
	pub fn new() -> JobRegistry {
		JobRegistry { jobs: Vec::new() }
	}

	pub fn register(&mut self, child: Child) {
		tracing::debug!(pid = child.pid().as_raw(), "background child registered");
		self.jobs.push(child);
	}

	pub fn reap_finished(&mut self) {
		self.jobs.retain(|child| {
			let done = child.try_wait();
			if done {
				tracing::debug!(pid = child.pid().as_raw(), "background child reaped");
			}
			!done
		});
	}
}
