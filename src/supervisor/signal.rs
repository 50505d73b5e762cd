//! Signal delivery to the child.

use std::io;

use super::state::RelaySignal;

/// Delivers a signal to a process.
pub trait SignalRelay {
    fn relay(&self, pid: u32, signal: RelaySignal) -> io::Result<()>;
}

/// Relays with `kill(2)` on Unix.
///
/// On Windows the console already delivers Ctrl-C to every process
/// attached to it, so there is nothing to forward.
#[derive(Debug, Default, Clone, Copy)]
pub struct KillRelay;

#[cfg(unix)]
impl RelaySignal {
    fn signo(self) -> libc::c_int {
        match self {
            RelaySignal::Interrupt => libc::SIGINT,
            RelaySignal::Terminate => libc::SIGTERM,
        }
    }
}

#[cfg(unix)]
impl SignalRelay for KillRelay {
    fn relay(&self, pid: u32, signal: RelaySignal) -> io::Result<()> {
        let pid = libc::pid_t::try_from(pid)
            .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "pid out of range"))?;
        // SAFETY: kill() only sends a signal; pid is a child we spawned.
        let rc = unsafe { libc::kill(pid, signal.signo()) };
        if rc == 0 {
            Ok(())
        } else {
            Err(io::Error::last_os_error())
        }
    }
}

/// Whether a Ctrl-C typed at the terminal already reaches the child.
///
/// True when pyboot runs in the terminal's foreground process group. The
/// child inherits that group, so the terminal sends it SIGINT itself. A
/// SIGINT sent to pyboot alone with `kill` is then not relayed either.
#[cfg(unix)]
pub fn terminal_delivers_interrupt() -> bool {
    // SAFETY: neither call takes pointers. tcgetpgrp returns -1 when stdin
    // is not a terminal.
    let (foreground, own) = unsafe { (libc::tcgetpgrp(libc::STDIN_FILENO), libc::getpgrp()) };
    foreground != -1 && foreground == own
}

#[cfg(not(unix))]
pub fn terminal_delivers_interrupt() -> bool {
    false
}

#[cfg(not(unix))]
impl SignalRelay for KillRelay {
    fn relay(&self, pid: u32, signal: RelaySignal) -> io::Result<()> {
        tracing::debug!("{:?} reaches {} through the console", signal, pid);
        Ok(())
    }
}
