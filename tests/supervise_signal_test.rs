//! Signal relay through the real supervisor loop.
//!
//! Signals go to this whole test process, so this file holds a single
//! test and runs as its own binary.
#![cfg(unix)]

use std::thread;
use std::time::{Duration, Instant};

use pyboot::supervisor::{supervise, ServiceCommand};
use tempfile::TempDir;

#[test]
fn terminate_is_relayed_and_child_code_returned() {
    let temp = TempDir::new().unwrap();
    let ready = temp.path().join("ready");
    let script = format!(
        "trap 'exit 7' TERM; touch '{}'; sleep 5 & wait",
        ready.display()
    );
    let command = ServiceCommand::new("sh", ["-c", script.as_str()]);

    // Signal only once the trap is installed; pyboot listens before spawning.
    let signaller = thread::spawn(move || {
        let deadline = Instant::now() + Duration::from_secs(5);
        while !ready.exists() && Instant::now() < deadline {
            thread::sleep(Duration::from_millis(20));
        }
        // SAFETY: kill(2) takes no pointers; the target is this process.
        unsafe {
            libc::kill(libc::getpid(), libc::SIGTERM);
        }
    });

    let started = Instant::now();
    let code = supervise(&command).unwrap();
    signaller.join().unwrap();

    assert_eq!(code, 7);
    assert!(started.elapsed() < Duration::from_secs(5));
}
