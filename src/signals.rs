//! Termination signals.
//!
//! On unix, SIGTERM, SIGHUP and SIGINT are caught by a handler that only
//! stores the signal number. The run loop polls [`take`] on every tick and
//! exits with `128 + signo`. Raw mode normally turns Ctrl-C into a `C-c`
//! key, so SIGINT only arrives when it is sent from outside.

use std::sync::atomic::{AtomicI32, Ordering};

static PENDING: AtomicI32 = AtomicI32::new(0);

/// The last signal received since the previous call, if any.
pub fn take() -> Option<i32> {
    match PENDING.swap(0, Ordering::SeqCst) {
        0 => None,
        signo => Some(signo),
    }
}

/// Record `signo` as if it had been delivered.
pub fn raise(signo: i32) {
    PENDING.store(signo, Ordering::SeqCst);
}

#[cfg(unix)]
extern "C" fn on_signal(signo: libc::c_int) {
    PENDING.store(signo, Ordering::SeqCst);
}

/// Install the handlers. Safe to call more than once.
#[cfg(unix)]
pub fn install() -> std::io::Result<()> {
    for signo in [libc::SIGTERM, libc::SIGHUP, libc::SIGINT] {
        // SAFETY: the handler only performs an atomic store, which is
        // async-signal-safe, and the sigaction struct is fully initialised.
        let rc = unsafe {
            let mut action: libc::sigaction = std::mem::zeroed();
            action.sa_sigaction = on_signal as extern "C" fn(libc::c_int) as libc::sighandler_t;
            libc::sigemptyset(&mut action.sa_mask);
            libc::sigaction(signo, &action, std::ptr::null_mut())
        };
        if rc != 0 {
            return Err(std::io::Error::last_os_error());
        }
    }
    tracing::debug!("signal handlers installed");
    Ok(())
}

#[cfg(not(unix))]
pub fn install() -> std::io::Result<()> {
    Ok(())
}

/// Exit code for a process ending because of `signo`.
pub fn exit_code(signo: i32) -> i32 {
    128 + signo
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_take_clears() {
        raise(15);
        assert_eq!(take(), Some(15));
        assert_eq!(take(), None);
        assert_eq!(exit_code(15), 143);
    }
}
