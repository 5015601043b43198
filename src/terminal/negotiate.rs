//! Inline-graphics capability detection.
//!
//! The probe is written to the controlling terminal with echo and line
//! buffering off, and whatever comes back within the read timeout is
//! searched for a graphics-protocol reply. The original terminal mode is
//! restored by [`RawModeGuard`] on every exit path.

use std::io::{self, Read, Write};

use super::escape::{DEVICE_ATTRIBUTES_PREFIX, GRAPHICS_MARKER, GRAPHICS_PROBE};

/// Upper bound on captured response bytes
pub const RESPONSE_LIMIT: usize = 1024;

/// Send [`GRAPHICS_PROBE`] and collect the terminal's reply.
///
/// Stops at the end of the device-attributes reply, after
/// [`RESPONSE_LIMIT`] bytes, or when a read returns nothing (the device's
/// read timeout expired).
pub fn probe<D: Read + Write>(device: &mut D) -> io::Result<Vec<u8>> {
    device.write_all(GRAPHICS_PROBE)?;
    device.flush()?;

    let mut response = Vec::new();
    let mut chunk = [0u8; 256];
    while response.len() < RESPONSE_LIMIT {
        let want = chunk.len().min(RESPONSE_LIMIT - response.len());
        let n = match device.read(&mut chunk[..want]) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) if e.kind() == io::ErrorKind::WouldBlock => break,
            Err(e) => return Err(e),
        };
        response.extend_from_slice(&chunk[..n]);
        if reply_complete(&response) {
            break;
        }
    }

    Ok(response)
}

/// True once a device-attributes reply has been terminated by `c`
fn reply_complete(response: &[u8]) -> bool {
    find(response, DEVICE_ATTRIBUTES_PREFIX)
        .is_some_and(|start| response[start..].contains(&b'c'))
}

/// True if `response` contains a graphics-protocol reply
pub fn confirms_graphics(response: &[u8]) -> bool {
    find(response, GRAPHICS_MARKER).is_some()
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

/// Raw, no-echo terminal mode with a 100ms read timeout, restored on drop.
#[cfg(unix)]
pub struct RawModeGuard {
    fd: std::os::fd::RawFd,
    original: libc::termios,
}

#[cfg(unix)]
impl RawModeGuard {
    pub fn acquire(fd: std::os::fd::RawFd) -> io::Result<Self> {
        let mut original = std::mem::MaybeUninit::<libc::termios>::uninit();
        // SAFETY: tcgetattr fully initializes the termios on success.
        if unsafe { libc::tcgetattr(fd, original.as_mut_ptr()) } != 0 {
            return Err(io::Error::last_os_error());
        }
        let original = unsafe { original.assume_init() };

        let mut raw = original;
        // SAFETY: raw is a valid, initialized termios.
        unsafe { libc::cfmakeraw(&mut raw) };
        raw.c_cc[libc::VMIN] = 0;
        raw.c_cc[libc::VTIME] = 1;

        if unsafe { libc::tcsetattr(fd, libc::TCSANOW, &raw) } != 0 {
            return Err(io::Error::last_os_error());
        }

        Ok(Self { fd, original })
    }
}

#[cfg(unix)]
impl Drop for RawModeGuard {
    fn drop(&mut self) {
        // SAFETY: original came from tcgetattr on the same descriptor.
        if unsafe { libc::tcsetattr(self.fd, libc::TCSANOW, &self.original) } != 0 {
            tracing::warn!(error = %io::Error::last_os_error(), "failed to restore terminal mode");
        }
    }
}

/// Ask the controlling terminal whether it can display inline images.
///
/// Any failure counts as "no": most terminals lack the protocol.
#[cfg(unix)]
pub fn detect_graphics_support() -> bool {
    use std::os::fd::AsRawFd;

    let mut tty = match std::fs::OpenOptions::new()
        .read(true)
        .write(true)
        .open("/dev/tty")
    {
        Ok(tty) => tty,
        Err(e) => {
            tracing::debug!(error = %e, "no controlling terminal");
            return false;
        }
    };

    let response = {
        let _guard = match RawModeGuard::acquire(tty.as_raw_fd()) {
            Ok(guard) => guard,
            Err(e) => {
                tracing::debug!(error = %e, "cannot switch terminal to raw mode");
                return false;
            }
        };
        probe(&mut tty)
    };

    match response {
        Ok(response) => {
            let supported = confirms_graphics(&response);
            tracing::debug!(bytes = response.len(), supported, "graphics probe answered");
            supported
        }
        Err(e) => {
            tracing::debug!(error = %e, "graphics probe failed");
            false
        }
    }
}

#[cfg(not(unix))]
pub fn detect_graphics_support() -> bool {
    false
}
