//! System account resolution used by the `user` option.

use std::io;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Account {
    pub uid: u32,
    pub gid: u32,
}

/// Resolves an account name to the ids the process drops privileges to.
pub trait AccountLookup {
    fn lookup(&self, name: &str) -> io::Result<Account>;
}

/// Looks accounts up in the system password database.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemAccounts;

impl AccountLookup for SystemAccounts {
    fn lookup(&self, name: &str) -> io::Result<Account> {
        getpwnam(name)
    }
}

#[cfg(unix)]
fn getpwnam(name: &str) -> io::Result<Account> {
    use std::{ffi::CString, mem, ptr};

    const MAX_BUFFER_LEN: usize = 1 << 20;

    let c_name = CString::new(name)
        .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "account name contains a NUL byte"))?;

    let mut buffer_len = match unsafe { libc::sysconf(libc::_SC_GETPW_R_SIZE_MAX) } {
        n if n > 0 => n as usize,
        _ => 1024,
    };

    loop {
        let mut passwd: libc::passwd = unsafe { mem::zeroed() };
        let mut buffer = vec![0 as libc::c_char; buffer_len];
        let mut result: *mut libc::passwd = ptr::null_mut();

        let rc = unsafe {
            libc::getpwnam_r(
                c_name.as_ptr(),
                &mut passwd,
                buffer.as_mut_ptr(),
                buffer.len(),
                &mut result,
            )
        };

        if rc == libc::ERANGE && buffer_len < MAX_BUFFER_LEN {
            buffer_len *= 2;
            continue;
        }
        if rc != 0 {
            return Err(io::Error::from_raw_os_error(rc));
        }
        if result.is_null() {
            return Err(io::Error::new(io::ErrorKind::NotFound, "no such account"));
        }

        return Ok(Account {
            uid: passwd.pw_uid,
            gid: passwd.pw_gid,
        });
    }
}

#[cfg(not(unix))]
fn getpwnam(_name: &str) -> io::Result<Account> {
    Err(io::Error::new(
        io::ErrorKind::Unsupported,
        "account lookup is only available on unix",
    ))
}
