//! Process identity and the permanent drop to real ids

use crate::error::{BsexecError, Result};
use log::{debug, warn};
use nix::unistd::{Gid, Uid, getegid, geteuid, getgid, getuid, setgid, setuid};
use std::fmt;

/// Real and effective user/group ids of the calling process
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Identity {
    pub real_uid: u32,
    pub effective_uid: u32,
    pub real_gid: u32,
    pub effective_gid: u32,
}

impl Identity {
    /// Snapshot the ids of the running process
    pub fn current() -> Self {
        Self {
            real_uid: getuid().as_raw(),
            effective_uid: geteuid().as_raw(),
            real_gid: getgid().as_raw(),
            effective_gid: getegid().as_raw(),
        }
    }

    /// Effective ids differ from real ids (setuid/setgid execution)
    pub fn is_elevated(&self) -> bool {
        self.real_uid != self.effective_uid || self.real_gid != self.effective_gid
    }

    pub fn is_root(&self) -> bool {
        self.effective_uid == 0
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "uid={} euid={} gid={} egid={}",
            self.real_uid, self.effective_uid, self.real_gid, self.effective_gid
        )
    }
}

/// What to do when dropping to the real ids fails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DropPolicy {
    /// Abort before the process is duplicated.
    #[default]
    Strict,

    /// Log the failure and carry on with whatever ids remain.
    Lenient,
}

/// Permanently set the effective group, then the effective user, to the real ids.
///
/// Group goes first: once the user id is dropped the process may no longer
/// be allowed to change its group. Returns the identity observed afterwards.
pub fn drop_to_real(identity: &Identity, policy: DropPolicy) -> Result<Identity> {
    debug!("Dropping privileges ({})", identity);

    let attempt = setgid(Gid::from_raw(identity.real_gid))
        .map_err(|e| BsexecError::PrivilegeDrop(format!("setgid({}): {}", identity.real_gid, e)))
        .and_then(|()| {
            setuid(Uid::from_raw(identity.real_uid)).map_err(|e| {
                BsexecError::PrivilegeDrop(format!("setuid({}): {}", identity.real_uid, e))
            })
        });
    apply_policy(policy, attempt)?;

    let dropped = Identity::current();
    if dropped.is_elevated() {
        apply_policy(
            policy,
            Err(BsexecError::PrivilegeDrop(format!(
                "effective ids still differ from real ids ({})",
                dropped
            ))),
        )?;
    }

    debug!("Running as {}", dropped);
    Ok(dropped)
}

fn apply_policy(policy: DropPolicy, attempt: Result<()>) -> Result<()> {
    match (attempt, policy) {
        (Ok(()), _) => Ok(()),
        (Err(e), DropPolicy::Strict) => Err(e),
        (Err(e), DropPolicy::Lenient) => {
            warn!("Continuing despite {}", e);
            Ok(())
        }
    }
}
