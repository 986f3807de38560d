//! Runtime detection of what the host allows bsexec to do

use crate::privilege::Identity;

/// Detected host capabilities relevant to scope switching
#[derive(Debug, Clone)]
pub struct SystemCapabilities {
    /// Running as root (euid == 0)
    pub has_root: bool,
    /// Effective ids differ from real ids
    pub is_elevated: bool,
    /// The platform exposes per-task bootstrap ports
    pub has_bootstrap_ports: bool,
}

impl SystemCapabilities {
    pub fn detect() -> Self {
        let identity = Identity::current();
        Self {
            has_root: identity.is_root(),
            is_elevated: identity.is_elevated(),
            has_bootstrap_ports: detect_bootstrap_ports(),
        }
    }

    /// Borrowing another process's scope needs task_for_pid rights, which
    /// in practice means root.
    pub fn can_borrow_foreign_scopes(&self) -> bool {
        self.has_bootstrap_ports && self.has_root
    }

    /// Get a human-readable summary of capabilities
    pub fn summary(&self) -> String {
        let check = |available: bool| if available { "[ok]" } else { "[--]" };

        [
            format!("{} Root privileges", check(self.has_root)),
            format!("{} Elevated (setuid/setgid)", check(self.is_elevated)),
            format!("{} Bootstrap ports", check(self.has_bootstrap_ports)),
        ]
        .join("\n")
    }
}

fn detect_bootstrap_ports() -> bool {
    cfg!(target_os = "macos")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_produces_output() {
        let caps = SystemCapabilities::detect();
        let summary = caps.summary();
        assert!(summary.contains("Root privileges"));
        assert!(summary.contains("Bootstrap ports"));
    }

    #[test]
    fn root_detection_matches_euid() {
        let caps = SystemCapabilities::detect();
        assert_eq!(caps.has_root, unsafe { libc::geteuid() } == 0);
    }

    #[test]
    fn foreign_scopes_need_root() {
        let caps = SystemCapabilities {
            has_root: false,
            is_elevated: false,
            has_bootstrap_ports: true,
        };
        assert!(!caps.can_borrow_foreign_scopes());

        let caps = SystemCapabilities {
            has_root: true,
            ..caps
        };
        assert!(caps.can_borrow_foreign_scopes());
    }

    #[cfg(not(target_os = "macos"))]
    #[test]
    fn no_bootstrap_ports_off_macos() {
        assert!(!SystemCapabilities::detect().has_bootstrap_ports);
    }
}
