//! Privilege checks. The installer itself runs unprivileged and escalates
//! individual commands with sudo.

/// Check if the current process is running as root (euid 0).
pub fn is_root() -> bool {
    nix::unistd::geteuid().is_root()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_root_matches_uid_zero() {
        assert_eq!(is_root(), nix::unistd::geteuid().as_raw() == 0);
    }
}
