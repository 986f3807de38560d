//! Parsing of the scope argument given on the command line

use crate::scope::handle::ProcessId;
use log::warn;

/// Marker for the root of the scope hierarchy
pub const ROOT_MARKER: &str = "/";
/// Marker for the parent of the caller's scope
pub const PARENT_MARKER: &str = "..";
/// Markers for the null scope
pub const NULL_MARKERS: [&str; 2] = ["0", "NULL"];

/// What a scope argument asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeToken {
    /// Walk parents until the hierarchy stops changing
    Root,
    /// One step up from the caller's scope
    Parent,
    /// No scope at all
    Null,
    /// The scope registered for another process
    Process(ProcessId),
}

impl ScopeToken {
    /// Parse a raw argument. Never fails: anything that is not a marker is
    /// read as a process id, with unparsable text becoming id 0.
    pub fn parse(token: &str) -> Self {
        match token {
            ROOT_MARKER => ScopeToken::Root,
            PARENT_MARKER => ScopeToken::Parent,
            t if NULL_MARKERS.contains(&t) => ScopeToken::Null,
            other => ScopeToken::Process(parse_process_id(other)),
        }
    }

    /// Short name used in logs and reports
    pub fn kind(&self) -> &'static str {
        match self {
            ScopeToken::Root => "root",
            ScopeToken::Parent => "parent",
            ScopeToken::Null => "null",
            ScopeToken::Process(_) => "process",
        }
    }
}

/// Read a process id the way `atoi` does: optional leading whitespace and
/// `+`, then the longest run of digits. No digits, or a value that does not
/// fit, gives 0.
fn parse_process_id(token: &str) -> ProcessId {
    let trimmed = token.trim_start();
    let unsigned = trimmed.strip_prefix('+').unwrap_or(trimmed);
    let digits_len = unsigned
        .bytes()
        .take_while(|b| b.is_ascii_digit())
        .count();

    let pid = unsigned[..digits_len].parse::<i32>().unwrap_or(0);

    if digits_len == 0 || digits_len != unsigned.len() {
        warn!(
            "Scope '{}' is not a plain process id, using pid {}",
            token, pid
        );
    }

    ProcessId::from_raw(pid)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn markers() {
        assert_eq!(ScopeToken::parse("/"), ScopeToken::Root);
        assert_eq!(ScopeToken::parse(".."), ScopeToken::Parent);
        assert_eq!(ScopeToken::parse("0"), ScopeToken::Null);
        assert_eq!(ScopeToken::parse("NULL"), ScopeToken::Null);
    }

    #[test]
    fn markers_are_exact() {
        assert_eq!(
            ScopeToken::parse("null"),
            ScopeToken::Process(ProcessId::from_raw(0))
        );
        assert_eq!(
            ScopeToken::parse("//"),
            ScopeToken::Process(ProcessId::from_raw(0))
        );
        assert_eq!(
            ScopeToken::parse("00"),
            ScopeToken::Process(ProcessId::from_raw(0))
        );
    }

    #[test]
    fn plain_pid() {
        assert_eq!(
            ScopeToken::parse("412"),
            ScopeToken::Process(ProcessId::from_raw(412))
        );
    }

    #[test]
    fn non_numeric_falls_back_to_zero() {
        assert_eq!(
            ScopeToken::parse("launchd"),
            ScopeToken::Process(ProcessId::from_raw(0))
        );
        assert_eq!(
            ScopeToken::parse(""),
            ScopeToken::Process(ProcessId::from_raw(0))
        );
    }

    #[test]
    fn leading_digits_are_used() {
        assert_eq!(parse_process_id("12abc"), ProcessId::from_raw(12));
        assert_eq!(parse_process_id("  +77"), ProcessId::from_raw(77));
    }

    #[test]
    fn negative_and_overflowing_become_zero() {
        assert_eq!(parse_process_id("-5"), ProcessId::from_raw(0));
        assert_eq!(parse_process_id("99999999999"), ProcessId::from_raw(0));
    }

    #[test]
    fn kinds() {
        assert_eq!(ScopeToken::parse("/").kind(), "root");
        assert_eq!(ScopeToken::parse("..").kind(), "parent");
        assert_eq!(ScopeToken::parse("NULL").kind(), "null");
        assert_eq!(ScopeToken::parse("1").kind(), "process");
    }
}
