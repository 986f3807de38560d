use bsexec::{ScopeHandle, ScopeHost, ScopeResolver, ScopeToken, default_host};
use bsexec_core::Identity;
use bsexec_core::capabilities::SystemCapabilities;
use log::info;
use serde::Serialize;

use crate::runner::report_error;

/// What `resolve --json` prints
#[derive(Debug, Serialize)]
struct ResolutionReport<'a> {
    token: &'a str,
    kind: &'static str,
    handle: u32,
}

pub fn check_requirements() {
    info!("Checking bsexec requirements");
    println!("Checking bsexec requirements...\n");

    let caps = SystemCapabilities::detect();
    println!("{}", caps.summary());

    if !caps.has_bootstrap_ports {
        println!("\n[✗] Bootstrap scopes are not available on this platform");
    } else if !caps.can_borrow_foreign_scopes() {
        println!("\n[!] Only '/', '..' and 'NULL' will resolve without root");
    }

    println!("\nIdentity:");
    println!("  {}", Identity::current());
}

pub fn resolve_scope(token: &str, json: bool) -> i32 {
    match default_host() {
        Ok(host) => resolve_with_host(&host, token, json),
        Err(e) => report_error(&e),
    }
}

pub fn resolve_with_host<H: ScopeHost + ?Sized>(host: &H, token: &str, json: bool) -> i32 {
    let parsed = ScopeToken::parse(token);
    let handle = match ScopeResolver::new(host).resolve_token(parsed) {
        Ok(handle) => handle,
        Err(e) => return report_error(&e),
    };

    match render_resolution(token, parsed, handle, json) {
        Ok(line) => {
            println!("{}", line);
            0
        }
        Err(e) => report_error(&bsexec::BsexecError::Io(e.into())),
    }
}

fn render_resolution(
    token: &str,
    parsed: ScopeToken,
    handle: ScopeHandle,
    json: bool,
) -> serde_json::Result<String> {
    if !json {
        return Ok(handle.to_string());
    }

    serde_json::to_string(&ResolutionReport {
        token,
        kind: parsed.kind(),
        handle: handle.as_raw(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn check_requirements_runs() {
        check_requirements();
    }

    #[test]
    fn plain_rendering_is_hex_handle() {
        let line =
            render_resolution("..", ScopeToken::Parent, ScopeHandle::from_raw(0x1103), false)
                .unwrap();
        assert_eq!(line, "0x1103");
    }

    #[test]
    fn json_rendering() {
        let line = render_resolution(
            "412",
            ScopeToken::parse("412"),
            ScopeHandle::from_raw(4611),
            true,
        )
        .unwrap();

        let value: serde_json::Value = serde_json::from_str(&line).unwrap();
        assert_eq!(value["token"], "412");
        assert_eq!(value["kind"], "process");
        assert_eq!(value["handle"], 4611);
    }

    #[cfg(not(target_os = "macos"))]
    #[test]
    fn resolve_without_bootstrap_ports_fails() {
        assert_eq!(resolve_scope("/", false), 1);
    }
}
