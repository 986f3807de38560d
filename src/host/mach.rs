//! Bootstrap scope queries over Mach ports

use crate::host::{HostResult, HostStatus, ScopeHost};
use crate::scope::{ProcessId, ScopeHandle, TaskHandle};
use libc::{c_char, c_int, kern_return_t, mach_port_t};
use log::debug;
use std::ffi::CStr;

const KERN_SUCCESS: kern_return_t = 0;
const BOOTSTRAP_NOT_PRIVILEGED: kern_return_t = 1100;
const TASK_BOOTSTRAP_PORT: c_int = 4;

unsafe extern "C" {
    static bootstrap_port: mach_port_t;

    fn bootstrap_parent(bp: mach_port_t, parent_port: *mut mach_port_t) -> kern_return_t;
    fn task_for_pid(target_tport: mach_port_t, pid: c_int, t: *mut mach_port_t) -> kern_return_t;
    fn task_get_special_port(
        task: mach_port_t,
        which_port: c_int,
        special_port: *mut mach_port_t,
    ) -> kern_return_t;
    fn task_set_special_port(
        task: mach_port_t,
        which_port: c_int,
        special_port: mach_port_t,
    ) -> kern_return_t;
    fn mach_port_deallocate(task: mach_port_t, name: mach_port_t) -> kern_return_t;
    fn mach_error_string(error_value: kern_return_t) -> *const c_char;
}

#[allow(deprecated)] // libc points at mach2 for this, the call itself is stable
fn task_self() -> mach_port_t {
    unsafe { libc::mach_task_self() }
}

fn describe(code: kern_return_t) -> String {
    // SAFETY: mach_error_string returns a pointer to a static string table
    let ptr = unsafe { mach_error_string(code) };
    if ptr.is_null() {
        return format!("unknown error {}", code);
    }
    unsafe { CStr::from_ptr(ptr) }.to_string_lossy().into_owned()
}

fn failed(code: kern_return_t) -> HostStatus {
    HostStatus::Failed {
        code,
        description: describe(code),
    }
}

/// [`ScopeHost`] backed by the task's bootstrap special port
#[derive(Debug, Default)]
pub struct MachHost;

impl MachHost {
    pub fn new() -> Self {
        MachHost
    }
}

impl ScopeHost for MachHost {
    fn current_scope(&self) -> ScopeHandle {
        // SAFETY: bootstrap_port is initialised by libSystem before main
        ScopeHandle::from_raw(unsafe { bootstrap_port })
    }

    fn parent_scope(&self, scope: ScopeHandle) -> HostResult<ScopeHandle> {
        let mut parent: mach_port_t = 0;
        let result = unsafe { bootstrap_parent(scope.as_raw(), &mut parent) };
        debug!("bootstrap_parent({}) = {}", scope, result);

        match result {
            KERN_SUCCESS => Ok(ScopeHandle::from_raw(parent)),
            BOOTSTRAP_NOT_PRIVILEGED => Err(HostStatus::NotPrivileged),
            code => Err(HostStatus::Failed {
                code,
                description: format!("bootstrap_parent() {}", code),
            }),
        }
    }

    fn task_for_pid(&self, pid: ProcessId) -> HostResult<TaskHandle> {
        let mut task: mach_port_t = 0;
        let result = unsafe { task_for_pid(task_self(), pid.as_raw(), &mut task) };
        debug!("task_for_pid({}) = {}", pid, result);

        if result != KERN_SUCCESS {
            return Err(failed(result));
        }
        Ok(TaskHandle::from_raw(task))
    }

    fn task_scope(&self, task: TaskHandle) -> HostResult<ScopeHandle> {
        let mut scope: mach_port_t = 0;
        let result =
            unsafe { task_get_special_port(task.as_raw(), TASK_BOOTSTRAP_PORT, &mut scope) };
        debug!("task_get_bootstrap_port({}) = {}", task.as_raw(), result);

        // The scope right is independent of the task right, which is no longer needed.
        unsafe {
            mach_port_deallocate(task_self(), task.as_raw());
        }

        if result != KERN_SUCCESS {
            return Err(failed(result));
        }
        Ok(ScopeHandle::from_raw(scope))
    }

    fn install_scope(&self, scope: ScopeHandle) -> HostResult<()> {
        let result =
            unsafe { task_set_special_port(task_self(), TASK_BOOTSTRAP_PORT, scope.as_raw()) };
        debug!("task_set_bootstrap_port({}) = {}", scope, result);

        if result != KERN_SUCCESS {
            return Err(failed(result));
        }
        Ok(())
    }
}
