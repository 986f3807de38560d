//! Scripted scope host shared by the integration tests

#![allow(dead_code)]

use bsexec::{HostResult, HostStatus, ProcessId, ScopeHandle, ScopeHost, TaskHandle};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

static PROCESS_LOCK: Mutex<()> = Mutex::new(());

/// Serialize tests that fork or touch process-wide ids
pub fn serial_guard() -> MutexGuard<'static, ()> {
    PROCESS_LOCK
        .lock()
        .unwrap_or_else(|poison| poison.into_inner())
}

/// In-memory scope hierarchy with per-process scopes and call accounting
pub struct FakeHost {
    current: ScopeHandle,
    parents: HashMap<u32, HostResult<ScopeHandle>>,
    tasks: HashMap<i32, HostResult<u32>>,
    task_scopes: HashMap<u32, HostResult<ScopeHandle>>,
    install_result: HostResult<()>,
    pub queries: Cell<usize>,
    pub installed: RefCell<Vec<ScopeHandle>>,
}

impl FakeHost {
    pub fn new(current: u32) -> Self {
        Self {
            current: ScopeHandle::from_raw(current),
            parents: HashMap::new(),
            tasks: HashMap::new(),
            task_scopes: HashMap::new(),
            install_result: Ok(()),
            queries: Cell::new(0),
            installed: RefCell::new(Vec::new()),
        }
    }

    /// `child`'s parent is `parent`; a scope without an entry is a root
    pub fn parent(mut self, child: u32, parent: u32) -> Self {
        self.parents
            .insert(child, Ok(ScopeHandle::from_raw(parent)));
        self
    }

    pub fn parent_fails(mut self, scope: u32, status: HostStatus) -> Self {
        self.parents.insert(scope, Err(status));
        self
    }

    /// Process `pid` has task `task` whose scope is `scope`
    pub fn process(mut self, pid: i32, task: u32, scope: u32) -> Self {
        self.tasks.insert(pid, Ok(task));
        self.task_scopes
            .insert(task, Ok(ScopeHandle::from_raw(scope)));
        self
    }

    pub fn task_denied(mut self, pid: i32, description: &str) -> Self {
        self.tasks.insert(
            pid,
            Err(HostStatus::Failed {
                code: 5,
                description: description.to_string(),
            }),
        );
        self
    }

    pub fn scope_denied(mut self, pid: i32, task: u32, description: &str) -> Self {
        self.tasks.insert(pid, Ok(task));
        self.task_scopes.insert(
            task,
            Err(HostStatus::Failed {
                code: 4,
                description: description.to_string(),
            }),
        );
        self
    }

    pub fn install_fails(mut self, description: &str) -> Self {
        self.install_result = Err(HostStatus::Failed {
            code: 268435459,
            description: description.to_string(),
        });
        self
    }

    fn count(&self) {
        self.queries.set(self.queries.get() + 1);
    }
}

impl ScopeHost for FakeHost {
    fn current_scope(&self) -> ScopeHandle {
        self.current
    }

    fn parent_scope(&self, scope: ScopeHandle) -> HostResult<ScopeHandle> {
        self.count();
        self.parents
            .get(&scope.as_raw())
            .cloned()
            .unwrap_or(Ok(scope))
    }

    fn task_for_pid(&self, pid: ProcessId) -> HostResult<TaskHandle> {
        self.count();
        match self.tasks.get(&pid.as_raw()) {
            Some(Ok(task)) => Ok(TaskHandle::from_raw(*task)),
            Some(Err(status)) => Err(status.clone()),
            None => Err(HostStatus::Failed {
                code: 5,
                description: "(os/kern) failure".to_string(),
            }),
        }
    }

    fn task_scope(&self, task: TaskHandle) -> HostResult<ScopeHandle> {
        self.count();
        self.task_scopes
            .get(&task.as_raw())
            .cloned()
            .unwrap_or(Err(HostStatus::Failed {
                code: 4,
                description: "(os/kern) invalid argument".to_string(),
            }))
    }

    fn install_scope(&self, scope: ScopeHandle) -> HostResult<()> {
        self.installed.borrow_mut().push(scope);
        self.install_result.clone()
    }
}
