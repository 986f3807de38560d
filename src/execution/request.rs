//! The program to run and its preparation for exec

use bsexec_core::{BsexecError, Result};
use nix::unistd::{AccessFlags, access};
use std::ffi::{CStr, CString, OsStr};
use std::os::unix::ffi::OsStrExt;
use std::path::{Path, PathBuf};

const DEFAULT_PATH: &str = "/usr/local/sbin:/usr/local/bin:/usr/sbin:/usr/bin:/sbin:/bin";

/// Interpreter for executables the kernel cannot load (ENOEXEC)
pub(crate) const SHELL: &CStr = c"/bin/sh";

/// Program and arguments, passed through to exec unmodified
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecRequest {
    program: String,
    args: Vec<String>,
}

impl ExecRequest {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// Build from a full argument vector whose first entry is the program
    pub fn from_argv(argv: &[String]) -> Result<Self> {
        match argv {
            [program, args @ ..] => Ok(Self::new(program.clone(), args.to_vec())),
            [] => Err(BsexecError::InvalidRequest("no program given".to_string())),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Resolve the program path and build every C string exec needs.
    ///
    /// This is where all allocation happens, so that nothing has to be
    /// built after the process is duplicated.
    pub(crate) fn prepare(&self) -> Result<PreparedCommand> {
        if self.program.is_empty() {
            return Err(BsexecError::InvalidRequest("empty program name".to_string()));
        }

        let path_var = std::env::var_os("PATH");
        let resolved = resolve_program_path(&self.program, path_var.as_deref())?;

        let path = CString::new(resolved.as_os_str().as_bytes()).map_err(|_| {
            BsexecError::InvalidRequest("program path contains nul byte".to_string())
        })?;

        let argv = std::iter::once(&self.program)
            .chain(self.args.iter())
            .map(|arg| {
                CString::new(arg.as_bytes()).map_err(|_| {
                    BsexecError::InvalidRequest(format!("argument contains nul byte: {:?}", arg))
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(PreparedCommand::new(path, argv))
    }
}

/// Exec-ready form of an [`ExecRequest`]
pub(crate) struct PreparedCommand {
    path: CString,
    // Owns the strings both pointer vectors point into; never modified after construction.
    _argv: Vec<CString>,
    argv_ptrs: Vec<*const libc::c_char>,
    // `/bin/sh <path> <args...>`, for files without a loadable format.
    shell_argv_ptrs: Vec<*const libc::c_char>,
}

impl PreparedCommand {
    fn new(path: CString, argv: Vec<CString>) -> Self {
        let argv_ptrs = argv
            .iter()
            .map(|arg| arg.as_ptr())
            .chain(std::iter::once(std::ptr::null()))
            .collect();

        let shell_argv_ptrs = [SHELL.as_ptr(), path.as_ptr()]
            .into_iter()
            .chain(argv.iter().skip(1).map(|arg| arg.as_ptr()))
            .chain(std::iter::once(std::ptr::null()))
            .collect();

        Self {
            path,
            _argv: argv,
            argv_ptrs,
            shell_argv_ptrs,
        }
    }

    pub(crate) fn path(&self) -> &CString {
        &self.path
    }

    /// Null-terminated argument vector
    pub(crate) fn argv_ptr(&self) -> *const *const libc::c_char {
        self.argv_ptrs.as_ptr()
    }

    /// Null-terminated argument vector for running the file through [`SHELL`]
    pub(crate) fn shell_argv_ptr(&self) -> *const *const libc::c_char {
        self.shell_argv_ptrs.as_ptr()
    }
}

/// Resolve a program name to a path using PATH semantics.
///
/// Names containing a slash are used as given.
fn resolve_program_path(program: &str, path_var: Option<&OsStr>) -> Result<PathBuf> {
    if program.contains('/') {
        return Ok(PathBuf::from(program));
    }

    let search = path_var.unwrap_or_else(|| OsStr::new(DEFAULT_PATH));

    for dir in std::env::split_paths(search) {
        let dir = if dir.as_os_str().is_empty() {
            Path::new(".").to_path_buf()
        } else {
            dir
        };
        let candidate = dir.join(program);

        if candidate.is_file() && access(&candidate, AccessFlags::X_OK).is_ok() {
            return Ok(candidate);
        }
    }

    Err(BsexecError::CommandNotFound(program.to_string()))
}
