//! Location of the plugin binary on disk.
//!
//! On Windows the plugin is a DLL loaded into the game, so the directory of
//! the *module containing this code* is wanted, not the game's executable.
//! `GetModuleHandleExW(FROM_ADDRESS)` finds that module from the address of a
//! function inside it, and `GetModuleFileNameW` turns the handle into a path.
//!
//! Elsewhere the code is linked into the running executable, so
//! `std::env::current_exe` gives the same answer.

use std::path::PathBuf;

use thiserror::Error;

/// Error type for install-directory lookup.
#[derive(Debug, Error)]
pub enum PathError {
    /// The OS could not report the module path.
    #[error("failed to determine the module path: {0}")]
    Module(String),

    /// The module path has no parent directory.
    #[error("module path {0} has no parent directory")]
    NoParent(PathBuf),
}

/// Returns the directory containing the binary this code was loaded from.
///
/// # Errors
///
/// Returns [`PathError`] if the OS lookup fails or the path has no parent.
pub fn module_directory() -> Result<PathBuf, PathError> {
    let module = module_file_path()?;
    module
        .parent()
        .map(|dir| dir.to_path_buf())
        .ok_or(PathError::NoParent(module))
}

#[cfg(target_os = "windows")]
fn module_file_path() -> Result<PathBuf, PathError> {
    use std::ffi::OsString;
    use std::os::windows::ffi::OsStringExt;

    use windows::core::PCWSTR;
    use windows::Win32::Foundation::HMODULE;
    use windows::Win32::System::LibraryLoader::{
        GetModuleFileNameW, GetModuleHandleExW, GET_MODULE_HANDLE_EX_FLAG_FROM_ADDRESS,
        GET_MODULE_HANDLE_EX_FLAG_UNCHANGED_REFCOUNT,
    };

    let mut module = HMODULE::default();
    let anchor = module_directory as *const () as *const u16;
    // SAFETY: with FROM_ADDRESS the "name" is an address inside this module;
    // UNCHANGED_REFCOUNT means the handle must not be freed.
    unsafe {
        GetModuleHandleExW(
            GET_MODULE_HANDLE_EX_FLAG_FROM_ADDRESS | GET_MODULE_HANDLE_EX_FLAG_UNCHANGED_REFCOUNT,
            PCWSTR(anchor),
            &mut module,
        )
    }
    .map_err(|e| PathError::Module(e.to_string()))?;

    // Grow the buffer until the path fits; long paths can exceed MAX_PATH.
    let mut buf = vec![0u16; 260];
    loop {
        // SAFETY: `buf` is a valid, writable UTF-16 buffer.
        let len = unsafe { GetModuleFileNameW(module, &mut buf) } as usize;
        if len == 0 {
            return Err(PathError::Module(
                windows::core::Error::from_win32().to_string(),
            ));
        }
        if len < buf.len() {
            buf.truncate(len);
            return Ok(PathBuf::from(OsString::from_wide(&buf)));
        }
        buf.resize(buf.len() * 2, 0);
    }
}

#[cfg(not(target_os = "windows"))]
fn module_file_path() -> Result<PathBuf, PathError> {
    std::env::current_exe().map_err(|e| PathError::Module(e.to_string()))
}
