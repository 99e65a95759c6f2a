//! Standard exit codes (BSD sysexits.h compatible)

/// Successful termination
pub const OK: i32 = 0;

/// Command line usage error
pub const USAGE: i32 = 64;

/// Data format error, or a relocation refused under --strict
pub const DATAERR: i32 = 65;

/// Node or input not found
pub const NOINPUT: i32 = 66;

/// Internal software error
pub const SOFTWARE: i32 = 70;

/// Input/output error
pub const IOERR: i32 = 74;

/// Tree is read-only
pub const NOPERM: i32 = 77;

/// Configuration error
pub const CONFIG: i32 = 78;
