//! Exit code constants for the tasktmpl CLI.
//!
//! - 0: Success
//! - 1: User error (bad args, unreadable or invalid input files)
//! - 2: Template failure (parse or execution error treated as fatal)

/// Successful execution.
pub const SUCCESS: i32 = 0;

/// User error: bad arguments or invalid input files.
pub const USER_ERROR: i32 = 1;

/// Template failure: a template did not parse or could not be rendered.
pub const TEMPLATE_FAILURE: i32 = 2;
