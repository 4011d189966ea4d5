//! User interface module.
//!
//! git-release never prompts; this module only reports. The formatting
//! lives in `formatter` and is re-exported here.

pub mod formatter;

pub use formatter::{
    display_command, display_error, display_event, display_status, display_success,
    display_summary,
};
