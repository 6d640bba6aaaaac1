//! Git access: staged change collection via the `git` binary.

pub mod change_set;
pub mod provider;
pub mod subprocess;

pub use change_set::{ChangeSet, parse_name_only};
pub use provider::{ChangeSetProvider, GitCliProvider, ProviderConfig};
pub use subprocess::{check_git_installed, run_git};
