pub mod codegen;
pub mod config;
pub mod error;
pub mod extract;
pub mod snippet;
pub mod vars;

pub use codegen::generate_iframe;
pub use config::{
    Configuration, FrameBorder, Loading, Permission, PermissionFlags, ReferrerPolicy,
    SandboxFlag, SandboxFlags, Scrolling,
};
pub use error::MarkupError;
pub use snippet::{ParsedSnippet, parse_snippet};
pub use vars::{VariableMap, substitute};
