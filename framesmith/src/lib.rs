// Include handlers module directly from handlers.rs
#[path = "handlers.rs"]
pub mod handlers;

pub use handlers::{
    FrameOptions, configuration_from_options, parse_into_session, parse_variable_assignment,
    parse_variable_assignments, read_input, substitute_text,
};

pub use framesmith_core::output::OutputFormat;
