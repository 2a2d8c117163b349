pub mod clipboard;
pub mod error;
pub mod frame;
pub mod output;
pub mod preview;
pub mod session;

use colored::Colorize;

pub use error::SessionError;
pub use frame::{FrameEvent, FrameLoader, FrameReport, LOADING_DELAY};
pub use preview::{OutputKind, Preview, PreviewMode};
pub use session::{Session, is_valid_url, validate_url};

pub fn print_banner() {
    let banner = r#"
    ╔════════════════════════════════════════════╗
    ║   F R A M E S M I T H                      ║
    ║   iframe embed configurator & previewer    ║
    ╚════════════════════════════════════════════╝
"#;
    println!("{}", banner.bright_cyan());
    println!(
        "    {} {}\n",
        "framesmith".bright_white().bold(),
        env!("CARGO_PKG_VERSION").dimmed()
    );
}
