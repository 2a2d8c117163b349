use crate::CLAP_STYLING;
use clap::{arg, command};
use framesmith_markup::{FrameBorder, Loading, ReferrerPolicy, Scrolling};

fn var_arg() -> clap::Arg {
    arg!(--"var" <ASSIGNMENT>)
        .required(false)
        .help("Fill a template variable, e.g. --var apiKey=abc123 (repeatable)")
        .action(clap::ArgAction::Append)
}

fn file_arg() -> clap::Arg {
    arg!(-F --"file" <PATH>)
        .required(false)
        .help("Read the input from a file instead of the command line")
}

fn format_arg() -> clap::Arg {
    arg!(-f --"format" <FORMAT>)
        .required(false)
        .help("Report format: text, json")
        .value_parser(["text", "json"])
        .default_value("text")
}

fn output_arg() -> clap::Arg {
    arg!(-o --"output" <PATH>)
        .required(false)
        .help("Save the report to a file (default: display to screen)")
}

pub(crate) fn command_argument_builder() -> clap::Command {
    clap::Command::new("framesmith")
        .version(env!("CARGO_PKG_VERSION"))
        .bin_name("framesmith")
        .styles(CLAP_STYLING)
        .arg(arg!(-q --"quiet" "Suppress banner and non-essential output").required(false))
        .arg(arg!(-v --"verbose" "Show debug logging on stderr").required(false))
        .subcommand_required(false)
        .subcommand(
            command!("generate")
                .about("Generate iframe markup from individual settings")
                .arg(
                    arg!(-u --"url" <URL>)
                        .required(true)
                        .help("The URL to embed. May contain ${name} placeholders"),
                )
                .arg(
                    arg!(-W --"width" <PX>)
                        .required(false)
                        .help("Frame width in pixels (clamped to 100-2000)")
                        .value_parser(clap::value_parser!(i64))
                        .default_value("800"),
                )
                .arg(
                    arg!(-H --"height" <PX>)
                        .required(false)
                        .help("Frame height in pixels (clamped to 100-2000)")
                        .value_parser(clap::value_parser!(i64))
                        .default_value("600"),
                )
                .arg(
                    arg!(--"border" <BORDER>)
                        .required(false)
                        .help("Frame border: 0 hidden, 1 visible")
                        .value_parser(FrameBorder::VALUES)
                        .default_value("0"),
                )
                .arg(
                    arg!(--"scrolling" <MODE>)
                        .required(false)
                        .help("Scrolling behaviour")
                        .value_parser(Scrolling::VALUES)
                        .default_value("auto"),
                )
                .arg(
                    arg!(--"fullscreen")
                        .required(false)
                        .help("Allow the framed page to go fullscreen")
                        .action(clap::ArgAction::SetTrue),
                )
                .arg(
                    arg!(--"loading" <MODE>)
                        .required(false)
                        .help("Loading mode")
                        .value_parser(Loading::VALUES)
                        .default_value("eager"),
                )
                .arg(
                    arg!(--"referrer-policy" <POLICY>)
                        .required(false)
                        .help("Referrer policy")
                        .value_parser(ReferrerPolicy::VALUES)
                        .default_value("no-referrer-when-downgrade"),
                )
                .arg(
                    arg!(--"sandbox" <FLAG>)
                        .required(false)
                        .help("Sandbox permission: scripts, forms, popups, same-origin, top-navigation (repeatable)")
                        .action(clap::ArgAction::Append),
                )
                .arg(
                    arg!(--"allow" <FEATURE>)
                        .required(false)
                        .help("Feature permission: camera, microphone, geolocation, payment (repeatable)")
                        .action(clap::ArgAction::Append),
                )
                .arg(format_arg())
                .arg(output_arg()),
        )
        .subcommand(
            command!("parse")
                .about(
                    "Parse an HTML or JSX snippet containing an iframe and report its \
                configuration, variables and generated code.",
                )
                .arg(
                    arg!([SNIPPET])
                        .required(false)
                        .help("The snippet to parse (default: read from --file or stdin)")
                        .conflicts_with("file"),
                )
                .arg(file_arg())
                .arg(var_arg())
                .arg(format_arg())
                .arg(output_arg()),
        )
        .subcommand(
            command!("substitute")
                .about("Replace ${name} placeholders in text with --var values")
                .arg(
                    arg!([TEXT])
                        .required(false)
                        .help("The text to substitute (default: read from --file or stdin)")
                        .conflicts_with("file"),
                )
                .arg(file_arg())
                .arg(var_arg()),
        )
        .subcommand(
            command!("check")
                .about(
                    "Run the load action against a URL: validate it, load it and report \
                whether it can be framed.",
                )
                .arg(
                    arg!(-u --"url" <URL>)
                        .required(true)
                        .help("The URL to load. May contain ${name} placeholders"),
                )
                .arg(var_arg())
                .arg(
                    arg!(--"timeout" <SECONDS>)
                        .required(false)
                        .help("Request timeout in seconds")
                        .value_parser(clap::value_parser!(u64))
                        .default_value("10"),
                )
                .arg(format_arg()),
        )
        .subcommand(command!("ui").about("Launch the interactive terminal configurator"))
}
