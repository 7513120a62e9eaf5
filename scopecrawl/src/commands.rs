use crate::CLAP_STYLING;
use clap::{arg, command};
use scopecrawl::OutputFormat;
use scopecrawl_scanner::WaitUntil;
use url::Url;

pub(crate) fn command_argument_builder() -> clap::Command {
    clap::Command::new("scopecrawl")
        .version(env!("CARGO_PKG_VERSION"))
        .bin_name("scopecrawl")
        .styles(CLAP_STYLING)
        .arg(arg!(-q --"quiet" "Suppress banner and progress output").global(true))
        .arg(
            arg!(-v --"verbose" "Log scope decisions and engine activity to stderr")
                .global(true)
                .action(clap::ArgAction::Count),
        )
        .subcommand_required(true)
        .subcommand(
            command!("crawl")
                .about(
                    "Crawl outward from one or more seeds and report every in-scope page and \
                asset that was linked.",
                )
                .arg(
                    arg!(-u --"url" <URL>)
                        .required(false)
                        .help("A seed URL to start from (repeatable)")
                        .value_parser(clap::value_parser!(Url))
                        .action(clap::ArgAction::Append),
                )
                .arg(
                    arg!(-H --"seeds-file" <PATH>)
                        .required(false)
                        .help("Path to a newline-delimited file of seed URLs")
                        .value_parser(clap::value_parser!(std::path::PathBuf)),
                )
                .arg(
                    arg!(--"any-domain")
                        .required(false)
                        .help("Do not restrict the crawl to the seed hostnames")
                        .action(clap::ArgAction::SetTrue),
                )
                .arg(
                    arg!(-c --"max-concurrency" <NUM_WORKERS>)
                        .required(false)
                        .help("The number of pages fetched at the same time")
                        .value_parser(clap::value_parser!(usize))
                        .env("SCOPECRAWL_MAX_CONCURRENCY")
                        .default_value("10"),
                )
                .arg(
                    arg!(-m --"max-requests" <NUM>)
                        .required(false)
                        .help("Stop dispatching pages after this many requests")
                        .value_parser(clap::value_parser!(usize))
                        .env("SCOPECRAWL_MAX_REQUESTS")
                        .default_value("500"),
                )
                .arg(
                    arg!(--"navigation-timeout" <SECONDS>)
                        .required(false)
                        .help("Per-page navigation timeout in seconds")
                        .value_parser(clap::value_parser!(u64))
                        .env("SCOPECRAWL_NAVIGATION_TIMEOUT")
                        .default_value("30"),
                )
                .arg(
                    arg!(--"handler-timeout" <SECONDS>)
                        .required(false)
                        .help("Per-page handler timeout in seconds")
                        .value_parser(clap::value_parser!(u64))
                        .env("SCOPECRAWL_HANDLER_TIMEOUT")
                        .default_value("60"),
                )
                .arg(
                    arg!(--"wait-until" <CONDITION>)
                        .required(false)
                        .help("Page-load condition: load, domcontentloaded, networkidle")
                        .value_parser(clap::value_parser!(WaitUntil))
                        .env("SCOPECRAWL_WAIT_UNTIL")
                        .default_value("load"),
                )
                .arg(
                    arg!(--"headful")
                        .required(false)
                        .help("Ask the engine for a visible browser instead of headless mode")
                        .action(clap::ArgAction::SetTrue),
                )
                .arg(
                    arg!(-o --"output" <PATH>)
                        .required(false)
                        .help("Save results to file (default: stdout)")
                        .env("SCOPECRAWL_OUTPUT"),
                )
                .arg(
                    arg!(-f --"format" <FORMAT>)
                        .required(false)
                        .help("Output format: text, json")
                        .value_parser(clap::value_parser!(OutputFormat))
                        .default_value("text"),
                ),
        )
}
