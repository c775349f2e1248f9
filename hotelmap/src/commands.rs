use crate::CLAP_STYLING;
use clap::arg;
use hotelmap_scanner::site::DEFAULT_SITE;

/// Default output: `id90travel-hotels.json` at the workspace root.
pub const DEFAULT_OUTPUT: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../id90travel-hotels.json");

pub fn command_argument_builder() -> clap::Command {
    clap::Command::new("hotelmap")
        .version(env!("CARGO_PKG_VERSION"))
        .bin_name("hotelmap")
        .about(
            "Collects the hotels listed in a travel site's hotel detail sitemaps and writes \
            them to a JSON file.",
        )
        .styles(CLAP_STYLING)
        .arg(
            arg!(--"site" <URL>)
                .required(false)
                .help("Base URL of the travel site")
                .default_value(DEFAULT_SITE),
        )
        .arg(
            arg!(-o --"output" <PATH>)
                .required(false)
                .help("Where to write the JSON file (replaced on every run)")
                .default_value(DEFAULT_OUTPUT),
        )
        .arg(
            arg!(--"timeout" <SECONDS>)
                .required(false)
                .help("Request timeout in seconds")
                .value_parser(clap::value_parser!(u64).range(1..))
                .default_value("10"),
        )
        .arg(
            arg!(-v --"verbose")
                .required(false)
                .help("Log progress and print a summary when done")
                .action(clap::ArgAction::SetTrue),
        )
}
