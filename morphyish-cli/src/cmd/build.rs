use anyhow::Result;
use clap::{Arg, ArgMatches, Command};
use morphyish_core::build_site;

use crate::config::CliConfig;

/// Path arguments shared by `build` and `serve`. Defaults live in `BuildConfig`
/// so the config file and environment can still fill them in.
pub fn add_build_args(command: Command) -> Command {
    command
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Configuration file [default: ./morphyish.toml]"),
        )
        .arg(
            Arg::new("assets")
                .short('a')
                .long("assets")
                .value_name("DIR")
                .help("Directory containing the gallery SVG files [default: ./src/svg]"),
        )
        .arg(
            Arg::new("static")
                .short('s')
                .long("static")
                .value_name("DIR")
                .help("Static files copied to the output [default: ./static]"),
        )
        .arg(
            Arg::new("theme")
                .short('t')
                .long("theme")
                .value_name("DIR")
                .help("Theme directory overriding the built-in templates [default: ./theme]"),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_name("DIR")
                .help("Output directory for generated site [default: ./build]"),
        )
}

pub fn make_subcommand() -> Command {
    add_build_args(Command::new("build")).about("Build the static site")
}

pub fn execute(args: &ArgMatches) -> Result<()> {
    let config = CliConfig::load(args)?;
    let site_config = config.site_config()?;
    let paths = config.build.paths();

    let site = build_site(&site_config, &paths)?;

    tracing::info!("Site built successfully in {}", site.output_dir().display());

    Ok(())
}
