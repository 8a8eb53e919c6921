use anyhow::Result;
use clap::{Arg, ArgMatches, Command};
use morphyish_core::build_site;
use morphyish_preview::{PreviewConfig, PreviewServer};

use crate::cmd::build::add_build_args;
use crate::config::CliConfig;

pub fn make_subcommand() -> Command {
    add_build_args(Command::new("serve"))
        .about("Build the site and preview it locally")
        .arg(
            Arg::new("port")
                .short('p')
                .long("port")
                .value_name("PORT")
                .value_parser(clap::value_parser!(u16))
                .help("Port to serve on [default: 3000]"),
        )
        .arg(
            Arg::new("host")
                .long("host")
                .value_name("HOST")
                .help("Host to bind to [default: 127.0.0.1]"),
        )
        .arg(
            Arg::new("open")
                .long("open")
                .help("Open browser automatically")
                .action(clap::ArgAction::SetTrue),
        )
}

pub async fn execute(args: &ArgMatches) -> Result<()> {
    let config = CliConfig::load(args)?;
    let site_config = config.site_config()?;
    let build_config = &config.build;
    let paths = build_config.paths();

    build_site(&site_config, &paths)?;

    let server = PreviewServer::new(PreviewConfig {
        host: build_config.host.clone(),
        port: build_config.port,
        root: paths.output_dir,
        open: build_config.open,
        start_page: format!("{}/", site_config.gallery.path.trim_matches('/')),
    });

    server.run().await
}
