use anyhow::Result;
use clap::{App, Arg};
use enkel::build::build_site;
use enkel::config::Config;
use std::path::{Path, PathBuf};

fn main() -> Result<()> {
    let matches = App::new("enkel")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Minimal static site generator: markdown in, pages, index, and RSS out")
        .arg(
            Arg::with_name("source")
                .index(1)
                .help("Project directory containing enkel.yaml (defaults to the current directory)"),
        )
        .arg(
            Arg::with_name("output")
                .short("o")
                .long("output")
                .takes_value(true)
                .value_name("DIR")
                .help("Output directory (defaults to {project_root}/output)"),
        )
        .get_matches();

    let source = Path::new(matches.value_of("source").unwrap_or("."));
    let output = matches.value_of("output").map(PathBuf::from);

    let config = Config::from_directory(source, output)?;
    build_site(&config)?;
    Ok(())
}
