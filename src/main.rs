use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use std::error::Error;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tempfile::NamedTempFile;
use webgif::{Container, Description};

const NOTES: &str = "\
Where -i controls interlace (specify y or n for yes or no),
-l outputs a table of color indexes, -t sets the specified
color index (0-255 or none) to be the transparent color, and
-d reports the dimensions and other characteristics of the image.
Note: you may wish to pipe to \"more\" when using the -l option.";

#[derive(Parser)]
#[command(
    name = "webgif",
    about = "Inspect and edit GIF metadata in place",
    override_usage = "webgif [-i y|n] [-l] [-t index|none] [-d] <FILE>",
    after_help = NOTES
)]
struct Cli {
    /// Turn interlacing on (y) or off (n)
    #[arg(short = 'i', value_name = "y|n", value_parser = parse_switch)]
    interlace: Option<bool>,
    /// List the color table
    #[arg(short = 'l')]
    list: bool,
    /// Set the transparent color index, or clear it with `none`
    #[arg(short = 't', value_name = "index|none", value_parser = parse_transparent)]
    transparent: Option<Transparent>,
    /// Report dimensions, color count, transparency and interlacing
    #[arg(short = 'd')]
    describe: bool,
    /// GIF file to inspect or edit in place
    file: PathBuf,
}

/// Value of `-t`: an index, or no transparency at all.
#[derive(Clone, Copy, Debug)]
struct Transparent(Option<u8>);

impl Cli {
    fn mutates(&self) -> bool {
        self.interlace.is_some() || self.transparent.is_some()
    }

    fn has_operation(&self) -> bool {
        self.mutates() || self.list || self.describe
    }
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp) => {
            let _ = err.print();
            return ExitCode::SUCCESS;
        }
        Err(err) => {
            let rendered = err.render().to_string();
            eprintln!("{}", rendered.lines().next().unwrap_or_default());
            print_usage();
            return ExitCode::FAILURE;
        }
    };
    if !cli.has_operation() {
        print_usage();
        return ExitCode::FAILURE;
    }
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), Box<dyn Error>> {
    let path = &cli.file;
    let bytes = fs::read(path)
        .map_err(|err| format!("can't open file {}: {err}", path.display()))?;
    let mut gif = webgif::decode(&bytes)
        .map_err(|err| format!("{} is not a valid gif file: {err}", path.display()))?;
    drop(bytes);

    if let Some(on) = cli.interlace {
        gif.set_interlace(on);
    }
    if let Some(Transparent(index)) = cli.transparent {
        gif.set_transparent(index);
    }
    if cli.list {
        print_colors(&gif);
    }
    if cli.describe {
        print_description(&gif.describe());
    }
    if cli.mutates() {
        let encoded = webgif::encode(&gif)?;
        replace_file(path, &encoded)
            .map_err(|err| format!("unable to replace {}: {err}", path.display()))?;
    }
    Ok(())
}

// ── output ───────────────────────────────────────────────────────────────────

fn print_colors(gif: &Container) {
    println!("Index\tRed\tGreen\tBlue");
    for entry in gif.list_colors() {
        println!(
            "{}\t{}\t{}\t{}",
            entry.index, entry.red, entry.green, entry.blue
        );
    }
}

fn print_description(desc: &Description) {
    println!(
        "Width: {} Height: {} Colors: {}",
        desc.width, desc.height, desc.color_count
    );
    match desc.transparent_index {
        Some(index) => println!("Transparent index: {index}"),
        None => println!("Transparent index: none"),
    }
    println!(
        "Interlaced: {}",
        if desc.interlaced { "yes" } else { "no" }
    );
}

// ── helpers ──────────────────────────────────────────────────────────────────

fn print_usage() {
    eprintln!("{}", Cli::command().render_usage());
    eprintln!("{NOTES}");
}

/// Writes `bytes` next to `path` and renames the result over it.
fn replace_file(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    let permissions = fs::metadata(path)?.permissions();
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(bytes)?;
    tmp.as_file().sync_all()?;
    fs::set_permissions(tmp.path(), permissions)?;
    tmp.persist(path).map_err(|err| err.error)?;
    Ok(())
}

fn parse_switch(s: &str) -> Result<bool, String> {
    match s {
        "y" => Ok(true),
        "n" => Ok(false),
        _ => Err("expected y or n".into()),
    }
}

fn parse_transparent(s: &str) -> Result<Transparent, String> {
    match s {
        "none" | "off" => Ok(Transparent(None)),
        _ => s
            .parse::<u8>()
            .map(|index| Transparent(Some(index)))
            .map_err(|_| "expected a color index from 0 to 255, or none".into()),
    }
}
