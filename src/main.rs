use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use ab_glyph::{FontVec, InvalidFont};
use clap::Parser;
use crossword_csp::{
    find_fill_with_options, render_grid, render_image, FillOptions, GridConfig, GridError,
    Propagation, WordList,
};
use image::ImageError;
use log::{error, info, LevelFilter};
use thiserror::Error;

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// The structure file: one grid row per line, `_` for an open cell and anything else for a
    /// block.
    structure: PathBuf,

    /// The word list, one word per line.
    words: PathBuf,

    /// Also write the filled grid to this file: an image if it ends in `.png`, text otherwise.
    output: Option<PathBuf>,

    /// The font used for the letters of a `.png` output.
    #[arg(long, default_value = "assets/fonts/OpenSans-Regular.ttf")]
    font: PathBuf,

    /// Re-run arc consistency after every tentative choice instead of only before the search.
    #[arg(long)]
    maintain_arc_consistency: bool,

    /// Print the search statistics after a successful fill.
    #[arg(long)]
    statistics: bool,

    /// Log what the filler is doing.
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Error, Debug)]
enum CliError {
    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to save image {}: {source}", path.display())]
    Image { path: PathBuf, source: ImageError },
    #[error("Failed to load font {}: {source}", path.display())]
    Font { path: PathBuf, source: InvalidFont },
    #[error("Invalid structure: {0}")]
    Structure(#[from] GridError),
}

fn configure_logging(verbose: bool) {
    let level_filter = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };

    env_logger::Builder::new()
        .format(|buf, record| writeln!(buf, "[{}] {}", record.level(), record.args()))
        .filter_level(level_filter)
        .target(env_logger::Target::Stderr)
        .init();
}

fn read(path: &Path) -> Result<String, CliError> {
    fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })
}

fn load_font(path: &Path) -> Result<FontVec, CliError> {
    let data = fs::read(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    FontVec::try_from_vec(data).map_err(|source| CliError::Font {
        path: path.to_path_buf(),
        source,
    })
}

fn is_png(path: &Path) -> bool {
    path.extension()
        .is_some_and(|extension| extension.eq_ignore_ascii_case("png"))
}

fn run() -> Result<(), CliError> {
    let args = Args::parse();
    configure_logging(args.verbose);

    let config = GridConfig::from_structure(&read(&args.structure)?)?;
    let words = WordList::from_text(&read(&args.words)?);

    let options = FillOptions {
        propagation: if args.maintain_arc_consistency {
            Propagation::Maintain
        } else {
            Propagation::Preprocess
        },
    };

    let result = match find_fill_with_options(&config, &words, &options) {
        Ok(result) => result,
        Err(failure) => {
            info!("{}", failure);
            println!("No solution.");
            return Ok(());
        }
    };

    let display_grid = render_grid(&config, &words, &result.assignment);
    if args.statistics {
        println!("{:?}", result.statistics);
    }
    println!("{}", display_grid);

    if let Some(output) = args.output {
        if is_png(&output) {
            let font = load_font(&args.font)?;
            render_image(&config, &words, &result.assignment, Some(&font))
                .save(&output)
                .map_err(|source| CliError::Image {
                    path: output.clone(),
                    source,
                })?;
        } else {
            fs::write(&output, format!("{}\n", display_grid)).map_err(|source| {
                CliError::Write {
                    path: output.clone(),
                    source,
                }
            })?;
        }
        info!("Written fill to {}", output.display());
    }

    Ok(())
}

fn main() {
    if let Err(e) = run() {
        error!("Execution failed, error: {e}");
        std::process::exit(1);
    }
}
