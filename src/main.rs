use std::error::Error;

use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use prayer::{FileStorage, OffsetUpdate, PrayerConfigStore, UnknownField};

/// view and adjust the offsets horison applies to prayer times
#[derive(Parser, Debug)]
#[command(name = "horison-prayer", version)]
struct Cli {
    /// storage file to use instead of the per-user default
    #[arg(long, global = true)]
    storage: Option<std::path::PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// print every offset
    Show,
    /// print a single offset
    Get { field: String },
    /// change one or more offsets, e.g. `set dzuhur=3 isya=-1`
    Set {
        #[arg(required = true, value_parser = parse_assignment)]
        assignments: Vec<(String, i64)>,
    },
    /// restore the default offsets
    Reset,
    /// print where the offsets are stored
    Path,
}

fn parse_assignment(arg: &str) -> prayer::Result<(String, i64)> {
    let (field, value) = arg
        .split_once('=')
        .ok_or_else(|| prayer::Error::UnknownAssignment(arg.to_owned()))?;
    let field = field.trim();
    let value = value.trim();
    if field.is_empty() {
        return Err(prayer::Error::UnknownAssignment(arg.to_owned()));
    }
    let value = value.parse().map_err(|_| prayer::Error::InvalidValue {
        field: field.to_owned(),
        value: value.to_owned(),
    })?;
    Ok((field.to_owned(), value))
}

fn main() -> Result<(), Box<dyn Error>> {
    // logs go to stderr so `show` output stays clean, override with RUST_LOG
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let storage = match cli.storage {
        Some(path) => FileStorage::new(path),
        None => FileStorage::open_default()?,
    };
    debug!("using storage at {}", storage.path().display());

    let mut store = PrayerConfigStore::initialize(storage);
    match cli.command.unwrap_or(Command::Show) {
        Command::Show => print!("{}", store.offsets()),
        Command::Get { field } => {
            let value = store
                .offsets()
                .get(&field)
                .ok_or_else(|| UnknownField(field.clone()))?;
            println!("{}", value);
        }
        Command::Set { assignments } => {
            let update: OffsetUpdate = assignments.into_iter().collect();
            print!("{}", store.change(update)?);
        }
        Command::Reset => print!("{}", store.reset()?),
        Command::Path => println!("{}", store.storage().path().display()),
    }

    Ok(())
}
