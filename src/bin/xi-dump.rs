//! Demonstration front-end: loads one or more `.DAT` archives and
//! prints their decoded records in a human-readable form.

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};

use xi_archive::record::{Item, ItemPayload};
use xi_archive::{Archive, Record};

/// Dump the decoded contents of one or more archives.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Archive files to decode.
    #[arg(required = true)]
    paths: Vec<PathBuf>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let mut had_error = false;
    for path in &cli.paths {
        if let Err(err) = dump_one(path) {
            error!(path = %path.display(), %err, "failed to load archive");
            had_error = true;
        }
    }

    if had_error {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn dump_one(path: &PathBuf) -> Result<(), std::io::Error> {
    info!(path = %path.display(), "loading archive");
    let mut bytes = fs::read(path)?;
    let archive = Archive::load_from_bytes(&mut bytes);

    println!("== {} ==", path.display());
    for (i, record) in archive.records().iter().enumerate() {
        print_record(i, record);
    }

    Ok(())
}

fn print_record(index: usize, record: &Record) {
    match record {
        Record::NameId(name_id) => {
            println!("[{index}] NameId {{ name: {:?}, id: {:#x} }}", name_id.name_str(), name_id.id);
        }
        Record::Ability(ability) => {
            let name = String::from_utf8_lossy(&ability.name);
            println!(
                "[{index}] Ability {{ index: {}, icon_id: {}, mp_cost: {}, name: {:?} }}",
                ability.index, ability.icon_id, ability.mp_cost, name
            );
        }
        Record::Spell(spell) => {
            let name = String::from_utf8_lossy(&spell.en_name);
            println!(
                "[{index}] Spell {{ index: {}, element: {}, mp_cost: {}, name: {:?} }}",
                spell.index, spell.element, spell.mp_cost, name
            );
        }
        Record::Item(item) => print_item(index, item),
        Record::Unknown => println!("[{index}] Unknown"),
    }
}

fn print_item(index: usize, item: &Item) {
    print!(
        "[{index}] Item {{ id: {:#x}, type: {:?}, flags: {:?}",
        item.id,
        item.item_type(),
        item.flags
    );
    match &item.payload {
        ItemPayload::Weapon(w) => print!(", weapon: {w:?}"),
        ItemPayload::Armor(a) => print!(", armor: {a:?}"),
        ItemPayload::Puppet(p) => print!(", puppet: {p:?}"),
        ItemPayload::General(g) => print!(", general: {g:?}"),
        ItemPayload::Usable(u) => print!(", usable: {u:?}"),
        ItemPayload::None => {}
    }
    print!(" }}");
    for string in &item.strings {
        print!(" \"{}\"", string.to_string_lossy());
    }
    println!();
}
