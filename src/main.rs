// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;

use expensebook::{cli, commands, config::Settings, logging};

fn main() -> Result<()> {
    let cli = cli::build_cli();
    let matches = cli.get_matches();

    logging::init_tracing(matches.get_flag("verbose"));
    let settings = Settings::from_matches(&matches)?;

    match matches.subcommand() {
        Some(("init", _)) => {
            settings.init_store()?;
            println!("Ledger initialized at {}", settings.data_file.display());
        }
        Some((name @ ("add" | "list" | "show" | "rm" | "edit"), sub)) => {
            let store = settings.open_store()?;
            commands::expenses::handle(store.as_ref(), name, sub)?
        }
        Some(("report", sub)) => commands::reports::handle(settings.open_store()?.as_ref(), sub)?,
        Some(("import", sub)) => commands::importer::handle(settings.open_store()?.as_ref(), sub)?,
        Some(("export", sub)) => commands::exporter::handle(settings.open_store()?.as_ref(), sub)?,
        Some(("doctor", _)) => commands::doctor::handle(settings.open_store()?.as_ref())?,
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}
