/**
 * AlsMath
 * Copyright (C) 2018 Sebastian Schelter
 *
 * This program is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * This program is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with this program. If not, see <http://www.gnu.org/licenses/>.
 */

use std::env;
use std::error::Error;

use getopts::Options;
use tracing::info;

use alsmath::{format, io};

fn main() {

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();
    let program = args[0].clone();

    let mut opts = Options::new();
    opts.optopt("i", "inputfile", "Input file name (required). The input consists of \
        associations between rows and columns. The input file must contain a row id, a column id \
        and optionally a value per line, separated by tabs.", "PATH");
    opts.optopt("r", "removefile", "File with row and column id pairs to remove after reading \
        the input (optional).", "PATH");
    opts.optflag("h", "help", "Print this help menu");

    let matches = match opts.parse(&args[1..]) {
        Ok(matches) => matches,
        Err(failure) => {
            let hint = failure.to_string();
            return print_usage(&program, opts, Some(&hint))
        },
    };

    if matches.opt_present("h") {
        return print_usage(&program, opts, None);
    }

    let associations_path = match matches.opt_str("i") {
        Some(path) => path,
        None => return print_usage(
            &program,
            opts,
            Some("Please specify an inputfile via --inputfile."),
        ),
    };

    if let Err(failure) = render_matrix(&associations_path, matches.opt_str("r")) {
        eprintln!("{}", failure);
        std::process::exit(1);
    }
}

fn print_usage(program: &str, opts: Options, hint: Option<&str>) {

    if let Some(hint) = hint {
        eprintln!("\n{}\n", hint);
    }

    let brief = format!("Usage: {} [options]", program);
    eprint!("{}", opts.usage(&brief));
}

fn render_matrix(
    associations_path: &str,
    removals_path: Option<String>,
) -> Result<(), Box<dyn Error>> {

    info!("Reading associations from {}", associations_path);

    let mut reader = io::csv_reader(associations_path)?;
    let mut matrix = io::read_associations(&mut reader)?;

    if let Some(removals_path) = removals_path {
        info!("Removing associations listed in {}", removals_path);
        let mut removals = io::csv_reader(&removals_path)?;
        let num_removals = io::remove_associations(&mut removals, &mut matrix)?;
        info!("Processed {} removals", num_removals);
    }

    info!(
        "Found {} entries in {} rows and {} columns.",
        matrix.num_entries(),
        matrix.num_rows(),
        matrix.num_columns(),
    );

    print!("{}", format::render(&matrix));

    Ok(())
}
