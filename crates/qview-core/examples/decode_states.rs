use std::error::Error;
use std::fs::File;
use std::io::{self, BufRead, BufReader};

use qview_core::TaxiState;

fn main() -> Result<(), Box<dyn Error>> {
    let path = std::env::args().nth(1);
    let reader: Box<dyn BufRead> = match path {
        Some(p) => Box::new(BufReader::new(File::open(p)?)),
        None => Box::new(BufReader::new(io::stdin())),
    };

    for line in reader.lines() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let index: usize = trimmed.parse()?;
        let state = TaxiState::from_index(index)?;
        println!(
            "{index}\t{}\t{}\t{}\t{}",
            state.row, state.col, state.passenger, state.dest
        );
    }

    Ok(())
}
