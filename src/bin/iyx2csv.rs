use std::path::PathBuf;

use anyhow::Error;
use clap::Parser;
use iyx::{save_schema, CsvWriter, FormatReader};
use log::info;

/// Extract the rows and the schema of a .iyx file back into CSV.
#[derive(Parser, Debug)]
#[command(version)]
struct Cli {
    /// Verbose mode (-v, -vv, -vvv, etc)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    verbose: u8,
    /// The .iyx file to read.
    input: PathBuf,
    /// Name of the CSV file to write the rows to.
    data: PathBuf,
    /// Name of the file to write the extracted schema to.
    schema: PathBuf,
}

fn main() -> Result<(), Error> {
    let opt = Cli::parse();

    // Initialize logging
    stderrlog::new()
        .module(module_path!())
        .module("iyx")
        .quiet(false)
        .verbosity(opt.verbose as usize)
        .timestamp(stderrlog::Timestamp::Second)
        .init()
        .unwrap();

    let mut reader = FormatReader::new(&opt.input)?;
    reader.open()?;
    info!(
        "schema: {} columns, {} rows in {} row groups",
        reader.schema().column_count(),
        reader.total_row_count(),
        reader.row_group_count()
    );

    save_schema(reader.schema(), &opt.schema)?;

    let mut writer = CsvWriter::create(&opt.data)?;
    let mut num_batch = 0;
    while let Some(batch) = reader.read_batch()? {
        num_batch += 1;
        info!("batch {num_batch}: {} rows", batch.row_count());
        writer.write_batch(&batch)?;
    }
    writer.flush()?;

    info!("done: {} rows written", writer.rows_written());
    Ok(())
}
