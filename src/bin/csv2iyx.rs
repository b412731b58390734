use std::path::PathBuf;

use anyhow::Error;
use clap::Parser;
use iyx::{load_schema, CsvReader, FormatWriter, RowGroup};
use log::info;

/// Convert a CSV table into the columnar .iyx format.
#[derive(Parser, Debug)]
#[command(version)]
struct Cli {
    /// Verbose mode (-v, -vv, -vvv, etc)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    verbose: u8,
    /// Schema file describing the input, one `name,type` line per column.
    schema: PathBuf,
    /// The CSV file holding the rows to convert.
    data: PathBuf,
    /// Name of the output .iyx file.
    output: PathBuf,
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

    let schema = load_schema(&opt.schema)?;
    info!("schema: {} columns", schema.column_count());

    let mut reader = CsvReader::new(&opt.data, schema.clone())?;
    let mut writer = FormatWriter::create(&opt.output)?;
    writer.begin(&schema)?;

    let mut num_batch = 0;
    while let Some(batch) = reader.read_batch()? {
        let mut row_group = RowGroup::new(batch);
        writer.write_row_group(&mut row_group)?;
        num_batch += 1;
        info!("batch {num_batch}: {} rows", row_group.meta().row_count);
    }
    writer.end()?;

    info!(
        "done: {} rows in {} row groups",
        writer.total_rows_written(),
        writer.row_group_count()
    );
    Ok(())
}
