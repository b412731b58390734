use std::{
    fs::File,
    io::{BufReader, BufWriter, Write},
    path::Path,
};

use crate::{
    csv::line::{join_record, read_record, split_record},
    error::{Error, Result},
    schema::Schema,
    types::LogicalType,
};

/// Load a schema from its text form: one `name,type_name` record per
/// column. Blank lines are ignored; names and type names are trimmed.
pub fn load_schema(path: &Path) -> Result<Schema> {
    let file = File::open(path).map_err(|source| Error::Open {
        path: path.to_owned(),
        source,
    })?;
    let mut input = BufReader::new(file);

    let mut schema = Schema::new();
    let mut line_number = 0;
    while let Some(record) = read_record(&mut input, &mut line_number)? {
        if record.trim().is_empty() {
            continue;
        }
        let fields = split_record(&record)?;
        if fields.len() != 2 {
            return Err(Error::Csv(format!(
                "schema line {line_number}: expected 'name,type', got {} fields",
                fields.len()
            )));
        }
        let name = fields[0].trim();
        let ty = LogicalType::from_name(fields[1].trim())?;
        schema.add_column(name, ty)?;
    }

    if schema.is_empty() {
        return Err(Error::EmptySchema);
    }
    Ok(schema)
}

/// Write the canonical text form. `load_schema` of the result returns an
/// equal schema.
pub fn save_schema(schema: &Schema, path: &Path) -> Result<()> {
    let file = File::create(path).map_err(|source| Error::Open {
        path: path.to_owned(),
        source,
    })?;
    let mut output = BufWriter::new(file);
    for column in schema {
        let record = join_record(&[column.name.as_str(), column.ty.name()]);
        output.write_all(record.as_bytes())?;
        output.write_all(b"\n")?;
    }
    output.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_file(content: &str) -> (tempfile::TempDir, std::path::PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("schema.csv");
        std::fs::write(&path, content).unwrap();
        (dir, path)
    }

    #[test]
    fn loads_columns_in_order() {
        let (_dir, path) = write_file("id,int32\n\nname , string\n");
        let schema = load_schema(&path).unwrap();
        assert_eq!(schema.column_count(), 2);
        assert_eq!(schema.column(0).unwrap().name, "id");
        assert_eq!(schema.column(1).unwrap().ty, LogicalType::String);
    }

    #[test]
    fn empty_file_is_an_empty_schema_error() {
        let (_dir, path) = write_file("");
        assert!(matches!(load_schema(&path), Err(Error::EmptySchema)));
    }

    #[test]
    fn duplicate_column_is_reported_by_name() {
        let (_dir, path) = write_file("id,int32\nid,int64\n");
        assert!(matches!(
            load_schema(&path),
            Err(Error::DuplicateColumn(name)) if name == "id"
        ));
    }

    #[test]
    fn unknown_type_name_is_rejected() {
        let (_dir, path) = write_file("id,uint32\n");
        assert!(matches!(load_schema(&path), Err(Error::UnknownType(_))));
    }

    #[test]
    fn save_then_load_is_identity() {
        let mut schema = Schema::new();
        schema.add_column("id", LogicalType::Int64).unwrap();
        schema.add_column("born", LogicalType::Date).unwrap();
        schema.add_column("weird,name", LogicalType::String).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("schema.csv");
        save_schema(&schema, &path).unwrap();
        assert_eq!(load_schema(&path).unwrap(), schema);
    }
}
