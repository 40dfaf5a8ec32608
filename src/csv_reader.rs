use std::fs::File;
use std::io;
use std::path::Path;

use tracing::{debug, info};

use crate::dataset::{Dataset, StudentRecord, COLUMNS};
use crate::error::LoadError;

pub fn read_data(path: &Path) -> Result<Dataset, LoadError> {
    let file = File::open(path).map_err(|source| LoadError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let dataset = read_data_from(file)?;
    info!(rows = dataset.len(), path = %path.display(), "loaded student records");
    Ok(dataset)
}

/// Reads a header row and student records from any CSV source.
pub fn read_data_from<R: io::Read>(reader: R) -> Result<Dataset, LoadError> {
    let mut rdr = csv::Reader::from_reader(reader);

    let headers = rdr.headers().map_err(LoadError::Header)?;
    let missing: Vec<String> = COLUMNS
        .iter()
        .filter(|column| !headers.iter().any(|h| h == **column))
        .map(|column| column.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(LoadError::MissingColumns(missing));
    }
    debug!(headers = ?headers, "header row accepted");

    let mut records = Vec::<StudentRecord>::new();
    for (index, result) in rdr.deserialize().enumerate() {
        // Row numbers are 1-based and do not count the header.
        let record: StudentRecord =
            result.map_err(|source| LoadError::MalformedRow { row: index + 1, source })?;
        records.push(record);
    }
    Ok(Dataset::new(records))
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "gender,testprep,lunchtype,mathscore,readingscore,writingscore,total_score";

    #[test]
    fn reads_rows_in_file_order() {
        let text = format!(
            "{HEADER}\nfemale,none,standard,72,72,74,218\nmale,completed,free/reduced,69,90,88,247\n"
        );
        let data = read_data_from(text.as_bytes()).unwrap();
        assert_eq!(data.len(), 2);
        let first = data.iter().next().unwrap();
        assert_eq!(first.gender, "female");
        assert_eq!(first.total_score, 218.0);
    }

    #[test]
    fn column_order_does_not_matter() {
        let text = "total_score,gender,lunchtype,testprep,writingscore,readingscore,mathscore\n\
                    150,male,standard,none,50,50,50\n";
        let data = read_data_from(text.as_bytes()).unwrap();
        let r = data.iter().next().unwrap();
        assert_eq!(r.lunch_type, "standard");
        assert_eq!(r.test_preparation, "none");
        assert_eq!(r.total_score, 150.0);
    }

    #[test]
    fn extra_columns_are_ignored() {
        let text = format!("{HEADER},result\nmale,none,standard,50,50,50,150,Pass\n");
        let data = read_data_from(text.as_bytes()).unwrap();
        assert_eq!(data.len(), 1);
    }

    #[test]
    fn missing_columns_are_all_reported() {
        let text = "gender,testprep,mathscore,readingscore,writingscore\nmale,none,1,2,3\n";
        match read_data_from(text.as_bytes()) {
            Err(LoadError::MissingColumns(cols)) => {
                assert_eq!(cols, vec!["lunchtype".to_string(), "total_score".to_string()]);
            }
            other => panic!("expected MissingColumns, got {:?}", other),
        }
    }

    #[test]
    fn header_names_are_case_sensitive() {
        let text = HEADER.replace("gender", "Gender");
        assert!(matches!(
            read_data_from(text.as_bytes()),
            Err(LoadError::MissingColumns(cols)) if cols == vec!["gender".to_string()]
        ));
    }

    #[test]
    fn non_numeric_score_is_malformed() {
        let text = format!("{HEADER}\nmale,none,standard,50,50,50,150\nmale,none,standard,abc,50,50,150\n");
        assert!(matches!(
            read_data_from(text.as_bytes()),
            Err(LoadError::MalformedRow { row: 2, .. })
        ));
    }

    #[test]
    fn header_only_file_is_empty_dataset() {
        let data = read_data_from(HEADER.as_bytes()).unwrap();
        assert!(data.is_empty());
    }
}
