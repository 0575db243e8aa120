use crate::core::{ConfigProvider, Pipeline, Record, Storage, TransformResult};
use crate::domain::cell::ColumnKind;
use crate::domain::columns::{self, PASSWORD_FIELD, TOPICS_FIELD, TRAINER_ID_FIELD};
use crate::utils::error::{EtlError, Result};
use serde_json::{Map, Value};
use std::collections::HashSet;

/// Converts a trainer CSV export into the JSON array the addTrainer API takes.
pub struct TrainerPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
}

impl<S: Storage, C: ConfigProvider> TrainerPipeline<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        Self { storage, config }
    }
}

impl<S: Storage, C: ConfigProvider> Pipeline for TrainerPipeline<S, C> {
    fn extract(&self) -> Result<Vec<Record>> {
        let input_path = self.config.input_path();
        tracing::debug!("Reading trainer export from: {}", input_path);

        let bytes = self.storage.read_file(input_path).map_err(|e| match e {
            EtlError::IoError(io) if io.kind() == std::io::ErrorKind::NotFound => {
                EtlError::InputNotFound {
                    path: input_path.to_string(),
                }
            }
            EtlError::IoError(io) => EtlError::InputUnreadable {
                path: input_path.to_string(),
                source: io,
            },
            other => other,
        })?;

        read_trainer_table(&bytes)
    }

    fn transform(&self, data: Vec<Record>) -> Result<TransformResult> {
        let passthrough_columns: Vec<String> = data
            .first()
            .map(|record| {
                record
                    .fields()
                    .filter(|field| columns::is_passthrough(field))
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default();

        let records = data
            .into_iter()
            .map(to_trainer_payload)
            .collect::<Result<Vec<_>>>()?;

        Ok(TransformResult {
            records,
            passthrough_columns,
        })
    }

    fn load(&self, result: TransformResult) -> Result<String> {
        let output_path = self.config.output_path();

        // Serialize fully before touching the output file.
        let json = serde_json::to_vec_pretty(&result.records)?;

        tracing::debug!("Writing {} bytes to {}", json.len(), output_path);
        self.storage.write_file(output_path, &json)?;

        Ok(output_path.to_string())
    }
}

/// Parses the export into records keyed by the original header names.
///
/// The header is checked before any row is read. Rows shorter than the header
/// get `null` for the missing cells; longer rows are rejected.
pub fn read_trainer_table(bytes: &[u8]) -> Result<Vec<Record>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(bytes);

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .enumerate()
        .map(|(i, header)| {
            if i == 0 {
                header.trim_start_matches('\u{feff}').to_string()
            } else {
                header.to_string()
            }
        })
        .collect();

    check_header(&headers)?;

    let mut rows = Vec::new();
    for result in reader.records() {
        let row = result?;
        if row.len() > headers.len() {
            return Err(EtlError::MalformedRowError {
                line: row.position().map_or(0, |pos| pos.line()),
                expected: headers.len(),
                found: row.len(),
            });
        }
        rows.push(row);
    }

    let kinds: Vec<ColumnKind> = (0..headers.len())
        .map(|i| ColumnKind::infer(rows.iter().map(|row| row.get(i).unwrap_or(""))))
        .collect();

    tracing::debug!(
        "Column kinds: {}",
        headers
            .iter()
            .zip(&kinds)
            .map(|(header, kind)| format!("{}={:?}", header, kind))
            .collect::<Vec<_>>()
            .join(", ")
    );

    let records = rows
        .iter()
        .map(|row| {
            let mut data = Map::new();
            for (i, (header, kind)) in headers.iter().zip(&kinds).enumerate() {
                data.insert(header.clone(), kind.to_value(row.get(i).unwrap_or("")));
            }
            Record::from(data)
        })
        .collect();

    Ok(records)
}

fn check_header(headers: &[String]) -> Result<()> {
    let mut seen = HashSet::new();
    for header in headers {
        if !seen.insert(header.as_str()) {
            return Err(EtlError::DuplicateColumnError {
                column: header.clone(),
            });
        }
    }

    let missing = columns::missing_required(headers);
    if !missing.is_empty() {
        return Err(EtlError::MissingColumnsError {
            columns: missing.into_iter().map(String::from).collect(),
        });
    }

    // e.g. both `Id` and `trainer_id` present
    let mut renamed = HashSet::new();
    for header in headers {
        let target = columns::rename(header);
        if !renamed.insert(target) {
            return Err(EtlError::DuplicateColumnError {
                column: target.to_string(),
            });
        }
    }

    Ok(())
}

/// Renames the mapped columns and appends `password` and `topics`.
pub fn to_trainer_payload(record: Record) -> Result<Record> {
    let mut payload = Record::new();
    for (column, value) in record.data {
        payload.insert(columns::rename(&column), value);
    }

    let trainer_id = payload
        .get(TRAINER_ID_FIELD)
        .cloned()
        .ok_or_else(|| EtlError::MissingColumnsError {
            columns: vec!["Id".to_string()],
        })?;

    payload.insert(PASSWORD_FIELD, trainer_id);
    payload.insert(TOPICS_FIELD, Value::Array(Vec::new()));

    Ok(payload)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RunConfig;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct MockStorage {
        files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    }

    impl MockStorage {
        fn with_file(path: &str, content: &str) -> Self {
            let storage = Self::default();
            storage
                .files
                .lock()
                .unwrap()
                .insert(path.to_string(), content.as_bytes().to_vec());
            storage
        }

        fn get_file(&self, path: &str) -> Option<String> {
            let files = self.files.lock().unwrap();
            files
                .get(path)
                .map(|bytes| String::from_utf8(bytes.clone()).unwrap())
        }
    }

    impl Storage for MockStorage {
        fn read_file(&self, path: &str) -> Result<Vec<u8>> {
            let files = self.files.lock().unwrap();
            files.get(path).cloned().ok_or_else(|| {
                EtlError::IoError(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("File not found: {}", path),
                ))
            })
        }

        fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
            let mut files = self.files.lock().unwrap();
            files.insert(path.to_string(), data.to_vec());
            Ok(())
        }
    }

    fn run(csv: &str) -> (MockStorage, Result<String>) {
        let storage = MockStorage::with_file("in.csv", csv);
        let pipeline = TrainerPipeline::new(storage.clone(), RunConfig::new("in.csv", "out.json"));
        let result = pipeline
            .extract()
            .and_then(|records| pipeline.transform(records))
            .and_then(|result| pipeline.load(result));
        (storage, result)
    }

    #[test]
    fn test_single_trainer_payload_text() {
        let (storage, result) = run("Id,Full name,Domain,Specialization,email\n5,Ann Lee,AI,NLP,ann@x.com\n");

        assert_eq!(result.unwrap(), "out.json");
        let expected = r#"[
  {
    "trainer_id": 5,
    "name": "Ann Lee",
    "domain": "AI",
    "specialisation": "NLP",
    "email": "ann@x.com",
    "password": 5,
    "topics": []
  }
]"#;
        assert_eq!(storage.get_file("out.json").unwrap(), expected);
    }

    #[test]
    fn test_extract_keeps_original_headers_and_row_order() {
        let storage = MockStorage::with_file(
            "in.csv",
            "Id,Full name,Domain,Specialization,email\n3,C,AI,CV,c@x\n1,A,AI,NLP,a@x\n2,B,Web,React,b@x\n",
        );
        let pipeline = TrainerPipeline::new(storage, RunConfig::new("in.csv", "out.json"));

        let records = pipeline.extract().unwrap();
        let ids: Vec<&Value> = records.iter().map(|r| r.get("Id").unwrap()).collect();
        assert_eq!(ids, vec![&json!(3), &json!(1), &json!(2)]);
        assert_eq!(
            records[0].fields().collect::<Vec<_>>(),
            vec!["Id", "Full name", "Domain", "Specialization", "email"]
        );
    }

    #[test]
    fn test_passthrough_column_keeps_name_and_position() {
        let (storage, result) = run("Full name,Phone,Id,Domain,Specialization,email\nAnn,555-0100,5,AI,NLP,ann@x.com\n");
        result.unwrap();

        let output: Vec<Record> = serde_json::from_str(&storage.get_file("out.json").unwrap()).unwrap();
        assert_eq!(
            output[0].fields().collect::<Vec<_>>(),
            vec![
                "name",
                "Phone",
                "trainer_id",
                "domain",
                "specialisation",
                "email",
                "password",
                "topics"
            ]
        );
        assert_eq!(output[0].get("Phone"), Some(&json!("555-0100")));
    }

    #[test]
    fn test_transform_reports_passthrough_columns() {
        let storage = MockStorage::with_file(
            "in.csv",
            "Id,Full name,Phone,Domain,Specialization,email,City\n5,Ann,555,AI,NLP,a@x,Pune\n",
        );
        let pipeline = TrainerPipeline::new(storage, RunConfig::new("in.csv", "out.json"));

        let result = pipeline.transform(pipeline.extract().unwrap()).unwrap();
        assert_eq!(result.passthrough_columns, vec!["Phone", "City"]);

        let result = pipeline.transform(Vec::new()).unwrap();
        assert!(result.passthrough_columns.is_empty());
    }

    #[test]
    fn test_directory_as_input_is_input_error() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        std::fs::create_dir(temp_dir.path().join("trainers_export.csv")).unwrap();
        let storage =
            crate::config::cli::LocalStorage::new(temp_dir.path().to_str().unwrap().to_string());
        let pipeline = TrainerPipeline::new(storage, RunConfig::default());

        let err = pipeline.extract().unwrap_err();
        assert!(matches!(err, EtlError::InputUnreadable { ref path, .. } if path == "trainers_export.csv"));
        assert_eq!(err.category(), crate::utils::error::ErrorCategory::Input);
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn test_textual_ids_stay_strings() {
        let (storage, result) =
            run("Id,Full name,Domain,Specialization,email\n007,Bond,Ops,Field,jb@x\nT-12,Q,Ops,Labs,q@x\n");
        result.unwrap();

        let output: Vec<Record> = serde_json::from_str(&storage.get_file("out.json").unwrap()).unwrap();
        assert_eq!(output[0].get("trainer_id"), Some(&json!("007")));
        assert_eq!(output[0].get("password"), Some(&json!("007")));
        assert_eq!(output[1].get("password"), Some(&json!("T-12")));
    }

    #[test]
    fn test_missing_column_fails_before_writing() {
        let (storage, result) = run("Id,Full name,Specialization,email\n5,Ann Lee,NLP,ann@x.com\n");

        match result.unwrap_err() {
            EtlError::MissingColumnsError { columns } => assert_eq!(columns, vec!["Domain"]),
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(storage.get_file("out.json").is_none());
    }

    #[test]
    fn test_missing_input_is_reported_by_path() {
        let pipeline = TrainerPipeline::new(MockStorage::default(), RunConfig::default());

        match pipeline.extract().unwrap_err() {
            EtlError::InputNotFound { path } => assert_eq!(path, "trainers_export.csv"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_short_rows_are_padded_and_long_rows_rejected() {
        let records =
            read_trainer_table(b"Id,Full name,Domain,Specialization,email\n5,Ann,AI\n").unwrap();
        assert_eq!(records[0].get("Specialization"), Some(&Value::Null));
        assert_eq!(records[0].get("email"), Some(&Value::Null));

        let err =
            read_trainer_table(b"Id,Full name,Domain,Specialization,email\n5,Ann,AI,NLP,a@x,extra\n")
                .unwrap_err();
        assert!(matches!(
            err,
            EtlError::MalformedRowError {
                line: 2,
                expected: 5,
                found: 6
            }
        ));
    }

    #[test]
    fn test_duplicate_headers_rejected() {
        let err = read_trainer_table(b"Id,Full name,Domain,Specialization,email,email\n").unwrap_err();
        assert!(matches!(err, EtlError::DuplicateColumnError { ref column } if column == "email"));

        let err = read_trainer_table(b"Id,trainer_id,Full name,Domain,Specialization,email\n")
            .unwrap_err();
        assert!(
            matches!(err, EtlError::DuplicateColumnError { ref column } if column == "trainer_id")
        );
    }

    #[test]
    fn test_existing_password_column_is_overwritten_in_place() {
        let record = Record::from(
            json!({"password": "hunter2", "Id": 9, "topics": ["x"]})
                .as_object()
                .unwrap()
                .clone(),
        );

        let payload = to_trainer_payload(record).unwrap();
        assert_eq!(
            payload.fields().collect::<Vec<_>>(),
            vec!["password", "trainer_id", "topics"]
        );
        assert_eq!(payload.get("password"), Some(&json!(9)));
        assert_eq!(payload.get("topics"), Some(&json!([])));
    }

    #[test]
    fn test_header_only_export_writes_empty_array() {
        let (storage, result) = run("Id,Full name,Domain,Specialization,email\n");
        result.unwrap();
        assert_eq!(storage.get_file("out.json").unwrap(), "[]");
    }

    #[test]
    fn test_bom_and_quoted_fields() {
        let records = read_trainer_table(
            "\u{feff}Id,Full name,Domain,Specialization,email\n1,\"Lee, Ann\",AI,\"NLP\nLLMs\",a@x\n"
                .as_bytes(),
        )
        .unwrap();

        assert_eq!(records[0].get("Id"), Some(&json!(1)));
        assert_eq!(records[0].get("Full name"), Some(&json!("Lee, Ann")));
        assert_eq!(records[0].get("Specialization"), Some(&json!("NLP\nLLMs")));
    }

    #[test]
    fn test_non_ascii_written_literally() {
        let (storage, result) =
            run("Id,Full name,Domain,Specialization,email\n8,José Núñez,Données,Réseaux,jose@x.com\n");
        result.unwrap();

        let text = storage.get_file("out.json").unwrap();
        assert!(text.contains("\"name\": \"José Núñez\""));
        assert!(!text.contains("\\u"));
    }
}
