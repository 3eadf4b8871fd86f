use std::path::Path;

use tracing::{debug, info};

use crate::errors::CvError;
use crate::models::ResumeRecord;

/// Input formats the loader can decode, picked from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    Yaml,
    Json,
}

impl InputFormat {
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => InputFormat::Json,
            _ => InputFormat::Yaml,
        }
    }
}

/// Reads and decodes the résumé at `path`.
///
/// A missing file is reported as `CvError::InputNotFound` before anything is read.
pub fn load_resume(path: &Path) -> Result<ResumeRecord, CvError> {
    if !path.exists() {
        return Err(CvError::InputNotFound(path.to_path_buf()));
    }

    let raw = std::fs::read_to_string(path).map_err(|source| CvError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let format = InputFormat::from_path(path);
    debug!(?format, bytes = raw.len(), "Decoding résumé input");

    let record = parse_resume(&raw, format).map_err(|message| CvError::Parse {
        path: path.to_path_buf(),
        message,
    })?;

    info!(
        name = %record.name,
        skills = record.skills.len(),
        education = record.education.len(),
        experience = record.experience.len(),
        "Loaded résumé from {}",
        path.display()
    );
    Ok(record)
}

/// Decodes résumé text in the given format. Errors carry the parser's message.
pub fn parse_resume(raw: &str, format: InputFormat) -> Result<ResumeRecord, String> {
    match format {
        InputFormat::Yaml => serde_yaml::from_str(raw).map_err(|e| e.to_string()),
        InputFormat::Json => serde_json::from_str(raw).map_err(|e| e.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const MINIMAL_YAML: &str = "name: A\ntitle: B\ncontact: {phone: '1', email: e, location: l}\n\
        profile: Plain text\nskills: []\neducation: []\nexperience: []\n";

    #[test]
    fn test_missing_file_is_input_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.yaml");
        match load_resume(&path) {
            Err(CvError::InputNotFound(p)) => assert_eq!(p, path),
            other => panic!("expected InputNotFound, got {other:?}"),
        }
    }

    #[test]
    fn test_loads_yaml_file() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        file.write_all(MINIMAL_YAML.as_bytes()).unwrap();
        let record = load_resume(file.path()).unwrap();
        assert_eq!(record.name, "A");
        assert!(record.certifications.is_none());
    }

    #[test]
    fn test_loads_json_by_extension() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        file.write_all(
            br#"{"name":"A","title":"B","contact":{"phone":"1","email":"e","location":"l"},
                "profile":"Plain","skills":[],"education":[],"experience":[],
                "certifications":[["Cert","2024"]]}"#,
        )
        .unwrap();
        let record = load_resume(file.path()).unwrap();
        assert_eq!(record.certifications.map(|c| c.len()), Some(1));
    }

    #[test]
    fn test_malformed_input_is_parse_error() {
        let mut file = tempfile::Builder::new().suffix(".yml").tempfile().unwrap();
        file.write_all(b"name: [unclosed").unwrap();
        assert!(matches!(
            load_resume(file.path()),
            Err(CvError::Parse { .. })
        ));
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(InputFormat::from_path(Path::new("cv.JSON")), InputFormat::Json);
        assert_eq!(InputFormat::from_path(Path::new("cv.yaml")), InputFormat::Yaml);
        assert_eq!(InputFormat::from_path(Path::new("cv")), InputFormat::Yaml);
    }
}
