use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use log::{error, info};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;

use crate::error::Result;
use crate::leader::LeadersByCountry;

pub struct LeaderStore {
    path: PathBuf,
}

impl LeaderStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        LeaderStore {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    // written to `<name>.tmp` first, then renamed over the target
    pub fn save(&self, data: &LeadersByCountry) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let tmp = self.tmp_path();
        {
            let mut out = BufWriter::new(File::create(&tmp)?);
            let mut ser = serde_json::Serializer::with_formatter(&mut out, PrettyFormatter::with_indent(b"    "));
            data.serialize(&mut ser)?;
            out.flush()?;
        }
        fs::rename(&tmp, &self.path)?;

        info!("Saved {} countries to {}", data.len(), self.path.display());
        Ok(())
    }

    pub fn load(&self) -> Result<LeadersByCountry> {
        let file = File::open(&self.path)?;
        Ok(serde_json::from_reader(BufReader::new(file))?)
    }

    pub fn check(&self, original: &LeadersByCountry) -> Result<bool> {
        let loaded = self.load()?;
        let matches = loaded == *original;
        if matches {
            info!("Data loaded successfully and matches the collected leaders.");
        } else {
            error!("Data loaded from {} does not match the collected leaders.", self.path.display());
        }
        Ok(matches)
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::leader::Leader;
    use serde_json::json;
    use tempfile::TempDir;

    fn sample() -> LeadersByCountry {
        let mut data = LeadersByCountry::new();
        let leader: Leader = serde_json::from_value(json!({
            "id": "Q1",
            "first_name": "Élisabeth",
            "last_name": "Borne",
            "start_mandate": "2022-05-16",
            "wikipedia_url": "https://fr.wikipedia.org/wiki/%C3%89lisabeth_Borne",
        }))
        .unwrap();
        data.insert("fr".to_string(), vec![leader.with_bio("Élisabeth Borne est une femme d'État française.".to_string())]);
        data.insert("ru".to_string(), vec![]);
        data
    }

    #[test]
    fn test_round_trip() {
        let dir = TempDir::new().unwrap();
        let store = LeaderStore::new(dir.path().join("Data").join("leaders.json"));
        let data = sample();

        store.save(&data).unwrap();

        assert_eq!(store.load().unwrap(), data);
        assert!(store.check(&data).unwrap());
        assert!(!dir.path().join("Data").join("leaders.json.tmp").exists());
    }

    #[test]
    fn test_writes_readable_utf8() {
        let dir = TempDir::new().unwrap();
        let store = LeaderStore::new(dir.path().join("leaders.json"));

        store.save(&sample()).unwrap();
        let text = fs::read_to_string(store.path()).unwrap();

        assert!(text.contains("\"first_name\": \"Élisabeth\""));
        assert!(text.starts_with("{\n    \"fr\": [\n        {"));
        assert!(text.contains("\"ru\": []"));
    }

    #[test]
    fn test_check_detects_mismatch_and_overwrite() {
        let dir = TempDir::new().unwrap();
        let store = LeaderStore::new(dir.path().join("leaders.json"));
        let data = sample();
        store.save(&data).unwrap();

        let mut other = data.clone();
        other.insert("us".to_string(), vec![]);
        assert!(!store.check(&other).unwrap());

        store.save(&other).unwrap();
        assert!(store.check(&other).unwrap());
    }

    #[test]
    fn test_check_missing_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let store = LeaderStore::new(dir.path().join("missing.json"));

        assert!(store.check(&sample()).is_err());
    }
}
