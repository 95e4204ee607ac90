//! Locating and reading a city's trip log.
//!
//! A data location is either a local directory or an HTTP(S) base URL; each
//! city's file sits directly under it. Gzip payloads are detected by their
//! magic bytes and decompressed.

use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use flate2::read::GzDecoder;
use tracing::{debug, info, instrument};

use crate::criteria::City;
use crate::dataset::Dataset;
use crate::fetch::{BasicClient, HttpClient, fetch_bytes};
use crate::parser::parse_trips;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];
const HTTP_TIMEOUT: Duration = Duration::from_secs(120);

/// Where city trip files are read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    Directory(PathBuf),
    Remote(String),
}

impl DataSource {
    /// Treats `http://` and `https://` locations as remote, anything else as a
    /// directory path.
    pub fn from_location(location: &str) -> Self {
        if location.starts_with("http://") || location.starts_with("https://") {
            DataSource::Remote(location.trim_end_matches('/').to_string())
        } else {
            DataSource::Directory(PathBuf::from(location))
        }
    }

    /// Path or URL of `city`'s file. A directory falls back to the `.gz`
    /// sibling when the plain file is missing.
    pub fn locate(&self, city: City) -> String {
        match self {
            DataSource::Directory(dir) => {
                let plain = dir.join(city.file_name());
                let gz = dir.join(format!("{}.gz", city.file_name()));
                if !plain.exists() && gz.exists() {
                    gz.display().to_string()
                } else {
                    plain.display().to_string()
                }
            }
            DataSource::Remote(base) => format!("{base}/{}", city.file_name()),
        }
    }

    /// Raw (decompressed) bytes of `city`'s file, using `client` for remote
    /// sources.
    #[instrument(skip_all, fields(city = %city))]
    pub async fn load_bytes_with<C: HttpClient>(&self, client: &C, city: City) -> Result<Vec<u8>> {
        let location = self.locate(city);
        let bytes = match self {
            DataSource::Directory(_) => std::fs::read(Path::new(&location))
                .with_context(|| format!("failed to read trip file '{location}'"))?,
            DataSource::Remote(_) => fetch_bytes(client, &location).await?,
        };
        debug!(location = %location, bytes = bytes.len(), "Loaded trip file");

        decompress(bytes).with_context(|| format!("failed to decompress '{location}'"))
    }

    /// Loads and parses `city`'s trips into a dataset.
    ///
    /// # Errors
    ///
    /// Fails if the file can't be read or fetched, or if it has a missing
    /// required column or an unparsable value.
    pub async fn load_dataset(&self, city: City) -> Result<Dataset> {
        let client = BasicClient::new(HTTP_TIMEOUT)?;
        let bytes = self.load_bytes_with(&client, city).await?;
        let table = parse_trips(bytes.as_slice())?;
        let dataset = Dataset::from_table(table)?;

        info!(city = %city, trips = dataset.len(), columns = ?dataset.columns(), "Trip data loaded");
        Ok(dataset)
    }
}

/// Gunzips `bytes` when they start with the gzip magic number.
pub fn decompress(bytes: Vec<u8>) -> Result<Vec<u8>> {
    if !bytes.starts_with(&GZIP_MAGIC) {
        return Ok(bytes);
    }

    let mut decoded = Vec::new();
    GzDecoder::new(bytes.as_slice()).read_to_end(&mut decoded)?;
    Ok(decoded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::Compression;
    use flate2::write::GzEncoder;
    use std::env;
    use std::fs;
    use std::io::Write;

    const CSV: &str = "Start Time,End Time,Start Station,End Station,User Type\n\
                       2017-01-01 09:07:57,2017-01-01 09:20:53,A,B,Subscriber\n\
                       2017-01-02 10:00:00,2017-01-02 10:05:00,B,A,Customer\n";

    #[test]
    fn test_from_location() {
        assert_eq!(
            DataSource::from_location("https://example.com/bikes/"),
            DataSource::Remote("https://example.com/bikes".to_string())
        );
        assert_eq!(
            DataSource::from_location("data"),
            DataSource::Directory(PathBuf::from("data"))
        );
    }

    #[test]
    fn test_locate_remote() {
        let source = DataSource::Remote("http://host/data".to_string());

        assert_eq!(
            source.locate(City::NewYorkCity),
            "http://host/data/new_york_city.csv"
        );
    }

    #[test]
    fn test_decompress_passthrough() {
        let bytes = b"plain".to_vec();
        assert_eq!(decompress(bytes.clone()).unwrap(), bytes);
    }

    #[tokio::test]
    async fn test_load_plain_directory() {
        let dir = temp_dir("bikeshare_stats_plain");
        fs::write(dir.join("chicago.csv"), CSV).unwrap();

        let source = DataSource::Directory(dir.clone());
        let dataset = source.load_dataset(City::Chicago).await.unwrap();

        assert_eq!(dataset.len(), 2);
        assert!(dataset.columns().user_type);
        assert!(!dataset.columns().gender);

        fs::remove_dir_all(&dir).unwrap();
    }

    #[tokio::test]
    async fn test_load_gzip_fallback() {
        let dir = temp_dir("bikeshare_stats_gzip");
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(CSV.as_bytes()).unwrap();
        fs::write(dir.join("washington.csv.gz"), encoder.finish().unwrap()).unwrap();

        let source = DataSource::Directory(dir.clone());
        assert!(source.locate(City::Washington).ends_with("washington.csv.gz"));

        let dataset = source.load_dataset(City::Washington).await.unwrap();
        assert_eq!(dataset.len(), 2);

        fs::remove_dir_all(&dir).unwrap();
    }

    #[tokio::test]
    async fn test_load_missing_file() {
        let dir = temp_dir("bikeshare_stats_missing");
        let source = DataSource::Directory(dir.clone());

        assert!(source.load_dataset(City::Chicago).await.is_err());

        fs::remove_dir_all(&dir).unwrap();
    }

    // Helper functions for tests
    fn temp_dir(name: &str) -> PathBuf {
        let dir = env::temp_dir().join(name);
        let _ = fs::remove_dir_all(&dir); // clean up any prior run
        fs::create_dir_all(&dir).unwrap();
        dir
    }
}
