#![allow(dead_code)]

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::{TempDir, tempdir};

/// Customer export with an identifier, a duplicate pair once ids are gone,
/// mixed date layouts, colloquial country names and messy phone numbers.
pub const CUSTOMERS_CSV: &str = "\
customer_id,Name,signup_date,country,phone
1,alice smith,2024-01-05,america,(021) 555-1234
2,bob JONES,03/15/2024,indonesia,0812.3456.789
3,bob JONES,03/15/2024,indonesia,0812.3456.789
";

/// Scratch directory helper that cleans up files automatically on drop.
pub struct TestWorkspace {
    temp_dir: TempDir,
}

impl TestWorkspace {
    /// Creates a fresh scratch directory for the current test case.
    pub fn new() -> Self {
        Self {
            temp_dir: tempdir().expect("temp dir"),
        }
    }

    /// Returns the root path for all files owned by this workspace.
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Writes `contents` into a file under the workspace and returns the path.
    pub fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.temp_dir.path().join(name);
        let mut file = File::create(&path).expect("create temp file");
        file.write_all(contents.as_bytes())
            .expect("write temp file contents");
        path
    }

    /// Reads a CSV file under the workspace into its header and rows.
    pub fn read_csv(&self, name: &str) -> (Vec<String>, Vec<Vec<String>>) {
        read_csv(&self.path().join(name))
    }
}

pub fn read_csv(path: &Path) -> (Vec<String>, Vec<Vec<String>>) {
    let contents = fs::read_to_string(path).expect("read csv output");
    let mut reader = csv::Reader::from_reader(contents.as_bytes());
    let headers = reader
        .headers()
        .expect("headers")
        .iter()
        .map(str::to_string)
        .collect();
    let rows = reader
        .records()
        .map(|record| {
            record
                .expect("record")
                .iter()
                .map(str::to_string)
                .collect()
        })
        .collect();
    (headers, rows)
}
