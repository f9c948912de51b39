//! Resumable series store
//!
//! Owns the on-disk CSV representation of the triangle series:
//! - resume read: tail-only read of the last record to seed the engine
//! - full read: every record, for the renderer
//! - append/write: header + rows for a fresh file, rows only on append
//!
//! The file is append-only across runs. Nothing here ever rewrites a
//! committed row, so a mid-run failure can't corrupt prior data.

pub mod tail;

use std::fs::{File, OpenOptions};
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use log::debug;
use thiserror::Error;

use crate::consts::COLUMN_COUNT;
use crate::numeric::{Backend, ParseScalarError};
use crate::spiral::{Point, ResumeState, Triangle, TriangleVertices};

/// Why a single persisted row can't be used
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    #[error("expected 8 comma-separated fields, found {found}")]
    FieldCount { found: usize },
    #[error("invalid triangle number {text:?}")]
    Number { text: String },
    #[error(transparent)]
    Scalar(#[from] ParseScalarError),
}

/// Store-level failures, distinguished so callers can treat "nothing there"
/// differently from actual corruption
#[derive(Debug, Error)]
pub enum StoreError {
    /// No data file exists - a fresh start for generation, nothing to plot
    #[error("no data file was found at {path}")]
    MissingData { path: PathBuf },
    /// The file holds a header but no rows
    #[error("the data file {path} doesn't contain any rows")]
    EmptyData { path: PathBuf },
    /// The file's header doesn't match the configured columns
    #[error("the data file header doesn't match the configured columns (expected {expected:?}, found {found:?})")]
    SchemaMismatch { expected: String, found: String },
    /// A data row fails to parse under the active backend
    #[error("malformed record {text:?}: {source}")]
    MalformedRecord {
        text: String,
        #[source]
        source: RecordError,
    },
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// The on-disk series of triangle records
pub struct SeriesStore {
    path: PathBuf,
    headers: [String; 8],
}

impl SeriesStore {
    pub fn new(path: impl Into<PathBuf>, headers: [String; 8]) -> Self {
        Self {
            path: path.into(),
            headers,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn header_line(&self) -> String {
        self.headers.join(",")
    }

    /// Recover the engine seed from the last persisted record.
    ///
    /// Reads only the file tail. A missing file or a header-only file is a
    /// fresh start, not an error.
    pub fn resume_state<B: Backend>(
        &self,
        backend: &mut B,
    ) -> Result<ResumeState<B::Scalar>, StoreError> {
        let mut file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(ResumeState::Fresh),
            Err(e) => return Err(e.into()),
        };

        let Some(last) = tail::last_nonempty_line(&mut file)? else {
            return Ok(ResumeState::Fresh);
        };
        if last == self.header_line() {
            return Ok(ResumeState::Fresh);
        }

        let record = parse_record(backend, &last)?;
        debug!(
            "resuming after triangle #{} from {}",
            record.number,
            self.path.display()
        );
        Ok(ResumeState::Resumed {
            next_number: record.number + 1,
            outside_right: record.outside_right,
            rotation: record.rotation,
        })
    }

    /// Read every persisted record, in series order, for the renderer
    pub fn read_all<B: Backend>(
        &self,
        backend: &mut B,
    ) -> Result<Vec<TriangleVertices<B::Scalar>>, StoreError> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(StoreError::MissingData {
                    path: self.path.clone(),
                });
            }
            Err(e) => return Err(e.into()),
        };
        let reader = BufReader::new(file);
        let mut lines = reader.lines();

        let header = loop {
            match lines.next() {
                Some(line) => {
                    let line = line?;
                    if !line.trim().is_empty() {
                        break line.trim().to_string();
                    }
                }
                None => {
                    return Err(StoreError::EmptyData {
                        path: self.path.clone(),
                    });
                }
            }
        };
        let expected = self.header_line();
        if header != expected {
            return Err(StoreError::SchemaMismatch {
                expected,
                found: header,
            });
        }

        let mut triangles = Vec::new();
        for line in lines {
            let line = line?;
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            let record = parse_record(backend, trimmed)?;
            triangles.push(TriangleVertices::from(&record));
        }

        if triangles.is_empty() {
            return Err(StoreError::EmptyData {
                path: self.path.clone(),
            });
        }
        Ok(triangles)
    }

    /// Write a batch of records.
    ///
    /// With `create_new` the file (and its parent directory) is created and
    /// the header row written first; otherwise rows are appended to the
    /// existing file without a header. The handle is flushed and dropped
    /// before returning, so an interrupted run leaves a resumable file.
    pub fn append<B: Backend>(
        &self,
        backend: &B,
        triangles: &[Triangle<B::Scalar>],
        create_new: bool,
    ) -> Result<(), StoreError> {
        let file = if create_new {
            if let Some(parent) = self.path.parent()
                && !parent.as_os_str().is_empty()
            {
                std::fs::create_dir_all(parent)?;
            }
            File::create(&self.path)?
        } else {
            OpenOptions::new().append(true).open(&self.path)?
        };
        let mut writer = BufWriter::new(file);

        if create_new {
            writeln!(writer, "{}", self.header_line())?;
        }
        for triangle in triangles {
            writeln!(writer, "{}", format_record(backend, triangle))?;
        }
        writer.flush()?;
        Ok(())
    }
}

/// Serialize one triangle in the declared column order
fn format_record<B: Backend>(backend: &B, triangle: &Triangle<B::Scalar>) -> String {
    [
        triangle.number.to_string(),
        backend.format(&triangle.outside_left.x),
        backend.format(&triangle.outside_left.y),
        backend.format(&triangle.outside_right.x),
        backend.format(&triangle.outside_right.y),
        backend.format(&triangle.inside.x),
        backend.format(&triangle.inside.y),
        backend.format(&triangle.rotation),
    ]
    .join(",")
}

/// Parse one row back into a triangle under the active backend
fn parse_record<B: Backend>(
    backend: &mut B,
    line: &str,
) -> Result<Triangle<B::Scalar>, StoreError> {
    let malformed = |source: RecordError| StoreError::MalformedRecord {
        text: line.to_string(),
        source,
    };

    let fields: Vec<&str> = line.split(',').collect();
    if fields.len() != COLUMN_COUNT {
        return Err(malformed(RecordError::FieldCount {
            found: fields.len(),
        }));
    }

    let number: u64 = fields[0]
        .trim()
        .parse()
        .map_err(|_| malformed(RecordError::Number {
            text: fields[0].to_string(),
        }))?;

    let mut scalar = |text: &str| -> Result<B::Scalar, RecordError> {
        Ok(backend.parse(text)?)
    };
    let outside_left = Point::new(scalar(fields[1]).map_err(malformed)?, scalar(fields[2]).map_err(malformed)?);
    let outside_right = Point::new(scalar(fields[3]).map_err(malformed)?, scalar(fields[4]).map_err(malformed)?);
    let inside = Point::new(scalar(fields[5]).map_err(malformed)?, scalar(fields[6]).map_err(malformed)?);
    let rotation = scalar(fields[7]).map_err(malformed)?;

    Ok(Triangle {
        number,
        outside_left,
        outside_right,
        inside,
        rotation,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::numeric::F64Backend;
    use crate::settings::default_headers;
    use crate::spiral::{ResumeState, SpiralEngine};
    use tempfile::TempDir;

    fn store_in(dir: &TempDir) -> SeriesStore {
        SeriesStore::new(dir.path().join("triangles.csv"), default_headers())
    }

    fn generate(backend: &mut F64Backend, count: usize) -> Vec<Triangle<f64>> {
        let mut engine = SpiralEngine::new(backend, 1.0, None, ResumeState::Fresh);
        (0..count)
            .map(|_| engine.next_triangle(backend).unwrap())
            .collect()
    }

    #[test]
    fn test_missing_file_is_fresh_start() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        let mut backend = F64Backend;
        assert_eq!(
            store.resume_state(&mut backend).unwrap(),
            ResumeState::Fresh
        );
        assert!(matches!(
            store.read_all(&mut backend),
            Err(StoreError::MissingData { .. })
        ));
    }

    #[test]
    fn test_header_only_file_is_fresh_start() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        let mut backend = F64Backend;
        store.append(&backend, &[], true).unwrap();

        assert_eq!(
            store.resume_state(&mut backend).unwrap(),
            ResumeState::Fresh
        );
        assert!(matches!(
            store.read_all(&mut backend),
            Err(StoreError::EmptyData { .. })
        ));
    }

    #[test]
    fn test_write_then_resume() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        let mut backend = F64Backend;
        let triangles = generate(&mut backend, 5);
        store.append(&backend, &triangles, true).unwrap();

        let resume = store.resume_state(&mut backend).unwrap();
        let last = triangles.last().unwrap();
        match resume {
            ResumeState::Resumed {
                next_number,
                outside_right,
                rotation,
            } => {
                assert_eq!(next_number, 6);
                assert_eq!(outside_right, last.outside_right);
                assert_eq!(rotation, last.rotation);
            }
            ResumeState::Fresh => panic!("expected a resumable state"),
        }
    }

    #[test]
    fn test_append_never_duplicates_the_header() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        let mut backend = F64Backend;
        let triangles = generate(&mut backend, 4);
        store.append(&backend, &triangles[..2], true).unwrap();
        store.append(&backend, &triangles[2..], false).unwrap();

        let content = std::fs::read_to_string(store.path()).unwrap();
        let header_count = content
            .lines()
            .filter(|line| *line == store.header_line())
            .count();
        assert_eq!(header_count, 1);
        assert_eq!(content.lines().count(), 5);

        let all = store.read_all(&mut backend).unwrap();
        assert_eq!(all.len(), 4);
        assert_eq!(all.last().unwrap().number, 4);
    }

    #[test]
    fn test_full_read_round_trip() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        let mut backend = F64Backend;
        let triangles = generate(&mut backend, 8);
        store.append(&backend, &triangles, true).unwrap();

        let all = store.read_all(&mut backend).unwrap();
        assert_eq!(all.len(), 8);
        for (read, written) in all.iter().zip(&triangles) {
            assert_eq!(read, &TriangleVertices::from(written));
        }
    }

    #[test]
    fn test_schema_mismatch_is_reported() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("triangles.csv");
        std::fs::write(&path, "a,b,c,d,e,f,g,h\n1,0,0,0,0,0,0,0\n").unwrap();
        let store = SeriesStore::new(&path, default_headers());
        let mut backend = F64Backend;

        match store.read_all(&mut backend) {
            Err(StoreError::SchemaMismatch { expected, found }) => {
                assert_eq!(expected, store.header_line());
                assert_eq!(found, "a,b,c,d,e,f,g,h");
            }
            other => panic!("expected a schema mismatch, got {other:?}"),
        }
    }

    #[test]
    fn test_malformed_record_aborts_the_read() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        let mut backend = F64Backend;
        let triangles = generate(&mut backend, 2);
        store.append(&backend, &triangles, true).unwrap();

        use std::io::Write;
        let mut file = OpenOptions::new().append(true).open(store.path()).unwrap();
        writeln!(file, "3,nope,0,0,0,0,0,0").unwrap();

        assert!(matches!(
            store.read_all(&mut backend),
            Err(StoreError::MalformedRecord { .. })
        ));
        assert!(matches!(
            store.resume_state(&mut backend),
            Err(StoreError::MalformedRecord { .. })
        ));
    }

    #[test]
    fn test_short_row_is_malformed() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        let mut backend = F64Backend;
        store.append(&backend, &[], true).unwrap();

        use std::io::Write;
        let mut file = OpenOptions::new().append(true).open(store.path()).unwrap();
        writeln!(file, "1,2,3").unwrap();

        match store.read_all(&mut backend) {
            Err(StoreError::MalformedRecord {
                source: RecordError::FieldCount { found },
                ..
            }) => assert_eq!(found, 3),
            other => panic!("expected a field count error, got {other:?}"),
        }
    }

    #[test]
    fn test_exact_rows_round_trip() {
        use crate::numeric::BigBackend;

        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        let mut backend = BigBackend::new(192).unwrap();
        let mut engine = SpiralEngine::new(&mut backend, 1.0, None, ResumeState::Fresh);
        let triangles: Vec<_> = (0..4)
            .map(|_| engine.next_triangle(&mut backend).unwrap())
            .collect();
        store.append(&backend, &triangles, true).unwrap();

        let all = store.read_all(&mut backend).unwrap();
        assert_eq!(all.len(), 4);
        let last = all.last().unwrap();
        let written = triangles.last().unwrap();
        let diff = backend.sub(&last.outside_right.x, &written.outside_right.x);
        assert!(backend.to_f64(&diff).abs() < 1e-40);
    }
}
