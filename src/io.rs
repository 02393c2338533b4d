use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use ndarray::{Array2, ArrayView2};

use crate::signature::Direction;

/// Read a headerless numeric CSV (one row per angle) into a matrix.
pub fn read_lip_matrix(path: &Path) -> Result<Array2<f64>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .trim(csv::Trim::All)
        .from_path(path)
        .with_context(|| format!("open LIP csv {:?}", path))?;

    let mut values = Vec::new();
    let mut columns = None;
    let mut rows = 0usize;
    for (line, record) in reader.records().enumerate() {
        let record = record.with_context(|| format!("read row {} of {:?}", line + 1, path))?;
        match columns {
            None => columns = Some(record.len()),
            Some(expected) if expected != record.len() => {
                return Err(anyhow!(
                    "row {} of {:?} has {} fields, expected {}",
                    line + 1,
                    path,
                    record.len(),
                    expected
                ));
            }
            Some(_) => {}
        }
        for field in record.iter() {
            let value: f64 = field
                .parse()
                .with_context(|| format!("parse '{}' on row {} of {:?}", field, line + 1, path))?;
            values.push(value);
        }
        rows += 1;
    }

    let columns = columns.ok_or_else(|| anyhow!("LIP csv {:?} is empty", path))?;
    Array2::from_shape_vec((rows, columns), values)
        .with_context(|| format!("reshape LIP csv {:?}", path))
}

/// Write a matrix as headerless CSV, one row per angle.
pub fn write_lip_matrix(path: &Path, matrix: ArrayView2<'_, f64>) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("create output directory {:?}", parent))?;
    }
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)
        .with_context(|| format!("create LIP csv {:?}", path))?;
    for row in matrix.rows() {
        writer
            .write_record(row.iter().map(|v| v.to_string()))
            .with_context(|| format!("write LIP csv {:?}", path))?;
    }
    writer
        .flush()
        .with_context(|| format!("flush LIP csv {:?}", path))
}

/// `<dir>/<stem>_<direction>.csv`
pub fn lip_csv_path(dir: &Path, stem: &str, direction: Direction) -> PathBuf {
    dir.join(format!("{}_{}.csv", stem, direction.suffix()))
}

/// Image file stem with a trailing `_m`/`_s`/`_t` direction tag removed.
pub fn object_stem(image_path: &Path) -> String {
    let stem = image_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    for direction in Direction::ALL {
        if let Some(base) = stem.strip_suffix(&format!("_{}", direction.suffix())) {
            return base.to_string();
        }
    }
    stem
}

/// Space-separated values rounded to `decimals`.
pub fn format_feature_line(features: &[f64], decimals: usize) -> String {
    features
        .iter()
        .map(|v| {
            let formatted = format!("{:.*}", decimals, v);
            // avoid "-0.000000" for values that round to zero
            if formatted.trim_start_matches('-').chars().all(|c| c == '0' || c == '.') {
                formatted.trim_start_matches('-').to_string()
            } else {
                formatted
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn write_feature_line(path: &Path, features: &[f64], decimals: usize) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("create output directory {:?}", parent))?;
    }
    let file = File::create(path).with_context(|| format!("create feature file {:?}", path))?;
    let mut writer = BufWriter::new(file);
    writeln!(writer, "{}", format_feature_line(features, decimals))
        .with_context(|| format!("write feature file {:?}", path))?;
    writer
        .flush()
        .with_context(|| format!("flush feature file {:?}", path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn feature_line_rounds_and_normalises_negative_zero() {
        let line = format_feature_line(&[1.0, -0.0000001, 0.1234567, -2.5], 6);
        assert_eq!(line, "1.000000 0.000000 0.123457 -2.500000");
    }

    #[test]
    fn stem_drops_direction_tag() {
        assert_eq!(object_stem(Path::new("/data/chair_0001_m.pgm")), "chair_0001");
        assert_eq!(object_stem(Path::new("desk.png")), "desk");
    }

    #[test]
    fn csv_round_trip() -> Result<()> {
        let dir = std::env::temp_dir().join(format!("lipsig_io_{}", std::process::id()));
        let path = lip_csv_path(&dir, "obj", Direction::S);
        let matrix = array![[1.0, 2.5, 0.0], [3.25, -1.0, 1e-7]];
        write_lip_matrix(&path, matrix.view())?;
        let loaded = read_lip_matrix(&path)?;
        assert_eq!(loaded, matrix);
        fs::remove_dir_all(&dir).ok();
        Ok(())
    }
}
