//! Delimited `x y z value` text files.
//!
//! The first line is a header and is always skipped. Blank lines are
//! ignored. Every other line must have exactly four numeric columns.

use anyhow::{Context, Result, anyhow, ensure};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::Point;
use crate::sim::field::SpatialField;

/// Reads a field from `path`, with columns split on `separator`.
///
/// # Example
/// ```no_run
/// use outdoor_comfort::io::read_field;
/// use std::path::Path;
///
/// let temps = read_field(Path::new("surface_temperature.csv"), ',').unwrap();
/// println!("{} samples", temps.len());
/// ```
pub fn read_field(path: &Path, separator: char) -> Result<SpatialField> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read file: {}", path.display()))?;
    parse_field(&content, separator).with_context(|| format!("Invalid field file: {}", path.display()))
}

/// Parses field rows from text. See the module docs for the layout.
pub fn parse_field(content: &str, separator: char) -> Result<SpatialField> {
    let mut field = SpatialField::new();

    for (i, line) in content.lines().enumerate().skip(1) {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        let line_no = i + 1;

        let parts: Vec<&str> = if separator.is_whitespace() {
            trimmed.split_whitespace().collect()
        } else {
            trimmed.split(separator).map(str::trim).collect()
        };
        ensure!(
            parts.len() == 4,
            "Line {line_no}: expected 4 columns (x, y, z, value), found {}",
            parts.len()
        );

        let mut nums = [0.0; 4];
        for (n, part) in nums.iter_mut().zip(&parts) {
            *n = part
                .parse()
                .map_err(|_| anyhow!("Line {line_no}: '{part}' is not a number"))?;
        }
        field.push(Point::new(nums[0], nums[1], nums[2]), nums[3]);
    }

    Ok(field)
}

/// Writes `field` to `path` with a `x,y,z,value` style header.
pub fn write_field(path: &Path, field: &SpatialField, separator: char) -> Result<()> {
    let file =
        File::create(path).with_context(|| format!("Failed to create file: {}", path.display()))?;
    let mut writer = BufWriter::new(file);

    let s = separator;
    writeln!(writer, "x{s}y{s}z{s}value")?;
    for sample in field.samples() {
        let p = sample.point;
        writeln!(writer, "{}{s}{}{s}{}{s}{}", p.x, p.y, p.z, sample.value)?;
    }
    writer.flush()?;
    Ok(())
}
