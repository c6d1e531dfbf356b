//! Scattered spatial data (`x, y, z, value` samples) and the
//! scalar-or-field property type used by the comfort models.

use std::sync::Arc;

use anyhow::{Result, bail, ensure};
use serde::{Deserialize, Serialize};

use crate::Point;
use crate::vecutils::{max, mean, min};

/// One spatial sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub point: Point,
    pub value: f64,
}

/// Point-value lookup structure over scattered 3D samples.
///
/// Surface temperatures, reflected radiation, air temperature or any
/// other quantity that varies over the study area.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpatialField {
    samples: Vec<Sample>,
}

impl SpatialField {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_samples(samples: Vec<Sample>) -> Self {
        Self { samples }
    }

    /// Attaches values to coordinates.
    ///
    /// An empty `values` slice fills the field with `NaN`.
    pub fn from_points(points: &[Point], values: &[f64]) -> Result<Self> {
        if values.is_empty() {
            return Ok(Self::from_samples(
                points
                    .iter()
                    .map(|&point| Sample {
                        point,
                        value: f64::NAN,
                    })
                    .collect(),
            ));
        }
        ensure!(
            points.len() == values.len(),
            "Got {} points but {} values",
            points.len(),
            values.len()
        );
        Ok(Self::from_samples(
            points
                .iter()
                .zip(values)
                .map(|(&point, &value)| Sample { point, value })
                .collect(),
        ))
    }

    pub fn push(&mut self, point: Point, value: f64) {
        self.samples.push(Sample { point, value });
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn values(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.value).collect()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Returns the samples inside a box of half-width `radius` around `coord`.
    ///
    /// `coord` may hold 1 (x), 2 (x, y) or 3 (x, y, z) coordinates; the
    /// selection only narrows along the axes that are given.
    pub fn select(&self, coord: &[f64], radius: f64) -> Result<Vec<&Sample>> {
        if coord.is_empty() || coord.len() > 3 {
            bail!(
                "Field query needs 1 to 3 coordinates, got {}",
                coord.len()
            );
        }
        Ok(self
            .samples
            .iter()
            .filter(|s| {
                s.point
                    .coords()
                    .iter()
                    .zip(coord)
                    .all(|(v, c)| *v >= c - radius && *v <= c + radius)
            })
            .collect())
    }

    /// Mean value of the samples within `radius` of `point`.
    ///
    /// Returns `NaN` if there are no samples in range.
    pub fn mean_value_within_radius(&self, point: Point, radius: f64) -> f64 {
        let values: Vec<f64> = self.values_within_radius(point, radius).collect();
        mean(&values)
    }

    /// Values of the samples within `radius` of `point` (3D box query).
    pub fn values_within_radius(&self, point: Point, radius: f64) -> impl Iterator<Item = f64> + '_ {
        self.samples
            .iter()
            .filter(move |s| {
                (s.point.x - point.x).abs() <= radius
                    && (s.point.y - point.y).abs() <= radius
                    && (s.point.z - point.z).abs() <= radius
            })
            .map(|s| s.value)
    }

    /// Shifts the data so that the minimum x and y land on `origin`.
    ///
    /// Returns the applied (dx, dy) shift.
    pub fn recenter(&mut self, origin: (f64, f64)) -> (f64, f64) {
        if self.samples.is_empty() {
            return (0.0, 0.0);
        }
        let xs: Vec<f64> = self.samples.iter().map(|s| s.point.x).collect();
        let ys: Vec<f64> = self.samples.iter().map(|s| s.point.y).collect();
        let dx = origin.0 - min(&xs);
        let dy = origin.1 - min(&ys);
        for s in &mut self.samples {
            s.point = s.point.translated(dx, dy, 0.0);
        }
        (dx, dy)
    }

    /// Repeats the data in the 8 positions surrounding its x/y extent.
    ///
    /// Neighbouring copies are separated by `unit`. Used to surround the
    /// study area with repeated buildings.
    pub fn repeat_outset(&mut self, unit: f64) {
        if self.samples.is_empty() {
            return;
        }
        let xs: Vec<f64> = self.samples.iter().map(|s| s.point.x).collect();
        let ys: Vec<f64> = self.samples.iter().map(|s| s.point.y).collect();
        let shift_x = max(&xs) - min(&xs) + unit;
        let shift_y = max(&ys) - min(&ys) + unit;

        // Clockwise, starting top left
        let offsets = [
            (-1.0, 1.0),
            (0.0, 1.0),
            (1.0, 1.0),
            (1.0, 0.0),
            (1.0, -1.0),
            (0.0, -1.0),
            (-1.0, -1.0),
            (-1.0, 0.0),
        ];

        let original = self.samples.clone();
        self.samples.reserve(original.len() * offsets.len());
        for (ox, oy) in offsets {
            self.samples.extend(original.iter().map(|s| Sample {
                point: s.point.translated(ox * shift_x, oy * shift_y, 0.0),
                value: s.value,
            }));
        }
    }
}

/// A property that is either uniform over space or looked up in a field.
///
/// Callers only ask for "the value near a point" and never need to know
/// which variant they hold.
#[derive(Debug, Clone)]
pub enum ScalarOrField {
    Scalar(f64),
    Field(Arc<SpatialField>),
}

impl ScalarOrField {
    /// Value near `point`: the scalar itself, or the mean of the field
    /// samples within `radius` (`NaN` when none are in range).
    pub fn value_near(&self, point: Point, radius: f64) -> f64 {
        match self {
            Self::Scalar(v) => *v,
            Self::Field(field) => field.mean_value_within_radius(point, radius),
        }
    }

    /// `value_near` for each point, in order.
    pub fn values_at(&self, points: &[Point], radius: f64) -> Vec<f64> {
        points.iter().map(|&p| self.value_near(p, radius)).collect()
    }

    /// Evaluates `f` on every value near `point` and averages the results.
    ///
    /// For a scalar this is just `f(scalar)`. For a field with no samples
    /// in range the result is `NaN`.
    pub fn mean_of_near<F>(&self, point: Point, radius: f64, f: F) -> f64
    where
        F: Fn(f64) -> f64,
    {
        match self {
            Self::Scalar(v) => f(*v),
            Self::Field(field) => {
                let values: Vec<f64> = field.values_within_radius(point, radius).map(f).collect();
                mean(&values)
            }
        }
    }
}

impl From<f64> for ScalarOrField {
    fn from(v: f64) -> Self {
        Self::Scalar(v)
    }
}

impl From<SpatialField> for ScalarOrField {
    fn from(field: SpatialField) -> Self {
        Self::Field(Arc::new(field))
    }
}

impl From<Arc<SpatialField>> for ScalarOrField {
    fn from(field: Arc<SpatialField>) -> Self {
        Self::Field(field)
    }
}
