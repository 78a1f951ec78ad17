//! Parameter-space scatter
//!
//! Draws one polyline per curve of the sample table plus a marker on the
//! selected sample, and maps pointer positions from scene pixels to
//! `(parameter1, parameter2)` so they can be fed to the nearest-neighbor
//! query. Pointer positions outside the plot rectangle map to nothing.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use glam::DVec2;
use log::debug;

use spirals_core::{ExplorationSession, SampleTable};

use crate::view::slice_view::Series;
use crate::view::{View, ViewBounds, ViewError};

/// Fractional padding added around the data extent
const RANGE_PADDING: f64 = 0.05;

/// Visible data rectangle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DataRange {
    pub min: DVec2,
    pub max: DVec2,
}

impl DataRange {
    pub fn new(min: DVec2, max: DVec2) -> Result<Self, ViewError> {
        if !(max.x > min.x && max.y > min.y) {
            return Err(ViewError::DegenerateRange(format!("{:?}..{:?}", min, max)));
        }
        Ok(Self { min, max })
    }

    /// Smallest padded range enclosing every point; a flat axis gets a
    /// unit-wide window.
    pub fn enclosing(points: impl IntoIterator<Item = DVec2>) -> Self {
        let (mut min, mut max) = (DVec2::splat(f64::INFINITY), DVec2::splat(f64::NEG_INFINITY));
        for point in points {
            min = min.min(point);
            max = max.max(point);
        }
        if !min.is_finite() || !max.is_finite() {
            return Self { min: DVec2::ZERO, max: DVec2::ONE };
        }

        let extent = max - min;
        let pad = DVec2::new(
            if extent.x > 0.0 { extent.x * RANGE_PADDING } else { 0.5 },
            if extent.y > 0.0 { extent.y * RANGE_PADDING } else { 0.5 },
        );
        Self { min: min - pad, max: max + pad }
    }

    pub fn extent(&self) -> DVec2 {
        self.max - self.min
    }
}

/// Scatter of all samples with a closest-point marker
#[derive(Debug, Clone)]
pub struct ScatterView {
    bounds: ViewBounds,
    range: DataRange,
    curves: Vec<Series>,
    marker: Option<DVec2>,
    shown_index: Option<usize>,
    generation: u64,
}

impl ScatterView {
    /// Axis labels (left, bottom)
    pub const AXIS_LABELS: (&'static str, &'static str) = ("Vy", "alpha");

    pub fn new(table: &SampleTable, bounds: ViewBounds) -> Self {
        let curves: Vec<Series> = table
            .curves()
            .map(|(_, samples)| {
                samples
                    .iter()
                    .map(|s| DVec2::new(s.parameter1, s.parameter2))
                    .collect()
            })
            .collect();
        let range = DataRange::enclosing(curves.iter().flatten().copied());
        debug!("Scatter of {} curves over {:?}", curves.len(), range);

        Self {
            bounds,
            range,
            curves,
            marker: None,
            shown_index: None,
            generation: 0,
        }
    }

    pub fn curves(&self) -> &[Series] {
        &self.curves
    }

    pub fn marker(&self) -> Option<DVec2> {
        self.marker
    }

    pub fn bounds(&self) -> &ViewBounds {
        &self.bounds
    }

    pub fn range(&self) -> &DataRange {
        &self.range
    }

    pub fn set_bounds(&mut self, bounds: ViewBounds) {
        self.bounds = bounds;
    }

    pub fn set_range(&mut self, range: DataRange) {
        self.range = range;
    }

    /// Data coordinates of a scene point (scene y grows downwards).
    pub fn scene_to_data(&self, scene: DVec2) -> DVec2 {
        let t = self.bounds.normalized(scene);
        let extent = self.range.extent();
        DVec2::new(
            self.range.min.x + t.x * extent.x,
            self.range.max.y - t.y * extent.y,
        )
    }

    /// Scene coordinates of a data point.
    pub fn data_to_scene(&self, data: DVec2) -> DVec2 {
        let t = DVec2::new(
            (data.x - self.range.min.x) / self.range.extent().x,
            (self.range.max.y - data.y) / self.range.extent().y,
        );
        self.bounds.origin + t * self.bounds.size
    }

    /// Query point for a pointer position, `None` outside the plot.
    pub fn pointer_query(&self, scene: DVec2) -> Option<DVec2> {
        self.bounds.contains(scene).then(|| self.scene_to_data(scene))
    }
}

impl View for ScatterView {
    fn name(&self) -> &str {
        "scatter"
    }

    fn refresh(&mut self, session: &ExplorationSession) {
        let selection = session.selection();
        if self.shown_index == Some(selection.index) {
            return;
        }
        self.marker = Some(DVec2::new(selection.sample.parameter1, selection.sample.parameter2));
        self.shown_index = Some(selection.index);
        self.generation += 1;
    }

    fn generation(&self) -> u64 {
        self.generation
    }
}
