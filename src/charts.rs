//! Chart models for the analytics view.
//!
//! A [`Chart`] holds labels and one dataset, the same shape a Chart.js
//! instance exposes. The controller replaces the data wholesale and calls
//! [`Chart::update`]; the page draws the current data as inline SVG.

use std::f64::consts::PI;

use serde::Serialize;

use crate::derived::{ConfidenceSplit, DerivedState};
use crate::dom::escape_html;

pub const DETECTIONS_CHART_ID: &str = "detectionsChart";
pub const CONFIDENCE_CHART_ID: &str = "confidenceChart";

const SVG_WIDTH: f64 = 480.0;
const SVG_HEIGHT: f64 = 240.0;
const PADDING: f64 = 32.0;

// ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Line,
    Doughnut,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dataset {
    pub label: String,
    pub data: Vec<u32>,
    pub colors: Vec<&'static str>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Chart {
    pub kind: ChartKind,
    pub labels: Vec<String>,
    pub dataset: Dataset,
    /// Lower bound for the top of the y axis on line charts.
    pub suggested_max: Option<u32>,
    /// Bumped by every redraw.
    pub revision: u64,
}

impl Chart {
    // ---
    /// Detections per day, drawn as a line.
    pub fn detections_timeline() -> Self {
        Self {
            kind: ChartKind::Line,
            labels: Vec::new(),
            dataset: Dataset {
                label: "Detections".to_string(),
                data: Vec::new(),
                colors: vec!["#16a34a"],
            },
            suggested_max: Some(10),
            revision: 0,
        }
    }

    /// High versus warning confidence, drawn as a doughnut.
    pub fn confidence_doughnut() -> Self {
        Self {
            kind: ChartKind::Doughnut,
            labels: vec!["High (>=85%)".to_string(), "Warning (60-84%)".to_string()],
            dataset: Dataset {
                label: "Confidence".to_string(),
                data: vec![0, 0],
                colors: vec!["#f97316", "#f59e0b"],
            },
            suggested_max: None,
            revision: 0,
        }
    }

    pub fn set_labels(&mut self, labels: Vec<String>) {
        self.labels = labels;
    }

    pub fn set_data(&mut self, data: Vec<u32>) {
        self.dataset.data = data;
    }

    pub fn update(&mut self) {
        self.revision += 1;
    }

    pub fn to_svg(&self, id: &str) -> String {
        let body = match self.kind {
            ChartKind::Line => self.line_svg(),
            ChartKind::Doughnut => self.doughnut_svg(),
        };
        format!(
            r#"<svg id="{id}" data-revision="{rev}" viewBox="0 0 {w} {h}" role="img" aria-label="{label}" xmlns="http://www.w3.org/2000/svg">{body}</svg>"#,
            id = escape_html(id),
            rev = self.revision,
            w = SVG_WIDTH,
            h = SVG_HEIGHT,
            label = escape_html(&self.dataset.label),
        )
    }

    fn line_svg(&self) -> String {
        let data = &self.dataset.data;
        let color = self.dataset.colors.first().copied().unwrap_or("#16a34a");
        let top = data
            .iter()
            .copied()
            .max()
            .unwrap_or(0)
            .max(self.suggested_max.unwrap_or(0))
            .max(1) as f64;

        let plot_w = SVG_WIDTH - 2.0 * PADDING;
        let plot_h = SVG_HEIGHT - 2.0 * PADDING;
        let step = if data.len() > 1 {
            plot_w / (data.len() - 1) as f64
        } else {
            0.0
        };
        let points: Vec<(f64, f64)> = data
            .iter()
            .enumerate()
            .map(|(i, v)| {
                let x = PADDING + step * i as f64;
                let y = PADDING + plot_h * (1.0 - *v as f64 / top);
                (x, y)
            })
            .collect();

        let baseline = SVG_HEIGHT - PADDING;
        let mut svg = format!(
            r##"<line x1="{p}" y1="{b}" x2="{r}" y2="{b}" stroke="#d1d5db"/><text x="4" y="{ty}" font-size="10">{top}</text><text x="4" y="{b}" font-size="10">0</text>"##,
            p = PADDING,
            r = SVG_WIDTH - PADDING,
            b = baseline,
            ty = PADDING,
            top = top,
        );
        if !points.is_empty() {
            let path: Vec<String> = points.iter().map(|(x, y)| format!("{x:.1},{y:.1}")).collect();
            svg.push_str(&format!(
                r#"<polyline points="{}" fill="none" stroke="{}" stroke-width="2"/>"#,
                path.join(" "),
                color
            ));
        }
        for ((x, y), (label, value)) in points.iter().zip(self.labels.iter().zip(data)) {
            svg.push_str(&format!(
                r#"<circle cx="{x:.1}" cy="{y:.1}" r="3" fill="{color}"><title>{label}: {value}</title></circle><text x="{x:.1}" y="{ly}" font-size="10" text-anchor="middle">{label}</text>"#,
                ly = SVG_HEIGHT - 8.0,
                label = escape_html(label),
            ));
        }
        svg
    }

    fn doughnut_svg(&self) -> String {
        let total: u32 = self.dataset.data.iter().sum();
        let (cx, cy) = (SVG_WIDTH / 2.0, SVG_HEIGHT / 2.0 - 12.0);
        let radius = 80.0;
        let circumference = 2.0 * PI * radius;

        let mut svg = format!(
            r##"<circle cx="{cx}" cy="{cy}" r="{radius}" fill="none" stroke="#e5e7eb" stroke-width="32"/>"##
        );
        let mut offset = 0.0;
        for (value, color) in self.dataset.data.iter().zip(&self.dataset.colors) {
            if total == 0 || *value == 0 {
                continue;
            }
            let arc = circumference * *value as f64 / total as f64;
            svg.push_str(&format!(
                r#"<circle cx="{cx}" cy="{cy}" r="{radius}" fill="none" stroke="{color}" stroke-width="32" stroke-dasharray="{arc:.2} {rest:.2}" stroke-dashoffset="{off:.2}" transform="rotate(-90 {cx} {cy})"/>"#,
                rest = circumference - arc,
                off = -offset,
            ));
            offset += arc;
        }
        for (i, ((label, value), color)) in self
            .labels
            .iter()
            .zip(&self.dataset.data)
            .zip(&self.dataset.colors)
            .enumerate()
        {
            let x = PADDING + i as f64 * (SVG_WIDTH / 2.0);
            svg.push_str(&format!(
                r#"<rect x="{x}" y="{y}" width="10" height="10" fill="{color}"/><text x="{tx}" y="{ty}" font-size="11">{label}: {value}</text>"#,
                y = SVG_HEIGHT - 20.0,
                tx = x + 14.0,
                ty = SVG_HEIGHT - 11.0,
                label = escape_html(label),
            ));
        }
        svg
    }
}

/// Recompute both charts from `detections` and redraw them.
pub fn refresh_charts(detections: &DerivedState, timeline: &mut Chart, confidence: &mut Chart) {
    // ---
    let (labels, counts): (Vec<String>, Vec<u32>) =
        detections.detections_by_day().into_iter().unzip();
    timeline.set_labels(labels);
    timeline.set_data(counts);
    timeline.update();

    let ConfidenceSplit { high, warning } = detections.confidence_split();
    confidence.set_data(vec![high, warning]);
    confidence.update();
}
