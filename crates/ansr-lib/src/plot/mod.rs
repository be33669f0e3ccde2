use serde::{Deserialize, Serialize};

use crate::signal::{ScoredRow, ScoredTable};

/// Vertical extent of replay frames; scores are normalized so a fixed
/// headroom keeps consecutive frames comparable.
pub const REPLAY_Y_MAX: f64 = 1.2;

/// How many recent windows the rolling line frame shows.
pub const REPLAY_GRAPH_WIDTH: usize = 20;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Axis {
    pub label: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Style {
    pub width: f32,
    pub color: Color,
}

#[derive(Debug, Copy, Clone, Serialize, Deserialize)]
pub struct Color(pub u32);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineSeries {
    pub name: String,
    pub points: Vec<[f64; 2]>,
    pub style: Style,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BarSeries {
    pub name: String,
    pub labels: Vec<String>,
    pub values: Vec<f64>,
    pub colors: Vec<Color>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Series {
    Line(LineSeries),
    Bars(BarSeries),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Figure {
    pub title: Option<String>,
    pub x: Axis,
    pub y: Axis,
    /// Fixed vertical range; backends autoscale when absent.
    pub y_range: Option<[f64; 2]>,
    pub series: Vec<Series>,
}

impl Figure {
    pub fn new(title: impl Into<Option<String>>) -> Self {
        Self {
            title: title.into(),
            x: Axis { label: None },
            y: Axis { label: None },
            y_range: None,
            series: Vec::new(),
        }
    }

    pub fn add_series(&mut self, series: Series) {
        self.series.push(series);
    }
}

pub trait PlotBackend {
    fn draw(&mut self, fig: &Figure) -> anyhow::Result<()>;
}

pub fn decimate_points(points: &[[f64; 2]], max_points: usize) -> Vec<[f64; 2]> {
    if points.len() <= max_points {
        return points.to_vec();
    }
    let bucket_size = points.len() as f64 / max_points as f64;
    let mut result = Vec::with_capacity(max_points);
    for i in 0..max_points {
        let start = (i as f64 * bucket_size).floor() as usize;
        if start >= points.len() {
            break;
        }
        result.push(points[start]);
    }
    result
}

/// Replay frame: one bar per measure for a single scored window.
pub fn row_bar_figure(row: &ScoredRow) -> Figure {
    let mut fig = Figure::new(Some("Real time data".into()));
    fig.y = Axis {
        label: Some("Normalized value".into()),
    };
    fig.y_range = Some([0.0, REPLAY_Y_MAX]);
    fig.add_series(Series::Bars(BarSeries {
        name: "measures".into(),
        labels: vec![
            "ECG".into(),
            "GSR".into(),
            "RESP".into(),
            "Stress_Score".into(),
        ],
        values: vec![row.ecg, row.gsr, row.resp, row.stress_score],
        colors: vec![
            Color(0xCC0000),
            Color(0x000000),
            Color(0x00AA00),
            Color(0x0044CC),
        ],
    }));
    fig
}

/// Replay frame: stress-score trace over the most recent `width` windows
/// ending at `end_row`.
pub fn rolling_score_figure(table: &ScoredTable, end_row: usize, width: usize) -> Figure {
    let end = end_row.min(table.window_count().saturating_sub(1));
    let start = (end + 1).saturating_sub(width.max(1));
    let points: Vec<[f64; 2]> = (start..=end)
        .filter_map(|i| table.row(i).map(|r| [i as f64, r.stress_score]))
        .collect();
    let mut fig = Figure::new(Some("Real time data".into()));
    fig.x = Axis {
        label: Some("Window".into()),
    };
    fig.y = Axis {
        label: Some("Stress score".into()),
    };
    fig.y_range = Some([0.0, REPLAY_Y_MAX]);
    fig.add_series(Series::Line(LineSeries {
        name: "Stress_Score".into(),
        points,
        style: Style {
            width: 2.0,
            color: Color(0x0044CC),
        },
    }));
    fig
}

/// Whole-recording stress-score trace.
pub fn score_line_figure(table: &ScoredTable) -> Figure {
    let points: Vec<[f64; 2]> = table
        .rows()
        .enumerate()
        .map(|(i, row)| [i as f64, row.stress_score])
        .collect();
    let decimated = decimate_points(&points, 1024);
    let mut fig = Figure::new(Some("Stress score".into()));
    fig.x = Axis {
        label: Some("Window".into()),
    };
    fig.y = Axis {
        label: Some("Stress score".into()),
    };
    fig.add_series(Series::Line(LineSeries {
        name: "Stress_Score".into(),
        points: decimated,
        style: Style {
            width: 2.0,
            color: Color(0x0044CC),
        },
    }));
    fig
}
