use anyhow::{Context, Result};
use ansr_lib::{
    io::csv as csv_io,
    pipeline::{Pipeline, PipelineConfig},
    plot::{
        row_bar_figure, rolling_score_figure, score_line_figure, Figure, PlotBackend, Series,
        REPLAY_GRAPH_WIDTH,
    },
    score::Weights,
    signal::ScoredTable,
};
use clap::{Parser, Subcommand, ValueEnum};
use log::debug;
use plotters::prelude::*;
use std::{
    ops::Range,
    path::{Path, PathBuf},
    thread,
    time::Duration,
};

#[derive(Parser)]
#[command(
    name = "ansr",
    version,
    about = "ANSR: windowed stress scoring for ECG/GSR/RESP recordings"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum ChartKind {
    /// One bar per measure for the current window
    Bar,
    /// Stress-score trace over the most recent windows
    Line,
}

#[derive(Subcommand)]
enum Commands {
    /// Score a whole recording and print the table as JSON
    Score {
        /// CSV recording with TIME, ECG, GSR, RESP columns
        #[arg(long)]
        data: PathBuf,
        #[arg(long, default_value_t = 512)]
        sample_rate: u32,
        #[arg(long, default_value_t = 10)]
        time_window: u32,
        /// Weights as "ECG=0.333,GSR=0.333,RESP=0.334" (default: equal thirds)
        #[arg(long)]
        weights: Option<String>,
        /// Also write the scored table as CSV
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Replay the scored windows one by one, as if they were arriving live
    Replay {
        #[arg(long)]
        data: PathBuf,
        #[arg(long, default_value_t = 512)]
        sample_rate: u32,
        #[arg(long, default_value_t = 10)]
        time_window: u32,
        #[arg(long)]
        weights: Option<String>,
        /// Pause between windows (milliseconds)
        #[arg(long, default_value_t = 100)]
        interval_ms: u64,
        #[arg(long, value_enum, default_value = "bar")]
        chart: ChartKind,
        /// Render one PNG per window here instead of printing JSON rows
        #[arg(long)]
        frames_dir: Option<PathBuf>,
    },
    /// Render the stress-score trace to a PNG
    Plot {
        #[arg(long)]
        data: PathBuf,
        #[arg(long, default_value_t = 512)]
        sample_rate: u32,
        #[arg(long, default_value_t = 10)]
        time_window: u32,
        #[arg(long)]
        weights: Option<String>,
        #[arg(long)]
        out: PathBuf,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    match cli.command {
        Commands::Score {
            data,
            sample_rate,
            time_window,
            weights,
            out,
        } => cmd_score(data, sample_rate, time_window, weights.as_deref(), out.as_deref())?,
        Commands::Replay {
            data,
            sample_rate,
            time_window,
            weights,
            interval_ms,
            chart,
            frames_dir,
        } => cmd_replay(
            data,
            sample_rate,
            time_window,
            weights.as_deref(),
            interval_ms,
            chart,
            frames_dir.as_deref(),
        )?,
        Commands::Plot {
            data,
            sample_rate,
            time_window,
            weights,
            out,
        } => cmd_plot(data, sample_rate, time_window, weights.as_deref(), &out)?,
    }
    Ok(())
}

fn run_pipeline(
    data: PathBuf,
    sample_rate: u32,
    time_window: u32,
    weights: Option<&str>,
) -> Result<ScoredTable> {
    let weights = parse_weights(weights)?;
    let config = PipelineConfig {
        data_path: data,
        sample_rate,
        time_window,
    };
    let pipeline = Pipeline::new(config)?.with_weights(weights);
    Ok(pipeline.run()?)
}

fn parse_weights(arg: Option<&str>) -> Result<Weights> {
    let raw = match arg {
        Some(raw) => raw,
        None => return Ok(Weights::default()),
    };
    let mut entries = Vec::new();
    for part in raw.split(',') {
        let (name, value) = part
            .split_once('=')
            .with_context(|| format!("weight '{}' is not NAME=VALUE", part))?;
        let value: f64 = value.trim().parse().with_context(|| {
            format!(
                "weight {} has a non-numeric value '{}'",
                name.trim(),
                value.trim()
            )
        })?;
        entries.push((name.trim().to_string(), value));
    }
    Ok(Weights::from_entries(&entries)?)
}

fn cmd_score(
    data: PathBuf,
    sample_rate: u32,
    time_window: u32,
    weights: Option<&str>,
    out: Option<&Path>,
) -> Result<()> {
    let table = run_pipeline(data, sample_rate, time_window, weights)?;
    if let Some(path) = out {
        csv_io::write_scored_csv(path, &table)?;
    }
    println!("{}", serde_json::to_string(&table)?);
    Ok(())
}

fn cmd_replay(
    data: PathBuf,
    sample_rate: u32,
    time_window: u32,
    weights: Option<&str>,
    interval_ms: u64,
    chart: ChartKind,
    frames_dir: Option<&Path>,
) -> Result<()> {
    let table = run_pipeline(data, sample_rate, time_window, weights)?;
    if let Some(dir) = frames_dir {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("creating frames dir {}", dir.display()))?;
    }
    for (index, row) in table.rows().enumerate() {
        match frames_dir {
            Some(dir) => {
                let fig = match chart {
                    ChartKind::Bar => row_bar_figure(&row),
                    ChartKind::Line => rolling_score_figure(&table, index, REPLAY_GRAPH_WIDTH),
                };
                let frame = dir.join(format!("frame_{:04}.png", index));
                debug!("rendering {}", frame.display());
                PngBackend::new(frame).draw(&fig)?;
            }
            None => println!("{}", serde_json::to_string(&row)?),
        }
        thread::sleep(Duration::from_millis(interval_ms));
    }
    Ok(())
}

fn cmd_plot(
    data: PathBuf,
    sample_rate: u32,
    time_window: u32,
    weights: Option<&str>,
    out: &Path,
) -> Result<()> {
    let table = run_pipeline(data, sample_rate, time_window, weights)?;
    let fig = score_line_figure(&table);
    PngBackend::new(out.to_path_buf()).draw(&fig)?;
    Ok(())
}

/// Renders figures to PNG files via plotters.
struct PngBackend {
    path: PathBuf,
    size: (u32, u32),
}

impl PngBackend {
    fn new(path: PathBuf) -> Self {
        Self {
            path,
            size: (800, 480),
        }
    }
}

impl PlotBackend for PngBackend {
    fn draw(&mut self, fig: &Figure) -> Result<()> {
        let root = BitMapBackend::new(&self.path, self.size).into_drawing_area();
        root.fill(&WHITE)?;
        let (x_range, y_range) = figure_ranges(fig);
        let mut chart = ChartBuilder::on(&root)
            .margin(10)
            .caption(
                fig.title.clone().unwrap_or_else(|| "ANSR".into()),
                ("sans-serif", 24),
            )
            .x_label_area_size(30)
            .y_label_area_size(40)
            .build_cartesian_2d(x_range, y_range)?;
        chart.configure_mesh().draw()?;
        for series in &fig.series {
            match series {
                Series::Line(line) => {
                    chart.draw_series(LineSeries::new(
                        line.points.iter().map(|p| (p[0], p[1])),
                        &rgb(line.style.color.0),
                    ))?;
                }
                Series::Bars(bars) => {
                    chart.draw_series(bars.values.iter().enumerate().map(|(i, &value)| {
                        let packed = bars.colors.get(i).map(|c| c.0).unwrap_or(0x000000);
                        Rectangle::new(
                            [(i as f64 + 0.25, 0.0), (i as f64 + 0.75, value)],
                            rgb(packed).filled(),
                        )
                    }))?;
                }
            }
        }
        root.present()?;
        Ok(())
    }
}

fn rgb(packed: u32) -> RGBColor {
    RGBColor(
        ((packed >> 16) & 0xFF) as u8,
        ((packed >> 8) & 0xFF) as u8,
        (packed & 0xFF) as u8,
    )
}

fn figure_ranges(fig: &Figure) -> (Range<f64>, Range<f64>) {
    let mut x_min = f64::INFINITY;
    let mut x_max = f64::NEG_INFINITY;
    let mut y_min = f64::INFINITY;
    let mut y_max = f64::NEG_INFINITY;
    for series in &fig.series {
        match series {
            Series::Line(line) => {
                for p in &line.points {
                    x_min = x_min.min(p[0]);
                    x_max = x_max.max(p[0]);
                    y_min = y_min.min(p[1]);
                    y_max = y_max.max(p[1]);
                }
            }
            Series::Bars(bars) => {
                x_min = x_min.min(0.0);
                x_max = x_max.max(bars.values.len() as f64);
                y_min = y_min.min(0.0);
                for &value in &bars.values {
                    y_max = y_max.max(value);
                }
            }
        }
    }
    if !x_min.is_finite() || !x_max.is_finite() {
        (x_min, x_max) = (0.0, 1.0);
    }
    if !y_min.is_finite() || !y_max.is_finite() {
        (y_min, y_max) = (0.0, 1.0);
    }
    if let Some([lo, hi]) = fig.y_range {
        (y_min, y_max) = (lo, hi);
    }
    // Degenerate ranges render as an empty chart; pad them out.
    if x_max - x_min < f64::EPSILON {
        x_max = x_min + 1.0;
    }
    if y_max - y_min < f64::EPSILON {
        y_max = y_min + 1.0;
    }
    (x_min..x_max, y_min..y_max)
}
