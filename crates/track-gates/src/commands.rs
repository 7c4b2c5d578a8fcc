//! Subcommand implementations

use crate::error::{CliError, Result};
use crate::settings::{InspectArgs, OutputArgs, Settings, SplitArgs};
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};
use track_gates_lib::{
    Config, Gate, Millis, Palette, Segmentation, SplitRequest, Track, format_timestamp, split_many,
    split_track,
};

/// Split result of one input file
#[derive(Debug, Serialize)]
pub struct SplitReport {
    pub file: PathBuf,
    #[serde(flatten)]
    pub segmentation: Segmentation,
}

/// Summary of one GPX file
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackSummary {
    pub file: PathBuf,
    pub points: usize,
    /// `{lat, lon}` of the south-west corner
    pub min: Option<LatLon>,
    /// `{lat, lon}` of the north-east corner
    pub max: Option<LatLon>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    /// Milliseconds between the first and last point
    pub duration: Millis,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<Vec<[f64; 2]>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LatLon {
    pub lat: f64,
    pub lon: f64,
}

/// Palette from `--palette`, else from the configuration file, else the default one
pub fn resolve_palette(settings: &Settings) -> Result<Palette> {
    if let Some(palette) = &settings.palette {
        return Ok(palette.clone());
    }
    match &settings.config {
        Some(path) => Ok(Config::load_from_file(path)
            .map_err(CliError::input(path))?
            .palette),
        None => Ok(Palette::default()),
    }
}

/// An input file: a bare GPX track or a JSON request with its own gates
enum Input {
    Gpx(Track),
    Request(Track, Vec<Gate>),
}

fn is_json(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}

fn load_input(path: &Path) -> Result<Input> {
    if is_json(path) {
        let (track, gates) = SplitRequest::load_from_file(path)
            .and_then(SplitRequest::validate)
            .map_err(CliError::input(path))?;
        Ok(Input::Request(track, gates))
    } else {
        let track = Track::load_from_file(path).map_err(CliError::input(path))?;
        Ok(Input::Gpx(track))
    }
}

/// Gates given on the command line plus those in `--gates-file`
fn collect_gates(args: &SplitArgs) -> Result<Vec<Gate>> {
    let mut gates = args.gates.clone();
    if let Some(path) = &args.gates_file {
        let file = std::fs::File::open(path).map_err(|e| CliError::input(path)(e.into()))?;
        let from_file: Vec<Gate> = serde_json::from_reader(std::io::BufReader::new(file))
            .map_err(|e| CliError::input(path)(e.into()))?;
        gates.extend(from_file);
    }
    if let Some(index) = gates.iter().position(|gate| !gate.is_finite()) {
        return Err(track_gates_lib::DataError::InvalidGate(format!(
            "Gate {index} has a non-finite coordinate"
        ))
        .into());
    }
    Ok(gates)
}

/// Split every input and report results in input order
///
/// GPX tracks share the command line gates and are split in parallel. JSON requests use
/// their own gates followed by the command line ones.
pub fn split(args: &SplitArgs, palette: &Palette) -> Result<Vec<SplitReport>> {
    let gates = collect_gates(args)?;
    tracing::info!("Splitting {} inputs with {} gates", args.inputs.len(), gates.len());

    let mut gpx_tracks = Vec::new();
    let mut gpx_slots = Vec::new();
    let mut results: Vec<Option<Segmentation>> = Vec::with_capacity(args.inputs.len());

    for (slot, path) in args.inputs.iter().enumerate() {
        match load_input(path)? {
            Input::Gpx(track) => {
                tracing::debug!("{}: {} points", path.display(), track.len());
                gpx_tracks.push(track);
                gpx_slots.push(slot);
                results.push(None);
            }
            Input::Request(track, mut request_gates) => {
                request_gates.extend_from_slice(&gates);
                tracing::debug!(
                    "{}: {} points, {} gates",
                    path.display(),
                    track.len(),
                    request_gates.len()
                );
                results.push(Some(split_track(track.points(), &request_gates, palette)));
            }
        }
    }

    if gates.is_empty() && !gpx_tracks.is_empty() {
        tracing::warn!("No gates given, GPX tracks will not be split");
    }
    let gpx_results = split_many(&gpx_tracks, &gates, palette);
    for (slot, segmentation) in gpx_slots.into_iter().zip(gpx_results) {
        results[slot] = Some(segmentation);
    }

    Ok(args
        .inputs
        .iter()
        .cloned()
        .zip(results)
        .filter_map(|(file, segmentation)| {
            segmentation.map(|segmentation| SplitReport { file, segmentation })
        })
        .collect())
}

/// Summarize every input GPX file
pub fn inspect(args: &InspectArgs) -> Result<Vec<TrackSummary>> {
    args.inputs
        .iter()
        .map(|path| {
            let track = Track::load_from_file(path).map_err(CliError::input(path))?;
            summarize(path, &track, args.coordinates)
        })
        .collect()
}

fn summarize(path: &Path, track: &Track, coordinates: bool) -> Result<TrackSummary> {
    let bounds = track.bounds();
    let points = track.points();
    Ok(TrackSummary {
        file: path.to_path_buf(),
        points: track.len(),
        min: bounds.map(|b| LatLon {
            lat: b.min().y,
            lon: b.min().x,
        }),
        max: bounds.map(|b| LatLon {
            lat: b.max().y,
            lon: b.max().x,
        }),
        start_time: points.first().map(|p| format_timestamp(p.time)).transpose()?,
        end_time: points.last().map(|p| format_timestamp(p.time)).transpose()?,
        duration: track.duration(),
        coordinates: coordinates.then(|| track.coordinates()),
    })
}

/// Write a value as JSON to `--output` or stdout
pub fn write_json<T: Serialize>(value: &T, output: &OutputArgs) -> Result<()> {
    let mut writer: Box<dyn Write> = match &output.output {
        Some(path) => Box::new(std::io::BufWriter::new(std::fs::File::create(path)?)),
        None => Box::new(std::io::stdout().lock()),
    };

    if output.pretty {
        serde_json::to_writer_pretty(&mut writer, value)?;
    } else {
        serde_json::to_writer(&mut writer, value)?;
    }
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}
