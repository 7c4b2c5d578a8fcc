use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use track_gates_lib::{Gate, Palette};

#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
/// Track Gates - Split GPS tracks into timed segments at crossing gates
pub struct Settings {
    #[clap(subcommand)]
    pub command: Command,

    /// JSON configuration file (e.g. `{"palette": ["#ff0000", "#00ff00"]}`)
    #[clap(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Comma separated segment colors, overrides the configuration file
    #[clap(long, global = true, value_parser = parse_palette)]
    pub palette: Option<Palette>,

    /// Log debug output (RUST_LOG takes precedence)
    #[clap(short, long, global = true, default_value = "false")]
    pub verbose: bool,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Split GPX tracks or JSON split requests at gate crossings
    Split(SplitArgs),
    /// Summarize GPX tracks: point count, bounds and duration
    Inspect(InspectArgs),
    /// Print the effective segment palette
    Palette,
}

#[derive(Args, Debug, Clone)]
pub struct SplitArgs {
    /// GPX files, or `.json` files holding `{"points": [...], "checkPoints": [...]}`
    #[clap(required = true, value_name = "FILE")]
    pub inputs: Vec<PathBuf>,

    /// Gate as `lonA,latA,lonB,latB` (repeatable)
    #[clap(
        short,
        long = "gate",
        value_name = "GATE",
        value_parser = parse_gate,
        allow_hyphen_values = true
    )]
    pub gates: Vec<Gate>,

    /// JSON file with a list of `[lonA, latA, lonB, latB]` gates
    #[clap(long, value_name = "FILE")]
    pub gates_file: Option<PathBuf>,

    #[clap(flatten)]
    pub output: OutputArgs,
}

#[derive(Args, Debug, Clone)]
pub struct InspectArgs {
    /// GPX files to summarize
    #[clap(required = true, value_name = "FILE")]
    pub inputs: Vec<PathBuf>,

    /// Include the `[lon, lat]` coordinates of every point
    #[clap(long, default_value = "false")]
    pub coordinates: bool,

    #[clap(flatten)]
    pub output: OutputArgs,
}

#[derive(Args, Debug, Clone)]
pub struct OutputArgs {
    /// Write JSON here instead of stdout
    #[clap(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Pretty-print the JSON output
    #[clap(long, default_value = "false")]
    pub pretty: bool,
}

impl Settings {
    /// Parse the command line, exiting with usage help on error
    pub fn from_cli() -> Self {
        match Settings::try_parse() {
            Ok(args) => args,
            Err(e) => e.exit(),
        }
    }
}

fn parse_gate(value: &str) -> Result<Gate, String> {
    value.parse().map_err(|e| format!("{e}"))
}

fn parse_palette(value: &str) -> Result<Palette, String> {
    value.parse().map_err(|e| format!("{e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_split_command() {
        let settings = Settings::try_parse_from([
            "track-gates",
            "split",
            "run.gpx",
            "--gate",
            "-3.1,40.0,-3.1,40.1",
            "-g",
            "1,2,3,4",
            "--pretty",
        ])
        .unwrap();

        match settings.command {
            Command::Split(args) => {
                assert_eq!(args.inputs, vec![PathBuf::from("run.gpx")]);
                assert_eq!(
                    args.gates,
                    vec![Gate::new(-3.1, 40.0, -3.1, 40.1), Gate::new(1.0, 2.0, 3.0, 4.0)]
                );
                assert!(args.output.pretty);
                assert!(args.output.output.is_none());
            }
            other => panic!("unexpected command {other:?}"),
        }
        assert!(!settings.verbose);
    }

    #[test]
    fn test_global_palette_after_subcommand() {
        let settings =
            Settings::try_parse_from(["track-gates", "palette", "--palette", "red,blue"]).unwrap();
        assert_eq!(settings.palette.unwrap().colors(), &["red", "blue"]);
    }

    #[test]
    fn test_invalid_gate_is_rejected() {
        let result =
            Settings::try_parse_from(["track-gates", "split", "run.gpx", "--gate", "1,2,3"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_split_requires_inputs() {
        assert!(Settings::try_parse_from(["track-gates", "split"]).is_err());
    }

    #[test]
    fn test_parse_inspect_command() {
        let settings =
            Settings::try_parse_from(["track-gates", "-v", "inspect", "a.gpx", "--coordinates"])
                .unwrap();
        assert!(settings.verbose);
        match settings.command {
            Command::Inspect(args) => assert!(args.coordinates),
            other => panic!("unexpected command {other:?}"),
        }
    }
}
