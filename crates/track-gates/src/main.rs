mod commands;
mod error;
mod logging;
mod settings;

use settings::{Command, Settings};

fn run(settings: Settings) -> error::Result<()> {
    let palette = commands::resolve_palette(&settings)?;

    match &settings.command {
        Command::Split(args) => {
            let reports = commands::split(args, &palette)?;
            // A single input prints the bare segmentation
            match reports.as_slice() {
                [report] => commands::write_json(&report.segmentation, &args.output),
                _ => commands::write_json(&reports, &args.output),
            }
        }
        Command::Inspect(args) => {
            let summaries = commands::inspect(args)?;
            commands::write_json(&summaries, &args.output)
        }
        Command::Palette => {
            let stdout = settings::OutputArgs {
                output: None,
                pretty: true,
            };
            commands::write_json(&palette, &stdout)
        }
    }
}

fn main() {
    let settings = Settings::from_cli();
    logging::setup_logging(settings.verbose);

    if let Err(e) = run(settings) {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}
