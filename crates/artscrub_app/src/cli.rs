// SPDX-License-Identifier: MIT OR Apache-2.0
//! Command line interface.

use crate::error::AppError;
use crate::playback::Session;
use crate::settings::{Settings, SETTINGS_FILE_NAME};
use artscrub_timeline::{Position, TrackKind};
use clap::{ArgAction, Parser, Subcommand};
use std::io::{BufWriter, Write};
use std::path::PathBuf;

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "artscrub")]
#[command(about = "Scrub keyframed artworks along a timeline and drag them into place")]
#[command(version)]
pub struct Cli {
    /// Settings file
    #[arg(short, long, global = true, default_value = SETTINGS_FILE_NAME)]
    pub config: PathBuf,

    /// Keyframe document, overrides the settings file
    #[arg(short, long, global = true)]
    pub data: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Write a settings file with default values
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// List the series in the document
    Inspect,

    /// Scrub across keyframe times and print one JSON line per frame
    Play {
        /// Start time (defaults to the first keyframe)
        #[arg(long, allow_negative_numbers = true)]
        from: Option<f32>,

        /// End time (defaults to the last keyframe); earlier than --from scrubs backwards
        #[arg(long, allow_negative_numbers = true)]
        to: Option<f32>,

        /// Frames rendered at each stop
        #[arg(long)]
        hold: Option<u32>,
    },

    /// Drag an artwork with the pointer and commit it to its first keyframe
    Drag {
        /// Scrub time to settle at before grabbing
        #[arg(long, allow_negative_numbers = true)]
        at: f32,

        /// Pointer press position, as X,Y
        #[arg(long, value_parser = parse_point, allow_hyphen_values = true)]
        grab: Position,

        /// Pointer release position, as X,Y
        #[arg(long, value_parser = parse_point, allow_hyphen_values = true)]
        release: Position,

        /// Pointer moves between press and release
        #[arg(long, default_value_t = 1)]
        steps: u32,

        /// Write the committed position back to the document
        #[arg(long)]
        save: bool,
    },

    /// Show the label of the artwork under the pointer
    Hover {
        /// Scrub time to settle at
        #[arg(long, allow_negative_numbers = true)]
        at: f32,

        /// Pointer position, as X,Y
        #[arg(value_parser = parse_point, allow_hyphen_values = true)]
        pointer: Position,
    },
}

/// Parse `X,Y` into a position
pub fn parse_point(s: &str) -> Result<Position, String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected X,Y but got '{s}'"))?;
    let x: f32 = x.trim().parse().map_err(|e| format!("invalid x '{x}': {e}"))?;
    let y: f32 = y.trim().parse().map_err(|e| format!("invalid y '{y}': {e}"))?;
    Ok(Position::new(x, y))
}

impl Cli {
    /// Settings file merged with command line overrides
    fn settings(&self) -> Result<Settings, AppError> {
        let mut settings = Settings::load_or_default(&self.config)?;
        if let Some(data) = &self.data {
            settings.data_path = data.clone();
        }
        Ok(settings)
    }

    /// Execute the selected command
    pub fn run(self) -> Result<(), AppError> {
        if let Command::Init { force } = self.command {
            if self.config.exists() && !force {
                return Err(AppError::AlreadyExists(self.config));
            }
            Settings::default().save(&self.config)?;
            tracing::info!("Wrote default settings to {:?}", self.config);
            return Ok(());
        }

        let mut session = Session::open(self.settings()?)?;
        let stdout = std::io::stdout();
        let mut out = BufWriter::new(stdout.lock());

        match self.command {
            Command::Init { .. } => {}
            Command::Inspect => {
                for summary in session.inspect() {
                    let range = summary
                        .time_range
                        .map(|(start, end)| format!("{start}..{end}"))
                        .unwrap_or_default();
                    let tracks: Vec<&str> = summary.tracks.iter().map(TrackKind::name).collect();
                    writeln!(
                        out,
                        "{}\t{} keyframes\t{}\t{}\t{}",
                        summary.id,
                        summary.keyframes,
                        range,
                        tracks.join(","),
                        if summary.draggable { "draggable" } else { "fixed" }
                    )?;
                }
            }
            Command::Play { from, to, hold } => {
                let frames = session.play(from, to, hold, &mut out)?;
                tracing::info!("Rendered {} frames", frames);
            }
            Command::Drag {
                at,
                grab,
                release,
                steps,
                save,
            } => {
                let outcome = session.drag(at, grab, release, steps)?;
                writeln!(
                    out,
                    "{}\tkeyframe 0 -> ({}, {})",
                    outcome.id, outcome.committed.x, outcome.committed.y
                )?;
                if save {
                    session.save()?;
                }
            }
            Command::Hover { at, pointer } => match session.hover(at, pointer) {
                Some(label) => writeln!(out, "{label}")?,
                None => writeln!(out, "nothing at ({}, {})", pointer.x, pointer.y)?,
            },
        }
        out.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_point() {
        assert_eq!(parse_point("3,-4.5"), Ok(Position::new(3.0, -4.5)));
        assert_eq!(parse_point(" -1 , 2 "), Ok(Position::new(-1.0, 2.0)));
        assert!(parse_point("3").is_err());
        assert!(parse_point("a,2").is_err());
    }

    #[test]
    fn test_parse_drag_with_negative_coordinates() {
        let cli = Cli::try_parse_from([
            "artscrub", "drag", "--at", "-2", "--grab", "-40,20", "--release", "10,-5", "--save",
        ])
        .unwrap();
        match cli.command {
            Command::Drag {
                at,
                grab,
                release,
                steps,
                save,
            } => {
                assert_eq!(at, -2.0);
                assert_eq!(grab, Position::new(-40.0, 20.0));
                assert_eq!(release, Position::new(10.0, -5.0));
                assert_eq!(steps, 1);
                assert!(save);
            }
            other => panic!("unexpected command {other:?}"),
        }
        assert_eq!(cli.config, PathBuf::from(SETTINGS_FILE_NAME));
    }

    #[test]
    fn test_global_overrides() {
        let cli = Cli::try_parse_from(["artscrub", "play", "--hold", "3", "-d", "other.json", "-vv"])
            .unwrap();
        assert_eq!(cli.data, Some(PathBuf::from("other.json")));
        assert_eq!(cli.verbose, 2);
        assert!(matches!(cli.command, Command::Play { hold: Some(3), .. }));
    }

    #[test]
    fn test_init_refuses_to_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join(SETTINGS_FILE_NAME);
        let path = config.to_str().unwrap();

        Cli::try_parse_from(["artscrub", "init", "-c", path]).unwrap().run().unwrap();
        assert_eq!(Settings::load(&config).unwrap(), Settings::default());

        let err = Cli::try_parse_from(["artscrub", "init", "-c", path])
            .unwrap()
            .run()
            .unwrap_err();
        assert!(matches!(err, AppError::AlreadyExists(_)));
        Cli::try_parse_from(["artscrub", "init", "--force", "-c", path])
            .unwrap()
            .run()
            .unwrap();
    }
}
