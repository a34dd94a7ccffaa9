use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};

use crate::constants::*;
use crate::manifest::{self, Order};
use crate::rotator::{FailurePolicy, RotatorOptions};

#[derive(Parser, Debug)]
#[command(name = "banner-rotator", version, about = "Crossfading background banner")]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Open a window and rotate through the banner images
    Show(ShowArgs),
    /// Write a JSON manifest listing the images of a directory
    Generate(GenerateArgs),
}

#[derive(Args, Debug)]
pub struct ImageSourceArgs {
    /// Directory containing the banner images
    #[arg(long, conflicts_with = "manifest", required_unless_present = "manifest")]
    pub dir: Option<PathBuf>,

    /// JSON manifest listing the banner images
    #[arg(long)]
    pub manifest: Option<PathBuf>,

    /// Shuffle images found with --dir instead of sorting them by name
    #[arg(long, requires = "dir")]
    pub shuffle: bool,
}

impl ImageSourceArgs {
    pub fn resolve(&self) -> Result<Vec<PathBuf>> {
        match (&self.dir, &self.manifest) {
            (Some(dir), _) => {
                let order = if self.shuffle { Order::Shuffled } else { Order::Sorted };
                manifest::scan_directory(dir, order)
                    .with_context(|| format!("loading images from {}", dir.display()))
            }
            (None, Some(path)) => manifest::read_manifest(path)
                .with_context(|| format!("loading manifest {}", path.display())),
            (None, None) => anyhow::bail!("either --dir or --manifest is required"),
        }
    }
}

#[derive(Args, Debug)]
pub struct ShowArgs {
    #[command(flatten)]
    pub source: ImageSourceArgs,

    /// Time between two image changes
    #[arg(
        long,
        default_value_t = ROTATE_INTERVAL_MS,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub interval_ms: u64,

    /// Duration of the crossfade
    #[arg(long, default_value_t = FADE_DURATION_MS)]
    pub fade_ms: u64,

    /// What to do when an image cannot be loaded
    #[arg(long, value_enum, default_value_t = FailurePolicy::Stall)]
    pub on_failure: FailurePolicy,

    /// Give up on a preload after this long (treated as a failure)
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub load_timeout_ms: Option<u64>,

    #[arg(
        long,
        default_value_t = WINDOW_WIDTH,
        value_parser = clap::value_parser!(i32).range(1..)
    )]
    pub width: i32,

    #[arg(
        long,
        default_value_t = WINDOW_HEIGHT,
        value_parser = clap::value_parser!(i32).range(1..)
    )]
    pub height: i32,

    #[arg(long, default_value_t = FPS)]
    pub fps: u32,
}

impl ShowArgs {
    pub fn interval(&self) -> f32 {
        self.interval_ms as f32 / 1000.0
    }

    pub fn rotator_options(&self) -> RotatorOptions {
        RotatorOptions {
            fade_duration: self.fade_ms as f32 / 1000.0,
            failure_policy: self.on_failure,
            load_timeout: self.load_timeout_ms.map(|ms| ms as f32 / 1000.0),
        }
    }
}

#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Directory containing the banner images
    #[arg(long)]
    pub dir: PathBuf,

    /// Manifest file to write
    #[arg(long, short)]
    pub output: PathBuf,

    /// Keep name order instead of shuffling
    #[arg(long)]
    pub sorted: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn show_defaults_match_constants() {
        let cli = Cli::try_parse_from(["banner-rotator", "show", "--dir", "banners"]).unwrap();
        let Command::Show(args) = cli.command else {
            panic!("expected show");
        };
        assert_eq!(args.interval(), 5.0);
        let options = args.rotator_options();
        assert_eq!(options.fade_duration, 1.0);
        assert_eq!(options.failure_policy, FailurePolicy::Stall);
        assert!(options.load_timeout.is_none());
        assert!(!cli.verbose);
    }

    #[test]
    fn show_accepts_overrides() {
        let cli = Cli::try_parse_from([
            "banner-rotator", "-v", "show", "--manifest", "list.json",
            "--interval-ms", "2500", "--fade-ms", "0",
            "--on-failure", "skip", "--load-timeout-ms", "1500",
        ])
        .unwrap();
        assert!(cli.verbose);
        let Command::Show(args) = cli.command else {
            panic!("expected show");
        };
        assert_eq!(args.source.manifest, Some(PathBuf::from("list.json")));
        let options = args.rotator_options();
        assert_eq!(args.interval(), 2.5);
        assert_eq!(options.fade_duration, 0.0);
        assert_eq!(options.failure_policy, FailurePolicy::Skip);
        assert_eq!(options.load_timeout, Some(1.5));
    }

    fn parses(args: &[&str]) -> bool {
        let mut argv = vec!["banner-rotator", "show"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).is_ok()
    }

    #[test]
    fn show_needs_exactly_one_image_source() {
        assert!(!parses(&[]));
        assert!(!parses(&["--dir", "a", "--manifest", "b.json"]));
        assert!(!parses(&["--manifest", "b.json", "--shuffle"]));
    }

    #[test]
    fn zero_interval_is_rejected() {
        assert!(!parses(&["--dir", "a", "--interval-ms", "0"]));
        assert!(!parses(&["--dir", "a", "--load-timeout-ms", "0"]));
        assert!(!parses(&["--dir", "a", "--width", "0"]));
        assert!(parses(&["--dir", "a", "--interval-ms", "1"]));
        // An instant cut is a valid crossfade.
        assert!(parses(&["--dir", "a", "--fade-ms", "0"]));
    }

    #[test]
    fn generate_shuffles_unless_sorted() {
        let argv = ["banner-rotator", "generate", "--dir", "img", "-o", "out.json"];
        let cli = Cli::try_parse_from(argv).unwrap();
        let Command::Generate(args) = cli.command else {
            panic!("expected generate");
        };
        assert!(!args.sorted);
        assert_eq!(args.output, PathBuf::from("out.json"));
    }

    #[test]
    fn resolve_reads_the_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("x.jpg"), b"").unwrap();
        let source = ImageSourceArgs {
            dir: Some(dir.path().to_path_buf()),
            manifest: None,
            shuffle: false,
        };
        assert_eq!(source.resolve().unwrap(), [dir.path().join("x.jpg")]);
    }
}
