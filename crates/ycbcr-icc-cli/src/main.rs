//! ycbcr-icc: write YCbCr ICC profiles for BT.709 / BT.601 video
//!
//! Exit status: 0 on success, 1 when the profile ID cannot be computed,
//! 2 when a file cannot be written, 3 for configuration or construction errors.

mod args;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use chrono::{Datelike, Timelike, Utc};
use clap::Parser;
use tracing_subscriber::EnvFilter;
use ycbcr_icc_core::icc::{DateTimeNumber, encode_rgb_profile};
use ycbcr_icc_core::{
    BuildConfig, BuildContext, DualDirectionBuilder, Error, IccSerializer, PrimaryProfileBuilder,
    ProfileMetadata, ProfileSerializer,
};

use args::Args;

const EXIT_CHECKSUM: u8 = 1;
const EXIT_PERSISTENCE: u8 = 2;
const EXIT_BUILD: u8 = 3;

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose);

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::from(exit_status(&err))
        }
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Map a failure onto the documented exit status
fn exit_status(err: &anyhow::Error) -> u8 {
    match err.downcast_ref::<Error>() {
        Some(Error::Checksum(_)) => EXIT_CHECKSUM,
        Some(Error::Persistence { .. }) => EXIT_PERSISTENCE,
        _ => EXIT_BUILD,
    }
}

fn load_config(args: &Args) -> anyhow::Result<BuildConfig> {
    let mut config = match &args.config {
        Some(path) => BuildConfig::from_json_file(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => BuildConfig::default(),
    };
    args.apply(&mut config).map_err(|e| Error::Config(e.to_string()))?;
    config.validate()?;
    Ok(config)
}

/// Metadata stamped with the current UTC time
fn metadata_for(config: &BuildConfig) -> ProfileMetadata {
    let now = Utc::now();
    ProfileMetadata {
        model: format!("ycbcr-icc {}", ycbcr_icc_core::VERSION),
        creation_date: DateTimeNumber::new(
            now.year().clamp(0, u16::MAX as i32) as u16,
            now.month() as u16,
            now.day() as u16,
            now.hour() as u16,
            now.minute() as u16,
            now.second() as u16,
        ),
        ..ProfileMetadata::for_config(config)
    }
}

fn run(args: &Args) -> anyhow::Result<()> {
    let config = load_config(args)?;
    if args.print_config {
        println!("{}", config.to_json_string()?);
        return Ok(());
    }

    let output = args
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(config.default_file_name()));
    let metadata = metadata_for(&config);
    generate(&config, metadata, &output, args.emit_base.as_deref())?;
    Ok(())
}

/// Build, fingerprint and write one profile, plus the base profile when asked
fn generate(
    config: &BuildConfig,
    metadata: ProfileMetadata,
    output: &Path,
    emit_base: Option<&Path>,
) -> ycbcr_icc_core::Result<()> {
    let ctx = BuildContext::new(u64::from(std::process::id()));
    let span = tracing::info_span!("generate", output = %output.display());
    let _enter = span.enter();

    let profile = DualDirectionBuilder::new(config.clone())
        .with_metadata(metadata.clone())
        .build(&ctx)?;

    let serializer = IccSerializer;
    let id = serializer.fingerprint(&profile)?;
    serializer.persist(&profile, &id, output)?;
    println!("{} {}", output.display(), id);

    if let Some(path) = emit_base {
        let base = PrimaryProfileBuilder::from_config(config).build(&ctx)?;
        let persistence = |source| Error::Persistence {
            path: path.to_path_buf(),
            source,
        };
        let data = encode_rgb_profile(&base, &metadata)
            .map_err(|e| persistence(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))?;
        std::fs::write(path, data).map_err(persistence)?;
        println!("{}", path.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ycbcr_icc_core::ConstructionError;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("ycbcr-icc-cli-{}-{name}", std::process::id()))
    }

    #[test]
    fn test_exit_status() {
        let checksum = anyhow::Error::from(Error::Checksum("x".into()));
        assert_eq!(exit_status(&checksum), EXIT_CHECKSUM);

        let persistence = anyhow::Error::from(Error::Persistence {
            path: PathBuf::from("/x"),
            source: std::io::Error::other("denied"),
        })
        .context("writing profile");
        assert_eq!(exit_status(&persistence), EXIT_PERSISTENCE);

        let construction = anyhow::Error::from(Error::from(ConstructionError::EmptyPipeline));
        assert_eq!(exit_status(&construction), EXIT_BUILD);
        assert_eq!(exit_status(&anyhow::anyhow!("other")), EXIT_BUILD);
    }

    #[test]
    fn test_invalid_config_is_build_error() {
        let args = Args::try_parse_from(["ycbcr-icc", "--tier", "extended", "--version", "v2"])
            .unwrap();
        let err = load_config(&args).unwrap_err();
        assert_eq!(exit_status(&err), EXIT_BUILD);

        let args = Args::try_parse_from(["ycbcr-icc", "--resolution", "1"]).unwrap();
        assert_eq!(exit_status(&load_config(&args).unwrap_err()), EXIT_BUILD);
    }

    #[test]
    fn test_config_file_with_override() {
        let path = temp_path("config.json");
        std::fs::write(&path, r#"{ "standard": "bt601", "resolution": 9 }"#).unwrap();
        let args = Args::try_parse_from([
            "ycbcr-icc",
            "--config",
            path.to_str().unwrap(),
            "--resolution",
            "17",
        ])
        .unwrap();
        let config = load_config(&args).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(config.standard, ycbcr_icc_core::Standard::Bt601);
        assert_eq!(config.resolution, 17);
    }

    #[test]
    fn test_generate_writes_both_profiles() {
        let output = temp_path("out.icc");
        let base = temp_path("base.icc");
        let config = BuildConfig {
            resolution: 5,
            ..Default::default()
        };
        generate(&config, metadata_for(&config), &output, Some(&base)).unwrap();

        let data = std::fs::read(&output).unwrap();
        let base_data = std::fs::read(&base).unwrap();
        std::fs::remove_file(&output).unwrap();
        std::fs::remove_file(&base).unwrap();

        assert_eq!(&data[16..20], b"YCbr");
        assert_eq!(&base_data[16..20], b"RGB ");
        assert_ne!(&data[24..26], &[0, 0]);
    }

    #[test]
    fn test_unwritable_output() {
        let config = BuildConfig {
            resolution: 3,
            ..Default::default()
        };
        let err = generate(
            &config,
            metadata_for(&config),
            Path::new("/nonexistent-dir/out.icc"),
            None,
        )
        .unwrap_err();
        assert_eq!(exit_status(&anyhow::Error::from(err)), EXIT_PERSISTENCE);
    }
}
