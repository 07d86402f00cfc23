//! Soundweld command-line driver
//!
//! Decodes the given sources, applies manifest trims and ordering,
//! validates the set, and writes the final artifacts:
//!
//!   soundweld intro.mp3 verse.wav outro.mp3 --mp3
//!   soundweld --manifest mix.json --out-dir renders

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use log::{error, info};
use serde::Deserialize;

use sw_render::{MediaKind, MixArtifact, MixSession};

#[derive(Parser)]
#[command(
    name = "soundweld",
    version,
    about = "Assemble audio clips into one continuous track"
)]
struct Args {
    /// Source files (.wav / .mp3), mixed full-range in the given order
    files: Vec<PathBuf>,

    /// JSON mix manifest describing clips, trims, and ordering
    #[arg(long, conflicts_with = "files")]
    manifest: Option<PathBuf>,

    /// Directory the artifacts are written to
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,

    /// Also render the compressed artifact
    #[arg(long)]
    mp3: bool,
}

/// One manifest entry. Omitted fields keep the defaults a freshly added
/// clip gets: full range and positional order.
#[derive(Debug, Deserialize, PartialEq)]
struct ManifestClip {
    path: PathBuf,
    start: Option<f64>,
    end: Option<f64>,
    order: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct Manifest {
    clips: Vec<ManifestClip>,
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    match run(&args) {
        Ok(code) => code,
        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<ExitCode> {
    let entries = collect_entries(args)?;
    if entries.is_empty() {
        error!("no input files given");
        return Ok(ExitCode::FAILURE);
    }

    let mut session = MixSession::new();
    for entry in &entries {
        // One bad file never aborts the batch
        if let Err(e) = add_entry(&mut session, entry) {
            error!("skipping {}: {e}", entry.path.display());
        }
    }

    if session.clips().is_empty() {
        error!("no sources could be decoded");
        return Ok(ExitCode::FAILURE);
    }

    let violations = session.validate();
    if !violations.is_empty() {
        for violation in &violations {
            error!("{violation}");
        }
        return Ok(ExitCode::FAILURE);
    }

    info!(
        "{} clips, {} total",
        session.clips().len(),
        format_duration(session.total_trimmed_secs())
    );

    let wav = session.generate_wav()?;
    write_artifact(&args.out_dir, &wav)?;

    if args.mp3 {
        let mp3 = session.generate_mp3(|percent| {
            eprint!("\rencoding mp3... {percent:3}%");
        })?;
        eprintln!();
        write_artifact(&args.out_dir, &mp3)?;
    }

    Ok(ExitCode::SUCCESS)
}

/// Resolve the clip list from the manifest or from bare file arguments
fn collect_entries(args: &Args) -> Result<Vec<ManifestClip>> {
    match &args.manifest {
        Some(path) => load_manifest(path),
        None => Ok(args
            .files
            .iter()
            .map(|path| ManifestClip {
                path: path.clone(),
                start: None,
                end: None,
                order: None,
            })
            .collect()),
    }
}

fn load_manifest(path: &Path) -> Result<Vec<ManifestClip>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read manifest {}", path.display()))?;
    let manifest: Manifest = serde_json::from_str(&content)
        .with_context(|| format!("failed to parse manifest {}", path.display()))?;
    Ok(manifest.clips)
}

/// Decode one entry into the session and apply its overrides
fn add_entry(session: &mut MixSession, entry: &ManifestClip) -> Result<()> {
    let kind = MediaKind::from_path(&entry.path)?;
    let bytes =
        fs::read(&entry.path).with_context(|| format!("failed to read {}", entry.path.display()))?;

    let name = entry
        .path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| entry.path.display().to_string());

    let id = session.add_source(&name, bytes, kind)?;

    if let Some(clip) = session.clip_mut(id) {
        let start = entry.start.unwrap_or(clip.start_time);
        let end = entry.end.unwrap_or(clip.end_time);
        clip.set_range(start, end);
        if let Some(order) = entry.order {
            clip.order = order;
        }
    }

    Ok(())
}

fn write_artifact(out_dir: &Path, artifact: &MixArtifact) -> Result<PathBuf> {
    fs::create_dir_all(out_dir)
        .with_context(|| format!("failed to create {}", out_dir.display()))?;
    let path = out_dir.join(artifact.kind.file_name());
    fs::write(&path, &artifact.bytes)
        .with_context(|| format!("failed to write {}", path.display()))?;
    info!("wrote {} ({} bytes)", path.display(), artifact.bytes.len());
    Ok(path)
}

/// Render seconds as `m:ss.cc`
fn format_duration(seconds: f64) -> String {
    let mins = (seconds / 60.0).floor() as u64;
    let secs = (seconds % 60.0).floor() as u64;
    let centis = ((seconds % 1.0) * 100.0).floor() as u64;
    format!("{mins}:{secs:02}.{centis:02}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(0.0), "0:00.00");
        assert_eq!(format_duration(65.5), "1:05.50");
        assert_eq!(format_duration(3.25), "0:03.25");
        assert_eq!(format_duration(600.0), "10:00.00");
    }

    #[test]
    fn test_manifest_parses_with_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{
                "clips": [
                    {{ "path": "a.wav" }},
                    {{ "path": "b.mp3", "start": 1.0, "end": 3.5, "order": 1 }}
                ]
            }}"#
        )
        .unwrap();

        let clips = load_manifest(file.path()).unwrap();
        assert_eq!(clips.len(), 2);
        assert_eq!(
            clips[0],
            ManifestClip {
                path: PathBuf::from("a.wav"),
                start: None,
                end: None,
                order: None,
            }
        );
        assert_eq!(clips[1].start, Some(1.0));
        assert_eq!(clips[1].end, Some(3.5));
        assert_eq!(clips[1].order, Some(1));
    }

    #[test]
    fn test_manifest_rejects_malformed_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        assert!(load_manifest(file.path()).is_err());
    }

    #[test]
    fn test_bare_files_become_full_range_entries() {
        let args = Args::parse_from(["soundweld", "a.wav", "b.mp3"]);
        let entries = collect_entries(&args).unwrap();
        assert_eq!(entries.len(), 2);
        assert!(entries.iter().all(|e| e.start.is_none() && e.order.is_none()));
    }
}
