//! Command-line interface.
//!
//! Turns arguments into a validated-shape [`MergeJob`] and prints progress in
//! the classic mp3cat style.

use std::cmp::Ordering;
use std::fs;
use std::path::{Path, PathBuf};

use clap::{ArgAction, Parser};

use crate::config::MergeConfig;
use crate::error::{IoStage, MergeError, Result};
use crate::merge::{MergeObserver, TracingObserver};
use crate::types::{MergeJob, MergeReport, MergeStats};

/// mp3-merge: join MP3 files frame by frame
#[derive(Parser, Debug)]
#[command(name = "mp3-merge")]
#[command(about = "Concatenate MP3 files, adding a VBR header and ID3 tag where needed")]
#[command(version)]
pub struct Cli {
    /// Input files, merged in the order given
    pub inputs: Vec<PathBuf>,

    /// Output file path (default: output.mp3, or MP3MERGE_OUTPUT)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Also merge every .mp3 file in this directory, in numeric-aware name order
    #[arg(short, long)]
    pub dir: Option<PathBuf>,

    /// Overwrite the output file if it already exists
    #[arg(short, long)]
    pub force: bool,

    /// Copy the ID3v2 tag of the first input file to the output
    #[arg(short, long)]
    pub tag: bool,

    /// Do not print progress lines
    #[arg(short, long)]
    pub quiet: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Print the merge report as JSON instead of progress lines
    #[arg(long)]
    pub json: bool,
}

impl Cli {
    /// Parses command-line arguments.
    pub fn parse_args() -> Self {
        Cli::parse()
    }

    /// Returns the effective output path.
    pub fn output_path(&self, config: &MergeConfig) -> PathBuf {
        self.output
            .clone()
            .unwrap_or_else(|| config.default_output.clone())
    }

    /// Returns true if progress lines should be printed.
    pub fn shows_progress(&self) -> bool {
        !self.quiet && !self.json
    }

    /// Builds the merge job from the arguments.
    ///
    /// Explicit inputs come first, followed by the directory's files. The job
    /// is not validated here; the merge does that before touching any file.
    pub fn to_job(&self, config: &MergeConfig) -> Result<MergeJob> {
        let output = self.output_path(config);
        let mut inputs = self.inputs.clone();
        if let Some(dir) = &self.dir {
            inputs.extend(list_mp3_files(dir, &output)?);
        }

        Ok(MergeJob::new(output, inputs)
            .with_overwrite(self.force)
            .with_tag(self.tag))
    }
}

/// Lists the `.mp3` files in `dir` in natural order, leaving out `exclude`.
pub fn list_mp3_files(dir: &Path, exclude: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir).map_err(|e| MergeError::io(IoStage::ListDirectory, dir, e))?;
    let exclude = exclude.canonicalize().ok();

    let mut files = Vec::new();
    for entry in entries {
        let path = entry
            .map_err(|e| MergeError::io(IoStage::ListDirectory, dir, e))?
            .path();
        let is_mp3 = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("mp3"));
        if !is_mp3 || !path.is_file() {
            continue;
        }
        if exclude.is_some() && path.canonicalize().ok() == exclude {
            continue;
        }
        files.push(path);
    }

    files.sort_by(|a, b| natural_cmp(&file_name(a), &file_name(b)));
    Ok(files)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Compares names so that embedded numbers sort by value: "2.mp3" < "10.mp3".
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let mut a = a.chars().peekable();
    let mut b = b.chars().peekable();

    loop {
        match (a.peek().copied(), b.peek().copied()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(x), Some(y)) if x.is_ascii_digit() && y.is_ascii_digit() => {
                let x = take_number(&mut a);
                let y = take_number(&mut b);
                // Compare by magnitude, then by digit count so "01" and "1" stay distinct.
                let ord = x
                    .trim_start_matches('0')
                    .len()
                    .cmp(&y.trim_start_matches('0').len())
                    .then_with(|| x.trim_start_matches('0').cmp(y.trim_start_matches('0')))
                    .then_with(|| x.len().cmp(&y.len()));
                if ord != Ordering::Equal {
                    return ord;
                }
            }
            (Some(x), Some(y)) => {
                if x != y {
                    return x.cmp(&y);
                }
                a.next();
                b.next();
            }
        }
    }
}

fn take_number(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) -> String {
    let mut digits = String::new();
    while let Some(c) = chars.next_if(|c| c.is_ascii_digit()) {
        digits.push(c);
    }
    digits
}

/// Prints progress lines to stdout and forwards events to `tracing`.
#[derive(Debug, Default)]
pub struct ConsoleObserver {
    tracing: TracingObserver,
}

impl MergeObserver for ConsoleObserver {
    fn input_started(&mut self, index: usize, path: &Path) {
        println!("+ {}", path.display());
        self.tracing.input_started(index, path);
    }

    fn input_finished(&mut self, index: usize, path: &Path, frames: u64) {
        self.tracing.input_finished(index, path, frames);
    }

    fn seek_header_added(&mut self, stats: &MergeStats) {
        println!("• Multiple bitrates detected. Adding VBR header.");
        self.tracing.seek_header_added(stats);
    }

    fn tag_added(&mut self, len: usize) {
        println!("• Adding ID3 tag.");
        self.tracing.tag_added(len);
    }

    fn finished(&mut self, report: &MergeReport) {
        println!("• {} files merged.", report.stats.input_files);
        self.tracing.finished(report);
    }
}
