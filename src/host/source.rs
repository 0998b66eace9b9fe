use std::fs;
use std::io::{self, BufRead};
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use std::thread;

use anyhow::{Context, Result};

use super::message::{InboundMessage, parse_inbound};
use super::settings::SettingsPatch;
use super::snapshot::GraphSnapshot;

pub type HostEvent = Result<InboundMessage, String>;

fn load_snapshot(path: &Path) -> Result<GraphSnapshot> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read graph snapshot {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("invalid graph snapshot JSON in {}", path.display()))
}

pub fn load_settings(path: &Path) -> Result<SettingsPatch> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read settings {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("invalid settings JSON in {}", path.display()))
}

pub fn spawn_snapshot_loader(
    path: PathBuf,
    tx: Sender<HostEvent>,
    wake: impl Fn() + Send + 'static,
) {
    thread::spawn(move || {
        let result = load_snapshot(&path)
            .map(InboundMessage::Update)
            .map_err(|error| format!("{error:#}"));
        if tx.send(result).is_ok() {
            wake();
        }
    });
}

pub fn spawn_stdin_reader(tx: Sender<HostEvent>, wake: impl Fn() + Send + 'static) {
    thread::spawn(move || forward_lines(io::stdin().lock(), &tx, wake));
}

fn forward_lines(reader: impl BufRead, tx: &Sender<HostEvent>, wake: impl Fn()) {
    for line in reader.lines() {
        let line = match line {
            Ok(line) => line,
            Err(error) => {
                log::warn!("stopped reading host messages: {error}");
                break;
            }
        };
        if line.trim().is_empty() {
            continue;
        }

        let event = parse_inbound(&line).map_err(|error| {
            log::warn!("skipping host message: {error:#}");
            format!("skipped host message: {error:#}")
        });
        if tx.send(event).is_err() {
            break;
        }
        wake();
    }
    log::debug!("host message stream closed");
}
