use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, warn};
use rand::seq::SliceRandom;
use reqwest::blocking::Client;
use termphoto_render::{decode_frame, FrameSource, LoadError, LoadResult};
use walkdir::WalkDir;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FrameLocation {
    Remote(String),
    Local(PathBuf),
}

impl FrameLocation {
    fn label(&self) -> String {
        match self {
            FrameLocation::Remote(url) => url.clone(),
            FrameLocation::Local(path) => path.display().to_string(),
        }
    }
}

/// Turn one command line input into frame locations. Directories are walked
/// recursively in sorted order.
pub fn expand_input(input: &str) -> Vec<FrameLocation> {
    if input.starts_with("http://") || input.starts_with("https://") {
        return vec![FrameLocation::Remote(input.to_owned())];
    }

    let path = Path::new(input);
    if !path.is_dir() {
        return vec![FrameLocation::Local(path.to_path_buf())];
    }

    let mut entries: Vec<PathBuf> = WalkDir::new(path)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.path().to_path_buf())
        .collect();
    entries.sort();
    if entries.is_empty() {
        warn!("no files found in {}", path.display());
    }

    entries.into_iter().map(FrameLocation::Local).collect()
}

/// Loads queued photos one at a time, over HTTP or from disk.
pub struct FrameQueue {
    http: Client,
    locations: VecDeque<FrameLocation>,
}

impl FrameQueue {
    pub fn new(http: Client) -> Self {
        Self { http, locations: VecDeque::new() }
    }

    pub fn push_url(&mut self, url: String) {
        self.locations.push_back(FrameLocation::Remote(url));
    }

    pub fn extend(&mut self, locations: impl IntoIterator<Item = FrameLocation>) {
        self.locations.extend(locations);
    }

    pub fn shuffle(&mut self) {
        self.locations.make_contiguous().shuffle(&mut rand::thread_rng());
    }

    pub fn len(&self) -> usize {
        self.locations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    fn load(&self, location: &FrameLocation) -> LoadResult {
        let label = location.label();
        debug!("loading {label}");

        let bytes = match location {
            FrameLocation::Remote(url) => self
                .http
                .get(url)
                .send()
                .and_then(|response| response.error_for_status())
                .and_then(|response| response.bytes())
                .map(|bytes| bytes.to_vec())
                .map_err(|err| LoadError::fetch(label.as_str(), err))?,
            FrameLocation::Local(path) => {
                fs::read(path).map_err(|err| LoadError::fetch(label.as_str(), err))?
            },
        };

        decode_frame(&label, &bytes)
    }
}

impl FrameSource for FrameQueue {
    fn remaining(&self) -> Option<usize> {
        Some(self.locations.len())
    }

    fn next_frame(&mut self) -> Option<LoadResult> {
        let location = self.locations.pop_front()?;
        Some(self.load(&location))
    }
}
