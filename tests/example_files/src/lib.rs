use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

use dmxctl::{check_scene, SceneFile, Universe};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use walkdir::{DirEntry, WalkDir};

pub static EXAMPLE_FILES_DIR: Lazy<&Path> = Lazy::new(|| Path::new(env!("CARGO_MANIFEST_DIR")));
pub static EXAMPLES_DIR: Lazy<PathBuf> = Lazy::new(|| EXAMPLE_FILES_DIR.join("examples"));
pub static EXPECTED_TOML_PATH: Lazy<PathBuf> =
    Lazy::new(|| EXAMPLE_FILES_DIR.join("expected.toml"));
/// The instrument file all example scenes are checked against.
pub static RIG_PATH: Lazy<PathBuf> = Lazy::new(|| EXAMPLES_DIR.join("instruments/rig.yaml"));

/// Expected outputs, keyed by path relative to the examples directory.
pub type Expected = BTreeMap<String, ExpectedEntry>;

#[derive(Serialize, Deserialize, Debug)]
pub struct ExpectedEntry {
    pub comment: String,
    #[serde(flatten)]
    pub output_enum: OutputEnum,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq)]
#[serde(untagged)]
pub enum OutputEnum {
    Ok(SummaryInfo),
    Err(ErrorInfo),
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct ErrorInfo {
    pub error: String,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct SummaryInfo {
    pub summary: Vec<String>,
}

/// Instrument files are summarized as one line per instrument.
pub fn summarize_instruments(universe: &Universe) -> Vec<String> {
    universe
        .instruments()
        .iter()
        .map(|i| {
            let channels: Vec<String> = i.channels().iter().map(|c| c.key().to_string()).collect();
            format!("{} @{}: {}", i.name(), i.addr(), channels.join(", "))
        })
        .collect()
}

/// Scenes are summarized as the non-zero slots after loading them into a dark
/// rig.
pub fn summarize_frame(universe: &Universe) -> Vec<String> {
    universe
        .slots()
        .iter()
        .enumerate()
        .filter(|(_, &value)| value != 0)
        .map(|(addr, value)| format!("{addr}: {value:02X}"))
        .collect()
}

pub fn load_rig() -> Universe {
    Universe::from_path(&*RIG_PATH).unwrap()
}

/// Load an example file, as instrument file or scene depending on its
/// directory.
pub fn summarize(path: &Path) -> OutputEnum {
    let result = if path.starts_with(EXAMPLES_DIR.join("scenes")) {
        let mut rig = load_rig();
        SceneFile::from_path(path)
            .map_err(|e| e.to_string())
            .and_then(|scene| check_scene(&rig, &scene).map_err(|e| e.to_string()))
            .map(|plan| {
                plan.apply(&mut rig);
                summarize_frame(&rig)
            })
    } else {
        Universe::from_path(path)
            .map(|u| summarize_instruments(&u))
            .map_err(|e| e.to_string())
    };
    match result {
        Ok(summary) => OutputEnum::Ok(SummaryInfo { summary }),
        Err(error) => OutputEnum::Err(ErrorInfo { error }),
    }
}

pub fn parse_expected_toml() -> Expected {
    let expected_str = fs::read_to_string(&*EXPECTED_TOML_PATH).unwrap();
    toml::from_str(&expected_str).unwrap()
}

pub fn example_key(entry: &DirEntry) -> String {
    entry
        .path()
        .strip_prefix(&*EXAMPLES_DIR)
        .unwrap()
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

pub fn examples_iter() -> impl Iterator<Item = DirEntry> {
    WalkDir::new(&*EXAMPLES_DIR)
        .sort_by_file_name()
        .into_iter()
        .map(|result| result.unwrap())
        .filter(|entry| !entry.file_type().is_dir())
        .filter(|entry| {
            Path::new(entry.file_name())
                .extension()
                .map_or_else(|| false, |extension| extension == "yaml")
        })
}

pub fn summarized_examples_iter() -> impl Iterator<Item = (String, OutputEnum)> {
    examples_iter().map(|entry| (example_key(&entry), summarize(entry.path())))
}
