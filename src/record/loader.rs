use crate::config::{Config, MetadataFormat};
use crate::error::{Error, Result};
use crate::record::flatten::flatten;
use crate::record::schema::Schema;
use crate::record::types::Record;
use crate::utils::progress::{ProgressBar, ProgressStyle};
use globset::{GlobBuilder, GlobMatcher};
use ignore::WalkBuilder;
use rayon::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

/// Load every metadata file under `config.data_dir`
pub fn load_records(config: &Config) -> Result<Vec<Record>> {
    load_records_with_progress(config, true)
}

/// Load records, optionally drawing a progress bar on stderr
///
/// Files are parsed in parallel. The first failing file aborts the load;
/// no partial record set is ever returned.
pub fn load_records_with_progress(config: &Config, silent: bool) -> Result<Vec<Record>> {
    let schema = Schema::load(&config.schema)?;
    let paths = discover_files(config)?;
    log::debug!(
        "discovered {} metadata files in {}",
        paths.len(),
        config.data_dir.display()
    );

    let progress_bar = if !silent {
        let pb = ProgressBar::new(paths.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("█▓▒░  "),
        );
        pb.set_message("Loading records...");
        Some(pb)
    } else {
        None
    };

    let records: Result<Vec<Record>> = paths
        .par_iter()
        .map(|path| {
            let record = load_file(path, &schema, config.format);
            if let Some(ref pb) = progress_bar {
                pb.inc(1);
            }
            record
        })
        .collect();

    if let Some(pb) = progress_bar {
        match &records {
            Ok(records) => pb.finish_with_message(format!("Loaded {} records", records.len())),
            Err(_) => pb.finish_and_clear(),
        }
    }

    let records = records?;
    log::info!(
        "loaded {} records from {}",
        records.len(),
        config.data_dir.display()
    );
    Ok(records)
}

/// Find metadata files matching the configured format, sorted by path
pub fn discover_files(config: &Config) -> Result<Vec<PathBuf>> {
    let root = &config.data_dir;
    if !root.is_dir() {
        return Err(Error::DataDirNotFound(root.clone()));
    }

    let matcher = extension_matcher(config.format)?;
    let walker = WalkBuilder::new(root)
        .hidden(true)
        .git_ignore(false)
        .git_global(false)
        .git_exclude(false)
        .ignore(false)
        .parents(false)
        .max_depth(if config.recursive { None } else { Some(1) })
        .build();

    let mut paths = Vec::new();
    for entry in walker {
        let entry = entry.map_err(|e| Error::Walk {
            path: root.clone(),
            message: e.to_string(),
        })?;
        let path = entry.path();
        if !entry.file_type().is_some_and(|t| t.is_file()) {
            continue;
        }
        if path.file_name().is_some_and(|name| matcher.is_match(name)) {
            paths.push(path.to_path_buf());
        }
    }

    paths.sort();
    Ok(paths)
}

fn extension_matcher(format: MetadataFormat) -> Result<GlobMatcher> {
    let pattern = format!("*.{}", format.extension());
    GlobBuilder::new(&pattern)
        .case_insensitive(true)
        .literal_separator(true)
        .build()
        .map(|glob| glob.compile_matcher())
        .map_err(|e| Error::Walk {
            path: PathBuf::from(&pattern),
            message: e.to_string(),
        })
}

/// Parse, validate and flatten a single metadata file
pub fn load_file(path: &Path, schema: &Schema, format: MetadataFormat) -> Result<Record> {
    let document = parse_document(path, format)?;
    schema.validate(&document, path)?;
    let record = flatten(&document, path)?;
    log::debug!("loaded record {} from {}", record.identifier, path.display());
    Ok(record)
}

/// Read a metadata file into a JSON document
pub fn parse_document(path: &Path, format: MetadataFormat) -> Result<Value> {
    let raw = fs::read_to_string(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;

    match format {
        MetadataFormat::Toml => {
            let value: toml::Value = toml::from_str(&raw).map_err(|e| Error::Parse {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;
            Ok(toml_to_json(value))
        }
    }
}

/// Convert a TOML value to JSON; datetimes keep their TOML text form
fn toml_to_json(value: toml::Value) -> Value {
    match value {
        toml::Value::String(s) => Value::String(s),
        toml::Value::Integer(i) => Value::from(i),
        toml::Value::Float(f) => serde_json::Number::from_f64(f)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        toml::Value::Boolean(b) => Value::Bool(b),
        toml::Value::Datetime(dt) => Value::String(dt.to_string()),
        toml::Value::Array(items) => Value::Array(items.into_iter().map(toml_to_json).collect()),
        toml::Value::Table(table) => Value::Object(
            table
                .into_iter()
                .map(|(key, value)| (key, toml_to_json(value)))
                .collect(),
        ),
    }
}
