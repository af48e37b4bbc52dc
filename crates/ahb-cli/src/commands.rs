use std::io::{self, IsTerminal};
use std::path::Path;

use ahb_diff::{align, summarize};
use ahb_ingest::{
    MatchedFile, VersionPair, all_pairs, available_pruefids, consecutive_pairs, find_pruefid_file,
    format_versions, load_pair, matching_files, message_format_dirs,
};
use ahb_output::{ComparisonKey, ComparisonStore, ExportOptions, TableLayout, write_outputs};
use anyhow::{Context, Result, bail};
use comfy_table::Table;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{error, info, info_span};

use crate::cli::{BatchArgs, CompareArgs, VersionsArgs};
use crate::summary::{apply_table_style, header_cell};
use crate::types::{BatchResult, UnitSummary};

const PROGRESS_TEMPLATE: &str = "{bar:40.cyan/blue} {pos}/{len} {msg}";

pub fn run_batch(args: &BatchArgs) -> Result<BatchResult> {
    let root = args.input.root();
    let options = ExportOptions::new(args.format.into());
    let pairs = if args.all_pairs {
        all_pairs(&root)
    } else {
        consecutive_pairs(&root)
    }
    .with_context(|| format!("discover format versions in {}", root.display()))?;
    info!(root = %root.display(), pairs = pairs.len(), "discovered format version pairs");

    let mut store = match &args.db {
        Some(path) => Some(
            ComparisonStore::open(path)
                .with_context(|| format!("open database {}", path.display()))?,
        ),
        None => None,
    };

    let mut result = BatchResult {
        output_dir: args.output_dir.clone(),
        database: args.db.clone(),
        ..BatchResult::default()
    };

    let mut units = Vec::new();
    for pair in &pairs {
        match matching_files(&root, pair) {
            Ok(files) => units.extend(files.into_iter().map(|file| (pair, file))),
            Err(err) => {
                error!(
                    previous = %pair.previous,
                    subsequent = %pair.subsequent,
                    error = %err,
                    "failed to list matching files"
                );
                result
                    .errors
                    .push(format!("{}: {err}", pair.dir_name()));
            }
        }
    }

    let progress = progress_bar(units.len());
    for (pair, file) in units {
        let span = info_span!(
            "unit",
            previous = %pair.previous,
            subsequent = %pair.subsequent,
            message_format = %file.message_format,
            pruefid = %file.pruefid
        );
        let _guard = span.enter();
        progress.set_message(format!("{} {}", pair.dir_name(), file.pruefid));
        match compare_unit(pair, &file, &args.output_dir, &options, store.as_mut()) {
            Ok(unit) => result.units.push(unit),
            Err(err) => {
                error!(error = %format!("{err:#}"), "comparison failed, continuing");
                result.errors.push(format!(
                    "{} {}/{}: {err:#}",
                    pair.dir_name(),
                    file.message_format,
                    file.pruefid
                ));
            }
        }
        progress.inc(1);
    }
    progress.finish_and_clear();

    info!(
        units = result.units.len(),
        failed = result.errors.len(),
        "batch finished"
    );
    Ok(result)
}

/// Compares one matched pruefid of a version pair and writes its outputs.
fn compare_unit(
    pair: &VersionPair,
    file: &MatchedFile,
    output_root: &Path,
    options: &ExportOptions,
    store: Option<&mut ComparisonStore>,
) -> Result<UnitSummary> {
    let previous_version = pair.previous.as_str();
    let subsequent_version = pair.subsequent.as_str();
    let (previous, subsequent) = load_pair(
        &file.previous_path,
        &file.subsequent_path,
        previous_version,
        subsequent_version,
    )?;
    let comparisons = align(&previous, &subsequent);
    let counts = summarize(&comparisons);

    let layout = TableLayout::new(previous_version, subsequent_version, &comparisons);
    let dir = output_root
        .join(pair.dir_name())
        .join(&file.message_format);
    let outputs = write_outputs(&dir, &file.pruefid, &layout, &comparisons, options)?;

    if let Some(store) = store {
        let key = ComparisonKey {
            pruefid: file.pruefid.clone(),
            previous_format_version: previous_version.to_string(),
            subsequent_format_version: subsequent_version.to_string(),
        };
        store.store_comparison(&key, &comparisons, &counts)?;
    }

    Ok(UnitSummary {
        previous_format_version: previous_version.to_string(),
        subsequent_format_version: subsequent_version.to_string(),
        message_format: file.message_format.clone(),
        pruefid: file.pruefid.clone(),
        counts,
        outputs,
    })
}

pub fn run_compare(args: &CompareArgs) -> Result<UnitSummary> {
    if args.previous == args.subsequent {
        bail!(
            "cannot compare pruefid {} of {} with itself",
            args.previous.pruefid,
            args.previous.format_version
        );
    }
    let root = args.input.root();
    let previous_version = args.previous.format_version.as_str();
    let subsequent_version = args.subsequent.format_version.as_str();
    let span = info_span!(
        "compare",
        previous = %args.previous.format_version,
        previous_pruefid = %args.previous.pruefid,
        subsequent = %args.subsequent.format_version,
        subsequent_pruefid = %args.subsequent.pruefid
    );
    let _guard = span.enter();

    let previous_file = find_pruefid_file(&root, &args.previous.format_version, &args.previous.pruefid)?
        .with_context(|| {
            format!(
                "pruefid {} not found in {}",
                args.previous.pruefid, previous_version
            )
        })?;
    let subsequent_file =
        find_pruefid_file(&root, &args.subsequent.format_version, &args.subsequent.pruefid)?
            .with_context(|| {
                format!(
                    "pruefid {} not found in {}",
                    args.subsequent.pruefid, subsequent_version
                )
            })?;

    let (previous, subsequent) = load_pair(
        &previous_file.path,
        &subsequent_file.path,
        previous_version,
        subsequent_version,
    )?;
    let comparisons = align(&previous, &subsequent);
    let counts = summarize(&comparisons);
    let layout = TableLayout::new(previous_version, subsequent_version, &comparisons);
    let stem = format!("{}_{}", args.previous.pruefid, args.subsequent.pruefid);
    let outputs = write_outputs(
        &args.output_dir,
        &stem,
        &layout,
        &comparisons,
        &ExportOptions::new(args.format.into()),
    )?;

    let message_format = if previous_file.message_format == subsequent_file.message_format {
        previous_file.message_format
    } else {
        format!(
            "{}/{}",
            previous_file.message_format, subsequent_file.message_format
        )
    };
    Ok(UnitSummary {
        previous_format_version: previous_version.to_string(),
        subsequent_format_version: subsequent_version.to_string(),
        message_format,
        pruefid: stem,
        counts,
        outputs,
    })
}

pub fn run_versions(args: &VersionsArgs) -> Result<()> {
    let root = args.input.root();
    let mut table = Table::new();
    apply_table_style(&mut table);
    match &args.format_version {
        Some(version) => {
            let pruefids = available_pruefids(&root, version)
                .with_context(|| format!("list pruefids of {version}"))?;
            if pruefids.is_empty() {
                bail!("no pruefids found for {version} in {}", root.display());
            }
            table.set_header(vec![header_cell("Pruefid")]);
            for pruefid in pruefids {
                table.add_row(vec![pruefid]);
            }
        }
        None => {
            let versions = format_versions(&root)
                .with_context(|| format!("list format versions in {}", root.display()))?;
            table.set_header(vec![header_cell("Format version"), header_cell("Message formats")]);
            for version in versions {
                let formats = message_format_dirs(&root.join(version.as_str()))?
                    .iter()
                    .filter_map(|dir| dir.file_name().and_then(|name| name.to_str()))
                    .collect::<Vec<_>>()
                    .join(", ");
                table.add_row(vec![version.to_string(), formats]);
            }
        }
    }
    println!("{table}");
    Ok(())
}

fn progress_bar(len: usize) -> ProgressBar {
    if !io::stderr().is_terminal() {
        return ProgressBar::hidden();
    }
    let bar = ProgressBar::new(len as u64);
    if let Ok(style) = ProgressStyle::with_template(PROGRESS_TEMPLATE) {
        bar.set_style(style.progress_chars("=> "));
    }
    bar
}
