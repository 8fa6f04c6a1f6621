//! Cache rebuild runs
//!
//! Every run reads its lookups first, so fatal configuration and data
//! errors surface before any output is staged. Output is committed only
//! after the last row has been written.

use std::path::{Path, PathBuf};

use log::{debug, info};

use crate::core::bcp::{BcpFile, BcpRecord};
use crate::core::biotype::{self, BiotypeLookup};
use crate::core::companion::{self, AuditStamp};
use crate::core::config::Config;
use crate::core::emitter::{Emitter, QualifierKeys};
use crate::core::error::Result;
use crate::core::loader::{CandidateLoader, GenomicUniqueness};
use crate::core::par::ParExclusions;
use crate::core::placeholder::{self, Placeholders};
use crate::core::provider::SequenceCategory;
use crate::core::representative::{CuratedOverrides, Representatives, Selector, SequenceLinks};
use crate::core::source::DataSource;

/// Load date in the `MM/DD/YYYY` form the bulk loader expects
pub fn today() -> String {
    chrono::Local::now().format("%m/%d/%Y").to_string()
}

/// Settings shared by every cache build
#[derive(Debug, Clone)]
pub struct RunContext {
    pub config: Config,
    pub output_dir: PathBuf,
    pub table: String,
    pub delimiter: u8,
    pub load_date: String,
}

impl RunContext {
    pub fn new(config: Config, output_dir: impl Into<PathBuf>, table: impl Into<String>) -> Self {
        Self {
            config,
            output_dir: output_dir.into(),
            table: table.into(),
            delimiter: b'\t',
            load_date: today(),
        }
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn with_load_date(mut self, load_date: impl Into<String>) -> Self {
        self.load_date = load_date.into();
        self
    }

    pub fn output_path(&self) -> PathBuf {
        BcpFile::path_for(&self.output_dir, &self.table)
    }

    fn stamp(&self) -> AuditStamp {
        AuditStamp::new(self.config.user_key, self.load_date.clone())
    }
}

/// Summary of a marker cache rebuild
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MarkerRunStats {
    pub markers: usize,
    pub genomic: usize,
    pub transcript: usize,
    pub polypeptide: usize,
    pub biotype_markers: usize,
    pub conflicts: usize,
    pub unresolved_biotypes: usize,
    pub par_dropped: usize,
    pub rows_written: usize,
    pub output: PathBuf,
}

/// Summary of a companion cache rebuild
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableRunStats {
    pub rows_written: usize,
    pub output: PathBuf,
}

/// Summary of a placeholder sequence run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlaceholderRunStats {
    pub unmatched: usize,
    pub skipped: usize,
    /// Table name and output per written file
    pub tables: Vec<(String, TableRunStats)>,
}

impl PlaceholderRunStats {
    pub fn created(&self) -> usize {
        self.tables.first().map(|(_, t)| t.rows_written).unwrap_or(0)
    }
}

/// Run the selector over every marker of the annotation source
pub fn select_representatives<S: DataSource>(source: &S, config: &Config) -> Result<(usize, Representatives)> {
    info!("Initializing representative lookups");
    let uniqueness = GenomicUniqueness::from_rows(&source.genomic_markers()?);
    let links = SequenceLinks::from_rows(&source.sequence_assocs()?, &config.associations);
    let overrides = CuratedOverrides::from_rows(&source.overrides()?);
    if !overrides.is_empty() {
        info!("{} markers carry curated representative overrides", overrides.len());
    }

    let annotations = source.annotations()?;
    info!("Processing {} sequence annotations", annotations.len());

    let loader = CandidateLoader::new(config, &uniqueness);
    let selector = Selector::new(&links, &overrides);

    let mut markers = 0;
    let mut representatives = Representatives::default();
    for group in loader.groups(&annotations) {
        let candidates = group?;
        let set = selector.select(&candidates)?;
        representatives.insert(candidates.marker_key, set);
        markers += 1;
    }

    Ok((markers, representatives))
}

/// Rebuild the marker cache
pub fn build_marker_cache<S: DataSource>(source: &S, ctx: &RunContext, par_cleanup: bool) -> Result<MarkerRunStats> {
    let config = &ctx.config;

    info!("Initializing ...");
    let qualifiers = QualifierKeys::from_terms(&source.rep_qualifiers()?)?;
    let biotypes: BiotypeLookup = biotype::build_lookup(source, config)?;
    let exclusions = if par_cleanup {
        ParExclusions::from_rows(&source.par_features()?)
    } else {
        ParExclusions::default()
    };

    let (markers, representatives) = select_representatives(source, config)?;

    let cache_rows = source.cache_rows()?;
    info!("Writing bcp file ({} source rows)", cache_rows.len());

    let file = BcpFile::create(&ctx.output_dir, &ctx.table)?;
    let mut writer = file.writer(&ctx.table, ctx.delimiter)?;
    let mut emitter = Emitter::new(
        &representatives,
        &biotypes,
        qualifiers,
        config.conflict.clone(),
        ctx.load_date.clone(),
    );

    let mut par_dropped = 0;
    for row in &cache_rows {
        if exclusions.excludes(row.marker_key, row.sequence_key) {
            par_dropped += 1;
            continue;
        }
        writer.write(&emitter.emit(row))?;
    }
    let rows_written = writer.rows();
    writer.finish()?;
    let output = file.commit()?;

    if par_dropped > 0 {
        info!("PAR cleanup dropped {} rows", par_dropped);
    }
    debug!("Committed {}", output.display());

    Ok(MarkerRunStats {
        markers,
        genomic: representatives.count(SequenceCategory::Genomic),
        transcript: representatives.count(SequenceCategory::Transcript),
        polypeptide: representatives.count(SequenceCategory::Polypeptide),
        biotype_markers: biotypes.marker_count(),
        conflicts: biotypes.conflict_count(),
        unresolved_biotypes: biotypes.unresolved().len(),
        par_dropped,
        rows_written,
        output,
    })
}

fn stage_table<R: BcpRecord>(dir: &Path, table: &str, delimiter: u8, rows: &[R]) -> Result<(BcpFile, usize)> {
    info!("Creating {}.bcp", table);
    let file = BcpFile::create(dir, table)?;
    let mut writer = file.writer(table, delimiter)?;
    for row in rows {
        writer.write(row)?;
    }
    let rows_written = writer.rows();
    writer.finish()?;
    Ok((file, rows_written))
}

fn write_table<R: BcpRecord>(dir: &Path, table: &str, delimiter: u8, rows: &[R]) -> Result<TableRunStats> {
    let (file, rows_written) = stage_table(dir, table, delimiter, rows)?;
    let output = file.commit()?;
    Ok(TableRunStats {
        rows_written,
        output,
    })
}

/// Rebuild the sequence description cache
pub fn build_description_cache<S: DataSource>(source: &S, ctx: &RunContext) -> Result<TableRunStats> {
    let rows = companion::description_rows(&source.cache_rows()?, &source.descriptions()?, &ctx.stamp());
    write_table(&ctx.output_dir, &ctx.table, ctx.delimiter, &rows)
}

/// Rebuild the sequence coordinate cache
pub fn build_coordinate_cache<S: DataSource>(source: &S, ctx: &RunContext) -> Result<TableRunStats> {
    let rows = companion::coordinate_rows(&source.coordinates()?, &ctx.stamp());
    write_table(&ctx.output_dir, &ctx.table, ctx.delimiter, &rows)
}

/// Rebuild the sequence probe cache
pub fn build_probe_cache<S: DataSource>(source: &S, ctx: &RunContext) -> Result<TableRunStats> {
    let rows = companion::probe_rows(&source.probes()?, &ctx.stamp());
    write_table(&ctx.output_dir, &ctx.table, ctx.delimiter, &rows)
}

/// Write placeholder sequences for accessions with no sequence object
///
/// The four files are staged together and none is committed unless all
/// of them were written. `ctx.table` is not used; the table names are fixed.
pub fn build_placeholder_sequences<S: DataSource>(source: &S, ctx: &RunContext) -> Result<PlaceholderRunStats> {
    let next = source.next_keys()?;
    let unmatched = source.unmatched_accessions()?;
    info!("Processing {} unmatched accessions", unmatched.len());

    let rows: Placeholders =
        placeholder::placeholder_rows(&unmatched, next, &ctx.config.placeholders, &ctx.stamp());
    if rows.skipped > 0 {
        info!("Skipped {} accessions with no placeholder profile", rows.skipped);
    }

    let dir = &ctx.output_dir;
    let staged = [
        (placeholder::SEQUENCE_TABLE, stage_table(dir, placeholder::SEQUENCE_TABLE, ctx.delimiter, &rows.sequences)?),
        (placeholder::RAW_TABLE, stage_table(dir, placeholder::RAW_TABLE, ctx.delimiter, &rows.raw)?),
        (
            placeholder::SOURCE_ASSOC_TABLE,
            stage_table(dir, placeholder::SOURCE_ASSOC_TABLE, ctx.delimiter, &rows.source_assocs)?,
        ),
        (
            placeholder::ACCESSION_TABLE,
            stage_table(dir, placeholder::ACCESSION_TABLE, ctx.delimiter, &rows.accessions)?,
        ),
    ];

    let mut tables = Vec::with_capacity(staged.len());
    for (table, (file, rows_written)) in staged {
        let output = file.commit()?;
        debug!("Committed {}", output.display());
        tables.push((table.to_string(), TableRunStats { rows_written, output }));
    }

    Ok(PlaceholderRunStats {
        unmatched: unmatched.len(),
        skipped: rows.skipped,
        tables,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_today_format() {
        let date = today();
        assert_eq!(date.len(), 10);
        assert_eq!(&date[2..3], "/");
        assert_eq!(&date[5..6], "/");
    }

    #[test]
    fn test_output_path() {
        let ctx = RunContext::new(Config::default(), "/data/out", "SEQ_Marker_Cache");
        assert_eq!(ctx.output_path(), PathBuf::from("/data/out/SEQ_Marker_Cache.bcp"));
    }
}
