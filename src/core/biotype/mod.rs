//! Biotype conflict detection
//!
//! Independent of representative selection: verdicts are computed once per
//! run and merged into marker cache rows by (marker, sequence).

pub mod conflict;
pub mod equivalence;
pub mod hierarchy;

use log::info;

use crate::core::config::Config;
use crate::core::error::Result;
use crate::core::source::DataSource;

pub use conflict::{
    decide, evaluate, BiotypeEntry, BiotypeLookup, ConflictVerdict, MarkerVerdict,
    UnresolvedBiotype, NULL_BIOTYPE,
};
pub use equivalence::EquivalenceTable;
pub use hierarchy::TermHierarchy;

/// Read the biotype tables and compute every marker's verdict
pub fn build_lookup<S: DataSource>(source: &S, config: &Config) -> Result<BiotypeLookup> {
    info!("Initializing biotype lookups");

    let hierarchy = TermHierarchy::from_rows(&source.dag_closure()?);
    let equivalences = EquivalenceTable::build(
        &source.biotype_mappings()?,
        &source.feature_types()?,
        &hierarchy,
        config,
    )?;

    let gene_models = source.gene_models()?;
    let direct_types = source.marker_feature_types()?;
    info!(
        "Determining conflicts for {} gene models, {} direct feature type rows",
        gene_models.len(),
        direct_types.len()
    );

    let lookup = evaluate(&gene_models, &direct_types, &equivalences, config);
    info!(
        "Biotype verdicts: {} markers, {} conflicts, {} unresolved raw biotypes",
        lookup.marker_count(),
        lookup.conflict_count(),
        lookup.unresolved().len()
    );
    Ok(lookup)
}
