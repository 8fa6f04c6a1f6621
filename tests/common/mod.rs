//! Shared test helpers for integration tests
//!
//! The fixture is a small MGD-like snapshot:
//!
//! - marker 1: Ensembl and NCBI gene models; the Ensembl model wins and
//!   pulls its linked transcript and protein
//! - marker 2: GenBank DNA only, with RefSeq/GenBank transcripts and
//!   SwissProt/RefSeq proteins
//! - marker 3: NCBI gene model whose biotype conflicts with the marker
//! - marker 4: pseudo-autosomal gene with models on X and Y

#![allow(dead_code)]

use assert_cmd::cargo;
use assert_cmd::Command;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const LOAD_DATE: &str = "05/06/2025";

pub const GENOMIC: &str = "615419";
pub const TRANSCRIPT: &str = "615420";
pub const POLYPEPTIDE: &str = "615421";
pub const NOT_SPECIFIED: &str = "615422";

pub const CONFLICT: &str = "5420767";
pub const NO_CONFLICT: &str = "5420769";

/// Helper to get a seqcache command
pub fn seqcache() -> Command {
    Command::new(cargo::cargo_bin!("seqcache"))
}

/// Write `<table>.tsv` from a header and rows
pub fn write_table(dir: &Path, table: &str, header: &[&str], rows: &[&[&str]]) {
    let mut content = header.join("\t");
    content.push('\n');
    for row in rows {
        content.push_str(&row.join("\t"));
        content.push('\n');
    }
    fs::write(dir.join(format!("{}.tsv", table)), content).unwrap();
}

/// Fixture source directory plus an output directory
pub struct Fixture {
    pub tmp: TempDir,
}

impl Fixture {
    pub fn source(&self) -> PathBuf {
        self.tmp.path().join("mgd")
    }

    pub fn output(&self) -> PathBuf {
        self.tmp.path().join("out")
    }

    /// `seqcache <command> --source <fixture> --output-dir <out> --load-date <fixed>`
    pub fn run(&self, command: &str) -> Command {
        let mut cmd = seqcache();
        cmd.env_remove("TABLE")
            .env_remove("COLDELIM")
            .env_remove("CACHEDATADIR")
            .env_remove("SEQCACHE_CONFIG")
            .arg(command)
            .arg("--source")
            .arg(self.source())
            .arg("--output-dir")
            .arg(self.output())
            .arg("--load-date")
            .arg(LOAD_DATE);
        cmd
    }

    pub fn read_bcp(&self, table: &str) -> String {
        fs::read_to_string(self.output().join(format!("{}.bcp", table))).unwrap()
    }

    /// Output rows split into columns
    pub fn bcp_rows(&self, table: &str) -> Vec<Vec<String>> {
        self.read_bcp(table)
            .lines()
            .map(|l| l.split('\t').map(|s| s.to_string()).collect())
            .collect()
    }

    pub fn remove_table(&self, table: &str) {
        fs::remove_file(self.source().join(format!("{}.tsv", table))).unwrap();
    }
}

/// Marker cache rows for one (sequence, marker) pair
pub fn find_row<'a>(rows: &'a [Vec<String>], sequence_key: &str, marker_key: &str) -> &'a Vec<String> {
    rows.iter()
        .find(|r| r[1] == sequence_key && r[2] == marker_key)
        .unwrap_or_else(|| panic!("no row for sequence {} marker {}", sequence_key, marker_key))
}

pub fn setup_fixture() -> Fixture {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path().join("mgd");
    fs::create_dir_all(&dir).unwrap();

    write_table(
        &dir,
        "annotations",
        &["marker_key", "sequence_key", "provider_key", "sequence_type_key", "status_key", "length", "acc_id"],
        &[
            &["1", "101", "615429", "316347", "", "20000", "ENSMUSG00000027168"],
            &["1", "102", "706915", "316347", "", "25000", "18508"],
            &["1", "104", "316372", "316346", "", "2000", "NM_013627"],
            &["2", "201", "316380", "316347", "", "5000", "AC000201"],
            &["2", "202", "316380", "316347", "", "8000", "AC000202"],
            &["2", "203", "316372", "316346", "", "1500", "XM_000203"],
            &["2", "204", "316380", "316346", "", "900", "AK000204"],
            &["2", "205", "316384", "316348", "", "300", "P26367"],
            &["2", "206", "316372", "316348", "", "500", "NP_000206"],
            &["3", "301", "706915", "316347", "", "10000", "11111"],
            &["3", "202", "316380", "316347", "", "8000", "AC000202"],
            &["4", "401", "706915", "316347", "", "100", "170942"],
            &["4", "402", "706915", "316347", "", "200", "170943"],
        ],
    );

    write_table(
        &dir,
        "genomic_markers",
        &["sequence_key", "marker_key"],
        &[
            &["101", "1"],
            &["102", "1"],
            &["201", "2"],
            &["202", "2"],
            &["202", "3"],
            &["301", "3"],
            &["401", "4"],
            &["402", "4"],
        ],
    );

    write_table(
        &dir,
        "sequence_assocs",
        &["sequence_key_1", "sequence_key_2", "qualifier_key", "length_1", "length_2"],
        &[
            &["103", "101", "5445464", "3000", "20000"],
            &["105", "103", "5445465", "400", "3000"],
        ],
    );

    write_table(
        &dir,
        "gene_models",
        &["marker_key", "sequence_key", "logical_db_key", "raw_biotype"],
        &[
            &["1", "101", "60", "protein_coding"],
            &["1", "102", "59", "protein-coding"],
            &["3", "301", "59", "lncRNA"],
        ],
    );

    write_table(
        &dir,
        "marker_feature_types",
        &["marker_key", "term_key"],
        &[&["1", "7313348"], &["3", "7313348"]],
    );

    write_table(
        &dir,
        "feature_types",
        &["term_key", "term"],
        &[
            &["6238160", "gene"],
            &["7313348", "protein coding gene"],
            &["6238162", "non-coding RNA gene"],
            &["7288448", "lncRNA gene"],
            &["7288449", "pseudogenic region"],
        ],
    );

    write_table(
        &dir,
        "dag_closure",
        &["ancestor_key", "descendant_key"],
        &[
            &["6238159", "6238160"],
            &["6238159", "7313348"],
            &["6238159", "6238162"],
            &["6238159", "7288448"],
            &["6238159", "7288449"],
            &["6238162", "7288448"],
        ],
    );

    write_table(
        &dir,
        "biotype_mappings",
        &["vocabulary", "raw_term", "feature_type_term", "marker_type_key", "use_children"],
        &[
            &["BioType Ensembl", "protein_coding", "protein coding gene", "1", "0"],
            &["BioType NCBI", "protein-coding", "protein coding gene", "1", "0"],
            &["BioType NCBI", "lncRNA", "lncRNA gene", "", "0"],
        ],
    );

    write_table(
        &dir,
        "rep_qualifiers",
        &["term_key", "term"],
        &[
            &[GENOMIC, "genomic"],
            &[TRANSCRIPT, "transcript"],
            &[POLYPEPTIDE, "polypeptide"],
            &[NOT_SPECIFIED, "Not Specified"],
        ],
    );

    let cache_header = [
        "sequence_key",
        "marker_key",
        "organism_key",
        "marker_type_key",
        "provider_key",
        "sequence_type_key",
        "logical_db_key",
        "refs_key",
        "user_key",
        "mdate",
        "acc_id",
    ];
    write_table(
        &dir,
        "cache_rows",
        &cache_header,
        &[
            &["301", "3", "1", "1", "706915", "316347", "59", "3000", "1001", "03/14/2024", "11111"],
            &["101", "1", "1", "1", "615429", "316347", "60", "1000", "1001", "03/14/2024", "ENSMUSG00000027168"],
            &["102", "1", "1", "1", "706915", "316347", "59", "1000", "1001", "03/14/2024", "18508"],
            &["103", "1", "1", "1", "615430", "316346", "60", "1000", "", "03/14/2024", "ENSMUST00000000103"],
            &["104", "1", "1", "1", "316372", "316346", "27", "1000", "1001", "03/14/2024", "NM_013627"],
            &["105", "1", "1", "1", "615431", "316348", "134", "1000", "1001", "03/14/2024", "ENSMUSP00000000105"],
            &["201", "2", "1", "1", "316380", "316347", "9", "2000", "1001", "03/14/2024", "AC000201"],
            &["202", "2", "1", "1", "316380", "316347", "9", "2000", "1001", "03/14/2024", "AC000202"],
            &["202", "3", "1", "1", "316380", "316347", "9", "3000", "1001", "03/14/2024", "AC000202"],
            &["203", "2", "1", "1", "316372", "316346", "27", "2000", "1001", "03/14/2024", "XM_000203"],
            &["204", "2", "1", "1", "316380", "316346", "9", "2000", "1001", "03/14/2024", "AK000204"],
            &["205", "2", "1", "1", "316384", "316348", "13", "2000", "1001", "03/14/2024", "P26367"],
            &["206", "2", "1", "1", "316372", "316348", "27", "2000", "1001", "03/14/2024", "NP_000206"],
            &["401", "4", "1", "1", "706915", "316347", "59", "4000", "1001", "03/14/2024", "170942"],
            &["402", "4", "1", "1", "706915", "316347", "59", "4000", "1001", "03/14/2024", "170943"],
        ],
    );

    write_table(
        &dir,
        "par_features",
        &["marker_key", "sequence_key", "symbol", "genetic_chromosome", "genomic_chromosome"],
        &[
            &["4", "401", "Erdr1x", "XY", "Y"],
            &["4", "402", "Erdr1x", "XY", "X"],
        ],
    );

    write_table(
        &dir,
        "descriptions",
        &["sequence_key", "description"],
        &[
            &["101", "Mus musculus paired box 6 (Pax6)"],
            &["102", ""],
            &["999", "Not in the marker cache"],
        ],
    );

    write_table(
        &dir,
        "coordinates",
        &[
            "map_key",
            "object_key",
            "chromosome",
            "start_coordinate",
            "end_coordinate",
            "strand",
            "map_units",
            "provider",
            "version",
        ],
        &[
            &["7", "301", "2", "105505001", "105530000", "-", "bp", "NCBI Gene Model", "GRCm39"],
            &["7", "101", "2", "105500000", "105530500", "+", "bp", "Ensembl Gene Model", "GRCm39"],
            &["7", "101", "2", "105500000", "105530500", "+", "bp", "Ensembl Gene Model", "GRCm39"],
        ],
    );

    write_table(
        &dir,
        "probes",
        &["sequence_key", "probe_key", "refs_key", "mdate"],
        &[
            &["204", "5002", "77", "01/01/2001"],
            &["104", "5001", "77", "01/01/2001"],
            &["204", "5002", "77", "01/01/2001"],
        ],
    );

    Fixture { tmp }
}
