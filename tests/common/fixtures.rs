//! Corpus files, configs, and policy texts for integration tests.

use std::path::{Path, PathBuf};

use codeinfer::config::Config;

pub const CORPUS_CSV: &str = "\
code,description,category
A0428,\"Ambulance service, basic life support, non-emergency transport (BLS)\",transport
A0429,\"Ambulance service, basic life support, emergency transport (BLS-emergency)\",transport
A0425,\"Ground mileage, per statute mile\",transport
E0110,\"Crutches, forearm, includes crutches of various materials, adjustable or fixed, pair\",dme
G0008,\"Administration of influenza virus vaccine\",vaccine
J0120,\"Injection, tetracycline, up to 250 mg\",drug
";

pub const AMBULANCE_TEXT: &str = "Non-emergency ambulance transport with basic life support";

pub const POLICY_TEXT: &str = "\
Ambulance transport is covered when other means are contraindicated. Bill HCPCS
A0428 with mileage A0425. Office visits use CPT 99213; screening uses ICD-10 Z00.00.";

/// Writes `contents` as `corpus.csv` under `dir`.
pub fn write_corpus(dir: &Path, contents: &str) -> PathBuf {
    let path = dir.join("corpus.csv");
    std::fs::write(&path, contents).expect("write corpus");
    path
}

/// Config with corpus and cache under `dir`, mock remote backends.
pub fn test_config(dir: &Path) -> Config {
    Config {
        corpus_path: write_corpus(dir, CORPUS_CSV),
        cache_path: dir.join("cache").join("cached_results.json"),
        ..Default::default()
    }
}
