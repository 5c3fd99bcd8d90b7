#![allow(dead_code)]
use std::path::Path;

use mython::parser::{self, ast::Program};

/// `(label, source)` for every fixture case tagged for benchmarking.
pub fn workloads() -> Vec<(String, String)> {
    let cases = test_support::bench_cases(Path::new("tests/programs"))
        .unwrap_or_else(|err| panic!("load bench cases: {err:#}"));
    cases
        .into_iter()
        .map(|case| {
            let source = case
                .source()
                .unwrap_or_else(|err| panic!("read {}: {err:#}", case.name));
            (case.name, source)
        })
        .collect()
}

pub fn load_program(label: &str, source: &str) -> Program {
    parser::parse(source).unwrap_or_else(|err| panic!("parse {label}: {err}"))
}
