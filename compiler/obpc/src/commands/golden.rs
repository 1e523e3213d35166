//! `obp golden`: generate and verify expected query results.
//!
//! A golden run has three inputs: one data document, a list of named
//! queries, and a list of expressions that must not compile. Generating
//! evaluates every query and writes one [`QueryResult`] line per query.
//! Verifying replays those lines against the data and then checks that
//! every malformed expression is rejected.

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use obpath::{compile, Context, SyntaxError, Value};
use rayon::prelude::*;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Deserializer, Value as Json};
use thiserror::Error;
use tracing::debug;

use crate::json::{from_json, to_json};

/// Input and output files for a golden run.
#[derive(Clone, Debug)]
pub struct GoldenConfig {
    /// One JSON document every query runs against.
    pub data: PathBuf,
    /// JSON array of `[name, expression]` pairs.
    pub queries: PathBuf,
    /// Stream of [`QueryResult`] records, written when generating.
    pub expected: PathBuf,
    /// JSON array of expressions that must fail to compile.
    pub errors: PathBuf,
    /// Regenerate `expected` instead of verifying against it.
    pub generate: bool,
}

impl Default for GoldenConfig {
    fn default() -> Self {
        GoldenConfig {
            data: PathBuf::from("testdata/data.json"),
            queries: PathBuf::from("testdata/queries.json"),
            expected: PathBuf::from("testdata/expect.jsonstream"),
            errors: PathBuf::from("testdata/syntax_errors.json"),
            generate: false,
        }
    }
}

/// Every match of one named query.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct QueryResult {
    pub name: String,
    pub path: String,
    pub results: Vec<Json>,
}

/// Counts from a successful golden run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GoldenReport {
    /// Records written in generate mode.
    pub generated: usize,
    /// Records that matched in verify mode.
    pub verified: usize,
    /// Malformed expressions that were rejected.
    pub rejected: usize,
}

#[derive(Debug, Error)]
pub enum GoldenError {
    #[error("could not open {}: {source}", path.display())]
    Open { path: PathBuf, source: io::Error },
    #[error("could not parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("could not write expected results: {0}")]
    Write(#[from] io::Error),
    #[error("could not encode expected results: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("query {name:?} does not compile: {source}")]
    Compile { name: String, source: SyntaxError },
    #[error("did not get the expected results for {name:?}\n  expected: {expected}\n  actual:   {actual}")]
    Mismatch {
        name: String,
        expected: Json,
        actual: Json,
    },
    #[error("expected path expression {expression:?} to fail to compile")]
    Compiled { expression: String },
}

/// Run the golden harness as configured.
pub fn run_golden(config: &GoldenConfig) -> Result<GoldenReport, GoldenError> {
    if config.generate {
        let generated = generate_expected(&config.data, &config.queries, &config.expected)?;
        return Ok(GoldenReport {
            generated,
            ..GoldenReport::default()
        });
    }

    let verified = verify_expected(&config.data, &config.expected)?;
    let rejected = verify_syntax_errors(&config.errors)?;
    Ok(GoldenReport {
        verified,
        rejected,
        ..GoldenReport::default()
    })
}

/// Evaluate every query against `data` and write the results to `expected`.
///
/// Queries run in parallel; records are written in query order.
#[tracing::instrument(level = "debug")]
pub fn generate_expected(data: &Path, queries: &Path, expected: &Path) -> Result<usize, GoldenError> {
    let document = from_json(read_json::<Json>(data)?);
    let queries: Vec<(String, String)> = read_json(queries)?;
    let context = query_context();

    let results = queries
        .par_iter()
        .map(|(name, expression)| evaluate_query(&context, &document, name, expression))
        .collect::<Result<Vec<_>, _>>()?;

    let file = File::create(expected).map_err(|source| GoldenError::Open {
        path: expected.to_path_buf(),
        source,
    })?;
    let mut writer = BufWriter::new(file);
    for result in &results {
        serde_json::to_writer(&mut writer, result)?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;

    debug!(count = results.len(), "generated expected results");
    Ok(results.len())
}

/// Replay every record in `expected` against `data`.
///
/// Stops at the first record whose results differ.
#[tracing::instrument(level = "debug")]
pub fn verify_expected(data: &Path, expected: &Path) -> Result<usize, GoldenError> {
    let document = from_json(read_json::<Json>(data)?);
    let context = query_context();
    let reader = BufReader::new(open(expected)?);

    let mut verified = 0;
    for record in Deserializer::from_reader(reader).into_iter::<QueryResult>() {
        let record = record.map_err(|source| GoldenError::Parse {
            path: expected.to_path_buf(),
            source,
        })?;
        let actual = evaluate_query(&context, &document, &record.name, &record.path)?;
        if actual.results != record.results {
            return Err(GoldenError::Mismatch {
                name: record.name,
                expected: Json::Array(record.results),
                actual: Json::Array(actual.results),
            });
        }
        debug!(name = %record.name, "passed");
        verified += 1;
    }
    Ok(verified)
}

/// Check that every expression in `errors` fails to compile.
///
/// Uses a default context, so descendant selectors count as errors too.
#[tracing::instrument(level = "debug")]
pub fn verify_syntax_errors(errors: &Path) -> Result<usize, GoldenError> {
    let expressions: Vec<String> = read_json(errors)?;
    let context = Context::new();

    for expression in &expressions {
        match compile(expression, &context) {
            Ok(_) => {
                return Err(GoldenError::Compiled {
                    expression: expression.clone(),
                })
            }
            Err(error) => debug!(%expression, %error, "rejected"),
        }
    }
    Ok(expressions.len())
}

/// Queries run with descendant selectors enabled.
fn query_context() -> Context {
    let mut context = Context::new();
    context.allow_descendants(true);
    context
}

fn evaluate_query(
    context: &Context,
    document: &Value,
    name: &str,
    expression: &str,
) -> Result<QueryResult, GoldenError> {
    let path = compile(expression, context).map_err(|source| GoldenError::Compile {
        name: name.to_string(),
        source,
    })?;
    Ok(QueryResult {
        name: name.to_string(),
        path: expression.to_string(),
        results: path.evaluate(document).map(to_json).collect(),
    })
}

fn open(path: &Path) -> Result<File, GoldenError> {
    File::open(path).map_err(|source| GoldenError::Open {
        path: path.to_path_buf(),
        source,
    })
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, GoldenError> {
    serde_json::from_reader(BufReader::new(open(path)?)).map_err(|source| GoldenError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
