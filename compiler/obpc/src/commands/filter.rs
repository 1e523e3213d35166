//! `obp filter`: run one path over a stream of JSON documents.

use std::io::{self, BufWriter, Read, Write};

use obpath::{compile, Context, SyntaxError};
use serde_json::{Deserializer, Value as Json};
use thiserror::Error;
use tracing::debug;

use crate::json::{from_json, to_json};

/// Options for the filter command.
#[derive(Clone, Debug)]
pub struct FilterOptions {
    /// Path expression evaluated against every document.
    pub path: String,
    /// Collect all matches into one array instead of streaming them.
    pub batch: bool,
}

impl Default for FilterOptions {
    fn default() -> Self {
        FilterOptions {
            path: ".*".to_string(),
            batch: false,
        }
    }
}

/// What a filter run processed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FilterStats {
    pub documents: usize,
    pub matches: usize,
}

/// Fatal filter failures.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("could not compile path: {0}")]
    Compile(#[from] SyntaxError),
    #[error("could not read JSON from input: {0}")]
    Decode(#[source] serde_json::Error),
    #[error("could not write JSON to output: {0}")]
    Encode(#[source] serde_json::Error),
    #[error("could not write to output: {0}")]
    Io(#[from] io::Error),
}

/// Evaluate `options.path` against every JSON document in `input`.
///
/// The path is compiled with descendant selectors enabled, before any input
/// is read. In stream mode every match is written to `output` as one JSON
/// line; in batch mode one JSON array holding every match of every document
/// is written at the end.
#[tracing::instrument(level = "debug", skip(input, output))]
pub fn run_filter<R: Read, W: Write>(
    options: &FilterOptions,
    input: R,
    output: W,
) -> Result<FilterStats, CliError> {
    let mut context = Context::new();
    context.allow_descendants(true);
    let path = compile(&options.path, &context)?;

    let mut output = BufWriter::new(output);
    let mut stats = FilterStats::default();
    let mut batch = Vec::new();

    for document in Deserializer::from_reader(input).into_iter::<Json>() {
        let document = from_json(document.map_err(CliError::Decode)?);
        stats.documents += 1;

        for found in path.evaluate(&document) {
            stats.matches += 1;
            if options.batch {
                batch.push(to_json(found));
            } else {
                serde_json::to_writer(&mut output, &to_json(found)).map_err(CliError::Encode)?;
                output.write_all(b"\n")?;
            }
        }
        if !options.batch {
            output.flush()?;
        }
    }

    if options.batch {
        serde_json::to_writer(&mut output, &Json::Array(batch)).map_err(CliError::Encode)?;
        output.write_all(b"\n")?;
    }
    output.flush()?;

    debug!(documents = stats.documents, matches = stats.matches, "filter finished");
    Ok(stats)
}
