//! A MapReduce-compatible implementation of `grep`.
//!
//! Every record containing the term is kept under the term as its key; the
//! matches are sorted and joined into one newline-separated value.

use anyhow::Result;
use bytes::{BufMut, Bytes, BytesMut};
use clap::Parser;

use crate::Pipeline;

#[derive(Parser, Debug)]
#[clap(no_binary_name = true)]
struct Args {
    #[clap(short, long, value_parser)]
    term: String,
}

pub fn pipeline(args: &[String]) -> Result<Pipeline> {
    let args = Args::try_parse_from(args)?;
    let term = Bytes::from(args.term);

    let pipeline = crate::build(move |record: &[u8]| {
        contains(record, &term).then(|| term.clone())
    })
    .reduce(|mut values: Vec<Bytes>| {
        values.sort();
        values
    })
    .final_reduce(join);
    Ok(pipeline)
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    needle.is_empty() || haystack.windows(needle.len()).any(|w| w == needle)
}

fn join(values: Vec<Bytes>) -> Vec<Bytes> {
    let size = values.iter().map(|v| v.len() + 1).sum();
    let mut writer = BytesMut::with_capacity(size);
    for (i, value) in values.iter().enumerate() {
        if i > 0 {
            writer.put_u8(b'\n');
        }
        writer.put(value.as_ref());
    }
    vec![writer.freeze()]
}
