//! Counts how often every distinct record occurs.

use bytes::Bytes;

use crate::Pipeline;

pub fn pipeline() -> Pipeline {
    crate::build(|record: &[u8]| Some(Bytes::copy_from_slice(record))).final_reduce(reduce)
}

fn reduce(values: Vec<Bytes>) -> Vec<Bytes> {
    vec![Bytes::from(values.len().to_string())]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::reduce::reduce_group;

    #[test]
    fn counts_duplicates() {
        let pipeline = pipeline();
        let key = (pipeline.map())(b"hello").unwrap();
        assert_eq!(key, Bytes::from_static(b"hello"));

        let values = vec![key.clone(), key.clone(), key.clone()];
        let out = reduce_group(&pipeline, &key, values).unwrap();
        assert_eq!(out, Bytes::from_static(b"3"));
    }
}
