//! Utilities for assembling encoded chunks.

use crate::Error;
use bytes::{BufMut, Bytes, BytesMut};
use futures::future::join_all;
use std::future::Future;

/// Concatenates `chunks` in iteration order.
///
/// The length of the result is the sum of the lengths of the chunks.
pub fn merge<I>(chunks: I) -> Bytes
where
    I: IntoIterator,
    I::Item: AsRef<[u8]>,
{
    let chunks: Vec<I::Item> = chunks.into_iter().collect();
    let len = chunks.iter().map(|chunk| chunk.as_ref().len()).sum();
    let mut buf = BytesMut::with_capacity(len);
    for chunk in &chunks {
        buf.put_slice(chunk.as_ref());
    }
    buf.freeze()
}

/// Concatenates chunks that are produced asynchronously.
///
/// All futures are polled concurrently, but the output always follows the order in which the
/// futures were supplied (never the order in which they complete). If any future fails, the
/// leftmost failure is returned.
pub async fn merge_async<I, F, B>(chunks: I) -> Result<Bytes, Error>
where
    I: IntoIterator<Item = F>,
    F: Future<Output = Result<B, Error>>,
    B: AsRef<[u8]>,
{
    let chunks = join_all(chunks)
        .await
        .into_iter()
        .collect::<Result<Vec<B>, Error>>()?;
    Ok(merge(chunks))
}
