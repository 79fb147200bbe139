//! Parquet footer reading over ranged object-store reads.
//!
//! A Parquet file ends with `[footer][footer_length: u32 LE][PAR1]`. Rather
//! than one GET for the 8-byte suffix and a second for the footer, the reader
//! fetches the trailing megabyte in a single request and slices locally; only
//! a footer larger than that costs a second, exactly-sized request.

use bytes::Bytes;
use cw_error::{FooterError, Result};
use cw_traits::ObjectStore;
use cw_types::RequestedColumn;
use parquet::file::metadata::{ParquetMetaData, ParquetMetaDataReader};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, warn};

/// Magic bytes closing every Parquet file ("PAR1").
pub const PARQUET_MAGIC: [u8; 4] = [0x50, 0x41, 0x52, 0x31];

/// Fixed suffix: 4-byte little-endian footer length + 4-byte magic.
const FOOTER_SUFFIX_LEN: i64 = 8;

/// Default size of the one-shot tail fetch.
const DEFAULT_TAIL_FETCH_LEN: i64 = 1024 * 1024;

/// Reads and decodes the trailing footer of Parquet objects.
#[derive(Clone)]
pub struct FooterReader {
    store: Arc<dyn ObjectStore>,
    tail_fetch_len: i64,
}

impl FooterReader {
    /// Create a footer reader over the given store.
    pub fn new(store: Arc<dyn ObjectStore>) -> Self {
        Self {
            store,
            tail_fetch_len: DEFAULT_TAIL_FETCH_LEN,
        }
    }

    /// Override the tail-fetch size (tests exercise the two-request path
    /// without megabyte fixtures).
    pub fn with_tail_fetch_len(mut self, tail_fetch_len: i64) -> Self {
        self.tail_fetch_len = tail_fetch_len;
        self
    }

    /// Fetch and decode the footer metadata of one object.
    ///
    /// `file_size` comes from the listing; it locates the suffix without a
    /// HEAD round trip.
    pub async fn read_metadata(
        &self,
        bucket: &str,
        key: &str,
        file_size: i64,
    ) -> Result<ParquetMetaData> {
        if file_size < FOOTER_SUFFIX_LEN {
            return Err(FooterError::TooSmall { size: file_size }.into());
        }

        let tail_len = self.tail_fetch_len.min(file_size);
        let tail = self
            .store
            .get_range(bucket, key, file_size - tail_len, file_size - 1)
            .await?
            .data;

        if (tail.len() as i64) < FOOTER_SUFFIX_LEN {
            return Err(FooterError::TooSmall { size: file_size }.into());
        }

        let magic = &tail[tail.len() - 4..];
        if magic != PARQUET_MAGIC.as_slice() {
            let mut actual = [0u8; 4];
            actual.copy_from_slice(magic);
            return Err(FooterError::BadMagic {
                key: format!("s3://{}/{}", bucket, key),
                expected: PARQUET_MAGIC,
                actual,
            }
            .into());
        }

        let mut length_bytes = [0u8; 4];
        length_bytes.copy_from_slice(&tail[tail.len() - 8..tail.len() - 4]);
        let footer_len = i32::from_le_bytes(length_bytes) as i64;

        if footer_len <= 0 || footer_len > file_size - FOOTER_SUFFIX_LEN {
            return Err(FooterError::BadLength {
                length: footer_len,
                size: file_size,
            }
            .into());
        }

        let footer_bytes: Bytes = if footer_len + FOOTER_SUFFIX_LEN <= tail.len() as i64 {
            // Footer already sits inside the tail fetch
            let offset = tail.len() - (FOOTER_SUFFIX_LEN + footer_len) as usize;
            tail.slice(offset..offset + footer_len as usize)
        } else {
            debug!(
                key = key,
                footer_len = footer_len,
                "Footer exceeds tail fetch, issuing exact read"
            );
            let start = file_size - FOOTER_SUFFIX_LEN - footer_len;
            self.store
                .get_range(bucket, key, start, file_size - FOOTER_SUFFIX_LEN - 1)
                .await?
                .data
        };

        ParquetMetaDataReader::decode_metadata(&footer_bytes)
            .map_err(|e| FooterError::Decode(format!("s3://{}/{}: {}", bucket, key, e)).into())
    }
}

/// Extract the byte ranges of every column chunk whose leaf name is in the
/// requested set.
///
/// Matching uses the last element of the schema path, not the dotted path,
/// so `location.lat` is requested as `lat`. A name present in several row
/// groups yields one range per row group. Ranges that fall outside the file
/// are skipped; the listing size and the footer disagree about the object.
pub fn requested_columns(
    metadata: &ParquetMetaData,
    columns: &HashSet<String>,
    file_size: i64,
) -> Vec<RequestedColumn> {
    let mut requested = Vec::new();

    for row_group in metadata.row_groups() {
        for chunk in row_group.columns() {
            let Some(leaf) = chunk.column_path().parts().last() else {
                continue;
            };
            if !columns.contains(leaf) {
                continue;
            }

            // A chunk with a dictionary starts at the dictionary page; its
            // data pages follow within total_compressed_size.
            let start = match chunk.dictionary_page_offset() {
                Some(offset) if offset != 0 => offset,
                _ => chunk.data_page_offset(),
            };
            let end = start + chunk.compressed_size() - 1;

            if start < 0 || end < start || end >= file_size {
                warn!(
                    column = %leaf,
                    start = start,
                    end = end,
                    file_size = file_size,
                    "Column chunk range outside file bounds, skipping"
                );
                continue;
            }

            requested.push(RequestedColumn {
                column_name: leaf.clone(),
                start,
                end,
            });
        }
    }

    requested
}
