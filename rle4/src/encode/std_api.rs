use super::{check_values, runs, EncodeError};
use snafu::{ResultExt, Snafu};
use std::io::Write;

#[derive(Debug, Snafu)]
pub enum WriteError {
    #[snafu(context(false), display("{source}"))]
    Encode { source: EncodeError },
    WriteIo { source: std::io::Error },
}

const CHUNK_LEN: usize = 256;

/// Run-length encodes `values` into a writer.
///
/// Input is validated before anything is written.
pub fn encode<W: Write>(values: &[u8], mut w: W) -> Result<usize, WriteError> {
    check_values(values)?;

    let mut buf = [0u8; CHUNK_LEN];
    let mut filled = 0;
    let mut written = 0;

    for record in runs(values) {
        buf[filled] = record;
        filled += 1;

        if filled == CHUNK_LEN {
            w.write_all(&buf).context(WriteIoSnafu)?;
            written += filled;
            filled = 0;
        }
    }

    w.write_all(&buf[..filled]).context(WriteIoSnafu)?;
    written += filled;

    Ok(written)
}
