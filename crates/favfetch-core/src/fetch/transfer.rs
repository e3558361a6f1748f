//! One GET transfer on a curl Easy handle, streaming the body into a writer.

use std::collections::HashMap;
use std::io::{self, Write};

use super::error::FetchError;
use super::FetchOptions;

/// Maximum redirects followed when `follow_redirects` is set.
const MAX_REDIRECTS: u32 = 10;

/// Performs a GET for `url`, writing the body to `sink`.
///
/// Returns the number of body bytes written when the final status is 200.
/// Any other status is `FetchError::Http`; the caller discards what was written.
pub(crate) fn get_into<W: Write>(
    url: &str,
    headers: &HashMap<String, String>,
    opts: &FetchOptions,
    sink: &mut W,
) -> Result<u64, FetchError> {
    let mut easy = curl::easy::Easy::new();
    easy.url(url)?;
    easy.get(true)?;
    easy.follow_location(opts.follow_redirects)?;
    if opts.follow_redirects {
        easy.max_redirections(MAX_REDIRECTS)?;
    }
    if let Some(t) = opts.connect_timeout {
        easy.connect_timeout(t)?;
    }
    if let Some(t) = opts.timeout {
        easy.timeout(t)?;
    }

    let mut list = curl::easy::List::new();
    for (k, v) in headers {
        list.append(&format!("{}: {}", k.trim(), v.trim()))?;
    }
    if !headers.is_empty() {
        easy.http_headers(list)?;
    }

    let mut written = 0u64;
    let mut write_err: Option<io::Error> = None;
    let performed = {
        let mut transfer = easy.transfer();
        transfer.write_function(|data| match sink.write_all(data) {
            Ok(()) => {
                written += data.len() as u64;
                Ok(data.len())
            }
            Err(e) => {
                write_err = Some(e);
                Ok(0) // abort transfer
            }
        })?;
        transfer.perform()
    };
    if let Some(e) = write_err {
        return Err(FetchError::Storage(e));
    }
    performed?;

    let code = easy.response_code()?;
    if code != 200 {
        return Err(FetchError::Http(code));
    }
    sink.flush()?;
    Ok(written)
}
