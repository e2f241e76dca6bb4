#![forbid(unsafe_code)]

use url::Url;

use crate::error::{NetError, NetResult};

/// Resolve a resource locator against a base URL.
///
/// A locator that already parses as an absolute URL is used as-is; anything
/// else is joined against `base`. `Url::join` handles both `path` and
/// `/path` relative forms. The same rule applies to every locator the
/// content payload carries, video and audio alike.
pub fn resolve(base: &Url, target: &str) -> NetResult<Url> {
    match Url::parse(target) {
        Ok(absolute) => Ok(absolute),
        Err(url::ParseError::RelativeUrlWithoutBase) => base.join(target).map_err(|e| {
            NetError::invalid_url(format!("failed to resolve {target} against {base}: {e}"))
        }),
        Err(e) => Err(NetError::invalid_url(format!("unparseable locator {target}: {e}"))),
    }
}
