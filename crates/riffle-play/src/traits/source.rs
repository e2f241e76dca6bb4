use async_trait::async_trait;
use riffle_net::NetResult;

use crate::item::FeedItem;

/// The content service: hands out the next feed item, one at a time.
///
/// The service decides what "next" means; there are no arguments. The trait
/// makes no concurrency-safety promise, so the pager serializes its startup
/// calls and never keeps more than one prefetch outstanding.
#[async_trait]
pub trait ContentSource: Send + Sync + 'static {
    async fn fetch_next_item(&self) -> NetResult<FeedItem>;
}
