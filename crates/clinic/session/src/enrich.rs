use std::future::Future;

use futures::{future, stream::FuturesUnordered, FutureExt, StreamExt};
use strum::{Display, EnumString};

/// What to do when an enrichment lookup fails.
#[derive(Copy, Clone, Debug, Default, Display, EnumString, PartialEq, Eq)]
#[strum(serialize_all = "kebab-case")]
pub enum EnrichPolicy {
    /// Any failed lookup fails the whole action.
    #[default]
    FailFast,
    /// Failed lookups leave their slot empty.
    BestEffort,
}

/// Runs one lookup per item concurrently and pairs each item with its result,
/// keeping the input order.
///
/// Under [`EnrichPolicy::FailFast`] the first failure to arrive is returned at
/// once and the lookups still pending are dropped.
pub async fn enrich_all<T, U, E, F, Fut>(
    items: Vec<T>,
    policy: EnrichPolicy,
    lookup: F,
) -> Result<Vec<(T, Option<U>)>, E>
where
    F: Fn(&T) -> Fut,
    Fut: Future<Output = Result<U, E>>,
{
    let mut lookups: FuturesUnordered<_> = items
        .iter()
        .enumerate()
        .map(|(index, item)| lookup(item).map(move |result| (index, result)))
        .collect();

    let mut found: Vec<Option<U>> = items.iter().map(|_| None).collect();
    while let Some((index, result)) = lookups.next().await {
        match result {
            Ok(value) => found[index] = Some(value),
            Err(error) => match policy {
                EnrichPolicy::FailFast => return Err(error),
                EnrichPolicy::BestEffort => continue,
            },
        }
    }
    Ok(items.into_iter().zip(found).collect())
}

/// Runs two independent lookups concurrently.
pub async fn enrich_pair<A, B, E, FutA, FutB>(
    policy: EnrichPolicy,
    first: FutA,
    second: FutB,
) -> Result<(Option<A>, Option<B>), E>
where
    FutA: Future<Output = Result<A, E>>,
    FutB: Future<Output = Result<B, E>>,
{
    match policy {
        EnrichPolicy::FailFast => {
            let (first, second) = future::try_join(first, second).await?;
            Ok((Some(first), Some(second)))
        }
        EnrichPolicy::BestEffort => {
            let (first, second) = future::join(first, second).await;
            Ok((first.ok(), second.ok()))
        }
    }
}
