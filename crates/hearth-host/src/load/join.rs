use std::time::Duration;

use anyhow::anyhow;
use futures::future::{select, BoxFuture, Either, FutureExt};
use futures::stream::{FuturesUnordered, StreamExt};
use futures_timer::Delay;

use super::resource::{ResourceKind, ResourceRequest};
use super::source::AssetSource;
use crate::error::HostError;
use crate::host::Host;

type Settlement = (ResourceKind, anyhow::Result<Vec<u8>>);

fn fetch<S>(source: &S, request: ResourceRequest, timeout: Option<Duration>) -> BoxFuture<'static, Settlement>
where
    S: AssetSource + ?Sized,
{
    let kind = request.kind;
    let fut = source.fetch(&request.candidates);

    async move {
        let result = match timeout {
            None => fut.await,
            Some(limit) => match select(fut, Delay::new(limit)).await {
                Either::Left((result, _)) => result,
                Either::Right(_) => Err(anyhow!("timed out after {limit:?}")),
            },
        };
        (kind, result)
    }
    .boxed()
}

/// Loads every resource the host needs, in parallel, until it is running or broken.
///
/// Completions are handed to [`Host::settle`] in whatever order they finish;
/// fetches the host issues in response (the audio clips) join the same set.
/// Once the host is broken the remaining fetches are dropped unpolled.
pub async fn drive<S>(host: &mut Host, source: &S, timeout: Option<Duration>) -> Result<(), HostError>
where
    S: AssetSource + ?Sized,
{
    let mut pending: FuturesUnordered<_> = host
        .initial_requests()
        .into_iter()
        .map(|req| fetch(source, req, timeout))
        .collect();

    while let Some((kind, result)) = pending.next().await {
        let issued = host.settle(kind, result)?;
        if host.is_broken() {
            log::debug!("abandoning {} pending loads after {kind} settled", pending.len());
            break;
        }
        pending.extend(issued.into_iter().map(|req| fetch(source, req, timeout)));
    }

    Ok(())
}
