pub mod climate;
pub mod home;

pub use climate::*;
pub use home::*;

use std::{future::Future, time::Duration};

use crate::Error;

/// Run a core call under the request deadline; on expiry the store query is dropped.
pub(crate) async fn with_timeout<T>(
    limit: Duration,
    call: impl Future<Output = Result<T, Error>>,
) -> Result<T, Error> {
    tokio::time::timeout(limit, call)
        .await
        .map_err(|_| Error::Timeout(limit))?
}
