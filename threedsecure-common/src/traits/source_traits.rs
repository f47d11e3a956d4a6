// File: threedsecure-common/src/traits/source_traits.rs

use async_trait::async_trait;

use crate::Error;
use crate::models::Authentication;

/// One logical sequence of authentication snapshots, regardless of the
/// transport behind it (event stream, short poll, long poll).
///
/// `Ok(None)` ends the sequence: cancellation was observed, a terminal
/// state was already emitted, or the remote signalled no more data.
/// Unrecoverable transport errors come back as `Err` instead of a
/// silent end. A source is opened per execution and is not restartable.
#[async_trait]
pub trait AuthenticationSource: Send {
    async fn next(&mut self) -> Result<Option<Authentication>, Error>;
}
