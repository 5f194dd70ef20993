use crate::prelude::*;

/// Invoke a remote operation by name.
///
/// Implementations own the transport. They resolve the operation's route, serialize the payload, attach credentials, and map failed responses to errors. Retries and timeouts, if any, live here too.
pub trait Dispatch: Clone + Unpin + Send + Sync + 'static {
	fn dispatch(
		&self,
		operation: tg::Operation,
		payload: serde_json::Value,
	) -> impl Future<Output = tg::Result<Option<serde_json::Value>>> + Send;
}
