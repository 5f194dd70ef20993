use crate::prelude::*;


/// A [`tg::Handle`] that forwards every call to a remote operation.
///
/// Each method serializes its argument and hands it to the dispatcher under the operation's name. The outcome of the dispatch is returned as is: no validation happens before the call and no error is rewritten after it. The proxy holds no mutable state, so clones may be used concurrently.
#[derive(Clone, Debug)]
pub struct Proxy<D> {
	dispatcher: D,
}

impl<D> Proxy<D>
where
	D: tg::Dispatch,
{
	#[must_use]
	pub fn new(dispatcher: D) -> Self {
		Self { dispatcher }
	}

	#[must_use]
	pub fn dispatcher(&self) -> &D {
		&self.dispatcher
	}

	pub(crate) async fn call<T>(&self, operation: tg::Operation, arg: T) -> tg::Result<()>
	where
		T: serde::Serialize,
	{
		let payload = serde_json::to_value(arg)
			.map_err(|source| tg::error!(!source, %operation, "failed to serialize the arg"))?;
		self.dispatcher.dispatch(operation, payload).await?;
		Ok(())
	}
}

impl<D> tg::Handle for Proxy<D>
where
	D: tg::Dispatch,
{
	fn add_tag_to_entity(
		&self,
		arg: tg::tag::add::Arg,
	) -> impl Future<Output = tg::Result<()>> + Send {
		self.add_tag_to_entity(arg)
	}

	fn remove_tag_from_entity(
		&self,
		arg: tg::tag::remove::Arg,
	) -> impl Future<Output = tg::Result<()>> + Send {
		self.remove_tag_from_entity(arg)
	}

	fn set_entity_tags(
		&self,
		arg: tg::tag::set::Arg,
	) -> impl Future<Output = tg::Result<()>> + Send {
		self.set_entity_tags(arg)
	}
}
