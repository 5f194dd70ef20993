use crate::prelude::*;

mod either;

/// The entity tag service. The remote implementation is [`tg::Proxy`]. A local implementation lives in the server.
pub trait Handle: Clone + Unpin + Send + Sync + 'static {
	fn add_tag_to_entity(
		&self,
		arg: tg::tag::add::Arg,
	) -> impl Future<Output = tg::Result<()>> + Send;

	fn remove_tag_from_entity(
		&self,
		arg: tg::tag::remove::Arg,
	) -> impl Future<Output = tg::Result<()>> + Send;

	fn set_entity_tags(
		&self,
		arg: tg::tag::set::Arg,
	) -> impl Future<Output = tg::Result<()>> + Send;
}
