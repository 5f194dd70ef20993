use {crate::prelude::*, either::Either, futures::FutureExt as _};

impl<L, R> tg::Handle for Either<L, R>
where
	L: tg::Handle,
	R: tg::Handle,
{
	fn add_tag_to_entity(
		&self,
		arg: tg::tag::add::Arg,
	) -> impl Future<Output = tg::Result<()>> + Send {
		match self {
			Either::Left(s) => s.add_tag_to_entity(arg).left_future(),
			Either::Right(s) => s.add_tag_to_entity(arg).right_future(),
		}
	}

	fn remove_tag_from_entity(
		&self,
		arg: tg::tag::remove::Arg,
	) -> impl Future<Output = tg::Result<()>> + Send {
		match self {
			Either::Left(s) => s.remove_tag_from_entity(arg).left_future(),
			Either::Right(s) => s.remove_tag_from_entity(arg).right_future(),
		}
	}

	fn set_entity_tags(
		&self,
		arg: tg::tag::set::Arg,
	) -> impl Future<Output = tg::Result<()>> + Send {
		match self {
			Either::Left(s) => s.set_entity_tags(arg).left_future(),
			Either::Right(s) => s.set_entity_tags(arg).right_future(),
		}
	}
}
