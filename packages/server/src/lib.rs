use {
	dashmap::DashMap,
	std::{collections::BTreeSet, sync::Arc},
	tagkit_client::prelude::*,
};

pub use self::{config::Config, http::Listener};

pub mod config;
mod http;
mod tag;

/// The in-process entity tag service.
#[derive(Clone)]
pub struct Server(pub Arc<Inner>);

pub struct Inner {
	config: Config,
	tags: DashMap<tg::tag::Entity, BTreeSet<String>>,
}

impl Server {
	pub const DEFAULT_URL: &'static str = "http://localhost:8476";

	#[must_use]
	pub fn new(config: Config) -> Self {
		let tags = DashMap::new();
		Self(Arc::new(Inner { config, tags }))
	}
}

impl tg::Handle for Server {
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

impl std::ops::Deref for Server {
	type Target = Inner;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
