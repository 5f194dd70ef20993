pub use self::{
	client::Client,
	dispatch::Dispatch,
	error::{Error, Result},
	handle::Handle,
	operation::Operation,
	proxy::Proxy,
};

pub mod client;
pub mod dispatch;
pub mod error;
pub mod handle;
pub mod operation;
pub mod proxy;
pub mod tag;

pub mod prelude {
	pub use crate::{self as tg, Dispatch as _, Handle as _};
}
