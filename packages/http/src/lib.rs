pub use self::body::Body;

pub mod body;
pub mod layer;
pub mod request;
pub mod response;

pub type Error = Box<dyn std::error::Error + Send + Sync + 'static>;

pub type Request = http::Request<Body>;

pub type Response = http::Response<Body>;
