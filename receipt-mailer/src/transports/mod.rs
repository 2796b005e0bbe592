mod file;
pub mod http;

pub use file::FileTransport;
pub use http::HttpTransport;
