mod length;
mod url;

pub use length::validate_length;
pub use url::validate_url;
