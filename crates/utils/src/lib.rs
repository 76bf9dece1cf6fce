pub mod media_url;
pub mod response;
