pub mod meta;
pub mod oauth;
