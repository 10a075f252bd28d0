pub mod credential;
pub mod credential_format;
pub mod dcql_query;
