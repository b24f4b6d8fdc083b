pub mod response_headers;
