pub mod aggregate;
pub mod filter;
pub mod loader;
pub mod observe;
pub mod output;
pub mod parser;
pub mod paths;
pub mod pipeline;
pub mod record;
pub mod utility;
