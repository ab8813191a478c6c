#![forbid(unsafe_code)]

pub mod cli;
pub mod crawl;
pub mod digest;
pub mod links;
pub mod logging;
pub mod publish;
pub mod renderer;
pub mod sync;
pub mod template;
pub mod text;
