pub mod filters;
pub mod functions;
