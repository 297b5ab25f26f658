mod errors;
mod parser;
