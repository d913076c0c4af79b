pub mod outlining_worker;
pub mod region_parser;
pub mod region_tagger;
