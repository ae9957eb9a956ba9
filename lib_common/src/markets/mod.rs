pub mod nyse;
pub mod rsifeed;
