pub mod codes;
pub mod completions;
pub mod import;
pub mod map;
pub mod normalize;
pub mod summary;
pub mod util;
