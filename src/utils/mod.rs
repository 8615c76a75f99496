pub mod string_utils;

pub use string_utils::StringUtils;
