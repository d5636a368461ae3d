mod global;

pub use global::GlobalArgs;
