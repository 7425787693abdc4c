mod path_ext;

pub use path_ext::{BestEffortPathExt, best_effort_absolute, lexically_relative};
