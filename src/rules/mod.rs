pub mod narrow_types;
pub mod registry;
pub mod traits;
pub mod unused_catch;
pub mod unused_parameter;
pub mod unused_variable;

pub use registry::{default_registry, DEFAULT_ORDER};
pub use traits::{ContentRule, LineRule, RewriteRule, RuleId};
