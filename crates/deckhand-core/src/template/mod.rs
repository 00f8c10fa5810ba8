//! Template resolution engine
//!
//! Turns inheritable, parameterized templates into concrete configuration:
//! - `placeholder`: `${id}` substitution
//! - `overrides`: fixed variable values with first-definer-wins precedence
//! - `variables`: instance variable template expansion
//! - `resolver`: application template inheritance
//! - `driver`: resolution of a whole product's templates

pub mod driver;
pub mod error;
pub mod overrides;
pub mod placeholder;
pub mod resolver;
pub mod variables;

pub use driver::{ResolveOptions, ResolvedBundle, resolve_bundle};
pub use error::TemplateError;
pub use overrides::OverrideSet;
pub use placeholder::substitute;
pub use resolver::{DEFAULT_MAX_DEPTH, ResolvableNode, TemplateResolver};
pub use variables::expand_instance_variables;
