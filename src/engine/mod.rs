//! Instance engine: the component registry and live-instance store.

pub mod instances;
pub mod registry;

pub use instances::{Instance, Instances};
pub use registry::{Registry, WidgetCtor};
