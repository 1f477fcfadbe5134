// SPDX-License-Identifier: MIT

pub mod builder;
pub mod custom_resource;
pub mod loader;
pub mod types;

pub use builder::{BuiltFlow, FlowBuilder};
pub use custom_resource::{
    request_type_is, CustomResourceFlow, CustomResourceFlowProps, RequestType, DISPATCH_STATE,
    INITIALIZE_STATE, REQUEST_TYPE_VARIABLE,
};
pub use loader::FlowLoader;
pub use types::FlowDefinition;
