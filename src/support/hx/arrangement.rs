//! Flow arrangements with effectiveness-NTU relations.

mod counter_flow;
mod cross_flow;

pub use counter_flow::CounterFlow;
pub use cross_flow::CrossFlow;
