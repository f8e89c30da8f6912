mod error;
mod op;
mod trace;
mod value;

pub use error::{OpgraphError, Result};
pub use op::{Action, ActionFn, Generate, Operation, PoisonedState, StatefulAction};
pub use trace::{Cursor, Frame, FrameId, NodeId, NodeKind, TraceEdge, TraceGraph, TraceNode};
pub use value::Value;
