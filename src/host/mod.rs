mod message;
mod settings;
mod sink;
mod snapshot;
mod source;

pub use message::{InboundMessage, OutboundMessage, parse_inbound};
pub use settings::{EdgeDirection, EdgeStyle, SettingsPatch};
pub use sink::{JsonLinesSink, LogSink, OutboundSink};
pub use snapshot::{GraphEdge, GraphNode, GraphSnapshot, TargetType};
pub use source::{HostEvent, load_settings, spawn_snapshot_loader, spawn_stdin_reader};
