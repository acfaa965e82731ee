/// Event emitter module - split by concern like the registry it drives
mod bridge;
mod core;
mod dispatch;
mod subscribe;
mod subscription;

pub use self::core::{EmitterId, EventEmitter};
pub use dispatch::EmitReport;
pub use subscription::Subscription;
