//! # LogWriter: simple event printer
//!
//! A minimal subscriber that prints incoming [`Event`]s to stdout.
//! Use it for test or demo.
//!
//! ## Example output
//! ```text
//! [submitted] request=3 root=Some(And)
//! [decided] request=3 gate=Some(And) value=Some(false) pruned=Some(2)
//! [cancelled] request=3 gate=Some(Leaf)
//! [completed] request=3 value=false
//! [stop-requested]
//! [all-stopped-within-grace]
//! ```

use async_trait::async_trait;

use crate::events::{Event, EventKind};
use crate::subscribers::Subscribe;

/// Event writer subscriber.
#[derive(Default)]
pub struct LogWriter;

impl LogWriter {
    /// Construct a new [`LogWriter`].
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Subscribe for LogWriter {
    async fn on_event(&self, e: &Event) {
        let req = e.request.unwrap_or_default();
        match e.kind {
            EventKind::RequestSubmitted => {
                println!("[submitted] request={req} root={:?}", e.gate);
            }
            EventKind::RequestRejected => {
                println!("[rejected] request={req} solver stopped");
            }
            EventKind::GateDecided => {
                println!(
                    "[decided] request={req} gate={:?} value={:?} pruned={:?}",
                    e.gate, e.value, e.pruned
                );
            }
            EventKind::TaskCancelled => {
                println!("[cancelled] request={req} gate={:?}", e.gate);
            }
            EventKind::RequestCompleted => {
                println!(
                    "[completed] request={req} value={}",
                    e.value.unwrap_or_default()
                );
            }
            EventKind::RequestFailed => {
                println!("[failed] request={req} err={:?}", e.reason);
            }
            EventKind::StopRequested => {
                println!("[stop-requested]");
            }
            EventKind::AllStoppedWithin => {
                println!("[all-stopped-within-grace]");
            }
            EventKind::GraceExceeded => {
                println!("[grace-exceeded] grace_ms={:?}", e.timeout_ms);
            }
            EventKind::SubscriberOverflow => {
                println!("[subscriber-overflow] {:?}", e.reason);
            }
            EventKind::SubscriberPanicked => {
                println!(
                    "[subscriber-panicked] {}",
                    e.reason.as_deref().unwrap_or("unknown")
                );
            }
        }
    }

    fn name(&self) -> &'static str {
        "LogWriter"
    }
}
