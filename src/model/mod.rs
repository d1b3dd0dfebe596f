//! Annotation data model for voxpaint.
//!
//! This module defines the inputs of volume materialization: tasks (the
//! volume window being annotated), polygons painted on individual slices,
//! and checkpoints grouping the polygons saved together.
//!
//! # Design Principles
//!
//! 1. **Typed frames**: annotation-frame and volume-frame points are
//!    distinct types ([`Coord<Annotation>`] vs [`Coord<Volume>`]).
//!
//! 2. **One polygon shape**: legacy `points`/`holes` payloads are upgraded
//!    to positive/negative regions at deserialization.
//!
//! 3. **Permissive construction**: malformed rings are representable, so the
//!    renderer can skip and report them instead of failing a whole save.
//!
//! # Example
//!
//! ```
//! use voxpaint::model::{Checkpoint, Polygon, Ring, Task};
//!
//! let task = Task::new("col", "exp", "em", 0, (0, 64), (0, 64), (0, 8));
//! let checkpoint = Checkpoint::new(
//!     "task-1",
//!     vec![Polygon::new(1u64, 2, Ring::new([(4.0, 4.0), (20.0, 4.0), (20.0, 20.0)]))],
//! );
//! assert_eq!(task.dims().unwrap(), (64, 64, 8));
//! assert_eq!(checkpoint.polygons.len(), 1);
//! ```

mod coord;
mod ids;
pub mod io_json;
mod polygon;
mod ring;
mod task;

pub use coord::{Annotation, Coord, Frame, Volume};
pub use ids::{SegmentId, TaskId};
pub use polygon::{Checkpoint, Polygon};
pub use ring::{Ring, RingDefect, MIN_RING_VERTICES};
pub use task::{Task, TaskRecord};
