//! Glyphboard - interactive canvas state and undoable mutation engine.
//!
//! Glyphs are placed on top of a pannable, zoomable background image. The
//! [`Canvas`] session owns all state and turns raw contact events into
//! view changes and, at the end of each gesture, into exactly one undoable
//! command. Rendering is left to the host, which reads
//! [`Canvas::presented_elements`] and subscribes to the state stores.

pub mod background;
pub mod canvas;
pub mod constants;
pub mod error;
pub mod fetch;
pub mod geometry;
pub mod history;
pub mod ingest;
pub mod input;
pub mod logging;
pub mod model;
pub mod palette;
pub mod perf;
pub mod selection;
pub mod settings;
pub mod settings_watcher;
pub mod snapshot;
pub mod spatial_index;
pub mod store;
pub mod transform;

pub use canvas::{Canvas, PresentedElement};
pub use error::{CanvasError, CanvasResult};
pub use fetch::{FetchStatus, ImageResolver};
pub use geometry::{ContainerSize, DocPoint, Vec2};
pub use history::HistoryStatus;
pub use ingest::{ExternalPayload, IngestOutcome};
pub use input::{ContactEvent, ContactId, ContactPhase, GestureState};
pub use model::{BackgroundSource, DocumentModel, Element, ElementId};
pub use selection::SelectionSet;
pub use settings::CanvasSettings;
pub use snapshot::DocumentSnapshot;
pub use transform::{TransformState, ViewState};
