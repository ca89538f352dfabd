//! Simulation participants
//!
//! Everything here is deterministic given the input sequence: fixed step,
//! no wall-clock reads, per-tick units throughout. Participants are shared
//! through `Rc<RefCell<_>>` and only borrowed inside their own phase.

pub mod body;
pub mod brake;
pub mod camera;
pub mod craft;
pub mod pilot;
pub mod resource;
pub mod rules;

pub use body::{Body, BodyStyle, Motion, Planet, Pose};
pub use brake::{BrakeTuning, Turn};
pub use camera::{CameraFollow, CameraLayer, DriftCamera, view_scale, view_transform};
pub use craft::{Contact, Craft, CraftTuning, FlightState, HULL};
pub use pilot::Pilot;
pub use resource::ResourceMeter;
pub use rules::{FlightRules, FlightTuning, GameOutcome};
