pub mod common;
pub mod player;
pub mod projectile;
pub mod status;
pub mod wand;

pub use common::{EntityId, Pose, ProjectileId, Ray, Timestamp};
pub use player::{Attachment, PlayerState, ToolState};
pub use projectile::ProjectileState;
pub use status::{Form, StatusEffect};
pub use wand::WandState;
