//! Traits describing the collaborators the rules consult.
//!
//! The ray caster, scene hierarchy and rig lookup are provided by the host
//! (physics and asset layers). The [`Env`] aggregate bundles them so the engine
//! can reach everything it needs without hard coupling to concrete
//! implementations.
mod error;
mod raycast;
mod rig;
mod scene;

pub use error::OracleError;
pub use raycast::{Category, RayCaster, RayHit};
pub use rig::{AnchorKind, RigOracle};
pub use scene::{MAX_HIERARCHY_DEPTH, SceneOracle, ancestors};

/// Aggregates the collaborators required by the engine.
pub struct Env<'a, R, S, G>
where
    R: RayCaster + ?Sized,
    S: SceneOracle + ?Sized,
    G: RigOracle + ?Sized,
{
    ray_caster: Option<&'a R>,
    scene: Option<&'a S>,
    rig: Option<&'a G>,
}

pub type GameEnv<'a> = Env<'a, dyn RayCaster + 'a, dyn SceneOracle + 'a, dyn RigOracle + 'a>;

impl<R, S, G> Clone for Env<'_, R, S, G>
where
    R: RayCaster + ?Sized,
    S: SceneOracle + ?Sized,
    G: RigOracle + ?Sized,
{
    fn clone(&self) -> Self {
        *self
    }
}

impl<R, S, G> Copy for Env<'_, R, S, G>
where
    R: RayCaster + ?Sized,
    S: SceneOracle + ?Sized,
    G: RigOracle + ?Sized,
{
}

impl<'a, R, S, G> Env<'a, R, S, G>
where
    R: RayCaster + ?Sized,
    S: SceneOracle + ?Sized,
    G: RigOracle + ?Sized,
{
    pub fn new(ray_caster: Option<&'a R>, scene: Option<&'a S>, rig: Option<&'a G>) -> Self {
        Self {
            ray_caster,
            scene,
            rig,
        }
    }

    pub fn empty() -> Self {
        Self {
            ray_caster: None,
            scene: None,
            rig: None,
        }
    }

    /// Returns the RayCaster, or an error if not available.
    ///
    /// # Errors
    ///
    /// Returns `OracleError::RayCasterNotAvailable` if no ray caster was provided.
    pub fn ray_caster(&self) -> Result<&'a R, OracleError> {
        self.ray_caster.ok_or(OracleError::RayCasterNotAvailable)
    }

    /// Returns the SceneOracle, or an error if not available.
    ///
    /// # Errors
    ///
    /// Returns `OracleError::SceneNotAvailable` if no scene oracle was provided.
    pub fn scene(&self) -> Result<&'a S, OracleError> {
        self.scene.ok_or(OracleError::SceneNotAvailable)
    }

    /// Returns the RigOracle when one was provided.
    ///
    /// The rig is optional: missing anchors fall back to a root offset.
    pub fn rig(&self) -> Option<&'a G> {
        self.rig
    }

    /// Checks that every required collaborator is present.
    pub fn validate(&self) -> Result<(), OracleError> {
        self.ray_caster()?;
        self.scene()?;
        Ok(())
    }
}

impl<'a> GameEnv<'a> {
    /// Builds a game environment from concrete collaborators.
    pub fn from_parts(
        ray_caster: &'a dyn RayCaster,
        scene: &'a dyn SceneOracle,
        rig: Option<&'a dyn RigOracle>,
    ) -> Self {
        Env::new(Some(ray_caster), Some(scene), rig)
    }
}
