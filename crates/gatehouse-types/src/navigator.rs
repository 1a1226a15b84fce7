//! The scene-transition hook shared by every controller.

use std::sync::Arc;

use crate::Scene;

/// Moves the client between scenes.
///
/// Controllers never load scenes themselves; they ask a navigator. The
/// production navigator is the dispatch loop's scene router; tests pass a
/// recorder and assert on what was requested.
///
/// Both methods are fire-and-forget. A navigator must not block: the
/// actual scene load happens after the calling controller returns.
pub trait SceneNavigator: Send + Sync + 'static {
    /// Requests a transition to `scene`.
    fn load(&self, scene: Scene);

    /// Requests that the client shut down.
    fn quit(&self);
}

/// Lets several controllers (and a test) share one navigator.
impl<T: SceneNavigator> SceneNavigator for Arc<T> {
    fn load(&self, scene: Scene) {
        (**self).load(scene);
    }

    fn quit(&self) {
        (**self).quit();
    }
}
