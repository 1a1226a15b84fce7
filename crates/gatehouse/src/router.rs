//! Scene routing: which controller owns input right now.

use std::sync::Arc;

use gatehouse_types::{Scene, SceneNavigator};
use tokio::sync::watch;

struct Shared {
    scene: watch::Sender<Scene>,
    quit: watch::Sender<bool>,
}

/// A [`SceneNavigator`] that publishes scene changes on a `watch` channel.
///
/// Clones share the same channels: every controller gets a clone, and the
/// dispatch loop reads [`current`](Self::current) to decide where input
/// goes. UIs can [`subscribe`](Self::subscribe) to redraw on change.
#[derive(Clone)]
pub struct SceneRouter {
    shared: Arc<Shared>,
}

impl SceneRouter {
    /// Creates a router starting on [`Scene::Login`].
    pub fn new() -> Self {
        Self::starting_at(Scene::Login)
    }

    /// Creates a router starting on `scene`.
    pub fn starting_at(scene: Scene) -> Self {
        let (scene, _) = watch::channel(scene);
        let (quit, _) = watch::channel(false);
        Self {
            shared: Arc::new(Shared { scene, quit }),
        }
    }

    /// The scene currently loaded.
    pub fn current(&self) -> Scene {
        *self.shared.scene.borrow()
    }

    /// Receives every scene change from now on.
    pub fn subscribe(&self) -> watch::Receiver<Scene> {
        self.shared.scene.subscribe()
    }

    /// Returns `true` once [`quit`](SceneNavigator::quit) has been called.
    pub fn quit_requested(&self) -> bool {
        *self.shared.quit.borrow()
    }
}

impl Default for SceneRouter {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneNavigator for SceneRouter {
    fn load(&self, scene: Scene) {
        let previous = self.shared.scene.send_replace(scene);
        tracing::info!(from = %previous, to = %scene, "scene loaded");
    }

    fn quit(&self) {
        self.shared.quit.send_replace(true);
        tracing::info!("quit requested");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_router_starts_on_login() {
        let router = SceneRouter::new();
        assert_eq!(router.current(), Scene::Login);
        assert!(!router.quit_requested());
    }

    #[test]
    fn test_router_clones_share_scene() {
        let router = SceneRouter::new();
        let handle = router.clone();

        handle.load(Scene::Lobby);

        assert_eq!(router.current(), Scene::Lobby);
    }

    #[tokio::test]
    async fn test_router_subscriber_sees_change() {
        let router = SceneRouter::new();
        let mut rx = router.subscribe();

        router.load(Scene::RegionSelect);

        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow_and_update(), Scene::RegionSelect);
    }

    #[test]
    fn test_router_quit_sets_flag() {
        let router = SceneRouter::starting_at(Scene::Gameplay);
        router.quit();
        assert!(router.quit_requested());
        assert_eq!(router.current(), Scene::Gameplay);
    }
}
