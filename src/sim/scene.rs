//! Host scene interface
//!
//! The scene graph and the rigid bodies in it belong to the host engine.
//! The controller only holds `NodeId` handles and goes through
//! `SceneEngine` for every read and write.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::category::CollisionCategory;
use crate::names;

/// Non-owning handle to a scene node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub u32);

/// Node position and Euler rotation (radians)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Transform {
    pub position: Vec3,
    pub euler: Vec3,
}

impl Transform {
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            euler: Vec3::ZERO,
        }
    }
}

/// Two bodies whose shapes started touching
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Contact {
    pub node_a: NodeId,
    pub node_b: NodeId,
}

/// Scene graph and physics world owned by the host
pub trait SceneEngine {
    /// Find a node by name anywhere in the graph
    fn lookup(&self, name: &str) -> Option<NodeId>;
    fn name(&self, node: NodeId) -> Option<&str>;

    fn transform(&self, node: NodeId) -> Transform;
    fn set_transform(&mut self, node: NodeId, transform: Transform);

    /// Current simulated position (what is on screen this frame)
    fn position(&self, node: NodeId) -> Vec3 {
        self.transform(node).position
    }

    fn set_position(&mut self, node: NodeId, position: Vec3) {
        let mut transform = self.transform(node);
        transform.position = position;
        self.set_transform(node, transform);
    }

    /// Whether the node has a physics body attached
    fn has_body(&self, node: NodeId) -> bool;
    /// Category of the node's physics body, None without a body or with an
    /// unknown bitmask
    fn category(&self, node: NodeId) -> Option<CollisionCategory>;
    fn velocity(&self, node: NodeId) -> Vec3;
    fn set_velocity(&mut self, node: NodeId, velocity: Vec3);

    fn is_hidden(&self, node: NodeId) -> bool;
    fn set_hidden(&mut self, node: NodeId, hidden: bool);
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SetupError {
    #[error("scene has no node named \"{0}\"")]
    MissingNode(&'static str),

    #[error("scene node \"{0}\" has no physics body")]
    MissingBody(&'static str),
}

/// Nodes the controller drives, resolved once at startup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SceneNodes {
    pub ball: NodeId,
    pub camera: NodeId,
    pub camera_follow: NodeId,
    pub light_follow: NodeId,
}

impl SceneNodes {
    /// Resolve every required node; the ball must carry a physics body
    pub fn bind<S: SceneEngine + ?Sized>(scene: &S) -> Result<Self, SetupError> {
        let find = |name: &'static str| scene.lookup(name).ok_or(SetupError::MissingNode(name));

        let ball = find(names::BALL)?;
        if !scene.has_body(ball) {
            return Err(SetupError::MissingBody(names::BALL));
        }

        Ok(Self {
            ball,
            camera: find(names::CAMERA)?,
            camera_follow: find(names::CAMERA_FOLLOW)?,
            light_follow: find(names::LIGHT_FOLLOW)?,
        })
    }

    /// Of the two bodies in a contact, the one that is not the ball.
    /// None when the ball is not involved.
    pub fn other_than_ball<S: SceneEngine + ?Sized>(
        &self,
        scene: &S,
        contact: &Contact,
    ) -> Option<NodeId> {
        let is_ball = |node: NodeId| node == self.ball || scene.name(node) == Some(names::BALL);

        if is_ball(contact.node_a) {
            Some(contact.node_b)
        } else if is_ball(contact.node_b) {
            Some(contact.node_a)
        } else {
            None
        }
    }
}
