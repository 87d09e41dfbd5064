//! In-memory scene
//!
//! Just enough physics for the marble: gravity, flat rectangular track
//! pieces to roll on, rolling damping and begin-contact detection between
//! moving bodies and anything their contact mask selects. Every body is a
//! sphere.

use std::collections::HashSet;

use glam::{Vec2, Vec3};

use crate::consts::SPAWN_POINT;
use crate::names;
use crate::sim::{CollisionCategory, Contact, NodeId, SceneEngine, Transform};

pub const GRAVITY: Vec3 = Vec3::new(0.0, -9.8, 0.0);
/// Fraction of horizontal speed lost per second while on a track
pub const ROLLING_DAMPING: f32 = 0.3;
pub const BALL_RADIUS: f32 = 0.5;

#[derive(Debug, Clone, PartialEq)]
pub struct Body {
    /// Single-bit category mask
    pub category: u32,
    /// Categories this body reports contacts with
    pub contact_mask: u32,
    pub velocity: Vec3,
    pub radius: f32,
    /// Moved by gravity and velocity
    pub dynamic: bool,
}

/// Axis-aligned slab the ball can rest on; bounds are on the XZ plane
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Track {
    pub min: Vec2,
    pub max: Vec2,
    pub top: f32,
}

impl Track {
    fn supports(&self, pos: Vec3, radius: f32) -> bool {
        let bottom = pos.y - radius;
        pos.x >= self.min.x
            && pos.x <= self.max.x
            && pos.z >= self.min.y
            && pos.z <= self.max.y
            && bottom <= self.top
            && bottom > self.top - radius
    }
}

#[derive(Debug, Clone)]
struct Node {
    name: String,
    transform: Transform,
    hidden: bool,
    body: Option<Body>,
}

#[derive(Debug, Clone, Default)]
pub struct MemoryScene {
    nodes: Vec<Node>,
    tracks: Vec<Track>,
    /// Pairs overlapping after the last step
    touching: HashSet<(NodeId, NodeId)>,
}

impl MemoryScene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ball, camera and the two follow anchors, no level geometry
    pub fn with_required_nodes() -> Self {
        let mut scene = Self::new();
        let ball = scene.add_node(names::BALL, Transform::at(SPAWN_POINT));
        scene.attach_body(
            ball,
            Body {
                category: CollisionCategory::Ball.bits(),
                contact_mask: CollisionCategory::ball_contact_mask(),
                velocity: Vec3::ZERO,
                radius: BALL_RADIUS,
                dynamic: true,
            },
        );
        scene.add_node(names::CAMERA, Transform::at(Vec3::new(0.0, 8.0, 12.0)));
        scene.add_node(names::CAMERA_FOLLOW, Transform::default());
        scene.add_node(names::LIGHT_FOLLOW, Transform::default());
        scene
    }

    /// A straight track running from z=5 toward -z with pearls down the
    /// middle, pillars and crates on the sides, and a gap near the end
    pub fn demo_level() -> Self {
        let mut scene = Self::with_required_nodes();

        scene.add_track(Track {
            min: Vec2::new(-4.0, -40.0),
            max: Vec2::new(4.0, 5.0),
            top: 0.0,
        });
        scene.add_track(Track {
            min: Vec2::new(-3.0, -80.0),
            max: Vec2::new(3.0, -46.0),
            top: -1.0,
        });

        for i in 0..8 {
            let z = -5.0 - i as f32 * 9.0;
            scene.add_static_body(
                &format!("pearl_{i}"),
                Vec3::new(0.0, 0.5, z),
                CollisionCategory::Pearl,
                0.4,
            );
        }
        for (i, side) in [-3.5f32, 3.5].into_iter().enumerate() {
            scene.add_static_body(
                &format!("pillar_{i}"),
                Vec3::new(side, 1.0, -18.0),
                CollisionCategory::Pillar,
                0.6,
            );
            scene.add_static_body(
                &format!("crate_{i}"),
                Vec3::new(-side, 0.5, -32.0),
                CollisionCategory::Crate,
                0.5,
            );
        }
        scene.add_static_body(
            "stone_0",
            Vec3::new(2.0, 0.3, -60.0),
            CollisionCategory::Stone,
            0.3,
        );

        scene
    }

    pub fn add_node(&mut self, name: &str, transform: Transform) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node {
            name: name.to_string(),
            transform,
            hidden: false,
            body: None,
        });
        id
    }

    pub fn attach_body(&mut self, node: NodeId, body: Body) {
        if let Some(n) = self.node_mut(node) {
            n.body = Some(body);
        }
    }

    /// Non-moving body of the given category
    pub fn add_static_body(
        &mut self,
        name: &str,
        position: Vec3,
        category: CollisionCategory,
        radius: f32,
    ) -> NodeId {
        let node = self.add_node(name, Transform::at(position));
        self.attach_body(
            node,
            Body {
                category: category.bits(),
                contact_mask: 0,
                velocity: Vec3::ZERO,
                radius,
                dynamic: false,
            },
        );
        node
    }

    pub fn add_track(&mut self, track: Track) {
        self.tracks.push(track);
    }

    pub fn body(&self, node: NodeId) -> Option<&Body> {
        self.node(node).and_then(|n| n.body.as_ref())
    }

    fn node(&self, node: NodeId) -> Option<&Node> {
        self.nodes.get(node.0 as usize)
    }

    fn node_mut(&mut self, node: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(node.0 as usize)
    }

    /// Advance physics by `dt` and return contacts that began this step
    pub fn step(&mut self, dt: f32) -> Vec<Contact> {
        for node in &mut self.nodes {
            let Some(body) = node.body.as_mut().filter(|b| b.dynamic) else {
                continue;
            };

            body.velocity += GRAVITY * dt;
            let mut pos = node.transform.position + body.velocity * dt;

            if let Some(track) = self.tracks.iter().find(|t| t.supports(pos, body.radius)) {
                pos.y = track.top + body.radius;
                body.velocity.y = body.velocity.y.max(0.0);
                let keep = (1.0 - ROLLING_DAMPING * dt).max(0.0);
                body.velocity.x *= keep;
                body.velocity.z *= keep;
            }

            node.transform.position = pos;
        }

        let mut overlapping = HashSet::new();
        let mut began = Vec::new();

        for (i, a) in self.nodes.iter().enumerate() {
            let Some(body_a) = a.body.as_ref().filter(|b| b.dynamic && !a.hidden) else {
                continue;
            };
            for (j, b) in self.nodes.iter().enumerate() {
                if i == j || b.hidden {
                    continue;
                }
                let Some(body_b) = b.body.as_ref() else {
                    continue;
                };
                if body_a.contact_mask & body_b.category == 0 {
                    continue;
                }

                let reach = body_a.radius + body_b.radius;
                if a.transform.position.distance_squared(b.transform.position) < reach * reach {
                    let pair = (NodeId(i as u32), NodeId(j as u32));
                    if !self.touching.contains(&pair) {
                        began.push(Contact {
                            node_a: pair.0,
                            node_b: pair.1,
                        });
                    }
                    overlapping.insert(pair);
                }
            }
        }

        self.touching = overlapping;
        began
    }
}

impl SceneEngine for MemoryScene {
    fn lookup(&self, name: &str) -> Option<NodeId> {
        self.nodes
            .iter()
            .position(|n| n.name == name)
            .map(|i| NodeId(i as u32))
    }

    fn name(&self, node: NodeId) -> Option<&str> {
        self.node(node).map(|n| n.name.as_str())
    }

    fn transform(&self, node: NodeId) -> Transform {
        self.node(node).map(|n| n.transform).unwrap_or_default()
    }

    fn set_transform(&mut self, node: NodeId, transform: Transform) {
        if let Some(n) = self.node_mut(node) {
            n.transform = transform;
        }
    }

    fn has_body(&self, node: NodeId) -> bool {
        self.body(node).is_some()
    }

    fn category(&self, node: NodeId) -> Option<CollisionCategory> {
        self.body(node)
            .and_then(|b| CollisionCategory::from_bits(b.category))
    }

    fn velocity(&self, node: NodeId) -> Vec3 {
        self.body(node).map(|b| b.velocity).unwrap_or(Vec3::ZERO)
    }

    fn set_velocity(&mut self, node: NodeId, velocity: Vec3) {
        if let Some(body) = self.node_mut(node).and_then(|n| n.body.as_mut()) {
            body.velocity = velocity;
        }
    }

    fn is_hidden(&self, node: NodeId) -> bool {
        self.node(node).is_some_and(|n| n.hidden)
    }

    fn set_hidden(&mut self, node: NodeId, hidden: bool) {
        if let Some(n) = self.node_mut(node) {
            n.hidden = hidden;
        }
    }
}
