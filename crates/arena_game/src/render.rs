//! Read-only view for the rendering collaborator.
//!
//! [`snapshot`] is taken after [`World::update`] returns and never mutates
//! the world.

use arena_component::{Entity, Query};
use arena_ecs::World;
use arena_math::Position;
use serde::{Deserialize, Serialize};

use crate::components::{Sprite, Trail, Unit};

/// One drawable entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderItem {
    pub entity: Entity,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub color: String,
    pub rotation: f32,
    /// Trail points, newest first.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub trail: Vec<[f32; 2]>,
    /// Set for units, to draw a health bar.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub health_ratio: Option<f32>,
}

/// Every entity holding both a position and a sprite, in entity order.
#[must_use]
pub fn snapshot(world: &World) -> Vec<RenderItem> {
    let query = Query::new().with::<Position>().with::<Sprite>();
    world
        .query(&query)
        .into_iter()
        .filter_map(|entity| {
            let pos = world.get_component::<Position>(entity)?.0;
            let sprite = world.get_component::<Sprite>(entity)?;
            let trail = world
                .get_component::<Trail>(entity)
                .map(|t| t.points.iter().map(|p| [p.x, p.y]).collect())
                .unwrap_or_default();
            Some(RenderItem {
                entity,
                x: pos.x,
                y: pos.y,
                width: sprite.width,
                height: sprite.height,
                color: sprite.color.clone(),
                rotation: sprite.rotation,
                trail,
                health_ratio: world.get_component::<Unit>(entity).map(Unit::health_ratio),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use arena_math::Vec2;

    use super::*;
    use crate::components::Faction;

    #[test]
    fn test_snapshot_lists_drawables_only() {
        let mut world = World::new();
        let unit = world.create_entity();
        world.add_component(unit, Position::new(10.0, 20.0)).unwrap();
        world.add_component(unit, Sprite::new(30.0, 30.0, "#4CAF50")).unwrap();
        let mut stats = Unit::new(Faction::Player, 100.0);
        stats.damage(25.0);
        world.add_component(unit, stats).unwrap();

        let bolt = world.create_entity();
        world.add_component(bolt, Position::new(0.0, 0.0)).unwrap();
        world.add_component(bolt, Sprite::disc(5.0, "#4444FF")).unwrap();
        world
            .add_component(bolt, Trail::fixed([Vec2::new(0.0, -200.0), Vec2::ZERO]))
            .unwrap();

        let hidden = world.create_entity();
        world.add_component(hidden, Position::new(1.0, 1.0)).unwrap();

        let items = snapshot(&world);
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].entity, unit);
        assert_eq!(items[0].health_ratio, Some(0.75));
        assert_eq!(items[1].trail, vec![[0.0, -200.0], [0.0, 0.0]]);
        assert_eq!(items[1].health_ratio, None);

        let json = serde_json::to_value(&items).unwrap();
        assert_eq!(json[0]["color"], "#4CAF50");
        assert!(json[0].get("trail").is_none());
    }
}
