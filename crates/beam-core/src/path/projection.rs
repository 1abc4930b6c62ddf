use glam::Vec2;
use serde::Deserialize;

/// How graph x coordinates are expressed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum XSpace {
    /// px offsets from the horizontal center, e.g. -600..600.
    #[default]
    Centered,
    /// 0..100 across the width.
    Percent,
}

/// How graph y coordinates are expressed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum YSpace {
    /// 0..1 of the path height.
    #[default]
    Fraction,
    /// 0..100 of the path height.
    Percent,
}

/// Vertical extent the path is laid out over.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PathExtent {
    /// Fixed overlay, one viewport tall.
    Viewport,
    /// Absolute overlay spanning the whole document.
    #[default]
    Document,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CoordinateSpace {
    pub x: XSpace,
    pub y: YSpace,
    pub extent: PathExtent,
}

/// Graph space → output px for one layout. Compared by value to decide when
/// cached base paths must be rebuilt.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Projection {
    pub space: CoordinateSpace,
    pub width: f32,
    pub height: f32,
}

impl Projection {
    pub fn new(space: CoordinateSpace, width: f32, height: f32) -> Self {
        let clean = |v: f32| if v.is_finite() { v.max(0.0) } else { 0.0 };
        Self {
            space,
            width: clean(width),
            height: clean(height),
        }
    }

    /// Identity-like projection for tests and pre-scaled graphs: x offsets
    /// around 0, y as a fraction of `height`.
    pub fn centered(width: f32, height: f32) -> Self {
        Self::new(CoordinateSpace::default(), width, height)
    }

    #[inline]
    pub fn project(&self, p: Vec2) -> Vec2 {
        let x = match self.space.x {
            XSpace::Centered => self.width * 0.5 + p.x,
            XSpace::Percent => p.x / 100.0 * self.width,
        };
        let y = match self.space.y {
            YSpace::Fraction => p.y * self.height,
            YSpace::Percent => p.y / 100.0 * self.height,
        };
        Vec2::new(x, y)
    }
}
